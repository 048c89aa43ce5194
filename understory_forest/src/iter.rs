// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bidirectional pre-order iterators.

use crate::node::Node;
use crate::path::TreePath;
use crate::walk;

/// Pre-order iterator over `(path, node)` pairs.
///
/// Created by [`Forest::iter_paths`](crate::Forest::iter_paths) and
/// [`Node::iter_paths`]. Iterating from the back walks the same sequence in
/// reverse.
#[derive(Clone, Debug)]
pub struct PathIter<'a, V> {
    roots: &'a [Node<V>],
    front: TreePath,
    back: TreePath,
    remaining: usize,
    /// Drop the leading offset of every path (iteration over a single node).
    relative: bool,
}

impl<'a, V> PathIter<'a, V> {
    pub(crate) fn new(roots: &'a [Node<V>]) -> Self {
        Self {
            roots,
            front: TreePath::from([0]),
            back: TreePath::from([roots.len()]),
            remaining: walk::count(roots),
            relative: false,
        }
    }

    pub(crate) fn relative(roots: &'a [Node<V>]) -> Self {
        Self {
            relative: true,
            ..Self::new(roots)
        }
    }

    fn emit(&self, path: &TreePath) -> Option<(TreePath, &'a Node<V>)> {
        let node = walk::resolve(self.roots, path.as_slice())?;
        let path = if self.relative {
            path.tail()
        } else {
            path.clone()
        };
        Some((path, node))
    }
}

impl<'a, V> Iterator for PathIter<'a, V> {
    type Item = (TreePath, &'a Node<V>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let item = self.emit(&self.front)?;
        self.front = walk::successor(self.roots, self.front.as_slice())
            .unwrap_or_else(|| TreePath::from([self.roots.len()]));
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> DoubleEndedIterator for PathIter<'_, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.back = walk::predecessor(self.roots, self.back.as_slice())?;
        self.remaining -= 1;
        self.emit(&self.back)
    }
}

impl<V> ExactSizeIterator for PathIter<'_, V> {}

/// Pre-order iterator over nodes.
///
/// Each item is a whole subtree; use [`Node::value`] for the value alone.
#[derive(Clone, Debug)]
pub struct Iter<'a, V> {
    inner: PathIter<'a, V>,
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn new(inner: PathIter<'a, V>) -> Self {
        Self { inner }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a Node<V>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, node)| node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> DoubleEndedIterator for Iter<'_, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, node)| node)
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}
