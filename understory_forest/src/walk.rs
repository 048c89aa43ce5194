// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Path arithmetic over a list of sibling subtrees.
//!
//! Both [`Node`] (through its children) and [`Forest`](crate::Forest)
//! (through its roots) are a sibling list at the top, so resolution,
//! insertion, removal and pre-order stepping are written once here against
//! `&[Node<V>]` / `&mut Vec<Node<V>>`.

use alloc::vec::Vec;

use crate::node::Node;
use crate::path::TreePath;

pub(crate) fn resolve<'a, V>(siblings: &'a [Node<V>], path: &[usize]) -> Option<&'a Node<V>> {
    let (&first, rest) = path.split_first()?;
    let mut node = siblings.get(first)?;
    for &offset in rest {
        node = node.children.get(offset)?;
    }
    Some(node)
}

pub(crate) fn resolve_mut<'a, V>(
    siblings: &'a mut [Node<V>],
    path: &[usize],
) -> Option<&'a mut Node<V>> {
    let (&first, rest) = path.split_first()?;
    let mut node = siblings.get_mut(first)?;
    for &offset in rest {
        node = node.children.get_mut(offset)?;
    }
    Some(node)
}

/// The sibling list that contains the position addressed by `path`, plus the
/// final offset. `path` must be non-empty.
pub(crate) fn siblings_of_mut<'a, V>(
    siblings: &'a mut Vec<Node<V>>,
    path: &[usize],
) -> Option<(&'a mut Vec<Node<V>>, usize)> {
    let (&offset, parent) = path.split_last()?;
    if parent.is_empty() {
        return Some((siblings, offset));
    }
    let parent = resolve_mut(siblings, parent)?;
    Some((&mut parent.children, offset))
}

pub(crate) fn insert_all<V, I>(siblings: &mut Vec<Node<V>>, path: &[usize], nodes: I)
where
    I: IntoIterator<Item = Node<V>>,
{
    let Some((list, offset)) = siblings_of_mut(siblings, path) else {
        panic!("cannot insert at {}: no such parent", TreePath::from(path));
    };
    assert!(
        offset <= list.len(),
        "cannot insert at {}: offset {offset} exceeds sibling count {}",
        TreePath::from(path),
        list.len()
    );
    list.splice(offset..offset, nodes);
}

pub(crate) fn remove<V>(siblings: &mut Vec<Node<V>>, path: &[usize]) -> Node<V> {
    let Some((list, offset)) = siblings_of_mut(siblings, path) else {
        panic!("cannot remove at {}: no such parent", TreePath::from(path));
    };
    assert!(
        offset < list.len(),
        "cannot remove at {}: offset {offset} out of bounds for {} siblings",
        TreePath::from(path),
        list.len()
    );
    list.remove(offset)
}

/// Pre-order successor of `path` within `siblings`, or `None` once the walk
/// leaves the list.
///
/// # Panics
///
/// Panics if `path` does not resolve.
pub(crate) fn successor<V>(siblings: &[Node<V>], path: &[usize]) -> Option<TreePath> {
    let (&first, rest) = path
        .split_first()
        .expect("an empty path has no successor within a sibling list");
    let node = &siblings[first];
    if let Some(mut next) = successor_within(node, rest) {
        next.prepend(first);
        return Some(next);
    }
    let next = first + 1;
    (next < siblings.len()).then(|| TreePath::from([next]))
}

/// Pre-order successor of the descendant at `path` (relative to `node`),
/// staying inside `node`'s subtree.
pub(crate) fn successor_within<V>(node: &Node<V>, path: &[usize]) -> Option<TreePath> {
    if path.is_empty() {
        return (!node.children.is_empty()).then(|| TreePath::from([0]));
    }
    successor(&node.children, path)
}

/// Pre-order predecessor of `path` within `siblings`, or `None` at the first
/// sibling. `path` may address one past the last sibling.
pub(crate) fn predecessor<V>(siblings: &[Node<V>], path: &[usize]) -> Option<TreePath> {
    let (&first, rest) = path.split_first()?;
    if !rest.is_empty() {
        let mut prev = predecessor(&siblings[first].children, rest).unwrap_or_default();
        prev.prepend(first);
        return Some(prev);
    }
    let prev = first.checked_sub(1)?;
    let mut path = deepest_last(&siblings[prev]);
    path.prepend(prev);
    Some(path)
}

/// Relative path of the last node of `node`'s subtree in pre-order.
pub(crate) fn deepest_last<V>(node: &Node<V>) -> TreePath {
    let mut path = TreePath::new();
    let mut current = node;
    while let Some(last) = current.children.last() {
        path.push(current.children.len() - 1);
        current = last;
    }
    path
}

pub(crate) fn count<V>(siblings: &[Node<V>]) -> usize {
    siblings.iter().map(Node::count).sum()
}

/// First path (in pre-order) whose node satisfies `predicate`.
pub(crate) fn find_path<V>(
    siblings: &[Node<V>],
    predicate: &mut impl FnMut(&Node<V>) -> bool,
) -> Option<TreePath> {
    for (offset, node) in siblings.iter().enumerate() {
        if predicate(node) {
            return Some(TreePath::from([offset]));
        }
        if let Some(mut path) = find_path(&node.children, predicate) {
            path.prepend(offset);
            return Some(path);
        }
    }
    None
}

/// Every pre-order path in `start..end`.
pub(crate) fn paths_in_range<V>(
    siblings: &[Node<V>],
    start: &TreePath,
    end: &TreePath,
) -> Vec<TreePath> {
    let mut paths = Vec::new();
    let mut current = Some(start.clone());
    while let Some(path) = current.filter(|p| p < end) {
        let next = successor(siblings, path.as_slice());
        paths.push(path);
        current = next;
    }
    paths
}
