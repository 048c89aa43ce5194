// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A single rooted tree: a value and an ordered list of child trees.

use alloc::vec::Vec;
use core::ops::{Index, IndexMut, Range};

use crate::iter::{Iter, PathIter};
use crate::path::TreePath;
use crate::walk;

/// A value with an ordered list of child subtrees.
///
/// Each node exclusively owns its children, so a subtree can only be in one
/// place at a time and cycles cannot be built.
///
/// Paths passed to a node are relative to it: the empty path addresses the
/// node itself, `[i]` its `i`-th child, and so on.
///
/// ```rust
/// use understory_forest::{Node, TreePath};
///
/// let tree = Node::with_children("A", [Node::new("AA"), Node::with_children("AB", [Node::new("ABA")])]);
/// assert_eq!(tree.count(), 4);
/// assert_eq!(tree[&TreePath::from([1, 0])].value, "ABA");
/// assert_eq!(tree.values().copied().collect::<Vec<_>>(), ["A", "AA", "AB", "ABA"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Node<V> {
    /// Value carried by this node.
    pub value: V,
    /// Ordered child subtrees.
    pub children: Vec<Self>,
}

impl<V> Node<V> {
    /// A leaf holding `value`.
    pub fn new(value: V) -> Self {
        Self {
            value,
            children: Vec::new(),
        }
    }

    /// A node holding `value` with the given children.
    pub fn with_children(value: V, children: impl IntoIterator<Item = Self>) -> Self {
        Self {
            value,
            children: children.into_iter().collect(),
        }
    }

    /// Returns `true` if the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + walk::count(&self.children)
    }

    /// Path of the first node in pre-order: the node itself.
    pub fn start_path(&self) -> TreePath {
        TreePath::new()
    }

    /// One past the last child: `[children.len()]`.
    pub fn end_path(&self) -> TreePath {
        TreePath::from([self.children.len()])
    }

    /// Pre-order successor of `path`, or [`Node::end_path`] after the last
    /// descendant.
    ///
    /// # Panics
    ///
    /// Panics if `path` does not address a node of this subtree.
    pub fn path_after(&self, path: &TreePath) -> TreePath {
        walk::successor_within(self, path.as_slice()).unwrap_or_else(|| self.end_path())
    }

    /// Pre-order predecessor of `path`, or `None` for the node itself.
    ///
    /// `path` may be [`Node::end_path`], whose predecessor is the last
    /// descendant.
    ///
    /// # Panics
    ///
    /// Panics if `path` addresses neither a node of this subtree nor an
    /// insertion point.
    pub fn path_before(&self, path: &TreePath) -> Option<TreePath> {
        if path.is_empty() {
            return None;
        }
        Some(walk::predecessor(&self.children, path.as_slice()).unwrap_or_default())
    }

    /// The node at `path`, or `None` if any offset is out of bounds.
    pub fn get(&self, path: &TreePath) -> Option<&Self> {
        if path.is_empty() {
            return Some(self);
        }
        walk::resolve(&self.children, path.as_slice())
    }

    /// Mutable access to the node at `path`.
    pub fn get_mut(&mut self, path: &TreePath) -> Option<&mut Self> {
        if path.is_empty() {
            return Some(self);
        }
        walk::resolve_mut(&mut self.children, path.as_slice())
    }

    /// Replace the subtree at `path`, returning the previous one.
    ///
    /// # Panics
    ///
    /// Panics if `path` does not resolve.
    pub fn set(&mut self, path: &TreePath, node: Self) -> Self {
        let slot = self
            .get_mut(path)
            .unwrap_or_else(|| panic!("no node at {path}"));
        core::mem::replace(slot, node)
    }

    /// Run `body` with mutable access to the node at `path`.
    ///
    /// # Panics
    ///
    /// Panics if `path` does not resolve.
    pub fn with_node_mut<R>(&mut self, path: &TreePath, body: impl FnOnce(&mut Self) -> R) -> R {
        let node = self
            .get_mut(path)
            .unwrap_or_else(|| panic!("no node at {path}"));
        body(node)
    }

    /// Insert `node` immediately before the position addressed by `path`,
    /// shifting later siblings right.
    ///
    /// # Panics
    ///
    /// Panics if `path` is empty, if its parent does not resolve, or if its
    /// last offset exceeds the parent's child count.
    pub fn insert(&mut self, path: &TreePath, node: Self) {
        self.insert_all(path, [node]);
    }

    /// Insert a run of sibling subtrees before the position addressed by
    /// `path`.
    ///
    /// # Panics
    ///
    /// Same conditions as [`Node::insert`].
    pub fn insert_all(&mut self, path: &TreePath, nodes: impl IntoIterator<Item = Self>) {
        assert!(!path.is_empty(), "a node cannot insert at its own position");
        walk::insert_all(&mut self.children, path.as_slice(), nodes);
    }

    /// Detach and return the subtree at `path`, shifting later siblings left.
    ///
    /// # Panics
    ///
    /// Panics if `path` is empty or does not resolve.
    pub fn remove(&mut self, path: &TreePath) -> Self {
        assert!(!path.is_empty(), "a node cannot remove itself");
        walk::remove(&mut self.children, path.as_slice())
    }

    /// Remove every node whose path lies in `range` (in pre-order), last first.
    ///
    /// # Panics
    ///
    /// Panics if `range.start` is the empty path.
    pub fn remove_range(&mut self, range: Range<TreePath>) {
        assert!(!range.start.is_empty(), "a node cannot remove itself");
        let paths = walk::paths_in_range(&self.children, &range.start, &range.end);
        for path in paths.iter().rev() {
            walk::remove(&mut self.children, path.as_slice());
        }
    }

    /// Pre-order iterator over this subtree, starting with `self`.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(PathIter::relative(core::slice::from_ref(self)))
    }

    /// Pre-order iterator over `(path, node)` pairs, with paths relative to
    /// `self`.
    pub fn iter_paths(&self) -> PathIter<'_, V> {
        PathIter::relative(core::slice::from_ref(self))
    }

    /// Pre-order iterator over values.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator {
        self.iter().map(|node| &node.value)
    }

    /// First path in pre-order whose node satisfies `predicate`.
    pub fn find_path(&self, mut predicate: impl FnMut(&Self) -> bool) -> Option<TreePath> {
        if predicate(self) {
            return Some(TreePath::new());
        }
        walk::find_path(&self.children, &mut predicate)
    }

    /// Transform every value, keeping the shape.
    pub fn map_values<U>(&self, mut transform: impl FnMut(&V) -> U) -> Node<U> {
        self.map_nodes(|node| transform(&node.value))
    }

    /// Transform every node (with access to its subtree), keeping the shape.
    pub fn map_nodes<U>(&self, mut transform: impl FnMut(&Self) -> U) -> Node<U> {
        map_nodes_inner(self, &mut transform)
    }

    /// Transform every value together with the values of its ancestors,
    /// outermost first.
    pub fn map_values_with_parents<U>(&self, mut transform: impl FnMut(&[&V], &V) -> U) -> Node<U> {
        let mut parents = Vec::new();
        map_with_parents_inner(self, &mut parents, &mut transform)
    }

    /// Keep only nodes whose value satisfies `predicate`.
    ///
    /// A rejected node is dropped together with its whole subtree; its
    /// children are not re-parented. Returns `None` if `self` is rejected.
    pub fn filter(&self, mut predicate: impl FnMut(&V) -> bool) -> Option<Self>
    where
        V: Clone,
    {
        self.filter_map(|value| predicate(value).then(|| value.clone()))
    }

    /// Transform values, dropping the whole subtree of any node for which
    /// `transform` yields `None`.
    pub fn filter_map<U>(&self, mut transform: impl FnMut(&V) -> Option<U>) -> Option<Node<U>> {
        filter_map_inner(self, &mut transform)
    }
}

pub(crate) fn map_nodes_inner<V, U>(node: &Node<V>, transform: &mut impl FnMut(&Node<V>) -> U) -> Node<U> {
    Node {
        value: transform(node),
        children: node
            .children
            .iter()
            .map(|child| map_nodes_inner(child, transform))
            .collect(),
    }
}

pub(crate) fn map_with_parents_inner<'a, V, U>(
    node: &'a Node<V>,
    parents: &mut Vec<&'a V>,
    transform: &mut impl FnMut(&[&V], &V) -> U,
) -> Node<U> {
    let value = transform(parents, &node.value);
    parents.push(&node.value);
    let children = node
        .children
        .iter()
        .map(|child| map_with_parents_inner(child, parents, transform))
        .collect();
    parents.pop();
    Node { value, children }
}

pub(crate) fn filter_map_inner<V, U>(
    node: &Node<V>,
    transform: &mut impl FnMut(&V) -> Option<U>,
) -> Option<Node<U>> {
    let value = transform(&node.value)?;
    let children = node
        .children
        .iter()
        .filter_map(|child| filter_map_inner(child, transform))
        .collect();
    Some(Node { value, children })
}

impl<V> Index<&TreePath> for Node<V> {
    type Output = Self;

    fn index(&self, path: &TreePath) -> &Self {
        self.get(path).unwrap_or_else(|| panic!("no node at {path}"))
    }
}

impl<V> IndexMut<&TreePath> for Node<V> {
    fn index_mut(&mut self, path: &TreePath) -> &mut Self {
        self.get_mut(path).unwrap_or_else(|| panic!("no node at {path}"))
    }
}

impl<'a, V> IntoIterator for &'a Node<V> {
    type Item = &'a Node<V>;
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
