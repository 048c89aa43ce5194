// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The top-level ordered list of trees.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::hash::Hash;
use core::ops::{Index, IndexMut, Range};

use hashbrown::HashMap;

use crate::error::TreeError;
use crate::iter::{Iter, PathIter};
use crate::node::{self, Node};
use crate::path::TreePath;
use crate::walk;

/// An ordered list of root [`Node`]s.
///
/// A forest behaves like the child list of a node without an enclosing value.
/// Paths are absolute: `[i]` is the `i`-th root, `[i, j]` its `j`-th child,
/// and the empty path addresses nothing.
///
/// Structural edits come in two flavors:
/// - primitives ([`Forest::insert`], [`Forest::remove`], indexing) that panic on
///   a path that does not resolve, like their `Vec` counterparts;
/// - checked operations ([`Forest::try_move`], [`Forest::try_applying`]) that
///   report failure and leave the forest untouched.
///
/// ## Example
///
/// ```rust
/// use understory_forest::{Forest, Node, TreePath};
///
/// let mut forest = Forest::from(vec![Node::with_children("A", [Node::new("B")])]);
/// forest.insert(&TreePath::from([1]), Node::new("C"));
/// assert_eq!(forest.values().copied().collect::<Vec<_>>(), ["A", "B", "C"]);
///
/// let removed = forest.remove(&TreePath::from([0]));
/// assert_eq!(removed.count(), 2);
/// assert_eq!(forest.len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Forest<V> {
    /// Root subtrees, in order.
    pub nodes: Vec<Node<V>>,
}

impl<V> Default for Forest<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Forest<V> {
    /// An empty forest.
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Number of roots.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if there are no roots.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes at every depth.
    pub fn count(&self) -> usize {
        walk::count(&self.nodes)
    }

    /// Path of the first root: `[0]`.
    pub fn start_path(&self) -> TreePath {
        TreePath::from([0])
    }

    /// One past the last root: `[len]`.
    pub fn end_path(&self) -> TreePath {
        TreePath::from([self.nodes.len()])
    }

    /// Pre-order successor of `path`, or [`Forest::end_path`] after the last
    /// node.
    ///
    /// # Panics
    ///
    /// Panics if `path` does not address a node.
    pub fn path_after(&self, path: &TreePath) -> TreePath {
        walk::successor(&self.nodes, path.as_slice()).unwrap_or_else(|| self.end_path())
    }

    /// Pre-order predecessor of `path`, or `None` before the first root.
    ///
    /// `path` may be [`Forest::end_path`], whose predecessor is the last node.
    ///
    /// # Panics
    ///
    /// Panics if `path` addresses neither a node nor an insertion point.
    pub fn path_before(&self, path: &TreePath) -> Option<TreePath> {
        walk::predecessor(&self.nodes, path.as_slice())
    }

    /// The node at `path`, or `None` if the path is empty or out of bounds.
    pub fn get(&self, path: &TreePath) -> Option<&Node<V>> {
        walk::resolve(&self.nodes, path.as_slice())
    }

    /// Mutable access to the node at `path`.
    pub fn get_mut(&mut self, path: &TreePath) -> Option<&mut Node<V>> {
        walk::resolve_mut(&mut self.nodes, path.as_slice())
    }

    /// Replace the subtree at `path`, returning the previous one.
    ///
    /// # Panics
    ///
    /// Panics if `path` does not resolve.
    pub fn set(&mut self, path: &TreePath, node: Node<V>) -> Node<V> {
        core::mem::replace(&mut self[path], node)
    }

    /// Run `body` with mutable access to the node at `path`.
    ///
    /// # Panics
    ///
    /// Panics if `path` does not resolve.
    pub fn with_node_mut<R>(&mut self, path: &TreePath, body: impl FnOnce(&mut Node<V>) -> R) -> R {
        body(&mut self[path])
    }

    /// Insert `node` immediately before the position addressed by `path`.
    ///
    /// # Panics
    ///
    /// Panics if `path` is empty, its parent does not resolve, or its last
    /// offset exceeds the sibling count.
    pub fn insert(&mut self, path: &TreePath, node: Node<V>) {
        self.insert_all(path, [node]);
    }

    /// Insert a run of sibling subtrees before the position addressed by
    /// `path`, shifting later siblings right.
    ///
    /// # Panics
    ///
    /// Same conditions as [`Forest::insert`].
    pub fn insert_all(&mut self, path: &TreePath, nodes: impl IntoIterator<Item = Node<V>>) {
        assert!(!path.is_empty(), "the empty path is not a position in a forest");
        walk::insert_all(&mut self.nodes, path.as_slice(), nodes);
    }

    /// Detach and return the subtree at `path`, shifting later siblings left.
    ///
    /// # Panics
    ///
    /// Panics if `path` does not resolve.
    pub fn remove(&mut self, path: &TreePath) -> Node<V> {
        assert!(!path.is_empty(), "the empty path is not a position in a forest");
        walk::remove(&mut self.nodes, path.as_slice())
    }

    /// Remove every node whose path lies in `range` (in pre-order), last first.
    ///
    /// For a run of siblings `[.., i]..[.., j]` this removes the subtrees
    /// `i..j` as units.
    ///
    /// # Panics
    ///
    /// Panics if `range.start` is empty or does not resolve while preceding
    /// `range.end`.
    pub fn remove_range(&mut self, range: Range<TreePath>) {
        assert!(!range.start.is_empty(), "the empty path is not a position in a forest");
        let paths = walk::paths_in_range(&self.nodes, &range.start, &range.end);
        for path in paths.iter().rev() {
            walk::remove(&mut self.nodes, path.as_slice());
        }
    }

    /// Pre-order iterator over every node.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(PathIter::new(&self.nodes))
    }

    /// Pre-order iterator over `(path, node)` pairs.
    pub fn iter_paths(&self) -> PathIter<'_, V> {
        PathIter::new(&self.nodes)
    }

    /// Pre-order iterator over values.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator {
        self.iter().map(|node| &node.value)
    }

    /// First path in pre-order whose node satisfies `predicate`.
    pub fn find_path(&self, mut predicate: impl FnMut(&Node<V>) -> bool) -> Option<TreePath> {
        walk::find_path(&self.nodes, &mut predicate)
    }

    /// Path of the first node holding `value`.
    pub fn path_of(&self, value: &V) -> Option<TreePath>
    where
        V: PartialEq,
    {
        self.find_path(|node| node.value == *value)
    }

    /// Lookup table from value to path, for translating host items into
    /// paths. If a value repeats, its first occurrence wins.
    pub fn value_paths(&self) -> HashMap<V, TreePath>
    where
        V: Clone + Eq + Hash,
    {
        let mut paths = HashMap::with_capacity(self.count());
        for (path, node) in self.iter_paths() {
            paths.entry(node.value.clone()).or_insert(path);
        }
        paths
    }

    /// Transform every value, keeping the shape.
    pub fn map_values<U>(&self, mut transform: impl FnMut(&V) -> U) -> Forest<U> {
        self.map_nodes(|node| transform(&node.value))
    }

    /// Transform every node (with access to its subtree), keeping the shape.
    pub fn map_nodes<U>(&self, mut transform: impl FnMut(&Node<V>) -> U) -> Forest<U> {
        Forest {
            nodes: self
                .nodes
                .iter()
                .map(|root| node::map_nodes_inner(root, &mut transform))
                .collect(),
        }
    }

    /// Transform every value together with the values of its ancestors,
    /// outermost first.
    pub fn map_values_with_parents<U>(&self, mut transform: impl FnMut(&[&V], &V) -> U) -> Forest<U> {
        let mut parents = Vec::new();
        Forest {
            nodes: self
                .nodes
                .iter()
                .map(|root| node::map_with_parents_inner(root, &mut parents, &mut transform))
                .collect(),
        }
    }

    /// Keep only nodes whose value satisfies `predicate`, dropping the whole
    /// subtree of every rejected node.
    pub fn filter(&self, mut predicate: impl FnMut(&V) -> bool) -> Self
    where
        V: Clone,
    {
        self.filter_map(|value| predicate(value).then(|| value.clone()))
    }

    /// Transform values, dropping the whole subtree of any node for which
    /// `transform` yields `None`.
    pub fn filter_map<U>(&self, mut transform: impl FnMut(&V) -> Option<U>) -> Forest<U> {
        Forest {
            nodes: self
                .nodes
                .iter()
                .filter_map(|root| node::filter_map_inner(root, &mut transform))
                .collect(),
        }
    }
}

impl<V: Clone + PartialEq> Forest<V> {
    /// Move the subtrees at `sources` so they become a contiguous run of
    /// siblings at `destination`, returning the resulting forest.
    ///
    /// Returns `None` where [`Forest::try_move`] would fail; `self` is never
    /// modified.
    ///
    /// ```rust
    /// use understory_forest::{Forest, TreePath};
    ///
    /// let forest: Forest<String> = "A\n  B\n  C\n    D\n    E\n  F".parse().unwrap();
    /// let moved = forest
    ///     .moving(&[TreePath::from([0, 1])], &TreePath::from([0]))
    ///     .unwrap();
    /// let expected: Forest<String> = "C\n  D\n  E\nA\n  B\n  F".parse().unwrap();
    /// assert_eq!(moved, expected);
    /// ```
    pub fn moving(&self, sources: &[TreePath], destination: &TreePath) -> Option<Self> {
        self.moved_copy(sources, destination).ok()
    }

    /// Move the subtrees at `sources` so they become a contiguous run of
    /// siblings at `destination`.
    ///
    /// `sources` may be given in any order and may overlap; subtrees keep their
    /// internal structure and are inserted in ascending path order.
    /// `destination` is interpreted against the forest *before* the move:
    /// every moved sibling that sat before the destination under the same
    /// parent shifts the insertion point one to the left, and the destination
    /// parent is found again by value once the sources are detached.
    ///
    /// # Errors
    ///
    /// - [`TreeError::PathOutOfBounds`] if a source does not resolve.
    /// - [`TreeError::InvalidDestination`] if `destination` is empty or its
    ///   parent does not resolve (or cannot be found again after detaching).
    /// - [`TreeError::MoveIntoOwnSubtree`] if the destination lies inside a
    ///   moved subtree.
    /// - [`TreeError::OffsetOutOfBounds`] if the adjusted offset exceeds the
    ///   destination's child count.
    ///
    /// On error the forest is left exactly as it was.
    pub fn try_move(&mut self, sources: &[TreePath], destination: &TreePath) -> Result<(), TreeError> {
        *self = self.moved_copy(sources, destination)?;
        Ok(())
    }

    fn moved_copy(&self, sources: &[TreePath], destination: &TreePath) -> Result<Self, TreeError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "forest_move",
            sources = sources.len(),
            destination = %destination
        )
        .entered();

        let result = self.move_into_scratch(sources, destination);
        #[cfg(feature = "tracing")]
        if let Err(err) = &result {
            tracing::debug!(%err, "move rejected");
        }
        result
    }

    fn move_into_scratch(&self, sources: &[TreePath], destination: &TreePath) -> Result<Self, TreeError> {
        let invalid_destination = || TreeError::InvalidDestination {
            path: destination.clone(),
        };
        let dest_offset = destination.last().ok_or_else(invalid_destination)?;
        let dest_parent = destination.parent();
        // The parent is remembered by value: detaching sources may shift its path.
        let parent_value = if dest_parent.is_empty() {
            None
        } else {
            Some(self.get(&dest_parent).ok_or_else(invalid_destination)?.value.clone())
        };

        let mut sources = sources.to_vec();
        sources.sort();
        sources.dedup();
        for source in &sources {
            if self.get(source).is_none() {
                return Err(TreeError::PathOutOfBounds {
                    path: source.clone(),
                });
            }
            if source.is_prefix_of(&dest_parent) {
                return Err(TreeError::MoveIntoOwnSubtree {
                    moved: Box::new(source.clone()),
                    destination: Box::new(destination.clone()),
                });
            }
        }

        let mut scratch = self.clone();
        let mut offset = dest_offset;
        let mut moved = Vec::with_capacity(sources.len());
        for source in sources.iter().rev() {
            if source.parent() == dest_parent && source.last().is_some_and(|o| o < dest_offset) {
                offset -= 1;
            }
            moved.push(scratch.remove(source));
        }
        moved.reverse();

        let siblings = match &parent_value {
            None => &mut scratch.nodes,
            Some(value) => {
                let path = scratch.path_of(value).ok_or_else(invalid_destination)?;
                &mut scratch.get_mut(&path).ok_or_else(invalid_destination)?.children
            }
        };
        if offset > siblings.len() {
            return Err(TreeError::OffsetOutOfBounds {
                offset,
                len: siblings.len(),
            });
        }
        siblings.splice(offset..offset, moved);
        Ok(scratch)
    }
}

impl<V> Index<&TreePath> for Forest<V> {
    type Output = Node<V>;

    fn index(&self, path: &TreePath) -> &Node<V> {
        self.get(path).unwrap_or_else(|| panic!("no node at {path}"))
    }
}

impl<V> IndexMut<&TreePath> for Forest<V> {
    fn index_mut(&mut self, path: &TreePath) -> &mut Node<V> {
        self.get_mut(path).unwrap_or_else(|| panic!("no node at {path}"))
    }
}

impl<V> From<Vec<Node<V>>> for Forest<V> {
    fn from(nodes: Vec<Node<V>>) -> Self {
        Self { nodes }
    }
}

impl<V> FromIterator<Node<V>> for Forest<V> {
    fn from_iter<I: IntoIterator<Item = Node<V>>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl<'a, V> IntoIterator for &'a Forest<V> {
    type Item = &'a Node<V>;
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
