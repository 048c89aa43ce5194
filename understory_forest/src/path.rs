// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural addresses into a forest.

use core::fmt;

use smallvec::SmallVec;

/// Position of a node, expressed as the child offset taken at each level
/// while descending from the top of a [`Forest`](crate::Forest) (or from a
/// [`Node`](crate::Node)).
///
/// Paths are totally ordered in pre-order: offsets are compared
/// lexicographically, and when one path is a prefix of the other the shorter
/// one sorts first, so an ancestor precedes its descendants.
///
/// A path is a coordinate, not a handle. Inserting or removing a sibling of
/// any ancestor shifts the coordinates of everything after it.
///
/// ```rust
/// use understory_forest::TreePath;
///
/// let a = TreePath::from([0, 2]);
/// let b = TreePath::from([0, 2, 0]);
/// let c = TreePath::from([1]);
/// assert!(a < b && b < c);
/// assert_eq!(b.parent(), a);
/// assert_eq!(a.child(0), b);
/// ```
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TreePath(SmallVec<[usize; 4]>);

impl TreePath {
    /// The empty path.
    ///
    /// For a [`Node`](crate::Node) it addresses the node itself; a
    /// [`Forest`](crate::Forest) has no node at the empty path.
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    /// Offsets from the top level down to the addressed node.
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Number of offsets in the path.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for the empty path.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Depth of the addressed node; roots of a forest have depth `0`.
    ///
    /// Returns `None` for the empty path.
    pub fn depth(&self) -> Option<usize> {
        self.0.len().checked_sub(1)
    }

    /// Offset of the addressed node within its parent's children.
    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Path of the parent. The parent of a root (or of the empty path) is the
    /// empty path.
    #[must_use]
    pub fn parent(&self) -> Self {
        let mut parent = self.clone();
        parent.0.pop();
        parent
    }

    /// Path of the child at `offset` below this path.
    #[must_use]
    pub fn child(&self, offset: usize) -> Self {
        let mut child = self.clone();
        child.0.push(offset);
        child
    }

    /// Path of the sibling at `offset`, sharing this path's parent.
    ///
    /// # Panics
    ///
    /// Panics on the empty path, which has no siblings.
    #[must_use]
    pub fn sibling(&self, offset: usize) -> Self {
        let mut sibling = self.clone();
        let last = sibling
            .0
            .last_mut()
            .expect("the empty path has no siblings");
        *last = offset;
        sibling
    }

    /// Append an offset in place.
    pub fn push(&mut self, offset: usize) {
        self.0.push(offset);
    }

    /// Remove and return the last offset.
    pub fn pop(&mut self) -> Option<usize> {
        self.0.pop()
    }

    /// Returns `true` if `self` is a prefix of `other` (or equal to it).
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        other.0.starts_with(&self.0)
    }

    /// Returns `true` if `self` addresses a strict ancestor of `other`.
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        self.len() < other.len() && self.is_prefix_of(other)
    }

    /// Prefix every offset of `self` with `offset`.
    pub(crate) fn prepend(&mut self, offset: usize) {
        self.0.insert(0, offset);
    }

    /// The path with its first offset dropped.
    pub(crate) fn tail(&self) -> Self {
        Self(self.0.iter().skip(1).copied().collect())
    }
}

impl fmt::Debug for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, offset) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{offset}")?;
        }
        f.write_str("]")
    }
}

impl<const N: usize> From<[usize; N]> for TreePath {
    fn from(offsets: [usize; N]) -> Self {
        Self(offsets.iter().copied().collect())
    }
}

impl From<&[usize]> for TreePath {
    fn from(offsets: &[usize]) -> Self {
        Self(SmallVec::from_slice(offsets))
    }
}

impl From<alloc::vec::Vec<usize>> for TreePath {
    fn from(offsets: alloc::vec::Vec<usize>) -> Self {
        Self(SmallVec::from_vec(offsets))
    }
}

impl FromIterator<usize> for TreePath {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl AsRef<[usize]> for TreePath {
    fn as_ref(&self) -> &[usize] {
        &self.0
    }
}
