// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type shared by diffing, patching, moving, and outline parsing.

use alloc::boxed::Box;

use thiserror::Error;

use crate::path::TreePath;

/// Failures reported by the fallible forest operations.
///
/// Low-level mutation primitives ([`Forest::insert`](crate::Forest::insert),
/// [`Forest::remove`](crate::Forest::remove), indexing) treat bad paths as
/// programmer errors and panic instead.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    /// A value occurs more than once in a forest passed to
    /// [`Difference::between`](crate::Difference::between).
    #[error("value at {path} also occurs earlier in the forest")]
    DuplicateValue {
        /// Path of the second occurrence.
        path: TreePath,
    },

    /// The parent named by a change is not in the forest being patched.
    #[error("parent of the change at depth {depth}, offset {offset} is not in the forest")]
    ParentNotFound {
        /// Depth recorded in the change.
        depth: usize,
        /// Offset recorded in the change.
        offset: usize,
    },

    /// An offset lies outside the sibling list it addresses.
    #[error("offset {offset} is out of bounds for {len} siblings")]
    OffsetOutOfBounds {
        /// The offending offset.
        offset: usize,
        /// Number of siblings at that position.
        len: usize,
    },

    /// A moved insert found no subtree stashed by its paired removal.
    #[error("no removed subtree is available for the move at depth {depth}, offset {offset}")]
    MissingMovedSubtree {
        /// Depth of the insert.
        depth: usize,
        /// Offset of the insert.
        offset: usize,
    },

    /// A path does not resolve to a node.
    #[error("no node at {path}")]
    PathOutOfBounds {
        /// The unresolved path.
        path: TreePath,
    },

    /// A move destination cannot be an insertion point.
    #[error("{path} is not a valid destination")]
    InvalidDestination {
        /// The rejected destination.
        path: TreePath,
    },

    /// A move would place a subtree inside itself.
    #[error("cannot move {moved} into its own subtree at {destination}")]
    MoveIntoOwnSubtree {
        /// The moved subtree.
        moved: Box<TreePath>,
        /// The requested destination.
        destination: Box<TreePath>,
    },

    /// Leading whitespace of an outline line is not a whole number of levels.
    #[error("line {line}: indentation is not a multiple of the indent width")]
    IndentMisaligned {
        /// One-based line number.
        line: usize,
    },

    /// An outline line is indented more than one level below the previous one.
    #[error("line {line}: depth {depth} skips a level (at most {max} allowed)")]
    IndentJump {
        /// One-based line number.
        line: usize,
        /// Depth found on the line.
        depth: usize,
        /// Deepest level allowed at that point.
        max: usize,
    },
}
