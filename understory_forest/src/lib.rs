// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_forest --heading-base-level=0

//! Understory Forest: ordered trees addressed by path, with structural diffs and patches.
//!
//! ## Overview
//!
//! This crate is the value model behind an outline view.
//! A [`Forest`] is an ordered list of [`Node`]s, each holding a value and an ordered list of children.
//! Nodes are addressed by [`TreePath`]: the child offsets from the top level down to the node.
//! Paths compare lexicographically, which is exactly pre-order.
//!
//! It does not draw anything or track widget identity.
//! Hosts keep their own value → row tables and feed the results of this crate to their toolkit.
//!
//! ## Paths
//!
//! - `[2]` is the third root; `[2, 0]` is its first child.
//! - [`Forest::start_path`] is `[0]` and [`Forest::end_path`] is `[len]`.
//!   For a single [`Node`], paths are relative and the node itself is `[]`.
//! - [`Forest::path_after`] and [`Forest::path_before`] step through pre-order;
//!   [`Forest::iter_paths`] walks it in both directions.
//!
//! ## Editing
//!
//! Primitives ([`Forest::insert`], [`Forest::remove`], [`Forest::set`], indexing) behave like their `Vec`
//! counterparts and panic on paths that do not resolve.
//! [`Forest::try_move`] relocates several subtrees at once and reports failure instead,
//! leaving the forest untouched.
//!
//! ## Differences
//!
//! [`Difference::between`] compares two forests sibling list by sibling list.
//! Every [`Change`] names its list by the parent's value, so values must be unique within a forest.
//! [`Difference::inferring_moves`] pairs the removal and insertion of the same value into a move,
//! and [`Forest::applying`] replays the script:
//!
//! ```rust
//! use understory_forest::{Difference, Forest};
//!
//! let old: Forest<String> = "
//! - Inbox
//!   - Draft
//! - Archive
//! ".parse().unwrap();
//! let new: Forest<String> = "
//! - Inbox
//! - Archive
//!   - Draft
//! ".parse().unwrap();
//!
//! let diff = Difference::between(&old, &new).unwrap().inferring_moves();
//! let (from, to) = diff.single_move().unwrap();
//! assert_eq!(from.parent.as_deref(), Some("Inbox"));
//! assert_eq!(to.parent.as_deref(), Some("Archive"));
//! assert_eq!(old.applying(&diff), Some(new));
//! ```
//!
//! Removals are ordered deepest first and insertions shallowest first, so a host can replay the
//! changes one by one against its own view and stay in sync.
//! [`leaf_transitions`] lists the rows whose disclosure state changed.
//!
//! ## Building
//!
//! Literal trees come from [`ForestBuilder`] closures, [`Node::with_children`], or the indented
//! outline notation in [`parse_outline`] / [`to_outline`].
//!
//! ## Features
//!
//! - `std`: enables `std` support in dependencies.
//! - `tracing`: emits `tracing` spans around diffing, patching, and moves.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod builder;
mod diff;
mod error;
mod forest;
mod iter;
mod list_diff;
mod node;
mod outline;
mod patch;
mod path;
mod walk;

pub use builder::ForestBuilder;
pub use diff::{Change, ChangeKind, ChangePosition, Difference, LeafTransition, leaf_transitions};
pub use error::TreeError;
pub use forest::Forest;
pub use iter::{Iter, PathIter};
pub use node::Node;
pub use outline::{Outline, OutlineFormat, parse_outline, to_outline};
pub use path::TreePath;
