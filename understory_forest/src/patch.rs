// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Applying a [`Difference`] to a forest.

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashMap;

use crate::diff::{Change, ChangePosition, Difference};
use crate::error::TreeError;
use crate::forest::Forest;
use crate::node::Node;

impl<V: Clone + Eq + Hash> Forest<V> {
    /// The forest produced by applying `diff`, or `None` if any change does not
    /// fit; see [`Forest::try_applying`].
    pub fn applying(&self, diff: &Difference<V>) -> Option<Self> {
        self.try_applying(diff).ok()
    }

    /// Apply the changes of `diff` in order to a copy of `self`.
    ///
    /// - A removal finds its parent by value (the roots for `None`) and detaches
    ///   the child at its offset. If it is half of a move the detached subtree
    ///   is kept for the matching insertion.
    /// - An insertion of a moved value re-attaches the kept subtree; any other
    ///   insertion adds a fresh leaf.
    ///
    /// # Errors
    ///
    /// - [`TreeError::ParentNotFound`] if a parent value is not in the forest.
    /// - [`TreeError::OffsetOutOfBounds`] if an offset does not fit the
    ///   sibling list.
    /// - [`TreeError::MissingMovedSubtree`] if a moved insertion has no
    ///   matching removal before it.
    ///
    /// `self` is never modified.
    pub fn try_applying(&self, diff: &Difference<V>) -> Result<Self, TreeError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("forest_apply", changes = diff.len()).entered();

        let mut forest = self.clone();
        let mut stash: HashMap<V, Node<V>> = HashMap::new();
        for change in diff {
            let result = match change {
                Change::Remove {
                    position,
                    value,
                    associated,
                } => forest.remove_at(position).map(|node| {
                    if associated.is_some() {
                        stash.insert(value.clone(), node);
                    }
                }),
                Change::Insert {
                    position,
                    value,
                    associated,
                } => {
                    let node = if associated.is_some() {
                        stash
                            .remove(value)
                            .ok_or(TreeError::MissingMovedSubtree {
                                depth: position.depth,
                                offset: position.offset,
                            })
                    } else {
                        Ok(Node::new(value.clone()))
                    };
                    node.and_then(|node| forest.insert_at(position, node))
                }
            };
            if let Err(err) = result {
                #[cfg(feature = "tracing")]
                tracing::debug!(%err, "change does not apply");
                return Err(err);
            }
        }
        Ok(forest)
    }

    fn siblings_at(&mut self, position: &ChangePosition<V>) -> Result<&mut Vec<Node<V>>, TreeError> {
        let Some(parent) = &position.parent else {
            return Ok(&mut self.nodes);
        };
        let not_found = || TreeError::ParentNotFound {
            depth: position.depth,
            offset: position.offset,
        };
        let path = self.path_of(parent).ok_or_else(not_found)?;
        Ok(&mut self.get_mut(&path).ok_or_else(not_found)?.children)
    }

    fn remove_at(&mut self, position: &ChangePosition<V>) -> Result<Node<V>, TreeError> {
        let siblings = self.siblings_at(position)?;
        if position.offset >= siblings.len() {
            return Err(TreeError::OffsetOutOfBounds {
                offset: position.offset,
                len: siblings.len(),
            });
        }
        Ok(siblings.remove(position.offset))
    }

    fn insert_at(&mut self, position: &ChangePosition<V>, node: Node<V>) -> Result<(), TreeError> {
        let siblings = self.siblings_at(position)?;
        if position.offset > siblings.len() {
            return Err(TreeError::OffsetOutOfBounds {
                offset: position.offset,
                len: siblings.len(),
            });
        }
        siblings.insert(position.offset, node);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;

    fn outline(text: &str) -> Forest<String> {
        text.parse().unwrap()
    }

    fn assert_round_trip(old: &str, new: &str) {
        let (old, new) = (outline(old), outline(new));
        let diff = old.difference(&new).unwrap().inferring_moves();
        assert_eq!(old.applying(&diff), Some(new));
    }

    #[test]
    fn round_trips() {
        let cases = [
            ("", "A"),
            ("A", ""),
            ("A", "A\n  B"),
            ("A\n  B", "A"),
            ("A\nB", "B\nA"),
            ("A\n  B\n  C", "A\n  C\n  B"),
            ("A\n  B\nC", "A\nC\n  B"),
            ("A\n  B\n    C", "C\n  B\n    A"),
            ("A\n  B\n    C\nD", "D\n  A\n    B\n      C"),
            ("A\n  B\n  C\n  D\nE\n  F", "E\n  D\n  F\n  B\nA\n  C"),
            ("A\n  B\n    C\n    D\n  E", "A\n  E\n    D\n  B\n    C"),
            ("A\nB\nC\nD", "D\nC\nB\nA"),
            ("A\n  B\n    C\n      D", "X\n  A\n    Y\n      C\n        D"),
        ];
        for (old, new) in cases {
            assert_round_trip(old, new);
        }
    }

    #[test]
    fn nested_reorders_round_trip() {
        let sibling_adopts_subtree = (
            ["- A", "  - B", "  - C", "    - D", "    - E", "  - F"].join("\n"),
            ["- A", "  - B", "  - F", "    - C", "      - D", "  - G"].join("\n"),
        );
        let shuffled_with_pulled_up_leaf = (
            [
                "- A", "  - AA", "  - ACA", "  - ACC", "  - AB", "  - ACB", "  - AC",
                "    - ACD", "      - ACDB", "      - ACDC", "  - ACDA", "  - AD",
            ]
            .join("\n"),
            [
                "- A", "  - AA", "  - ACA", "  - ACB", "  - ACC", "  - AB", "  - AC",
                "    - ACD", "      - ACDA", "      - ACDB", "      - ACDC", "  - AD",
            ]
            .join("\n"),
        );
        for (old, new) in [sibling_adopts_subtree, shuffled_with_pulled_up_leaf] {
            assert_round_trip(&old, &new);
            assert_round_trip("", &new);
            assert_round_trip(&new, &old);
        }
    }

    #[test]
    fn moved_subtree_keeps_its_children() {
        let old = outline("A\n  B\n    C\n    D\nE");
        let new = outline("A\nE\n  B\n    C\n    D");
        let diff = old.difference(&new).unwrap().inferring_moves();
        assert_eq!(diff.len(), 2);
        assert_eq!(old.applying(&diff), Some(new));
    }

    #[test]
    fn missing_parent_fails_without_touching_input() {
        let old = outline("A\n  B");
        let new = outline("A\n  B\n    C");
        let diff = old.difference(&new).unwrap();
        let unrelated = outline("X");
        assert_eq!(
            unrelated.try_applying(&diff),
            Err(TreeError::ParentNotFound {
                depth: 2,
                offset: 0,
            })
        );
        assert_eq!(unrelated, outline("X"));
    }

    #[test]
    fn offset_out_of_bounds_fails() {
        let old = outline("A\nB\nC");
        let new = outline("A\nB");
        let diff = old.difference(&new).unwrap();
        assert_eq!(
            outline("A").try_applying(&diff),
            Err(TreeError::OffsetOutOfBounds { offset: 2, len: 1 })
        );
    }

    #[test]
    fn moved_insert_without_removal_fails() {
        let old = outline("A\n  B\nC");
        let new = outline("A\nC\n  B");
        let diff = old.difference(&new).unwrap().inferring_moves();
        let inserts_only = Difference::from_changes(diff.insertions().cloned().collect());
        assert_eq!(
            old.try_applying(&inserts_only),
            Err(TreeError::MissingMovedSubtree {
                depth: 1,
                offset: 0,
            })
        );
    }
}
