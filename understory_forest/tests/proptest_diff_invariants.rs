// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property-based invariant tests for differences and patches.
//!
//! 1. Applying the move-inferred difference reproduces the new forest.
//! 2. A forest has no difference with itself.
//! 3. From an empty forest: one unlinked insertion per node, parents first.
//! 4. Removals precede insertions; removals descend and insertions ascend in
//!    (depth, offset), strictly within one parent.
//! 5. Move links are symmetric and pair equal values.
//! 6. Leaf transitions report exactly the nodes whose leaf state changed.
//! 7. Determinism: the same inputs give the same difference.

use std::collections::HashMap;

use proptest::prelude::*;
use understory_forest::{Change, ChangeKind, Difference, Forest, Node, TreePath, leaf_transitions};

// ── Helpers ─────────────────────────────────────────────────────────────

/// Attach `values[i]` under the node chosen by `hints[i]` among the nodes
/// already placed (or as a new root), always as the last child.
fn forest_from(values: &[u32], hints: &[usize]) -> Forest<u32> {
    let mut forest = Forest::new();
    let mut paths: Vec<TreePath> = Vec::new();
    for (i, (&value, &hint)) in values.iter().zip(hints).enumerate() {
        let choice = hint % (i + 1);
        let path = if choice == 0 {
            TreePath::from([forest.len()])
        } else {
            let parent = &paths[choice - 1];
            parent.child(forest[parent].children.len())
        };
        forest.insert(&path, Node::new(value));
        paths.push(path);
    }
    forest
}

/// Forests over a shared pool of values so that old and new overlap.
fn forest_strategy() -> impl Strategy<Value = Forest<u32>> {
    proptest::sample::subsequence((0..14_u32).collect::<Vec<_>>(), 0..=14)
        .prop_shuffle()
        .prop_flat_map(|values| {
            let len = values.len();
            (Just(values), proptest::collection::vec(any::<usize>(), len))
        })
        .prop_map(|(values, hints)| forest_from(&values, &hints))
}

fn key(change: &Change<u32>) -> (usize, usize) {
    (change.position().depth, change.position().offset)
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Round trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn applying_difference_reproduces_new(old in forest_strategy(), new in forest_strategy()) {
        let diff = Difference::between(&old, &new).unwrap().inferring_moves();
        let patched = old.applying(&diff);
        prop_assert_eq!(patched.as_ref(), Some(&new), "diff: {:?}", diff);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Identity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn difference_with_self_is_empty(forest in forest_strategy()) {
        let diff = forest.difference(&forest).unwrap();
        prop_assert!(diff.is_empty(), "unexpected changes: {:?}", diff);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Empty source
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn building_from_empty_inserts_parents_first(forest in forest_strategy()) {
        let diff = Forest::new().difference(&forest).unwrap().inferring_moves();
        prop_assert_eq!(diff.len(), forest.count());
        prop_assert!(diff.changes().iter().all(|c| c.is_insert() && c.associated().is_none()));

        let order: HashMap<u32, usize> = diff
            .changes()
            .iter()
            .enumerate()
            .map(|(i, c)| (*c.value(), i))
            .collect();
        for change in &diff {
            if let Some(parent) = change.position().parent {
                prop_assert!(order[&parent] < order[change.value()]);
            }
        }
        prop_assert_eq!(Forest::new().applying(&diff), Some(forest));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Ordering
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn changes_follow_application_order(old in forest_strategy(), new in forest_strategy()) {
        let diff = Difference::between(&old, &new).unwrap();
        let changes = diff.changes();
        let split = changes.iter().position(Change::is_insert).unwrap_or(changes.len());
        prop_assert!(changes[..split].iter().all(Change::is_remove));
        prop_assert!(changes[split..].iter().all(Change::is_insert));

        for pair in changes[..split].windows(2) {
            prop_assert!(key(&pair[0]) >= key(&pair[1]));
            if pair[0].position().parent == pair[1].position().parent {
                prop_assert!(pair[0].position().offset > pair[1].position().offset);
            }
        }
        for pair in changes[split..].windows(2) {
            prop_assert!(key(&pair[0]) <= key(&pair[1]));
            if pair[0].position().parent == pair[1].position().parent {
                prop_assert!(pair[0].position().offset < pair[1].position().offset);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Move links
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn move_links_pair_equal_values(old in forest_strategy(), new in forest_strategy()) {
        let diff = Difference::between(&old, &new).unwrap().inferring_moves();
        let by_kind: HashMap<(ChangeKind, u32), &Change<u32>> = diff
            .changes()
            .iter()
            .map(|c| ((c.kind(), *c.value()), c))
            .collect();
        prop_assert_eq!(by_kind.len(), diff.len(), "a value changes twice the same way");

        for change in &diff {
            let opposite = match change.kind() {
                ChangeKind::Insert => ChangeKind::Remove,
                ChangeKind::Remove => ChangeKind::Insert,
            };
            let counterpart = by_kind.get(&(opposite, *change.value()));
            prop_assert_eq!(change.associated(), counterpart.map(|c| c.position()));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Leaf transitions
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn leaf_transitions_match_leaf_state(old in forest_strategy(), new in forest_strategy()) {
        let was_leaf: HashMap<u32, bool> = old.iter().map(|n| (n.value, n.is_leaf())).collect();
        let expected: Vec<(u32, bool)> = new
            .iter()
            .filter(|n| was_leaf.get(&n.value).copied().unwrap_or(false) != n.is_leaf())
            .map(|n| (n.value, n.is_leaf()))
            .collect();
        let actual: Vec<(u32, bool)> = leaf_transitions(&old, &new)
            .into_iter()
            .map(|t| (*t.value, t.is_leaf))
            .collect();
        prop_assert_eq!(actual, expected);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Determinism
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn difference_is_deterministic(old in forest_strategy(), new in forest_strategy()) {
        let first = Difference::between(&old, &new).unwrap();
        let second = Difference::between(&old.clone(), &new.clone()).unwrap();
        prop_assert_eq!(first, second);
    }
}
