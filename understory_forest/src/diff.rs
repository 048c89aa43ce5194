// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural differences between forests.
//!
//! A [`Difference`] is an edit script of single-node [`Change`]s. Each change
//! names the affected sibling list by its parent's *value* rather than by path,
//! so the script stays meaningful while earlier changes shift paths around.
//! Values are the correlation key: within one forest every value must be
//! unique.

use alloc::vec::Vec;
use core::cmp::Ordering;
use core::hash::Hash;

use hashbrown::HashMap;

use crate::error::TreeError;
use crate::forest::Forest;
use crate::list_diff::{Edit, diff_sequences};

/// Where a change applies: the `offset`-th child of `parent`.
///
/// `parent` is `None` for the top-level list of the forest. `depth` counts the
/// ancestors of the affected node, so roots have depth 0.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChangePosition<V> {
    /// Value of the parent node, or `None` for the roots.
    pub parent: Option<V>,
    /// Number of ancestors of the affected node.
    pub depth: usize,
    /// Offset among the parent's children.
    pub offset: usize,
}

/// Whether a [`Change`] adds or deletes a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// The node is inserted.
    Insert,
    /// The node is removed.
    Remove,
}

/// A single-node edit.
///
/// A removal's position is valid against the old forest, an insertion's
/// against the new one. After [`Difference::inferring_moves`], a removal and
/// an insertion of the same value point at each other through `associated`,
/// which tells the patcher to carry the whole subtree across.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Change<V> {
    /// Remove the node holding `value` at `position`.
    Remove {
        /// Position in the old forest.
        position: ChangePosition<V>,
        /// Value of the removed node.
        value: V,
        /// Position of the paired insertion, for moves.
        associated: Option<ChangePosition<V>>,
    },
    /// Insert a node holding `value` at `position`.
    Insert {
        /// Position in the new forest.
        position: ChangePosition<V>,
        /// Value of the inserted node.
        value: V,
        /// Position of the paired removal, for moves.
        associated: Option<ChangePosition<V>>,
    },
}

impl<V> Change<V> {
    /// Insert or remove.
    pub fn kind(&self) -> ChangeKind {
        match self {
            Self::Insert { .. } => ChangeKind::Insert,
            Self::Remove { .. } => ChangeKind::Remove,
        }
    }

    /// Where the change applies.
    pub fn position(&self) -> &ChangePosition<V> {
        match self {
            Self::Insert { position, .. } | Self::Remove { position, .. } => position,
        }
    }

    /// The affected value.
    pub fn value(&self) -> &V {
        match self {
            Self::Insert { value, .. } | Self::Remove { value, .. } => value,
        }
    }

    /// Position of the paired change, if this change is half of a move.
    pub fn associated(&self) -> Option<&ChangePosition<V>> {
        match self {
            Self::Insert { associated, .. } | Self::Remove { associated, .. } => {
                associated.as_ref()
            }
        }
    }

    /// Returns `true` for insertions.
    pub fn is_insert(&self) -> bool {
        matches!(self, Self::Insert { .. })
    }

    /// Returns `true` for removals.
    pub fn is_remove(&self) -> bool {
        matches!(self, Self::Remove { .. })
    }

    fn associated_mut(&mut self) -> &mut Option<ChangePosition<V>> {
        match self {
            Self::Insert { associated, .. } | Self::Remove { associated, .. } => associated,
        }
    }
}

/// An ordered edit script turning one forest into another.
///
/// All removals come first, deepest and rightmost first; then all insertions,
/// shallowest and leftmost first. Applying the changes in this order never
/// invalidates a later change's position, and every inserted node's parent is
/// in place before the node arrives.
///
/// ## Example
///
/// ```rust
/// use understory_forest::{ChangeKind, Difference, Forest};
///
/// let old: Forest<String> = "A\n  B\nC".parse().unwrap();
/// let new: Forest<String> = "A\nC\n  B".parse().unwrap();
///
/// let diff = Difference::between(&old, &new).unwrap().inferring_moves();
/// let kinds: Vec<_> = diff.changes().iter().map(|c| c.kind()).collect();
/// assert_eq!(kinds, [ChangeKind::Remove, ChangeKind::Insert]);
/// assert!(diff.single_move().is_some());
/// assert_eq!(old.applying(&diff), Some(new));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Difference<V> {
    changes: Vec<Change<V>>,
}

impl<V> Default for Difference<V> {
    fn default() -> Self {
        Self {
            changes: Vec::new(),
        }
    }
}

impl<V> Difference<V> {
    /// Wrap a hand-written edit script. The changes are applied in the given
    /// order.
    pub fn from_changes(changes: Vec<Change<V>>) -> Self {
        Self { changes }
    }

    /// The changes, in application order.
    pub fn changes(&self) -> &[Change<V>] {
        &self.changes
    }

    /// Consume the difference, yielding its changes.
    pub fn into_changes(self) -> Vec<Change<V>> {
        self.changes
    }

    /// Number of changes.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Returns `true` if the two forests were equal.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// The insertions, in application order.
    pub fn insertions(&self) -> impl Iterator<Item = &Change<V>> {
        self.changes.iter().filter(|change| change.is_insert())
    }

    /// The removals, in application order.
    pub fn removals(&self) -> impl Iterator<Item = &Change<V>> {
        self.changes.iter().filter(|change| change.is_remove())
    }

    /// The `(from, to)` positions when this difference is exactly one linked
    /// removal and insertion, i.e. a single subtree moved.
    pub fn single_move(&self) -> Option<(&ChangePosition<V>, &ChangePosition<V>)> {
        let [remove, insert] = self.changes.as_slice() else {
            return None;
        };
        if !remove.is_remove() || !insert.is_insert() {
            return None;
        }
        remove.associated()?;
        insert.associated()?;
        Some((remove.position(), insert.position()))
    }
}

impl<V: Clone + Eq + Hash> Difference<V> {
    /// Compute the edit script from `old` to `new`.
    ///
    /// Every sibling list is compared with the list under the same parent
    /// value in the other forest using a shortest edit script. Lists whose
    /// parent exists only in `old` are removed wholesale (last child first),
    /// lists whose parent exists only in `new` are inserted wholesale.
    ///
    /// The result pairs nothing; call [`Difference::inferring_moves`] to turn
    /// matching removals and insertions into moves.
    ///
    /// # Errors
    ///
    /// [`TreeError::DuplicateValue`] if a value occurs twice in either forest.
    pub fn between(old: &Forest<V>, new: &Forest<V>) -> Result<Self, TreeError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "forest_difference",
            old_nodes = old.count(),
            new_nodes = new.count()
        )
        .entered();

        let old_lists = ChildLists::of(old)?;
        let new_lists = ChildLists::of(new)?;

        let mut ranked = Vec::new();
        for (rank, (parent, old_children, depth)) in old_lists.entries.iter().enumerate() {
            match new_lists.get(parent) {
                None => {
                    for (offset, value) in old_children.iter().enumerate().rev() {
                        ranked.push(Ranked::remove(*parent, *depth, offset, value, rank));
                    }
                }
                Some((new_children, new_depth, new_rank)) => {
                    for edit in diff_sequences(old_children, new_children) {
                        ranked.push(match edit {
                            Edit::Remove(offset) => {
                                Ranked::remove(*parent, *depth, offset, old_children[offset], rank)
                            }
                            Edit::Insert(offset) => Ranked::insert(
                                *parent,
                                new_depth,
                                offset,
                                new_children[offset],
                                new_rank,
                            ),
                        });
                    }
                }
            }
        }
        for (rank, (parent, new_children, depth)) in new_lists.entries.iter().enumerate() {
            if old_lists.get(parent).is_none() {
                for (offset, value) in new_children.iter().enumerate() {
                    ranked.push(Ranked::insert(*parent, *depth, offset, value, rank));
                }
            }
        }

        ranked.sort_by(Ranked::application_order);
        let changes: Vec<_> = ranked.into_iter().map(|r| r.change).collect();

        #[cfg(feature = "tracing")]
        tracing::debug!(changes = changes.len(), "difference computed");
        Ok(Self { changes })
    }

    /// Pair every removal with the insertion of the same value (and vice
    /// versa) by filling in `associated`.
    ///
    /// Order and membership of the changes are unchanged.
    #[must_use]
    pub fn inferring_moves(mut self) -> Self {
        let mut removed = HashMap::new();
        let mut inserted = HashMap::new();
        for change in &self.changes {
            let table = match change.kind() {
                ChangeKind::Remove => &mut removed,
                ChangeKind::Insert => &mut inserted,
            };
            table.insert(change.value().clone(), change.position().clone());
        }
        for change in &mut self.changes {
            let counterpart = match change.kind() {
                ChangeKind::Remove => inserted.get(change.value()),
                ChangeKind::Insert => removed.get(change.value()),
            };
            *change.associated_mut() = counterpart.cloned();
        }
        self
    }
}

impl<V: Clone + Eq + Hash> Forest<V> {
    /// The edit script from `self` to `new`; see [`Difference::between`].
    ///
    /// # Errors
    ///
    /// [`TreeError::DuplicateValue`] if a value occurs twice in either forest.
    pub fn difference(&self, new: &Self) -> Result<Difference<V>, TreeError> {
        Difference::between(self, new)
    }
}

impl<V> IntoIterator for Difference<V> {
    type Item = Change<V>;
    type IntoIter = alloc::vec::IntoIter<Change<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a Difference<V> {
    type Item = &'a Change<V>;
    type IntoIter = core::slice::Iter<'a, Change<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}

/// A node of `new` whose leaf state differs from what it was in `old`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LeafTransition<V> {
    /// The node's value.
    pub value: V,
    /// Whether the node is a leaf in `new`.
    pub is_leaf: bool,
}

/// Nodes of `new`, in pre-order, whose leaf state changed relative to `old`.
///
/// A value absent from `old` counts as having had children there, so every
/// freshly inserted leaf is reported too. Hosts use this to reload the rows
/// that gain or lose a disclosure control and to expand the ones that gained
/// children.
pub fn leaf_transitions<'a, V: Eq + Hash>(
    old: &Forest<V>,
    new: &'a Forest<V>,
) -> Vec<LeafTransition<&'a V>> {
    let was_leaf: HashMap<&V, bool> = old
        .iter()
        .map(|node| (&node.value, node.is_leaf()))
        .collect();
    new.iter()
        .filter(|node| was_leaf.get(&node.value).copied().unwrap_or(false) != node.is_leaf())
        .map(|node| LeafTransition {
            value: &node.value,
            is_leaf: node.is_leaf(),
        })
        .collect()
}

/// Per forest: every sibling list keyed by its parent's value, in pre-order of
/// the parents.
struct ChildLists<'a, V> {
    /// `(parent, children, depth of the children)`.
    entries: Vec<(Option<&'a V>, Vec<&'a V>, usize)>,
    index: HashMap<Option<&'a V>, usize>,
}

impl<'a, V: Eq + Hash> ChildLists<'a, V> {
    fn of(forest: &'a Forest<V>) -> Result<Self, TreeError> {
        let mut entries = Vec::with_capacity(forest.count() + 1);
        let mut index = HashMap::with_capacity(forest.count() + 1);
        entries.push((None, forest.nodes.iter().map(|n| &n.value).collect(), 0));
        index.insert(None, 0);
        for (path, node) in forest.iter_paths() {
            let key = Some(&node.value);
            if index.contains_key(&key) {
                #[cfg(feature = "tracing")]
                tracing::debug!(%path, "duplicate value");
                return Err(TreeError::DuplicateValue { path });
            }
            index.insert(key, entries.len());
            let children = node.children.iter().map(|n| &n.value).collect();
            entries.push((key, children, path.len()));
        }
        Ok(Self { entries, index })
    }

    /// Children, their depth, and the parent's rank.
    fn get(&self, parent: &Option<&'a V>) -> Option<(&[&'a V], usize, usize)> {
        let rank = *self.index.get(parent)?;
        let (_, children, depth) = &self.entries[rank];
        Some((children, *depth, rank))
    }
}

/// A change plus the pre-order rank of its parent, for tie-breaking.
struct Ranked<V> {
    change: Change<V>,
    rank: usize,
}

impl<V: Clone> Ranked<V> {
    fn remove(parent: Option<&V>, depth: usize, offset: usize, value: &V, rank: usize) -> Self {
        Self {
            change: Change::Remove {
                position: ChangePosition {
                    parent: parent.cloned(),
                    depth,
                    offset,
                },
                value: value.clone(),
                associated: None,
            },
            rank,
        }
    }

    fn insert(parent: Option<&V>, depth: usize, offset: usize, value: &V, rank: usize) -> Self {
        Self {
            change: Change::Insert {
                position: ChangePosition {
                    parent: parent.cloned(),
                    depth,
                    offset,
                },
                value: value.clone(),
                associated: None,
            },
            rank,
        }
    }
}

impl<V> Ranked<V> {
    fn application_order(a: &Self, b: &Self) -> Ordering {
        let (pa, pb) = (a.change.position(), b.change.position());
        match (a.change.kind(), b.change.kind()) {
            (ChangeKind::Remove, ChangeKind::Insert) => Ordering::Less,
            (ChangeKind::Insert, ChangeKind::Remove) => Ordering::Greater,
            (ChangeKind::Remove, ChangeKind::Remove) => (pb.depth, pb.offset)
                .cmp(&(pa.depth, pa.offset))
                .then(a.rank.cmp(&b.rank)),
            (ChangeKind::Insert, ChangeKind::Insert) => {
                (pa.depth, pa.offset, a.rank).cmp(&(pb.depth, pb.offset, b.rank))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec;

    use crate::node::Node;

    fn outline(text: &str) -> Forest<String> {
        text.parse().unwrap()
    }

    fn scenario_tree() -> Forest<String> {
        outline(
            "A
  AA
  AB
  AC
    ACA
    ACB
    ACC
    ACD
      ACDA
      ACDB
      ACDC
  AD",
        )
    }

    #[test]
    fn equal_forests_have_no_changes() {
        let tree = scenario_tree();
        assert!(Difference::between(&tree, &tree).unwrap().is_empty());
        let empty = Forest::<String>::new();
        assert!(empty.difference(&empty).unwrap().is_empty());
    }

    #[test]
    fn swapping_siblings_is_one_remove_and_one_insert() {
        let old = scenario_tree();
        let mut new = old.clone();
        let ac = new.path_of(&String::from("AC")).unwrap();
        new[&ac].children.swap(1, 2);

        let diff = Difference::between(&old, &new).unwrap().inferring_moves();
        assert_eq!(diff.len(), 2);
        assert_eq!(diff.removals().count(), 1);
        assert_eq!(diff.insertions().count(), 1);
        for change in &diff {
            assert_eq!(change.position().parent.as_deref(), Some("AC"));
            assert_eq!(change.position().depth, 2);
            assert!(change.associated().is_some());
        }
        assert_eq!(old.applying(&diff), Some(new));
    }

    #[test]
    fn building_from_nothing_inserts_parents_first() {
        let new = scenario_tree();
        let diff = Forest::new().difference(&new).unwrap().inferring_moves();
        assert_eq!(diff.len(), new.count());
        assert!(diff.changes().iter().all(|c| c.is_insert() && c.associated().is_none()));

        let position_of = |value: &String| {
            diff.changes()
                .iter()
                .position(|c| c.value() == value)
                .unwrap()
        };
        for change in &diff {
            if let Some(parent) = &change.position().parent {
                assert!(position_of(parent) < position_of(change.value()));
            }
        }
        assert_eq!(Forest::new().applying(&diff), Some(new));
    }

    #[test]
    fn emptying_a_forest_removes_the_roots() {
        let old = outline("A\n  B\nC");
        let diff = old.difference(&Forest::new()).unwrap();
        let values: Vec<_> = diff.changes().iter().map(|c| c.value().as_str()).collect();
        // B first: deeper lists are emptied before their parents go.
        assert_eq!(values, ["B", "C", "A"]);
        assert!(old.applying(&diff).unwrap().is_empty());
    }

    #[test]
    fn leaf_moved_to_another_parent_is_one_linked_pair() {
        let old = outline("A\n  B\n  C\nD\n  E");
        let new = outline("A\n  B\nD\n  E\n  C");
        let diff = old.difference(&new).unwrap().inferring_moves();
        let (from, to) = diff.single_move().unwrap();
        assert_eq!(
            from,
            &ChangePosition {
                parent: Some(String::from("A")),
                depth: 1,
                offset: 1,
            }
        );
        assert_eq!(
            to,
            &ChangePosition {
                parent: Some(String::from("D")),
                depth: 1,
                offset: 1,
            }
        );
        assert_eq!(old.applying(&diff), Some(new));
    }

    #[test]
    fn moves_are_unlinked_until_inferred() {
        let old = outline("A\n  B\nC");
        let new = outline("A\nC\n  B");
        let diff = old.difference(&new).unwrap();
        assert!(diff.single_move().is_none());
        assert!(diff.changes().iter().all(|c| c.associated().is_none()));
        let moves = diff.clone().inferring_moves();
        assert_eq!(moves.len(), diff.len());
        assert!(moves.single_move().is_some());
    }

    #[test]
    fn order_is_removes_deepest_first_then_inserts_shallowest_first() {
        let old = outline("A\n  B\n    C\n  D\nE\n  F");
        let new = outline("G\n  H\nE\n  I\n    J");
        let diff = old.difference(&new).unwrap();
        let first_insert = diff.changes().iter().position(Change::is_insert).unwrap();
        assert!(diff.changes()[..first_insert].iter().all(Change::is_remove));
        assert!(diff.changes()[first_insert..].iter().all(Change::is_insert));

        let key = |c: &Change<String>| (c.position().depth, c.position().offset);
        for pair in diff.changes()[..first_insert].windows(2) {
            assert!(key(&pair[0]) >= key(&pair[1]));
        }
        for pair in diff.changes()[first_insert..].windows(2) {
            assert!(key(&pair[0]) <= key(&pair[1]));
        }
        assert_eq!(old.applying(&diff.inferring_moves()), Some(new));
    }

    #[test]
    fn ties_follow_parent_pre_order() {
        let old = outline("A\n  X\nB\n  Y");
        let new = outline("A\nB");
        let diff = old.difference(&new).unwrap();
        let values: Vec<_> = diff.changes().iter().map(|c| c.value().as_str()).collect();
        assert_eq!(values, ["X", "Y"]);
    }

    #[test]
    fn duplicates_are_rejected() {
        let dup = Forest::from(vec![
            Node::with_children("A", [Node::new("B")]),
            Node::new("B"),
        ]);
        let clean = Forest::from(vec![Node::new("A")]);
        assert_eq!(
            Difference::between(&dup, &clean),
            Err(TreeError::DuplicateValue {
                path: crate::TreePath::from([1]),
            })
        );
        assert!(Difference::between(&clean, &dup).is_err());
    }

    #[test]
    fn leaf_transitions_report_changed_disclosure() {
        let old = outline("A\n  B\nC");
        let new = outline("A\nC\n  B\nD");
        let transitions = leaf_transitions(&old, &new);
        let expected = [
            LeafTransition {
                value: &String::from("A"),
                is_leaf: true,
            },
            LeafTransition {
                value: &String::from("C"),
                is_leaf: false,
            },
            LeafTransition {
                value: &String::from("D"),
                is_leaf: true,
            },
        ];
        assert_eq!(transitions, expected);
    }
}
