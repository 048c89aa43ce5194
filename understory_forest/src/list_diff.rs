// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Myers shortest-edit-script diff over flat sequences.

use alloc::vec;
use alloc::vec::Vec;

/// One step of an edit script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Edit {
    /// Remove the element at this offset of the old sequence.
    Remove(usize),
    /// Insert the element at this offset of the new sequence.
    Insert(usize),
}

/// Minimal edit script turning `old` into `new`.
///
/// Removals carry offsets into `old`, insertions offsets into `new`; both
/// ascend within the returned script.
pub(crate) fn diff_sequences<T: PartialEq>(old: &[T], new: &[T]) -> Vec<Edit> {
    let prefix = old
        .iter()
        .zip(new)
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();
    let old_mid = &old[prefix..old.len() - suffix];
    let new_mid = &new[prefix..new.len() - suffix];

    let mut edits = myers(old_mid, new_mid);
    for edit in &mut edits {
        match edit {
            Edit::Remove(offset) | Edit::Insert(offset) => *offset += prefix,
        }
    }
    edits
}

fn myers<T: PartialEq>(old: &[T], new: &[T]) -> Vec<Edit> {
    if old.is_empty() {
        return (0..new.len()).map(Edit::Insert).collect();
    }
    if new.is_empty() {
        return (0..old.len()).map(Edit::Remove).collect();
    }

    let n = old.len() as isize;
    let m = new.len() as isize;
    let max = n + m;
    let at = |k: isize| (k + max) as usize;

    // `frontier[k]` is the furthest x reached on diagonal k; one snapshot per
    // edit distance for backtracking.
    let mut frontier = vec![0_isize; 2 * max as usize + 2];
    let mut trace = Vec::new();
    'search: for d in 0..=max {
        trace.push(frontier.clone());
        for k in (-d..=d).step_by(2) {
            let mut x = if k == -d || (k != d && frontier[at(k - 1)] < frontier[at(k + 1)]) {
                frontier[at(k + 1)]
            } else {
                frontier[at(k - 1)] + 1
            };
            let mut y = x - k;
            while x < n && y < m && old[x as usize] == new[y as usize] {
                x += 1;
                y += 1;
            }
            frontier[at(k)] = x;
            if x >= n && y >= m {
                break 'search;
            }
        }
    }

    let mut edits = Vec::new();
    let (mut x, mut y) = (n, m);
    for (d, snapshot) in trace.iter().enumerate().rev() {
        let d = d as isize;
        let k = x - y;
        let prev_k = if k == -d || (k != d && snapshot[at(k - 1)] < snapshot[at(k + 1)]) {
            k + 1
        } else {
            k - 1
        };
        let prev_x = snapshot[at(prev_k)];
        let prev_y = prev_x - prev_k;
        while x > prev_x && y > prev_y {
            x -= 1;
            y -= 1;
        }
        if d > 0 {
            if x == prev_x {
                edits.push(Edit::Insert(prev_y as usize));
            } else {
                edits.push(Edit::Remove(prev_x as usize));
            }
        }
        x = prev_x;
        y = prev_y;
    }
    edits.reverse();
    edits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(old: &[char], new: &[char], edits: &[Edit]) -> Vec<char> {
        let mut result = old.to_vec();
        for edit in edits.iter().rev() {
            if let Edit::Remove(offset) = edit {
                result.remove(*offset);
            }
        }
        for edit in edits {
            if let Edit::Insert(offset) = edit {
                result.insert(*offset, new[*offset]);
            }
        }
        result
    }

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn identical_sequences_need_no_edits() {
        let a = chars("abcdef");
        assert!(diff_sequences(&a, &a).is_empty());
        assert!(diff_sequences::<char>(&[], &[]).is_empty());
    }

    #[test]
    fn empty_sides() {
        let a = chars("abc");
        assert_eq!(
            diff_sequences(&[], &a),
            [Edit::Insert(0), Edit::Insert(1), Edit::Insert(2)]
        );
        assert_eq!(
            diff_sequences(&a, &[]),
            [Edit::Remove(0), Edit::Remove(1), Edit::Remove(2)]
        );
    }

    #[test]
    fn swap_is_one_remove_and_one_insert() {
        let old = chars("abc");
        let new = chars("acb");
        let edits = diff_sequences(&old, &new);
        assert_eq!(edits.len(), 2);
        assert_eq!(apply(&old, &new, &edits), new);
    }

    #[test]
    fn classic_example_is_minimal() {
        let old = chars("abcabba");
        let new = chars("cbabac");
        let edits = diff_sequences(&old, &new);
        assert_eq!(edits.len(), 5);
        assert_eq!(apply(&old, &new, &edits), new);
    }

    #[test]
    fn offsets_ascend_per_kind() {
        let old = chars("xaybzc");
        let new = chars("aqbcr");
        let edits = diff_sequences(&old, &new);
        assert_eq!(apply(&old, &new, &edits), new);
        let removes: Vec<_> = edits
            .iter()
            .filter_map(|e| match e {
                Edit::Remove(o) => Some(*o),
                Edit::Insert(_) => None,
            })
            .collect();
        assert!(removes.windows(2).all(|w| w[0] < w[1]));
    }
}
