// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diff, patch, and move: `understory_forest` driving an outline view.
//!
//! This example shows how a host would:
//! - compute the changes between two snapshots of its model,
//! - replay them (here against the old snapshot, standing in for the view),
//! - refresh rows whose disclosure state changed,
//! - perform a drag-and-drop of several rows at once.
//!
//! Run:
//! - `cargo run -p understory_demos --example outline_diff`

use understory_forest::{
    Change, ChangePosition, Difference, Forest, OutlineFormat, TreePath, leaf_transitions,
};

fn describe(position: &ChangePosition<String>) -> String {
    let parent = position.parent.as_deref().unwrap_or("<top>");
    format!("{parent}[{}] (depth {})", position.offset, position.depth)
}

fn main() {
    let old: Forest<String> = "
- Projects
  - Garden
    - Beds
    - Compost
  - Kitchen
- Someday
  - Shed
"
    .parse()
    .expect("valid outline");

    let new: Forest<String> = "
- Projects
  - Kitchen
    - Tiles
  - Shed
- Someday
  - Garden
    - Beds
    - Compost
"
    .parse()
    .expect("valid outline");

    let diff = Difference::between(&old, &new)
        .expect("values are unique")
        .inferring_moves();

    println!("== changes ({}) ==", diff.len());
    for change in &diff {
        let verb = match change {
            Change::Remove { .. } if change.associated().is_some() => "move out",
            Change::Remove { .. } => "remove",
            Change::Insert { .. } if change.associated().is_some() => "move in",
            Change::Insert { .. } => "insert",
        };
        println!("{verb:>8} {:<8} at {}", change.value(), describe(change.position()));
    }

    let patched = old.applying(&diff).expect("difference applies to its source");
    assert_eq!(patched, new);
    println!("\n== patched ==\n{}", patched.outline(&OutlineFormat::default()));

    println!("== rows to reload ==");
    for transition in leaf_transitions(&old, &new) {
        let state = if transition.is_leaf { "collapsed to leaf" } else { "expand" };
        println!("{:<8} {state}", transition.value);
    }

    // Drag "Beds" and "Shed" to the front of Someday.
    let beds = new.path_of(&"Beds".to_string()).expect("present");
    let shed = new.path_of(&"Shed".to_string()).expect("present");
    let someday = new.path_of(&"Someday".to_string()).expect("present");
    let moved = new
        .moving(&[shed.clone(), beds.clone()], &someday.child(0))
        .expect("destination outside the moved rows");
    println!(
        "\n== after moving {beds} and {shed} to {} ==\n{}",
        someday.child(0),
        moved.outline(&OutlineFormat::default().with_bullet(""))
    );

    // A row cannot be dropped inside itself.
    let garden = moved.path_of(&"Garden".to_string()).expect("present");
    assert!(moved.moving(std::slice::from_ref(&garden), &garden.child(0)).is_none());
    assert!(moved.moving(&[TreePath::from([9])], &TreePath::from([0])).is_none());
}
