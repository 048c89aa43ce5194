// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Closure-based construction of literal trees.

use alloc::vec::Vec;

use crate::forest::Forest;
use crate::node::Node;

/// Collects sibling subtrees for [`Forest::build`] and [`Node::build`].
///
/// ```rust
/// use understory_forest::Forest;
///
/// let forest = Forest::build(|b| {
///     b.node("fruit", |b| {
///         b.leaf("apple").leaf("pear");
///     });
///     b.leaf("bread");
/// });
/// assert_eq!(forest.count(), 4);
/// assert_eq!(forest.nodes[0].children.len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct ForestBuilder<V> {
    nodes: Vec<Node<V>>,
}

impl<V> Default for ForestBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> ForestBuilder<V> {
    /// An empty builder.
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Append a childless node.
    pub fn leaf(&mut self, value: V) -> &mut Self {
        self.push(Node::new(value))
    }

    /// Append a node whose children are added by `children`.
    pub fn node(&mut self, value: V, children: impl FnOnce(&mut Self)) -> &mut Self {
        self.push(Node::build(value, children))
    }

    /// Append a ready-made subtree.
    pub fn push(&mut self, node: Node<V>) -> &mut Self {
        self.nodes.push(node);
        self
    }

    /// Append several ready-made subtrees.
    pub fn extend(&mut self, nodes: impl IntoIterator<Item = Node<V>>) -> &mut Self {
        self.nodes.extend(nodes);
        self
    }

    /// The collected siblings as a forest.
    pub fn build(self) -> Forest<V> {
        Forest::from(self.nodes)
    }
}

impl<V> Forest<V> {
    /// Build a forest by appending roots inside `roots`.
    pub fn build(roots: impl FnOnce(&mut ForestBuilder<V>)) -> Self {
        let mut builder = ForestBuilder::new();
        roots(&mut builder);
        builder.build()
    }
}

impl<V> Node<V> {
    /// Build a node by appending its children inside `children`.
    pub fn build(value: V, children: impl FnOnce(&mut ForestBuilder<V>)) -> Self {
        let mut builder = ForestBuilder::new();
        children(&mut builder);
        Self {
            value,
            children: builder.nodes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn nested_closures_match_literal_nodes() {
        let built = Forest::build(|b| {
            b.node(1, |b| {
                b.leaf(2).node(3, |b| {
                    b.leaf(4);
                });
            });
            b.extend([Node::new(5), Node::new(6)]);
        });
        let literal = Forest::from(vec![
            Node::with_children(1, [Node::new(2), Node::with_children(3, [Node::new(4)])]),
            Node::new(5),
            Node::new(6),
        ]);
        assert_eq!(built, literal);
    }

    #[test]
    fn node_build_without_children_is_a_leaf() {
        let node = Node::build("A", |_| {});
        assert!(node.is_leaf());
        assert!(Forest::<u8>::build(|_| {}).is_empty());
    }
}
