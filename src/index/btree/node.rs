//! The node sum type.

use super::internal::InternalNode;
use super::leaf::LeafNode;
use crate::common::NodeId;

/// Either kind of node stored in the arena.
///
/// The orchestrator works against this type; only the restructuring
/// primitives look inside the variants.
#[derive(Debug, Clone)]
pub(crate) enum Node<K, V> {
    Internal(InternalNode<K>),
    Leaf(LeafNode<K, V>),
}

impl<K, V> Node<K, V> {
    /// Number of keys (separators for internal nodes).
    #[inline]
    pub(crate) fn len(&self) -> usize {
        match self {
            Node::Internal(node) => node.keys.len(),
            Node::Leaf(leaf) => leaf.keys.len(),
        }
    }

    #[inline]
    pub(crate) fn keys(&self) -> &[K] {
        match self {
            Node::Internal(node) => &node.keys,
            Node::Leaf(leaf) => &leaf.keys,
        }
    }

    #[inline]
    pub(crate) fn parent(&self) -> Option<NodeId> {
        match self {
            Node::Internal(node) => node.parent,
            Node::Leaf(leaf) => leaf.parent,
        }
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, parent: Option<NodeId>) {
        match self {
            Node::Internal(node) => node.parent = parent,
            Node::Leaf(leaf) => leaf.parent = parent,
        }
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    pub(crate) fn as_leaf(&self) -> Option<&LeafNode<K, V>> {
        match self {
            Node::Leaf(leaf) => Some(leaf),
            Node::Internal(_) => None,
        }
    }

    pub(crate) fn as_leaf_mut(&mut self) -> Option<&mut LeafNode<K, V>> {
        match self {
            Node::Leaf(leaf) => Some(leaf),
            Node::Internal(_) => None,
        }
    }

    pub(crate) fn as_internal(&self) -> Option<&InternalNode<K>> {
        match self {
            Node::Internal(node) => Some(node),
            Node::Leaf(_) => None,
        }
    }

    pub(crate) fn as_internal_mut(&mut self) -> Option<&mut InternalNode<K>> {
        match self {
            Node::Internal(node) => Some(node),
            Node::Leaf(_) => None,
        }
    }
}
