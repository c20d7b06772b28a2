//! Internal (routing) nodes.

use crate::common::NodeId;

/// An internal node: separator keys plus the ids of its children.
///
/// `children.len() == keys.len() + 1` always holds once a node is part of
/// the tree. Every key under `children[i]` is `< keys[i]` and `>= keys[i - 1]`.
#[derive(Debug, Clone)]
pub(crate) struct InternalNode<K> {
    pub(crate) keys: Vec<K>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
}

impl<K: Ord> InternalNode<K> {
    /// A node with a single separator and two children. Used for a new root.
    pub(crate) fn with_children(key: K, left: NodeId, right: NodeId) -> Self {
        Self {
            keys: vec![key],
            children: vec![left, right],
            parent: None,
        }
    }

    /// Index of the first separator strictly greater than `key`, or
    /// `keys.len()` if there is none. This is also the child index to descend into.
    #[inline]
    pub(crate) fn route(&self, key: &K) -> usize {
        self.keys.partition_point(|k| k <= key)
    }

    #[inline]
    pub(crate) fn child_for(&self, key: &K) -> NodeId {
        self.children[self.route(key)]
    }

    /// Position of `child` among this node's children.
    pub(crate) fn position_of(&self, child: NodeId) -> Option<usize> {
        self.children.iter().position(|&c| c == child)
    }

    /// Inserts the separator produced by splitting `right`.
    ///
    /// `right` keeps its slot; `left` is placed just before it and `key`
    /// lands at its sorted position between them.
    pub(crate) fn insert_separator(&mut self, key: K, left: NodeId, right: NodeId) {
        let index = self.route(&key);
        debug_assert_eq!(self.children[index], right);
        self.keys.insert(index, key);
        self.children.insert(index, left);
    }

    /// Removes the child at `index` together with one separator and returns both.
    ///
    /// A node with n keys has n + 1 children, so removing the last child
    /// removes the key just before it.
    pub(crate) fn remove_entry(&mut self, index: usize) -> (K, NodeId) {
        debug_assert!(!self.keys.is_empty());
        let child = self.children.remove(index);
        let key = if index < self.keys.len() {
            self.keys.remove(index)
        } else {
            self.keys.remove(index - 1)
        };
        (key, child)
    }

    /// Removes the smallest key and the leftmost child.
    pub(crate) fn pop_first(&mut self) -> Option<(K, NodeId)> {
        if self.keys.is_empty() {
            return None;
        }
        Some((self.keys.remove(0), self.children.remove(0)))
    }

    /// Removes the largest key and the rightmost child.
    pub(crate) fn pop_last(&mut self) -> Option<(K, NodeId)> {
        let key = self.keys.pop()?;
        let child = self.children.pop()?;
        Some((key, child))
    }

    /// Moves the lower half of this node into a new left sibling.
    ///
    /// Keys below `mid` and children up to and including `mid` go left; the
    /// key at `mid` is removed and returned for the parent. The caller must
    /// re-parent the moved children.
    pub(crate) fn split_off_left(&mut self) -> (K, InternalNode<K>) {
        let mid = self.keys.len() / 2;
        let left_keys: Vec<K> = self.keys.drain(..mid).collect();
        let promoted = self.keys.remove(0);
        let left_children: Vec<NodeId> = self.children.drain(..=mid).collect();

        let left = InternalNode {
            keys: left_keys,
            children: left_children,
            parent: self.parent,
        };
        (promoted, left)
    }
}
