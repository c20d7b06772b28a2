//! Split, borrow and fusion primitives.
//!
//! Each primitive dispatches on the [`Node`] variant and fully restores the
//! parent/child and leaf-chain links it touches before returning. Counting
//! and logging happen here so both node kinds report the same way.

use std::mem;

use tracing::trace;

use super::internal::InternalNode;
use super::leaf::LeafNode;
use super::node::Node;
use super::tree::BPlusTree;
use crate::common::NodeId;

/// The sibling a fusing node merges into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sibling {
    Left(NodeId),
    Right(NodeId),
}

impl<K: Ord + Clone, V> BPlusTree<K, V> {
    /// Split an overflowing node.
    ///
    /// The lower half moves into a newly allocated left sibling, `id` keeps
    /// the upper half. Returns the separator for the parent and the new left id.
    pub(super) fn split(&mut self, id: NodeId) -> (K, NodeId) {
        if self.nodes.get(id).is_leaf() {
            self.split_leaf(id)
        } else {
            self.split_internal(id)
        }
    }

    fn split_leaf(&mut self, id: NodeId) -> (K, NodeId) {
        let (separator, mut left) = self.leaf_mut(id).split_off_left();
        left.next = Some(id);
        let prev = left.prev;

        let left_id = self.nodes.alloc(Node::Leaf(left));
        self.leaf_mut(id).prev = Some(left_id);
        if let Some(prev) = prev {
            self.leaf_mut(prev).next = Some(left_id);
        }

        self.stats.record_split(false);
        trace!(leaf = %id, left = %left_id, "split leaf");
        (separator, left_id)
    }

    fn split_internal(&mut self, id: NodeId) -> (K, NodeId) {
        let (promoted, left) = self.internal_mut(id).split_off_left();
        let moved = left.children.clone();

        let left_id = self.nodes.alloc(Node::Internal(left));
        for child in moved {
            self.nodes.get_mut(child).set_parent(Some(left_id));
        }

        self.stats.record_split(true);
        trace!(node = %id, left = %left_id, "split internal node");
        (promoted, left_id)
    }

    /// Parent of a non-root node and the node's position among its children.
    fn locate(&self, id: NodeId) -> (NodeId, usize) {
        let parent = self
            .nodes
            .get(id)
            .parent()
            .unwrap_or_else(|| panic!("{} has no parent", id));
        let index = self
            .internal_ref(parent)
            .position_of(id)
            .unwrap_or_else(|| panic!("{} is not a child of {}", id, parent));
        (parent, index)
    }

    /// Siblings of `id` that share its parent.
    fn siblings(&self, parent: NodeId, index: usize) -> (Option<NodeId>, Option<NodeId>) {
        let node = self.internal_ref(parent);
        let left = index.checked_sub(1).map(|i| node.children[i]);
        let right = node.children.get(index + 1).copied();
        (left, right)
    }

    /// Move one entry from a sibling with surplus into the underfull node `id`.
    ///
    /// The right sibling is tried first, then the left. Returns `false` if
    /// neither has more than `minimum` keys, in which case the caller fuses.
    pub(super) fn borrow(&mut self, id: NodeId) -> bool {
        let (parent, index) = self.locate(id);
        let (left, right) = self.siblings(parent, index);
        let minimum = self.config.minimum();
        let has_surplus = |tree: &Self, sibling: Option<NodeId>| {
            sibling.filter(|&s| tree.nodes.get(s).len() > minimum)
        };

        let leaf = self.nodes.get(id).is_leaf();
        if let Some(right) = has_surplus(self, right) {
            if leaf {
                self.borrow_leaf_from_right(id, parent, index, right);
            } else {
                self.borrow_internal_from_right(id, parent, index, right);
            }
            trace!(node = %id, from = %right, "borrowed from right sibling");
            return true;
        }
        if let Some(left) = has_surplus(self, left) {
            if leaf {
                self.borrow_leaf_from_left(id, parent, index, left);
            } else {
                self.borrow_internal_from_left(id, parent, index, left);
            }
            trace!(node = %id, from = %left, "borrowed from left sibling");
            return true;
        }
        false
    }

    fn borrow_leaf_from_right(&mut self, id: NodeId, parent: NodeId, index: usize, right: NodeId) {
        let sibling = self.leaf_mut(right);
        let Some((key, bucket)) = sibling.pop_first() else {
            return;
        };
        let boundary = sibling.keys[0].clone();

        self.leaf_mut(id).push_last(key, bucket);
        self.internal_mut(parent).keys[index] = boundary;
    }

    fn borrow_leaf_from_left(&mut self, id: NodeId, parent: NodeId, index: usize, left: NodeId) {
        let Some((key, bucket)) = self.leaf_mut(left).pop_last() else {
            return;
        };
        let boundary = key.clone();

        self.leaf_mut(id).push_first(key, bucket);
        self.internal_mut(parent).keys[index - 1] = boundary;
    }

    fn borrow_internal_from_right(
        &mut self,
        id: NodeId,
        parent: NodeId,
        index: usize,
        right: NodeId,
    ) {
        let Some((key, child)) = self.internal_mut(right).pop_first() else {
            return;
        };
        // Sibling's smallest key becomes the separator; the old separator comes down
        let separator = mem::replace(&mut self.internal_mut(parent).keys[index], key);

        let node = self.internal_mut(id);
        node.keys.push(separator);
        node.children.push(child);
        self.nodes.get_mut(child).set_parent(Some(id));
    }

    fn borrow_internal_from_left(
        &mut self,
        id: NodeId,
        parent: NodeId,
        index: usize,
        left: NodeId,
    ) {
        let Some((key, child)) = self.internal_mut(left).pop_last() else {
            return;
        };
        let separator = mem::replace(&mut self.internal_mut(parent).keys[index - 1], key);

        let node = self.internal_mut(id);
        node.keys.insert(0, separator);
        node.children.insert(0, child);
        self.nodes.get_mut(child).set_parent(Some(id));
    }

    /// Merge the underfull node `id` into a sibling and free it.
    ///
    /// Merges into the right sibling when there is one, otherwise into the
    /// left. The parent loses the entry for `id` and is returned so the caller
    /// can check it for underflow.
    pub(super) fn fuse(&mut self, id: NodeId) -> NodeId {
        let (parent, index) = self.locate(id);
        let (left, right) = self.siblings(parent, index);
        let sibling = match (right, left) {
            (Some(right), _) => Sibling::Right(right),
            (None, Some(left)) => Sibling::Left(left),
            (None, None) => panic!("{} has no sibling to fuse with", id),
        };

        let (separator, removed) = self.internal_mut(parent).remove_entry(index);
        debug_assert_eq!(removed, id);

        match self.nodes.take(id) {
            Node::Leaf(leaf) => self.fuse_leaf(leaf, sibling),
            Node::Internal(node) => self.fuse_internal(node, separator, sibling),
        }
        trace!(node = %id, into = ?sibling, parent = %parent, "fused");
        parent
    }

    fn fuse_leaf(&mut self, leaf: LeafNode<K, V>, sibling: Sibling) {
        let LeafNode {
            mut keys,
            mut buckets,
            prev,
            next,
            ..
        } = leaf;

        match sibling {
            Sibling::Right(right) => {
                let target = self.leaf_mut(right);
                keys.append(&mut target.keys);
                buckets.append(&mut target.buckets);
                target.keys = keys;
                target.buckets = buckets;
            }
            Sibling::Left(left) => {
                let target = self.leaf_mut(left);
                target.keys.append(&mut keys);
                target.buckets.append(&mut buckets);
            }
        }

        // Splice the freed leaf out of the chain
        if let Some(next) = next {
            self.leaf_mut(next).prev = prev;
        }
        if let Some(prev) = prev {
            self.leaf_mut(prev).next = next;
        }

        self.stats.record_fusion(false);
    }

    fn fuse_internal(&mut self, node: InternalNode<K>, separator: K, sibling: Sibling) {
        let InternalNode {
            mut keys,
            mut children,
            ..
        } = node;

        let target = match sibling {
            Sibling::Right(right) => {
                for &child in &children {
                    self.nodes.get_mut(child).set_parent(Some(right));
                }
                let target = self.internal_mut(right);
                keys.push(separator);
                keys.append(&mut target.keys);
                children.append(&mut target.children);
                target.keys = keys;
                target.children = children;
                right
            }
            Sibling::Left(left) => {
                for &child in &children {
                    self.nodes.get_mut(child).set_parent(Some(left));
                }
                let target = self.internal_mut(left);
                target.keys.push(separator);
                target.keys.append(&mut keys);
                target.children.append(&mut children);
                left
            }
        };

        self.stats.record_fusion(true);
        debug_assert!(self.nodes.get(target).len() <= self.config.maximum());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with(maximum: usize, keys: impl IntoIterator<Item = i32>) -> BPlusTree<i32, ()> {
        let mut tree = BPlusTree::new(maximum);
        for key in keys {
            tree.insert(key, ());
        }
        tree
    }

    #[test]
    fn test_split_leaf_wires_chain() {
        let mut tree = tree_with(4, 1..=6);
        // [1, 2] <-> [3, 4, 5, 6]; split the right leaf directly
        let right = tree.find(&6);
        tree.leaf_mut(right).set(7, ());

        let (separator, left) = tree.split(right);

        assert_eq!(separator, 5);
        assert_eq!(tree.leaf_ref(left).keys, vec![3, 4]);
        assert_eq!(tree.leaf_ref(right).keys, vec![5, 6, 7]);
        assert_eq!(tree.leaf_ref(left).next, Some(right));
        assert_eq!(tree.leaf_ref(right).prev, Some(left));

        let first = tree.leftmost_leaf();
        assert_eq!(tree.leaf_ref(first).next, Some(left));
        assert_eq!(tree.leaf_ref(left).prev, Some(first));
        assert_eq!(tree.leaf_ref(left).parent, tree.leaf_ref(right).parent);
    }

    #[test]
    fn test_split_internal_reparents_children() {
        // Five leaves fill a root with maximum 4; a sixth overflows it
        let mut tree = tree_with(4, 1..=12);
        assert_eq!(tree.depth(), 1);
        let root = tree.root();
        let last = tree.find(&12);
        tree.leaf_mut(last).set(13, ());
        let (separator, left) = tree.split_leaf(last);
        tree.internal_mut(root).insert_separator(separator, left, last);
        assert_eq!(tree.nodes.get(root).len(), 5);

        let (promoted, new_left) = tree.split(root);

        let left_node = tree.internal_ref(new_left);
        assert_eq!(left_node.keys.len(), 2);
        for &child in &left_node.children {
            assert_eq!(tree.nodes.get(child).parent(), Some(new_left));
        }
        for &child in &tree.internal_ref(root).children {
            assert_eq!(tree.nodes.get(child).parent(), Some(root));
        }
        assert!(left_node.keys.iter().all(|k| *k < promoted));
        assert!(tree.internal_ref(root).keys.iter().all(|k| *k > promoted));
        assert_eq!(tree.stats().internal_splits, 1);
    }

    #[test]
    fn test_borrow_fails_without_surplus() {
        let mut tree = tree_with(4, 1..=5);
        // [1, 2] <-> [3, 4, 5]; shrink the right leaf to the minimum
        let right = tree.find(&5);
        tree.leaf_mut(right).remove(&5);
        let left = tree.leftmost_leaf();
        tree.leaf_mut(left).remove(&1);

        assert!(!tree.borrow(left));
    }

    #[test]
    fn test_fuse_leaf_into_right_sibling() {
        let mut tree = tree_with(4, 1..=5);
        let left = tree.leftmost_leaf();
        let right = tree.find(&5);
        tree.leaf_mut(right).remove(&5);
        tree.leaf_mut(left).remove(&1);

        let parent = tree.fuse(left);

        assert_eq!(parent, tree.root());
        assert_eq!(tree.leaf_ref(right).keys, vec![2, 3, 4]);
        assert_eq!(tree.leaf_ref(right).prev, None);
        assert!(tree.leaf(left).is_none());
        assert!(tree.internal_ref(parent).keys.is_empty());
        assert_eq!(tree.internal_ref(parent).children, vec![right]);
        assert_eq!(tree.stats().fusions, 1);
    }

    #[test]
    fn test_fuse_last_leaf_into_left_sibling() {
        let mut tree = tree_with(4, 1..=5);
        let left = tree.leftmost_leaf();
        let right = tree.find(&5);
        tree.leaf_mut(right).remove(&5);
        tree.leaf_mut(right).remove(&4);

        tree.fuse(right);

        assert_eq!(tree.leaf_ref(left).keys, vec![1, 2, 3]);
        assert_eq!(tree.leaf_ref(left).next, None);
        assert!(tree.leaf(right).is_none());
    }
}
