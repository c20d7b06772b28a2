//! Ordered iteration over the leaf chain.

use super::leaf::Bucket;
use super::tree::BPlusTree;
use crate::common::NodeId;

/// Iterator over `(key, bucket)` pairs in ascending key order.
///
/// Walks the `next` links between leaves and never revisits internal nodes.
/// Created by [`BPlusTree::range`] and [`BPlusTree::iter`].
pub struct Range<'a, K, V> {
    tree: &'a BPlusTree<K, V>,
    leaf: Option<NodeId>,
    pos: usize,
    high: Option<&'a K>,
}

impl<'a, K: Ord + Clone, V> Range<'a, K, V> {
    pub(super) fn new(
        tree: &'a BPlusTree<K, V>,
        leaf: NodeId,
        pos: usize,
        high: Option<&'a K>,
    ) -> Self {
        Self {
            tree,
            leaf: Some(leaf),
            pos,
            high,
        }
    }

    pub(super) fn empty(tree: &'a BPlusTree<K, V>) -> Self {
        Self {
            tree,
            leaf: None,
            pos: 0,
            high: None,
        }
    }
}

impl<'a, K: Ord + Clone, V> Iterator for Range<'a, K, V> {
    type Item = (&'a K, &'a Bucket<V>);

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        loop {
            let leaf = tree.leaf_ref(self.leaf?);
            if let Some(key) = leaf.keys.get(self.pos) {
                if self.high.is_some_and(|high| key > high) {
                    self.leaf = None;
                    return None;
                }
                let bucket = &leaf.buckets[self.pos];
                self.pos += 1;
                return Some((key, bucket));
            }
            self.leaf = leaf.next;
            self.pos = 0;
        }
    }
}
