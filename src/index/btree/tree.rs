//! The B+ tree orchestrator.
//!
//! [`BPlusTree`] owns the node arena and the root. Every operation descends
//! from the root to a leaf, mutates the leaf, and only if the leaf overflows
//! or underflows hands off to the restructuring primitives, which may walk
//! back up the parent chain as far as the root.

use tracing::debug;

use super::arena::NodeArena;
use super::internal::InternalNode;
use super::iter::Range;
use super::leaf::{Bucket, LeafNode};
use super::node::Node;
use super::stats::TreeStats;
use crate::common::{Error, NodeId, Result, TreeConfig};

/// An in-memory B+ tree mapping keys to buckets of values.
///
/// # Structure
/// ```text
///                    [ 30 | 60 ]                 internal nodes route
///                   /     |     \
///      [10 20] <-> [30 40 50] <-> [60 70]        leaves hold entries,
///                                                chained left to right
/// ```
///
/// Keys are unique as far as [`insert`](Self::insert) is concerned: a second
/// insert of the same key is rejected. [`append`](Self::append) is the
/// explicit way to store several values under one key.
///
/// # Example
/// ```
/// use bptree::BPlusTree;
///
/// let mut tree = BPlusTree::new(4);
/// for ts in [5, 1, 4, 2, 3] {
///     tree.insert(ts, format!("value_{}", ts));
/// }
///
/// assert_eq!(tree.query(&4), Some(&vec!["value_4".to_string()]));
/// assert_eq!(tree.query(&9), None);
///
/// let keys: Vec<i32> = tree.range_query(&2, &4).into_iter().map(|(k, _)| *k).collect();
/// assert_eq!(keys, vec![2, 3, 4]);
/// ```
pub struct BPlusTree<K, V> {
    pub(super) nodes: NodeArena<Node<K, V>>,
    pub(super) root: NodeId,
    pub(super) config: TreeConfig,
    pub(super) len: usize,
    pub(super) stats: TreeStats,
}

impl<K: Ord + Clone, V> BPlusTree<K, V> {
    /// Create an empty tree holding at most `maximum` keys per node.
    ///
    /// `maximum` is clamped to at least 2.
    pub fn new(maximum: usize) -> Self {
        Self::with_config(TreeConfig::new(maximum))
    }

    /// Create an empty tree from a [`TreeConfig`].
    pub fn with_config(config: TreeConfig) -> Self {
        let mut nodes = NodeArena::new();
        let root = nodes.alloc(Node::Leaf(LeafNode::new()));
        Self {
            nodes,
            root,
            config,
            len: 0,
            stats: TreeStats::default(),
        }
    }

    // ========================================================================
    // Public API: Lookup
    // ========================================================================

    /// Descend from the root to the leaf responsible for `key`.
    pub fn find(&self, key: &K) -> NodeId {
        let mut id = self.root;
        while let Node::Internal(node) = self.nodes.get(id) {
            id = node.child_for(key);
        }
        id
    }

    /// The bucket stored under `key`, or `None` if the key is absent.
    pub fn query(&self, key: &K) -> Option<&Bucket<V>> {
        self.leaf_ref(self.find(key)).get(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.query(key).is_some()
    }

    /// All entries with `low <= key <= high`, ascending.
    ///
    /// Descends once to the leaf for `low`, then follows the leaf chain.
    /// Returns nothing when `low > high`.
    pub fn range_query<'a>(&'a self, low: &K, high: &'a K) -> Vec<(&'a K, &'a Bucket<V>)> {
        self.range(low, high).collect()
    }

    /// Lazy version of [`range_query`](Self::range_query).
    pub fn range<'a>(&'a self, low: &K, high: &'a K) -> Range<'a, K, V> {
        if low > high {
            return Range::empty(self);
        }
        let leaf = self.find(low);
        let start = self.leaf_ref(leaf).keys.partition_point(|k| k < low);
        Range::new(self, leaf, start, Some(high))
    }

    /// Every entry in ascending key order.
    pub fn iter(&self) -> Range<'_, K, V> {
        Range::new(self, self.leftmost_leaf(), 0, None)
    }

    // ========================================================================
    // Public API: Mutation
    // ========================================================================

    /// Insert `key` with a singleton bucket holding `value`.
    ///
    /// Returns `(false, leaf)` and leaves the tree untouched if the key is
    /// already present. Otherwise returns `(true, leaf)` where `leaf` is the
    /// leaf holding the key once any splits have completed.
    pub fn insert(&mut self, key: K, value: V) -> (bool, NodeId) {
        let leaf = self.find(&key);
        if self.leaf_ref(leaf).contains(&key) {
            return (false, leaf);
        }
        (true, self.put(leaf, key, value))
    }

    /// Like [`insert`](Self::insert), but reports a duplicate as
    /// [`Error::DuplicateKey`].
    pub fn try_insert(&mut self, key: K, value: V) -> Result<NodeId> {
        match self.insert(key, value) {
            (true, leaf) => Ok(leaf),
            (false, _) => Err(Error::DuplicateKey),
        }
    }

    /// Add `value` under `key`, creating the key if needed.
    ///
    /// Unlike [`insert`](Self::insert), an existing key keeps its bucket and
    /// gets `value` appended to it.
    pub fn append(&mut self, key: K, value: V) -> NodeId {
        let leaf = self.find(&key);
        self.put(leaf, key, value)
    }

    /// Replace the bucket of an existing key with `value` alone.
    ///
    /// Returns `false` if the key is absent.
    pub fn change(&mut self, key: &K, value: V) -> bool {
        let leaf = self.find(key);
        self.leaf_mut(leaf).replace(key, value)
    }

    pub fn try_change(&mut self, key: &K, value: V) -> Result<()> {
        if self.change(key, value) {
            Ok(())
        } else {
            Err(Error::KeyNotFound)
        }
    }

    /// Delete `key` and its bucket. Returns `false` if the key is absent.
    pub fn delete(&mut self, key: &K) -> bool {
        self.remove(key).is_some()
    }

    /// Delete `key` and return its bucket.
    pub fn remove(&mut self, key: &K) -> Option<Bucket<V>> {
        let leaf = self.find(key);
        let bucket = self.leaf_mut(leaf).remove(key)?;
        self.len -= 1;
        self.rebalance(leaf);
        Some(bucket)
    }

    pub fn try_delete(&mut self, key: &K) -> Result<Bucket<V>> {
        self.remove(key).ok_or(Error::KeyNotFound)
    }

    // ========================================================================
    // Public API: Stats and info
    // ========================================================================

    /// Split/fusion counters and current depth.
    pub fn stats(&self) -> TreeStats {
        self.stats
    }

    /// Zero the split and fusion counters.
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// Height of the tree; 0 while the root is a leaf.
    pub fn depth(&self) -> usize {
        self.stats.depth
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn maximum(&self) -> usize {
        self.config.maximum()
    }

    pub fn minimum(&self) -> usize {
        self.config.minimum()
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Read-only view of a leaf, or `None` if `id` is not a live leaf.
    ///
    /// Handles go stale once their leaf is fused away, and stay stale after
    /// the arena slot is reused for another node.
    pub fn leaf(&self, id: NodeId) -> Option<&LeafNode<K, V>> {
        self.nodes.try_get(id).and_then(Node::as_leaf)
    }

    /// The leftmost leaf, where the leaf chain starts.
    pub fn leftmost_leaf(&self) -> NodeId {
        let mut id = self.root;
        while let Node::Internal(node) = self.nodes.get(id) {
            id = node.children[0];
        }
        id
    }

    // ========================================================================
    // Internal: structural coordination
    // ========================================================================

    /// Store `value` under `key` in `leaf` and split upward on overflow.
    fn put(&mut self, leaf: NodeId, key: K, value: V) -> NodeId {
        let probe = key.clone();
        if self.leaf_mut(leaf).set(key, value) {
            self.len += 1;
        }
        if self.nodes.get(leaf).len() <= self.config.maximum() {
            return leaf;
        }
        self.split_upward(leaf);
        self.find(&probe)
    }

    /// Split `id` and then each ancestor that overflows in turn.
    fn split_upward(&mut self, mut id: NodeId) {
        while self.nodes.get(id).len() > self.config.maximum() {
            let (separator, left) = self.split(id);
            match self.nodes.get(id).parent() {
                Some(parent) => {
                    self.internal_mut(parent).insert_separator(separator, left, id);
                    id = parent;
                }
                None => {
                    self.grow_root(separator, left, id);
                    return;
                }
            }
        }
    }

    /// Put a new internal root above the two halves of the old one.
    fn grow_root(&mut self, separator: K, left: NodeId, right: NodeId) {
        let root = self
            .nodes
            .alloc(Node::Internal(InternalNode::with_children(separator, left, right)));
        self.nodes.get_mut(left).set_parent(Some(root));
        self.nodes.get_mut(right).set_parent(Some(root));
        self.root = root;
        self.stats.depth += 1;
        debug!(root = %root, depth = self.stats.depth, "root split, tree grew");
    }

    /// Restore the fan-out bound after a removal from `id`.
    ///
    /// Borrow is tried first; if no sibling can spare an entry the node is
    /// fused and the check moves up to the parent.
    fn rebalance(&mut self, mut id: NodeId) {
        let minimum = self.config.minimum();
        while self.nodes.get(id).len() < minimum {
            if id == self.root {
                self.collapse_root();
                return;
            }
            if self.borrow(id) {
                return;
            }
            id = self.fuse(id);
        }
    }

    /// Replace an empty internal root by its only child.
    fn collapse_root(&mut self) {
        let child = match self.nodes.get(self.root) {
            Node::Internal(node) if node.keys.is_empty() => node.children[0],
            _ => return,
        };
        let old = self.root;
        self.nodes.take(old);
        self.nodes.get_mut(child).set_parent(None);
        self.root = child;
        self.stats.depth -= 1;
        debug!(old = %old, root = %child, depth = self.stats.depth, "root collapsed, tree shrank");
    }

    // ========================================================================
    // Internal: typed node access
    // ========================================================================

    pub(super) fn leaf_ref(&self, id: NodeId) -> &LeafNode<K, V> {
        self.nodes
            .get(id)
            .as_leaf()
            .unwrap_or_else(|| panic!("{} is not a leaf", id))
    }

    pub(super) fn leaf_mut(&mut self, id: NodeId) -> &mut LeafNode<K, V> {
        self.nodes
            .get_mut(id)
            .as_leaf_mut()
            .unwrap_or_else(|| panic!("{} is not a leaf", id))
    }

    pub(super) fn internal_ref(&self, id: NodeId) -> &InternalNode<K> {
        self.nodes
            .get(id)
            .as_internal()
            .unwrap_or_else(|| panic!("{} is not an internal node", id))
    }

    pub(super) fn internal_mut(&mut self, id: NodeId) -> &mut InternalNode<K> {
        self.nodes
            .get_mut(id)
            .as_internal_mut()
            .unwrap_or_else(|| panic!("{} is not an internal node", id))
    }
}

impl<K: Ord + Clone, V> Default for BPlusTree<K, V> {
    fn default() -> Self {
        Self::with_config(TreeConfig::default())
    }
}

impl<'a, K: Ord + Clone, V> IntoIterator for &'a BPlusTree<K, V> {
    type Item = (&'a K, &'a Bucket<V>);
    type IntoIter = Range<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
