//! Leaf nodes.
//!
//! A leaf stores keys in ascending order with a parallel vector of buckets.
//! Leaves are chained through `prev`/`next` so ordered scans never have to
//! climb back through internal nodes.

use crate::common::NodeId;

/// All values stored under one key.
pub type Bucket<V> = Vec<V>;

/// A leaf of the tree.
///
/// Returned by [`BPlusTree::leaf`](crate::BPlusTree::leaf) as a read-only view.
#[derive(Debug, Clone)]
pub struct LeafNode<K, V> {
    pub(crate) keys: Vec<K>,
    pub(crate) buckets: Vec<Bucket<V>>,
    pub(crate) prev: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
    pub(crate) parent: Option<NodeId>,
}

impl<K, V> LeafNode<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            keys: Vec::new(),
            buckets: Vec::new(),
            prev: None,
            next: None,
            parent: None,
        }
    }

    /// Keys held by this leaf, ascending.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Buckets parallel to [`keys`](Self::keys).
    pub fn buckets(&self) -> &[Bucket<V>] {
        &self.buckets
    }

    /// Left neighbour in the leaf chain.
    pub fn prev(&self) -> Option<NodeId> {
        self.prev
    }

    /// Right neighbour in the leaf chain.
    pub fn next(&self) -> Option<NodeId> {
        self.next
    }

    /// Enclosing internal node, `None` when this leaf is the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<K: Ord, V> LeafNode<K, V> {
    /// `Ok(i)` if `key` is at position `i`, `Err(i)` with the insertion point otherwise.
    #[inline]
    pub(crate) fn position(&self, key: &K) -> Result<usize, usize> {
        self.keys.binary_search(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.position(key).is_ok()
    }

    pub fn get(&self, key: &K) -> Option<&Bucket<V>> {
        self.position(key).ok().map(|i| &self.buckets[i])
    }

    /// Adds `value` under `key`.
    ///
    /// A new key gets a singleton bucket at its sorted position; an existing
    /// key has `value` appended to its bucket. Returns `true` if the key was new.
    pub(crate) fn set(&mut self, key: K, value: V) -> bool {
        match self.position(&key) {
            Ok(i) => {
                self.buckets[i].push(value);
                false
            }
            Err(i) => {
                self.keys.insert(i, key);
                self.buckets.insert(i, vec![value]);
                true
            }
        }
    }

    /// Overwrites the bucket of an existing key with `value` alone.
    pub(crate) fn replace(&mut self, key: &K, value: V) -> bool {
        match self.position(key) {
            Ok(i) => {
                self.buckets[i] = vec![value];
                true
            }
            Err(_) => false,
        }
    }

    /// Removes `key` and its bucket.
    pub(crate) fn remove(&mut self, key: &K) -> Option<Bucket<V>> {
        let i = self.position(key).ok()?;
        self.keys.remove(i);
        Some(self.buckets.remove(i))
    }
}

impl<K, V> LeafNode<K, V> {
    pub(crate) fn pop_first(&mut self) -> Option<(K, Bucket<V>)> {
        if self.keys.is_empty() {
            return None;
        }
        Some((self.keys.remove(0), self.buckets.remove(0)))
    }

    pub(crate) fn pop_last(&mut self) -> Option<(K, Bucket<V>)> {
        let key = self.keys.pop()?;
        let bucket = self.buckets.pop()?;
        Some((key, bucket))
    }

    pub(crate) fn push_first(&mut self, key: K, bucket: Bucket<V>) {
        self.keys.insert(0, key);
        self.buckets.insert(0, bucket);
    }

    pub(crate) fn push_last(&mut self, key: K, bucket: Bucket<V>) {
        self.keys.push(key);
        self.buckets.push(bucket);
    }
}

impl<K: Ord + Clone, V> LeafNode<K, V> {
    /// Moves entries below `mid = len / 2` into a new left leaf.
    ///
    /// Returns the smallest key kept by `self` (which stays in the leaf and is
    /// copied into the parent) and the new leaf. The new leaf inherits
    /// `parent` and `prev`; the caller wires it into the chain.
    pub(crate) fn split_off_left(&mut self) -> (K, LeafNode<K, V>) {
        let mid = self.keys.len() / 2;
        let left = LeafNode {
            keys: self.keys.drain(..mid).collect(),
            buckets: self.buckets.drain(..mid).collect(),
            prev: self.prev,
            next: None,
            parent: self.parent,
        };
        (self.keys[0].clone(), left)
    }
}
