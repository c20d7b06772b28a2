//! A lock-protected tree for use across threads.

use parking_lot::RwLock;

use super::leaf::Bucket;
use super::stats::TreeStats;
use super::tree::BPlusTree;
use crate::common::{Result, TreeConfig};

/// A [`BPlusTree`] behind a reader-writer lock.
///
/// Rebalancing after an insert or delete can touch any ancestor up to the
/// root and the siblings at each level, so every mutating call holds the
/// write lock for its whole descend/mutate/rebalance pass. Reads share the
/// lock and return owned copies.
///
/// # Thread Safety
/// - `insert` / `append` / `change` / `delete`: exclusive (`write`)
/// - `query` / `range_query` / `len` / `stats`: shared (`read`)
///
/// # Example
/// ```
/// use bptree::SharedBPlusTree;
/// use std::sync::Arc;
/// use std::thread;
///
/// let tree = Arc::new(SharedBPlusTree::new(8));
/// let handles: Vec<_> = (0..4u64)
///     .map(|t| {
///         let tree = Arc::clone(&tree);
///         thread::spawn(move || {
///             for i in 0..100 {
///                 tree.insert(t * 1000 + i, i);
///             }
///         })
///     })
///     .collect();
/// for h in handles {
///     h.join().unwrap();
/// }
/// assert_eq!(tree.len(), 400);
/// ```
pub struct SharedBPlusTree<K, V> {
    inner: RwLock<BPlusTree<K, V>>,
}

impl<K: Ord + Clone, V: Clone> SharedBPlusTree<K, V> {
    pub fn new(maximum: usize) -> Self {
        Self::from_tree(BPlusTree::new(maximum))
    }

    pub fn with_config(config: TreeConfig) -> Self {
        Self::from_tree(BPlusTree::with_config(config))
    }

    pub fn from_tree(tree: BPlusTree<K, V>) -> Self {
        Self {
            inner: RwLock::new(tree),
        }
    }

    /// See [`BPlusTree::insert`]. Returns `false` for a duplicate key.
    pub fn insert(&self, key: K, value: V) -> bool {
        self.inner.write().insert(key, value).0
    }

    pub fn try_insert(&self, key: K, value: V) -> Result<()> {
        self.inner.write().try_insert(key, value).map(|_| ())
    }

    pub fn append(&self, key: K, value: V) {
        self.inner.write().append(key, value);
    }

    pub fn change(&self, key: &K, value: V) -> bool {
        self.inner.write().change(key, value)
    }

    pub fn delete(&self, key: &K) -> bool {
        self.inner.write().delete(key)
    }

    /// Copy of the bucket stored under `key`.
    pub fn query(&self, key: &K) -> Option<Bucket<V>> {
        self.inner.read().query(key).cloned()
    }

    /// Copies of all entries with `low <= key <= high`.
    pub fn range_query(&self, low: &K, high: &K) -> Vec<(K, Bucket<V>)> {
        self.inner
            .read()
            .range(low, high)
            .map(|(k, bucket)| (k.clone(), bucket.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn stats(&self) -> TreeStats {
        self.inner.read().stats()
    }

    /// Run `f` against the tree under the read lock.
    pub fn with_read<R>(&self, f: impl FnOnce(&BPlusTree<K, V>) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run `f` against the tree under the write lock.
    pub fn with_write<R>(&self, f: impl FnOnce(&mut BPlusTree<K, V>) -> R) -> R {
        f(&mut self.inner.write())
    }

    pub fn into_inner(self) -> BPlusTree<K, V> {
        self.inner.into_inner()
    }
}
