//! Structural statistics for a tree.

use std::fmt;

/// Counters for structural changes, owned by one tree.
///
/// `splits` and `fusions` count every split/fusion; the `internal_*`
/// counters count only those that happened on internal nodes.
///
/// # Example
/// ```
/// use bptree::BPlusTree;
///
/// let mut tree = BPlusTree::new(4);
/// for key in 1..=6 {
///     tree.insert(key, key * 10);
/// }
///
/// let stats = tree.stats();
/// assert_eq!(stats.splits, 1);
/// assert_eq!(stats.depth, 1);
/// println!("{}", stats);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub splits: u64,
    pub internal_splits: u64,
    pub fusions: u64,
    pub internal_fusions: u64,
    pub depth: usize,
}

impl TreeStats {
    /// Splits that happened on leaves.
    pub fn leaf_splits(&self) -> u64 {
        self.splits - self.internal_splits
    }

    /// Fusions that happened on leaves.
    pub fn leaf_fusions(&self) -> u64 {
        self.fusions - self.internal_fusions
    }

    pub(crate) fn record_split(&mut self, internal: bool) {
        self.splits += 1;
        if internal {
            self.internal_splits += 1;
        }
    }

    pub(crate) fn record_fusion(&mut self, internal: bool) {
        self.fusions += 1;
        if internal {
            self.internal_fusions += 1;
        }
    }

    /// Zero the counters, keeping `depth`.
    pub(crate) fn reset(&mut self) {
        *self = TreeStats {
            depth: self.depth,
            ..TreeStats::default()
        };
    }
}

impl fmt::Display for TreeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ splits: {} ({} internal), fusions: {} ({} internal), depth: {} }}",
            self.splits, self.internal_splits, self.fusions, self.internal_fusions, self.depth
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = TreeStats::default();
        assert_eq!(stats.splits, 0);
        assert_eq!(stats.fusions, 0);
        assert_eq!(stats.depth, 0);
    }

    #[test]
    fn test_record_split_and_fusion() {
        let mut stats = TreeStats::default();
        stats.record_split(false);
        stats.record_split(true);
        stats.record_fusion(false);

        assert_eq!(stats.splits, 2);
        assert_eq!(stats.internal_splits, 1);
        assert_eq!(stats.leaf_splits(), 1);
        assert_eq!(stats.fusions, 1);
        assert_eq!(stats.internal_fusions, 0);
        assert_eq!(stats.leaf_fusions(), 1);
    }

    #[test]
    fn test_reset_keeps_depth() {
        let mut stats = TreeStats {
            depth: 3,
            ..TreeStats::default()
        };
        stats.record_split(true);
        stats.record_fusion(true);

        stats.reset();

        assert_eq!(stats.splits, 0);
        assert_eq!(stats.internal_fusions, 0);
        assert_eq!(stats.depth, 3);
    }

    #[test]
    fn test_stats_display() {
        let mut stats = TreeStats::default();
        stats.record_split(false);
        stats.record_split(true);
        stats.depth = 2;

        let display = format!("{}", stats);

        assert!(display.contains("splits: 2 (1 internal)"));
        assert!(display.contains("fusions: 0"));
        assert!(display.contains("depth: 2"));
    }
}
