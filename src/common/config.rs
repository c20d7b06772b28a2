//! Configuration for the B+ tree.

/// Default maximum number of keys per node.
pub const DEFAULT_MAXIMUM: usize = 4;

/// Smallest usable maximum.
///
/// With `maximum = 2` the minimum is 1, which is the lowest fan-out where
/// split and fusion still produce valid nodes. Anything lower is clamped.
pub const MIN_MAXIMUM: usize = 2;

/// Fan-out bounds for a tree.
///
/// # Example
/// ```
/// use bptree::TreeConfig;
///
/// let config = TreeConfig::new(7);
/// assert_eq!(config.maximum(), 7);
/// assert_eq!(config.minimum(), 3);
///
/// // Out-of-range values are clamped rather than rejected
/// assert_eq!(TreeConfig::new(0).maximum(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeConfig {
    maximum: usize,
}

impl TreeConfig {
    /// Create a config with the given maximum keys per node.
    ///
    /// Values below [`MIN_MAXIMUM`] are clamped to it.
    pub fn new(maximum: usize) -> Self {
        Self {
            maximum: maximum.max(MIN_MAXIMUM),
        }
    }

    /// Maximum number of keys any node may hold.
    #[inline]
    pub fn maximum(&self) -> usize {
        self.maximum
    }

    /// Minimum number of keys any non-root node must hold.
    #[inline]
    pub fn minimum(&self) -> usize {
        self.maximum / 2
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAXIMUM)
    }
}
