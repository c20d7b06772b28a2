//! Node identifier type.

use std::fmt;

/// Identifies a node (internal or leaf) in the tree's node arena.
///
/// Parent, `prev` and `next` links are stored as `NodeId`s rather than
/// references, so re-parenting a child during a split or fusion is a plain
/// integer assignment.
///
/// An id pairs a slot index with the slot's generation. Slots are reused
/// after a node is freed, but each reuse bumps the generation, so an id
/// kept from before the free never resolves to the slot's new occupant.
///
/// # Example
/// ```
/// use bptree::NodeId;
///
/// let id = NodeId::new(5);
/// assert_eq!(id.index(), 5);
/// assert_eq!(id.generation(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl NodeId {
    /// Create a first-generation NodeId for slot `index`.
    #[inline]
    pub fn new(index: usize) -> Self {
        Self::with_generation(index, 0)
    }

    #[inline]
    pub(crate) fn with_generation(index: usize, generation: u32) -> Self {
        NodeId { index, generation }
    }

    /// Slot index in the arena.
    #[inline]
    pub fn index(self) -> usize {
        self.index
    }

    /// How many times the slot had been reused when this id was issued.
    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generation == 0 {
            write!(f, "Node({})", self.index)
        } else {
            write!(f, "Node({}v{})", self.index, self.generation)
        }
    }
}
