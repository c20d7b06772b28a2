//! B+ tree index.
//!
//! # Components
//! - [`BPlusTree`] - The orchestrator: lookup, range scan, insert, delete
//! - [`LeafNode`] - Sorted entries plus `prev`/`next` links to neighbour leaves
//! - `InternalNode` - Separator keys routing to child nodes
//! - [`Range`] - Ordered iteration along the leaf chain
//! - [`TreeStats`] - Split/fusion counters owned by each tree
//! - [`SharedBPlusTree`] - The tree behind a reader-writer lock
//!
//! All nodes live in a slot arena and refer to each other by [`NodeId`], so
//! parent and sibling links are plain ids rather than references.
//!
//! [`NodeId`]: crate::common::NodeId

mod arena;
mod display;
mod internal;
mod iter;
mod leaf;
mod node;
mod restructure;
mod shared;
mod stats;
mod tree;
mod validate;

pub use iter::Range;
pub use leaf::{Bucket, LeafNode};
pub use shared::SharedBPlusTree;
pub use stats::TreeStats;
pub use tree::BPlusTree;
