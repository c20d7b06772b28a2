//! bptree - An in-memory B+ tree index.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                            bptree                               │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │            SharedBPlusTree (index/btree/shared)          │   │
//! │  │        RwLock: one writer per descend/rebalance pass     │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │               BPlusTree (index/btree/tree)               │   │
//! │  │   find → mutate leaf → split / borrow / fuse upward      │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                 Node arena (NodeId → Node)               │   │
//! │  │   Internal { keys, children, parent }                    │   │
//! │  │   Leaf     { keys, buckets, prev, next, parent }         │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (NodeId, Error, config)
//! - [`index`] - Index structures (B+ tree)
//!
//! # Quick Start
//! ```
//! use bptree::BPlusTree;
//!
//! let mut tree = BPlusTree::new(4);
//! for ts in 0..100u64 {
//!     tree.insert(ts, format!("value_{}", ts));
//! }
//!
//! assert_eq!(tree.query(&42).map(|b| b[0].as_str()), Some("value_42"));
//! assert_eq!(tree.range_query(&10, &19).len(), 10);
//!
//! assert!(tree.delete(&42));
//! assert_eq!(tree.query(&42), None);
//! ```

pub mod common;
pub mod index;

// Re-export commonly used items at crate root for convenience
pub use common::config::{DEFAULT_MAXIMUM, MIN_MAXIMUM};
pub use common::{Error, NodeId, Result, TreeConfig};

pub use index::{BPlusTree, Bucket, LeafNode, Range, SharedBPlusTree, TreeStats};
