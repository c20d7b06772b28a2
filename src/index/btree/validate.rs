//! Structural invariant checks.
//!
//! Used by tests and when debugging. A tree produced by the public
//! operations always passes.

use super::node::Node;
use super::tree::BPlusTree;
use crate::common::{Error, NodeId, Result};

fn violation(message: String) -> Error {
    Error::InvariantViolation(message)
}

/// State gathered during the depth-first walk.
#[derive(Default)]
struct Walk {
    leaves: Vec<NodeId>,
    leaf_depth: Option<usize>,
    keys: usize,
    nodes: usize,
}

impl<K: Ord + Clone, V> BPlusTree<K, V> {
    /// Check every structural invariant of the tree.
    ///
    /// - keys strictly ascending within each node and inside their separator bounds
    /// - every non-root node holds between `minimum` and `maximum` keys
    /// - `children.len() == keys.len() + 1` for internal nodes
    /// - all leaves at the same depth, equal to [`depth`](Self::depth)
    /// - parent back-references match the downward links
    /// - the leaf chain visits every leaf left to right, with consistent `prev`/`next`
    /// - no orphaned nodes and a key count equal to [`len`](Self::len)
    pub fn validate(&self) -> Result<()> {
        let mut walk = Walk::default();
        self.check_node(self.root, None, 0, None, None, &mut walk)?;
        self.check_chain(&walk.leaves)?;

        if walk.leaf_depth != Some(self.stats.depth) {
            return Err(violation(format!(
                "leaves at depth {:?}, tree reports depth {}",
                walk.leaf_depth, self.stats.depth
            )));
        }
        if walk.keys != self.len {
            return Err(violation(format!(
                "{} keys in leaves, tree reports {}",
                walk.keys, self.len
            )));
        }
        if walk.nodes != self.nodes.len() {
            return Err(violation(format!(
                "{} nodes reachable, {} allocated",
                walk.nodes,
                self.nodes.len()
            )));
        }
        Ok(())
    }

    fn check_node<'a>(
        &'a self,
        id: NodeId,
        parent: Option<NodeId>,
        depth: usize,
        lower: Option<&'a K>,
        upper: Option<&'a K>,
        walk: &mut Walk,
    ) -> Result<()> {
        let node = self
            .nodes
            .try_get(id)
            .ok_or_else(|| violation(format!("{} is referenced but not live", id)))?;
        walk.nodes += 1;

        if node.parent() != parent {
            return Err(violation(format!(
                "{} points to parent {:?}, expected {:?}",
                id,
                node.parent(),
                parent
            )));
        }

        let len = node.len();
        let is_root = id == self.root;
        if len > self.config.maximum() {
            return Err(violation(format!("{} overflows with {} keys", id, len)));
        }
        if !is_root && len < self.config.minimum() {
            return Err(violation(format!("{} underflows with {} keys", id, len)));
        }

        let keys = node.keys();
        if keys.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(violation(format!("{} keys are not strictly ascending", id)));
        }
        if let (Some(lower), Some(first)) = (lower, keys.first()) {
            if first < lower {
                return Err(violation(format!("{} holds a key below its lower bound", id)));
            }
        }
        if let (Some(upper), Some(last)) = (upper, keys.last()) {
            if last >= upper {
                return Err(violation(format!("{} holds a key at or above its upper bound", id)));
            }
        }

        match node {
            Node::Leaf(leaf) => {
                if leaf.buckets.len() != leaf.keys.len() {
                    return Err(violation(format!(
                        "{} has {} keys but {} buckets",
                        id,
                        leaf.keys.len(),
                        leaf.buckets.len()
                    )));
                }
                if leaf.buckets.iter().any(Vec::is_empty) {
                    return Err(violation(format!("{} has an empty bucket", id)));
                }
                match walk.leaf_depth {
                    None => walk.leaf_depth = Some(depth),
                    Some(expected) if expected != depth => {
                        return Err(violation(format!(
                            "{} at depth {}, other leaves at depth {}",
                            id, depth, expected
                        )));
                    }
                    Some(_) => {}
                }
                walk.leaves.push(id);
                walk.keys += leaf.keys.len();
            }
            Node::Internal(internal) => {
                if internal.keys.is_empty() {
                    return Err(violation(format!("{} is an internal node without keys", id)));
                }
                if internal.children.len() != internal.keys.len() + 1 {
                    return Err(violation(format!(
                        "{} has {} keys but {} children",
                        id,
                        internal.keys.len(),
                        internal.children.len()
                    )));
                }
                for (i, &child) in internal.children.iter().enumerate() {
                    let child_lower = if i == 0 { lower } else { Some(&internal.keys[i - 1]) };
                    let child_upper = internal.keys.get(i).or(upper);
                    self.check_node(child, Some(id), depth + 1, child_lower, child_upper, walk)?;
                }
            }
        }
        Ok(())
    }

    fn check_chain(&self, leaves: &[NodeId]) -> Result<()> {
        for (i, &id) in leaves.iter().enumerate() {
            let leaf = self.leaf_ref(id);
            let expected_prev = i.checked_sub(1).map(|p| leaves[p]);
            let expected_next = leaves.get(i + 1).copied();
            if leaf.prev != expected_prev {
                return Err(violation(format!(
                    "{} prev is {:?}, expected {:?}",
                    id, leaf.prev, expected_prev
                )));
            }
            if leaf.next != expected_next {
                return Err(violation(format!(
                    "{} next is {:?}, expected {:?}",
                    id, leaf.next, expected_next
                )));
            }
        }
        Ok(())
    }
}
