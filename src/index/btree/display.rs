//! Textual dump of the tree.
//!
//! ```text
//! `- [3]
//!    |- [1, 2]
//!    `- [3, 4, 5, 6]
//! ```

use std::fmt;

use super::node::Node;
use super::tree::BPlusTree;
use crate::common::NodeId;

impl<K: fmt::Debug, V> BPlusTree<K, V> {
    /// Depth-first dump of the keys held by every node.
    pub fn display(&self) -> String {
        self.to_string()
    }

    fn write_node(
        &self,
        f: &mut fmt::Formatter<'_>,
        id: NodeId,
        prefix: &str,
        last: bool,
    ) -> fmt::Result {
        let node = self.nodes.get(id);
        writeln!(f, "{}{}{:?}", prefix, if last { "`- " } else { "|- " }, node.keys())?;

        if let Node::Internal(internal) = node {
            let prefix = format!("{}{}", prefix, if last { "   " } else { "|  " });
            let count = internal.children.len();
            for (i, &child) in internal.children.iter().enumerate() {
                self.write_node(f, child, &prefix, i + 1 == count)?;
            }
        }
        Ok(())
    }
}

impl<K: fmt::Debug, V> fmt::Display for BPlusTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_node(f, self.root, "", true)
    }
}
