//! Text rendering of the tree for terminals and logs.

use crate::btree::{BTree, TreeStats};
use crate::types::NodeId;
use std::fmt::{self, Display, Write};

impl<K> BTree<K> {
    /// Describe the node limits implied by the order
    pub fn describe_order(&self) -> String {
        let config = self.config();
        format!(
            "This tree is of order {}\n  \
             max number of values in a node: {}\n  \
             max number of children: {}\n  \
             min number of values (except root): {}\n  \
             min number of children (except root and leaves): {}\n",
            config.order,
            config.max_keys(),
            config.order,
            config.min_keys(),
            config.min_children(),
        )
    }
}

impl<K: Display> BTree<K> {
    /// Render the tree as an indented outline, one node per line.
    ///
    /// ```text
    ///  Root: ( 5 )
    ///     ├─ 1: ( 2 3 )
    ///     └─ 2: ( 7 8 )
    /// ```
    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.write_outline(&mut out);
        out
    }

    fn write_outline(&self, out: &mut impl Write) -> fmt::Result {
        let Some(root) = self.root else {
            return writeln!(out, "Tree is empty");
        };

        // (node, indent, is last child, position among siblings, is root)
        let mut stack: Vec<(NodeId, String, bool, usize, bool)> =
            vec![(root, " ".to_string(), true, 0, true)];

        while let Some((id, mut indent, last, position, is_root)) = stack.pop() {
            out.write_str(&indent)?;
            if is_root {
                indent.push_str("   ");
                out.write_str("Root: ")?;
            } else {
                if last {
                    out.write_str("└─")?;
                    indent.push_str("   ");
                } else {
                    out.write_str("├─")?;
                    indent.push_str("│  ");
                }
                write!(out, " {}: ", position + 1)?;
            }

            let node = &self.arena[id];
            out.write_str("( ")?;
            for key in node.keys() {
                write!(out, "{} ", key)?;
            }
            out.write_str(")\n")?;

            let children = node.children();
            for (i, &child) in children.iter().enumerate().rev() {
                stack.push((child, indent.clone(), i + 1 == children.len(), i, false));
            }
        }

        Ok(())
    }
}

impl<K: Display> Display for BTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_outline(f)
    }
}

impl Display for TreeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Tree stats:")?;
        writeln!(f, "  Order: {}", self.order)?;
        writeln!(f, "  Height: {}", self.height)?;
        writeln!(f, "  Number of nodes: {}", self.node_count)?;
        writeln!(f, "  Number of values: {}", self.key_count)?;
        writeln!(f, "  Fullness: {:.2}%", self.fullness)
    }
}
