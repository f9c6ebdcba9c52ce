//! RST constituency trees and their dependency projection.
//!
//! A constituency tree has EDUs at the leaves; every internal node
//! carries the rhetorical relation holding among its children, and each
//! child is tagged with its nuclearity. The dependency projection turns
//! that into head-dependent edges labeled with relation names, which is
//! the representation the ground-truth tables are derived from.

use crate::corpus::Edu;
use serde::{Deserialize, Serialize};

/// Nuclearity status of an RST constituent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Nuclearity {
    Nucleus,
    Satellite,
}

/// An RST constituency tree. Leaves are EDUs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RstTree {
    Leaf(Edu),
    Node {
        /// Relation holding among this node's children.
        relation: String,
        children: Vec<(Nuclearity, RstTree)>,
    },
}

impl RstTree {
    pub fn leaf(edu: Edu) -> Self {
        RstTree::Leaf(edu)
    }

    pub fn node(relation: impl Into<String>, children: Vec<(Nuclearity, RstTree)>) -> Self {
        RstTree::Node {
            relation: relation.into(),
            children,
        }
    }

    /// EDUs in tree-leaf order.
    pub fn leaves(&self) -> Vec<&Edu> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'t>(&'t self, out: &mut Vec<&'t Edu>) {
        match self {
            RstTree::Leaf(edu) => out.push(edu),
            RstTree::Node { children, .. } => {
                for (_, child) in children {
                    child.collect_leaves(out);
                }
            }
        }
    }
}

/// A node in the discourse dependency tree.
///
/// `rel` labels the edge from this node to its parent; the root carries
/// [`ROOT_REL`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepTree {
    /// Head EDU of this subtree.
    pub edu: Edu,
    /// Relation connecting this node to its parent.
    pub rel: String,
    pub children: Vec<DepTree>,
}

/// Edge label carried by the dependency-tree root.
pub const ROOT_REL: &str = "ROOT";

/// Project a constituency tree onto its dependency tree.
///
/// Head percolation with relaxed nuclearity: the head of a node is its
/// first nucleus child (the first child when none is marked), and every
/// other child becomes a dependent of that head, labeled with the node's
/// relation. Multinuclear nodes attach their non-head nuclei the same
/// way.
pub fn rst_to_deptree(tree: &RstTree) -> DepTree {
    project(tree, ROOT_REL)
}

fn project(tree: &RstTree, rel: &str) -> DepTree {
    match tree {
        RstTree::Leaf(edu) => DepTree {
            edu: edu.clone(),
            rel: rel.to_string(),
            children: Vec::new(),
        },
        RstTree::Node { relation, children } => {
            let head_idx = children
                .iter()
                .position(|(nuclearity, _)| *nuclearity == Nuclearity::Nucleus)
                .unwrap_or(0);
            let mut head = project(&children[head_idx].1, rel);
            for (idx, (_, child)) in children.iter().enumerate() {
                if idx != head_idx {
                    head.children.push(project(child, relation));
                }
            }
            head
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edu(num: usize, text: &str) -> Edu {
        Edu::new(num, text, (num - 1) * 10, num * 10)
    }

    /// "A elaborated-by B, the pair joined with C."
    fn sample_tree() -> RstTree {
        RstTree::node(
            "joint",
            vec![
                (
                    Nuclearity::Nucleus,
                    RstTree::node(
                        "elaboration",
                        vec![
                            (Nuclearity::Nucleus, RstTree::leaf(edu(1, "A"))),
                            (Nuclearity::Satellite, RstTree::leaf(edu(2, "B"))),
                        ],
                    ),
                ),
                (Nuclearity::Nucleus, RstTree::leaf(edu(3, "C"))),
            ],
        )
    }

    #[test]
    fn leaves_in_tree_order() {
        let tree = sample_tree();
        let nums: Vec<usize> = tree.leaves().iter().map(|edu| edu.num).collect();
        assert_eq!(nums, vec![1, 2, 3]);
    }

    #[test]
    fn satellite_attaches_to_nucleus_head() {
        let dtree = rst_to_deptree(&sample_tree());

        // A heads the whole document
        assert_eq!(dtree.edu.num, 1);
        assert_eq!(dtree.rel, ROOT_REL);

        let rels: Vec<(usize, &str)> = dtree
            .children
            .iter()
            .map(|child| (child.edu.num, child.rel.as_str()))
            .collect();
        assert_eq!(rels, vec![(2, "elaboration"), (3, "joint")]);
    }

    #[test]
    fn unmarked_node_heads_first_child() {
        let tree = RstTree::node(
            "contrast",
            vec![
                (Nuclearity::Satellite, RstTree::leaf(edu(1, "A"))),
                (Nuclearity::Satellite, RstTree::leaf(edu(2, "B"))),
            ],
        );
        let dtree = rst_to_deptree(&tree);
        assert_eq!(dtree.edu.num, 1);
        assert_eq!(dtree.children.len(), 1);
        assert_eq!(dtree.children[0].edu.num, 2);
        assert_eq!(dtree.children[0].rel, "contrast");
    }

    #[test]
    fn single_leaf_projects_to_bare_root() {
        let dtree = rst_to_deptree(&RstTree::leaf(edu(1, "A")));
        assert_eq!(dtree.edu.num, 1);
        assert_eq!(dtree.rel, ROOT_REL);
        assert!(dtree.children.is_empty());
    }
}
