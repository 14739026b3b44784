//! By-id queries over a node sequence.
//!
//! All functions are total: an unknown id answers `None`/`false`/`Missing`,
//! never an error. Duplicate ids are a caller error and are not defended
//! against; the first depth-first match wins.

use crate::node::TreeNode;

/// Result of a parent lookup, keeping "sits at the root level" apart from
/// "no such node".
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParentLookup<'a> {
    /// The node sits directly in the root sequence.
    Root,
    /// The node sits under this directory.
    Node(&'a TreeNode),
    /// No node with that id exists in the tree.
    Missing,
}

impl<'a> ParentLookup<'a> {
    pub fn node(&self) -> Option<&'a TreeNode> {
        match *self {
            Self::Node(parent) => Some(parent),
            Self::Root | Self::Missing => None,
        }
    }
}

/// Depth-first search for a node by id.
pub fn find<'a>(id: &str, children: &'a [TreeNode]) -> Option<&'a TreeNode> {
    for node in children {
        if node.id() == id {
            return Some(node);
        }
        if let TreeNode::Directory { children, .. } = node {
            if let Some(found) = find(id, children) {
                return Some(found);
            }
        }
    }
    None
}

/// Locate the directory owning the node with the given id.
pub fn find_parent<'a>(id: &str, children: &'a [TreeNode]) -> ParentLookup<'a> {
    if children.iter().any(|node| node.id() == id) {
        return ParentLookup::Root;
    }

    fn owner<'a>(id: &str, children: &'a [TreeNode]) -> Option<&'a TreeNode> {
        for node in children {
            if let TreeNode::Directory { children: inner, .. } = node {
                if inner.iter().any(|child| child.id() == id) {
                    return Some(node);
                }
                if let Some(found) = owner(id, inner) {
                    return Some(found);
                }
            }
        }
        None
    }

    match owner(id, children) {
        Some(parent) => ParentLookup::Node(parent),
        None => ParentLookup::Missing,
    }
}

/// True iff `node_id` appears anywhere under the candidate ancestor's
/// children, recursively. False when the candidate is a leaf or absent.
pub fn is_ancestor_of(ancestor_id: &str, node_id: &str, children: &[TreeNode]) -> bool {
    match find(ancestor_id, children) {
        Some(TreeNode::Directory { children, .. }) => find(node_id, children).is_some(),
        _ => false,
    }
}

pub fn is_directory(id: &str, children: &[TreeNode]) -> bool {
    matches!(find(id, children), Some(TreeNode::Directory { .. }))
}

pub fn is_directory_empty(id: &str, children: &[TreeNode]) -> bool {
    matches!(
        find(id, children),
        Some(TreeNode::Directory { children, .. }) if children.is_empty()
    )
}

pub fn is_directory_expanded(id: &str, children: &[TreeNode]) -> bool {
    matches!(
        find(id, children),
        Some(TreeNode::Directory { expanded: true, .. })
    )
}
