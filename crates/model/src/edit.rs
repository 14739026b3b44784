//! The structural edit engine.
//!
//! Every function takes an immutable node sequence and returns a new one;
//! the input is never modified, so previously returned trees remain valid
//! snapshots. All operations are total: a reference to a nonexistent id
//! yields an unchanged tree rather than an error.

use crate::change::{DropPosition, HoverTarget, NodePatch, TreeChange};
use crate::lookup;
use crate::node::TreeNode;

/// Splice `node` at `target`: immediately before/after the target node for
/// `Above`/`Below`, or prepended to the target directory's children for
/// `Inside` (most-recently-dropped first).
///
/// An unknown target id, or `Inside` against a leaf, yields an unchanged
/// tree.
pub fn insert(node: TreeNode, target: &HoverTarget, children: &[TreeNode]) -> Vec<TreeNode> {
    let mut pending = Some(node);
    spliced(&mut pending, target, children)
}

fn spliced(
    pending: &mut Option<TreeNode>,
    target: &HoverTarget,
    children: &[TreeNode],
) -> Vec<TreeNode> {
    let mut out = Vec::with_capacity(children.len() + 1);
    for current in children {
        if pending.is_none() {
            out.push(current.clone());
            continue;
        }

        if current.id() == target.node_id {
            match target.position {
                DropPosition::Above => {
                    if let Some(node) = pending.take() {
                        out.push(node);
                    }
                    out.push(current.clone());
                }
                DropPosition::Below => {
                    out.push(current.clone());
                    if let Some(node) = pending.take() {
                        out.push(node);
                    }
                }
                DropPosition::Inside => match current {
                    TreeNode::Directory {
                        id,
                        title,
                        data,
                        expanded,
                        children: inner,
                    } => {
                        let mut merged = Vec::with_capacity(inner.len() + 1);
                        if let Some(node) = pending.take() {
                            merged.push(node);
                        }
                        merged.extend(inner.iter().cloned());
                        out.push(TreeNode::Directory {
                            id: id.clone(),
                            title: title.clone(),
                            data: data.clone(),
                            expanded: *expanded,
                            children: merged,
                        });
                    }
                    // caller contract violation: a leaf has no inside
                    TreeNode::Leaf { .. } => {
                        pending.take();
                        out.push(current.clone());
                    }
                },
            }
            continue;
        }

        match current {
            TreeNode::Directory {
                id,
                title,
                data,
                expanded,
                children: inner,
            } => out.push(TreeNode::Directory {
                id: id.clone(),
                title: title.clone(),
                data: data.clone(),
                expanded: *expanded,
                children: spliced(pending, target, inner),
            }),
            TreeNode::Leaf { .. } => out.push(current.clone()),
        }
    }
    out
}

/// Delete the first node matching `id`, wherever it sits. Removing a
/// directory removes its whole subtree.
pub fn remove(id: &str, children: &[TreeNode]) -> Vec<TreeNode> {
    let mut done = false;
    stripped(id, children, &mut done)
}

fn stripped(id: &str, children: &[TreeNode], done: &mut bool) -> Vec<TreeNode> {
    let mut out = Vec::with_capacity(children.len());
    for current in children {
        if !*done && current.id() == id {
            *done = true;
            continue;
        }

        if *done {
            out.push(current.clone());
            continue;
        }

        match current {
            TreeNode::Directory {
                id: node_id,
                title,
                data,
                expanded,
                children: inner,
            } => out.push(TreeNode::Directory {
                id: node_id.clone(),
                title: title.clone(),
                data: data.clone(),
                expanded: *expanded,
                children: stripped(id, inner, done),
            }),
            TreeNode::Leaf { .. } => out.push(current.clone()),
        }
    }
    out
}

/// Relocate the node matching `id` to `target`, composed as remove followed
/// by insert.
///
/// When the target no longer resolves in the post-removal tree (it was part
/// of the relocated subtree, or never existed), or the target is a leaf with
/// position `Inside`, the original tree is returned unchanged; the node is
/// never silently lost.
pub fn move_node(id: &str, target: &HoverTarget, children: &[TreeNode]) -> Vec<TreeNode> {
    let Some(node) = lookup::find(id, children) else {
        return children.to_vec();
    };
    let node = node.clone();
    let rest = remove(id, children);

    let target_resolves = match target.position {
        DropPosition::Inside => lookup::is_directory(&target.node_id, &rest),
        DropPosition::Above | DropPosition::Below => {
            lookup::find(&target.node_id, &rest).is_some()
        }
    };
    if !target_resolves {
        return children.to_vec();
    }

    insert(node, target, &rest)
}

/// Shallow-merge a patch onto the node matching `id`.
pub fn patch(id: &str, patch: &NodePatch, children: &[TreeNode]) -> Vec<TreeNode> {
    let mut done = false;
    patched(id, patch, children, &mut done)
}

fn patched(id: &str, patch: &NodePatch, children: &[TreeNode], done: &mut bool) -> Vec<TreeNode> {
    let mut out = Vec::with_capacity(children.len());
    for current in children {
        if *done {
            out.push(current.clone());
            continue;
        }

        if current.id() == id {
            *done = true;
            out.push(merged(current, patch));
            continue;
        }

        match current {
            TreeNode::Directory {
                id: node_id,
                title,
                data,
                expanded,
                children: inner,
            } => out.push(TreeNode::Directory {
                id: node_id.clone(),
                title: title.clone(),
                data: data.clone(),
                expanded: *expanded,
                children: patched(id, patch, inner, done),
            }),
            TreeNode::Leaf { .. } => out.push(current.clone()),
        }
    }
    out
}

fn merged(node: &TreeNode, patch: &NodePatch) -> TreeNode {
    let mut node = node.clone();
    match &mut node {
        TreeNode::Directory {
            title,
            data,
            expanded,
            ..
        } => {
            if let Some(new_title) = &patch.title {
                *title = new_title.clone();
            }
            if let Some(value) = &patch.data {
                *data = Some(value.clone());
            }
            if let Some(state) = patch.expanded {
                *expanded = state;
            }
        }
        TreeNode::Leaf { title, data, .. } => {
            if let Some(new_title) = &patch.title {
                *title = new_title.clone();
            }
            if let Some(value) = &patch.data {
                *data = Some(value.clone());
            }
        }
    }
    node
}

/// Dispatch a [`TreeChange`]. `Add`/`Move` sequences fold in reverse order,
/// `Remove`/`Edit` in forward order.
pub fn apply(change: &TreeChange, children: &[TreeNode]) -> Vec<TreeNode> {
    match change {
        TreeChange::Add { nodes, target } => nodes
            .iter()
            .rev()
            .fold(children.to_vec(), |acc, node| {
                insert(node.clone(), target, &acc)
            }),
        TreeChange::Move { node_ids, target } => node_ids
            .iter()
            .rev()
            .fold(children.to_vec(), |acc, id| move_node(id, target, &acc)),
        TreeChange::Remove { node_ids } => node_ids
            .iter()
            .fold(children.to_vec(), |acc, id| remove(id, &acc)),
        TreeChange::Edit { node_ids, patch: p } => node_ids
            .iter()
            .fold(children.to_vec(), |acc, id| patch(id, p, &acc)),
    }
}
