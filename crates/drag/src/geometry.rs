//! Drop-position classification from pointer geometry.

use tree_dnd_model::{DropPosition, TreeNode};

/// Classify where a drop would land from the pointer's vertical fraction
/// (0.0 = top edge, 1.0 = bottom edge) within the candidate node's row.
///
/// An empty or collapsed directory has no visible children row to drop
/// between, so its middle band proposes `Inside`. Everything else (leaves,
/// expanded non-empty directories) splits at the midline; dropping "inside"
/// an expanded directory is expressed as dropping above its first child
/// instead.
///
/// Pure geometry: legality of the drop is the state machine's concern.
pub fn drop_position(node: &TreeNode, fraction: f32) -> DropPosition {
    match node {
        TreeNode::Directory {
            expanded, children, ..
        } if children.is_empty() || !*expanded => {
            if fraction >= 0.7 {
                DropPosition::Below
            } else if fraction >= 0.3 {
                DropPosition::Inside
            } else {
                DropPosition::Above
            }
        }
        _ => {
            if fraction > 0.5 {
                DropPosition::Below
            } else {
                DropPosition::Above
            }
        }
    }
}
