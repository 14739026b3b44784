use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::node::TreeNode;

/// Where, relative to a target node, a dragged node lands. `Inside` is only
/// semantically valid against a directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropPosition {
    Above,
    Below,
    Inside,
}

/// The currently proposed drop location: a target node plus a position
/// relative to it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoverTarget {
    pub node_id: String,
    pub position: DropPosition,
}

impl HoverTarget {
    pub fn new(node_id: impl Into<String>, position: DropPosition) -> Self {
        Self {
            node_id: node_id.into(),
            position,
        }
    }
}

/// Shallow patch merged onto a node by [`TreeChange::Edit`]. A patch can
/// retitle a node, replace its payload, or flip a directory's expanded state;
/// it cannot turn a leaf into a directory or back. `expanded` is ignored for
/// leaves.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
}

impl NodePatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn data(value: Value) -> Self {
        Self {
            data: Some(value),
            ..Self::default()
        }
    }

    pub fn expanded(state: bool) -> Self {
        Self {
            expanded: Some(state),
            ..Self::default()
        }
    }
}

/// A structural change request against a tree. Every variant carries a
/// sequence of ids or nodes; the single case is a one-element sequence.
///
/// [`crate::edit::apply`] folds `Add`/`Move` sequences in reverse order and
/// `Remove`/`Edit` in forward order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeChange {
    Add {
        nodes: Vec<TreeNode>,
        target: HoverTarget,
    },
    Remove {
        node_ids: Vec<String>,
    },
    Move {
        node_ids: Vec<String>,
        target: HoverTarget,
    },
    Edit {
        node_ids: Vec<String>,
        patch: NodePatch,
    },
}

impl TreeChange {
    pub fn add(node: TreeNode, target: HoverTarget) -> Self {
        Self::Add {
            nodes: vec![node],
            target,
        }
    }

    pub fn remove(node_id: impl Into<String>) -> Self {
        Self::Remove {
            node_ids: vec![node_id.into()],
        }
    }

    pub fn move_node(node_id: impl Into<String>, target: HoverTarget) -> Self {
        Self::Move {
            node_ids: vec![node_id.into()],
            target,
        }
    }

    pub fn edit(node_id: impl Into<String>, patch: NodePatch) -> Self {
        Self::Edit {
            node_ids: vec![node_id.into()],
            patch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_constructors_wrap_in_sequences() {
        let change = TreeChange::move_node("a", HoverTarget::new("b", DropPosition::Below));
        let TreeChange::Move { node_ids, target } = &change else {
            panic!("expected a move");
        };
        assert_eq!(node_ids, &["a".to_string()]);
        assert_eq!(target.position, DropPosition::Below);
    }

    #[test]
    fn changes_round_trip_through_serde() {
        let changes = vec![
            TreeChange::add(
                TreeNode::leaf("a", "A"),
                HoverTarget::new("b", DropPosition::Inside),
            ),
            TreeChange::remove("c"),
            TreeChange::edit("d", NodePatch::title("renamed")),
        ];

        let text = serde_json::to_string(&changes).unwrap();
        let back: Vec<TreeChange> = serde_json::from_str(&text).unwrap();
        assert_eq!(back, changes);
    }
}
