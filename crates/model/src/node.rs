use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::change::TreeChange;
use crate::lookup::ParentLookup;
use crate::{edit, lookup};

/// A single entry in a tree: a leaf, or a directory owning an ordered run of
/// children and a collapsed/expanded display state.
///
/// Node ids are unique across the whole tree, not just among siblings; every
/// lookup keys on the global id. A node lives in exactly one parent sequence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Directory {
        id: String,
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<Value>,
        expanded: bool,
        children: Vec<TreeNode>,
    },
    Leaf {
        id: String,
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<Value>,
    },
}

impl TreeNode {
    pub fn leaf(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self::Leaf {
            id: id.into(),
            title: title.into(),
            data: None,
        }
    }

    /// A collapsed directory with no children.
    pub fn directory(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self::Directory {
            id: id.into(),
            title: title.into(),
            data: None,
            expanded: false,
            children: Vec::new(),
        }
    }

    pub fn with_data(mut self, value: Value) -> Self {
        match &mut self {
            Self::Directory { data, .. } | Self::Leaf { data, .. } => *data = Some(value),
        }
        self
    }

    /// Set the expanded state. Leaves are returned unchanged.
    pub fn expanded(mut self, state: bool) -> Self {
        if let Self::Directory { expanded, .. } = &mut self {
            *expanded = state;
        }
        self
    }

    /// Append a child. Leaves are returned unchanged.
    pub fn child(mut self, node: TreeNode) -> Self {
        if let Self::Directory { children, .. } = &mut self {
            children.push(node);
        }
        self
    }

    /// Append children. Leaves are returned unchanged.
    pub fn children(mut self, nodes: impl IntoIterator<Item = TreeNode>) -> Self {
        if let Self::Directory { children, .. } = &mut self {
            children.extend(nodes);
        }
        self
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Directory { id, .. } | Self::Leaf { id, .. } => id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Directory { title, .. } | Self::Leaf { title, .. } => title,
        }
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Directory { data, .. } | Self::Leaf { data, .. } => data.as_ref(),
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory { .. })
    }

    /// False for leaves.
    pub fn is_expanded(&self) -> bool {
        matches!(self, Self::Directory { expanded: true, .. })
    }
}

/// The root container of one independent tree instance. The `id`
/// disambiguates instances when several trees coexist in one process.
///
/// `children` are replaced wholesale on every successful edit; a previously
/// returned value is never mutated, so old references remain valid snapshots.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeIdentifier {
    pub id: String,
    pub children: Vec<TreeNode>,
}

impl TreeIdentifier {
    pub fn new(id: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            id: id.into(),
            children,
        }
    }

    pub fn empty(id: impl Into<String>) -> Self {
        Self::new(id, Vec::new())
    }

    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        lookup::find(id, &self.children)
    }

    pub fn find_parent(&self, id: &str) -> ParentLookup<'_> {
        lookup::find_parent(id, &self.children)
    }

    pub fn is_ancestor_of(&self, ancestor_id: &str, node_id: &str) -> bool {
        lookup::is_ancestor_of(ancestor_id, node_id, &self.children)
    }

    pub fn is_directory(&self, id: &str) -> bool {
        lookup::is_directory(id, &self.children)
    }

    pub fn is_directory_empty(&self, id: &str) -> bool {
        lookup::is_directory_empty(id, &self.children)
    }

    pub fn is_directory_expanded(&self, id: &str) -> bool {
        lookup::is_directory_expanded(id, &self.children)
    }

    /// Apply a change, returning the resulting tree. `self` is untouched.
    pub fn apply(&self, change: &TreeChange) -> TreeIdentifier {
        TreeIdentifier {
            id: self.id.clone(),
            children: edit::apply(change, &self.children),
        }
    }

    /// Flip a directory's expanded state, returning the resulting tree.
    /// Unknown ids and leaves yield an unchanged tree.
    pub fn toggle_expanded(&self, id: &str) -> TreeIdentifier {
        let expanded = self.is_directory_expanded(id);
        TreeIdentifier {
            id: self.id.clone(),
            children: edit::patch(
                id,
                &crate::change::NodePatch::expanded(!expanded),
                &self.children,
            ),
        }
    }

    pub fn dump(&self) -> String {
        dump(&self.children)
    }
}

/// Two-space-indented id listing of a node sequence, one node per line.
pub fn dump(children: &[TreeNode]) -> String {
    fn walk(children: &[TreeNode], depth: usize, out: &mut String) {
        for node in children {
            out.push_str(&"  ".repeat(depth));
            out.push_str(node.id());
            out.push('\n');
            if let TreeNode::Directory { children, .. } = node {
                walk(children, depth + 1, out);
            }
        }
    }

    let mut out = String::new();
    walk(children, 0, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builders_compose() {
        let node = TreeNode::directory("src", "src")
            .expanded(true)
            .child(TreeNode::leaf("main", "main.rs"))
            .children([TreeNode::leaf("lib", "lib.rs").with_data(json!({"size": 120}))]);

        assert!(node.is_directory());
        assert!(node.is_expanded());
        let TreeNode::Directory { children, .. } = &node else {
            panic!("expected a directory");
        };
        assert_eq!(children.len(), 2);
        assert_eq!(children[1].data(), Some(&json!({"size": 120})));
    }

    #[test]
    fn directory_builders_leave_leaves_unchanged() {
        let leaf = TreeNode::leaf("a", "A")
            .expanded(true)
            .child(TreeNode::leaf("b", "B"));
        assert_eq!(leaf, TreeNode::leaf("a", "A"));
    }

    #[test]
    fn dump_indents_by_depth() {
        let tree = TreeIdentifier::new(
            "t",
            vec![
                TreeNode::directory("a", "A")
                    .child(TreeNode::leaf("b", "B"))
                    .child(TreeNode::directory("c", "C").child(TreeNode::leaf("d", "D"))),
                TreeNode::leaf("e", "E"),
            ],
        );

        assert_eq!(
            tree.dump().trim(),
            r#"a
  b
  c
    d
e"#
        );
    }

    #[test]
    fn serde_keeps_variants_apart() {
        let tree = TreeIdentifier::new(
            "t",
            vec![
                TreeNode::directory("a", "A")
                    .expanded(true)
                    .child(TreeNode::leaf("b", "B")),
                TreeNode::leaf("c", "C"),
            ],
        );

        let text = serde_json::to_string(&tree).unwrap();
        let back: TreeIdentifier = serde_json::from_str(&text).unwrap();
        assert_eq!(back, tree);
        assert!(back.is_directory("a"));
        assert!(!back.is_directory("c"));
    }

    #[test]
    fn leaf_serializes_without_directory_fields() {
        let text = serde_json::to_string(&TreeNode::leaf("a", "A")).unwrap();
        assert!(!text.contains("children"));
        assert!(!text.contains("expanded"));
    }

    #[test]
    fn toggle_expanded_round_trips() {
        let tree = TreeIdentifier::new("t", vec![TreeNode::directory("a", "A")]);
        let opened = tree.toggle_expanded("a");
        assert!(opened.is_directory_expanded("a"));
        assert!(!tree.is_directory_expanded("a"));
        assert_eq!(opened.toggle_expanded("a"), tree);
    }
}
