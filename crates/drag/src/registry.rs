use std::collections::HashMap;

use tracing::debug;
use tree_dnd_model::{HoverTarget, TreeChange, TreeIdentifier, TreeNode};

use crate::state::{DragSource, DragState};

/// Keyed store isolating drag state for any number of independently
/// operating trees in one process.
///
/// A slot is created lazily the first time a tree id is presented and lives
/// until [`TreeRegistry::remove`]; teardown belongs to the owning host
/// surface. Events for one tree can never leak hover or drag state into
/// another; the only sanctioned crossing is an explicit cross-tree drag,
/// where the host reads [`DragSource`] from the source slot and starts an
/// external drag against the destination slot.
#[derive(Default)]
pub struct TreeRegistry {
    slots: HashMap<String, DragState>,
}

impl TreeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install or refresh a tree snapshot. An existing slot keeps its
    /// in-flight drag state and policy; only the children are replaced.
    pub fn register(&mut self, tree: TreeIdentifier) -> &mut DragState {
        let TreeIdentifier { id, children } = tree;
        let slot = self
            .slots
            .entry(id.clone())
            .or_insert_with(|| {
                debug!(tree = %id, "registry slot created");
                DragState::new(TreeIdentifier::empty(id.clone()))
            });
        slot.set_children(children);
        slot
    }

    /// The slot for a tree id, created empty on first use.
    pub fn slot(&mut self, tree_id: &str) -> &mut DragState {
        self.slots.entry(tree_id.to_string()).or_insert_with(|| {
            debug!(tree = %tree_id, "registry slot created");
            DragState::new(TreeIdentifier::empty(tree_id))
        })
    }

    pub fn get(&self, tree_id: &str) -> Option<&DragState> {
        self.slots.get(tree_id)
    }

    /// Explicit teardown. Returns the removed slot, if any.
    pub fn remove(&mut self, tree_id: &str) -> Option<DragState> {
        let removed = self.slots.remove(tree_id);
        if removed.is_some() {
            debug!(tree = %tree_id, "registry slot removed");
        }
        removed
    }

    pub fn tree_ids(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    pub fn drag_start(&mut self, tree_id: &str, node: TreeNode, external: bool) {
        self.slot(tree_id).drag_start(node, external);
    }

    pub fn drag_over(&mut self, tree_id: &str, candidate_id: &str, fraction: f32) -> bool {
        self.slot(tree_id).drag_over(candidate_id, fraction)
    }

    pub fn drag_leave(&mut self, tree_id: &str, left_root: bool) {
        self.slot(tree_id).drag_leave(left_root);
    }

    pub fn commit_drop(&mut self, tree_id: &str) -> Option<TreeChange> {
        self.slot(tree_id).commit_drop()
    }

    pub fn drag_end(&mut self, tree_id: &str) {
        self.slot(tree_id).drag_end();
    }

    pub fn dragging(&self, tree_id: &str) -> Option<&DragSource> {
        self.slots.get(tree_id).and_then(DragState::dragging)
    }

    pub fn hovered(&self, tree_id: &str) -> Option<&HoverTarget> {
        self.slots.get(tree_id).and_then(DragState::hovered)
    }

    pub fn tree(&self, tree_id: &str) -> Option<&TreeIdentifier> {
        self.slots.get(tree_id).map(DragState::tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: &str, leaves: &[&str]) -> TreeIdentifier {
        TreeIdentifier::new(
            id,
            leaves
                .iter()
                .map(|leaf| TreeNode::leaf(*leaf, *leaf))
                .collect(),
        )
    }

    #[test]
    fn slots_appear_lazily_and_stay_until_removed() {
        let mut registry = TreeRegistry::new();
        assert!(registry.get("t1").is_none());

        registry.drag_end("t1");
        assert!(registry.get("t1").is_some());

        registry.remove("t1");
        assert!(registry.get("t1").is_none());
    }

    #[test]
    fn register_keeps_inflight_drag_state() {
        let mut registry = TreeRegistry::new();
        registry.register(sample("t", &["a", "b"]));
        registry.drag_start("t", TreeNode::leaf("a", "a"), false);

        registry.register(sample("t", &["a", "b", "c"]));
        assert!(registry.dragging("t").is_some());
        assert_eq!(registry.tree("t").map(|tree| tree.children.len()), Some(3));
    }

    #[test]
    fn drag_state_never_leaks_across_trees() {
        let mut registry = TreeRegistry::new();
        registry.register(sample("t1", &["a", "b"]));
        registry.register(sample("t2", &["x", "y"]));

        let dragged = registry.tree("t1").and_then(|tree| tree.find("a")).cloned();
        registry.drag_start("t1", dragged.expect("a exists"), false);
        registry.drag_over("t1", "b", 0.9);

        assert!(registry.dragging("t2").is_none());
        assert!(registry.hovered("t2").is_none());
        assert!(registry.hovered("t1").is_some());

        // gestures against the other tree are ignored while it is idle
        assert!(!registry.drag_over("t2", "x", 0.5));
    }

    #[test]
    fn cross_tree_drag_moves_a_node_between_trees() {
        let mut registry = TreeRegistry::new();
        registry.register(sample("source", &["a", "b"]));
        registry
            .register(sample("dest", &["x"]))
            .set_policy(|node, _| node.cloned().map(|accepted| vec![accepted]));

        // host notices the drag crossing tree boundaries: reads the payload
        // from the source slot and replays it as an external drag
        registry.drag_start(
            "source",
            registry
                .tree("source")
                .and_then(|tree| tree.find("a"))
                .cloned()
                .expect("a exists"),
            false,
        );
        let payload = registry.dragging("source").expect("in flight").node.clone();

        registry.drag_start("dest", payload, true);
        assert!(registry.drag_over("dest", "x", 0.9));
        let change = registry.commit_drop("dest").expect("policy accepts");
        assert!(matches!(change, TreeChange::Add { .. }));

        // the source tree gives the node up only through its own change
        registry.drag_end("source");
        let source_slot = registry.slot("source");
        source_slot.apply(&TreeChange::remove("a"));

        assert_eq!(
            registry.tree("dest").map(TreeIdentifier::dump),
            Some("x\na\n".to_string())
        );
        assert_eq!(
            registry.tree("source").map(TreeIdentifier::dump),
            Some("b\n".to_string())
        );
    }
}
