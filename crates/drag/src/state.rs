use std::rc::Rc;

use tracing::{debug, trace};
use tree_dnd_model::{HoverTarget, TreeChange, TreeIdentifier, TreeNode, edit, lookup};

use crate::geometry;

/// The payload held by an in-flight drag. `external` marks a payload that
/// did not originate from this tree and must be added, not moved, on drop.
#[derive(Clone, Debug, PartialEq)]
pub struct DragSource {
    pub node: TreeNode,
    pub external: bool,
}

/// One-shot drop signal, consumed by the edit engine within the same
/// processing step it is set in.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingDrop {
    pub source: DragSource,
    pub target: HoverTarget,
}

/// Decides whether an externally sourced payload may land on a target, and
/// with which node(s). Returning `None` rejects the drop.
pub type DropPolicy = dyn Fn(Option<&TreeNode>, &HoverTarget) -> Option<Vec<TreeNode>>;

/// Per-tree drag/hover/drop state machine.
///
/// Owns the authoritative tree snapshot and reacts synchronously to the
/// host's gesture events: `drag_start`, `drag_over`, `drag_leave`,
/// `commit_drop`, `drag_end`. From that stream it derives a single
/// consistent hover answer and, on drop, a [`TreeChange`] applied to the
/// snapshot. Nothing here can fail; illegal gestures surface only as an
/// absent hover or an absent change.
pub struct DragState {
    tree: TreeIdentifier,
    dragging: Option<DragSource>,
    hovered: Option<HoverTarget>,
    pending: Option<PendingDrop>,
    policy: Option<Rc<DropPolicy>>,
    hover_revision: u64,
}

impl DragState {
    pub fn new(tree: TreeIdentifier) -> Self {
        Self {
            tree,
            dragging: None,
            hovered: None,
            pending: None,
            policy: None,
            hover_revision: 0,
        }
    }

    /// Install the external-drop policy. Without one, every external drag is
    /// rejected.
    pub fn policy(
        mut self,
        policy: impl Fn(Option<&TreeNode>, &HoverTarget) -> Option<Vec<TreeNode>> + 'static,
    ) -> Self {
        self.set_policy(policy);
        self
    }

    pub fn set_policy(
        &mut self,
        policy: impl Fn(Option<&TreeNode>, &HoverTarget) -> Option<Vec<TreeNode>> + 'static,
    ) {
        self.policy = Some(Rc::new(policy));
    }

    pub fn tree(&self) -> &TreeIdentifier {
        &self.tree
    }

    /// Replace the tree wholesale, e.g. when the host loaded new content.
    /// Ephemeral drag state is left alone; a stale hover resolves itself on
    /// the next gesture event.
    pub fn set_children(&mut self, children: Vec<TreeNode>) {
        self.tree.children = children;
    }

    pub fn dragging(&self) -> Option<&DragSource> {
        self.dragging.as_ref()
    }

    pub fn hovered(&self) -> Option<&HoverTarget> {
        self.hovered.as_ref()
    }

    /// Transient by construction: populated and consumed within a single
    /// `commit_drop` step, so it reads `None` between events.
    pub fn pending_drop(&self) -> Option<&PendingDrop> {
        self.pending.as_ref()
    }

    /// Bumped exactly when the observable hover value changes. Hosts
    /// re-render drop indicators only when this moves.
    pub fn hover_revision(&self) -> u64 {
        self.hover_revision
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging.is_some()
    }

    /// Enter the dragging state with the given payload. Restarting an
    /// already active drag replaces the payload.
    pub fn drag_start(&mut self, node: TreeNode, external: bool) {
        trace!(tree = %self.tree.id, node = node.id(), external, "drag start");
        self.dragging = Some(DragSource { node, external });
        self.set_hovered(None);
    }

    /// React to the pointer moving over a candidate node at the given
    /// vertical fraction of its row.
    ///
    /// Returns whether the candidate accepts the drag; on `false` the host
    /// must not propagate the event to enclosing drop zones. Ignored
    /// entirely unless a drag is active.
    pub fn drag_over(&mut self, candidate_id: &str, fraction: f32) -> bool {
        let Some(source) = self.dragging.as_ref() else {
            return false;
        };
        let source_id = source.node.id().to_string();
        let external = source.external;

        // a node cannot land on itself, nor a directory inside its own
        // descendant
        if source_id == candidate_id
            || lookup::is_ancestor_of(&source_id, candidate_id, &self.tree.children)
        {
            self.set_hovered(None);
            return false;
        }

        // the candidate can vanish mid-gesture when the host swaps the tree
        let position = match lookup::find(candidate_id, &self.tree.children) {
            Some(candidate) => geometry::drop_position(candidate, fraction),
            None => {
                self.set_hovered(None);
                return false;
            }
        };
        let target = HoverTarget::new(candidate_id, position);

        if external {
            let accepted = match (self.policy.as_deref(), self.dragging.as_ref()) {
                (Some(policy), Some(source)) => policy(Some(&source.node), &target).is_some(),
                _ => false,
            };
            if !accepted {
                self.set_hovered(None);
                return false;
            }
        }

        self.set_hovered(Some(target));
        true
    }

    /// `left_root` is true when the pointer crossed out of the tree's root
    /// bounds; transitions between rows of the same tree keep the hover (the
    /// next `drag_over` overwrites it first).
    pub fn drag_leave(&mut self, left_root: bool) {
        if left_root {
            self.set_hovered(None);
        }
    }

    /// Commit the drop at the current hover target.
    ///
    /// Internal payloads move within the snapshot; external payloads are
    /// offered to the policy and added on acceptance. Either way the machine
    /// returns to idle in the same step. The emitted change (if any) has
    /// already been applied to the owned snapshot.
    pub fn commit_drop(&mut self) -> Option<TreeChange> {
        let (Some(source), Some(target)) = (self.dragging.clone(), self.hovered.clone()) else {
            return None;
        };

        self.pending = Some(PendingDrop {
            source: source.clone(),
            target: target.clone(),
        });

        let change = if source.external {
            self.policy
                .as_deref()
                .and_then(|policy| policy(Some(&source.node), &target))
                .map(|nodes| TreeChange::Add {
                    nodes,
                    target: target.clone(),
                })
        } else {
            Some(TreeChange::move_node(source.node.id(), target.clone()))
        };

        match &change {
            Some(applied) => {
                self.tree.children = edit::apply(applied, &self.tree.children);
                debug!(
                    tree = %self.tree.id,
                    node = source.node.id(),
                    target = %target.node_id,
                    position = ?target.position,
                    external = source.external,
                    "drop committed"
                );
            }
            None => {
                debug!(
                    tree = %self.tree.id,
                    node = source.node.id(),
                    target = %target.node_id,
                    "drop declined by policy"
                );
            }
        }

        self.pending = None;
        self.dragging = None;
        self.set_hovered(None);
        change
    }

    /// Unconditional reset to idle; safe and idempotent whether or not a
    /// drop happened.
    pub fn drag_end(&mut self) {
        trace!(tree = %self.tree.id, "drag end");
        self.dragging = None;
        self.pending = None;
        self.set_hovered(None);
    }

    /// Apply an externally produced change to the owned snapshot.
    pub fn apply(&mut self, change: &TreeChange) {
        self.tree.children = edit::apply(change, &self.tree.children);
    }

    fn set_hovered(&mut self, target: Option<HoverTarget>) {
        if self.hovered == target {
            return;
        }
        trace!(tree = %self.tree.id, ?target, "hover changed");
        self.hovered = target;
        self.hover_revision += 1;
    }
}
