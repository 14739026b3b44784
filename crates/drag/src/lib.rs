//! Drag-and-drop engine for [`tree_dnd_model`] trees: a pure drop-geometry
//! classifier, a per-tree drag/hover/drop state machine, and a registry that
//! isolates any number of coexisting trees while still allowing payloads to
//! cross between them.

pub mod geometry;

mod registry;
mod state;

pub use registry::TreeRegistry;
pub use state::{DragSource, DragState, DropPolicy, PendingDrop};
