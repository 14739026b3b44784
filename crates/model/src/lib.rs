//! Headless tree model for drag-and-drop UIs: an immutable, recursively
//! nested node structure plus pure structural edits (insert, remove, move,
//! patch, batch changes). Rendering and gesture capture live elsewhere;
//! this crate only turns edit requests into new tree values.

pub mod edit;
pub mod lookup;

mod change;
mod node;

pub use change::{DropPosition, HoverTarget, NodePatch, TreeChange};
pub use lookup::ParentLookup;
pub use node::{TreeIdentifier, TreeNode, dump};
