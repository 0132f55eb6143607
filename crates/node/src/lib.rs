//! Node model for mind maps.
//!
//! A map is a single-rooted tree of named ideas, each placed at a point on
//! the canvas. See [MindMap] for the tree operations.

pub mod coords;
mod node_id;
mod palette;
mod tree;

pub use coords::{CanvasDelta, CanvasPoint, CanvasSize, SurfacePoint, MAX_COORDINATE};
pub use node_id::NodeId;
pub use palette::{branch_color, ACCENT_VIOLET, MAX_TINTED_DEPTH};
pub use tree::{MindMap, Node, PreOrder, TreeError, MAX_DEPTH};
