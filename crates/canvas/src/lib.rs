//! Canvas layout for mind maps.
//!
//! Keeps the drawing surface large enough for every node and grows it when a
//! node is dragged close to an edge.

mod bounds;
mod frame;

pub use bounds::Bounds;
pub use frame::{CanvasFrame, Edge, DEFAULT_CANVAS_EXTENT, EDGE_THRESHOLD, GROWTH_STEP};
// Re-export coordinate types from node for convenience
pub use node::{CanvasDelta, CanvasPoint, CanvasSize, SurfacePoint};
