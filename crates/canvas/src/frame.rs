use crate::Bounds;
use log::debug;
use node::{CanvasDelta, CanvasPoint, CanvasSize, MindMap, SurfacePoint};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// Width and height of a freshly created canvas.
pub const DEFAULT_CANVAS_EXTENT: f32 = 2000.0;

/// Distance from an edge at which a dragged node makes the canvas grow.
pub const EDGE_THRESHOLD: f32 = 100.0;

/// How much the canvas grows per triggered edge.
pub const GROWTH_STEP: f32 = 50.0;

/// One side of the canvas.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    /// Whether growing on this edge moves the surface origin.
    pub fn is_leading(self) -> bool {
        matches!(self, Edge::Top | Edge::Left)
    }
}

/// The drawing surface nodes are placed on.
///
/// Node positions are stored in canvas space. Growth on the trailing edges
/// (bottom, right) just widens the surface. Growth on the leading edges (top,
/// left) also moves content by half a step so nothing visibly jumps; that
/// shift is kept here as an origin offset rather than written into every
/// node.
///
/// The surface only ever grows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasFrame {
    size: CanvasSize,
    /// Offset from canvas space to surface space.
    origin: CanvasDelta,
    threshold: f32,
    step: f32,
}

impl Default for CanvasFrame {
    fn default() -> Self {
        Self::new(CanvasSize::new(DEFAULT_CANVAS_EXTENT, DEFAULT_CANVAS_EXTENT))
    }
}

impl CanvasFrame {
    pub fn new(size: CanvasSize) -> Self {
        Self::with_policy(size, EDGE_THRESHOLD, GROWTH_STEP)
    }

    /// A frame with a custom edge threshold and growth step.
    ///
    /// Non-positive steps are raised to one unit so growth always makes
    /// progress.
    pub fn with_policy(size: CanvasSize, threshold: f32, step: f32) -> Self {
        Self {
            size,
            origin: CanvasDelta::ZERO,
            threshold,
            step: step.max(1.0),
        }
    }

    pub fn size(&self) -> CanvasSize {
        self.size
    }

    pub fn origin(&self) -> CanvasDelta {
        self.origin
    }

    /// Center of the surface, in canvas space.
    pub fn center(&self) -> CanvasPoint {
        self.to_canvas(self.size.center())
    }

    pub fn to_canvas(&self, point: SurfacePoint) -> CanvasPoint {
        CanvasPoint(point.0 - self.origin.0)
    }

    pub fn to_surface(&self, point: CanvasPoint) -> SurfacePoint {
        SurfacePoint(point.0 + self.origin.0)
    }

    /// Edges the point is within the threshold of, each checked on its own.
    pub fn edges_near(&self, point: SurfacePoint) -> Vec<Edge> {
        Edge::iter()
            .filter(|&edge| self.distance_to(edge, point) <= self.threshold)
            .collect()
    }

    /// Grows the surface by one step on `edge`.
    pub fn expand(&mut self, edge: Edge) {
        self.expand_by(edge, 1.0);
    }

    /// Grows the surface by `steps` whole steps on `edge` at once.
    fn expand_by(&mut self, edge: Edge, steps: f32) {
        let growth = self.step * steps;
        match edge {
            Edge::Top | Edge::Bottom => self.size.0.y += growth,
            Edge::Left | Edge::Right => self.size.0.x += growth,
        }

        match edge {
            Edge::Top => self.origin.0.y += growth / 2.0,
            Edge::Left => self.origin.0.x += growth / 2.0,
            Edge::Bottom | Edge::Right => {}
        }

        debug!(
            "canvas grew {} step(s) on {} edge to {}x{}",
            steps,
            edge,
            self.size.width(),
            self.size.height()
        );
    }

    /// Applies the auto-expansion policy for a node dragged to `point`.
    ///
    /// Returns the edges that grew. A point well inside the surface grows
    /// nothing.
    pub fn drag_to(&mut self, point: SurfacePoint) -> Vec<Edge> {
        let edges = self.edges_near(point);
        for &edge in &edges {
            self.expand(edge);
        }
        edges
    }

    /// Grows the surface until every placed node of `map` lies on it.
    ///
    /// Each edge grows by the number of whole steps it needs in a single
    /// update. Returns the edges that grew.
    pub fn fit(&mut self, map: &MindMap) -> Vec<Edge> {
        let mut grown = Vec::new();
        let Some(bounds) = Bounds::of_map(map) else {
            return grown;
        };

        // Leading edges first, since they push content toward the trailing
        // ones.
        for edge in [Edge::Left, Edge::Top, Edge::Right, Edge::Bottom] {
            let on_surface = bounds.translate(self.origin.0);
            let overflow = match edge {
                Edge::Left => -on_surface.min.x,
                Edge::Top => -on_surface.min.y,
                Edge::Right => on_surface.max.x - self.size.width(),
                Edge::Bottom => on_surface.max.y - self.size.height(),
            };
            if overflow <= 0.0 {
                continue;
            }

            // A leading step only moves content by half a step.
            let per_step = if edge.is_leading() {
                self.step / 2.0
            } else {
                self.step
            };
            self.expand_by(edge, (overflow / per_step).ceil());
            grown.push(edge);
        }

        grown
    }

    fn distance_to(&self, edge: Edge, point: SurfacePoint) -> f32 {
        match edge {
            Edge::Top => point.y(),
            Edge::Bottom => self.size.height() - point.y(),
            Edge::Left => point.x(),
            Edge::Right => self.size.width() - point.x(),
        }
    }
}
