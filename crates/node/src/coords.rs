//! Type-safe coordinates for mind maps.
//!
//! Provides distinct types for the coordinate spaces a map touches so they
//! can't be mixed by accident.
//!
//! # Coordinate Spaces
//!
//! - **Canvas space**: Where node positions are stored.
//! - **Surface space**: Position relative to the top-left corner of the
//!   current drawing surface. Equal to canvas space until the surface grows
//!   on its leading (top/left) edges, which shifts content by an origin offset.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Largest coordinate magnitude a node may have.
///
/// Canvas growth happens in whole steps on `f32` sizes, which stop
/// resolving a step well before `f32::MAX`.
pub const MAX_COORDINATE: f32 = 1.0e7;

/// Position in canvas space (where node positions are stored).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasPoint(pub Vec2);

/// Position relative to the drawing surface's top-left corner.
///
/// Gesture locations arrive in this space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SurfacePoint(pub Vec2);

/// Width and height of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasSize(pub Vec2);

/// Movement/offset in canvas space (not a position).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasDelta(pub Vec2);

// === CanvasPoint ===

impl CanvasPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    pub fn x(&self) -> f32 {
        self.0.x
    }

    pub fn y(&self) -> f32 {
        self.0.y
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }

    /// Whether a node may be placed here: finite and no further than
    /// [MAX_COORDINATE] from the canvas origin on either axis.
    pub fn is_placeable(&self) -> bool {
        self.is_finite() && self.0.abs().max_element() <= MAX_COORDINATE
    }
}

impl From<Vec2> for CanvasPoint {
    fn from(v: Vec2) -> Self {
        Self(v)
    }
}

impl From<CanvasPoint> for Vec2 {
    fn from(p: CanvasPoint) -> Self {
        p.0
    }
}

// === SurfacePoint ===

impl SurfacePoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    pub fn x(&self) -> f32 {
        self.0.x
    }

    pub fn y(&self) -> f32 {
        self.0.y
    }
}

impl From<Vec2> for SurfacePoint {
    fn from(v: Vec2) -> Self {
        Self(v)
    }
}

// === CanvasSize ===

impl CanvasSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self(Vec2::new(width, height))
    }

    pub fn width(&self) -> f32 {
        self.0.x
    }

    pub fn height(&self) -> f32 {
        self.0.y
    }

    /// Center of a surface of this size, in surface space.
    pub fn center(&self) -> SurfacePoint {
        SurfacePoint(self.0 * 0.5)
    }
}

impl From<Vec2> for CanvasSize {
    fn from(v: Vec2) -> Self {
        Self(v)
    }
}

// === CanvasDelta ===

impl CanvasDelta {
    pub const ZERO: CanvasDelta = CanvasDelta(Vec2::ZERO);

    pub fn new(dx: f32, dy: f32) -> Self {
        Self(Vec2::new(dx, dy))
    }
}

impl From<Vec2> for CanvasDelta {
    fn from(v: Vec2) -> Self {
        Self(v)
    }
}
