//! Axis-aligned bounding boxes over node positions.

use glam::Vec2;
use node::MindMap;

/// An axis-aligned bounding box represented by minimum and maximum points.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds {
    /// The minimum point (top-left)
    pub min: Vec2,
    /// The maximum point (bottom-right)
    pub max: Vec2,
}

impl Bounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Smallest bounds enclosing every point, or `None` for no points.
    ///
    /// Non-finite points are ignored.
    pub fn enclosing(points: impl IntoIterator<Item = Vec2>) -> Option<Self> {
        points
            .into_iter()
            .filter(|p| p.is_finite())
            .map(|p| Self::new(p, p))
            .reduce(|acc, b| acc.union(&b))
    }

    /// Bounds of every placed node in canvas space.
    pub fn of_map(map: &MindMap) -> Option<Self> {
        Self::enclosing(map.iter().filter_map(|n| n.position()).map(|p| p.0))
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// The union is the smallest bounds that contains both input bounds.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn translate(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use node::CanvasPoint;

    #[test]
    fn test_enclosing() {
        let bounds = Bounds::enclosing([
            Vec2::new(10.0, 50.0),
            Vec2::new(-5.0, 20.0),
            Vec2::new(30.0, 0.0),
        ])
        .unwrap();
        assert_eq!(bounds.min, Vec2::new(-5.0, 0.0));
        assert_eq!(bounds.max, Vec2::new(30.0, 50.0));
        assert_eq!(bounds.size(), Vec2::new(35.0, 50.0));
    }

    #[test]
    fn test_enclosing_nothing() {
        assert_eq!(Bounds::enclosing(std::iter::empty::<Vec2>()), None);
        assert_eq!(Bounds::enclosing([Vec2::new(f32::NAN, 1.0)]), None);
    }

    #[test]
    fn test_of_map_skips_unplaced_nodes() {
        let mut map = MindMap::new("root", Some(CanvasPoint::new(100.0, 100.0)));
        let root = map.root_id();
        map.add_child(root, "placed", Some(CanvasPoint::new(300.0, 50.0)))
            .unwrap();
        map.add_child(root, "pending", None).unwrap();

        let bounds = Bounds::of_map(&map).unwrap();
        assert_eq!(bounds.min, Vec2::new(100.0, 50.0));
        assert_eq!(bounds.max, Vec2::new(300.0, 100.0));
    }

    #[test]
    fn test_translate() {
        let bounds = Bounds::new(Vec2::ZERO, Vec2::new(10.0, 10.0)).translate(Vec2::new(5.0, -5.0));
        assert_eq!(bounds.min, Vec2::new(5.0, -5.0));
        assert_eq!(bounds.width(), 10.0);
        assert_eq!(bounds.height(), 10.0);
    }
}
