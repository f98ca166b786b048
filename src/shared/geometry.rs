//! Window geometry
//!
//! Rectangles in root coordinates. Width and height are unsigned like the X11
//! protocol; edges are computed as `i32` so callers can do signed arithmetic.

use serde::{Deserialize, Serialize};

/// Window geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Geometry {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Build a geometry from edges, clamping inverted edges to an empty size.
    pub fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            x: left,
            y: top,
            width: (right - left).max(0) as u32,
            height: (bottom - top).max(0) as u32,
        }
    }

    /// Exclusive right edge
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn center(&self) -> (i32, i32) {
        (
            self.x + self.width as i32 / 2,
            self.y + self.height as i32 / 2,
        )
    }

    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn intersects(&self, other: &Geometry) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let g = Geometry::new(10, 20, 100, 50);
        assert_eq!(g.right(), 110);
        assert_eq!(g.bottom(), 70);
        assert_eq!(g.center(), (60, 45));
        assert_eq!(Geometry::from_edges(10, 20, 110, 70), g);
        assert_eq!(Geometry::from_edges(10, 20, 5, 70).width, 0);
    }

    #[test]
    fn test_intersections() {
        let a = Geometry::new(0, 0, 100, 100);
        let b = Geometry::new(50, 50, 100, 100);
        let c = Geometry::new(100, 0, 10, 10);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert!(a.contains_point(99, 0));
        assert!(!a.contains_point(100, 0));
    }
}
