//! Rectangles.

use cgmath::{Point2, Vector2};

/// A point in view coordinates.
pub type Point = Point2<f64>;

/// A size, or a displacement between two points.
pub type Extent = Vector2<f64>;

/// An axis-aligned rectangle given by its edges.
///
/// Coordinates grow rightwards and downwards, so `top <= bottom` for any non-empty rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    /// Creates a new rectangle from its edges.
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Rect {
        Rect {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Creates a new rectangle from an origin and a size.
    pub fn from_origin_size(origin: Point, size: Extent) -> Rect {
        Rect {
            left: origin.x,
            top: origin.y,
            right: origin.x + size.x,
            bottom: origin.y + size.y,
        }
    }

    /// Returns a zero-sized rectangle at the origin.
    pub const fn zero() -> Rect {
        Rect::new(0., 0., 0., 0.)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Moves the right edge so the width becomes `width`.
    pub fn set_width(&mut self, width: f64) {
        self.right = self.left + width;
    }

    /// Moves the bottom edge so the height becomes `height`.
    pub fn set_height(&mut self, height: f64) {
        self.bottom = self.top + height;
    }

    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn size(&self) -> Extent {
        Extent::new(self.width(), self.height())
    }

    /// Returns the center point.
    pub fn center(&self) -> Point {
        Point::new(
            (self.left + self.right) / 2.,
            (self.top + self.bottom) / 2.,
        )
    }

    /// Returns true if the point lies inside the rectangle, edges included.
    pub fn includes(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    /// Returns true if the two rectangles overlap.
    ///
    /// Rectangles that merely share an edge do not intersect.
    pub fn intersects(&self, other: Rect) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    /// Returns the intersection rectangle.
    pub fn intersect(&self, other: Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }

        Some(Rect {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        })
    }

    /// Returns the smallest rectangle containing both rectangles.
    pub fn union(&self, other: Rect) -> Rect {
        Rect {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Returns a new rectangle inset by the specified amount on each side.
    ///
    /// Negative values grow the rectangle.
    pub fn inset(&self, horiz: f64, vert: f64) -> Rect {
        Rect {
            left: self.left + horiz,
            top: self.top + vert,
            right: self.right - horiz,
            bottom: self.bottom - vert,
        }
    }

    /// Returns the rectangle translated by `(dx, dy)`.
    pub fn move_by(&self, dx: f64, dy: f64) -> Rect {
        Rect {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }

    /// Returns the rectangle translated so its top left corner sits at `(x, y)`.
    pub fn move_to(&self, x: f64, y: f64) -> Rect {
        self.move_by(x - self.left, y - self.top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_geometry() {
        let r = Rect::new(10., 20., 110., 70.);
        assert_eq!(r.width(), 100.);
        assert_eq!(r.height(), 50.);
        assert!(r.includes(Point::new(10., 20.)), "edges are inside");
        assert!(!r.includes(Point::new(9.9, 30.)));

        let below = Rect::new(10., 70., 110., 90.);
        assert!(!r.intersects(below), "shared edge is not an intersection");
        assert_eq!(
            r.intersect(Rect::new(100., 0., 200., 30.)),
            Some(Rect::new(100., 20., 110., 30.))
        );

        assert_eq!(r.move_to(0., 0.), Rect::new(0., 0., 100., 50.));
        assert_eq!(r.inset(5., 5.).inset(-5., -5.), r);
    }
}
