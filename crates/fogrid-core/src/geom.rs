//! Geometry primitives: [`Point`] and [`Bounds`].

use std::fmt;
use std::ops::{Add, Sub};

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A 2D integer grid coordinate. X grows right, Y grows down.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Origin (0, 0).
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Return a point shifted by (dx, dy).
    #[inline]
    pub const fn shift(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Squared Euclidean distance to `other`.
    ///
    /// Widened to `i64` so the comparison against a squared radius never
    /// overflows; no square roots are taken anywhere in the engine.
    #[inline]
    pub const fn dist_sq(self, other: Self) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }

    /// Whether `other` lies within Euclidean distance `radius` of `self`.
    #[inline]
    pub const fn within_radius(self, other: Self, radius: i32) -> bool {
        self.dist_sq(other) <= (radius as i64) * (radius as i64)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Point {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// An origin-based `width` x `height` rectangle of grid coordinates.
///
/// Grids in this workspace are built once at a fixed size and never
/// resized, so bounds always start at (0, 0).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    /// Create bounds of the given size. Negative sizes are clamped to zero.
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self {
            width: if width > 0 { width } else { 0 },
            height: if height > 0 { height } else { 0 },
        }
    }

    /// Whether `p` lies inside the bounds.
    #[inline]
    pub const fn contains(self, p: Point) -> bool {
        p.x >= 0 && p.x < self.width && p.y >= 0 && p.y < self.height
    }

    /// Total number of cells.
    #[inline]
    pub const fn len(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Whether the bounds cover no cells.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Row-major iterator over every point in bounds.
    #[inline]
    pub fn iter(self) -> BoundsIter {
        BoundsIter {
            bounds: self,
            cur: Point::ZERO,
        }
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl IntoIterator for Bounds {
    type Item = Point;
    type IntoIter = BoundsIter;
    #[inline]
    fn into_iter(self) -> BoundsIter {
        self.iter()
    }
}

/// Row-major iterator over the points of a [`Bounds`].
#[derive(Clone, Debug)]
pub struct BoundsIter {
    bounds: Bounds,
    cur: Point,
}

impl Iterator for BoundsIter {
    type Item = Point;

    #[inline]
    fn next(&mut self) -> Option<Point> {
        if self.bounds.is_empty() || self.cur.y >= self.bounds.height {
            return None;
        }
        let p = self.cur;
        self.cur.x += 1;
        if self.cur.x >= self.bounds.width {
            self.cur.x = 0;
            self.cur.y += 1;
        }
        Some(p)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.bounds.is_empty() || self.cur.y >= self.bounds.height {
            return (0, Some(0));
        }
        let w = self.bounds.width as usize;
        let remaining_in_row = (self.bounds.width - self.cur.x) as usize;
        let remaining_rows = (self.bounds.height - self.cur.y - 1) as usize;
        let total = remaining_in_row + remaining_rows * w;
        (total, Some(total))
    }
}

impl ExactSizeIterator for BoundsIter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_arithmetic() {
        let a = Point::new(1, 2);
        let b = Point::new(3, 4);
        assert_eq!(a + b, Point::new(4, 6));
        assert_eq!(b - a, Point::new(2, 2));
        assert_eq!(a.shift(1, -1), Point::new(2, 1));
    }

    #[test]
    fn dist_sq_symmetry() {
        let a = Point::new(0, 0);
        let b = Point::new(3, 4);
        assert_eq!(a.dist_sq(b), 25);
        assert_eq!(b.dist_sq(a), 25);
        assert_eq!(a.dist_sq(a), 0);
    }

    #[test]
    fn within_radius_edge_cases() {
        let c = Point::new(5, 5);
        // Exactly on the circle counts as within.
        assert!(c.within_radius(Point::new(8, 9), 5));
        assert!(!c.within_radius(Point::new(9, 9), 5));
        assert!(c.within_radius(c, 0));
    }

    #[test]
    fn bounds_contains() {
        let b = Bounds::new(3, 2);
        assert!(b.contains(Point::ZERO));
        assert!(b.contains(Point::new(2, 1)));
        assert!(!b.contains(Point::new(3, 0)));
        assert!(!b.contains(Point::new(0, 2)));
        assert!(!b.contains(Point::new(-1, 0)));
    }

    #[test]
    fn bounds_iter_row_major() {
        let b = Bounds::new(3, 2);
        let pts: Vec<_> = b.iter().collect();
        assert_eq!(pts.len(), 6);
        assert_eq!(pts[0], Point::new(0, 0));
        assert_eq!(pts[1], Point::new(1, 0));
        assert_eq!(pts[5], Point::new(2, 1));
        assert_eq!(b.iter().len(), 6);
    }

    #[test]
    fn empty_bounds() {
        let b = Bounds::new(0, 5);
        assert!(b.is_empty());
        assert_eq!(b.len(), 0);
        assert_eq!(b.iter().count(), 0);
        // Negative sizes clamp.
        assert_eq!(Bounds::new(-3, 4), Bounds::new(0, 4));
    }
}
