//! Integer pixel geometry.
//!
//! Conventions:
//! - `Rect` is half-open: `min` is inside, `max` is outside.
//! - A rectangle whose `max` is not strictly greater than `min` on either axis
//!   is empty; drawing into it is a no-op. Layout code produces such
//!   rectangles routinely (e.g. a fill that starts past the right edge) and
//!   relies on that.

use std::ops::{Add, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            min: Point::new(x0, y0),
            max: Point::new(x1, y1),
        }
    }

    pub const fn from_points(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn dx(&self) -> i32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn dy(&self) -> i32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.max.x <= self.min.x || self.max.y <= self.min.y
    }

    /// True when `p` lies inside the half-open rectangle.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }

    /// Intersection, or `None` when the overlap is empty.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let r = Rect::new(
            self.min.x.max(other.min.x),
            self.min.y.max(other.min.y),
            self.max.x.min(other.max.x),
            self.max.y.min(other.max.y),
        );
        if r.is_empty() { None } else { Some(r) }
    }

    pub fn translate(&self, d: Point) -> Rect {
        Rect::from_points(self.min + d, self.max + d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_open_containment() {
        let r = Rect::new(0, 0, 10, 5);
        assert!(r.contains(Point::new(0, 0)));
        assert!(r.contains(Point::new(9, 4)));
        assert!(!r.contains(Point::new(10, 4)));
        assert!(!r.contains(Point::new(9, 5)));
    }

    #[test]
    fn inverted_rect_is_empty() {
        assert!(Rect::new(5000, 0, 80, 10).is_empty());
        assert!(Rect::new(0, 10, 10, 10).is_empty());
        assert!(!Rect::new(0, 0, 1, 1).is_empty());
    }

    #[test]
    fn intersect_clips_and_rejects() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, -3, 20, 4);
        assert_eq!(a.intersect(&b), Some(Rect::new(5, 0, 10, 4)));
        assert_eq!(a.intersect(&Rect::new(10, 0, 12, 5)), None);
    }

    fn rect() -> impl proptest::strategy::Strategy<Value = Rect> {
        use proptest::prelude::*;
        (-20i32..20, -20i32..20, -20i32..20, -20i32..20).prop_map(|(a, b, c, d)| Rect::new(a, b, c, d))
    }

    proptest::proptest! {
        #[test]
        fn intersection_contains_exactly_common_points(a in rect(), b in rect(), x in -20i32..20, y in -20i32..20) {
            let p = Point::new(x, y);
            let both = a.contains(p) && b.contains(p);
            let inside = a.intersect(&b).is_some_and(|r| r.contains(p));
            proptest::prop_assert_eq!(both, inside);
        }
    }
}
