#![forbid(unsafe_code)]

//! Geometric primitives in CSS pixel space.

use serde::{Deserialize, Serialize};

/// Axis of the page coordinate system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// The perpendicular axis.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }
}

/// A point in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Coordinate along `axis`.
    #[inline]
    pub const fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Replace the coordinate along `axis`.
    #[inline]
    pub fn set(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
        }
    }
}

/// A rectangle for element bounds and clipping regions.
///
/// Uses page coordinates (origin at top-left, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    #[inline]
    pub const fn left(&self) -> f64 {
        self.x
    }

    #[inline]
    pub const fn top(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Origin coordinate along `axis`.
    #[inline]
    pub const fn start(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Extent along `axis` (width for x, height for y).
    #[inline]
    pub const fn length(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }

    /// Same size, moved to `origin`.
    #[inline]
    pub const fn at(&self, origin: Point) -> Self {
        Self::new(origin.x, origin.y, self.width, self.height)
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check whether `other` lies fully inside this rectangle.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Signed distance by which this rectangle sticks out of `clip` on each
    /// side, after shrinking `clip` by `padding`. Positive means overflow.
    pub fn overflow_within(&self, clip: &Rect, padding: Sides) -> Sides {
        Sides {
            top: clip.top() - self.top() + padding.top,
            right: self.right() - clip.right() + padding.right,
            bottom: self.bottom() - clip.bottom() + padding.bottom,
            left: clip.left() - self.left() + padding.left,
        }
    }
}

/// Per-side values used for padding and overflow.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sides {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Sides {
    /// Create new sides with equal values.
    pub const fn all(val: f64) -> Self {
        Self {
            top: val,
            right: val,
            bottom: val,
            left: val,
        }
    }

    /// Create new sides with specific values.
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Leading value (top or left) along `axis`.
    #[inline]
    pub const fn min_side(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.left,
            Axis::Y => self.top,
        }
    }

    /// Trailing value (bottom or right) along `axis`.
    #[inline]
    pub const fn max_side(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.right,
            Axis::Y => self.bottom,
        }
    }
}

impl From<f64> for Sides {
    fn from(val: f64) -> Self {
        Self::all(val)
    }
}

/// Clamp `value` into `[min, max]`, preferring `min` when the range is inverted.
#[inline]
pub fn clamp(min: f64, value: f64, max: f64) -> f64 {
    min.max(value.min(max))
}

#[cfg(test)]
mod tests {
    use super::{Axis, Point, Rect, Sides, clamp};

    #[test]
    fn rect_edges() {
        let rect = Rect::new(2.0, 3.0, 4.0, 5.0);
        assert_eq!(rect.right(), 6.0);
        assert_eq!(rect.bottom(), 8.0);
        assert_eq!(rect.start(Axis::Y), 3.0);
        assert_eq!(rect.length(Axis::X), 4.0);
    }

    #[test]
    fn rect_contains_rect() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(outer.contains_rect(&Rect::new(10.0, 10.0, 20.0, 20.0)));
        assert!(!outer.contains_rect(&Rect::new(90.0, 10.0, 20.0, 20.0)));
    }

    #[test]
    fn overflow_is_positive_when_outside() {
        let clip = Rect::new(0.0, 0.0, 100.0, 100.0);
        let el = Rect::new(-10.0, 95.0, 20.0, 10.0);
        let overflow = el.overflow_within(&clip, Sides::default());
        assert_eq!(overflow.left, 10.0);
        assert_eq!(overflow.bottom, 5.0);
        assert!(overflow.top < 0.0);
        assert!(overflow.right < 0.0);
    }

    #[test]
    fn overflow_counts_padding() {
        let clip = Rect::new(0.0, 0.0, 100.0, 100.0);
        let el = Rect::new(2.0, 2.0, 10.0, 10.0);
        let overflow = el.overflow_within(&clip, Sides::all(5.0));
        assert_eq!(overflow.left, 3.0);
        assert_eq!(overflow.top, 3.0);
    }

    #[test]
    fn clamp_prefers_min_when_inverted() {
        assert_eq!(clamp(0.0, 5.0, 10.0), 5.0);
        assert_eq!(clamp(0.0, -5.0, 10.0), 0.0);
        assert_eq!(clamp(0.0, 15.0, 10.0), 10.0);
        assert_eq!(clamp(10.0, 5.0, 0.0), 10.0);
    }

    #[test]
    fn point_axis_access() {
        let mut p = Point::new(1.0, 2.0);
        p.set(Axis::Y, 7.0);
        assert_eq!(p.get(Axis::X), 1.0);
        assert_eq!(p.get(Axis::Y), 7.0);
        assert_eq!(Axis::X.opposite(), Axis::Y);
    }
}
