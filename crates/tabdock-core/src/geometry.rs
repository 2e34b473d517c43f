#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Coordinates are signed host pixels with the origin at the top-left of the
//! window. Pointers may legitimately sit outside the window during a drag, so
//! points are signed while extents are not.

use serde::{Deserialize, Serialize};

/// A pointer location in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle used for tab bounds, strip bounds and the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    #[must_use]
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Left edge (alias for x).
    #[inline]
    #[must_use]
    pub const fn left(&self) -> i64 {
        self.x as i64
    }

    /// Top edge (alias for y).
    #[inline]
    #[must_use]
    pub const fn top(&self) -> i64 {
        self.y as i64
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// Check if the rectangle has zero area.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    #[must_use]
    pub const fn contains(&self, point: Point) -> bool {
        let x = point.x as i64;
        let y = point.y as i64;
        x >= self.left() && x < self.right() && y >= self.top() && y < self.bottom()
    }

    /// Twice the horizontal midpoint.
    ///
    /// Doubling keeps odd widths exact, so a pointer resting on the midpoint
    /// compares equal instead of falling on either side of a rounded value.
    #[inline]
    #[must_use]
    pub const fn doubled_center_x(&self) -> i64 {
        2 * self.x as i64 + self.width as i64
    }

    /// Ordering of `x` relative to the horizontal midpoint.
    #[must_use]
    pub fn cmp_center_x(&self, x: i32) -> std::cmp::Ordering {
        (2 * i64::from(x)).cmp(&self.doubled_center_x())
    }

    /// True when `x` lies strictly left of the horizontal midpoint.
    #[inline]
    #[must_use]
    pub fn is_left_of_center(&self, x: i32) -> bool {
        self.cmp_center_x(x).is_lt()
    }

    /// Create a new rectangle that is the union of this rectangle and another.
    ///
    /// The result is the smallest rectangle that contains both.
    #[must_use]
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.left().min(other.left());
        let y = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());

        Rect {
            x: clamp_i32(x),
            y: clamp_i32(y),
            width: clamp_u32(right - x),
            height: clamp_u32(bottom - y),
        }
    }
}

fn clamp_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

fn clamp_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}
