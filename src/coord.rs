//! Signed 2D coordinates used for pixel positions and neighborhood offsets.
use std::ops::{Add, Sub};

/// A signed `(x, y)` pair.
///
/// Offsets between pixels are always representable, even when one endpoint
/// lies outside an image; only [`Coord::add`]/[`Coord::sub`] are total, the
/// bounds checks live on the image types instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Coord {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl Coord {
    /// Creates a new coordinate.
    #[inline]
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean magnitude, widened to `i64` so offsets up to image
    /// dimensions around `i32::MAX` don't overflow (see `coord_compare` in
    /// the design notes).
    #[inline]
    #[must_use]
    pub fn sq_mag(self) -> i64 {
        i64::from(self.x) * i64::from(self.x) + i64::from(self.y) * i64::from(self.y)
    }
}

impl Add for Coord {
    type Output = Coord;

    #[inline]
    fn add(self, rhs: Coord) -> Coord {
        Coord::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Coord {
    type Output = Coord;

    #[inline]
    fn sub(self, rhs: Coord) -> Coord {
        Coord::new(self.x - rhs.x, self.y - rhs.y)
    }
}
