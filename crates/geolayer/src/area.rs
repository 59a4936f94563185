//! Geographic bounding rectangles.

use approx::{AbsDiffEq, RelativeEq};

use crate::{Error, Point, Result};

/// A geographic bounding rectangle expressed in the same units as the pixel scale of the layers it is used with.
///
/// The rectangle is never empty: `left < right` and `bottom < top` always hold.
/// Narrowing operations produce new areas, an existing area is never modified.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Area {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl Area {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Result<Self> {
        // Written as negated comparisons so NaN coordinates are rejected as well
        if !(left < right) || !(bottom < top) {
            return Err(Error::InvalidDimensions);
        }

        Ok(Area { left, top, right, bottom })
    }

    pub fn from_top_left_bottom_right(top_left: Point, bottom_right: Point) -> Result<Self> {
        Self::new(top_left.x(), top_left.y(), bottom_right.x(), bottom_right.y())
    }

    pub fn left(&self) -> f64 {
        self.left
    }

    pub fn top(&self) -> f64 {
        self.top
    }

    pub fn right(&self) -> f64 {
        self.right
    }

    pub fn bottom(&self) -> f64 {
        self.bottom
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.right, self.bottom)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// True when both areas share a region with a non zero surface, touching edges do not count.
    pub fn intersects(&self, other: &Area) -> bool {
        self.left < other.right && self.right > other.left && self.top > other.bottom && self.bottom < other.top
    }

    pub fn contains(&self, other: &Area) -> bool {
        self.left <= other.left && self.right >= other.right && self.top >= other.top && self.bottom <= other.bottom
    }
}

impl std::fmt::Display for Area {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Area(left: {}, top: {}, right: {}, bottom: {})",
            self.left, self.top, self.right, self.bottom
        )
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Area {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct RawArea {
            left: f64,
            top: f64,
            right: f64,
            bottom: f64,
        }

        let raw = RawArea::deserialize(deserializer)?;
        Area::new(raw.left, raw.top, raw.right, raw.bottom).map_err(serde::de::Error::custom)
    }
}

impl AbsDiffEq for Area {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.top_left().abs_diff_eq(&other.top_left(), epsilon) && self.bottom_right().abs_diff_eq(&other.bottom_right(), epsilon)
    }
}

impl RelativeEq for Area {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: Self::Epsilon, max_relative: Self::Epsilon) -> bool {
        Point::relative_eq(&self.top_left(), &other.top_left(), epsilon, max_relative)
            && Point::relative_eq(&self.bottom_right(), &other.bottom_right(), epsilon, max_relative)
    }
}
