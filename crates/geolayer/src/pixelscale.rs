use approx::{AbsDiffEq, RelativeEq};

/// Signed size of a pixel in geographic units.
/// The y component is negative for north-up rasters, where rows grow downwards while latitudes grow upwards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelScale {
    pub x: f64,
    pub y: f64,
}

impl PixelScale {
    pub const fn new(x: f64, y: f64) -> Self {
        PixelScale { x, y }
    }

    /// Square pixels of `size` in a north-up raster
    pub const fn north_up(size: f64) -> Self {
        PixelScale { x: size, y: -size }
    }

    pub fn abs_x(&self) -> f64 {
        self.x.abs()
    }

    pub fn abs_y(&self) -> f64 {
        self.y.abs()
    }

    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.x != 0.0 && self.y != 0.0
    }
}

impl std::fmt::Display for PixelScale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl AbsDiffEq for PixelScale {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        f64::abs_diff_eq(&self.x, &other.x, epsilon) && f64::abs_diff_eq(&self.y, &other.y, epsilon)
    }
}

impl RelativeEq for PixelScale {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: Self::Epsilon, max_relative: Self::Epsilon) -> bool {
        f64::relative_eq(&self.x, &other.x, epsilon, max_relative) && f64::relative_eq(&self.y, &other.y, epsilon, max_relative)
    }
}
