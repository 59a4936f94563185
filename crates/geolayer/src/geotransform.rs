use std::fmt::Debug;

use approx::{AbsDiffEq, RelativeEq};

use crate::{PixelScale, Point};

#[derive(Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoTransform([f64; 6]);

impl GeoTransform {
    /// Creates a new `GeoTransform` from the provided coefficients.
    ///
    /// The coefficients are in the order: [top left x, pixel width, rotation (0 if north is up), top left y, rotation (0 if north is up), pixel height].
    pub const fn new(coefficients: [f64; 6]) -> Self {
        GeoTransform(coefficients)
    }

    pub fn from_top_left_and_pixel_scale(top_left: Point, pixel_scale: PixelScale) -> Self {
        Self::new([top_left.x(), pixel_scale.x, 0.0, top_left.y(), 0.0, pixel_scale.y])
    }

    /// Builds the transform from a GeoTIFF tie point `[I, J, K, X, Y, Z]`.
    /// Raster coordinate (I, J) maps on model coordinate (X, Y).
    pub fn from_tie_point(tie_point: &[f64; 6], pixel_scale: PixelScale) -> Self {
        let origin_x = tie_point[3] - tie_point[0] * pixel_scale.x;
        let origin_y = tie_point[4] - tie_point[1] * pixel_scale.y;
        Self::from_top_left_and_pixel_scale(Point::new(origin_x, origin_y), pixel_scale)
    }

    /// Translates a pixel position to a point in geographic coordinates.
    /// Position (0, 0) is the top left corner of the raster.
    pub fn apply(&self, col: f64, row: f64) -> Point<f64> {
        let x = self.0[0] + self.0[1] * col + self.0[2] * row;
        let y = self.0[3] + self.0[4] * col + self.0[5] * row;
        Point::new(x, y)
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.0[0], self.0[3])
    }

    /// The horizontal pixel size
    pub fn pixel_size_x(&self) -> f64 {
        self.0[1]
    }

    /// The vertical pixel size, negative for north-up rasters
    pub fn pixel_size_y(&self) -> f64 {
        self.0[5]
    }

    pub fn pixel_scale(&self) -> PixelScale {
        PixelScale::new(self.pixel_size_x(), self.pixel_size_y())
    }

    /// Returns the coefficients of the transformation.
    pub fn coefficients(&self) -> [f64; 6] {
        self.0
    }
}

impl From<[f64; 6]> for GeoTransform {
    fn from(coefficients: [f64; 6]) -> Self {
        GeoTransform(coefficients)
    }
}

impl From<GeoTransform> for [f64; 6] {
    fn from(geo_trans: GeoTransform) -> [f64; 6] {
        geo_trans.0
    }
}

impl Debug for GeoTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "GeoTransform(topleft: ({}, {}), pixel_width: {}, pixel_height: {})",
            self.0[0],
            self.0[3],
            self.pixel_size_x(),
            self.pixel_size_y()
        )
    }
}

impl AbsDiffEq for GeoTransform {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.0.abs_diff_eq(&other.0, epsilon)
    }
}

impl RelativeEq for GeoTransform {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: Self::Epsilon, max_relative: Self::Epsilon) -> bool {
        self.0.relative_eq(&other.0, epsilon, max_relative)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn transform_from_tie_point() {
        let scale = PixelScale::new(0.5, -0.25);
        let trans = GeoTransform::from_tie_point(&[0.0, 0.0, 0.0, 10.0, 20.0, 0.0], scale);
        assert_eq!(trans.coefficients(), [10.0, 0.5, 0.0, 20.0, 0.0, -0.25]);

        // Tie point anchored at raster position (2, 4)
        let trans = GeoTransform::from_tie_point(&[2.0, 4.0, 0.0, 11.0, 19.0, 0.0], scale);
        assert_relative_eq!(trans.top_left(), Point::new(10.0, 20.0));
    }

    #[test]
    fn apply_transform() {
        let trans = GeoTransform::from_top_left_and_pixel_scale(Point::new(10.0, 20.0), PixelScale::north_up(0.5));
        assert_eq!(trans.apply(0.0, 0.0), Point::new(10.0, 20.0));
        assert_eq!(trans.apply(4.0, 2.0), Point::new(12.0, 19.0));
        assert_eq!(trans.pixel_scale(), PixelScale::new(0.5, -0.5));
    }
}
