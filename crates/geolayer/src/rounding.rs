//! Conversion of fractional pixel counts to whole pixels.
//!
//! Pixel counts are rounded outwards so no data is lost, unless the excess is smaller than
//! [`MINIMAL_DEGREE_OF_INTEREST`] on the ground. In that case the fraction is floating point noise and
//! rounding outwards would only add an empty sliver of a pixel.

use crate::{Area, Error, PixelScale, Result, Window, constants::MINIMAL_DEGREE_OF_INTEREST};

/// Rounds a pixel count up, unless the fractional part covers less than the minimal distance of interest.
pub fn round_up_pixels(value: f64, pixel_scale: f64) -> i64 {
    let floored = value.floor();
    let degrees_diff = (value - floored) * pixel_scale;
    if degrees_diff < MINIMAL_DEGREE_OF_INTEREST {
        floored as i64
    } else {
        value.ceil() as i64
    }
}

/// Rounds a pixel count down, unless the distance to the next whole pixel is less than the minimal distance of interest.
pub fn round_down_pixels(value: f64, pixel_scale: f64) -> i64 {
    let ceiled = value.ceil();
    let degrees_diff = (ceiled - value) * pixel_scale;
    if degrees_diff < MINIMAL_DEGREE_OF_INTEREST {
        ceiled as i64
    } else {
        value.floor() as i64
    }
}

/// Grows `area` to the nearest enclosing pixel boundaries of a grid anchored at the coordinate origin.
///
/// Plain floor/ceil is used here, unlike the tolerant rounding above: the requested area is always fully covered.
/// The returned window spans the aligned area starting at offset (0, 0).
pub fn align_to_pixel_grid(area: &Area, pixel_scale: PixelScale) -> Result<(Area, Window)> {
    align_bounds_to_pixel_grid([area.left(), area.top(), area.right(), area.bottom()], pixel_scale)
}

/// Same as [`align_to_pixel_grid`] for raw `[left, top, right, bottom]` bounds.
///
/// The bounds are only validated after alignment, so a degenerate extent that does not lie on a pixel boundary
/// still grows to a whole pixel.
pub(crate) fn align_bounds_to_pixel_grid(bounds: [f64; 4], pixel_scale: PixelScale) -> Result<(Area, Window)> {
    if !pixel_scale.is_valid() {
        return Err(Error::InvalidArgument(format!("Invalid pixel scale: {pixel_scale}")));
    }

    let x_step = pixel_scale.abs_x();
    let y_step = pixel_scale.abs_y();
    let [left, top, right, bottom] = bounds;

    let left = (left / x_step).floor();
    let right = (right / x_step).ceil();
    let top = (top / y_step).ceil();
    let bottom = (bottom / y_step).floor();

    let aligned = Area::new(left * x_step, top * y_step, right * x_step, bottom * y_step)?;
    let window = Window::full((right - left) as i64, (top - bottom) as i64);

    Ok((aligned, window))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn rounding_integer_values_is_identity() {
        for scale in [0.1, 1.0, 0.0001, 30.0, -0.5] {
            assert_eq!(round_up_pixels(3.0, scale), 3);
            assert_eq!(round_down_pixels(3.0, scale), 3);
            assert_eq!(round_up_pixels(0.0, scale), 0);
            assert_eq!(round_down_pixels(-7.0, scale), -7);
        }
    }

    #[test]
    fn round_up_ignores_noise() {
        // 1e-5 pixels of 0.1 degree is about 11 cm on the ground
        assert_eq!(round_up_pixels(12.0 + 1e-5, 0.1), 12);
        // 0.5 pixel of 0.1 degree is well above a meter
        assert_eq!(round_up_pixels(12.5, 0.1), 13);
        // A tiny fraction of a huge pixel still counts
        assert_eq!(round_up_pixels(12.0 + 1e-5, 10.0), 13);
    }

    #[test]
    fn round_down_ignores_noise() {
        assert_eq!(round_down_pixels(12.0 - 1e-5, 0.1), 12);
        assert_eq!(round_down_pixels(12.5, 0.1), 12);
        assert_eq!(round_down_pixels(12.0 - 1e-5, 10.0), 11);
    }

    #[test]
    fn rounding_threshold() {
        let scale = 1.0;
        let below = MINIMAL_DEGREE_OF_INTEREST * 0.5;
        let above = MINIMAL_DEGREE_OF_INTEREST * 2.0;

        assert_eq!(round_up_pixels(5.0 + below, scale), 5);
        assert_eq!(round_up_pixels(5.0 + above, scale), 6);
        assert_eq!(round_down_pixels(5.0 - below, scale), 5);
        assert_eq!(round_down_pixels(5.0 - above, scale), 4);
    }

    #[test]
    fn floating_point_pixel_counts() {
        // Does not evaluate to exactly 97.0
        let value = (20.0 - 10.3) / 0.1;
        assert_eq!(round_up_pixels(value, 0.1), 97);
        assert_eq!(round_down_pixels(value, 0.1), 97);
    }

    #[test]
    fn align_area_outwards() -> Result<()> {
        let area = Area::new(0.3, 9.7, 4.6, 0.2)?;
        let (aligned, window) = align_to_pixel_grid(&area, PixelScale::north_up(0.5))?;

        assert_relative_eq!(aligned, Area::new(0.0, 10.0, 5.0, 0.0)?);
        assert_eq!(window, Window::full(10, 20));

        Ok(())
    }

    #[test]
    fn align_already_aligned_area() -> Result<()> {
        let area = Area::new(-2.0, 3.0, 2.0, -3.0)?;
        let (aligned, window) = align_to_pixel_grid(&area, PixelScale::new(0.25, -0.25))?;

        assert_eq!(aligned, area);
        assert_eq!(window, Window::full(16, 24));

        Ok(())
    }

    #[test]
    fn align_degenerate_bounds() -> Result<()> {
        let (aligned, window) = align_bounds_to_pixel_grid([0.3, 2.2, 0.3, 2.2], PixelScale::north_up(0.5))?;
        assert_relative_eq!(aligned, Area::new(0.0, 2.5, 0.5, 2.0)?);
        assert_eq!(window, Window::full(1, 1));

        assert!(matches!(
            align_bounds_to_pixel_grid([1.0, 2.0, 1.0, 1.0], PixelScale::north_up(0.5)),
            Err(Error::InvalidDimensions)
        ));
        assert!(matches!(
            align_bounds_to_pixel_grid([f64::NAN, 2.0, 1.0, 1.0], PixelScale::north_up(0.5)),
            Err(Error::InvalidDimensions)
        ));
        Ok(())
    }

    #[test]
    fn align_with_invalid_scale() -> Result<()> {
        let area = Area::new(0.0, 1.0, 1.0, 0.0)?;
        assert!(matches!(
            align_to_pixel_grid(&area, PixelScale::new(0.0, -1.0)),
            Err(Error::InvalidArgument(_))
        ));

        Ok(())
    }
}
