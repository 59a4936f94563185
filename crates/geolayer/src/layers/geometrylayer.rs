use std::sync::Arc;

use geo_types::{Geometry, LineString, Polygon};

use crate::{
    Area, Canvas, Error, GeoTransform, Layer, LayerExtent, PixelFormat, PixelScale, Result, Window,
    geometry::{EnvelopedGeometry, geometry_type_name},
    layer::window_for_area,
    rounding::align_bounds_to_pixel_grid,
};

/// Value of pixels covered by the geometry
pub const FILLED: u8 = 255;

/// Layer producing a mask of the pixels covered by a polygon geometry.
///
/// The geometry is rasterized for every request, pixels covered by the geometry are [`FILLED`], others are 0.
#[derive(Debug, Clone)]
pub struct GeometryLayer {
    geometry: Arc<EnvelopedGeometry>,
    area: Area,
    pixel_scale: PixelScale,
    geo_transform: GeoTransform,
    window: Window,
    interest: Option<Area>,
}

impl GeometryLayer {
    pub fn new(geometry: EnvelopedGeometry, pixel_scale: PixelScale) -> Result<Self> {
        let [min_x, max_x, min_y, max_y, ..] = geometry.envelope[..] else {
            return Err(Error::InvalidEnvelope(geometry.envelope.len()));
        };

        let (area, window) = align_bounds_to_pixel_grid([min_x, max_y, max_x, min_y], pixel_scale)?;
        log::debug!(
            "Geometry layer: {} with area {area}, window {window}, pixel scale {pixel_scale}",
            geometry.type_name()
        );

        Ok(GeometryLayer {
            geometry: Arc::new(geometry),
            geo_transform: GeoTransform::from_top_left_and_pixel_scale(area.top_left(), pixel_scale),
            area,
            pixel_scale,
            window,
            interest: None,
        })
    }

    pub fn geometry(&self) -> &EnvelopedGeometry {
        &self.geometry
    }

    fn polygons(&self) -> Result<Vec<&Polygon<f64>>> {
        match &self.geometry.geometry {
            Geometry::Polygon(polygon) => Ok(vec![polygon]),
            Geometry::MultiPolygon(polygons) => Ok(polygons.iter().collect()),
            geometry => Err(Error::UnsupportedGeometryType(geometry_type_name(geometry).to_string())),
        }
    }

    /// Converts the ring coordinates to pixel positions relative to the top left of `region`
    fn ring_to_pixels(&self, ring: &LineString<f64>, region: &Window) -> Vec<(f64, f64)> {
        let x_offset = self.window.xoff.saturating_add(region.xoff) as f64;
        let y_offset = self.window.yoff.saturating_add(region.yoff) as f64;

        ring.coords()
            .map(|coord| {
                (
                    (coord.x - self.area.left()) / self.pixel_scale.x - x_offset,
                    (coord.y - self.area.top()) / self.pixel_scale.y - y_offset,
                )
            })
            .collect()
    }
}

impl LayerExtent for GeometryLayer {
    fn area(&self) -> Area {
        self.area
    }

    fn pixel_scale(&self) -> PixelScale {
        self.pixel_scale
    }

    fn window(&self) -> Window {
        self.window
    }

    fn geo_transform(&self) -> GeoTransform {
        self.geo_transform
    }

    fn interest(&self) -> Option<Area> {
        self.interest
    }
}

impl Layer for GeometryLayer {
    type Sample = u8;

    fn set_area_of_interest(&self, area: &Area) -> Result<Self> {
        Ok(GeometryLayer {
            window: window_for_area(&self.area, &self.geo_transform, area),
            interest: Some(*area),
            ..self.clone()
        })
    }

    fn with_data_at<R, C>(&self, region: &Window, consumer: C) -> Result<R>
    where
        C: FnOnce(&[u8], usize) -> Result<R>,
    {
        let polygons = self.polygons()?;
        let width = region.xsize.max(0) as usize;
        let mut canvas = Canvas::new(width, region.ysize.max(0) as usize, PixelFormat::Gray8)?;

        log::trace!("Rasterize {} polygon(s) in {region}", polygons.len());
        for polygon in polygons {
            let rings: Vec<Vec<(f64, f64)>> = std::iter::once(polygon.exterior())
                .chain(polygon.interiors())
                .map(|ring| self.ring_to_pixels(ring, region))
                .collect();
            canvas.draw_polygon(&rings);
        }

        canvas.with_bytes(|bytes| consumer(bytes, width))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use geo_types::{MultiPolygon, Point, polygon};

    use super::*;

    fn square(left: f64, bottom: f64, size: f64) -> Polygon<f64> {
        polygon![
            (x: left, y: bottom),
            (x: left + size, y: bottom),
            (x: left + size, y: bottom + size),
            (x: left, y: bottom + size),
        ]
    }

    fn filled_count(data: &[u8]) -> usize {
        data.iter().filter(|v| **v == FILLED).count()
    }

    #[test]
    fn area_is_aligned_outward() -> Result<()> {
        let geometry = EnvelopedGeometry::with_envelope(Geometry::Polygon(square(12.3, 45.6, 1.0)), vec![12.3, 15.1, 45.6, 47.0]);
        let layer = GeometryLayer::new(geometry, PixelScale::north_up(0.01))?;
        let area = layer.area();

        assert!(area.left() <= 12.3);
        assert!(area.right() >= 15.1);
        assert!(area.bottom() <= 45.6);
        assert!(area.top() >= 47.0);
        assert_eq!(layer.window().xoff, 0);
        assert_eq!(layer.window().yoff, 0);
        assert_relative_eq!(layer.window().xsize as f64 * 0.01, area.width(), epsilon = 1e-9);
        assert_relative_eq!(layer.window().ysize as f64 * 0.01, area.height(), epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn narrow_to_own_area() -> Result<()> {
        let geometry = EnvelopedGeometry::with_envelope(Geometry::Polygon(square(12.3, 45.6, 1.0)), vec![12.3, 15.1, 45.6, 47.0]);
        let layer = GeometryLayer::new(geometry, PixelScale::north_up(0.01))?;
        let narrowed = layer.set_area_of_interest(&layer.area())?;

        assert_eq!(layer.window(), Window::full(280, 140));
        assert_eq!(narrowed.window(), layer.window());
        assert_eq!(narrowed.interest(), Some(layer.area()));
        Ok(())
    }

    #[test]
    fn zero_width_envelope_covers_a_pixel() -> Result<()> {
        let geometry = EnvelopedGeometry::with_envelope(Geometry::Polygon(square(0.0, 0.0, 1.0)), vec![2.5, 2.5, 1.0, 3.0]);
        let layer = GeometryLayer::new(geometry, PixelScale::north_up(1.0))?;

        assert_relative_eq!(layer.area(), Area::new(2.0, 3.0, 3.0, 1.0)?);
        assert_eq!(layer.window(), Window::full(1, 2));
        Ok(())
    }

    #[test]
    fn envelope_too_small() {
        let geometry = EnvelopedGeometry::with_envelope(Geometry::Polygon(square(0.0, 0.0, 1.0)), vec![0.0, 1.0, 0.0]);
        assert!(matches!(
            GeometryLayer::new(geometry, PixelScale::north_up(0.1)),
            Err(Error::InvalidEnvelope(3))
        ));
    }

    #[test]
    fn rasterize_square() -> Result<()> {
        // 10 x 10 pixel area with a 4 x 4 pixel square starting at pixel (2, 3)
        let geometry = EnvelopedGeometry::with_envelope(
            Geometry::MultiPolygon(MultiPolygon::new(vec![square(2.0, 3.0, 4.0)])),
            vec![0.0, 10.0, 0.0, 10.0],
        );
        let layer = GeometryLayer::new(geometry, PixelScale::north_up(1.0))?;
        assert_eq!(layer.window(), Window::full(10, 10));

        let (data, stride) = layer.with_data_at(&Window::full(10, 10), |data, stride| Ok((data.to_vec(), stride)))?;
        assert_eq!(stride, 10);
        assert_eq!(filled_count(&data), 16);
        // Top row of the square: y = 7 maps on row 3
        assert_eq!(data[3 * 10 + 2], FILLED);
        assert_eq!(data[3 * 10 + 5], FILLED);
        assert_eq!(data[2 * 10 + 2], 0);
        assert_eq!(data[6 * 10 + 5], FILLED);
        assert_eq!(data[7 * 10 + 5], 0);
        Ok(())
    }

    #[test]
    fn rasterize_with_hole() -> Result<()> {
        let polygon = Polygon::new(square(0.0, 0.0, 4.0).exterior().clone(), vec![square(1.0, 1.0, 2.0).exterior().clone()]);
        let layer = GeometryLayer::new(EnvelopedGeometry::new(Geometry::Polygon(polygon)), PixelScale::north_up(1.0))?;

        let data = layer.read_region(&Window::full(4, 4))?;
        assert_eq!(
            data,
            vec![
                255, 255, 255, 255, //
                255, 0, 0, 255, //
                255, 0, 0, 255, //
                255, 255, 255, 255,
            ]
        );
        Ok(())
    }

    #[test]
    fn region_and_window_offsets() -> Result<()> {
        let geometry = EnvelopedGeometry::with_envelope(Geometry::Polygon(square(2.0, 3.0, 4.0)), vec![0.0, 10.0, 0.0, 10.0]);
        let layer = GeometryLayer::new(geometry, PixelScale::north_up(1.0))?;

        // Region relative to the full window
        assert_eq!(layer.read_region(&Window::new(2, 3, 2, 2))?, vec![255; 4]);
        assert_eq!(layer.read_region(&Window::new(0, 0, 2, 2))?, vec![0; 4]);

        // Narrowed to the top left of the square, the region offsets add to the window offsets
        let narrowed = layer.set_area_of_interest(&Area::new(3.0, 6.0, 8.0, 1.0)?)?;
        assert_eq!(narrowed.window(), Window::new(3, 4, 5, 5));
        assert_eq!(narrowed.read_region(&Window::new(0, 0, 3, 1))?, vec![255, 255, 255]);
        assert_eq!(narrowed.read_region(&Window::new(2, 0, 2, 1))?, vec![255, 0]);
        Ok(())
    }

    #[test]
    fn unsupported_geometry() -> Result<()> {
        let geometry = EnvelopedGeometry::with_envelope(Geometry::Point(Point::new(1.0, 1.0)), vec![0.0, 2.0, 0.0, 2.0]);
        let layer = GeometryLayer::new(geometry, PixelScale::north_up(1.0))?;

        let result = layer.read_region(&Window::full(2, 2));
        assert!(matches!(result, Err(Error::UnsupportedGeometryType(name)) if name == "Point"));
        Ok(())
    }

    #[test]
    fn empty_region() -> Result<()> {
        let layer = GeometryLayer::new(EnvelopedGeometry::new(Geometry::Polygon(square(0.0, 0.0, 4.0))), PixelScale::north_up(1.0))?;

        let len = layer.with_data_at(&Window::new(1, 1, 0, 3), |data, _| Ok(data.len()))?;
        assert_eq!(len, 0);
        Ok(())
    }
}
