use std::{path::Path, sync::Arc};

use crate::{
    Area, Error, GeoTransform, Layer, LayerExtent, PixelScale, Point, RasterSample, Result, Window,
    constants::{LONGITUDE_MAX, LONGITUDE_MIN},
    layer::window_for_area,
    rasterfile::{GeoTiffFile, RasterFile},
    rounding::round_up_pixels,
};

use super::FileGeoreference;

/// Layer with values that only vary by latitude.
///
/// The source is a one pixel wide raster, its single column is repeated over every longitude from -180 to 180.
/// The column is read completely when the layer is created and shared by all narrowed copies.
#[derive(Debug, Clone)]
pub struct UniformBandLayer<T: RasterSample> {
    strip: Arc<[T]>,
    area: Area,
    pixel_scale: PixelScale,
    geo_transform: GeoTransform,
    window: Window,
    interest: Option<Area>,
}

impl<T: RasterSample> UniformBandLayer<T> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(GeoTiffFile::<T>::open(path)?)
    }

    pub fn new<F: RasterFile<Sample = T>>(file: F) -> Result<Self> {
        let size = file.raster_size();
        if size.width != 1 {
            return Err(Error::NotOnePixelWide(size.width));
        }

        let georef = FileGeoreference::read(&file)?;
        let pixel_scale = georef.pixel_scale;
        let top = georef.geo_transform.top_left().y();
        let bottom = top + size.height as f64 * pixel_scale.y;
        let area = Area::new(LONGITUDE_MIN, top, LONGITUDE_MAX, bottom)?;

        let strip: Arc<[T]> = file.read_window(&size.full_window())?.into();
        let window = Window::full(
            round_up_pixels((LONGITUDE_MAX - LONGITUDE_MIN) / pixel_scale.x, pixel_scale.x),
            size.height as i64,
        );

        log::debug!("Uniform band layer: {} rows, area {area}, pixel scale {pixel_scale}", strip.len());

        Ok(UniformBandLayer {
            strip,
            area,
            pixel_scale,
            geo_transform: GeoTransform::from_top_left_and_pixel_scale(Point::new(LONGITUDE_MIN, top), pixel_scale),
            window,
            interest: None,
        })
    }

    /// The cached latitude values, one per row
    pub fn strip(&self) -> &[T] {
        &self.strip
    }
}

impl<T: RasterSample> LayerExtent for UniformBandLayer<T> {
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

impl<T: RasterSample> Layer for UniformBandLayer<T> {
    type Sample = T;

    fn set_area_of_interest(&self, area: &Area) -> Result<Self> {
        Ok(UniformBandLayer {
            strip: Arc::clone(&self.strip),
            window: window_for_area(&self.area, &self.geo_transform, area),
            interest: Some(*area),
            ..*self
        })
    }

    /// Passes the rows of `region` as a single column, the x offset and width of `region` are ignored.
    fn with_data_at<R, C>(&self, region: &Window, consumer: C) -> Result<R>
    where
        C: FnOnce(&[T], usize) -> Result<R>,
    {
        let start = self.window.yoff.checked_add(region.yoff).ok_or(Error::WindowExceedsBounds)?;
        let end = start.checked_add(region.ysize).ok_or(Error::WindowExceedsBounds)?;
        if start < 0 || region.ysize < 0 || end > self.strip.len() as i64 {
            return Err(Error::WindowExceedsBounds);
        }

        log::trace!("Uniform band rows {start}..{end}");
        consumer(&self.strip[start as usize..end as usize], 1)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::{
        rasterfile::{GeoTag, MemoryRasterFile, RasterSize},
        testutils,
    };

    fn band_file(width: usize, height: usize, scale: f64) -> Result<MemoryRasterFile<f32>> {
        let data = (0..width * height).map(|v| v as f32).collect();
        Ok(MemoryRasterFile::new(RasterSize::new(width, height), data)?
            .with_geotag(GeoTag::PixelScale, vec![scale, scale, 0.0])
            .with_geotag(GeoTag::TiePoint, vec![0.0, 0.0, 0.0, -180.0, 90.0, 0.0]))
    }

    #[test]
    fn band_spans_all_longitudes() -> Result<()> {
        let layer = UniformBandLayer::new(band_file(1, 1800, 0.1)?)?;

        assert_eq!(layer.window(), Window::new(0, 0, 3600, 1800));
        assert_relative_eq!(layer.area(), Area::new(-180.0, 90.0, 180.0, -90.0)?, epsilon = 1e-9);
        assert_eq!(layer.pixel_scale(), PixelScale::new(0.1, -0.1));
        assert_eq!(layer.strip().len(), 1800);
        Ok(())
    }

    #[test]
    fn narrow_band_to_own_area() -> Result<()> {
        let layer = UniformBandLayer::new(band_file(1, 1800, 0.1)?)?;
        let narrowed = layer.set_area_of_interest(&layer.area())?;

        assert_eq!(narrowed.window(), Window::full(3600, 1800));
        assert_eq!(narrowed.window(), layer.window());
        assert_eq!(narrowed.interest(), Some(layer.area()));
        Ok(())
    }

    #[test]
    fn band_rows_with_huge_offset() -> Result<()> {
        let layer = UniformBandLayer::new(band_file(1, 10, 1.0)?)?;
        let narrowed = layer.set_area_of_interest(&Area::new(0.0, 88.0, 1.0, 87.0)?)?;
        assert_eq!(narrowed.window().yoff, 2);

        assert!(matches!(narrowed.read_region(&Window::new(0, i64::MAX, 1, 1)), Err(Error::WindowExceedsBounds)));
        assert!(matches!(layer.read_region(&Window::new(0, 1, 1, i64::MAX)), Err(Error::WindowExceedsBounds)));
        Ok(())
    }

    #[test]
    fn band_ignores_source_longitude() -> Result<()> {
        let file = band_file(1, 10, 1.0)?.with_geotag(GeoTag::TiePoint, vec![0.0, 0.0, 0.0, 12.0, 5.0, 0.0]);
        let layer = UniformBandLayer::new(file)?;

        assert_relative_eq!(layer.area(), Area::new(-180.0, 5.0, 180.0, -5.0)?);
        assert_eq!(layer.window().xsize, 360);
        Ok(())
    }

    #[test]
    fn band_must_be_one_pixel_wide() -> Result<()> {
        assert!(matches!(UniformBandLayer::new(band_file(2, 10, 1.0)?), Err(Error::NotOnePixelWide(2))));
        Ok(())
    }

    #[test]
    fn band_data_ignores_x() -> Result<()> {
        let layer = UniformBandLayer::new(band_file(1, 180, 1.0)?)?;

        let (rows, stride) = layer.with_data_at(&Window::new(250, 10, 40, 3), |data, stride| Ok((data.to_vec(), stride)))?;
        assert_eq!(stride, 1);
        assert_eq!(rows, vec![10.0, 11.0, 12.0]);
        Ok(())
    }

    #[test]
    fn narrowed_band_reads_cached_rows() -> Result<()> {
        let layer = UniformBandLayer::new(band_file(1, 180, 1.0)?)?;
        let narrowed = layer.set_area_of_interest(&Area::new(3.0, 50.0, 8.0, 45.0)?)?;

        assert_eq!(narrowed.window(), Window::new(183, 40, 5, 5));
        assert_eq!(narrowed.read_region(&Window::full(5, 2))?, vec![40.0, 41.0]);
        assert!(Arc::ptr_eq(&layer.strip, &narrowed.strip));
        Ok(())
    }

    #[test]
    fn band_rows_outside_strip() -> Result<()> {
        let layer = UniformBandLayer::new(band_file(1, 10, 1.0)?)?;

        assert!(matches!(layer.read_region(&Window::new(0, 8, 1, 3)), Err(Error::WindowExceedsBounds)));
        assert!(matches!(layer.read_region(&Window::new(0, -1, 1, 2)), Err(Error::WindowExceedsBounds)));
        assert_eq!(layer.read_region(&Window::new(0, 10, 1, 0))?, Vec::<f32>::new());
        Ok(())
    }

    #[test_log::test]
    fn open_band_geotiff() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("band.tif");
        let rows: Vec<u8> = (0..180).map(|v| v as u8).collect();
        testutils::write_north_up_geotiff(&path, &Area::new(0.0, 90.0, 1.0, -90.0)?, PixelScale::north_up(1.0), &rows)?;

        let layer = UniformBandLayer::<u8>::open(&path)?;
        assert_eq!(layer.window(), Window::full(360, 180));
        assert_eq!(layer.strip(), &rows[..]);
        Ok(())
    }
}
