use std::{path::Path, sync::Arc};

use crate::{
    Area, Error, GeoTransform, Layer, LayerExtent, PixelScale, RasterSample, Result, Window,
    layer::window_for_area,
    rasterfile::{GeoTiffFile, RasterFile, RasterSize},
};

use super::FileGeoreference;

/// Layer reading the pixels of a georeferenced raster file.
///
/// Narrowed copies share the file, only the window differs.
#[derive(Debug)]
pub struct RasterFileLayer<F: RasterFile> {
    file: Arc<F>,
    area: Area,
    pixel_scale: PixelScale,
    geo_transform: GeoTransform,
    window: Window,
    interest: Option<Area>,
    projection: String,
}

impl<T: RasterSample> RasterFileLayer<GeoTiffFile<T>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(GeoTiffFile::open(path)?)
    }
}

impl<F: RasterFile> RasterFileLayer<F> {
    pub fn new(file: F) -> Result<Self> {
        let georef = FileGeoreference::read(&file)?;
        let size = file.raster_size();
        let area = georef.area(size)?;
        let projection = file.projection()?;

        log::debug!("Raster layer: size {size}, area {area}, pixel scale {}", georef.pixel_scale);

        Ok(RasterFileLayer {
            file: Arc::new(file),
            area,
            pixel_scale: georef.pixel_scale,
            geo_transform: georef.geo_transform,
            window: size.full_window(),
            interest: None,
            projection,
        })
    }

    /// The coordinate system description stored in the file, empty when absent
    pub fn projection(&self) -> &str {
        &self.projection
    }

    pub fn raster_size(&self) -> RasterSize {
        self.file.raster_size()
    }

    pub fn file(&self) -> &F {
        &self.file
    }
}

impl<F: RasterFile> Clone for RasterFileLayer<F> {
    fn clone(&self) -> Self {
        RasterFileLayer {
            file: Arc::clone(&self.file),
            area: self.area,
            pixel_scale: self.pixel_scale,
            geo_transform: self.geo_transform,
            window: self.window,
            interest: self.interest,
            projection: self.projection.clone(),
        }
    }
}

impl<F: RasterFile> LayerExtent for RasterFileLayer<F> {
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

impl<F: RasterFile> Layer for RasterFileLayer<F> {
    type Sample = F::Sample;

    fn set_area_of_interest(&self, area: &Area) -> Result<Self> {
        let window = window_for_area(&self.area, &self.geo_transform, area);
        let size = self.file.raster_size();
        if !window.fits_within(size.width as i64, size.height as i64) {
            log::debug!("{window} exceeds raster of size {size} for area {area}");
            return Err(Error::WindowExceedsBounds);
        }

        Ok(RasterFileLayer {
            window,
            interest: Some(*area),
            ..self.clone()
        })
    }

    fn with_data_at<R, C>(&self, region: &Window, consumer: C) -> Result<R>
    where
        C: FnOnce(&[Self::Sample], usize) -> Result<R>,
    {
        let data = self.file.read_window(&region.offset_by(&self.window))?;
        consumer(&data, region.xsize.max(0) as usize)
    }
}
