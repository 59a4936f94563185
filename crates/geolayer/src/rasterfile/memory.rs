use crate::{Area, Error, PixelScale, RasterSample, Result, Window};

use super::{GeoTag, RasterFile, RasterSize};

/// Raster file kept in memory, used to back layers with generated data.
#[derive(Debug, Clone)]
pub struct MemoryRasterFile<T: RasterSample> {
    size: RasterSize,
    data: Vec<T>,
    pixel_scale: Vec<f64>,
    tie_point: Vec<f64>,
    projection: String,
}

impl<T: RasterSample> MemoryRasterFile<T> {
    pub fn new(size: RasterSize, data: Vec<T>) -> Result<Self> {
        if data.len() != size.pixel_count() {
            return Err(Error::InvalidArgument(format!(
                "Raster of size {size} requires {} values, got {}",
                size.pixel_count(),
                data.len()
            )));
        }

        Ok(MemoryRasterFile {
            size,
            data,
            pixel_scale: Vec::new(),
            tie_point: Vec::new(),
            projection: String::new(),
        })
    }

    /// Creates a raster with its top left corner at the top left of `area`, georeferenced the way a north-up GeoTIFF is.
    pub fn north_up(area: &Area, pixel_scale: PixelScale, size: RasterSize, data: Vec<T>) -> Result<Self> {
        Ok(Self::new(size, data)?
            .with_geotag(GeoTag::PixelScale, vec![pixel_scale.abs_x(), pixel_scale.abs_y(), 0.0])
            .with_geotag(GeoTag::TiePoint, vec![0.0, 0.0, 0.0, area.left(), area.top(), 0.0]))
    }

    pub fn with_geotag(mut self, tag: GeoTag, values: Vec<f64>) -> Self {
        match tag {
            GeoTag::PixelScale => self.pixel_scale = values,
            GeoTag::TiePoint => self.tie_point = values,
        }
        self
    }

    pub fn with_projection(mut self, projection: impl Into<String>) -> Self {
        self.projection = projection.into();
        self
    }
}

impl<T: RasterSample> RasterFile for MemoryRasterFile<T> {
    type Sample = T;

    fn raster_size(&self) -> RasterSize {
        self.size
    }

    fn geotag(&self, tag: GeoTag) -> Result<Vec<f64>> {
        Ok(match tag {
            GeoTag::PixelScale => self.pixel_scale.clone(),
            GeoTag::TiePoint => self.tie_point.clone(),
        })
    }

    fn projection(&self) -> Result<String> {
        Ok(self.projection.clone())
    }

    fn read_window(&self, window: &Window) -> Result<Vec<T>> {
        if !window.fits_within(self.size.width as i64, self.size.height as i64) {
            return Err(Error::WindowExceedsBounds);
        }

        let mut data = Vec::with_capacity(window.pixel_count());
        for y in window.yoff..window.yoff + window.ysize {
            let start = y as usize * self.size.width + window.xoff as usize;
            data.extend_from_slice(&self.data[start..start + window.xsize as usize]);
        }

        Ok(data)
    }
}
