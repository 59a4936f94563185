//! The [`Layer`](crate::Layer) implementations.

use crate::{Area, Error, GeoTransform, PixelScale, Result, rasterfile::{GeoTag, RasterFile, RasterSize}};

mod geometrylayer;
mod rasterfilelayer;
mod rasterwritelayer;
mod uniformbandlayer;

pub use geometrylayer::{FILLED, GeometryLayer};
pub use rasterfilelayer::RasterFileLayer;
pub use rasterwritelayer::RasterWriteLayer;
pub use uniformbandlayer::UniformBandLayer;

use crate::rasterfile::{GeoTiffFile, GeoTiffFileWriter};

/// Layer reading a GeoTIFF file
pub type GeoTiffLayer<T> = RasterFileLayer<GeoTiffFile<T>>;
/// Layer creating a GeoTIFF file
pub type GeoTiffWriteLayer<T> = RasterWriteLayer<GeoTiffFileWriter<T>>;

/// Georeferencing of a raster file as stored in its geotags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FileGeoreference {
    pub pixel_scale: PixelScale,
    pub geo_transform: GeoTransform,
}

impl FileGeoreference {
    pub fn read<F: RasterFile>(file: &F) -> Result<Self> {
        let scale = file.geotag(GeoTag::PixelScale)?;
        if scale.len() != GeoTag::PixelScale.expected_count() {
            return Err(Error::InvalidMetadata(format!(
                "{} must contain {} values ({} found)",
                GeoTag::PixelScale,
                GeoTag::PixelScale.expected_count(),
                scale.len()
            )));
        }

        let tie_point: [f64; 6] = file.geotag(GeoTag::TiePoint)?.try_into().map_err(|values: Vec<f64>| {
            Error::InvalidMetadata(format!(
                "{} must contain {} values ({} found)",
                GeoTag::TiePoint,
                GeoTag::TiePoint.expected_count(),
                values.len()
            ))
        })?;

        // Raster rows grow downwards, latitudes grow upwards
        let pixel_scale = PixelScale::new(scale[0], -scale[1]);
        if !pixel_scale.is_valid() {
            return Err(Error::InvalidMetadata(format!("Invalid pixel scale: {pixel_scale}")));
        }

        Ok(FileGeoreference {
            pixel_scale,
            geo_transform: GeoTransform::from_tie_point(&tie_point, pixel_scale),
        })
    }

    /// The area covered by a raster of `size` pixels
    pub fn area(&self, size: RasterSize) -> Result<Area> {
        let top_left = self.geo_transform.top_left();
        let bottom_right = self.geo_transform.apply(size.width as f64, size.height as f64);
        Area::new(top_left.x(), top_left.y(), bottom_right.x(), bottom_right.y())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::rasterfile::MemoryRasterFile;

    fn file_with_tags(scale: Vec<f64>, tie_point: Vec<f64>) -> Result<MemoryRasterFile<u8>> {
        Ok(MemoryRasterFile::new(RasterSize::new(100, 50), vec![0; 5000])?
            .with_geotag(GeoTag::PixelScale, scale)
            .with_geotag(GeoTag::TiePoint, tie_point))
    }

    #[test]
    fn georeference_from_tags() -> Result<()> {
        let file = file_with_tags(vec![0.1, 0.1, 0.0], vec![0.0, 0.0, 0.0, 10.0, 20.0, 0.0])?;
        let georef = FileGeoreference::read(&file)?;

        assert_eq!(georef.pixel_scale, PixelScale::new(0.1, -0.1));
        assert_relative_eq!(georef.area(RasterSize::new(100, 50))?, Area::new(10.0, 20.0, 20.0, 15.0)?, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn georeference_from_offset_tie_point() -> Result<()> {
        let file = file_with_tags(vec![0.5, 0.5, 0.0], vec![2.0, 4.0, 0.0, 11.0, 48.0, 0.0])?;
        let georef = FileGeoreference::read(&file)?;

        assert_relative_eq!(georef.geo_transform.top_left().x(), 10.0);
        assert_relative_eq!(georef.geo_transform.top_left().y(), 50.0);
        Ok(())
    }

    #[test]
    fn georeference_with_invalid_tags() -> Result<()> {
        let tie_point = vec![0.0, 0.0, 0.0, 10.0, 20.0, 0.0];

        for (scale, tie_point) in [
            (vec![0.1, 0.1], tie_point.clone()),
            (vec![], tie_point.clone()),
            (vec![0.1, 0.1, 0.0], vec![0.0, 0.0, 0.0, 10.0, 20.0]),
            (vec![0.1, 0.1, 0.0], vec![]),
            (vec![0.0, 0.1, 0.0], tie_point),
        ] {
            let file = file_with_tags(scale, tie_point)?;
            assert!(matches!(FileGeoreference::read(&file), Err(Error::InvalidMetadata(_))));
        }

        Ok(())
    }
}
