//! Access to the files backing raster layers.
//!
//! Layers only depend on the [`RasterFile`] and [`RasterFileWriter`] traits, [`GeoTiffFile`] and
//! [`GeoTiffFileWriter`] implement them on top of the pure rust `tiff` crate.

use std::path::Path;

use tiff::tags::Tag;

use crate::{RasterSample, Result, Window};

mod geokeydirectory;
mod geotiff;
mod memory;

pub use geokeydirectory::{GeoKey, GeoKeyDirectory, GeoKeyEntry};
pub use geotiff::{GeoTiffFile, GeoTiffFileWriter, GeoTiffWriteOptions};
pub use memory::MemoryRasterFile;

/// Dimensions of a raster in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RasterSize {
    pub width: usize,
    pub height: usize,
}

impl RasterSize {
    pub const fn new(width: usize, height: usize) -> Self {
        RasterSize { width, height }
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Window covering the full raster
    pub fn full_window(&self) -> Window {
        Window::full(self.width as i64, self.height as i64)
    }
}

impl std::fmt::Display for RasterSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// The georeferencing tags a layer reads from or writes to a raster file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeoTag {
    /// ModelPixelScaleTag (33550): `[scale x, scale y, scale z]`, the y scale is positive for north-up rasters
    PixelScale,
    /// ModelTiepointTag (33922): `[I, J, K, X, Y, Z]` mapping raster position (I, J, K) on model position (X, Y, Z)
    TiePoint,
}

impl GeoTag {
    pub const fn tiff_tag(&self) -> Tag {
        match self {
            GeoTag::PixelScale => Tag::ModelPixelScaleTag,
            GeoTag::TiePoint => Tag::ModelTiepointTag,
        }
    }

    /// The number of values a well formed tag contains
    pub const fn expected_count(&self) -> usize {
        match self {
            GeoTag::PixelScale => 3,
            GeoTag::TiePoint => 6,
        }
    }
}

impl std::fmt::Display for GeoTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoTag::PixelScale => write!(f, "ModelPixelScale"),
            GeoTag::TiePoint => write!(f, "ModelTiepoint"),
        }
    }
}

/// Read access to a single band raster file.
///
/// Implementations are shared between layers through an `Arc`, reads therefore take `&self`.
pub trait RasterFile: Send + Sync {
    type Sample: RasterSample;

    fn raster_size(&self) -> RasterSize;

    /// The values of a georeferencing tag, empty when the tag is not present
    fn geotag(&self, tag: GeoTag) -> Result<Vec<f64>>;

    /// Description of the coordinate system, empty when not present
    fn projection(&self) -> Result<String>;

    /// Decodes the pixels of `window`, expressed in native raster coordinates, into a row major buffer
    /// with a stride of `window.xsize`.
    fn read_window(&self, window: &Window) -> Result<Vec<Self::Sample>>;
}

/// Write access to a raster file.
///
/// Georeferencing information is collected first, [`RasterFileWriter::write_data`] writes the pixels and
/// finalizes the file.
pub trait RasterFileWriter: Sized {
    type Sample: RasterSample;
    type Options: Default;

    fn create(path: &Path, size: RasterSize, samples_per_pixel: u16, options: Self::Options) -> Result<Self>;

    fn raster_size(&self) -> RasterSize;

    fn write_geotag(&mut self, tag: GeoTag, values: &[f64]) -> Result<()>;

    fn write_projection(&mut self, projection: &str) -> Result<()>;

    fn write_directory(&mut self, directory: &GeoKeyDirectory) -> Result<()>;

    fn write_data(self, data: &[Self::Sample]) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geotags_map_on_named_tiff_tags() {
        assert_eq!(GeoTag::PixelScale.tiff_tag(), Tag::ModelPixelScaleTag);
        assert_eq!(GeoTag::TiePoint.tiff_tag(), Tag::ModelTiepointTag);
        assert_eq!(GeoTag::PixelScale.tiff_tag().to_u16(), 33550);
        assert_eq!(GeoKeyEntry::ascii(GeoKey::GeodeticCitation, 0, 7).location, Tag::GeoAsciiParamsTag.to_u16());
    }
}
