use std::path::Path;

use crate::{
    Area, GeoTransform, LayerExtent, PixelScale, Result, Window,
    constants::{EPSG_WGS84, WGS84_CITATION},
    rasterfile::{GeoKey, GeoKeyDirectory, GeoKeyEntry, GeoTag, RasterFileWriter, RasterSize},
    rounding::align_to_pixel_grid,
};

/// GTModelTypeGeoKey value for geographic latitude-longitude systems
const MODEL_TYPE_GEOGRAPHIC: u16 = 2;
/// GTRasterTypeGeoKey value for pixels covering an area
const RASTER_PIXEL_IS_AREA: u16 = 1;

/// Layer creating a georeferenced WGS 84 raster file.
///
/// The requested area is grown outwards to whole pixels, the file covers the aligned area.
/// Once created the file is ready for [`RasterWriteLayer::write_data`].
#[derive(Debug)]
pub struct RasterWriteLayer<W: RasterFileWriter> {
    writer: W,
    area: Area,
    pixel_scale: PixelScale,
    geo_transform: GeoTransform,
    window: Window,
}

impl<W: RasterFileWriter> RasterWriteLayer<W> {
    pub fn create(path: impl AsRef<Path>, area: &Area, pixel_scale: PixelScale) -> Result<Self> {
        Self::create_with_options(path, area, pixel_scale, W::Options::default())
    }

    pub fn create_with_options(path: impl AsRef<Path>, area: &Area, pixel_scale: PixelScale, options: W::Options) -> Result<Self> {
        let (aligned, window) = align_to_pixel_grid(area, pixel_scale)?;
        let geo_transform = GeoTransform::from_top_left_and_pixel_scale(aligned.top_left(), pixel_scale);
        let size = RasterSize::new(window.xsize as usize, window.ysize as usize);

        log::debug!(
            "Create raster {} for area {area}: aligned {aligned}, size {size}",
            path.as_ref().display()
        );

        let mut writer = W::create(path.as_ref(), size, 1, options)?;
        writer.write_geotag(GeoTag::PixelScale, &[pixel_scale.x, -pixel_scale.y, 0.0])?;
        writer.write_geotag(GeoTag::TiePoint, &[0.0, 0.0, 0.0, aligned.left(), aligned.top(), 0.0])?;
        writer.write_projection(WGS84_CITATION)?;
        writer.write_directory(&GeoKeyDirectory::new(vec![
            GeoKeyEntry::inline(GeoKey::ModelType, MODEL_TYPE_GEOGRAPHIC),
            GeoKeyEntry::inline(GeoKey::RasterType, RASTER_PIXEL_IS_AREA),
            // The citation is stored with its '|' terminator
            GeoKeyEntry::ascii(GeoKey::GeodeticCitation, 0, WGS84_CITATION.len() as u16 + 1),
            GeoKeyEntry::inline(GeoKey::GeodeticCrs, EPSG_WGS84),
        ]))?;

        Ok(RasterWriteLayer {
            writer,
            area: aligned,
            pixel_scale,
            geo_transform,
            window,
        })
    }

    pub fn raster_size(&self) -> RasterSize {
        self.writer.raster_size()
    }

    /// Writes the pixels of the complete raster in row major order and finalizes the file.
    pub fn write_data(self, data: &[W::Sample]) -> Result<()> {
        self.writer.write_data(data)
    }
}

impl<W: RasterFileWriter> LayerExtent for RasterWriteLayer<W> {
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
        None
    }
}
