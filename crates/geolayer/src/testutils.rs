use std::path::Path;

use crate::{Area, GeoTiffWriteLayer, PixelScale, RasterSample, Result};

/// Writes `data` to a WGS 84 GeoTIFF covering `area`, `area` must be aligned to `pixel_scale`
pub fn write_north_up_geotiff<T: RasterSample>(path: &Path, area: &Area, pixel_scale: PixelScale, data: &[T]) -> Result<()> {
    GeoTiffWriteLayer::<T>::create(path, area, pixel_scale)?.write_data(data)
}
