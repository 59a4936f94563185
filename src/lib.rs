//! Georeferenced raster layers: GeoTIFF files, latitude bands and rasterized vector geometry that can be
//! intersected and read pixel aligned.

#[doc(inline)]
pub use geolayer::*;
