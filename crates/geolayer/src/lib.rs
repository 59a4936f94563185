#![warn(clippy::unwrap_used)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Pixel aligned access to georeferenced raster data coming from different kinds of sources.
//!
//! Every source is wrapped in a [`Layer`]: GeoTIFF files ([`GeoTiffLayer`]), one pixel wide latitude bands
//! broadcast over all longitudes ([`UniformBandLayer`]) and vector geometry rasterized on demand ([`GeometryLayer`]).
//! Layers at the same pixel scale can be reduced to a common [`Area`] with [`calculate_intersection`] and narrowed
//! to it with [`Layer::set_area_of_interest`], after which their windows line up pixel for pixel.

pub type Result<T = ()> = std::result::Result<T, Error>;

mod area;
mod canvas;
pub mod constants;
mod error;
pub mod geometry;
mod geotransform;
mod layer;
pub mod layers;
mod pixelscale;
pub mod rasterfile;
mod rastersample;
pub mod rounding;
mod window;

#[cfg(test)]
mod testutils;

#[doc(inline)]
pub use area::Area;
#[doc(inline)]
pub use canvas::{Canvas, PixelFormat};
#[doc(inline)]
pub use error::Error;
#[doc(inline)]
pub use geometry::EnvelopedGeometry;
#[doc(inline)]
pub use geotransform::GeoTransform;
#[doc(inline)]
pub use layer::{Layer, LayerExtent, calculate_intersection, window_for_area};
#[doc(inline)]
pub use layers::{GeoTiffLayer, GeoTiffWriteLayer, GeometryLayer, RasterFileLayer, RasterWriteLayer, UniformBandLayer};
#[doc(inline)]
pub use pixelscale::PixelScale;
#[doc(inline)]
pub use rasterfile::{GeoTag, RasterFile, RasterFileWriter, RasterSize};
#[doc(inline)]
pub use rastersample::{RasterSample, SampleType};
#[doc(inline)]
pub use window::Window;

pub type Point<T = f64> = geo_types::Point<T>;
