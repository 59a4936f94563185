use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid area dimensions: left must be smaller than right and bottom smaller than top")]
    InvalidDimensions,
    #[error("Invalid raster metadata: {0}")]
    InvalidMetadata(String),
    #[error("Window exceeds the raster bounds")]
    WindowExceedsBounds,
    #[error("Uniform band raster must be one pixel wide (width: {0})")]
    NotOnePixelWide(usize),
    #[error("Geometry envelope must contain at least 4 values ({0} found)")]
    InvalidEnvelope(usize),
    #[error("Unsupported geometry type for rasterization: {0}")]
    UnsupportedGeometryType(String),
    #[error("No layers provided")]
    NoLayersProvided,
    #[error("Layers do not have the same pixel scale")]
    LayersNotAtSameScale,
    #[error("Layers do not intersect")]
    NoIntersectionPossible,
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Runtime error: {0}")]
    Runtime(String),
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("TIFF error: {0}")]
    TiffError(#[from] tiff::TiffError),
    #[cfg(feature = "geopackage")]
    #[error("Geometry decoding error: {0}")]
    GeozeroError(#[from] geozero::error::GeozeroError),
}

impl<T> From<std::sync::PoisonError<T>> for Error {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Error::Runtime(err.to_string())
    }
}
