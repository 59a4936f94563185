use num::NumCast;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum SampleType {
    Int8 = 0,
    Uint8 = 1,
    Int16 = 2,
    Uint16 = 3,
    Int32 = 4,
    Uint32 = 5,
    Int64 = 6,
    Uint64 = 7,
    Float32 = 8,
    Float64 = 9,
}

impl SampleType {
    pub fn to_str(&self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::Uint8 => "uint8",
            Self::Int16 => "int16",
            Self::Uint16 => "uint16",
            Self::Int32 => "int32",
            Self::Uint32 => "uint32",
            Self::Int64 => "int64",
            Self::Uint64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
        }
    }
}

impl std::fmt::Display for SampleType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// Pixel value types a layer can produce.
pub trait RasterSample: Copy + Default + PartialEq + NumCast + num::Zero + bytemuck::Pod + std::fmt::Debug + Send + Sync + 'static {
    const TYPE: SampleType;
}

macro_rules! raster_sample_impl {
    ($t:ty, $variant:ident) => {
        impl RasterSample for $t {
            const TYPE: SampleType = SampleType::$variant;
        }
    };
}

raster_sample_impl!(i8, Int8);
raster_sample_impl!(u8, Uint8);
raster_sample_impl!(i16, Int16);
raster_sample_impl!(u16, Uint16);
raster_sample_impl!(i32, Int32);
raster_sample_impl!(u32, Uint32);
raster_sample_impl!(i64, Int64);
raster_sample_impl!(u64, Uint64);
raster_sample_impl!(f32, Float32);
raster_sample_impl!(f64, Float64);

/// Converts decoded values of one numeric type into the requested sample type.
/// Fails when a value is not representable in the target type instead of clamping it.
pub(crate) fn cast_samples<S: NumCast + Copy + std::fmt::Display, T: RasterSample>(values: &[S]) -> Result<Vec<T>> {
    values
        .iter()
        .map(|&v| {
            NumCast::from(v).ok_or_else(|| Error::InvalidArgument(format!("Value {v} can not be represented as {}", T::TYPE)))
        })
        .collect()
}
