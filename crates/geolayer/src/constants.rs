//! Numeric constants shared by the rounding and georeferencing code.

/// Circumference of the earth at the equator in meters.
pub const EQUATOR_CIRCUMFERENCE_METERS: f64 = 40_075_017.0;

/// Meters covered by one degree of longitude at the equator.
pub const METERS_PER_DEGREE_AT_EQUATOR: f64 = EQUATOR_CIRCUMFERENCE_METERS / 360.0;

/// Distances below this are considered floating point noise when converting extents to pixel counts.
///
/// Source data is typically accurate to 100 meters, one meter is well below that.
/// This does not hold for very high resolution data.
pub const MINIMAL_DISTANCE_OF_INTEREST_METERS: f64 = 1.0;

/// [`MINIMAL_DISTANCE_OF_INTEREST_METERS`] expressed in degrees at the equator.
pub const MINIMAL_DEGREE_OF_INTEREST: f64 = MINIMAL_DISTANCE_OF_INTEREST_METERS / METERS_PER_DEGREE_AT_EQUATOR;

/// Longitude span covered by a uniform band layer.
pub const LONGITUDE_MIN: f64 = -180.0;
pub const LONGITUDE_MAX: f64 = 180.0;

/// EPSG code of WGS 84 geographic coordinates.
pub const EPSG_WGS84: u16 = 4326;

/// Citation stored in the GeoAsciiParams of written rasters.
pub const WGS84_CITATION: &str = "WGS 84";
