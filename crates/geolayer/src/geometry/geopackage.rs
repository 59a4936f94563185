use geozero::{ToGeo, wkb::Wkb};

use super::EnvelopedGeometry;
use crate::{Error, Result};

const MAGIC: &[u8; 2] = b"GP";
const HEADER_SIZE: usize = 8;

/// Number of envelope values for each envelope indicator of the header flags
fn envelope_value_count(indicator: u8) -> Result<usize> {
    match indicator {
        0 => Ok(0),
        1 => Ok(4),
        2 | 3 => Ok(6),
        4 => Ok(8),
        _ => Err(Error::InvalidArgument(format!("Invalid geopackage envelope indicator: {indicator}"))),
    }
}

impl EnvelopedGeometry {
    /// Parses a GeoPackage geometry blob: the binary header followed by a WKB geometry.
    ///
    /// The envelope is taken from the header, it is computed from the geometry when the header does not contain one.
    pub fn from_gpkg_blob(blob: &[u8]) -> Result<Self> {
        if blob.len() < HEADER_SIZE || &blob[0..2] != MAGIC {
            return Err(Error::InvalidArgument("Not a geopackage geometry blob".into()));
        }

        let flags = blob[3];
        if flags & 0b0010_0000 != 0 {
            return Err(Error::InvalidArgument("Extended geopackage geometries are not supported".into()));
        }

        let little_endian = flags & 0b1 == 1;
        let envelope_size = envelope_value_count((flags >> 1) & 0b111)?;
        let body_offset = HEADER_SIZE + envelope_size * 8;
        if blob.len() < body_offset {
            return Err(Error::InvalidArgument(format!(
                "Geopackage blob too small for its envelope ({} bytes)",
                blob.len()
            )));
        }

        let envelope: Vec<f64> = blob[HEADER_SIZE..body_offset]
            .chunks_exact(8)
            .map(|bytes| {
                let mut value = [0u8; 8];
                value.copy_from_slice(bytes);
                if little_endian {
                    f64::from_le_bytes(value)
                } else {
                    f64::from_be_bytes(value)
                }
            })
            .collect();

        let geometry = Wkb(blob[body_offset..].to_vec()).to_geo()?;
        if envelope.is_empty() {
            Ok(EnvelopedGeometry::new(geometry))
        } else {
            Ok(EnvelopedGeometry::with_envelope(geometry, envelope))
        }
    }
}
