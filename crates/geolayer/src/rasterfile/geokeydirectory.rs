use tiff::tags::Tag;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeoKey {
    ModelType,
    RasterType,
    Citation,
    GeodeticCrs,
    GeodeticCitation,
    ProjectedCrs,
    Other(u16),
}

impl GeoKey {
    pub const fn id(&self) -> u16 {
        match self {
            GeoKey::ModelType => 1024,
            GeoKey::RasterType => 1025,
            GeoKey::Citation => 1026,
            GeoKey::GeodeticCrs => 2048,
            GeoKey::GeodeticCitation => 2049,
            GeoKey::ProjectedCrs => 3072,
            GeoKey::Other(id) => *id,
        }
    }

    pub const fn from_id(id: u16) -> Self {
        match id {
            1024 => GeoKey::ModelType,
            1025 => GeoKey::RasterType,
            1026 => GeoKey::Citation,
            2048 => GeoKey::GeodeticCrs,
            2049 => GeoKey::GeodeticCitation,
            3072 => GeoKey::ProjectedCrs,
            _ => GeoKey::Other(id),
        }
    }
}

/// A single key of the GeoTIFF key directory.
///
/// `location` is 0 when the value is stored inline in `value_or_offset`, otherwise it is the id of the tag
/// holding the value and `value_or_offset` is the index of the value in that tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeoKeyEntry {
    pub key: GeoKey,
    pub location: u16,
    pub count: u16,
    pub value_or_offset: u16,
}

impl GeoKeyEntry {
    pub const fn inline(key: GeoKey, value: u16) -> Self {
        GeoKeyEntry {
            key,
            location: 0,
            count: 1,
            value_or_offset: value,
        }
    }

    /// Key referencing `count` characters of the GeoAsciiParamsTag starting at `offset`
    pub const fn ascii(key: GeoKey, offset: u16, count: u16) -> Self {
        GeoKeyEntry {
            key,
            location: Tag::GeoAsciiParamsTag.to_u16(),
            count,
            value_or_offset: offset,
        }
    }

    pub fn inline_value(&self) -> Option<u16> {
        (self.location == 0).then_some(self.value_or_offset)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoKeyDirectory {
    pub version: u16,
    pub revision: u16,
    pub minor_revision: u16,
    pub entries: Vec<GeoKeyEntry>,
}

impl GeoKeyDirectory {
    /// A GeoTIFF 1.1 directory containing `entries`
    pub fn new(entries: Vec<GeoKeyEntry>) -> Self {
        GeoKeyDirectory {
            version: 1,
            revision: 1,
            minor_revision: 1,
            entries,
        }
    }

    pub fn entry(&self, key: GeoKey) -> Option<&GeoKeyEntry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    /// Serializes the directory into the layout of the GeoKeyDirectoryTag, keys are sorted by id.
    pub fn to_tag_values(&self) -> Vec<u16> {
        let mut entries = self.entries.clone();
        entries.sort_by_key(|entry| entry.key.id());

        let mut values = Vec::with_capacity(4 + entries.len() * 4);
        values.extend_from_slice(&[self.version, self.revision, self.minor_revision, entries.len() as u16]);
        for entry in entries {
            values.extend_from_slice(&[entry.key.id(), entry.location, entry.count, entry.value_or_offset]);
        }

        values
    }

    pub fn from_tag_values(values: &[u16]) -> Result<Self> {
        if values.len() < 4 {
            return Err(Error::InvalidMetadata(format!(
                "Key directory must contain at least 4 values ({} found)",
                values.len()
            )));
        }

        if values[0] != 1 {
            return Err(Error::InvalidMetadata(format!("Unexpected key directory version: {}", values[0])));
        }

        let key_count = values[3] as usize;
        let keys = &values[4..];
        if keys.len() < key_count * 4 {
            return Err(Error::InvalidMetadata(format!(
                "Key directory announces {key_count} keys but only contains {}",
                keys.len() / 4
            )));
        }

        let entries = keys
            .chunks_exact(4)
            .take(key_count)
            .map(|key| GeoKeyEntry {
                key: GeoKey::from_id(key[0]),
                location: key[1],
                count: key[2],
                value_or_offset: key[3],
            })
            .collect();

        Ok(GeoKeyDirectory {
            version: values[0],
            revision: values[1],
            minor_revision: values[2],
            entries,
        })
    }
}
