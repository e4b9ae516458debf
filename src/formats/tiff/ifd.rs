//! Image File Directory (IFD) structures

use std::collections::HashMap;

use super::tags::{self, FieldType};
use super::types::{DataType, Dimensions};

/// Represents an Image File Directory entry
#[derive(Debug, Clone)]
pub struct IFDEntry {
    /// TIFF tag identifier
    pub tag: u16,
    pub field_type: FieldType,
    /// Number of values
    pub count: u64,
    /// Absolute file offset of the first value
    ///
    /// Values small enough to live inside the entry point back into the
    /// entry itself, so every value is read the same way.
    pub data_offset: u64,
    /// Decoded value of single integer entries
    pub scalar: Option<u64>,
}

impl IFDEntry {
    pub fn new(tag: u16, field_type: FieldType, count: u64, data_offset: u64, scalar: Option<u64>) -> Self {
        Self {
            tag,
            field_type,
            count,
            data_offset,
            scalar,
        }
    }

    /// Total size of the values in bytes
    pub fn byte_len(&self) -> u64 {
        self.count.saturating_mul(self.field_type.size() as u64)
    }

    /// Returns whether the values fit in the entry's value field
    pub fn is_inline(&self, is_big_tiff: bool) -> bool {
        let inline_size = if is_big_tiff { 8 } else { 4 };
        self.byte_len() <= inline_size
    }
}

/// Represents an Image File Directory
#[derive(Debug, Clone)]
pub struct IFD {
    /// IFD number (0-based)
    pub number: usize,
    /// Offset to this IFD in file
    pub offset: u64,
    pub entries: Vec<IFDEntry>,
    tag_map: HashMap<u16, usize>,
}

impl IFD {
    pub fn new(number: usize, offset: u64) -> Self {
        Self {
            number,
            offset,
            entries: Vec::new(),
            tag_map: HashMap::new(),
        }
    }

    pub fn add_entry(&mut self, entry: IFDEntry) {
        let index = self.entries.len();
        self.tag_map.insert(entry.tag, index);
        self.entries.push(entry);
    }

    pub fn get_entry(&self, tag: u16) -> Option<&IFDEntry> {
        self.tag_map.get(&tag).and_then(|&idx| self.entries.get(idx))
    }

    /// Value of a single integer tag
    pub fn get_tag_value(&self, tag: u16) -> Option<u64> {
        self.get_entry(tag).and_then(|e| e.scalar)
    }

    pub fn dimensions(&self) -> Option<Dimensions> {
        let width = self.get_tag_value(tags::IMAGE_WIDTH)?;
        let height = self.get_tag_value(tags::IMAGE_LENGTH)?;
        Some(Dimensions::new(width, height))
    }

    /// Compression tag, defaulting to uncompressed
    pub fn compression(&self) -> u64 {
        self.get_tag_value(tags::COMPRESSION).unwrap_or(1)
    }

    pub fn samples_per_pixel(&self) -> u64 {
        self.get_tag_value(tags::SAMPLES_PER_PIXEL).unwrap_or(1)
    }

    /// Bits per sample, when stored as a single value
    ///
    /// Multi-sample images store one value per sample; the tag reader
    /// resolves those.
    pub fn bits_per_sample(&self) -> Option<u64> {
        self.get_tag_value(tags::BITS_PER_SAMPLE)
    }

    /// Sample format (1=unsigned, 2=signed, 3=float)
    pub fn sample_format(&self) -> u64 {
        self.get_tag_value(tags::SAMPLE_FORMAT).unwrap_or(1)
    }

    pub fn predictor(&self) -> u64 {
        self.get_tag_value(tags::PREDICTOR).unwrap_or(1)
    }

    /// Returns whether samples are stored as separate planes
    pub fn is_planar(&self) -> bool {
        self.get_tag_value(tags::PLANAR_CONFIGURATION) == Some(2)
    }

    pub fn is_tiled(&self) -> bool {
        self.get_entry(tags::TILE_WIDTH).is_some()
    }

    pub fn tile_dimensions(&self) -> Option<Dimensions> {
        let width = self.get_tag_value(tags::TILE_WIDTH)?;
        let height = self.get_tag_value(tags::TILE_LENGTH)?;
        Some(Dimensions::new(width, height))
    }

    /// Rows per strip, defaulting to the whole image
    pub fn rows_per_strip(&self) -> Option<u64> {
        self.get_tag_value(tags::ROWS_PER_STRIP)
            .or_else(|| self.dimensions().map(|d| d.height))
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Checks if this IFD carries georeferencing
    pub fn is_geotiff(&self) -> bool {
        self.entries.iter().any(|e| {
            matches!(
                e.tag,
                tags::MODEL_PIXEL_SCALE
                    | tags::MODEL_TIEPOINT
                    | tags::MODEL_TRANSFORMATION
                    | tags::GEO_KEY_DIRECTORY
            )
        })
    }
}

/// Maps sample format and bit depth to a data type
pub fn data_type(sample_format: u64, bits: u64) -> Option<DataType> {
    match (sample_format, bits) {
        (1, 8) => Some(DataType::U8),
        (1, 16) => Some(DataType::U16),
        (1, 32) => Some(DataType::U32),
        (2, 8) => Some(DataType::I8),
        (2, 16) => Some(DataType::I16),
        (2, 32) => Some(DataType::I32),
        (3, 32) => Some(DataType::F32),
        (3, 64) => Some(DataType::F64),
        _ => None,
    }
}
