//! Block decompression for TIFF rasters

pub mod deflate;
pub mod lzw;
pub mod packbits;

use crate::error::{Error, Result};

/// Compression schemes a heightmap may use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Lzw,
    /// Deflate, under either the Adobe (8) or the legacy (32946) code
    Deflate,
    PackBits,
}

impl Compression {
    /// Maps a TIFF Compression tag value
    pub fn from_tag(value: u64) -> Result<Self> {
        match value {
            1 => Ok(Compression::None),
            5 => Ok(Compression::Lzw),
            8 | 32946 => Ok(Compression::Deflate),
            32773 => Ok(Compression::PackBits),
            _ => Err(Error::Unsupported(format!("Compression type {}", value))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Compression::None => "None",
            Compression::Lzw => "LZW",
            Compression::Deflate => "Deflate/ZIP",
            Compression::PackBits => "PackBits",
        }
    }

    /// Decompresses one block; `expected_len` is the size of the full block
    pub fn decompress(&self, data: &[u8], expected_len: usize) -> Result<Vec<u8>> {
        match self {
            Compression::None => Ok(data.to_vec()),
            Compression::Lzw => lzw::decompress(data),
            Compression::Deflate => deflate::decompress(data, expected_len),
            Compression::PackBits => packbits::decompress(data, expected_len),
        }
    }
}
