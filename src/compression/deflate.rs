//! Deflate/ZIP decompression

use std::io::Read;

use flate2::read::ZlibDecoder;

use crate::error::{Error, Result};

/// Decompresses a zlib-wrapped Deflate block
pub fn decompress(data: &[u8], expected_len: usize) -> Result<Vec<u8>> {
    let mut decompressed = Vec::with_capacity(expected_len);
    ZlibDecoder::new(data)
        .read_to_end(&mut decompressed)
        .map_err(|e| Error::InvalidFormat(format!("Deflate stream is corrupt: {}", e)))?;
    Ok(decompressed)
}
