//! PackBits decompression
//!
//! Run-length scheme: a header `n` in 0..=127 copies `n + 1` literal bytes,
//! -127..=-1 repeats the next byte `1 - n` times, -128 is a no-op.

use crate::error::{Error, Result};

/// Decompresses a PackBits block, stopping once `expected_len` bytes exist
///
/// Some writers pad blocks, so trailing input after a full block is ignored.
pub fn decompress(data: &[u8], expected_len: usize) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(expected_len);
    let mut input = data.iter().copied();

    while output.len() < expected_len {
        let Some(header) = input.next() else {
            break;
        };

        match header as i8 {
            -128 => {}
            n @ 0..=127 => {
                for _ in 0..=n {
                    let byte = input.next().ok_or_else(|| {
                        Error::InvalidFormat("PackBits literal run truncated".to_string())
                    })?;
                    output.push(byte);
                }
            }
            n => {
                let byte = input.next().ok_or_else(|| {
                    Error::InvalidFormat("PackBits repeat run truncated".to_string())
                })?;
                let count = (1 - n as isize) as usize;
                output.resize(output.len() + count, byte);
            }
        }
    }

    output.truncate(expected_len);
    Ok(output)
}
