//! Strip and tile layout, block decoding and predictors

use crate::compression::Compression;
use crate::error::{Error, Result};
use crate::formats::tiff::ifd::{self, IFD};
use crate::formats::tiff::tags;
use crate::formats::tiff::types::{DataType, Dimensions};
use crate::io::ByteOrder;

use super::tags::TagReader;

/// Largest decoded block accepted, in bytes
const MAX_BLOCK_BYTES: u64 = 1 << 30;

/// How the first band of an image is split into blocks
///
/// Strips are treated as blocks that span the full image width. For planar
/// images only the first plane is addressed.
#[derive(Debug, Clone)]
pub struct BlockLayout {
    pub image: Dimensions,
    pub block: Dimensions,
    pub blocks_across: u64,
    pub data_type: DataType,
    pub compression: Compression,
    pub predictor: u64,
    tiled: bool,
    /// Samples interleaved in each block
    samples: usize,
    row_bytes: usize,
    offsets: Vec<u64>,
    byte_counts: Vec<u64>,
}

impl BlockLayout {
    pub fn from_ifd(ifd: &IFD, tag_reader: &TagReader) -> Result<Self> {
        let image = ifd.dimensions().ok_or(Error::MissingTag(tags::IMAGE_WIDTH))?;
        if image.width == 0 || image.height == 0 {
            return Err(Error::InvalidFormat("Image has no pixels".to_string()));
        }

        let bits = first_value(ifd, tag_reader, tags::BITS_PER_SAMPLE)?.unwrap_or(1);
        let sample_format = first_value(ifd, tag_reader, tags::SAMPLE_FORMAT)?.unwrap_or(1);
        let data_type = ifd::data_type(sample_format, bits).ok_or_else(|| {
            Error::Unsupported(format!("{} bit samples of format {}", bits, sample_format))
        })?;

        let compression = Compression::from_tag(ifd.compression())?;
        let predictor = ifd.predictor();
        if !matches!(predictor, 1..=3) {
            return Err(Error::Unsupported(format!("Predictor {}", predictor)));
        }
        if predictor == 3 && !data_type.is_float() {
            return Err(Error::InvalidFormat(
                "Floating point predictor on integer samples".to_string(),
            ));
        }

        let tiled = ifd.is_tiled();
        let (block, offsets_tag, counts_tag) = if tiled {
            let tile = ifd.tile_dimensions().ok_or(Error::MissingTag(tags::TILE_LENGTH))?;
            (tile, tags::TILE_OFFSETS, tags::TILE_BYTE_COUNTS)
        } else {
            let rows = ifd.rows_per_strip().unwrap_or(image.height).min(image.height);
            (
                Dimensions::new(image.width, rows),
                tags::STRIP_OFFSETS,
                tags::STRIP_BYTE_COUNTS,
            )
        };
        if block.width == 0 || block.height == 0 {
            return Err(Error::InvalidFormat("Zero sized blocks".to_string()));
        }

        let offsets = tag_reader.read_u64s(ifd.get_entry(offsets_tag).ok_or(Error::MissingTag(offsets_tag))?)?;
        let byte_counts = tag_reader.read_u64s(ifd.get_entry(counts_tag).ok_or(Error::MissingTag(counts_tag))?)?;

        let samples = if ifd.is_planar() {
            1
        } else {
            ifd.samples_per_pixel().max(1) as usize
        };

        let row_bytes = block
            .width
            .checked_mul(samples as u64)
            .and_then(|n| n.checked_mul(data_type.bytes_per_sample() as u64));
        let row_bytes = row_bytes
            .filter(|n| n.checked_mul(block.height).is_some_and(|total| total <= MAX_BLOCK_BYTES))
            .ok_or_else(|| {
                Error::InvalidFormat(format!("{}x{} blocks are too large", block.width, block.height))
            })? as usize;

        let (blocks_across, blocks_down) = image.blocks(block);
        let needed = blocks_across
            .checked_mul(blocks_down)
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| Error::InvalidFormat(format!("{}x{} blocks", blocks_across, blocks_down)))?;
        if offsets.len() < needed || byte_counts.len() < needed {
            return Err(Error::InvalidFormat(format!(
                "Expected {} blocks, found {} offsets and {} byte counts",
                needed,
                offsets.len(),
                byte_counts.len()
            )));
        }

        Ok(Self {
            image,
            block,
            blocks_across,
            data_type,
            compression,
            predictor,
            tiled,
            samples,
            row_bytes,
            offsets,
            byte_counts,
        })
    }

    pub fn is_tiled(&self) -> bool {
        self.tiled
    }

    /// Finds the block holding a pixel and the byte offset of its first
    /// sample within the decoded block
    pub fn locate(&self, col: u64, row: u64) -> (usize, usize) {
        let index = (row / self.block.height) * self.blocks_across + col / self.block.width;
        let x = col % self.block.width;
        let y = row % self.block.height;
        let sample = (y * self.block.width + x) as usize * self.samples;
        (index as usize, sample * self.data_type.bytes_per_sample())
    }

    /// Rows actually stored in a block; the last strip may be short
    fn rows_in(&self, index: usize) -> usize {
        if self.tiled {
            return self.block.height as usize;
        }
        let first_row = index as u64 * self.block.height;
        self.block.height.min(self.image.height.saturating_sub(first_row)) as usize
    }

    /// Decompresses a block and reverses its predictor
    pub fn decode_block(&self, data: &[u8], index: usize, byte_order: ByteOrder) -> Result<Vec<u8>> {
        let (offset, count) = self
            .offsets
            .get(index)
            .zip(self.byte_counts.get(index))
            .ok_or_else(|| Error::OutOfBounds(format!("Block {} does not exist", index)))?;

        let row_bytes = self.row_bytes;
        let expected = self.rows_in(index) * row_bytes;

        // Sparse files leave unwritten blocks empty
        if *count == 0 {
            return Ok(vec![0; expected]);
        }

        let raw = usize::try_from(*offset)
            .ok()
            .zip(usize::try_from(*count).ok())
            .and_then(|(start, len)| data.get(start..start.checked_add(len)?))
            .ok_or_else(|| Error::OutOfBounds(format!("Block {} exceeds the file", index)))?;

        let mut block = self.compression.decompress(raw, expected)?;
        if block.len() < expected {
            return Err(Error::InvalidFormat(format!(
                "Block {} decoded to {} bytes, expected {}",
                index,
                block.len(),
                expected
            )));
        }
        block.truncate(expected);

        let bytes_per_sample = self.data_type.bytes_per_sample();
        match self.predictor {
            2 => undo_horizontal(&mut block, row_bytes, self.samples, bytes_per_sample, byte_order),
            3 => undo_floating_point(&mut block, row_bytes, self.samples, bytes_per_sample, byte_order),
            _ => {}
        }

        Ok(block)
    }
}

fn first_value(ifd: &IFD, tag_reader: &TagReader, tag: u16) -> Result<Option<u64>> {
    ifd.get_entry(tag).map(|entry| tag_reader.read_first_u64(entry)).transpose()
}

/// Reverses horizontal differencing; each sample was stored as the
/// difference to the same sample of the previous pixel
fn undo_horizontal(block: &mut [u8], row_bytes: usize, samples: usize, size: usize, order: ByteOrder) {
    let stride = samples * size;
    for row in block.chunks_exact_mut(row_bytes) {
        for i in (stride..row.len()).step_by(size) {
            match size {
                1 => row[i] = row[i].wrapping_add(row[i - stride]),
                2 => {
                    let value = order.u16(&row[i..]).wrapping_add(order.u16(&row[i - stride..]));
                    order.put_u16(&mut row[i..], value);
                }
                4 => {
                    let value = order.u32(&row[i..]).wrapping_add(order.u32(&row[i - stride..]));
                    order.put_u32(&mut row[i..], value);
                }
                _ => {
                    let value = order.u64(&row[i..]).wrapping_add(order.u64(&row[i - stride..]));
                    order.put_u64(&mut row[i..], value);
                }
            }
        }
    }
}

/// Reverses the floating point predictor
///
/// Each row holds the bytes of its values as planes, most significant
/// plane first, with byte-wise differencing across the whole row.
fn undo_floating_point(block: &mut [u8], row_bytes: usize, samples: usize, size: usize, order: ByteOrder) {
    let values = row_bytes / size;
    let mut planes = vec![0u8; row_bytes];

    for row in block.chunks_exact_mut(row_bytes) {
        for i in samples..row.len() {
            row[i] = row[i].wrapping_add(row[i - samples]);
        }
        planes.copy_from_slice(row);

        for value in 0..values {
            for byte in 0..size {
                let plane = match order {
                    ByteOrder::LittleEndian => size - byte - 1,
                    ByteOrder::BigEndian => byte,
                };
                row[value * size + byte] = planes[plane * values + value];
            }
        }
    }
}
