//! Pixel value reading operations

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::formats::tiff::types::DataType;
use crate::io::ByteOrder;

use super::blocks::BlockLayout;

/// Decodes one sample to f64
pub fn decode_sample(bytes: &[u8], data_type: DataType, order: ByteOrder) -> f64 {
    match data_type {
        DataType::U8 => bytes[0] as f64,
        DataType::I8 => bytes[0] as i8 as f64,
        DataType::U16 => order.u16(bytes) as f64,
        DataType::I16 => order.i16(bytes) as f64,
        DataType::U32 => order.u32(bytes) as f64,
        DataType::I32 => order.i32(bytes) as f64,
        DataType::F32 => order.f32(bytes) as f64,
        DataType::F64 => order.f64(bytes),
    }
}

/// Reads pixel windows of band 1, decoding each block at most once
pub struct PixelReader<'a> {
    data: &'a [u8],
    layout: &'a BlockLayout,
    byte_order: ByteOrder,
    blocks: HashMap<usize, Vec<u8>>,
}

impl<'a> PixelReader<'a> {
    pub fn new(data: &'a [u8], layout: &'a BlockLayout, byte_order: ByteOrder) -> Self {
        Self {
            data,
            layout,
            byte_order,
            blocks: HashMap::new(),
        }
    }

    /// Reads a `width` x `height` window starting at (`col`, `row`), row-major
    pub fn read_window(&mut self, col: i64, row: i64, width: u64, height: u64) -> Result<Vec<f64>> {
        let image = self.layout.image;
        let inside = |start: i64, len: u64, limit: u64| {
            start >= 0 && (start as u64).checked_add(len).is_some_and(|end| end <= limit)
        };
        if !inside(col, width, image.width) || !inside(row, height, image.height) {
            return Err(Error::OutOfBounds(format!(
                "Window {}x{} at ({}, {}) exceeds {}x{} raster",
                width, height, col, row, image.width, image.height
            )));
        }

        let mut values = Vec::with_capacity(width.saturating_mul(height) as usize);
        for y in row as u64..row as u64 + height {
            for x in col as u64..col as u64 + width {
                values.push(self.read_pixel(x, y)?);
            }
        }
        Ok(values)
    }

    pub fn read_pixel(&mut self, col: u64, row: u64) -> Result<f64> {
        let (index, offset) = self.layout.locate(col, row);

        if !self.blocks.contains_key(&index) {
            let block = self.layout.decode_block(self.data, index, self.byte_order)?;
            self.blocks.insert(index, block);
        }

        let size = self.layout.data_type.bytes_per_sample();
        let bytes = self
            .blocks
            .get(&index)
            .and_then(|block| block.get(offset..offset + size))
            .ok_or_else(|| Error::OutOfBounds(format!("Pixel ({}, {}) outside block {}", col, row, index)))?;

        Ok(decode_sample(bytes, self.layout.data_type, self.byte_order))
    }

    /// Number of blocks decoded so far
    pub fn decoded_blocks(&self) -> usize {
        self.blocks.len()
    }
}
