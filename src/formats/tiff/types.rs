//! TIFF data structures

use crate::io::ByteOrder;

use super::ifd::IFD;

/// Represents a TIFF or BigTIFF file
#[derive(Debug)]
pub struct Tiff {
    pub is_big_tiff: bool,
    pub byte_order: ByteOrder,
    pub ifds: Vec<IFD>,
}

impl Tiff {
    pub fn new(is_big_tiff: bool, byte_order: ByteOrder) -> Self {
        Self {
            is_big_tiff,
            byte_order,
            ifds: Vec::new(),
        }
    }

    pub fn add_ifd(&mut self, ifd: IFD) {
        self.ifds.push(ifd);
    }

    /// Returns the main (first) IFD, the full resolution image
    pub fn main_ifd(&self) -> Option<&IFD> {
        self.ifds.first()
    }

    pub fn ifd_count(&self) -> usize {
        self.ifds.len()
    }
}

/// Pixel sample types a heightmap band may use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    U8,
    U16,
    U32,
    I8,
    I16,
    I32,
    F32,
    F64,
}

impl DataType {
    pub fn bytes_per_sample(&self) -> usize {
        match self {
            DataType::U8 | DataType::I8 => 1,
            DataType::U16 | DataType::I16 => 2,
            DataType::U32 | DataType::I32 | DataType::F32 => 4,
            DataType::F64 => 8,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, DataType::F32 | DataType::F64)
    }
}

/// Width and height in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u64,
    pub height: u64,
}

impl Dimensions {
    pub fn new(width: u64, height: u64) -> Self {
        Self { width, height }
    }

    /// Number of `block` sized cells needed to cover these dimensions
    pub fn blocks(&self, block: Dimensions) -> (u64, u64) {
        (self.width.div_ceil(block.width), self.height.div_ceil(block.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_ifd() {
        let mut tiff = Tiff::new(false, ByteOrder::LittleEndian);
        assert!(tiff.main_ifd().is_none());

        tiff.add_ifd(IFD::new(0, 8));
        tiff.add_ifd(IFD::new(1, 400));

        assert_eq!(tiff.ifd_count(), 2);
        assert_eq!(tiff.main_ifd().unwrap().offset, 8);
    }

    #[test]
    fn test_bytes_per_sample() {
        assert_eq!(DataType::I8.bytes_per_sample(), 1);
        assert_eq!(DataType::I16.bytes_per_sample(), 2);
        assert_eq!(DataType::F32.bytes_per_sample(), 4);
        assert_eq!(DataType::F64.bytes_per_sample(), 8);
        assert!(DataType::F64.is_float());
        assert!(!DataType::U32.is_float());
    }

    #[test]
    fn test_block_counts() {
        let image = Dimensions::new(100, 33);
        assert_eq!(image.blocks(Dimensions::new(16, 16)), (7, 3));
        assert_eq!(image.blocks(Dimensions::new(100, 33)), (1, 1));
    }
}
