//! TIFF and BigTIFF format support

pub mod geotiff;
pub mod ifd;
pub mod reader;
pub mod tags;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use geotiff::{GeoInfo, GeoTransform};
pub use ifd::{IFDEntry, IFD};
pub use reader::TiffReader;
pub use types::{DataType, Dimensions, Tiff};

/// TIFF magic number (42)
pub const TIFF_MAGIC: u16 = 42;

/// BigTIFF magic number (43)
pub const BIGTIFF_MAGIC: u16 = 43;
