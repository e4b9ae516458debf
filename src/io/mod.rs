//! I/O utilities for raster files

pub mod byte_order;

pub use byte_order::ByteOrder;
