//! TIFF reader modules

pub mod blocks;
pub mod pixels;
pub mod tags;

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;
use tracing::debug;

use crate::error::{Error, Result};
use crate::formats::tiff::tags::FieldType;
use crate::formats::tiff::{GeoInfo, IFDEntry, Tiff, BIGTIFF_MAGIC, IFD, TIFF_MAGIC};
use crate::io::ByteOrder;

use self::blocks::BlockLayout;
use self::pixels::PixelReader;
use self::tags::TagReader;

/// Upper bound on IFDs followed before the chain is treated as corrupt
const MAX_IFDS: usize = 1000;

/// Memory mapped TIFF file reader
pub struct TiffReader {
    mmap: Mmap,
    byte_order: ByteOrder,
    is_big_tiff: bool,
}

impl TiffReader {
    /// Opens and validates the header of a TIFF or BigTIFF file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)?;
        let mmap = unsafe { Mmap::map(&file)? };

        // Heightmap lookups touch a handful of blocks anywhere in the file
        #[cfg(unix)]
        unsafe {
            libc::madvise(
                mmap.as_ptr() as *mut libc::c_void,
                mmap.len(),
                libc::MADV_RANDOM,
            );
        }

        let header = mmap
            .get(..8)
            .ok_or_else(|| Error::InvalidFormat("File too short for a TIFF header".to_string()))?;
        let byte_order = ByteOrder::from_tiff_magic([header[0], header[1]]).ok_or_else(|| {
            Error::InvalidFormat(format!("Invalid byte order marker: {:?}", &header[..2]))
        })?;

        let is_big_tiff = match byte_order.u16(&header[2..]) {
            TIFF_MAGIC => false,
            BIGTIFF_MAGIC => true,
            magic => return Err(Error::InvalidMagic(magic)),
        };

        if is_big_tiff {
            let offset_size = byte_order.u16(&header[4..]);
            if offset_size != 8 {
                return Err(Error::InvalidFormat(format!(
                    "Invalid BigTIFF offset size: {}",
                    offset_size
                )));
            }
        }

        debug!(path = %path.as_ref().display(), ?byte_order, is_big_tiff, "Opened TIFF");

        Ok(Self {
            mmap,
            byte_order,
            is_big_tiff,
        })
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn is_big_tiff(&self) -> bool {
        self.is_big_tiff
    }

    /// Returns `len` bytes at `offset`
    fn slice(&self, offset: u64, len: usize) -> Result<&[u8]> {
        usize::try_from(offset)
            .ok()
            .and_then(|start| self.mmap.get(start..start.checked_add(len)?))
            .ok_or_else(|| Error::OutOfBounds(format!("{} bytes at offset {}", len, offset)))
    }

    /// Reads an offset sized field: 4 bytes in TIFF, 8 in BigTIFF
    fn read_offset(&self, position: u64) -> Result<u64> {
        if self.is_big_tiff {
            Ok(self.byte_order.u64(self.slice(position, 8)?))
        } else {
            Ok(self.byte_order.u32(self.slice(position, 4)?) as u64)
        }
    }

    /// Reads the TIFF file and returns the structure
    pub fn read(&self) -> Result<Tiff> {
        let mut tiff = Tiff::new(self.is_big_tiff, self.byte_order);
        let first = if self.is_big_tiff { 8 } else { 4 };
        let mut next_ifd_offset = self.read_offset(first)?;

        while next_ifd_offset != 0 {
            if tiff.ifd_count() >= MAX_IFDS {
                return Err(Error::InvalidFormat("Too many IFDs".to_string()));
            }

            let (ifd, next) = self.read_ifd(tiff.ifd_count(), next_ifd_offset)?;
            tiff.add_ifd(ifd);
            next_ifd_offset = next;
        }

        Ok(tiff)
    }

    /// Reads a single IFD and the offset of the one after it
    fn read_ifd(&self, number: usize, offset: u64) -> Result<(IFD, u64)> {
        let order = self.byte_order;
        let (count_size, entry_size, value_at) = if self.is_big_tiff {
            (8u64, 20u64, 12u64)
        } else {
            (2, 12, 8)
        };

        let entry_count = if self.is_big_tiff {
            order.u64(self.slice(offset, 8)?)
        } else {
            order.u16(self.slice(offset, 2)?) as u64
        };

        let mut ifd = IFD::new(number, offset);
        let entries_start = offset + count_size;

        for i in 0..entry_count {
            let position = entries_start + i * entry_size;
            let raw = self.slice(position, entry_size as usize)?;

            let tag = order.u16(raw);
            let Some(field_type) = FieldType::from_code(order.u16(&raw[2..])) else {
                debug!(tag, field_type = order.u16(&raw[2..]), "Skipping entry of unknown field type");
                continue;
            };
            let count = if self.is_big_tiff {
                order.u64(&raw[4..])
            } else {
                order.u32(&raw[4..]) as u64
            };

            let value_field = &raw[value_at as usize..];
            let mut entry = IFDEntry::new(tag, field_type, count, position + value_at, None);
            if !entry.is_inline(self.is_big_tiff) {
                entry.data_offset = self.read_offset(position + value_at)?;
            } else if count == 1 {
                entry.scalar = match field_type {
                    FieldType::Byte => Some(value_field[0] as u64),
                    FieldType::Short => Some(order.u16(value_field) as u64),
                    FieldType::Long => Some(order.u32(value_field) as u64),
                    FieldType::Long8 => Some(order.u64(value_field)),
                    _ => None,
                };
            }

            ifd.add_entry(entry);
        }

        let next = self.read_offset(entries_start + entry_count * entry_size)?;
        Ok((ifd, next))
    }

    pub fn tag_reader(&self) -> TagReader<'_> {
        TagReader::new(&self.mmap, self.byte_order)
    }

    /// Reads the georeferencing of an IFD
    pub fn geo_info(&self, ifd: &IFD) -> Result<GeoInfo> {
        GeoInfo::from_ifd(ifd, &self.tag_reader())
    }

    /// Resolves the block layout of band 1
    pub fn block_layout(&self, ifd: &IFD) -> Result<BlockLayout> {
        BlockLayout::from_ifd(ifd, &self.tag_reader())
    }

    pub fn pixel_reader<'a>(&'a self, layout: &'a BlockLayout) -> PixelReader<'a> {
        PixelReader::new(&self.mmap, layout, self.byte_order)
    }

    /// Reads a window of band 1 values, row-major
    pub fn read_window(&self, layout: &BlockLayout, col: i64, row: i64, width: u64, height: u64) -> Result<Vec<f64>> {
        self.pixel_reader(layout).read_window(col, row, width, height)
    }
}
