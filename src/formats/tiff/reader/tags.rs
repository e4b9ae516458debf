//! Tag value reading operations

use crate::error::{Error, Result};
use crate::formats::tiff::tags::FieldType;
use crate::formats::tiff::IFDEntry;
use crate::io::ByteOrder;

/// Decodes tag values straight from the mapped file
pub struct TagReader<'a> {
    data: &'a [u8],
    byte_order: ByteOrder,
}

impl<'a> TagReader<'a> {
    pub fn new(data: &'a [u8], byte_order: ByteOrder) -> Self {
        Self { data, byte_order }
    }

    /// Returns the raw bytes of an entry's values
    pub fn bytes(&self, entry: &IFDEntry) -> Result<&'a [u8]> {
        let start = usize::try_from(entry.data_offset).ok();
        let len = usize::try_from(entry.byte_len()).ok();
        start
            .zip(len)
            .and_then(|(start, len)| self.data.get(start..start.checked_add(len)?))
            .ok_or_else(|| {
                Error::OutOfBounds(format!(
                    "Tag {} values at offset {} exceed the file",
                    entry.tag, entry.data_offset
                ))
            })
    }

    /// Reads integer tag values as u64 array
    pub fn read_u64s(&self, entry: &IFDEntry) -> Result<Vec<u64>> {
        let bytes = self.bytes(entry)?;
        let order = self.byte_order;
        let size = entry.field_type.size();
        let chunks = bytes.chunks_exact(size);

        let values = match entry.field_type {
            FieldType::Byte | FieldType::Undefined => chunks.map(|c| c[0] as u64).collect(),
            FieldType::Short => chunks.map(|c| order.u16(c) as u64).collect(),
            FieldType::Long => chunks.map(|c| order.u32(c) as u64).collect(),
            FieldType::Long8 | FieldType::Ifd8 => chunks.map(|c| order.u64(c)).collect(),
            other => return Err(unexpected(entry, other, "unsigned integers")),
        };
        Ok(values)
    }

    /// Reads tag values as u16 array
    pub fn read_u16s(&self, entry: &IFDEntry) -> Result<Vec<u16>> {
        match entry.field_type {
            FieldType::Short => {
                let bytes = self.bytes(entry)?;
                Ok(bytes.chunks_exact(2).map(|c| self.byte_order.u16(c)).collect())
            }
            other => Err(unexpected(entry, other, "SHORT values")),
        }
    }

    /// Reads numeric tag values as f64 array
    pub fn read_doubles(&self, entry: &IFDEntry) -> Result<Vec<f64>> {
        let bytes = self.bytes(entry)?;
        let order = self.byte_order;
        let size = entry.field_type.size();
        let chunks = bytes.chunks_exact(size);

        let values = match entry.field_type {
            FieldType::Double => chunks.map(|c| order.f64(c)).collect(),
            FieldType::Float => chunks.map(|c| order.f32(c) as f64).collect(),
            FieldType::SShort => chunks.map(|c| order.i16(c) as f64).collect(),
            FieldType::SLong => chunks.map(|c| order.i32(c) as f64).collect(),
            FieldType::Rational => chunks
                .map(|c| order.u32(c) as f64 / order.u32(&c[4..]) as f64)
                .collect(),
            FieldType::SRational => chunks
                .map(|c| order.i32(c) as f64 / order.i32(&c[4..]) as f64)
                .collect(),
            _ => self.read_u64s(entry)?.into_iter().map(|v| v as f64).collect(),
        };
        Ok(values)
    }

    /// Reads the first value of an integer tag
    pub fn read_first_u64(&self, entry: &IFDEntry) -> Result<u64> {
        match entry.scalar {
            Some(value) => Ok(value),
            None => self
                .read_u64s(entry)?
                .first()
                .copied()
                .ok_or(Error::MissingTag(entry.tag)),
        }
    }
}

fn unexpected(entry: &IFDEntry, field_type: FieldType, wanted: &str) -> Error {
    Error::InvalidFormat(format!(
        "Tag {} has field type {}, expected {}",
        entry.tag,
        field_type.code(),
        wanted
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_shorts_both_orders() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let entry = IFDEntry::new(258, FieldType::Short, 2, 0, None);

        let le = TagReader::new(&data, ByteOrder::LittleEndian);
        assert_eq!(le.read_u16s(&entry).unwrap(), vec![0x0201, 0x0403]);
        assert_eq!(le.read_u64s(&entry).unwrap(), vec![0x0201, 0x0403]);

        let be = TagReader::new(&data, ByteOrder::BigEndian);
        assert_eq!(be.read_u16s(&entry).unwrap(), vec![0x0102, 0x0304]);
    }

    #[test]
    fn test_read_doubles() {
        let mut data = vec![0u8; 4];
        data.extend_from_slice(&2.5f64.to_le_bytes());
        data.extend_from_slice(&(-7.0f64).to_le_bytes());
        let entry = IFDEntry::new(33550, FieldType::Double, 2, 4, None);

        let reader = TagReader::new(&data, ByteOrder::LittleEndian);
        assert_eq!(reader.read_doubles(&entry).unwrap(), vec![2.5, -7.0]);
    }

    #[test]
    fn test_read_rational() {
        let mut data = Vec::new();
        data.extend_from_slice(&3u32.to_be_bytes());
        data.extend_from_slice(&4u32.to_be_bytes());
        let entry = IFDEntry::new(282, FieldType::Rational, 1, 0, None);

        let reader = TagReader::new(&data, ByteOrder::BigEndian);
        assert_eq!(reader.read_doubles(&entry).unwrap(), vec![0.75]);
    }

    #[test]
    fn test_out_of_bounds() {
        let data = [0u8; 8];
        let entry = IFDEntry::new(273, FieldType::Long, 4, 4, None);
        let reader = TagReader::new(&data, ByteOrder::LittleEndian);
        assert!(matches!(reader.read_u64s(&entry), Err(Error::OutOfBounds(_))));
    }

    #[test]
    fn test_wrong_field_type() {
        let data = [0u8; 8];
        let entry = IFDEntry::new(34735, FieldType::Long, 2, 0, None);
        let reader = TagReader::new(&data, ByteOrder::LittleEndian);
        assert!(matches!(reader.read_u16s(&entry), Err(Error::InvalidFormat(_))));
    }

    #[test]
    fn test_first_value_prefers_scalar() {
        let data = [9u8, 0, 0, 0];
        let reader = TagReader::new(&data, ByteOrder::LittleEndian);

        let scalar = IFDEntry::new(256, FieldType::Long, 1, 0, Some(42));
        assert_eq!(reader.read_first_u64(&scalar).unwrap(), 42);

        let array = IFDEntry::new(258, FieldType::Short, 2, 0, None);
        assert_eq!(reader.read_first_u64(&array).unwrap(), 9);
    }
}
