//! Byte order (endianness) handling
//!
//! Raster files are memory mapped, so values are decoded straight from byte
//! slices. Callers check lengths; every decoder takes the leading bytes of
//! the slice it is given.

/// Byte order of a raster file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Least significant byte first (`II`)
    LittleEndian,
    /// Most significant byte first (`MM`)
    BigEndian,
}

macro_rules! decoder {
    ($name:ident, $ty:ty, $len:expr) => {
        #[doc = concat!("Decodes a `", stringify!($ty), "` from the first ", stringify!($len), " bytes")]
        pub fn $name(&self, bytes: &[u8]) -> $ty {
            let mut buf = [0u8; $len];
            buf.copy_from_slice(&bytes[..$len]);
            match self {
                ByteOrder::LittleEndian => <$ty>::from_le_bytes(buf),
                ByteOrder::BigEndian => <$ty>::from_be_bytes(buf),
            }
        }
    };
}

impl ByteOrder {
    /// Detects the byte order from the first two bytes of a TIFF file
    pub fn from_tiff_magic(magic: [u8; 2]) -> Option<Self> {
        match &magic {
            b"II" => Some(ByteOrder::LittleEndian),
            b"MM" => Some(ByteOrder::BigEndian),
            _ => None,
        }
    }

    decoder!(u16, u16, 2);
    decoder!(u32, u32, 4);
    decoder!(u64, u64, 8);
    decoder!(i16, i16, 2);
    decoder!(i32, i32, 4);
    decoder!(i64, i64, 8);
    decoder!(f32, f32, 4);
    decoder!(f64, f64, 8);

    /// Writes `value` into the first two bytes
    pub fn put_u16(&self, bytes: &mut [u8], value: u16) {
        let encoded = match self {
            ByteOrder::LittleEndian => value.to_le_bytes(),
            ByteOrder::BigEndian => value.to_be_bytes(),
        };
        bytes[..2].copy_from_slice(&encoded);
    }

    pub fn put_u32(&self, bytes: &mut [u8], value: u32) {
        let encoded = match self {
            ByteOrder::LittleEndian => value.to_le_bytes(),
            ByteOrder::BigEndian => value.to_be_bytes(),
        };
        bytes[..4].copy_from_slice(&encoded);
    }

    pub fn put_u64(&self, bytes: &mut [u8], value: u64) {
        let encoded = match self {
            ByteOrder::LittleEndian => value.to_le_bytes(),
            ByteOrder::BigEndian => value.to_be_bytes(),
        };
        bytes[..8].copy_from_slice(&encoded);
    }
}
