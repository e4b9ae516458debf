//! TIFF tags, field types and GeoTIFF keys read by the heightmap sampler

pub const IMAGE_WIDTH: u16 = 256;
pub const IMAGE_LENGTH: u16 = 257;
pub const BITS_PER_SAMPLE: u16 = 258;
pub const COMPRESSION: u16 = 259;
pub const STRIP_OFFSETS: u16 = 273;
pub const SAMPLES_PER_PIXEL: u16 = 277;
pub const ROWS_PER_STRIP: u16 = 278;
pub const STRIP_BYTE_COUNTS: u16 = 279;
/// 1 = chunky (interleaved), 2 = planar
pub const PLANAR_CONFIGURATION: u16 = 284;
/// 1 = none, 2 = horizontal differencing, 3 = floating point
pub const PREDICTOR: u16 = 317;
pub const TILE_WIDTH: u16 = 322;
pub const TILE_LENGTH: u16 = 323;
pub const TILE_OFFSETS: u16 = 324;
pub const TILE_BYTE_COUNTS: u16 = 325;
/// 1 = unsigned, 2 = signed, 3 = IEEE float
pub const SAMPLE_FORMAT: u16 = 339;

/// GeoTIFF ModelPixelScaleTag
pub const MODEL_PIXEL_SCALE: u16 = 33550;
/// GeoTIFF ModelTiepointTag
pub const MODEL_TIEPOINT: u16 = 33922;
/// GeoTIFF ModelTransformationTag
pub const MODEL_TRANSFORMATION: u16 = 34264;
/// GeoTIFF GeoKeyDirectoryTag
pub const GEO_KEY_DIRECTORY: u16 = 34735;

/// Returns the name of a tag, for diagnostics
pub fn tag_name(tag: u16) -> &'static str {
    match tag {
        IMAGE_WIDTH => "ImageWidth",
        IMAGE_LENGTH => "ImageLength",
        BITS_PER_SAMPLE => "BitsPerSample",
        COMPRESSION => "Compression",
        STRIP_OFFSETS => "StripOffsets",
        SAMPLES_PER_PIXEL => "SamplesPerPixel",
        ROWS_PER_STRIP => "RowsPerStrip",
        STRIP_BYTE_COUNTS => "StripByteCounts",
        PLANAR_CONFIGURATION => "PlanarConfiguration",
        PREDICTOR => "Predictor",
        TILE_WIDTH => "TileWidth",
        TILE_LENGTH => "TileLength",
        TILE_OFFSETS => "TileOffsets",
        TILE_BYTE_COUNTS => "TileByteCounts",
        SAMPLE_FORMAT => "SampleFormat",
        MODEL_PIXEL_SCALE => "ModelPixelScale",
        MODEL_TIEPOINT => "ModelTiepoint",
        MODEL_TRANSFORMATION => "ModelTransformation",
        GEO_KEY_DIRECTORY => "GeoKeyDirectory",
        _ => "Unknown",
    }
}

/// Field types of IFD entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Byte,
    Ascii,
    Short,
    Long,
    Rational,
    SByte,
    Undefined,
    SShort,
    SLong,
    SRational,
    Float,
    Double,
    Long8,
    SLong8,
    Ifd8,
}

impl FieldType {
    pub fn from_code(code: u16) -> Option<Self> {
        let field_type = match code {
            1 => FieldType::Byte,
            2 => FieldType::Ascii,
            3 => FieldType::Short,
            4 => FieldType::Long,
            5 => FieldType::Rational,
            6 => FieldType::SByte,
            7 => FieldType::Undefined,
            8 => FieldType::SShort,
            9 => FieldType::SLong,
            10 => FieldType::SRational,
            11 => FieldType::Float,
            12 => FieldType::Double,
            16 => FieldType::Long8,
            17 => FieldType::SLong8,
            18 => FieldType::Ifd8,
            _ => return None,
        };
        Some(field_type)
    }

    pub fn code(&self) -> u16 {
        match self {
            FieldType::Byte => 1,
            FieldType::Ascii => 2,
            FieldType::Short => 3,
            FieldType::Long => 4,
            FieldType::Rational => 5,
            FieldType::SByte => 6,
            FieldType::Undefined => 7,
            FieldType::SShort => 8,
            FieldType::SLong => 9,
            FieldType::SRational => 10,
            FieldType::Float => 11,
            FieldType::Double => 12,
            FieldType::Long8 => 16,
            FieldType::SLong8 => 17,
            FieldType::Ifd8 => 18,
        }
    }

    /// Size of one value in bytes
    pub fn size(&self) -> usize {
        match self {
            FieldType::Byte | FieldType::Ascii | FieldType::SByte | FieldType::Undefined => 1,
            FieldType::Short | FieldType::SShort => 2,
            FieldType::Long | FieldType::SLong | FieldType::Float => 4,
            FieldType::Rational
            | FieldType::SRational
            | FieldType::Double
            | FieldType::Long8
            | FieldType::SLong8
            | FieldType::Ifd8 => 8,
        }
    }
}

/// GeoKey ids and values
pub mod geo_keys {
    /// 1 = projected, 2 = geographic
    pub const MODEL_TYPE: u16 = 1024;
    /// 1 = PixelIsArea, 2 = PixelIsPoint
    pub const RASTER_TYPE: u16 = 1025;
    pub const GEOGRAPHIC_TYPE: u16 = 2048;
    pub const PROJECTED_CS_TYPE: u16 = 3072;
    pub const VERTICAL_UNITS: u16 = 4099;

    pub const MODEL_TYPE_PROJECTED: u16 = 1;
    pub const MODEL_TYPE_GEOGRAPHIC: u16 = 2;
    pub const RASTER_PIXEL_IS_POINT: u16 = 2;
    /// Placeholder for codes defined elsewhere in the file
    pub const USER_DEFINED: u16 = 32767;

    /// EPSG linear unit codes for the international and US survey foot
    pub const UNIT_FOOT: u16 = 9002;
    pub const UNIT_US_SURVEY_FOOT: u16 = 9003;
}
