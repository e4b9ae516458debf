//! Writes small single-band GeoTIFF fixtures for tests

use std::io::Write;

use flate2::write::ZlibEncoder;
use tempfile::NamedTempFile;

use super::tags::{self, geo_keys, FieldType};
use crate::io::ByteOrder;

#[derive(Debug, Clone, Copy)]
pub enum SampleType {
    F32,
    I16,
}

#[derive(Debug, Clone, Copy)]
pub enum Layout {
    Strips { rows_per_strip: u32 },
    Tiles { width: u32, height: u32 },
}

#[derive(Debug, Clone, Copy)]
pub enum Georeference {
    None,
    Tiepoint { origin: (f64, f64), scale: (f64, f64) },
    Matrix([f64; 16]),
}

pub struct GeoTiffBuilder {
    width: u32,
    height: u32,
    values: Vec<f64>,
    sample_type: SampleType,
    byte_order: ByteOrder,
    big_tiff: bool,
    layout: Layout,
    compression: u16,
    predictor: u16,
    georeference: Georeference,
    epsg: Option<u16>,
    model_type: u16,
    vertical_units: Option<u16>,
    pixel_is_point: bool,
    /// TileWidth/TileLength written instead of the real tile size
    declared_tile_size: Option<(u32, u32)>,
}

struct Entry {
    tag: u16,
    field_type: FieldType,
    count: u64,
    payload: Vec<u8>,
}

impl GeoTiffBuilder {
    /// `values` are row-major, `width * height` long
    pub fn new(width: u32, height: u32, values: Vec<f64>) -> Self {
        assert_eq!(values.len(), (width * height) as usize);
        Self {
            width,
            height,
            values,
            sample_type: SampleType::F32,
            byte_order: ByteOrder::LittleEndian,
            big_tiff: false,
            layout: Layout::Strips { rows_per_strip: height },
            compression: 1,
            predictor: 1,
            georeference: Georeference::None,
            epsg: None,
            model_type: geo_keys::MODEL_TYPE_PROJECTED,
            vertical_units: None,
            pixel_is_point: false,
            declared_tile_size: None,
        }
    }

    pub fn sample_type(mut self, sample_type: SampleType) -> Self {
        self.sample_type = sample_type;
        self
    }

    pub fn byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    pub fn big_tiff(mut self) -> Self {
        self.big_tiff = true;
        self
    }

    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// 1 (none), 5 (LZW), 8 (Deflate) or 32773 (PackBits)
    pub fn compression(mut self, compression: u16) -> Self {
        self.compression = compression;
        self
    }

    pub fn predictor(mut self, predictor: u16) -> Self {
        self.predictor = predictor;
        self
    }

    pub fn georeference(mut self, georeference: Georeference) -> Self {
        self.georeference = georeference;
        self
    }

    pub fn epsg(mut self, epsg: u16) -> Self {
        self.epsg = Some(epsg);
        self
    }

    pub fn geographic(mut self) -> Self {
        self.model_type = geo_keys::MODEL_TYPE_GEOGRAPHIC;
        self
    }

    pub fn vertical_units(mut self, unit: u16) -> Self {
        self.vertical_units = Some(unit);
        self
    }

    pub fn pixel_is_point(mut self) -> Self {
        self.pixel_is_point = true;
        self
    }

    /// Writes the file to a temporary path
    /// Writes tile size tags that disagree with the encoded tiles
    pub fn declared_tile_size(mut self, width: u32, height: u32) -> Self {
        self.declared_tile_size = Some((width, height));
        self
    }

    pub fn write(&self) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&self.build()).unwrap();
        file.flush().unwrap();
        file
    }

    pub fn build(&self) -> Vec<u8> {
        let order = self.byte_order;
        let header_len = if self.big_tiff { 16 } else { 8 };
        let mut out = vec![0u8; header_len];
        out[..2].copy_from_slice(match order {
            ByteOrder::LittleEndian => b"II",
            ByteOrder::BigEndian => b"MM",
        });
        if self.big_tiff {
            order.put_u16(&mut out[2..], 43);
            order.put_u16(&mut out[4..], 8);
        } else {
            order.put_u16(&mut out[2..], 42);
        }

        let (block_width, block_height) = match self.layout {
            Layout::Strips { rows_per_strip } => (self.width, rows_per_strip),
            Layout::Tiles { width, height } => (width, height),
        };
        let tiled = matches!(self.layout, Layout::Tiles { .. });

        let mut offsets = Vec::new();
        let mut counts = Vec::new();
        for block_row in 0..self.height.div_ceil(block_height) {
            for block_col in 0..self.width.div_ceil(block_width) {
                let rows = if tiled {
                    block_height
                } else {
                    block_height.min(self.height - block_row * block_height)
                };
                let encoded = self.encode_block(block_col * block_width, block_row * block_height, block_width, rows);
                offsets.push(out.len() as u64);
                counts.push(encoded.len() as u64);
                out.extend_from_slice(&encoded);
            }
        }
        if out.len() % 2 == 1 {
            out.push(0);
        }

        let entries = self.entries(tiled, block_width, block_height, &offsets, &counts);
        let ifd_offset = out.len() as u64;
        if self.big_tiff {
            order.put_u64(&mut out[8..], ifd_offset);
        } else {
            order.put_u32(&mut out[4..], ifd_offset as u32);
        }
        self.write_ifd(&mut out, entries);
        out
    }

    fn entries(&self, tiled: bool, block_width: u32, block_height: u32, offsets: &[u64], counts: &[u64]) -> Vec<Entry> {
        let offset_type = if self.big_tiff { FieldType::Long8 } else { FieldType::Long };
        let (bits, sample_format) = match self.sample_type {
            SampleType::F32 => (32, 3),
            SampleType::I16 => (16, 2),
        };

        let mut entries = vec![
            self.longs(tags::IMAGE_WIDTH, FieldType::Long, &[self.width as u64]),
            self.longs(tags::IMAGE_LENGTH, FieldType::Long, &[self.height as u64]),
            self.shorts(tags::BITS_PER_SAMPLE, &[bits]),
            self.shorts(tags::COMPRESSION, &[self.compression]),
            self.shorts(tags::SAMPLES_PER_PIXEL, &[1]),
            self.shorts(tags::SAMPLE_FORMAT, &[sample_format]),
        ];
        if self.predictor != 1 {
            entries.push(self.shorts(tags::PREDICTOR, &[self.predictor]));
        }

        if tiled {
            let (tag_width, tag_height) = self.declared_tile_size.unwrap_or((block_width, block_height));
            entries.push(self.longs(tags::TILE_WIDTH, FieldType::Long, &[tag_width as u64]));
            entries.push(self.longs(tags::TILE_LENGTH, FieldType::Long, &[tag_height as u64]));
            entries.push(self.longs(tags::TILE_OFFSETS, offset_type, offsets));
            entries.push(self.longs(tags::TILE_BYTE_COUNTS, offset_type, counts));
        } else {
            entries.push(self.longs(tags::ROWS_PER_STRIP, FieldType::Long, &[block_height as u64]));
            entries.push(self.longs(tags::STRIP_OFFSETS, offset_type, offsets));
            entries.push(self.longs(tags::STRIP_BYTE_COUNTS, offset_type, counts));
        }

        match self.georeference {
            Georeference::None => {}
            Georeference::Tiepoint { origin, scale } => {
                entries.push(self.doubles(tags::MODEL_PIXEL_SCALE, &[scale.0, scale.1, 0.0]));
                entries.push(self.doubles(tags::MODEL_TIEPOINT, &[0.0, 0.0, 0.0, origin.0, origin.1, 0.0]));
            }
            Georeference::Matrix(matrix) => {
                entries.push(self.doubles(tags::MODEL_TRANSFORMATION, &matrix));
            }
        }

        let mut keys = vec![(geo_keys::MODEL_TYPE, self.model_type)];
        if self.pixel_is_point {
            keys.push((geo_keys::RASTER_TYPE, geo_keys::RASTER_PIXEL_IS_POINT));
        }
        if let Some(epsg) = self.epsg {
            let key = if self.model_type == geo_keys::MODEL_TYPE_GEOGRAPHIC {
                geo_keys::GEOGRAPHIC_TYPE
            } else {
                geo_keys::PROJECTED_CS_TYPE
            };
            keys.push((key, epsg));
        }
        if let Some(unit) = self.vertical_units {
            keys.push((geo_keys::VERTICAL_UNITS, unit));
        }
        let mut directory = vec![1, 1, 0, keys.len() as u16];
        for (id, value) in keys {
            directory.extend_from_slice(&[id, 0, 1, value]);
        }
        entries.push(self.shorts(tags::GEO_KEY_DIRECTORY, &directory));

        entries.sort_by_key(|e| e.tag);
        entries
    }

    fn shorts(&self, tag: u16, values: &[u16]) -> Entry {
        let mut payload = vec![0u8; values.len() * 2];
        for (chunk, value) in payload.chunks_exact_mut(2).zip(values) {
            self.byte_order.put_u16(chunk, *value);
        }
        Entry { tag, field_type: FieldType::Short, count: values.len() as u64, payload }
    }

    fn longs(&self, tag: u16, field_type: FieldType, values: &[u64]) -> Entry {
        let size = field_type.size();
        let mut payload = vec![0u8; values.len() * size];
        for (chunk, value) in payload.chunks_exact_mut(size).zip(values) {
            if size == 8 {
                self.byte_order.put_u64(chunk, *value);
            } else {
                self.byte_order.put_u32(chunk, *value as u32);
            }
        }
        Entry { tag, field_type, count: values.len() as u64, payload }
    }

    fn doubles(&self, tag: u16, values: &[f64]) -> Entry {
        let mut payload = vec![0u8; values.len() * 8];
        for (chunk, value) in payload.chunks_exact_mut(8).zip(values) {
            self.byte_order.put_u64(chunk, value.to_bits());
        }
        Entry { tag, field_type: FieldType::Double, count: values.len() as u64, payload }
    }

    fn write_ifd(&self, out: &mut Vec<u8>, entries: Vec<Entry>) {
        let order = self.byte_order;
        let (count_size, entry_size, inline) = if self.big_tiff { (8, 20, 8) } else { (2, 12, 4) };
        let ifd_start = out.len();
        let mut overflow_at = ifd_start + count_size + entries.len() * entry_size + inline;

        let mut ifd = vec![0u8; overflow_at - ifd_start];
        let mut overflow = Vec::new();
        if self.big_tiff {
            order.put_u64(&mut ifd, entries.len() as u64);
        } else {
            order.put_u16(&mut ifd, entries.len() as u16);
        }

        for (i, entry) in entries.iter().enumerate() {
            let at = count_size + i * entry_size;
            order.put_u16(&mut ifd[at..], entry.tag);
            order.put_u16(&mut ifd[at + 2..], entry.field_type.code());
            let value_at = if self.big_tiff {
                order.put_u64(&mut ifd[at + 4..], entry.count);
                at + 12
            } else {
                order.put_u32(&mut ifd[at + 4..], entry.count as u32);
                at + 8
            };

            if entry.payload.len() <= inline {
                ifd[value_at..value_at + entry.payload.len()].copy_from_slice(&entry.payload);
            } else {
                if self.big_tiff {
                    order.put_u64(&mut ifd[value_at..], overflow_at as u64);
                } else {
                    order.put_u32(&mut ifd[value_at..], overflow_at as u32);
                }
                overflow.extend_from_slice(&entry.payload);
                overflow_at += entry.payload.len();
                if overflow.len() % 2 == 1 {
                    overflow.push(0);
                    overflow_at += 1;
                }
            }
        }

        out.extend_from_slice(&ifd);
        out.extend_from_slice(&overflow);
    }

    fn encode_block(&self, col0: u32, row0: u32, width: u32, rows: u32) -> Vec<u8> {
        let mut raw = Vec::new();
        for row in row0..row0 + rows {
            let values: Vec<f64> = (col0..col0 + width)
                .map(|col| {
                    if col < self.width && row < self.height {
                        self.values[(row * self.width + col) as usize]
                    } else {
                        0.0
                    }
                })
                .collect();
            raw.extend(self.encode_row(&values));
        }

        match self.compression {
            1 => raw,
            5 => encode_lzw_literals(&raw),
            8 => {
                let mut encoder = ZlibEncoder::new(Vec::new(), flate2::Compression::default());
                encoder.write_all(&raw).unwrap();
                encoder.finish().unwrap()
            }
            32773 => raw
                .chunks(128)
                .flat_map(|chunk| std::iter::once((chunk.len() - 1) as u8).chain(chunk.iter().copied()))
                .collect(),
            other => panic!("unsupported test compression {}", other),
        }
    }

    fn encode_row(&self, values: &[f64]) -> Vec<u8> {
        let order = self.byte_order;
        match (self.sample_type, self.predictor) {
            (SampleType::F32, 3) => {
                let count = values.len();
                let mut planes = vec![0u8; count * 4];
                for (k, value) in values.iter().enumerate() {
                    for (plane, byte) in (*value as f32).to_be_bytes().iter().enumerate() {
                        planes[plane * count + k] = *byte;
                    }
                }
                for i in (1..planes.len()).rev() {
                    planes[i] = planes[i].wrapping_sub(planes[i - 1]);
                }
                planes
            }
            (SampleType::F32, _) => values
                .iter()
                .flat_map(|v| {
                    let mut bytes = [0u8; 4];
                    order.put_u32(&mut bytes, (*v as f32).to_bits());
                    bytes
                })
                .collect(),
            (SampleType::I16, predictor) => {
                let mut samples: Vec<i16> = values.iter().map(|v| *v as i16).collect();
                if predictor == 2 {
                    for i in (1..samples.len()).rev() {
                        samples[i] = samples[i].wrapping_sub(samples[i - 1]);
                    }
                }
                samples
                    .iter()
                    .flat_map(|v| {
                        let mut bytes = [0u8; 2];
                        order.put_u16(&mut bytes, *v as u16);
                        bytes
                    })
                    .collect()
            }
        }
    }
}

/// Encodes bytes as LZW literal codes only, clearing the table often enough
/// that every code stays 9 bits wide
fn encode_lzw_literals(data: &[u8]) -> Vec<u8> {
    let mut codes: Vec<u16> = Vec::new();
    for chunk in data.chunks(200) {
        codes.push(256);
        codes.extend(chunk.iter().map(|b| *b as u16));
    }
    codes.push(257);

    let mut out = Vec::new();
    let mut acc: u32 = 0;
    let mut bits = 0;
    for code in codes {
        acc = (acc << 9) | code as u32;
        bits += 9;
        while bits >= 8 {
            bits -= 8;
            out.push((acc >> bits) as u8);
        }
    }
    if bits > 0 {
        out.push((acc << (8 - bits)) as u8);
    }
    out
}
