//! GeoTIFF specific functionality

use crate::error::Result;
use crate::projection::{MapUnits, ReferenceSystem};
use crate::types::HeightUnit;

use super::ifd::IFD;
use super::reader::tags::TagReader;
use super::tags::{self, geo_keys};

/// Affine pixel to model transform in GDAL order
///
/// `x = t[0] + col * t[1] + row * t[2]`, `y = t[3] + col * t[4] + row * t[5]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform(pub [f64; 6]);

impl GeoTransform {
    /// Builds the transform from a pixel scale and one tiepoint
    pub fn from_tiepoint(scale: [f64; 3], tiepoint: [f64; 6]) -> Self {
        let [i, j, _, x, y, _] = tiepoint;
        let [sx, sy, _] = scale;
        Self([x - i * sx, sx, 0.0, y + j * sy, 0.0, -sy])
    }

    /// Builds the transform from a row-major 4x4 ModelTransformation matrix
    pub fn from_matrix(m: &[f64; 16]) -> Self {
        Self([m[3], m[0], m[1], m[7], m[4], m[5]])
    }

    /// Model coordinates of a fractional pixel position
    pub fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        let t = &self.0;
        (t[0] + col * t[1] + row * t[2], t[3] + col * t[4] + row * t[5])
    }

    /// Fractional pixel position of model coordinates
    ///
    /// Returns `None` when the transform is singular.
    pub fn invert(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let t = &self.0;
        let det = t[1] * t[5] - t[2] * t[4];
        if det == 0.0 || !det.is_finite() {
            return None;
        }

        let dx = x - t[0];
        let dy = y - t[3];
        Some(((dx * t[5] - dy * t[2]) / det, (dy * t[1] - dx * t[4]) / det))
    }

    /// Moves the origin from a pixel center to its corner
    fn shift_half_pixel(mut self) -> Self {
        let t = &mut self.0;
        t[0] -= 0.5 * (t[1] + t[2]);
        t[3] -= 0.5 * (t[4] + t[5]);
        self
    }
}

/// GeoTIFF information extracted from an IFD
#[derive(Debug, Default)]
pub struct GeoInfo {
    pub pixel_scale: Option<[f64; 3]>,
    /// First tiepoint: pixel (i, j, k) to model (x, y, z)
    pub tiepoint: Option<[f64; 6]>,
    pub model_transformation: Option<[f64; 16]>,
    pub model_type: Option<u16>,
    pub raster_type: Option<u16>,
    /// EPSG code of the projected or geographic system
    pub epsg_code: Option<u16>,
    pub vertical_units: Option<u16>,
}

impl GeoInfo {
    /// Extracts GeoTIFF information from an IFD
    pub fn from_ifd(ifd: &IFD, tag_reader: &TagReader) -> Result<Self> {
        let mut geo_info = GeoInfo::default();

        if let Some(entry) = ifd.get_entry(tags::MODEL_PIXEL_SCALE) {
            let values = tag_reader.read_doubles(entry)?;
            if let [sx, sy, sz, ..] = values[..] {
                geo_info.pixel_scale = Some([sx, sy, sz]);
            }
        }

        if let Some(entry) = ifd.get_entry(tags::MODEL_TIEPOINT) {
            let values = tag_reader.read_doubles(entry)?;
            geo_info.tiepoint = values.get(..6).and_then(|v| v.try_into().ok());
        }

        if let Some(entry) = ifd.get_entry(tags::MODEL_TRANSFORMATION) {
            let values = tag_reader.read_doubles(entry)?;
            geo_info.model_transformation = values.get(..16).and_then(|v| v.try_into().ok());
        }

        if let Some(entry) = ifd.get_entry(tags::GEO_KEY_DIRECTORY) {
            let keys = tag_reader.read_u16s(entry)?;
            let declared = keys.get(3).copied().unwrap_or(0) as usize;

            // Header is (version, revision, minor, count), then 4 shorts per key
            for key in keys.get(4..).unwrap_or_default().chunks_exact(4).take(declared) {
                let (id, location, value) = (key[0], key[1], key[3]);
                // Keys stored in the double or ASCII params are never codes
                if location != 0 {
                    continue;
                }
                match id {
                    geo_keys::MODEL_TYPE => geo_info.model_type = Some(value),
                    geo_keys::RASTER_TYPE => geo_info.raster_type = Some(value),
                    geo_keys::PROJECTED_CS_TYPE => geo_info.epsg_code = Some(value),
                    geo_keys::GEOGRAPHIC_TYPE => {
                        geo_info.epsg_code.get_or_insert(value);
                    }
                    geo_keys::VERTICAL_UNITS => geo_info.vertical_units = Some(value),
                    _ => {}
                }
            }
        }

        Ok(geo_info)
    }

    /// Returns the pixel to model transform
    ///
    /// Rasters flagged PixelIsPoint anchor their tiepoint at a pixel center
    /// and are shifted so the transform addresses pixel corners.
    pub fn geo_transform(&self) -> Option<GeoTransform> {
        let transform = match (&self.model_transformation, self.pixel_scale, self.tiepoint) {
            (Some(matrix), _, _) => GeoTransform::from_matrix(matrix),
            (None, Some(scale), Some(tiepoint)) => GeoTransform::from_tiepoint(scale, tiepoint),
            _ => return None,
        };

        if self.raster_type == Some(geo_keys::RASTER_PIXEL_IS_POINT) {
            Some(transform.shift_half_pixel())
        } else {
            Some(transform)
        }
    }

    /// Returns the raster's reference system
    pub fn reference_system(&self) -> Option<ReferenceSystem> {
        let code = self
            .epsg_code
            .filter(|&code| code != 0 && code != geo_keys::USER_DEFINED)?;

        if self.model_type == Some(geo_keys::MODEL_TYPE_GEOGRAPHIC) {
            ReferenceSystem::with_units(&format!("EPSG:{}", code), MapUnits::Degrees).ok()
        } else {
            ReferenceSystem::from_epsg(code as u32).ok()
        }
    }

    /// Unit of the stored elevation values
    pub fn vertical_unit(&self) -> HeightUnit {
        match self.vertical_units {
            Some(geo_keys::UNIT_FOOT | geo_keys::UNIT_US_SURVEY_FOOT) => HeightUnit::Feet,
            _ => HeightUnit::Meters,
        }
    }
}
