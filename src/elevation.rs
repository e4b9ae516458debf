//! Terrain height lookup in the project's heightmap raster

use thiserror::Error;
use tracing::debug;

use crate::formats::tiff::TiffReader;
use crate::projection::{ReferenceSystem, TransformCache};
use crate::settings::{LayerKind, ProjectSettings};
use crate::types::{GeoPoint, HeightUnit};

/// Reasons a height cannot be sampled
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ElevationError {
    #[error("No heightmap is defined in the project.")]
    NoHeightmap,

    #[error("Failed to open raster file: {0}")]
    OpenRaster(String),

    #[error("Failed to get raster geotransform")]
    GeoTransform,

    #[error("Failed to get raster CRS")]
    ReferenceSystem,

    #[error("Failed to open raster band 1")]
    Band,

    #[error("Failed to transform position to raster CRS: {0}")]
    Projection(String),

    #[error("Failed to read pixel values")]
    ReadPixels,
}

/// Samples heights from the raster layer the project marks as heightmap
///
/// The raster is opened for each lookup and closed again before returning.
pub struct HeightSampler<'a> {
    project: &'a ProjectSettings,
    transforms: &'a TransformCache,
}

impl<'a> HeightSampler<'a> {
    pub fn new(project: &'a ProjectSettings, transforms: &'a TransformCache) -> Self {
        Self { project, transforms }
    }

    /// File path of the heightmap raster
    pub fn heightmap_source(&self) -> Result<&'a str, ElevationError> {
        let layer = self
            .project
            .heightmap_layer
            .as_deref()
            .and_then(|id| self.project.layer(id))
            .filter(|layer| layer.kind == LayerKind::Raster)
            .ok_or(ElevationError::NoHeightmap)?;
        Ok(&layer.source)
    }

    /// Bilinearly interpolated height at `point`, expressed in `unit`
    pub fn height_at(&self, point: GeoPoint, rs: &ReferenceSystem, unit: HeightUnit) -> Result<f64, ElevationError> {
        let source = self.heightmap_source()?;
        let open_failed = || ElevationError::OpenRaster(source.to_string());

        let reader = TiffReader::open(source).map_err(|_| open_failed())?;
        let tiff = reader.read().map_err(|_| open_failed())?;
        let ifd = tiff.main_ifd().ok_or_else(open_failed)?;

        let geo = reader.geo_info(ifd).map_err(|_| ElevationError::GeoTransform)?;
        let transform = geo.geo_transform().ok_or(ElevationError::GeoTransform)?;
        let raster_rs = geo.reference_system().ok_or(ElevationError::ReferenceSystem)?;
        let layout = reader.block_layout(ifd).map_err(|_| ElevationError::Band)?;

        let raster_point = self
            .transforms
            .transform(point, rs, &raster_rs)
            .map_err(|e| ElevationError::Projection(e.to_string()))?;
        let (col, row) = transform
            .invert(raster_point.x, raster_point.y)
            .ok_or(ElevationError::GeoTransform)?;

        debug!(
            %point,
            source = %rs,
            target = %raster_rs,
            %raster_point,
            col,
            row,
            "Transformed position into heightmap"
        );

        if !col.is_finite() || !row.is_finite() {
            return Err(ElevationError::ReadPixels);
        }
        let (col0, row0) = (col.floor(), row.floor());
        let window = reader
            .read_window(&layout, col0 as i64, row0 as i64, 2, 2)
            .map_err(|_| ElevationError::ReadPixels)?;

        let value = interpolate(&window, col - col0, row - row0);
        let vertical = geo.vertical_unit();
        if vertical != unit {
            return Ok(value * vertical.factor_to(unit));
        }
        Ok(value)
    }

    /// Returns the height, or 0 together with the failure message
    pub fn height_or_message(&self, point: GeoPoint, rs: &ReferenceSystem, unit: HeightUnit) -> (f64, Option<String>) {
        match self.height_at(point, rs, unit) {
            Ok(height) => (height, None),
            Err(e) => (0.0, Some(e.to_string())),
        }
    }
}

/// Bilinear interpolation over a row-major 2x2 window
fn interpolate(window: &[f64], lambda_col: f64, lambda_row: f64) -> f64 {
    let top = window[0] * (1.0 - lambda_col) + window[1] * lambda_col;
    let bottom = window[2] * (1.0 - lambda_col) + window[3] * lambda_col;
    top * (1.0 - lambda_row) + bottom * lambda_row
}
