//! Coordinate to text formatting
//!
//! The point is first transformed into the system the format works in:
//! the display system for the plain and sexagesimal formats, WGS84 for the
//! grid formats.

pub mod angle;

pub use angle::{to_degrees_minutes, to_degrees_minutes_seconds};

use crate::error::Result;
use crate::grid::{geographic_to_utm, utm_to_mgrs};
use crate::projection::{ReferenceSystem, TransformCache};
use crate::types::{DisplayFormat, GeoPoint};

/// Seconds decimals for [`DisplayFormat::DegMinSec`]
pub const DMS_PRECISION: usize = 1;
/// Minutes decimals for [`DisplayFormat::DegMin`]
pub const DM_PRECISION: usize = 3;
/// Decimals for [`DisplayFormat::DecimalDegrees`]
pub const DD_PRECISION: usize = 5;

/// Returns the system a format renders its coordinates in
pub fn target_system(format: DisplayFormat, display: &ReferenceSystem) -> ReferenceSystem {
    if format.is_grid() {
        ReferenceSystem::wgs84()
    } else {
        display.clone()
    }
}

/// Formats `point`, given in `source`, as text
///
/// Returns an empty string for an MGRS position outside the grid. A failed
/// transform is an error.
pub fn format_point(
    point: GeoPoint,
    source: &ReferenceSystem,
    format: DisplayFormat,
    display: &ReferenceSystem,
    transforms: &TransformCache,
) -> Result<String> {
    let target = target_system(format, display);
    let p = transforms.transform(point, source, &target)?;

    let text = match format {
        DisplayFormat::Default => {
            let precision = if display.is_geographic() { 4 } else { 0 };
            format!("{:.*}, {:.*}", precision, p.x, precision, p.y)
        }
        DisplayFormat::DegMinSec => to_degrees_minutes_seconds(p, DMS_PRECISION),
        DisplayFormat::DegMin => to_degrees_minutes(p, DM_PRECISION),
        DisplayFormat::DecimalDegrees => format!(
            "{:.*}{deg},{:.*}{deg}",
            DD_PRECISION,
            p.x,
            DD_PRECISION,
            p.y,
            deg = angle::DEGREE_SIGN
        ),
        DisplayFormat::Utm => geographic_to_utm(p).to_string(),
        DisplayFormat::Mgrs => {
            let mgrs = utm_to_mgrs(&geographic_to_utm(p));
            if mgrs.is_representable() {
                mgrs.to_string()
            } else {
                String::new()
            }
        }
    };

    Ok(text)
}
