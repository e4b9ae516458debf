//! Coordinate search over free text

use serde::Serialize;

use crate::parse::parse;
use crate::projection::ReferenceSystem;
use crate::types::{DisplayFormat, GeoPoint};

/// Category reported for every coordinate hit
pub const CATEGORY: &str = "Coordinates";

/// Map scale to zoom to when a hit is selected
pub const ZOOM_SCALE: f64 = 1000.0;

/// Formats in the order they are tried, most specific first
const SEARCH_ORDER: [DisplayFormat; 6] = [
    DisplayFormat::Mgrs,
    DisplayFormat::Utm,
    DisplayFormat::DegMinSec,
    DisplayFormat::DegMin,
    DisplayFormat::DecimalDegrees,
    DisplayFormat::Default,
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub format: DisplayFormat,
    pub label: String,
    pub category: &'static str,
    pub pos: GeoPoint,
    /// System `pos` is expressed in
    pub crs: ReferenceSystem,
    pub zoom_scale: f64,
}

/// Interprets search text as a coordinate in any known format
///
/// Plain number pairs are read in the display system, every other format
/// in WGS84.
pub struct CoordinateSearch {
    display: ReferenceSystem,
}

impl CoordinateSearch {
    pub fn new(display: ReferenceSystem) -> Self {
        Self { display }
    }

    pub fn search(&self, text: &str) -> Vec<SearchResult> {
        let text = text.trim();
        let mut results: Vec<SearchResult> = Vec::new();

        for format in SEARCH_ORDER {
            let Some(pos) = parse(text, format) else {
                continue;
            };
            let crs = match format {
                DisplayFormat::Default => self.display.clone(),
                _ => ReferenceSystem::wgs84(),
            };
            if results.iter().any(|r| r.pos == pos && r.crs == crs) {
                continue;
            }

            results.push(SearchResult {
                format,
                label: format!("{} ({})", text, format.name()),
                category: CATEGORY,
                pos,
                crs,
                zoom_scale: ZOOM_SCALE,
            });
        }

        results
    }
}
