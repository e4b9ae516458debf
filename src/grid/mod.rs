//! UTM and MGRS grid conversions on the WGS84 ellipsoid
//!
//! All functions are pure. Conversions that can fail return `None` instead of
//! an error, and an MGRS coordinate whose 100 km square is empty marks a
//! position the grid cannot represent (beyond 84°N or 80°S).

pub mod mgrs;
pub mod utm;

pub use mgrs::{mgrs_to_utm, utm_to_mgrs};
pub use utm::{geographic_to_utm, latitude_band, utm_to_geographic};

use std::fmt;

/// Latitude band letters from 80°S northwards, 8° each (X spans 12°)
pub(crate) const LATITUDE_BANDS: &[u8; 20] = b"CDEFGHJKLMNPQRSTUVWX";

/// A position in the UTM grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtmCoordinate {
    pub easting: i64,
    pub northing: i64,
    pub zone_number: u8,
    pub zone_letter: char,
}

impl UtmCoordinate {
    pub fn new(easting: i64, northing: i64, zone_number: u8, zone_letter: char) -> Self {
        Self { easting, northing, zone_number, zone_letter }
    }

    /// Whether the zone letter names a latitude band
    pub fn has_valid_band(&self) -> bool {
        is_band_letter(self.zone_letter)
    }
}

impl fmt::Display for UtmCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {} (zone {}{})",
            self.easting, self.northing, self.zone_number, self.zone_letter
        )
    }
}

/// A position in the MGRS grid: UTM zone, 100 km square and 5-digit offsets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MgrsCoordinate {
    pub zone_number: u8,
    pub zone_letter: char,
    /// Two-letter 100 km square identifier; empty if unrepresentable
    pub square: String,
    pub easting: i64,
    pub northing: i64,
}

impl MgrsCoordinate {
    pub fn is_representable(&self) -> bool {
        self.square.len() == 2
    }
}

impl fmt::Display for MgrsCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{} {:05} {:05}",
            self.zone_number, self.zone_letter, self.square, self.easting, self.northing
        )
    }
}

pub(crate) fn is_band_letter(letter: char) -> bool {
    letter.is_ascii() && LATITUDE_BANDS.contains(&(letter.to_ascii_uppercase() as u8))
}
