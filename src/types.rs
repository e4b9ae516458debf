//! Core value types for coordkit

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A point in some reference system
///
/// For geographic systems `x` is the longitude and `y` the latitude,
/// both in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub x: f64,
    pub y: f64,
}

impl GeoPoint {
    /// Creates a new point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Creates a point from longitude/latitude in degrees
    pub fn from_lonlat(lon: f64, lat: f64) -> Self {
        Self::new(lon, lat)
    }

    /// Longitude, for geographic points
    pub fn lon(&self) -> f64 {
        self.x
    }

    /// Latitude, for geographic points
    pub fn lat(&self) -> f64 {
        self.y
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Textual encoding used to display or parse a coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayFormat {
    /// Plain `x, y` in the display reference system
    #[default]
    Default,
    /// Degrees, minutes and seconds
    DegMinSec,
    /// Degrees and decimal minutes
    DegMin,
    /// Decimal degrees with degree signs
    DecimalDegrees,
    /// Universal Transverse Mercator
    Utm,
    /// Military Grid Reference System
    Mgrs,
}

impl DisplayFormat {
    /// All formats, most specific grammar first
    pub const ALL: [DisplayFormat; 6] = [
        DisplayFormat::Mgrs,
        DisplayFormat::Utm,
        DisplayFormat::DegMinSec,
        DisplayFormat::DegMin,
        DisplayFormat::DecimalDegrees,
        DisplayFormat::Default,
    ];

    /// Returns the name of this format
    pub fn name(&self) -> &'static str {
        match self {
            DisplayFormat::Default => "default",
            DisplayFormat::DegMinSec => "deg-min-sec",
            DisplayFormat::DegMin => "deg-min",
            DisplayFormat::DecimalDegrees => "decimal-degrees",
            DisplayFormat::Utm => "utm",
            DisplayFormat::Mgrs => "mgrs",
        }
    }

    /// Whether this format always works on WGS84 geographic coordinates
    /// regardless of the configured display reference system
    pub fn is_grid(&self) -> bool {
        matches!(self, DisplayFormat::Utm | DisplayFormat::Mgrs)
    }
}

impl fmt::Display for DisplayFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DisplayFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(DisplayFormat::Default),
            "deg-min-sec" | "dms" => Ok(DisplayFormat::DegMinSec),
            "deg-min" | "dm" => Ok(DisplayFormat::DegMin),
            "decimal-degrees" | "dd" => Ok(DisplayFormat::DecimalDegrees),
            "utm" => Ok(DisplayFormat::Utm),
            "mgrs" => Ok(DisplayFormat::Mgrs),
            other => Err(format!("unknown display format: {}", other)),
        }
    }
}

/// Unit used to display elevations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeightUnit {
    #[default]
    Meters,
    Feet,
}

const METERS_PER_FOOT: f64 = 0.3048;

impl HeightUnit {
    /// Factor converting a value in `self` into `target`
    pub fn factor_to(&self, target: HeightUnit) -> f64 {
        match (self, target) {
            (HeightUnit::Meters, HeightUnit::Feet) => 1.0 / METERS_PER_FOOT,
            (HeightUnit::Feet, HeightUnit::Meters) => METERS_PER_FOOT,
            _ => 1.0,
        }
    }

    /// Returns the unit abbreviation
    pub fn suffix(&self) -> &'static str {
        match self {
            HeightUnit::Meters => "m",
            HeightUnit::Feet => "ft",
        }
    }
}

impl FromStr for HeightUnit {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "m" | "meters" | "metres" => Ok(HeightUnit::Meters),
            "ft" | "feet" => Ok(HeightUnit::Feet),
            other => Err(format!("unknown height unit: {}", other)),
        }
    }
}
