use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Units of the axes of a reference system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapUnits {
    Degrees,
    Meters,
}

/// Geographic (lon/lat) systems recognised without consulting PROJ
const GEOGRAPHIC_CODES: &[&str] = &[
    "EPSG:4326", // WGS 84
    "EPSG:4258", // ETRS89
    "EPSG:4269", // NAD83
    "EPSG:4267", // NAD27
    "EPSG:4283", // GDA94
    "EPSG:7844", // GDA2020
    "EPSG:4150", // CH1903+
    "EPSG:4149", // CH1903
    "EPSG:4171", // RGF93
    "EPSG:4230", // ED50
    "EPSG:4612", // JGD2000
    "EPSG:4617", // NAD83(CSRS)
    "EPSG:4674", // SIRGAS 2000
    "CRS:84",
    "OGC:CRS84",
];

/// Identifies a coordinate reference system by its authority code
///
/// The identifier is normalised to upper case so `epsg:4326` and `EPSG:4326`
/// name the same system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReferenceSystem {
    auth_id: String,
    units: MapUnits,
}

impl ReferenceSystem {
    /// Creates a reference system from an `AUTHORITY:CODE` identifier
    pub fn from_auth_id(auth_id: &str) -> Result<Self> {
        let auth_id = normalise(auth_id)?;
        let units = if GEOGRAPHIC_CODES.contains(&auth_id.as_str()) {
            MapUnits::Degrees
        } else {
            MapUnits::Meters
        };
        Ok(Self { auth_id, units })
    }

    /// Creates a reference system whose units are known to the caller
    pub fn with_units(auth_id: &str, units: MapUnits) -> Result<Self> {
        Ok(Self {
            auth_id: normalise(auth_id)?,
            units,
        })
    }

    /// Creates an EPSG reference system from its numeric code
    pub fn from_epsg(code: u32) -> Result<Self> {
        Self::from_auth_id(&format!("EPSG:{}", code))
    }

    /// WGS 84 geographic coordinates
    pub fn wgs84() -> Self {
        Self {
            auth_id: "EPSG:4326".to_string(),
            units: MapUnits::Degrees,
        }
    }

    /// Returns the authority identifier, e.g. `EPSG:4326`
    pub fn auth_id(&self) -> &str {
        &self.auth_id
    }

    pub fn units(&self) -> MapUnits {
        self.units
    }

    pub fn is_geographic(&self) -> bool {
        self.units == MapUnits::Degrees
    }

    /// Returns the EPSG code, if this is an EPSG system
    pub fn epsg_code(&self) -> Option<u32> {
        self.auth_id.strip_prefix("EPSG:")?.parse().ok()
    }
}

fn normalise(auth_id: &str) -> Result<String> {
    let invalid = || Error::InvalidReferenceSystem(auth_id.to_string());
    let (authority, code) = auth_id.split_once(':').ok_or_else(invalid)?;

    let authority_ok = !authority.is_empty()
        && authority.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    let code_ok = !code.is_empty()
        && code.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));

    if !authority_ok || !code_ok {
        return Err(invalid());
    }

    Ok(auth_id.to_ascii_uppercase())
}

impl Default for ReferenceSystem {
    fn default() -> Self {
        Self::wgs84()
    }
}

impl TryFrom<String> for ReferenceSystem {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::from_auth_id(&value)
    }
}

impl From<ReferenceSystem> for String {
    fn from(value: ReferenceSystem) -> Self {
        value.auth_id
    }
}

impl fmt::Display for ReferenceSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.auth_id)
    }
}
