use serde::{Deserialize, Serialize};

use crate::types::{DisplayFormat, HeightUnit};

#[derive(Debug, Deserialize)]
pub struct FormatRequest {
    pub x: f64,
    pub y: f64,
    /// System of `x`/`y`, defaults to WGS84
    #[serde(default)]
    pub crs: Option<String>,
    /// Overrides the configured format
    #[serde(default)]
    pub format: Option<DisplayFormat>,
    /// Overrides the configured display system
    #[serde(default)]
    pub display_crs: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FormatResponse {
    pub text: String,
    pub format: DisplayFormat,
    pub display_crs: String,
}

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub text: String,
    #[serde(default)]
    pub format: Option<DisplayFormat>,
    /// System to return the position in, defaults to the format's own
    #[serde(default)]
    pub target_crs: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ParseResponse {
    pub valid: bool,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub crs: String,
}

#[derive(Debug, Deserialize)]
pub struct HeightRequest {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub crs: Option<String>,
    #[serde(default)]
    pub unit: Option<HeightUnit>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HeightResponse {
    pub height: f64,
    pub unit: HeightUnit,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
