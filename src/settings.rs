//! JSON settings shared by the CLI and the API server

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::projection::ReferenceSystem;
use crate::types::{DisplayFormat, HeightUnit};

/// Environment variable naming the settings file
pub const CONFIG_ENV: &str = "COORDKIT_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub display: DisplaySettings,
    pub project: ProjectSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub format: DisplayFormat,
    pub reference_system: ReferenceSystem,
    pub height_unit: HeightUnit,
}

/// Project-level entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSettings {
    /// Id of the layer used as heightmap
    pub heightmap_layer: Option<String>,
    pub layers: Vec<LayerEntry>,
    /// Read by digitizing tools, not by the codec
    pub topological_editing: bool,
    /// Read by digitizing tools, not by the codec
    pub avoid_intersections_layers: Vec<String>,
}

impl ProjectSettings {
    pub fn layer(&self, id: &str) -> Option<&LayerEntry> {
        self.layers.iter().find(|layer| layer.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerEntry {
    pub id: String,
    pub kind: LayerKind,
    /// File path of the layer data
    pub source: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Raster,
    Vector,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3000".to_string(),
        }
    }
}

impl Settings {
    /// Reads settings from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Loads the file named by `path`, else by `COORDKIT_CONFIG`, else
    /// returns the defaults
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => match std::env::var_os(CONFIG_ENV) {
                Some(path) => Self::load(path),
                None => Ok(Self::default()),
            },
        }
    }
}
