//! coordkit - map coordinate text codec
//!
//! coordkit renders positions as text in several display formats (plain
//! numbers, degrees/minutes/seconds, degrees/minutes, decimal degrees, UTM
//! and MGRS), reads such text back into positions and samples elevations
//! from a GeoTIFF heightmap.
//!
//! # Examples
//!
//! ## Formatting and parsing
//!
//! ```no_run
//! use coordkit::{CoordinateCodec, DisplayFormat, GeoPoint, ReferenceSystem};
//!
//! let mut codec = CoordinateCodec::default();
//! let wgs84 = ReferenceSystem::wgs84();
//! codec.display_mut().set_display_format(DisplayFormat::Mgrs, wgs84.clone());
//!
//! let text = codec.format(GeoPoint::from_lonlat(-77.036548, 38.897676), &wgs84)?;
//! assert_eq!(text, "18SUJ 23390 07393");
//!
//! let pos = codec.parse(&text, DisplayFormat::Mgrs);
//! assert!(pos.is_some());
//! # Ok::<(), coordkit::Error>(())
//! ```
//!
//! ## Heights
//!
//! ```no_run
//! use coordkit::{CoordinateCodec, GeoPoint, ReferenceSystem, Settings};
//!
//! let settings = Settings::load("project.json")?;
//! let codec = CoordinateCodec::from_settings(&settings);
//!
//! match codec.height_at(GeoPoint::from_lonlat(7.44, 46.95), &ReferenceSystem::wgs84()) {
//!     Ok(height) => println!("{} m", height),
//!     Err(e) => println!("{}", e),
//! }
//! # Ok::<(), coordkit::Error>(())
//! ```

pub mod api;
pub mod batch;
pub mod codec;
pub mod compression;
pub mod config;
pub mod elevation;
pub mod error;
pub mod format;
pub mod formats;
pub mod grid;
pub mod io;
pub mod parse;
pub mod projection;
pub mod search;
pub mod settings;
pub mod types;

pub use codec::CoordinateCodec;
pub use config::{DisplayChange, DisplayConfiguration, DisplayPreset, ListenerId};
pub use elevation::{ElevationError, HeightSampler};
pub use error::{Error, Result};
pub use formats::tiff::{GeoInfo, GeoTransform, TiffReader};
pub use grid::{MgrsCoordinate, UtmCoordinate};
pub use io::ByteOrder;
pub use projection::{MapUnits, ReferenceSystem, TransformCache, Transformer};
pub use search::{CoordinateSearch, SearchResult};
pub use settings::Settings;
pub use types::{DisplayFormat, GeoPoint, HeightUnit};

use tracing_subscriber::EnvFilter;

/// Installs the fmt subscriber, filtered by `RUST_LOG` or `default_filter`
pub fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
