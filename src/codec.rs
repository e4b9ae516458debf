//! Coordinate codec facade
//!
//! Bundles the display configuration, the transform cache and the project
//! settings so callers format, parse and sample heights through one value.

use crate::config::DisplayConfiguration;
use crate::elevation::{ElevationError, HeightSampler};
use crate::error::Result;
use crate::format::{format_point, target_system};
use crate::parse::parse;
use crate::projection::{ReferenceSystem, TransformCache};
use crate::settings::{ProjectSettings, Settings};
use crate::types::{DisplayFormat, GeoPoint};

pub struct CoordinateCodec {
    display: DisplayConfiguration,
    transforms: TransformCache,
    project: ProjectSettings,
}

impl CoordinateCodec {
    pub fn new(display: DisplayConfiguration, project: ProjectSettings) -> Self {
        Self {
            display,
            transforms: TransformCache::new(),
            project,
        }
    }

    /// Builds a codec from the display and project sections of `settings`
    pub fn from_settings(settings: &Settings) -> Self {
        let display = DisplayConfiguration::with(
            settings.display.format,
            settings.display.reference_system.clone(),
            settings.display.height_unit,
        );
        Self::new(display, settings.project.clone())
    }

    pub fn display(&self) -> &DisplayConfiguration {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut DisplayConfiguration {
        &mut self.display
    }

    pub fn project(&self) -> &ProjectSettings {
        &self.project
    }

    pub fn transforms(&self) -> &TransformCache {
        &self.transforms
    }

    /// Formats `point` with the configured format and reference system
    pub fn format(&self, point: GeoPoint, source: &ReferenceSystem) -> Result<String> {
        let (format, display) = self.display.display_format();
        format_point(point, source, format, display, &self.transforms)
    }

    /// Formats `point` with an explicit format and display system
    pub fn format_with(
        &self,
        point: GeoPoint,
        source: &ReferenceSystem,
        format: DisplayFormat,
        display: &ReferenceSystem,
    ) -> Result<String> {
        format_point(point, source, format, display, &self.transforms)
    }

    pub fn parse(&self, text: &str, format: DisplayFormat) -> Option<GeoPoint> {
        parse(text, format)
    }

    /// System that parsed `format` text is expressed in
    pub fn native_system(&self, format: DisplayFormat) -> ReferenceSystem {
        target_system(format, self.display.reference_system())
    }

    /// Parses `text` and reprojects the result into `target`
    ///
    /// `Ok(None)` means the text did not match; a failed transform is an error.
    pub fn parse_into(&self, text: &str, format: DisplayFormat, target: &ReferenceSystem) -> Result<Option<GeoPoint>> {
        let Some(point) = parse(text, format) else {
            return Ok(None);
        };
        let native = self.native_system(format);
        self.transforms.transform(point, &native, target).map(Some)
    }

    pub fn heights(&self) -> HeightSampler<'_> {
        HeightSampler::new(&self.project, &self.transforms)
    }

    /// Height at `point` in the configured height unit
    pub fn height_at(&self, point: GeoPoint, rs: &ReferenceSystem) -> std::result::Result<f64, ElevationError> {
        self.heights().height_at(point, rs, self.display.height_unit())
    }

    /// Height at `point`, or 0 and the failure message
    pub fn height_or_message(&self, point: GeoPoint, rs: &ReferenceSystem) -> (f64, Option<String>) {
        self.heights().height_or_message(point, rs, self.display.height_unit())
    }
}

impl Default for CoordinateCodec {
    fn default() -> Self {
        Self::new(DisplayConfiguration::new(), ProjectSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DisplayChange, DisplayPreset};
    use crate::types::HeightUnit;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_format_uses_display_configuration() {
        let mut codec = CoordinateCodec::default();
        let wgs84 = ReferenceSystem::wgs84();
        let p = GeoPoint::new(7.5, 46.2);

        assert_eq!(codec.format(p, &wgs84).unwrap(), "7.5000, 46.2000");

        codec.display_mut().apply_preset(DisplayPreset::Dd).unwrap();
        assert_eq!(codec.format(p, &wgs84).unwrap(), "7.50000°,46.20000°");

        codec.display_mut().apply_preset(DisplayPreset::Dm).unwrap();
        assert_eq!(codec.format(p, &wgs84).unwrap(), "7°30.000′E,46°12.000′N");
    }

    #[test]
    fn test_format_with_ignores_configuration() {
        let codec = CoordinateCodec::default();
        let wgs84 = ReferenceSystem::wgs84();
        let text = codec
            .format_with(GeoPoint::new(7.5, 46.2), &wgs84, DisplayFormat::DegMinSec, &wgs84)
            .unwrap();
        assert_eq!(text, "7°30′0.0″E,46°12′0.0″N");
    }

    #[test]
    fn test_parse_into_wgs84() {
        let codec = CoordinateCodec::default();
        let wgs84 = ReferenceSystem::wgs84();

        let p = codec
            .parse_into("46°12.5'N, 7°30.0'E", DisplayFormat::DegMin, &wgs84)
            .unwrap()
            .unwrap();
        assert!((p.x - 7.5).abs() < 1e-9);
        assert!((p.y - 46.208333333).abs() < 1e-6);

        assert_eq!(codec.parse_into("garbage", DisplayFormat::DegMin, &wgs84).unwrap(), None);
    }

    #[test]
    fn test_native_system() {
        let mut codec = CoordinateCodec::default();
        let lv95 = ReferenceSystem::from_epsg(2056).unwrap();
        codec.display_mut().set_display_format(DisplayFormat::Default, lv95.clone());

        assert_eq!(codec.native_system(DisplayFormat::Default), lv95);
        assert_eq!(codec.native_system(DisplayFormat::DegMinSec), lv95);
        assert_eq!(codec.native_system(DisplayFormat::Mgrs), ReferenceSystem::wgs84());
        assert_eq!(codec.native_system(DisplayFormat::Utm), ReferenceSystem::wgs84());
    }

    #[test]
    fn test_parse_into_geographic_display_round_trip() {
        let mut codec = CoordinateCodec::default();
        let etrs89 = ReferenceSystem::from_epsg(4258).unwrap();
        let p = GeoPoint::new(7.5, 46.2);

        for format in [DisplayFormat::DecimalDegrees, DisplayFormat::DegMin, DisplayFormat::DegMinSec] {
            codec.display_mut().set_display_format(format, etrs89.clone());
            assert_eq!(codec.native_system(format), etrs89);

            let text = codec.format(p, &etrs89).unwrap();
            let back = codec.parse_into(&text, format, &etrs89).unwrap().unwrap();
            assert!(
                (back.x - p.x).abs() < 1e-4 && (back.y - p.y).abs() < 1e-4,
                "{} -> {} -> {}",
                p,
                text,
                back
            );
        }
    }

    #[test]
    fn test_listeners_see_changes_through_codec() {
        let mut codec = CoordinateCodec::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        codec.display_mut().subscribe(move |change| sink.lock().unwrap().push(change.clone()));

        codec.display_mut().set_height_unit(HeightUnit::Feet);
        assert_eq!(*seen.lock().unwrap(), vec![DisplayChange::HeightUnit(HeightUnit::Feet)]);
    }

    #[test]
    fn test_from_settings() {
        let settings = Settings::from_json_str(
            r#"{"display": {"format": "utm", "reference_system": "EPSG:4326", "height_unit": "feet"}}"#,
        )
        .unwrap();
        let codec = CoordinateCodec::from_settings(&settings);

        assert_eq!(codec.display().format(), DisplayFormat::Utm);
        assert_eq!(codec.display().height_unit(), HeightUnit::Feet);
        assert!(codec.project().heightmap_layer.is_none());
    }

    #[test]
    fn test_height_without_heightmap() {
        let codec = CoordinateCodec::default();
        let wgs84 = ReferenceSystem::wgs84();

        assert_eq!(
            codec.height_at(GeoPoint::new(7.0, 46.0), &wgs84),
            Err(ElevationError::NoHeightmap)
        );
        let (height, message) = codec.height_or_message(GeoPoint::new(7.0, 46.0), &wgs84);
        assert_eq!(height, 0.0);
        assert_eq!(message.as_deref(), Some("No heightmap is defined in the project."));
    }
}
