//! Display configuration and change notification

use std::fmt;
use std::str::FromStr;

use crate::error::Result;
use crate::projection::{MapUnits, ReferenceSystem};
use crate::types::{DisplayFormat, HeightUnit};

/// A change published to display listeners
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayChange {
    Format {
        format: DisplayFormat,
        reference_system: ReferenceSystem,
    },
    HeightUnit(HeightUnit),
}

/// Handle returned by [`DisplayConfiguration::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn Fn(&DisplayChange) + Send + Sync>;

/// The current display format, display reference system and height unit
///
/// Every setter notifies all listeners, even when the value is unchanged.
pub struct DisplayConfiguration {
    format: DisplayFormat,
    reference_system: ReferenceSystem,
    height_unit: HeightUnit,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl DisplayConfiguration {
    /// Default format in WGS84, heights in meters
    pub fn new() -> Self {
        Self::with(DisplayFormat::Default, ReferenceSystem::wgs84(), HeightUnit::Meters)
    }

    pub fn with(format: DisplayFormat, reference_system: ReferenceSystem, height_unit: HeightUnit) -> Self {
        Self {
            format,
            reference_system,
            height_unit,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn format(&self) -> DisplayFormat {
        self.format
    }

    pub fn reference_system(&self) -> &ReferenceSystem {
        &self.reference_system
    }

    /// Returns the current (format, reference system) pair
    pub fn display_format(&self) -> (DisplayFormat, &ReferenceSystem) {
        (self.format, &self.reference_system)
    }

    pub fn height_unit(&self) -> HeightUnit {
        self.height_unit
    }

    /// Sets the format and reference system together
    pub fn set_display_format(&mut self, format: DisplayFormat, reference_system: ReferenceSystem) {
        self.format = format;
        self.reference_system = reference_system;
        self.notify(&DisplayChange::Format {
            format,
            reference_system: self.reference_system.clone(),
        });
    }

    pub fn set_height_unit(&mut self, unit: HeightUnit) {
        self.height_unit = unit;
        self.notify(&DisplayChange::HeightUnit(unit));
    }

    /// Switches to a named preset
    pub fn apply_preset(&mut self, preset: DisplayPreset) -> Result<()> {
        let reference_system = preset.reference_system()?;
        self.set_display_format(preset.format(), reference_system);
        Ok(())
    }

    /// Registers a listener called on every change
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&DisplayChange) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener, returning whether it was registered
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn notify(&self, change: &DisplayChange) {
        for (_, listener) in &self.listeners {
            listener(change);
        }
    }
}

impl Default for DisplayConfiguration {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DisplayConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisplayConfiguration")
            .field("format", &self.format)
            .field("reference_system", &self.reference_system)
            .field("height_unit", &self.height_unit)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Named display choices offered to users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayPreset {
    /// Swiss LV03 grid
    Lv03,
    /// Swiss LV95 grid
    Lv95,
    Dms,
    Dm,
    Dd,
    Utm,
    Mgrs,
}

impl DisplayPreset {
    pub const ALL: [DisplayPreset; 7] = [
        DisplayPreset::Lv03,
        DisplayPreset::Lv95,
        DisplayPreset::Dms,
        DisplayPreset::Dm,
        DisplayPreset::Dd,
        DisplayPreset::Utm,
        DisplayPreset::Mgrs,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DisplayPreset::Lv03 => "LV03",
            DisplayPreset::Lv95 => "LV95",
            DisplayPreset::Dms => "DMS",
            DisplayPreset::Dm => "DM",
            DisplayPreset::Dd => "DD",
            DisplayPreset::Utm => "UTM",
            DisplayPreset::Mgrs => "MGRS",
        }
    }

    pub fn format(&self) -> DisplayFormat {
        match self {
            DisplayPreset::Lv03 | DisplayPreset::Lv95 => DisplayFormat::Default,
            DisplayPreset::Dms => DisplayFormat::DegMinSec,
            DisplayPreset::Dm => DisplayFormat::DegMin,
            DisplayPreset::Dd => DisplayFormat::DecimalDegrees,
            DisplayPreset::Utm => DisplayFormat::Utm,
            DisplayPreset::Mgrs => DisplayFormat::Mgrs,
        }
    }

    pub fn reference_system(&self) -> Result<ReferenceSystem> {
        match self {
            DisplayPreset::Lv03 => ReferenceSystem::with_units("EPSG:21781", MapUnits::Meters),
            DisplayPreset::Lv95 => ReferenceSystem::with_units("EPSG:2056", MapUnits::Meters),
            _ => Ok(ReferenceSystem::wgs84()),
        }
    }

    /// Preset matching a map's reference system, if there is one
    pub fn for_map_crs(map_crs: &ReferenceSystem) -> Option<Self> {
        match map_crs.epsg_code()? {
            4326 => Some(DisplayPreset::Dms),
            21781 => Some(DisplayPreset::Lv03),
            2056 => Some(DisplayPreset::Lv95),
            _ => None,
        }
    }
}

impl fmt::Display for DisplayPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DisplayPreset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        DisplayPreset::ALL
            .into_iter()
            .find(|preset| preset.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown display preset: {}", s))
    }
}
