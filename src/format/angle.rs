//! Sexagesimal rendering of geographic points

use crate::types::GeoPoint;

pub(crate) const DEGREE_SIGN: char = '\u{00B0}';
pub(crate) const MINUTE_SIGN: char = '\u{2032}';
pub(crate) const SECOND_SIGN: char = '\u{2033}';

/// Wraps a longitude into (-180, 180]
fn wrap_longitude(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 {
        180.0
    } else {
        wrapped
    }
}

fn clamp_latitude(lat: f64) -> f64 {
    lat.clamp(-90.0, 90.0)
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    Longitude,
    Latitude,
}

impl Axis {
    fn hemisphere(self, value: f64) -> char {
        match (self, value.is_sign_negative() && value != 0.0) {
            (Axis::Longitude, false) => 'E',
            (Axis::Longitude, true) => 'W',
            (Axis::Latitude, false) => 'N',
            (Axis::Latitude, true) => 'S',
        }
    }
}

/// Splits an angle into whole degrees and minutes in units of `1/scale`
///
/// Rounding happens once on the smallest unit, so 59.96′ at one decimal
/// becomes the next whole degree rather than 60.0′.
fn split_units(value: f64, units_per_degree: f64, scale: f64) -> (u64, u64) {
    let units = (value.abs() * units_per_degree * scale).round() as u64;
    let per_degree = (units_per_degree * scale) as u64;
    (units / per_degree, units % per_degree)
}

fn dms_component(value: f64, axis: Axis, precision: usize) -> String {
    let scale = 10f64.powi(precision as i32);
    let (degrees, rest) = split_units(value, 3600.0, scale);
    let per_minute = (60.0 * scale) as u64;
    let minutes = rest / per_minute;
    let seconds = (rest % per_minute) as f64 / scale;

    format!(
        "{}{}{}{}{:.*}{}{}",
        degrees,
        DEGREE_SIGN,
        minutes,
        MINUTE_SIGN,
        precision,
        seconds,
        SECOND_SIGN,
        axis.hemisphere(value)
    )
}

fn dm_component(value: f64, axis: Axis, precision: usize) -> String {
    let scale = 10f64.powi(precision as i32);
    let (degrees, rest) = split_units(value, 60.0, scale);
    let minutes = rest as f64 / scale;

    format!(
        "{}{}{:.*}{}{}",
        degrees,
        DEGREE_SIGN,
        precision,
        minutes,
        MINUTE_SIGN,
        axis.hemisphere(value)
    )
}

/// Renders `D°M′S.S″H,D°M′S.S″H` (longitude first)
pub fn to_degrees_minutes_seconds(point: GeoPoint, precision: usize) -> String {
    format!(
        "{},{}",
        dms_component(wrap_longitude(point.lon()), Axis::Longitude, precision),
        dms_component(clamp_latitude(point.lat()), Axis::Latitude, precision)
    )
}

/// Renders `D°M.MMM′H,D°M.MMM′H` (longitude first)
pub fn to_degrees_minutes(point: GeoPoint, precision: usize) -> String {
    format!(
        "{},{}",
        dm_component(wrap_longitude(point.lon()), Axis::Longitude, precision),
        dm_component(clamp_latitude(point.lat()), Axis::Latitude, precision)
    )
}
