//! Geographic ⇄ UTM conversion (Snyder's series on the WGS84 ellipsoid)

use super::{is_band_letter, UtmCoordinate, LATITUDE_BANDS};
use crate::types::GeoPoint;

/// WGS84 semi-major axis in meters
const A: f64 = 6_378_137.0;
/// WGS84 first eccentricity squared
const ECC_SQUARED: f64 = 0.00669438;
/// UTM central meridian scale factor
const K0: f64 = 0.9996;
const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// Returns the latitude band letter, or `Z` outside 80°S..84°N
pub fn latitude_band(lat: f64) -> char {
    if !(-80.0..=84.0).contains(&lat) {
        return 'Z';
    }
    let index = ((lat + 80.0) / 8.0).floor() as usize;
    LATITUDE_BANDS[index.min(LATITUDE_BANDS.len() - 1)] as char
}

fn zone_number(lon: f64, lat: f64) -> u8 {
    if lon == 180.0 {
        return 60;
    }

    if (56.0..64.0).contains(&lat) && (3.0..12.0).contains(&lon) {
        return 32;
    }

    if (72.0..84.0).contains(&lat) {
        match lon {
            l if (0.0..9.0).contains(&l) => return 31,
            l if (9.0..21.0).contains(&l) => return 33,
            l if (21.0..33.0).contains(&l) => return 35,
            l if (33.0..42.0).contains(&l) => return 37,
            _ => {}
        }
    }

    (((lon + 180.0) / 6.0).floor() as i64 + 1).clamp(1, 60) as u8
}

fn central_meridian(zone: u8) -> f64 {
    (zone as f64 - 1.0) * 6.0 - 180.0 + 3.0
}

fn wrap_longitude(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}

/// Converts a WGS84 lon/lat point into UTM, rounded to whole meters
pub fn geographic_to_utm(point: GeoPoint) -> UtmCoordinate {
    let lat = point.lat();
    let lon = wrap_longitude(point.lon());
    let zone = zone_number(lon, lat);

    let lat_rad = lat.to_radians();
    let lon_rad = lon.to_radians();
    let origin_rad = central_meridian(zone).to_radians();

    let e2 = ECC_SQUARED;
    let ep2 = e2 / (1.0 - e2);

    let n = A / (1.0 - e2 * lat_rad.sin().powi(2)).sqrt();
    let t = lat_rad.tan().powi(2);
    let c = ep2 * lat_rad.cos().powi(2);
    let a = lat_rad.cos() * (lon_rad - origin_rad);

    let m = A * ((1.0 - e2 / 4.0 - 3.0 * e2.powi(2) / 64.0 - 5.0 * e2.powi(3) / 256.0) * lat_rad
        - (3.0 * e2 / 8.0 + 3.0 * e2.powi(2) / 32.0 + 45.0 * e2.powi(3) / 1024.0) * (2.0 * lat_rad).sin()
        + (15.0 * e2.powi(2) / 256.0 + 45.0 * e2.powi(3) / 1024.0) * (4.0 * lat_rad).sin()
        - (35.0 * e2.powi(3) / 3072.0) * (6.0 * lat_rad).sin());

    let easting = K0 * n * (a
        + (1.0 - t + c) * a.powi(3) / 6.0
        + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a.powi(5) / 120.0)
        + FALSE_EASTING;

    let mut northing = K0 * (m + n * lat_rad.tan() * (a * a / 2.0
        + (5.0 - t + 9.0 * c + 4.0 * c * c) * a.powi(4) / 24.0
        + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a.powi(6) / 720.0));

    if lat < 0.0 {
        northing += FALSE_NORTHING_SOUTH;
    }

    UtmCoordinate {
        easting: easting.round() as i64,
        northing: northing.round() as i64,
        zone_number: zone,
        zone_letter: latitude_band(lat),
    }
}

/// Converts a UTM coordinate back into WGS84 lon/lat
///
/// Returns `None` for a zone outside 1..=60 or a letter that is not a
/// latitude band.
pub fn utm_to_geographic(utm: &UtmCoordinate) -> Option<GeoPoint> {
    if !(1..=60).contains(&utm.zone_number) || !is_band_letter(utm.zone_letter) {
        return None;
    }

    let e2 = ECC_SQUARED;
    let ep2 = e2 / (1.0 - e2);
    let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());

    let x = utm.easting as f64 - FALSE_EASTING;
    let mut y = utm.northing as f64;
    if utm.zone_letter.to_ascii_uppercase() < 'N' {
        y -= FALSE_NORTHING_SOUTH;
    }

    let m = y / K0;
    let mu = m / (A * (1.0 - e2 / 4.0 - 3.0 * e2.powi(2) / 64.0 - 5.0 * e2.powi(3) / 256.0));

    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1.powi(2) / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin();

    let n1 = A / (1.0 - e2 * phi1.sin().powi(2)).sqrt();
    let t1 = phi1.tan().powi(2);
    let c1 = ep2 * phi1.cos().powi(2);
    let r1 = A * (1.0 - e2) / (1.0 - e2 * phi1.sin().powi(2)).powf(1.5);
    let d = x / (n1 * K0);

    let lat = phi1 - (n1 * phi1.tan() / r1) * (d * d / 2.0
        - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d.powi(4) / 24.0
        + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * ep2 - 3.0 * c1 * c1) * d.powi(6) / 720.0);

    let lon = (d
        - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
        + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1) * d.powi(5) / 120.0)
        / phi1.cos();

    Some(GeoPoint::from_lonlat(
        central_meridian(utm.zone_number) + lon.to_degrees(),
        lat.to_degrees(),
    ))
}
