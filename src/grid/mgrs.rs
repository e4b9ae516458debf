//! UTM ⇄ MGRS conversion
//!
//! The 100 km square letters repeat every six zones. Column letters run
//! A..Z and row letters A..V, both skipping I and O.

use super::{is_band_letter, MgrsCoordinate, UtmCoordinate};

const NUM_100K_SETS: u8 = 6;
const SET_ORIGIN_COLUMN_LETTERS: &[u8; 6] = b"AJSAJS";
const SET_ORIGIN_ROW_LETTERS: &[u8; 6] = b"AFAFAF";

const A: i32 = b'A' as i32;
const I: i32 = b'I' as i32;
const O: i32 = b'O' as i32;
const V: i32 = b'V' as i32;
const Z: i32 = b'Z' as i32;

const HUNDRED_KM: i64 = 100_000;

fn set_for_zone(zone_number: u8) -> usize {
    match zone_number % NUM_100K_SETS {
        0 => NUM_100K_SETS as usize,
        set => set as usize,
    }
}

fn square_letters(column: i64, row: i64, set: usize) -> String {
    let col_origin = SET_ORIGIN_COLUMN_LETTERS[set - 1] as i32;
    let row_origin = SET_ORIGIN_ROW_LETTERS[set - 1] as i32;

    let mut col = col_origin + column as i32 - 1;
    let mut row_letter = row_origin + row as i32;
    let mut rollover = false;

    if col > Z {
        col = col - Z + A - 1;
        rollover = true;
    }
    if col == I || (col_origin < I && col > I) || ((col > I || col_origin < I) && rollover) {
        col += 1;
    }
    if col == O || (col_origin < O && col > O) || ((col > O || col_origin < O) && rollover) {
        col += 1;
        if col == I {
            col += 1;
        }
    }
    if col > Z {
        col = col - Z + A - 1;
    }

    if row_letter > V {
        row_letter = row_letter - V + A - 1;
        rollover = true;
    } else {
        rollover = false;
    }
    if row_letter == I || (row_origin < I && row_letter > I) || ((row_letter > I || row_origin < I) && rollover) {
        row_letter += 1;
    }
    if row_letter == O || (row_origin < O && row_letter > O) || ((row_letter > O || row_origin < O) && rollover) {
        row_letter += 1;
        if row_letter == I {
            row_letter += 1;
        }
    }
    if row_letter > V {
        row_letter = row_letter - V + A - 1;
    }

    [col as u8 as char, row_letter as u8 as char].iter().collect()
}

/// Converts a UTM coordinate into MGRS
///
/// The square is left empty when the zone letter is not a latitude band,
/// which is how positions outside the grid are reported.
pub fn utm_to_mgrs(utm: &UtmCoordinate) -> MgrsCoordinate {
    let square = if utm.has_valid_band() && (1..=60).contains(&utm.zone_number) {
        let column = utm.easting.div_euclid(HUNDRED_KM);
        let row = utm.northing.div_euclid(HUNDRED_KM).rem_euclid(20);
        square_letters(column, row, set_for_zone(utm.zone_number))
    } else {
        String::new()
    };

    MgrsCoordinate {
        zone_number: utm.zone_number,
        zone_letter: utm.zone_letter,
        square,
        easting: utm.easting.rem_euclid(HUNDRED_KM),
        northing: utm.northing.rem_euclid(HUNDRED_KM),
    }
}

fn easting_from_letter(letter: u8, set: usize) -> Option<i64> {
    let target = letter as i32;
    let mut current = SET_ORIGIN_COLUMN_LETTERS[set - 1] as i32;
    let mut easting = HUNDRED_KM;
    let mut rewound = false;

    while current != target {
        current += 1;
        if current == I {
            current += 1;
        }
        if current == O {
            current += 1;
        }
        if current > Z {
            if rewound {
                return None;
            }
            current = A;
            rewound = true;
        }
        easting += HUNDRED_KM;
    }

    Some(easting)
}

fn northing_from_letter(letter: u8, set: usize) -> Option<i64> {
    let target = letter as i32;
    if target > V {
        return None;
    }

    let mut current = SET_ORIGIN_ROW_LETTERS[set - 1] as i32;
    let mut northing = 0;
    let mut rewound = false;

    while current != target {
        current += 1;
        if current == I {
            current += 1;
        }
        if current == O {
            current += 1;
        }
        if current > V {
            if rewound {
                return None;
            }
            current = A;
            rewound = true;
        }
        northing += HUNDRED_KM;
    }

    Some(northing)
}

/// Lowest northing reached by each latitude band
fn min_northing(band: char) -> Option<i64> {
    let northing = match band {
        'C' => 1_100_000,
        'D' => 2_000_000,
        'E' => 2_800_000,
        'F' => 3_700_000,
        'G' => 4_600_000,
        'H' => 5_500_000,
        'J' => 6_400_000,
        'K' => 7_300_000,
        'L' => 8_200_000,
        'M' => 9_100_000,
        'N' => 0,
        'P' => 800_000,
        'Q' => 1_700_000,
        'R' => 2_600_000,
        'S' => 3_500_000,
        'T' => 4_400_000,
        'U' => 5_300_000,
        'V' => 6_200_000,
        'W' => 7_000_000,
        'X' => 7_900_000,
        _ => return None,
    };
    Some(northing)
}

/// Converts an MGRS coordinate into UTM
///
/// Returns `None` for an invalid zone, band or square identifier.
pub fn mgrs_to_utm(mgrs: &MgrsCoordinate) -> Option<UtmCoordinate> {
    if !(1..=60).contains(&mgrs.zone_number) || !is_band_letter(mgrs.zone_letter) {
        return None;
    }
    if !(0..HUNDRED_KM).contains(&mgrs.easting) || !(0..HUNDRED_KM).contains(&mgrs.northing) {
        return None;
    }

    let band = mgrs.zone_letter.to_ascii_uppercase();
    let square = mgrs.square.to_ascii_uppercase();
    let &[column_letter, row_letter] = square.as_bytes() else {
        return None;
    };
    if !column_letter.is_ascii_uppercase() || !row_letter.is_ascii_uppercase() {
        return None;
    }

    let set = set_for_zone(mgrs.zone_number);
    let east_100k = easting_from_letter(column_letter, set)?;
    let mut north_100k = northing_from_letter(row_letter, set)?;

    let min = min_northing(band)?;
    while north_100k < min {
        north_100k += 2_000_000;
    }

    Some(UtmCoordinate {
        easting: east_100k + mgrs.easting,
        northing: north_100k + mgrs.northing,
        zone_number: mgrs.zone_number,
        zone_letter: band,
    })
}
