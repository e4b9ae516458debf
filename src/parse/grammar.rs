//! Per-format grammars over the token stream
//!
//! Every grammar must consume the whole input. Surrounding whitespace is not
//! trimmed.

use crate::grid::{mgrs_to_utm, utm_to_geographic, MgrsCoordinate, UtmCoordinate};
use crate::types::{DisplayFormat, GeoPoint};

use super::lexer::{tokenize, Token};

/// A parser for the text of one display format
pub trait Grammar {
    /// The format this grammar reads
    fn format(&self) -> DisplayFormat;

    /// Parses a complete token stream
    fn parse_tokens(&self, tokens: &[Token]) -> Option<GeoPoint>;

    /// Parses text, returning `None` unless all of it matches
    fn parse(&self, text: &str) -> Option<GeoPoint> {
        let tokens = tokenize(text)?;
        self.parse_tokens(&tokens)
    }
}

struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn is_done(&self) -> bool {
        self.pos == self.tokens.len()
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_space(&mut self) -> bool {
        self.eat(&Token::Space)
    }

    fn eat_punctuation(&mut self) -> bool {
        matches!(self.peek(), Some(Token::Comma | Token::Semicolon | Token::Colon)) && {
            self.pos += 1;
            true
        }
    }

    /// `\s*[,;:]?\s*`, may be empty
    fn optional_separator(&mut self) {
        self.eat_space();
        self.eat_punctuation();
        self.eat_space();
    }

    /// `\s*[,;:\s]\s*`, must consume something
    fn separator(&mut self) -> bool {
        let leading = self.eat_space();
        let punctuation = self.eat_punctuation();
        let trailing = self.eat_space();
        leading || punctuation || trailing
    }

    /// `[,\s]\s*` between an easting and a northing
    fn pair_separator(&mut self) -> bool {
        if self.eat(&Token::Comma) || self.eat_space() {
            self.eat_space();
            true
        } else {
            false
        }
    }

    fn number(&mut self) -> Option<&'a str> {
        match self.peek()? {
            Token::Number(n) => {
                self.pos += 1;
                Some(n)
            }
            _ => None,
        }
    }

    /// A run of digits with no sign or fraction
    fn digits(&mut self) -> Option<&'a str> {
        let start = self.pos;
        let n = self.number()?;
        if n.bytes().all(|b| b.is_ascii_digit()) {
            Some(n)
        } else {
            self.pos = start;
            None
        }
    }

    /// A number that may carry `'` thousands separators, e.g. `1'200'000.5`
    fn grouped_number(&mut self) -> Option<f64> {
        let mut text = self.number()?.to_string();
        while !text.contains('.') {
            match (self.tokens.get(self.pos), self.tokens.get(self.pos + 1)) {
                (Some(Token::Apostrophe), Some(Token::Number(group)))
                    if !group.starts_with('-') =>
                {
                    text.push_str(group);
                    self.pos += 2;
                }
                _ => break,
            }
        }
        text.parse().ok()
    }

    fn word(&mut self) -> Option<&'a str> {
        match self.peek()? {
            Token::Word(w) => {
                self.pos += 1;
                Some(w)
            }
            _ => None,
        }
    }

    fn letter(&mut self) -> Option<char> {
        let start = self.pos;
        let word = self.word()?;
        let mut chars = word.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => {
                self.pos = start;
                None
            }
        }
    }

    fn minute_mark(&mut self) -> bool {
        self.eat(&Token::Apostrophe) || self.eat(&Token::Prime)
    }
}

fn parse_unsigned(text: &str) -> Option<f64> {
    if text.starts_with('-') {
        return None;
    }
    text.parse().ok()
}

/// `x SEP y` in the display reference system
pub struct DefaultGrammar;

impl Grammar for DefaultGrammar {
    fn format(&self) -> DisplayFormat {
        DisplayFormat::Default
    }

    fn parse_tokens(&self, tokens: &[Token]) -> Option<GeoPoint> {
        let mut cursor = Cursor::new(tokens);
        let x = cursor.grouped_number()?;
        if !cursor.separator() {
            return None;
        }
        let y = cursor.grouped_number()?;
        cursor.is_done().then(|| GeoPoint::new(x, y))
    }
}

/// `x[°] SEP y[°]` in WGS84
pub struct DecimalDegreesGrammar;

impl Grammar for DecimalDegreesGrammar {
    fn format(&self) -> DisplayFormat {
        DisplayFormat::DecimalDegrees
    }

    fn parse_tokens(&self, tokens: &[Token]) -> Option<GeoPoint> {
        let mut cursor = Cursor::new(tokens);
        let x = cursor.grouped_number()?;
        cursor.eat(&Token::Degree);
        if !cursor.separator() {
            return None;
        }
        let y = cursor.grouped_number()?;
        cursor.eat(&Token::Degree);
        cursor.is_done().then(|| GeoPoint::new(x, y))
    }
}

/// One hemisphere-tagged angle, e.g. `46°12.5'N`
#[derive(Debug, Clone, Copy)]
struct TaggedAngle {
    degrees: f64,
    hemisphere: char,
}

impl TaggedAngle {
    fn new(degrees: f64, hemisphere: &str) -> Option<Self> {
        let mut chars = hemisphere.chars();
        let hemisphere = match (chars.next(), chars.next()) {
            (Some(c), None) if "NSEWnsew".contains(c) => c.to_ascii_uppercase(),
            _ => return None,
        };
        Some(Self { degrees, hemisphere })
    }

    fn is_latitude(&self) -> bool {
        matches!(self.hemisphere, 'N' | 'S')
    }

    fn signed(&self) -> f64 {
        match self.hemisphere {
            'W' | 'S' => -self.degrees,
            _ => self.degrees,
        }
    }
}

/// Orders two tagged angles as (longitude, latitude)
///
/// Exactly one of them must be a latitude.
fn combine(first: TaggedAngle, second: TaggedAngle) -> Option<GeoPoint> {
    match (first.is_latitude(), second.is_latitude()) {
        (false, true) => Some(GeoPoint::from_lonlat(first.signed(), second.signed())),
        (true, false) => Some(GeoPoint::from_lonlat(second.signed(), first.signed())),
        _ => None,
    }
}

/// `D°M.M′H SEP D°M.M′H`
pub struct DegMinGrammar;

impl DegMinGrammar {
    fn angle(cursor: &mut Cursor<'_>) -> Option<TaggedAngle> {
        let degrees: f64 = cursor.digits()?.parse().ok()?;
        cursor.eat(&Token::Degree).then_some(())?;
        let minutes = parse_unsigned(cursor.number()?)?;
        cursor.minute_mark().then_some(())?;
        TaggedAngle::new(degrees + minutes / 60.0, cursor.word()?)
    }
}

impl Grammar for DegMinGrammar {
    fn format(&self) -> DisplayFormat {
        DisplayFormat::DegMin
    }

    fn parse_tokens(&self, tokens: &[Token]) -> Option<GeoPoint> {
        let mut cursor = Cursor::new(tokens);
        let first = Self::angle(&mut cursor)?;
        cursor.optional_separator();
        let second = Self::angle(&mut cursor)?;
        if !cursor.is_done() {
            return None;
        }
        combine(first, second)
    }
}

/// `D°M′S.S″H SEP D°M′S.S″H`
pub struct DegMinSecGrammar;

impl DegMinSecGrammar {
    fn angle(cursor: &mut Cursor<'_>) -> Option<TaggedAngle> {
        let degrees: f64 = cursor.digits()?.parse().ok()?;
        cursor.eat(&Token::Degree).then_some(())?;
        let minutes: f64 = cursor.digits()?.parse().ok()?;
        cursor.minute_mark().then_some(())?;
        let seconds = parse_unsigned(cursor.number()?)?;
        cursor.eat(&Token::DoublePrime).then_some(())?;
        TaggedAngle::new(degrees + (minutes + seconds / 60.0) / 60.0, cursor.word()?)
    }
}

impl Grammar for DegMinSecGrammar {
    fn format(&self) -> DisplayFormat {
        DisplayFormat::DegMinSec
    }

    fn parse_tokens(&self, tokens: &[Token]) -> Option<GeoPoint> {
        let mut cursor = Cursor::new(tokens);
        let first = Self::angle(&mut cursor)?;
        cursor.optional_separator();
        let second = Self::angle(&mut cursor)?;
        if !cursor.is_done() {
            return None;
        }
        combine(first, second)
    }
}

/// `E, N (zone ZL)` or `ZL E N`
pub struct UtmGrammar;

impl UtmGrammar {
    fn meters(cursor: &mut Cursor<'_>) -> Option<i64> {
        let start = cursor.pos;
        if cursor.number()?.starts_with('-') {
            return None;
        }
        cursor.pos = start;
        cursor.grouped_number().map(|v| v.round() as i64)
    }

    fn zone_number(cursor: &mut Cursor<'_>) -> Option<u8> {
        cursor.digits()?.parse().ok()
    }

    /// `384289, 5118289 (zone 32T)`
    fn trailing_zone(cursor: &mut Cursor<'_>) -> Option<UtmCoordinate> {
        let easting = Self::meters(cursor)?;
        cursor.pair_separator().then_some(())?;
        let northing = Self::meters(cursor)?;
        cursor.eat_space();
        cursor.eat(&Token::OpenParen).then_some(())?;
        cursor.word()?;
        cursor.eat_space().then_some(())?;
        let zone_number = Self::zone_number(cursor)?;
        let zone_letter = cursor.letter()?;
        cursor.eat(&Token::CloseParen).then_some(())?;
        Some(UtmCoordinate::new(easting, northing, zone_number, zone_letter))
    }

    /// `32T 384289 5118289`
    fn leading_zone(cursor: &mut Cursor<'_>) -> Option<UtmCoordinate> {
        let zone_number = Self::zone_number(cursor)?;
        cursor.eat_space();
        let zone_letter = cursor.letter()?;
        cursor.eat_space().then_some(())?;
        let easting = Self::meters(cursor)?;
        cursor.pair_separator().then_some(())?;
        let northing = Self::meters(cursor)?;
        Some(UtmCoordinate::new(easting, northing, zone_number, zone_letter))
    }
}

impl Grammar for UtmGrammar {
    fn format(&self) -> DisplayFormat {
        DisplayFormat::Utm
    }

    fn parse_tokens(&self, tokens: &[Token]) -> Option<GeoPoint> {
        let forms: [fn(&mut Cursor<'_>) -> Option<UtmCoordinate>; 2] =
            [Self::trailing_zone, Self::leading_zone];

        let utm = forms.iter().find_map(|form| {
            let mut cursor = Cursor::new(tokens);
            let utm = form(&mut cursor)?;
            cursor.is_done().then_some(utm)
        })?;
        utm_to_geographic(&utm)
    }
}

/// `ZL SQ EEEEE NNNNN`
pub struct MgrsGrammar;

impl MgrsGrammar {
    /// Band letter and square, either as one word or as `T LT`
    fn letters(cursor: &mut Cursor<'_>) -> Option<(char, String)> {
        let first = cursor.word()?;
        if first.len() == 3 {
            let (band, square) = first.split_at(1);
            return Some((band.chars().next()?, square.to_string()));
        }
        if first.len() != 1 {
            return None;
        }
        let band = first.chars().next()?;
        cursor.eat_space();
        let square = cursor.word()?;
        (square.len() == 2).then(|| (band, square.to_string()))
    }

    fn offsets(cursor: &mut Cursor<'_>) -> Option<(i64, i64)> {
        let first = cursor.digits()?;
        match first.len() {
            10 => {
                let (easting, northing) = first.split_at(5);
                Some((easting.parse().ok()?, northing.parse().ok()?))
            }
            5 => {
                cursor.optional_separator();
                let second = cursor.digits()?;
                if second.len() != 5 {
                    return None;
                }
                Some((first.parse().ok()?, second.parse().ok()?))
            }
            _ => None,
        }
    }
}

impl Grammar for MgrsGrammar {
    fn format(&self) -> DisplayFormat {
        DisplayFormat::Mgrs
    }

    fn parse_tokens(&self, tokens: &[Token]) -> Option<GeoPoint> {
        let mut cursor = Cursor::new(tokens);
        let zone_number: u8 = cursor.digits()?.parse().ok()?;
        cursor.eat_space();
        let (zone_letter, square) = Self::letters(&mut cursor)?;
        cursor.optional_separator();
        let (easting, northing) = Self::offsets(&mut cursor)?;
        if !cursor.is_done() {
            return None;
        }

        let mgrs = MgrsCoordinate {
            zone_number,
            zone_letter,
            square,
            easting,
            northing,
        };
        let utm = mgrs_to_utm(&mgrs)?;
        utm_to_geographic(&utm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-4;

    fn assert_close(actual: Option<GeoPoint>, x: f64, y: f64) {
        let p = actual.expect("text should parse");
        assert!(
            (p.x - x).abs() < EPS && (p.y - y).abs() < EPS,
            "{} != ({}, {})",
            p,
            x,
            y
        );
    }

    #[test]
    fn test_default() {
        let g = DefaultGrammar;
        assert_eq!(g.parse("12.345, 67.890"), Some(GeoPoint::new(12.345, 67.890)));
        assert_eq!(g.parse("-1;2"), Some(GeoPoint::new(-1.0, 2.0)));
        assert_eq!(g.parse("1 : 2"), Some(GeoPoint::new(1.0, 2.0)));
        assert_eq!(g.parse("1 2"), Some(GeoPoint::new(1.0, 2.0)));
        assert_eq!(g.parse("12., 3"), Some(GeoPoint::new(12.0, 3.0)));
    }

    #[test]
    fn test_default_thousands_separators() {
        let g = DefaultGrammar;
        assert_eq!(
            g.parse("2'600'000, 1'200'000.5"),
            Some(GeoPoint::new(2_600_000.0, 1_200_000.5))
        );
    }

    #[test]
    fn test_default_rejects() {
        let g = DefaultGrammar;
        for text in ["", ",", "1,", ",2", " 1, 2", "1, 2 ", "1,2,3", "1 ,, 2", "a, b", "1°, 2"] {
            assert_eq!(g.parse(text), None, "{:?} accepted", text);
        }
    }

    #[test]
    fn test_decimal_degrees() {
        let g = DecimalDegreesGrammar;
        assert_eq!(g.parse("7.50000°,-46.20833°"), Some(GeoPoint::new(7.5, -46.20833)));
        assert_eq!(g.parse("7.5° 46.2"), Some(GeoPoint::new(7.5, 46.2)));
        assert_eq!(g.parse("7.5, 46.2"), Some(GeoPoint::new(7.5, 46.2)));
        assert_eq!(g.parse("7.5°°, 46.2"), None);
    }

    #[test]
    fn test_deg_min() {
        let g = DegMinGrammar;
        assert_close(g.parse("46°12.5'N, 7°30.0'E"), 7.5, 46.208333);
        assert_close(g.parse("7°30.0'E, 46°12.5'N"), 7.5, 46.208333);
        assert_close(g.parse("7°30.000′W,46°12.500′S"), -7.5, -46.208333);
        assert_close(g.parse("7°30ʼe;46°12.5’n"), 7.5, 46.208333);
        assert_close(g.parse("46°12.5'N7°30'E"), 7.5, 46.208333);
    }

    #[test]
    fn test_deg_min_requires_one_latitude() {
        let g = DegMinGrammar;
        assert_eq!(g.parse("46°12.5'N 7°30.0'N"), None);
        assert_eq!(g.parse("46°12.5'E 7°30.0'W"), None);
        assert_eq!(g.parse("46°12.5'X 7°30.0'E"), None);
        assert_eq!(g.parse("46.5°12.5'N 7°30.0'E"), None);
        assert_eq!(g.parse("46°12.5'N, 7°30.0'E "), None);
    }

    #[test]
    fn test_deg_min_sec() {
        let g = DegMinSecGrammar;
        assert_close(g.parse("7°30′0.0″E,46°12′30.0″N"), 7.5, 46.208333);
        assert_close(g.parse("46°12'30\"N 7°30'0\"E"), 7.5, 46.208333);
        assert_close(g.parse("77°2′11.6″W,38°53′51.6″S"), -77.036556, -38.897667);
        assert_eq!(g.parse("7°30′0.0″E,46°12′30.0″E"), None);
        assert_eq!(g.parse("7°30.5′0.0″E,46°12′30.0″N"), None);
    }

    #[test]
    fn test_utm_trailing_zone() {
        let g = UtmGrammar;
        assert_close(g.parse("381849, 5200555 (zone 32T)"), 7.4474, 46.9480);
        assert_close(g.parse("381'849 5'200'555(zone 32t)"), 7.4474, 46.9480);
        assert_close(g.parse("381849.4,5200555 (Zone 32T)"), 7.4474, 46.9480);
    }

    #[test]
    fn test_utm_leading_zone() {
        let g = UtmGrammar;
        assert_close(g.parse("32T 381849 5200555"), 7.4474, 46.9480);
        assert_close(g.parse("32 T 381849, 5200555"), 7.4474, 46.9480);
    }

    #[test]
    fn test_utm_rejects() {
        let g = UtmGrammar;
        assert_eq!(g.parse("381849, 5200555 (zone 61T)"), None);
        assert_eq!(g.parse("381849, 5200555 (zone 32Z)"), None);
        assert_eq!(g.parse("-381849, 5200555 (zone 32T)"), None);
        assert_eq!(g.parse("32T381849 5200555"), None);
        assert_eq!(g.parse("381849 , 5200555 (zone 32T)"), None);
    }

    #[test]
    fn test_mgrs() {
        let g = MgrsGrammar;
        assert_close(g.parse("32TLT 81849 00555"), 7.4474, 46.9480);
        assert_close(g.parse("32T LT 8184900555"), 7.4474, 46.9480);
        assert_close(g.parse("32 TLT 81849,00555"), 7.4474, 46.9480);
        assert_close(g.parse("18SUJ2339007393"), -77.036548, 38.897676);
    }

    #[test]
    fn test_mgrs_rejects() {
        let g = MgrsGrammar;
        for text in [
            "32TLW 81849 00555",
            "32TLT 8184 00555",
            "32TLT 81849 00555 1",
            "32TL 81849 00555",
            "32ZLT 81849 00555",
            "61TLT 81849 00555",
            "32TL T 81849 00555",
        ] {
            assert_eq!(g.parse(text), None, "{:?} accepted", text);
        }
    }
}
