//! Text to coordinate parsing
//!
//! Each [`DisplayFormat`] has a [`Grammar`] over the tokens produced by
//! [`lexer::tokenize`]. Parsing never fails loudly: text that does not match
//! the whole grammar yields `None`.

pub mod grammar;
pub mod lexer;

pub use grammar::{
    DecimalDegreesGrammar, DefaultGrammar, DegMinGrammar, DegMinSecGrammar, Grammar, MgrsGrammar,
    UtmGrammar,
};

use tracing::trace;

use crate::types::{DisplayFormat, GeoPoint};

/// Returns the grammar that reads `format`
pub fn grammar_for(format: DisplayFormat) -> &'static dyn Grammar {
    match format {
        DisplayFormat::Default => &DefaultGrammar,
        DisplayFormat::DecimalDegrees => &DecimalDegreesGrammar,
        DisplayFormat::DegMin => &DegMinGrammar,
        DisplayFormat::DegMinSec => &DegMinSecGrammar,
        DisplayFormat::Utm => &UtmGrammar,
        DisplayFormat::Mgrs => &MgrsGrammar,
    }
}

/// Parses `text` written in `format`
///
/// Default text is returned in the display system as written. Every other
/// format is returned as WGS84 longitude/latitude.
pub fn parse(text: &str, format: DisplayFormat) -> Option<GeoPoint> {
    let grammar = grammar_for(format);
    let result = grammar.parse(text);
    trace!(format = %grammar.format(), text, matched = result.is_some(), "Parse attempt");
    result
}
