//! CSV batch formatting and parsing

use std::io::{Read, Write};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::codec::CoordinateCodec;
use crate::error::Result;
use crate::parse::parse;
use crate::projection::ReferenceSystem;
use crate::types::{DisplayFormat, GeoPoint};

/// Input row of a format batch
#[derive(Debug, Deserialize)]
pub struct PointRow {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
struct FormattedRow<'a> {
    x: f64,
    y: f64,
    name: &'a str,
    text: String,
}

/// Input row of a parse batch
#[derive(Debug, Deserialize)]
pub struct TextRow {
    pub text: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
struct ParsedRow<'a> {
    text: &'a str,
    name: &'a str,
    x: Option<f64>,
    y: Option<f64>,
    valid: bool,
}

/// Row counts of a finished batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    /// Rows that could not be read, formatted or parsed
    pub failed: usize,
}

/// Formats every `x,y[,name]` row of `input` and writes `x,y,name,text`
///
/// Rows that cannot be read are skipped. Rows whose transform fails are
/// written with empty text.
pub fn format_csv<R: Read, W: Write>(
    codec: &CoordinateCodec,
    input: R,
    output: W,
    source: &ReferenceSystem,
    format: DisplayFormat,
    display: &ReferenceSystem,
) -> Result<BatchSummary> {
    let mut reader = csv::Reader::from_reader(input);
    let mut writer = csv::Writer::from_writer(output);
    let mut summary = BatchSummary::default();

    for (line, record) in reader.deserialize::<PointRow>().enumerate() {
        summary.total += 1;
        let row = match record {
            Ok(row) => row,
            Err(e) => {
                warn!(line = line + 2, error = %e, "Skipping unreadable row");
                summary.failed += 1;
                continue;
            }
        };

        let text = match codec.format_with(GeoPoint::new(row.x, row.y), source, format, display) {
            Ok(text) => {
                summary.successful += 1;
                text
            }
            Err(e) => {
                warn!(line = line + 2, error = %e, "Failed to format row");
                summary.failed += 1;
                String::new()
            }
        };

        writer.serialize(FormattedRow {
            x: row.x,
            y: row.y,
            name: row.name.as_deref().unwrap_or(""),
            text,
        })?;
    }

    writer.flush()?;
    info!(total = summary.total, failed = summary.failed, %format, "Formatted batch");
    Ok(summary)
}

/// Parses every `text[,name]` row of `input` and writes `text,name,x,y,valid`
///
/// Parsing runs on the rayon pool; output keeps the input order.
pub fn parse_csv<R: Read, W: Write>(input: R, output: W, format: DisplayFormat) -> Result<BatchSummary> {
    let mut reader = csv::Reader::from_reader(input);
    let mut rows = Vec::new();
    let mut summary = BatchSummary::default();

    for (line, record) in reader.deserialize::<TextRow>().enumerate() {
        summary.total += 1;
        match record {
            Ok(row) => rows.push(row),
            Err(e) => {
                warn!(line = line + 2, error = %e, "Skipping unreadable row");
                summary.failed += 1;
            }
        }
    }

    let points: Vec<Option<GeoPoint>> = rows.par_iter().map(|row| parse(&row.text, format)).collect();

    let mut writer = csv::Writer::from_writer(output);
    for (row, point) in rows.iter().zip(&points) {
        if point.is_some() {
            summary.successful += 1;
        } else {
            summary.failed += 1;
        }
        writer.serialize(ParsedRow {
            text: &row.text,
            name: row.name.as_deref().unwrap_or(""),
            x: point.map(|p| p.x),
            y: point.map(|p| p.y),
            valid: point.is_some(),
        })?;
    }

    writer.flush()?;
    info!(total = summary.total, failed = summary.failed, %format, "Parsed batch");
    Ok(summary)
}
