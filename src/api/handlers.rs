use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{multipart::Multipart, Query, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use tracing::info;

use super::models::*;
use crate::batch;
use crate::codec::CoordinateCodec;
use crate::projection::ReferenceSystem;
use crate::search::{CoordinateSearch, SearchResult};
use crate::settings::Settings;
use crate::types::{DisplayFormat, GeoPoint};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse { error: message.into() }))
}

/// Reads an optional reference system parameter
fn reference_system(auth_id: Option<&str>, default: &ReferenceSystem) -> Result<ReferenceSystem, ApiError> {
    match auth_id {
        Some(id) => ReferenceSystem::from_auth_id(id).map_err(|e| error(StatusCode::BAD_REQUEST, e.to_string())),
        None => Ok(default.clone()),
    }
}

pub async fn format_coordinate(
    State(settings): State<Arc<Settings>>,
    Query(req): Query<FormatRequest>,
) -> Result<Json<FormatResponse>, ApiError> {
    let codec = CoordinateCodec::from_settings(&settings);
    let source = reference_system(req.crs.as_deref(), &ReferenceSystem::wgs84())?;
    let display = reference_system(req.display_crs.as_deref(), codec.display().reference_system())?;
    let format = req.format.unwrap_or(codec.display().format());

    let text = codec
        .format_with(GeoPoint::new(req.x, req.y), &source, format, &display)
        .map_err(|e| error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;

    Ok(Json(FormatResponse {
        text,
        format,
        display_crs: display.to_string(),
    }))
}

pub async fn parse_coordinate(
    State(settings): State<Arc<Settings>>,
    Query(req): Query<ParseRequest>,
) -> Result<Json<ParseResponse>, ApiError> {
    let codec = CoordinateCodec::from_settings(&settings);
    let format = req.format.unwrap_or(codec.display().format());
    let target = reference_system(req.target_crs.as_deref(), &codec.native_system(format))?;

    let point = codec
        .parse_into(&req.text, format, &target)
        .map_err(|e| error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;

    Ok(Json(ParseResponse {
        valid: point.is_some(),
        x: point.map(|p| p.x),
        y: point.map(|p| p.y),
        crs: target.to_string(),
    }))
}

pub async fn height(
    State(settings): State<Arc<Settings>>,
    Query(req): Query<HeightRequest>,
) -> Result<Json<HeightResponse>, ApiError> {
    let mut codec = CoordinateCodec::from_settings(&settings);
    let rs = reference_system(req.crs.as_deref(), &ReferenceSystem::wgs84())?;
    if let Some(unit) = req.unit {
        codec.display_mut().set_height_unit(unit);
    }

    let height = codec
        .height_at(GeoPoint::new(req.x, req.y), &rs)
        .map_err(|e| error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;

    Ok(Json(HeightResponse {
        height,
        unit: codec.display().height_unit(),
    }))
}

pub async fn search(
    State(settings): State<Arc<Settings>>,
    Query(req): Query<SearchRequest>,
) -> Json<Vec<SearchResult>> {
    let search = CoordinateSearch::new(settings.display.reference_system.clone());
    Json(search.search(&req.q))
}

/// Formats an uploaded `x,y[,name]` CSV
///
/// Multipart fields: `csv` (required), `format`, `crs` and `display_crs`.
pub async fn batch_format(
    State(settings): State<Arc<Settings>>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let start = Instant::now();

    let mut csv_data: Option<Vec<u8>> = None;
    let mut format: Option<String> = None;
    let mut crs: Option<String> = None;
    let mut display_crs: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| error(StatusCode::BAD_REQUEST, e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        let read_failed = |e: axum::extract::multipart::MultipartError| error(StatusCode::BAD_REQUEST, e.to_string());

        match name.as_str() {
            "csv" => csv_data = Some(field.bytes().await.map_err(read_failed)?.to_vec()),
            "format" => format = Some(field.text().await.map_err(read_failed)?),
            "crs" => crs = Some(field.text().await.map_err(read_failed)?),
            "display_crs" => display_crs = Some(field.text().await.map_err(read_failed)?),
            _ => {}
        }
    }

    let csv_data = csv_data.ok_or_else(|| error(StatusCode::BAD_REQUEST, "Missing CSV file"))?;

    let codec = CoordinateCodec::from_settings(&settings);
    let format = match format {
        Some(name) => name
            .trim()
            .parse::<DisplayFormat>()
            .map_err(|e| error(StatusCode::BAD_REQUEST, e))?,
        None => codec.display().format(),
    };
    let source = reference_system(crs.as_deref(), &ReferenceSystem::wgs84())?;
    let display = reference_system(display_crs.as_deref(), codec.display().reference_system())?;

    let mut output = Vec::with_capacity(csv_data.len() * 2);
    let summary = batch::format_csv(&codec, csv_data.as_slice(), &mut output, &source, format, &display)
        .map_err(|e| error(StatusCode::INTERNAL_SERVER_ERROR, format!("Failed to process CSV: {}", e)))?;

    info!(
        total = summary.total,
        failed = summary.failed,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Batch format request"
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime::TEXT_CSV.as_ref())
        .header(header::CONTENT_DISPOSITION, "attachment; filename=\"coordinates.csv\"")
        .body(Body::from(output))
        .map_err(|e| error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}
