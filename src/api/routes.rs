use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers::*;
use crate::settings::Settings;

pub fn create_router(settings: Arc<Settings>) -> Router {
    Router::new()
        .route("/api/format", get(format_coordinate))
        .route("/api/parse", get(parse_coordinate))
        .route("/api/height", get(height))
        .route("/api/search", get(search))
        .route("/api/batch/format", post(batch_format))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(100 * 1024 * 1024)) // 100MB limit
                .layer(CorsLayer::permissive()),
        )
        .with_state(settings)
}
