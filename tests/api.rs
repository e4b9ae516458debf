use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use coordkit::api::create_router;
use coordkit::api::models::{FormatResponse, ParseResponse};
use coordkit::{DisplayFormat, Settings};

fn app() -> Router {
    create_router(Arc::new(Settings::default()))
}

async fn get(uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_format_endpoint() {
    let (status, json) = get("/api/format?x=7.4474&y=46.948&format=mgrs").await;
    assert_eq!(status, StatusCode::OK);

    let response: FormatResponse = serde_json::from_value(json).unwrap();
    assert_eq!(response.text, "32TLT 81849 00555");
    assert_eq!(response.format, DisplayFormat::Mgrs);
    assert_eq!(response.display_crs, "EPSG:4326");
}

#[tokio::test]
async fn test_format_endpoint_uses_configured_format() {
    let (status, json) = get("/api/format?x=7.44744&y=46.94809").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["text"], "7.4474, 46.9481");
    assert_eq!(json["format"], "default");
}

#[tokio::test]
async fn test_format_endpoint_rejects_unknown_format() {
    let (status, _) = get("/api/format?x=1&y=2&format=bogus").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_parse_endpoint() {
    let (status, json) = get("/api/parse?text=32TLT%2081849%2000555&format=mgrs").await;
    assert_eq!(status, StatusCode::OK);

    let response: ParseResponse = serde_json::from_value(json).unwrap();
    assert!(response.valid);
    assert!((response.x.unwrap() - 7.4474).abs() < 1e-4);
    assert!((response.y.unwrap() - 46.948).abs() < 1e-4);
    assert_eq!(response.crs, "EPSG:4326");
}

#[tokio::test]
async fn test_parse_endpoint_reports_invalid_text() {
    let (status, json) = get("/api/parse?text=nowhere&format=utm").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["valid"], false);
    assert!(json["x"].is_null());
}

#[tokio::test]
async fn test_height_endpoint_without_heightmap() {
    let (status, json) = get("/api/height?x=7.5&y=46.2").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "No heightmap is defined in the project.");
}

#[tokio::test]
async fn test_search_endpoint() {
    let (status, json) = get("/api/search?q=7.5%2C%2046.2").await;
    assert_eq!(status, StatusCode::OK);

    let results = json.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["category"], "Coordinates");
    assert_eq!(results[0]["format"], "decimal-degrees");
}

#[tokio::test]
async fn test_batch_format_endpoint() {
    let body = concat!(
        "--BOUNDARY\r\n",
        "Content-Disposition: form-data; name=\"csv\"; filename=\"points.csv\"\r\n",
        "Content-Type: text/csv\r\n",
        "\r\n",
        "x,y,name\n7.4474,46.948,bern\n",
        "\r\n--BOUNDARY\r\n",
        "Content-Disposition: form-data; name=\"format\"\r\n",
        "\r\n",
        "mgrs",
        "\r\n--BOUNDARY--\r\n",
    );
    let request = Request::builder()
        .method("POST")
        .uri("/api/batch/format")
        .header(header::CONTENT_TYPE, "multipart/form-data; boundary=BOUNDARY")
        .body(Body::from(body))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(
        String::from_utf8(bytes.to_vec()).unwrap(),
        "x,y,name,text\n7.4474,46.948,bern,32TLT 81849 00555\n"
    );
}

#[tokio::test]
async fn test_batch_format_requires_csv() {
    let body = "--BOUNDARY\r\nContent-Disposition: form-data; name=\"format\"\r\n\r\nmgrs\r\n--BOUNDARY--\r\n";
    let request = Request::builder()
        .method("POST")
        .uri("/api/batch/format")
        .header(header::CONTENT_TYPE, "multipart/form-data; boundary=BOUNDARY")
        .body(Body::from(body))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
