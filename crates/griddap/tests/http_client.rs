//! HTTP client tests against a local stand-in for a griddap server.

use std::net::SocketAddr;

use axum::{
    extract::{Path, RawQuery},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{TimeZone, Utc};
use serde_json::json;

use griddap::{GriddapEndpoint, GriddapError, GriddapSource, HttpGriddapClient, SliceRequest};
use wind_common::{LonRange, TimeExpr, WindColumns};

async fn dataset(Path(file): Path<String>, RawQuery(query): RawQuery) -> impl IntoResponse {
    let query = query.unwrap_or_default();

    match file.as_str() {
        "gfs.json" if query.starts_with("time") => Json(json!({
            "table": {
                "columnNames": ["time"],
                "columnTypes": ["String"],
                "rows": [["2024-01-15T06:00:00Z"]]
            }
        }))
        .into_response(),
        // Only the latest step is published
        "gfs.json" if query.contains("(last)") => Json(json!({
            "table": {
                "columnNames": ["time", "latitude", "longitude", "ugrd10m", "vgrd10m"],
                "rows": [
                    ["2024-01-15T06:00:00Z", 10.0, 0.0, 1.5, -2.5],
                    ["2024-01-15T06:00:00Z", 10.0, 0.5, 2.0, null]
                ]
            }
        }))
        .into_response(),
        "gfs.json" => (StatusCode::NOT_FOUND, "Error: time not available").into_response(),
        "reordered.json" => Json(json!({
            "table": {
                "columnNames": ["ugrd10m", "vgrd10m", "longitude", "latitude", "time"],
                "rows": [[4.0, 3.0, 359.5, -20.0, "2024-01-15T06:00:00Z"]]
            }
        }))
        .into_response(),
        "partial.json" => Json(json!({
            "table": {
                "columnNames": ["time", "latitude", "longitude", "ugrd10m"],
                "rows": [["2024-01-15T06:00:00Z", 10.0, 0.0, 1.5]]
            }
        }))
        .into_response(),
        "empty.json" => Json(json!({
            "table": {
                "columnNames": ["time", "latitude", "longitude", "ugrd10m", "vgrd10m"],
                "rows": []
            }
        }))
        .into_response(),
        "html.json" => (StatusCode::OK, "<html>maintenance</html>").into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn spawn_server() -> SocketAddr {
    let app = Router::new().route("/erddap/griddap/:file", get(dataset));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client(addr: SocketAddr, dataset: &str) -> HttpGriddapClient {
    let endpoint = GriddapEndpoint {
        base_url: format!("http://{}/erddap/griddap", addr),
        dataset: dataset.to_string(),
        columns: WindColumns::default(),
        latitude_descending: false,
    };
    HttpGriddapClient::new(endpoint, None).unwrap()
}

fn request(time: TimeExpr) -> SliceRequest {
    SliceRequest::new(10.0, 10.5, LonRange::new(0.0, 0.5), time)
}

#[tokio::test]
async fn test_fetch_latest_slice() {
    let addr = spawn_server().await;
    let slice = client(addr, "gfs")
        .fetch_slice(&request(TimeExpr::Latest))
        .await
        .unwrap();

    assert_eq!(slice.len(), 2);
    let first = slice.first_row().unwrap();
    assert_eq!((first.lat, first.lon), (10.0, 0.0));
    assert_eq!(first.u, Some(1.5));
    assert_eq!(slice.reference_time().as_deref(), Some("2024-01-15T06:00:00Z"));

    let rows: Vec<_> = slice.rows().flatten().collect();
    assert_eq!(rows[1].v, None);
}

#[tokio::test]
async fn test_unpublished_time_reports_status() {
    let addr = spawn_server().await;
    let time = TimeExpr::At(Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap());
    let err = client(addr, "gfs")
        .fetch_slice(&request(time))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_latest_time() {
    let addr = spawn_server().await;
    let latest = client(addr, "gfs").latest_time().await.unwrap();
    assert_eq!(latest, Utc.with_ymd_and_hms(2024, 1, 15, 6, 0, 0).unwrap());
}

#[tokio::test]
async fn test_columns_matched_by_name() {
    let addr = spawn_server().await;
    let slice = client(addr, "reordered")
        .fetch_slice(&request(TimeExpr::Latest))
        .await
        .unwrap();

    let row = slice.first_row().unwrap();
    assert_eq!(row.lat, -20.0);
    assert_eq!(row.lon, 359.5);
    assert_eq!(row.u, Some(4.0));
    assert_eq!(row.v, Some(3.0));
}

#[tokio::test]
async fn test_missing_column_is_schema_error() {
    let addr = spawn_server().await;
    let err = client(addr, "partial")
        .fetch_slice(&request(TimeExpr::Latest))
        .await
        .unwrap_err();

    assert!(matches!(err, GriddapError::Schema { ref column } if column == "vgrd10m"));
}

#[tokio::test]
async fn test_empty_table() {
    let addr = spawn_server().await;
    let err = client(addr, "empty")
        .fetch_slice(&request(TimeExpr::Latest))
        .await
        .unwrap_err();

    assert!(matches!(err, GriddapError::EmptyTable));
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let addr = spawn_server().await;
    let err = client(addr, "html")
        .fetch_slice(&request(TimeExpr::Latest))
        .await
        .unwrap_err();

    assert!(matches!(err, GriddapError::Malformed(_)));
}

#[tokio::test]
async fn test_unreachable_upstream_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(addr, "gfs")
        .fetch_slice(&request(TimeExpr::Latest))
        .await
        .unwrap_err();

    assert!(matches!(err, GriddapError::Transport(_)));
}
