// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Stream, detail and split retrieval tests.

use serde_json::json;
use strava_routes::error::AppError;
use strava_routes::models::LatLng;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

fn latlng_stream_body() -> serde_json::Value {
    json!({
        "latlng": {
            "data": [[54.3201, 10.1221], [54.3205, 10.1230], [54.3210, 10.1242]],
            "series_type": "distance",
            "original_size": 3,
            "resolution": "high"
        },
        "distance": {
            "data": [0.0, 70.4, 160.2],
            "series_type": "distance",
            "original_size": 3,
            "resolution": "high"
        }
    })
}

#[tokio::test]
async fn test_fetch_stream_unpacks_latlng() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/activities/42/streams"))
        .and(query_param("keys", "latlng"))
        .and(query_param("key_by_type", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(latlng_stream_body()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = common::test_config(&server, dir.path());
    let mut service = common::service_with_valid_token(&config);

    let stream = service.fetch_stream(42).await.unwrap();

    assert_eq!(stream.activity_id, 42);
    assert_eq!(stream.points.len(), 3);
    assert_eq!(
        stream.points[0],
        LatLng {
            lat: 54.3201,
            lon: 10.1221
        }
    );
    server.verify().await;
}

#[tokio::test]
async fn test_fetch_stream_without_gps_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/activities/43/streams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "distance": {"data": [0.0, 10.0], "series_type": "distance"}
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = common::test_config(&server, dir.path());
    let mut service = common::service_with_valid_token(&config);

    assert!(service.fetch_stream(43).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_fetch_stream_unknown_activity_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/activities/999/streams"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Record Not Found",
            "errors": [{"resource": "Activity", "field": "id", "code": "invalid"}]
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = common::test_config(&server, dir.path());
    let mut service = common::service_with_valid_token(&config);

    assert!(matches!(
        service.fetch_stream(999).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_unclassified_status_exposes_raw_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/activities/5/streams"))
        .respond_with(ResponseTemplate::new(418).set_body_string("short and stout"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = common::test_config(&server, dir.path());
    let mut service = common::service_with_valid_token(&config);

    let err = service.fetch_stream(5).await.unwrap_err();
    assert!(matches!(err, AppError::Unclassified { status: 418, .. }));
    assert_eq!(err.response_body(), Some("short and stout"));
}

#[tokio::test]
async fn test_activity_splits_for_configured_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/activities/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "name": "Morning Run",
            "type": "Run",
            "start_date": "2023-05-01T06:15:00Z",
            "splits_metric": [
                {"distance": 1000.2, "elapsed_time": 330, "elevation_difference": 1.2,
                 "moving_time": 325, "split": 1, "average_speed": 3.08, "pace_zone": 2},
                {"distance": 1001.0, "elapsed_time": 320, "elevation_difference": -0.4,
                 "moving_time": 318, "split": 2, "average_speed": 3.15, "pace_zone": 2}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = common::test_config(&server, dir.path());
    let mut service = common::service_with_valid_token(&config);
    let activities = vec![
        common::activity(1, "Run", "Morning Run", "2023-05-01T08:15:00Z"),
        common::activity(2, "Ride", "Commute", "2023-05-02T08:15:00Z"),
    ];

    let rows = service.get_activity_splits("Run", &activities).await.unwrap();

    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.id == 1));
    assert_eq!(rows[1].split.split, 2);
    assert_eq!(rows[0].date, "2023-05-01T06:15:00Z");
    server.verify().await;
}

#[tokio::test]
async fn test_activity_splits_unconfigured_type_is_rejected() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = common::test_config(&server, dir.path());
    let mut service = common::service_with_valid_token(&config);

    let result = service.get_activity_splits("Kitesurf", &[]).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
}
