// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use serde_json::{json, Value};
use strava_routes::config::Config;
use strava_routes::models::{ActivitySummary, CoordinateRow, Credential};
use strava_routes::services::StravaService;
use wiremock::MockServer;

/// Config with every endpoint pointed at `server` and storage under `data_dir`.
#[allow(dead_code)]
pub fn test_config(server: &MockServer, data_dir: &std::path::Path) -> Config {
    Config {
        data_dir: data_dir.to_path_buf(),
        ..Config::for_base_url(&server.uri())
    }
}

/// Credential expiring `offset_secs` from now (negative for expired).
#[allow(dead_code)]
pub fn credential_expiring_in(offset_secs: i64) -> Credential {
    Credential {
        access_token: "stored_access".to_string(),
        refresh_token: "stored_refresh".to_string(),
        expires_at: chrono::Utc::now().timestamp() + offset_secs,
        extra: serde_json::Map::from_iter([("token_type".to_string(), json!("Bearer"))]),
    }
}

/// Service holding a credential that stays valid for the whole test.
#[allow(dead_code)]
pub fn service_with_valid_token(config: &Config) -> StravaService {
    StravaService::new(config)
        .expect("client should build")
        .with_credential(credential_expiring_in(3600))
}

/// Token endpoint body as sent by Strava.
#[allow(dead_code)]
pub fn token_response(access: &str, refresh: &str, expires_at: i64) -> Value {
    json!({
        "token_type": "Bearer",
        "access_token": access,
        "refresh_token": refresh,
        "expires_at": expires_at,
        "expires_in": 21600,
        "athlete": {"id": 134815, "firstname": "Ada", "lastname": "Lovelace"}
    })
}

/// Activity list entry as sent by Strava.
#[allow(dead_code)]
pub fn activity_json(id: u64) -> Value {
    json!({
        "id": id,
        "name": format!("Activity {}", id),
        "start_date_local": "2023-05-01T08:15:00Z",
        "type": "Run",
        "sport_type": "Run",
        "distance": 5000.0,
        "moving_time": 1500,
        "elapsed_time": 1600,
        "total_elevation_gain": 25.0,
        "end_latlng": [54.32, 10.12],
        "external_id": format!("upload_{}.fit", id)
    })
}

#[allow(dead_code)]
pub fn activity(
    id: u64,
    activity_type: &str,
    name: &str,
    start_date_local: &str,
) -> ActivitySummary {
    ActivitySummary {
        id,
        name: name.to_string(),
        start_date_local: start_date_local.to_string(),
        activity_type: activity_type.to_string(),
        distance: 1000.0,
        moving_time: 300,
        elapsed_time: 320,
        total_elevation_gain: 10.0,
        end_latlng: None,
        external_id: None,
    }
}

#[allow(dead_code)]
pub fn coordinate(activity_id: u64, activity_type: &str, lat: f64, lon: f64) -> CoordinateRow {
    CoordinateRow {
        lat,
        lon,
        activity_id,
        activity_type: activity_type.to_string(),
        color: None,
    }
}
