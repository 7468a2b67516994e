// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client configuration loaded from environment variables.
//!
//! Every field has a usable default except the OAuth client credentials,
//! which must come from the environment (or a `.env` file).

use crate::models::BoundingBox;
use std::collections::{BTreeMap, HashMap};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- OAuth application ---
    /// Strava OAuth client ID (public)
    pub client_id: String,
    /// Strava OAuth client secret
    pub client_secret: String,
    /// Redirect URI registered with the application
    pub redirect_uri: String,

    // --- Endpoints ---
    /// REST API base, without a trailing slash
    pub base_url: String,
    /// Browser authorization page
    pub oauth_url: String,
    /// Token endpoint for code exchange and refresh
    pub token_url: String,
    /// Timeout applied to every request
    pub request_timeout: Duration,
    /// Proxy for every request (`http://` or `https://` URL)
    pub proxy: Option<String>,
    /// Verify the provider's TLS certificate
    pub verify_tls: bool,

    // --- Status classification ---
    /// Status codes treated as success, with their log message
    pub success_codes: BTreeMap<u16, String>,
    /// Status codes treated as known errors, with their log message
    pub error_codes: BTreeMap<u16, String>,

    // --- Data shaping ---
    /// Activity type to display color
    pub color_map: HashMap<String, String>,
    /// Activity type to the split columns exported for it
    pub split_columns: HashMap<String, Vec<String>>,
    /// Default area for the heatmap overlay
    pub bounding_box: BoundingBox,

    // --- Storage ---
    /// Root folder for credentials and exported files
    pub data_dir: PathBuf,
    /// Credential file name inside `data_dir`
    pub credential_file_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: "http://localhost".to_string(),
            base_url: "https://www.strava.com/api/v3".to_string(),
            oauth_url: "https://www.strava.com/oauth/authorize".to_string(),
            token_url: "https://www.strava.com/oauth/token".to_string(),
            request_timeout: Duration::from_secs(90),
            proxy: None,
            verify_tls: true,
            success_codes: BTreeMap::from([(200, "URL successfully retrieved".to_string())]),
            error_codes: BTreeMap::from([
                (400, "Bad request".to_string()),
                (401, "Unauthorized".to_string()),
                (404, "Not found".to_string()),
                (429, "Rate limit exceeded".to_string()),
            ]),
            color_map: default_color_map(),
            split_columns: default_split_columns(),
            bounding_box: BoundingBox {
                latitude_top_right: Some(54.5),
                longitude_top_right: Some(10.3),
                latitude_top_left: Some(54.5),
                longitude_top_left: Some(10.0),
                latitude_bottom_left: Some(54.2),
                longitude_bottom_left: Some(10.0),
                latitude_bottom_right: Some(54.2),
                longitude_bottom_right: Some(10.3),
            },
            data_dir: PathBuf::from("strava_data"),
            credential_file_name: "credentials.json".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `STRAVA_CLIENT_ID` and `STRAVA_CLIENT_SECRET` are required; everything
    /// else falls back to [`Config::default`].
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let defaults = Self::default();

        let request_timeout = match env::var("STRAVA_REQUEST_TIMEOUT_SECS") {
            Ok(v) => Duration::from_secs(
                v.trim()
                    .parse()
                    .map_err(|_| ConfigError::Invalid("STRAVA_REQUEST_TIMEOUT_SECS", v))?,
            ),
            Err(_) => defaults.request_timeout,
        };

        let verify_tls = match env::var("STRAVA_VERIFY_TLS") {
            Ok(v) => v
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("STRAVA_VERIFY_TLS", v))?,
            Err(_) => defaults.verify_tls,
        };

        Ok(Self {
            client_id: env::var("STRAVA_CLIENT_ID")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_ID"))?,
            client_secret: env::var("STRAVA_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_SECRET"))?,
            redirect_uri: env::var("STRAVA_REDIRECT_URI").unwrap_or(defaults.redirect_uri),
            base_url: env::var("STRAVA_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            oauth_url: env::var("STRAVA_OAUTH_URL").unwrap_or(defaults.oauth_url),
            token_url: env::var("STRAVA_TOKEN_URL").unwrap_or(defaults.token_url),
            request_timeout,
            proxy: env::var("STRAVA_PROXY")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            verify_tls,
            data_dir: env::var("STRAVA_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            credential_file_name: env::var("STRAVA_CREDENTIAL_FILE")
                .unwrap_or(defaults.credential_file_name),
            ..defaults
        })
    }

    /// Config pointed at a mock provider, for tests.
    pub fn for_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            client_id: "test_client_id".to_string(),
            client_secret: "test_secret".to_string(),
            base_url: format!("{}/api/v3", base),
            oauth_url: format!("{}/oauth/authorize", base),
            token_url: format!("{}/oauth/token", base),
            request_timeout: Duration::from_secs(5),
            ..Self::default()
        }
    }

    /// Folder holding one GeoJSON route file per activity.
    pub fn route_dir(&self) -> PathBuf {
        self.data_dir.join("activity_routes")
    }

    /// Folder holding one `lat,lon` CSV file per activity.
    pub fn stream_csv_dir(&self) -> PathBuf {
        self.data_dir.join("activity_csv")
    }
}

fn default_color_map() -> HashMap<String, String> {
    [
        ("Run", "#FF4500"),
        ("Ride", "#1E90FF"),
        ("Swim", "#00CED1"),
        ("Walk", "#32CD32"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn default_split_columns() -> HashMap<String, Vec<String>> {
    let run = [
        "average_speed",
        "distance",
        "elapsed_time",
        "elevation_difference",
        "moving_time",
        "pace_zone",
        "split",
        "id",
        "date",
    ]
    .into_iter()
    .map(String::from)
    .collect();

    let mut columns = HashMap::from([("Run".to_string(), run)]);
    for activity_type in ["Walk", "Ride", "Rowing", "Swim", "Workout", "Elliptical"] {
        columns.insert(activity_type.to_string(), Vec::new());
    }
    columns
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
