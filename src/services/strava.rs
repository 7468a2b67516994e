// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for fetching activities and their GPS streams.
//!
//! Handles:
//! - Paginated activity listing
//! - Coordinate stream fetching
//! - Activity detail and split retrieval
//! - Token refresh when expired, with optional persistence

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::stream::{StreamSetMap, LATLNG_KEY};
use crate::models::{ActivityDetail, ActivitySummary, CoordinateStream, Credential, SplitRow};
use crate::services::classify::{ResponseClass, ResponseClassifier};
use crate::services::credentials::CredentialStore;
use chrono::Utc;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// Strava API client.
///
/// Stateless apart from the HTTP connection pool: every call takes the
/// access token it should use.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
    token_url: String,
    client_id: String,
    client_secret: String,
    classifier: ResponseClassifier,
}

impl StravaClient {
    /// Create a client from the endpoint, transport and status settings in `config`.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .danger_accept_invalid_certs(!config.verify_tls);

        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy.as_str())
                .map_err(|e| AppError::BadRequest(format!("Invalid proxy {}: {}", proxy, e)))?;
            builder = builder.proxy(proxy);
        }
        if !config.verify_tls {
            tracing::warn!("TLS certificate verification disabled");
        }

        let http = builder.build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token_url: config.token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            classifier: ResponseClassifier::new(
                config.success_codes.clone(),
                config.error_codes.clone(),
            ),
        })
    }

    /// List one page of the athlete's activities (pages start at 1).
    pub async fn list_activities(
        &self,
        access_token: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<ActivitySummary>> {
        let url = format!("{}/athlete/activities", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[
                ("page", page.to_string()),
                ("per_page", per_page.to_string()),
            ])
            .send()
            .await?;

        self.check_response_json(response, "activity page").await
    }

    /// Get a detailed activity by ID.
    pub async fn get_activity(
        &self,
        access_token: &str,
        activity_id: u64,
    ) -> Result<ActivityDetail> {
        let url = format!("{}/activities/{}", self.base_url, activity_id);
        self.get_json(&url, access_token, "activity detail").await
    }

    /// Get the latitude/longitude stream of an activity, keyed by stream type.
    pub async fn get_activity_streams(
        &self,
        access_token: &str,
        activity_id: u64,
    ) -> Result<StreamSetMap> {
        let url = format!("{}/activities/{}/streams", self.base_url, activity_id);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[("keys", LATLNG_KEY), ("key_by_type", "true")])
            .send()
            .await?;

        self.check_response_json(response, "activity stream").await
    }

    /// Exchange a refresh token for a new credential.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<Credential> {
        self.token_request(&[
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ])
        .await
    }

    /// Exchange a one-time authorization code for the first credential.
    pub async fn exchange_code(&self, code: &str) -> Result<Credential> {
        self.token_request(&[
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
        ])
        .await
    }

    /// POST to the token endpoint. Any rejection becomes an auth error.
    async fn token_request(&self, form: &[(&str, &str)]) -> Result<Credential> {
        let response = self.http.post(&self.token_url).form(form).send().await?;

        let body = self.check_response(response).await.map_err(|e| {
            if e.is_status_error() {
                tracing::error!(error = %e, "Strava token request rejected");
                AppError::Auth(e.to_string())
            } else {
                e
            }
        })?;

        Credential::from_token_response(&body)
            .map_err(|e| AppError::Parse(format!("token response: {}", e)))
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        access_token: &str,
        what: &str,
    ) -> Result<T> {
        let response = self.http.get(url).bearer_auth(access_token).send().await?;
        self.check_response_json(response, what).await
    }

    /// Classify the response and return its body if the status is a success.
    async fn check_response(&self, response: reqwest::Response) -> Result<String> {
        let status = response.status();
        let url = response.url().to_string();
        let class = self.classifier.classify(status.as_u16(), &url);
        let body = response.text().await?;

        if status.is_success() {
            return Ok(body);
        }

        if status.as_u16() == 404 {
            return Err(AppError::NotFound(url));
        }

        if status.as_u16() == 429 {
            tracing::warn!("Strava rate limit hit (429)");
        }

        match class {
            ResponseClass::Unclassified => Err(AppError::Unclassified {
                status: status.as_u16(),
                url,
                body,
            }),
            _ => Err(AppError::StravaApi {
                status: status.as_u16(),
                body,
            }),
        }
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        what: &str,
    ) -> Result<T> {
        let body = self.check_response(response).await?;
        serde_json::from_str(&body).map_err(|e| AppError::Parse(format!("{}: {}", what, e)))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// StravaService - High-level service with token management
// ─────────────────────────────────────────────────────────────────────────────

/// High-level Strava service that owns the credential and issues calls.
///
/// This service encapsulates:
/// - The in-memory credential, replaced wholesale on every refresh
/// - Optional persistence of refreshed credentials
/// - Sequential pagination over the activity list
/// - Stream, detail and split retrieval
///
/// Requests are strictly one at a time; methods that may refresh the
/// credential take `&mut self`.
pub struct StravaService {
    client: StravaClient,
    credential: Option<Credential>,
    store: Option<CredentialStore>,
    split_columns: HashMap<String, Vec<String>>,
}

impl StravaService {
    /// Create a service with no credential yet (first-time setup).
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: StravaClient::new(config)?,
            credential: None,
            store: None,
            split_columns: config.split_columns.clone(),
        })
    }

    /// Create a service from the credential stored in `store`.
    ///
    /// Refreshed credentials are written back to the same store.
    pub fn from_store(config: &Config, store: CredentialStore) -> Result<Self> {
        let credential = store.load()?;
        tracing::info!(path = %store.path().display(), "Loaded Strava credentials");
        Ok(Self::new(config)?
            .with_credential(credential)
            .with_store(store))
    }

    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Persist every refreshed or exchanged credential to `store`.
    pub fn with_store(mut self, store: CredentialStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    // ─── Token Management ────────────────────────────────────────────────────

    /// Return `credential` unchanged while it is valid, otherwise refresh it.
    ///
    /// A valid credential costs no network call. An expired one is
    /// exchanged once at the token endpoint; the replacement becomes the
    /// held credential even if persisting it then fails. A rejected refresh
    /// is an auth error and leaves the held credential untouched.
    pub async fn ensure_valid(&mut self, credential: Credential) -> Result<Credential> {
        if credential.is_valid_at(Utc::now()) {
            return Ok(credential);
        }

        tracing::info!(
            expires_at = credential.expires_at,
            "Access token expired, refreshing"
        );

        let refreshed = self.client.refresh_token(&credential.refresh_token).await?;
        self.credential = Some(refreshed.clone());
        tracing::info!(expires_at = refreshed.expires_at, "Token refreshed");

        if let Some(store) = &self.store {
            store.save(&refreshed)?;
        }

        Ok(refreshed)
    }

    /// Get a valid access token, refreshing the held credential if needed.
    async fn access_token(&mut self) -> Result<String> {
        let current = self.credential.clone().ok_or_else(|| {
            AppError::Auth("No credentials loaded, run the authorization flow first".to_string())
        })?;

        let valid = self.ensure_valid(current).await?;
        Ok(valid.access_token)
    }

    /// Exchange an authorization code for the initial credential and install it.
    pub async fn exchange_code(&mut self, code: &str) -> Result<Credential> {
        let credential = self.client.exchange_code(code).await?;
        self.credential = Some(credential.clone());

        if let Some(store) = &self.store {
            store.save(&credential)?;
        }

        tracing::info!(
            expires_at = credential.expires_at,
            "Initial Strava credentials obtained"
        );
        Ok(credential)
    }

    // ─── API Wrappers ────────────────────────────────────────────────────────

    /// Fetch every activity, page by page, until an empty page comes back.
    ///
    /// A page rejected with a non-success status ends the loop and the
    /// activities gathered so far are returned. Network and auth failures
    /// propagate.
    pub async fn fetch_all_activities(&mut self, per_page: u32) -> Result<Vec<ActivitySummary>> {
        if per_page == 0 {
            return Err(AppError::BadRequest("per_page must be at least 1".to_string()));
        }

        let mut activities = Vec::new();
        let mut page = 1;

        loop {
            let access_token = self.access_token().await?;
            tracing::debug!(page, per_page, "Requesting activity page");

            match self
                .client
                .list_activities(&access_token, page, per_page)
                .await
            {
                Ok(items) if items.is_empty() => break,
                Ok(items) => {
                    activities.extend(items);
                    page += 1;
                }
                Err(e) if e.is_status_error() => {
                    tracing::warn!(
                        page,
                        error = %e,
                        "Activity page rejected, keeping partial results"
                    );
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(count = activities.len(), pages = page, "Fetched activities");
        Ok(activities)
    }

    /// Fetch the coordinate stream of one activity.
    pub async fn fetch_stream(&mut self, activity_id: u64) -> Result<CoordinateStream> {
        let access_token = self.access_token().await?;
        let streams = self
            .client
            .get_activity_streams(&access_token, activity_id)
            .await?;

        let stream = CoordinateStream::from_stream_sets(activity_id, &streams)
            .map_err(|e| AppError::Parse(format!("stream for activity {}: {}", activity_id, e)))?;

        tracing::debug!(activity_id, points = stream.points.len(), "Fetched stream");
        Ok(stream)
    }

    /// Get a detailed activity by ID.
    pub async fn get_activity(&mut self, activity_id: u64) -> Result<ActivityDetail> {
        let access_token = self.access_token().await?;
        self.client.get_activity(&access_token, activity_id).await
    }

    /// Collect the metric splits of every activity of `activity_type`.
    ///
    /// The type must have a split column list configured.
    pub async fn get_activity_splits(
        &mut self,
        activity_type: &str,
        activities: &[ActivitySummary],
    ) -> Result<Vec<SplitRow>> {
        if !self.split_columns.contains_key(activity_type) {
            return Err(AppError::BadRequest(format!(
                "No split columns configured for activity type {}",
                activity_type
            )));
        }

        let mut rows = Vec::new();
        for activity in activities
            .iter()
            .filter(|a| a.activity_type == activity_type)
        {
            let detail = self.get_activity(activity.id).await?;
            rows.extend(detail.splits_metric.into_iter().map(|split| SplitRow {
                split,
                id: detail.id,
                date: detail.start_date.clone(),
            }));
        }

        tracing::info!(activity_type, splits = rows.len(), "Collected activity splits");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds_with_proxy_and_tls_override() {
        let config = Config {
            proxy: Some("http://127.0.0.1:3128".to_string()),
            verify_tls: false,
            ..Config::default()
        };
        assert!(StravaClient::new(&config).is_ok());
    }

    #[test]
    fn test_malformed_proxy_is_rejected() {
        let config = Config {
            proxy: Some("http://[::1".to_string()),
            ..Config::default()
        };
        assert!(matches!(
            StravaClient::new(&config),
            Err(AppError::BadRequest(_))
        ));
    }
}
