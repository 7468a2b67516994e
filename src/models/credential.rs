// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth token pair as returned by the provider and persisted to disk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Provider field carrying the athlete profile; never persisted.
const ATHLETE_FIELD: &str = "athlete";

/// Access/refresh token pair with its expiry.
///
/// `expires_at` is mandatory: a payload without it fails to deserialize.
/// Any other provider fields (`token_type`, `expires_in`, ...) are carried
/// through untouched in `extra` so the file on disk mirrors the provider's
/// response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp (seconds)
    pub expires_at: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Credential {
    /// Parse a token endpoint response, dropping the nested athlete profile.
    pub fn from_token_response(body: &str) -> Result<Self, serde_json::Error> {
        let mut credential: Credential = serde_json::from_str(body)?;
        credential.extra.remove(ATHLETE_FIELD);
        Ok(credential)
    }

    /// Serialize for persistence.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a persisted credential.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Valid only while the expiry lies strictly in the future.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now.timestamp()
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_valid_at(now)
    }

    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.expires_at, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN_RESPONSE: &str = r#"{
        "token_type": "Bearer",
        "expires_at": 1700000000,
        "expires_in": 21600,
        "refresh_token": "refresh-abc",
        "access_token": "access-xyz",
        "athlete": {"id": 42, "firstname": "Ada"}
    }"#;

    #[test]
    fn test_token_response_drops_athlete() {
        let credential = Credential::from_token_response(TOKEN_RESPONSE).unwrap();
        assert_eq!(credential.access_token, "access-xyz");
        assert_eq!(credential.refresh_token, "refresh-abc");
        assert_eq!(credential.expires_at, 1_700_000_000);
        assert!(!credential.extra.contains_key("athlete"));
        assert_eq!(credential.extra["token_type"], "Bearer");
    }

    #[test]
    fn test_missing_expires_at_is_an_error() {
        let json = r#"{"access_token": "a", "refresh_token": "r"}"#;
        assert!(Credential::from_json(json).is_err());
    }

    #[test]
    fn test_exact_expiry_counts_as_expired() {
        let credential = Credential {
            access_token: "a".into(),
            refresh_token: "r".into(),
            expires_at: 1_700_000_000,
            extra: Map::new(),
        };
        let at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let before = DateTime::from_timestamp(1_699_999_999, 0).unwrap();

        assert!(credential.is_expired_at(at));
        assert!(credential.is_valid_at(before));
    }
}
