// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! First-time authorization helpers.
//!
//! Only needed once per installation: open the authorization URL, approve
//! access, paste the redirect URL back, and exchange the code it carries
//! via [`StravaService::exchange_code`](crate::services::StravaService::exchange_code).

use crate::config::Config;
use crate::error::{AppError, Result};
use url::Url;

/// Scope needed to read private activities and their streams.
pub const READ_SCOPE: &str = "activity:read_all";

/// Build the browser authorization URL for this application.
pub fn authorization_url(config: &Config) -> Result<String> {
    let mut url = Url::parse(&config.oauth_url).map_err(|e| {
        AppError::BadRequest(format!("Invalid OAuth URL {}: {}", config.oauth_url, e))
    })?;
    url.query_pairs_mut()
        .append_pair("client_id", &config.client_id)
        .append_pair("redirect_uri", &config.redirect_uri)
        .append_pair("response_type", "code")
        .append_pair("scope", READ_SCOPE);

    Ok(url.into())
}

/// Extract the `code` query parameter from the redirect URL.
pub fn code_from_redirect_url(redirect_url: &str) -> Result<String> {
    let url = Url::parse(redirect_url.trim())
        .map_err(|e| AppError::BadRequest(format!("Malformed redirect URL: {}", e)))?;

    url.query_pairs()
        .find(|(key, _)| key == "code")
        .map(|(_, value)| value.into_owned())
        .filter(|code| !code.is_empty())
        .ok_or_else(|| AppError::BadRequest("Redirect URL carries no code".to_string()))
}
