// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client error types.

/// Error type shared by every client operation.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Token refresh or code exchange was rejected by the provider.
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Timeout or connection failure. Never retried by the client.
    #[error("Network error: {0}")]
    Transient(String),

    #[error("Strava API error: HTTP {status}: {body}")]
    StravaApi { status: u16, body: String },

    /// Status code missing from both the success and the error code maps.
    #[error("Unclassified response: HTTP {status} for {url}")]
    Unclassified {
        status: u16,
        url: String,
        body: String,
    },

    #[error("Failed to parse {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Whether the failure came from the transport rather than the provider.
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::Transient(_))
    }

    /// Whether the provider answered with a non-success status.
    ///
    /// The activity pager stops on these and keeps what it has so far.
    pub fn is_status_error(&self) -> bool {
        matches!(
            self,
            AppError::StravaApi { .. } | AppError::Unclassified { .. } | AppError::NotFound(_)
        )
    }

    /// Raw response body, when the provider sent one.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            AppError::StravaApi { body, .. } | AppError::Unclassified { body, .. } => Some(body),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() || err.is_request() {
            AppError::Transient(err.to_string())
        } else if err.is_decode() {
            AppError::Parse(format!("provider response: {}", err))
        } else {
            AppError::Internal(anyhow::Error::new(err))
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Parse(format!("JSON: {}", err))
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Parse(format!("CSV: {}", err))
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, AppError>;
