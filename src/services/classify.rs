// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Provider response classification.
//!
//! Every response is looked up in the configured success and error code
//! maps before its body is trusted. Known statuses are logged with their
//! configured message; unknown ones are logged as warnings.

use std::collections::BTreeMap;

/// Outcome of looking a status code up in the configured maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseClass {
    Success,
    Error,
    Unclassified,
}

/// Status-code lookup built from the client configuration.
#[derive(Debug, Clone, Default)]
pub struct ResponseClassifier {
    success_codes: BTreeMap<u16, String>,
    error_codes: BTreeMap<u16, String>,
}

impl ResponseClassifier {
    pub fn new(success_codes: BTreeMap<u16, String>, error_codes: BTreeMap<u16, String>) -> Self {
        Self {
            success_codes,
            error_codes,
        }
    }

    pub fn classify(&self, status: u16, url: &str) -> ResponseClass {
        if let Some(message) = self.success_codes.get(&status) {
            tracing::debug!(status, url, "{}", message);
            ResponseClass::Success
        } else if let Some(message) = self.error_codes.get(&status) {
            tracing::warn!(status, url, "{}", message);
            ResponseClass::Error
        } else {
            tracing::warn!(status, url, "Status code not defined");
            ResponseClass::Unclassified
        }
    }
}
