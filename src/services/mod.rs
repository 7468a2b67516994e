// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - provider access, persistence and data shaping.

pub mod activity;
pub mod classify;
pub mod credentials;
pub mod export;
pub mod filter;
pub mod heatmap;
pub mod oauth;
pub mod strava;

pub use activity::{ActivitySync, SyncReport};
pub use classify::{ResponseClass, ResponseClassifier};
pub use credentials::{ensure_dir, CredentialStore};
pub use filter::{ActivityFilter, FilterError};
pub use strava::{StravaClient, StravaService};
