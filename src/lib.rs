// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava-Routes: download Strava activities and their GPS tracks
//!
//! This crate keeps a local copy of an athlete's activity list and route
//! files, refreshing OAuth credentials as needed, and filters the stored
//! tracks into a colored overlay for heatmap rendering.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod time_utils;

pub use config::Config;
pub use error::{AppError, Result};
