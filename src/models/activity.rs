// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava activity models.

use serde::{Deserialize, Deserializer, Serialize};

/// One row of the athlete's activity list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    /// Strava activity ID
    pub id: u64,
    /// Activity name/title
    pub name: String,
    /// Local start time as sent by Strava (e.g. `2023-05-01T08:15:00Z`)
    pub start_date_local: String,
    /// Activity type (Ride, Run, Swim, Walk, ...)
    #[serde(rename = "type")]
    pub activity_type: String,
    /// Distance in meters
    pub distance: f64,
    /// Moving time in seconds
    pub moving_time: u64,
    /// Elapsed time in seconds
    pub elapsed_time: u64,
    /// Elevation gain in meters
    pub total_elevation_gain: f64,
    /// Final position, absent for activities without GPS
    #[serde(default, deserialize_with = "deserialize_latlng")]
    pub end_latlng: Option<[f64; 2]>,
    /// Upload identifier (usually the original file name)
    #[serde(default)]
    pub external_id: Option<String>,
}

/// Strava sends `[]` or `null` instead of omitting a missing position.
fn deserialize_latlng<'de, D>(deserializer: D) -> Result<Option<[f64; 2]>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<f64>> = Option::deserialize(deserializer)?;
    Ok(match raw.as_deref() {
        Some([lat, lon]) => Some([*lat, *lon]),
        _ => None,
    })
}

/// Detailed activity, only the parts the client consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivityDetail {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub activity_type: String,
    /// UTC start time
    pub start_date: String,
    #[serde(default)]
    pub splits_metric: Vec<Split>,
}

/// One kilometer split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    pub average_speed: f64,
    pub distance: f64,
    pub elapsed_time: u64,
    #[serde(default)]
    pub elevation_difference: Option<f64>,
    pub moving_time: u64,
    #[serde(default)]
    pub pace_zone: Option<u32>,
    pub split: u32,
}

/// Split tagged with its activity, as exported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitRow {
    #[serde(flatten)]
    pub split: Split,
    pub id: u64,
    pub date: String,
}
