// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Incremental route sync.
//!
//! Handles the download workflow:
//! 1. Work out which activities have no stored route yet
//! 2. Fetch their coordinate streams one at a time
//! 3. Write a GeoJSON route file (and optionally a `lat,lon` CSV) per activity,
//!    or record the activity as having no track so it is not fetched again
//! 4. Rebuild the long-format coordinate table from the stored routes

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{ActivitySummary, CoordinateRow};
use crate::services::credentials::{ensure_dir, write_atomic};
use crate::services::export::{self, ROUTE_EXTENSION};
use crate::services::StravaService;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Ids of fetched activities without coordinates, kept next to the routes.
const WITHOUT_TRACK_FILE: &str = "without_track.json";

/// Keeps per-activity route files in step with the activity list.
pub struct ActivitySync {
    route_dir: PathBuf,
    csv_dir: Option<PathBuf>,
    color_map: HashMap<String, String>,
}

impl ActivitySync {
    pub fn new(config: &Config) -> Self {
        Self {
            route_dir: config.route_dir(),
            csv_dir: Some(config.stream_csv_dir()),
            color_map: config.color_map.clone(),
        }
    }

    /// Skip the per-activity `lat,lon` CSV files.
    pub fn without_csv(mut self) -> Self {
        self.csv_dir = None;
        self
    }

    pub fn route_dir(&self) -> &Path {
        &self.route_dir
    }

    pub fn route_path(&self, activity_id: u64) -> PathBuf {
        self.route_dir.join(format!("{}.{}", activity_id, ROUTE_EXTENSION))
    }

    fn without_track_path(&self) -> PathBuf {
        self.route_dir.join(WITHOUT_TRACK_FILE)
    }

    /// Activities already fetched and known to carry no GPS track.
    pub fn without_track_ids(&self) -> Result<BTreeSet<u64>> {
        let path = self.without_track_path();
        if !path.is_file() {
            return Ok(BTreeSet::new());
        }
        let json = fs::read_to_string(&path)?;
        serde_json::from_str(&json)
            .map_err(|e| AppError::Parse(format!("{}: {}", path.display(), e)))
    }

    fn record_without_track(&self, activity_ids: &[u64]) -> Result<()> {
        if activity_ids.is_empty() {
            return Ok(());
        }
        let mut ids = self.without_track_ids()?;
        ids.extend(activity_ids.iter().copied());
        write_atomic(self.without_track_path(), &serde_json::to_vec(&ids)?)
    }

    /// Activity ids that already have a route file, in ascending order.
    pub fn stored_activity_ids(&self) -> Result<Vec<u64>> {
        ensure_dir(&self.route_dir)?;

        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.route_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(ROUTE_EXTENSION) {
                continue;
            }
            match path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<u64>().ok())
            {
                Some(id) => ids.push(id),
                None => tracing::debug!(path = %path.display(), "Ignoring unrelated file"),
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }

    /// The ids from `activity_ids` that have no route file yet, order kept.
    ///
    /// Activities recorded as having no GPS track are not missing.
    pub fn missing_activity_ids(&self, activity_ids: &[u64]) -> Result<Vec<u64>> {
        let stored: HashSet<u64> = self.stored_activity_ids()?.into_iter().collect();
        let without_track = self.without_track_ids()?;
        Ok(activity_ids
            .iter()
            .copied()
            .filter(|id| !stored.contains(id) && !without_track.contains(id))
            .collect())
    }

    /// Fetch and store routes for every activity without a route file.
    pub async fn sync_missing(
        &self,
        strava: &mut StravaService,
        activities: &[ActivitySummary],
    ) -> Result<SyncReport> {
        let ids: Vec<u64> = activities.iter().map(|a| a.id).collect();
        let missing = self.missing_activity_ids(&ids)?;
        self.sync_ids(strava, &missing).await
    }

    /// Fetch and store routes for exactly `activity_ids`, sequentially.
    ///
    /// Ids whose stream has no coordinates are added to the without-track
    /// list once the loop finishes.
    pub async fn sync_ids(
        &self,
        strava: &mut StravaService,
        activity_ids: &[u64],
    ) -> Result<SyncReport> {
        ensure_dir(&self.route_dir)?;
        if let Some(dir) = &self.csv_dir {
            ensure_dir(dir)?;
        }

        let mut report = SyncReport::default();
        for &activity_id in activity_ids {
            let stream = strava.fetch_stream(activity_id).await?;
            report.fetched += 1;

            if !export::write_route_geojson(&self.route_path(activity_id), &stream)? {
                tracing::debug!(activity_id, "Activity has no GPS track");
                report.without_track.push(activity_id);
                continue;
            }
            if let Some(dir) = &self.csv_dir {
                export::write_stream_csv(&dir.join(format!("{}.csv", activity_id)), &stream)?;
            }
            report.written += 1;
        }
        self.record_without_track(&report.without_track)?;

        tracing::info!(
            fetched = report.fetched,
            written = report.written,
            without_track = report.without_track.len(),
            "Route sync finished"
        );
        Ok(report)
    }

    /// Long-format coordinate table built from the stored route files.
    ///
    /// Route files whose activity is not in `activities` are skipped.
    pub fn load_coordinates(&self, activities: &[ActivitySummary]) -> Result<Vec<CoordinateRow>> {
        let types: HashMap<u64, &str> = activities
            .iter()
            .map(|a| (a.id, a.activity_type.as_str()))
            .collect();

        let mut rows = Vec::new();
        for activity_id in self.stored_activity_ids()? {
            let Some(activity_type) = types.get(&activity_id) else {
                tracing::debug!(activity_id, "Route without activity metadata, skipping");
                continue;
            };
            let stream = export::read_route_geojson(&self.route_path(activity_id), activity_id)?;
            rows.extend(stream.to_rows(activity_type, &self.color_map));
        }

        tracing::info!(rows = rows.len(), "Loaded coordinate table");
        Ok(rows)
    }
}

/// Result of a route sync.
#[derive(Debug, Default, PartialEq)]
pub struct SyncReport {
    /// Streams requested from Strava
    pub fetched: usize,
    /// Route files written
    pub written: usize,
    /// Activities whose stream had no coordinates
    pub without_track: Vec<u64>,
}
