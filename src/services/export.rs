// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity table, route and split files.
//!
//! Writes are per file; nothing here is transactional across files.

use crate::error::{AppError, Result};
use crate::models::{ActivitySummary, CoordinateStream, LatLng, SplitRow};
use crate::services::credentials::ensure_dir;
use geo::LineString;
use geojson::{Feature, GeoJson, Geometry, JsonObject};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// File extension of stored route files.
pub const ROUTE_EXTENSION: &str = "geojson";

/// Columns written when a type has no split column list of its own.
const ALL_SPLIT_COLUMNS: [&str; 9] = [
    "average_speed",
    "distance",
    "elapsed_time",
    "elevation_difference",
    "moving_time",
    "pace_zone",
    "split",
    "id",
    "date",
];

/// Flat CSV shape of [`ActivitySummary`].
#[derive(Debug, Serialize, Deserialize)]
struct ActivityCsvRow {
    id: u64,
    name: String,
    start_date_local: String,
    #[serde(rename = "type")]
    activity_type: String,
    distance: f64,
    moving_time: u64,
    elapsed_time: u64,
    total_elevation_gain: f64,
    end_latlng: String,
    external_id: Option<String>,
}

impl From<&ActivitySummary> for ActivityCsvRow {
    fn from(a: &ActivitySummary) -> Self {
        Self {
            id: a.id,
            name: a.name.clone(),
            start_date_local: a.start_date_local.clone(),
            activity_type: a.activity_type.clone(),
            distance: a.distance,
            moving_time: a.moving_time,
            elapsed_time: a.elapsed_time,
            total_elevation_gain: a.total_elevation_gain,
            end_latlng: a
                .end_latlng
                .map(|[lat, lon]| format!("[{}, {}]", lat, lon))
                .unwrap_or_default(),
            external_id: a.external_id.clone(),
        }
    }
}

impl ActivityCsvRow {
    fn into_summary(self) -> Result<ActivitySummary> {
        Ok(ActivitySummary {
            end_latlng: parse_latlng(&self.end_latlng)?,
            id: self.id,
            name: self.name,
            start_date_local: self.start_date_local,
            activity_type: self.activity_type,
            distance: self.distance,
            moving_time: self.moving_time,
            elapsed_time: self.elapsed_time,
            total_elevation_gain: self.total_elevation_gain,
            external_id: self.external_id,
        })
    }
}

/// Parse the `[lat, lon]` JSON array cell; an empty cell means no position.
fn parse_latlng(cell: &str) -> Result<Option<[f64; 2]>> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(None);
    }

    let values: Vec<f64> = serde_json::from_str(cell)
        .map_err(|e| AppError::Parse(format!("end_latlng {:?}: {}", cell, e)))?;

    match values.as_slice() {
        [] => Ok(None),
        [lat, lon] => Ok(Some([*lat, *lon])),
        _ => Err(AppError::Parse(format!("end_latlng {:?}: expected two values", cell))),
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}

/// Write the activity table, one row per activity.
pub fn write_activities_csv(path: &Path, activities: &[ActivitySummary]) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)?;
    for activity in activities {
        writer.serialize(ActivityCsvRow::from(activity))?;
    }
    writer.flush()?;

    tracing::info!(path = %path.display(), count = activities.len(), "Activities saved");
    Ok(())
}

/// Read an activity table written by [`write_activities_csv`].
pub fn read_activities_csv(path: &Path) -> Result<Vec<ActivitySummary>> {
    let mut reader = csv::Reader::from_path(path)?;
    reader
        .deserialize::<ActivityCsvRow>()
        .map(|row| row?.into_summary())
        .collect()
}

/// Write a stream as a two-column `lat,lon` table.
///
/// Returns `false` (and writes nothing) for streams without coordinates.
pub fn write_stream_csv(path: &Path, stream: &CoordinateStream) -> Result<bool> {
    if stream.is_empty() {
        return Ok(false);
    }
    ensure_parent(path)?;

    let mut writer = csv::Writer::from_path(path)?;
    for point in &stream.points {
        writer.serialize(point)?;
    }
    writer.flush()?;

    tracing::debug!(path = %path.display(), "Activity csv file saved");
    Ok(true)
}

/// Read a stream written by [`write_stream_csv`].
pub fn read_stream_csv(path: &Path, activity_id: u64) -> Result<CoordinateStream> {
    let mut reader = csv::Reader::from_path(path)?;
    let points = reader
        .deserialize::<LatLng>()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(CoordinateStream {
        activity_id,
        points,
    })
}

/// Write a stream as a GeoJSON LineString feature.
///
/// Returns `false` (and writes nothing) for streams without coordinates.
pub fn write_route_geojson(path: &Path, stream: &CoordinateStream) -> Result<bool> {
    if stream.is_empty() {
        return Ok(false);
    }
    ensure_parent(path)?;

    let mut properties = JsonObject::new();
    properties.insert("activity_id".to_string(), Value::from(stream.activity_id));

    let feature = Feature {
        bbox: None,
        geometry: Some(Geometry::new(geojson::Value::from(&stream.to_line_string()))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    };

    fs::write(path, GeoJson::Feature(feature).to_string())?;
    tracing::debug!(path = %path.display(), "Activity route file saved");
    Ok(true)
}

/// Read a route written by [`write_route_geojson`].
pub fn read_route_geojson(path: &Path, activity_id: u64) -> Result<CoordinateStream> {
    let json = fs::read_to_string(path)?;
    let geojson: GeoJson = json
        .parse()
        .map_err(|e: geojson::Error| AppError::Parse(format!("{}: {}", path.display(), e)))?;

    let geometry = match geojson {
        GeoJson::Feature(Feature {
            geometry: Some(geometry),
            ..
        }) => geometry,
        GeoJson::Geometry(geometry) => geometry,
        _ => {
            return Err(AppError::Parse(format!(
                "{}: expected a LineString feature",
                path.display()
            )))
        }
    };

    let line: LineString<f64> = geometry.value.try_into().map_err(|e: geojson::Error| {
        AppError::Parse(format!("{}: {}", path.display(), e))
    })?;
    Ok(CoordinateStream::from_line_string(activity_id, &line))
}

/// Write split rows, restricted to `columns` (all columns when empty).
pub fn write_splits_csv(path: &Path, rows: &[SplitRow], columns: &[String]) -> Result<()> {
    ensure_parent(path)?;

    let columns: Vec<&str> = if columns.is_empty() {
        ALL_SPLIT_COLUMNS.to_vec()
    } else {
        columns.iter().map(String::as_str).collect()
    };

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&columns)?;
    for row in rows {
        let value = serde_json::to_value(row)?;
        writer.write_record(columns.iter().map(|c| cell(value.get(*c))))?;
    }
    writer.flush()?;

    tracing::info!(path = %path.display(), count = rows.len(), "Splits saved");
    Ok(())
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
