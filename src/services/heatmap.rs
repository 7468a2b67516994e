// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GeoJSON overlay of filtered routes, one colored feature per activity.
//!
//! Map rendering is left to whatever tool consumes the overlay.

use crate::error::Result;
use crate::models::{ActivitySummary, HeatmapRow};
use crate::services::credentials::write_atomic;
use crate::time_utils::month_label;
use geo::{Coord, LineString, Point};
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Totals over a set of activities, embedded in the overlay as `summary`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityStats {
    pub total_activities: usize,
    /// Kilometres, one decimal
    pub total_distance_km: f64,
    pub total_moving_time_secs: u64,
    /// Kilometres, one decimal
    pub total_elevation_gain_km: f64,
    pub longest_activity_km: Option<f64>,
    /// Month of the longest activity, e.g. `May 2023`
    pub longest_activity_month: Option<String>,
}

impl ActivityStats {
    pub fn to_json(&self) -> Value {
        json!({
            "total_activities": self.total_activities,
            "total_distance_km": self.total_distance_km,
            "total_moving_time_secs": self.total_moving_time_secs,
            "total_elevation_gain_km": self.total_elevation_gain_km,
            "longest_activity_km": self.longest_activity_km,
            "longest_activity_month": self.longest_activity_month,
        })
    }
}

/// Summary statistics; an activity id seen twice counts once.
pub fn summary<'a>(activities: impl IntoIterator<Item = &'a ActivitySummary>) -> ActivityStats {
    let mut seen = HashSet::new();
    let mut stats = ActivityStats::default();
    let mut distance = 0.0;
    let mut elevation = 0.0;
    let mut longest: Option<&ActivitySummary> = None;

    for activity in activities {
        if !seen.insert(activity.id) {
            continue;
        }
        stats.total_activities += 1;
        stats.total_moving_time_secs += activity.moving_time;
        distance += activity.distance;
        elevation += activity.total_elevation_gain;
        if longest.map_or(true, |l| activity.distance > l.distance) {
            longest = Some(activity);
        }
    }

    stats.total_distance_km = round_km(distance);
    stats.total_elevation_gain_km = round_km(elevation);
    stats.longest_activity_km = longest.map(|a| round_km(a.distance));
    stats.longest_activity_month = longest.and_then(|a| month_label(&a.start_date_local));
    stats
}

fn round_km(metres: f64) -> f64 {
    (metres / 100.0).round() / 10.0
}

/// Group `rows` by activity (first-seen order) into a feature collection.
///
/// Activities with a single surviving point become Point features. The
/// collection carries a `summary` member over the activities it shows.
pub fn overlay_geojson(rows: &[HeatmapRow<'_>]) -> FeatureCollection {
    let mut order: Vec<u64> = Vec::new();
    let mut groups: HashMap<u64, Vec<&HeatmapRow<'_>>> = HashMap::new();
    for row in rows {
        let id = row.activity.id;
        groups
            .entry(id)
            .or_insert_with(|| {
                order.push(id);
                Vec::new()
            })
            .push(row);
    }

    let features = order
        .iter()
        .filter_map(|id| groups.get(id))
        .map(|group| activity_feature(group))
        .collect();

    let stats = summary(
        order
            .iter()
            .filter_map(|id| groups.get(id))
            .filter_map(|group| group.first())
            .map(|row| row.activity),
    );
    let mut foreign_members = JsonObject::new();
    foreign_members.insert("summary".into(), stats.to_json());

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: Some(foreign_members),
    }
}

fn activity_feature(group: &[&HeatmapRow<'_>]) -> Feature {
    let coords: Vec<Coord<f64>> = group
        .iter()
        .map(|r| Coord {
            x: r.coordinate.lon,
            y: r.coordinate.lat,
        })
        .collect();

    let value = match coords.as_slice() {
        [single] => geojson::Value::from(&Point::from(*single)),
        _ => geojson::Value::from(&LineString::from(coords)),
    };

    let first = group[0];
    let mut properties = JsonObject::new();
    properties.insert("activity_id".into(), Value::from(first.activity.id));
    properties.insert("name".into(), Value::from(first.activity.name.clone()));
    properties.insert(
        "type".into(),
        Value::from(first.activity.activity_type.clone()),
    );
    properties.insert(
        "start_date_local".into(),
        Value::from(first.activity.start_date_local.clone()),
    );
    properties.insert("distance".into(), Value::from(first.activity.distance));
    properties.insert(
        "color".into(),
        first
            .coordinate
            .color
            .clone()
            .map(Value::from)
            .unwrap_or(Value::Null),
    );

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Write the overlay for `rows` and return the number of features.
pub fn write_overlay(path: &Path, rows: &[HeatmapRow<'_>]) -> Result<usize> {
    let collection = overlay_geojson(rows);
    let count = collection.features.len();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        crate::services::credentials::ensure_dir(parent)?;
    }
    write_atomic(path, GeoJson::FeatureCollection(collection).to_string().as_bytes())?;

    tracing::info!(path = %path.display(), features = count, "Heatmap overlay saved");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivitySummary, CoordinateRow};

    fn activity(id: u64) -> ActivitySummary {
        ActivitySummary {
            id,
            name: format!("Activity {}", id),
            start_date_local: "2023-05-01T08:00:00Z".into(),
            activity_type: "Ride".into(),
            distance: 1000.0,
            moving_time: 100,
            elapsed_time: 120,
            total_elevation_gain: 3.0,
            end_latlng: None,
            external_id: None,
        }
    }

    fn coordinate(activity_id: u64, lat: f64) -> CoordinateRow {
        CoordinateRow {
            lat,
            lon: 10.0,
            activity_id,
            activity_type: "Ride".into(),
            color: Some("#1E90FF".into()),
        }
    }

    #[test]
    fn test_overlay_groups_per_activity() {
        let activities = [activity(1), activity(2)];
        let coordinates = [coordinate(2, 54.0), coordinate(1, 54.1), coordinate(2, 54.2)];
        let rows: Vec<HeatmapRow> = coordinates
            .iter()
            .map(|c| HeatmapRow {
                coordinate: c,
                activity: activities.iter().find(|a| a.id == c.activity_id).unwrap(),
            })
            .collect();

        let overlay = overlay_geojson(&rows);
        assert_eq!(overlay.features.len(), 2);

        let first = &overlay.features[0];
        assert_eq!(first.property("activity_id"), Some(&Value::from(2u64)));
        assert_eq!(first.property("color"), Some(&Value::from("#1E90FF")));
        assert!(matches!(
            first.geometry.as_ref().map(|g| &g.value),
            Some(geojson::Value::LineString(points)) if points.len() == 2
        ));
        assert!(matches!(
            overlay.features[1].geometry.as_ref().map(|g| &g.value),
            Some(geojson::Value::Point(_))
        ));

        let members = overlay.foreign_members.as_ref().unwrap();
        assert_eq!(members["summary"]["total_activities"], 2);
        assert_eq!(members["summary"]["total_distance_km"], 2.0);
    }

    #[test]
    fn test_summary_totals_and_longest() {
        let mut long = activity(2);
        long.distance = 42_195.0;
        long.moving_time = 12_000;
        long.total_elevation_gain = 350.0;
        long.start_date_local = "2022-10-09T09:00:00Z".into();
        let short = activity(1);

        let stats = summary([&short, &long, &short]);

        assert_eq!(stats.total_activities, 2);
        assert_eq!(stats.total_distance_km, 43.2);
        assert_eq!(stats.total_moving_time_secs, 12_100);
        assert_eq!(stats.total_elevation_gain_km, 0.4);
        assert_eq!(stats.longest_activity_km, Some(42.2));
        assert_eq!(stats.longest_activity_month.as_deref(), Some("Oct 2022"));
    }

    #[test]
    fn test_summary_of_nothing() {
        let stats = summary(std::iter::empty());
        assert_eq!(stats.total_activities, 0);
        assert_eq!(stats.longest_activity_km, None);
    }
}
