// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity coordinate streams and the long-format coordinate table.

use super::ActivitySummary;
use geo::{Coord, LineString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Stream key for latitude/longitude pairs.
pub const LATLNG_KEY: &str = "latlng";

/// One raw stream as returned with `key_by_type=true`.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamSet {
    pub data: Value,
    #[serde(default)]
    pub series_type: Option<String>,
    #[serde(default)]
    pub original_size: Option<u64>,
}

/// Streams keyed by type (`latlng`, `distance`, ...).
pub type StreamSetMap = HashMap<String, StreamSet>;

/// A single track point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lon: f64,
}

impl From<[f64; 2]> for LatLng {
    fn from([lat, lon]: [f64; 2]) -> Self {
        Self { lat, lon }
    }
}

/// Ordered GPS track of one activity.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateStream {
    pub activity_id: u64,
    pub points: Vec<LatLng>,
}

impl CoordinateStream {
    /// Flatten the provider's keyed stream map down to the coordinate list.
    ///
    /// Activities recorded without GPS have no `latlng` entry and yield an
    /// empty stream.
    pub fn from_stream_sets(
        activity_id: u64,
        streams: &StreamSetMap,
    ) -> Result<Self, serde_json::Error> {
        let points = match streams.get(LATLNG_KEY) {
            Some(set) => serde_json::from_value::<Vec<[f64; 2]>>(set.data.clone())?
                .into_iter()
                .map(LatLng::from)
                .collect(),
            None => Vec::new(),
        };
        Ok(Self {
            activity_id,
            points,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Track as a geo line string (x = lon, y = lat).
    pub fn to_line_string(&self) -> LineString<f64> {
        self.points
            .iter()
            .map(|p| Coord { x: p.lon, y: p.lat })
            .collect()
    }

    /// Rebuild a stream from a stored line string.
    pub fn from_line_string(activity_id: u64, line: &LineString<f64>) -> Self {
        Self {
            activity_id,
            points: line
                .coords()
                .map(|c| LatLng { lat: c.y, lon: c.x })
                .collect(),
        }
    }

    /// Long-format rows tagged with the activity type and its display color.
    pub fn to_rows(
        &self,
        activity_type: &str,
        color_map: &HashMap<String, String>,
    ) -> Vec<CoordinateRow> {
        let color = color_map.get(activity_type).cloned();
        self.points
            .iter()
            .map(|p| CoordinateRow {
                lat: p.lat,
                lon: p.lon,
                activity_id: self.activity_id,
                activity_type: activity_type.to_string(),
                color: color.clone(),
            })
            .collect()
    }
}

/// One track point in the long-format coordinate table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateRow {
    pub lat: f64,
    pub lon: f64,
    pub activity_id: u64,
    pub activity_type: String,
    pub color: Option<String>,
}

/// Coordinate row joined with its activity metadata.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatmapRow<'a> {
    pub coordinate: &'a CoordinateRow,
    pub activity: &'a ActivitySummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpack_keeps_only_latlng() {
        let json = r#"{
            "latlng": {"data": [[54.3, 10.1], [54.31, 10.11]], "series_type": "distance",
                       "original_size": 2, "resolution": "high"},
            "distance": {"data": [0.0, 12.5], "series_type": "distance",
                         "original_size": 2, "resolution": "high"}
        }"#;
        let streams: StreamSetMap = serde_json::from_str(json).unwrap();

        let stream = CoordinateStream::from_stream_sets(5, &streams).unwrap();
        assert_eq!(stream.activity_id, 5);
        assert_eq!(
            stream.points,
            vec![
                LatLng { lat: 54.3, lon: 10.1 },
                LatLng { lat: 54.31, lon: 10.11 }
            ]
        );
    }

    #[test]
    fn test_missing_latlng_is_empty_stream() {
        let json = r#"{"distance": {"data": [0.0, 1.0]}}"#;
        let streams: StreamSetMap = serde_json::from_str(json).unwrap();

        let stream = CoordinateStream::from_stream_sets(9, &streams).unwrap();
        assert!(stream.is_empty());
    }

    #[test]
    fn test_rows_carry_type_color() {
        let stream = CoordinateStream {
            activity_id: 3,
            points: vec![LatLng { lat: 1.0, lon: 2.0 }],
        };
        let colors = HashMap::from([("Ride".to_string(), "#1E90FF".to_string())]);

        let rows = stream.to_rows("Ride", &colors);
        assert_eq!(rows[0].color.as_deref(), Some("#1E90FF"));
        assert_eq!(rows[0].activity_id, 3);

        let rows = stream.to_rows("Kayaking", &colors);
        assert_eq!(rows[0].color, None);
    }

    #[test]
    fn test_line_string_axis_order() {
        let stream = CoordinateStream {
            activity_id: 1,
            points: vec![LatLng { lat: 54.0, lon: 10.0 }],
        };
        let line = stream.to_line_string();
        assert_eq!(line.0[0], Coord { x: 10.0, y: 54.0 });
        assert_eq!(CoordinateStream::from_line_string(1, &line), stream);
    }
}
