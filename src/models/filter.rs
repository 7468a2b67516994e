// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Filter criteria for the joined coordinate table.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Rectangle given by four independently specified corners.
///
/// The box only filters when all eight values are set; a partially filled
/// box lets every row through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub latitude_top_right: Option<f64>,
    pub longitude_top_right: Option<f64>,
    pub latitude_top_left: Option<f64>,
    pub longitude_top_left: Option<f64>,
    pub latitude_bottom_left: Option<f64>,
    pub longitude_bottom_left: Option<f64>,
    pub latitude_bottom_right: Option<f64>,
    pub longitude_bottom_right: Option<f64>,
}

/// Inclusive latitude and longitude ranges of an active box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxRanges {
    pub lat: (f64, f64),
    pub lon: (f64, f64),
}

impl BoxRanges {
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.lat.0..=self.lat.1).contains(&lat) && (self.lon.0..=self.lon.1).contains(&lon)
    }
}

impl BoundingBox {
    pub fn is_active(&self) -> bool {
        self.ranges().is_some()
    }

    /// Ranges taken pairwise from the corners, `None` unless all are set.
    ///
    /// Latitude spans min(bottom-left, bottom-right) to max(top-left,
    /// top-right); longitude spans min(bottom-left, top-left) to
    /// max(bottom-right, top-right). Corners are not assumed sorted.
    pub fn ranges(&self) -> Option<BoxRanges> {
        let lat_tr = self.latitude_top_right?;
        let lon_tr = self.longitude_top_right?;
        let lat_tl = self.latitude_top_left?;
        let lon_tl = self.longitude_top_left?;
        let lat_bl = self.latitude_bottom_left?;
        let lon_bl = self.longitude_bottom_left?;
        let lat_br = self.latitude_bottom_right?;
        let lon_br = self.longitude_bottom_right?;

        Some(BoxRanges {
            lat: (lat_bl.min(lat_br), lat_tl.max(lat_tr)),
            lon: (lon_bl.min(lon_tl), lon_br.max(lon_tr)),
        })
    }
}

/// Optional predicates; an unset predicate keeps every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub activity_types: Option<HashSet<String>>,
    pub years: Option<HashSet<i32>>,
    pub names: Option<HashSet<String>>,
    pub bounding_box: Option<BoundingBox>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.activity_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_years<I: IntoIterator<Item = i32>>(mut self, years: I) -> Self {
        self.years = Some(years.into_iter().collect());
        self
    }

    pub fn with_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_bounding_box(mut self, bounding_box: BoundingBox) -> Self {
        self.bounding_box = Some(bounding_box);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_box() -> BoundingBox {
        BoundingBox {
            latitude_top_right: Some(54.5),
            longitude_top_right: Some(10.3),
            latitude_top_left: Some(54.5),
            longitude_top_left: Some(10.0),
            latitude_bottom_left: Some(54.2),
            longitude_bottom_left: Some(10.0),
            latitude_bottom_right: Some(54.2),
            longitude_bottom_right: Some(10.3),
        }
    }

    #[test]
    fn test_partial_box_is_inactive() {
        let mut bbox = full_box();
        bbox.longitude_bottom_right = None;
        assert!(!bbox.is_active());
        assert!(!BoundingBox::default().is_active());
        assert!(full_box().is_active());
    }

    #[test]
    fn test_ranges_are_pairwise_min_max() {
        // Skewed quadrilateral: corners disagree on each edge.
        let bbox = BoundingBox {
            latitude_top_right: Some(54.6),
            longitude_top_right: Some(10.4),
            latitude_top_left: Some(54.5),
            longitude_top_left: Some(9.9),
            latitude_bottom_left: Some(54.2),
            longitude_bottom_left: Some(10.0),
            latitude_bottom_right: Some(54.1),
            longitude_bottom_right: Some(10.3),
        };

        let ranges = bbox.ranges().unwrap();
        assert_eq!(ranges.lat, (54.1, 54.6));
        assert_eq!(ranges.lon, (9.9, 10.4));
    }

    #[test]
    fn test_ranges_are_inclusive() {
        let ranges = full_box().ranges().unwrap();
        assert!(ranges.contains(54.2, 10.0));
        assert!(ranges.contains(54.5, 10.3));
        assert!(!ranges.contains(54.51, 10.1));
        assert!(!ranges.contains(54.3, 9.99));
    }
}
