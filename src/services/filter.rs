// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Join coordinates with activity metadata and filter the result.

use crate::error::AppError;
use crate::models::{ActivitySummary, CoordinateRow, FilterCriteria, HeatmapRow};
use crate::time_utils::year_of;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Stateless filter over the coordinate and activity tables.
pub struct ActivityFilter;

impl ActivityFilter {
    /// Join `coordinates` to `activities` on activity id and keep the rows
    /// matching every set predicate.
    ///
    /// Coordinates whose activity is not in `activities` are dropped. When
    /// the same id appears twice in `activities` the first entry wins.
    /// Predicates run in the order year, name, type, bounding box; the box
    /// only applies when all eight corners are set.
    pub fn apply<'a>(
        activities: &'a [ActivitySummary],
        coordinates: &'a [CoordinateRow],
        criteria: &FilterCriteria,
    ) -> Result<Vec<HeatmapRow<'a>>, FilterError> {
        if activities.is_empty() {
            return Err(FilterError::EmptyInput("activities"));
        }
        if coordinates.is_empty() {
            return Err(FilterError::EmptyInput("coordinates"));
        }

        let mut by_id: HashMap<u64, &ActivitySummary> = HashMap::with_capacity(activities.len());
        for activity in activities {
            by_id.entry(activity.id).or_insert(activity);
        }

        let ranges = criteria.bounding_box.and_then(|b| b.ranges());
        let mut years: HashMap<u64, i32> = HashMap::new();
        let mut rows = Vec::new();

        for coordinate in coordinates {
            let Some(activity) = by_id.get(&coordinate.activity_id).copied() else {
                continue;
            };

            if let Some(allowed) = &criteria.years {
                let year = match years.entry(activity.id) {
                    Entry::Occupied(e) => *e.get(),
                    Entry::Vacant(e) => *e.insert(year_of(&activity.start_date_local).ok_or_else(
                        || FilterError::InvalidStartDate {
                            activity_id: activity.id,
                            value: activity.start_date_local.clone(),
                        },
                    )?),
                };
                if !allowed.contains(&year) {
                    continue;
                }
            }

            if let Some(allowed) = &criteria.names {
                if !allowed.contains(&activity.name) {
                    continue;
                }
            }

            if let Some(allowed) = &criteria.activity_types {
                if !allowed.contains(&activity.activity_type) {
                    continue;
                }
            }

            if let Some(ranges) = &ranges {
                if !ranges.contains(coordinate.lat, coordinate.lon) {
                    continue;
                }
            }

            rows.push(HeatmapRow {
                coordinate,
                activity,
            });
        }

        tracing::debug!(
            input = coordinates.len(),
            output = rows.len(),
            "Filtered coordinate table"
        );
        Ok(rows)
    }
}

/// Errors from filtering.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("Nothing to filter: the {0} table is empty")]
    EmptyInput(&'static str),

    #[error("Activity {activity_id} has an unreadable start date: {value}")]
    InvalidStartDate { activity_id: u64, value: String },
}

impl From<FilterError> for AppError {
    fn from(err: FilterError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
