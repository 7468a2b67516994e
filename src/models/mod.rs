// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the client.

pub mod activity;
pub mod credential;
pub mod filter;
pub mod stream;

pub use activity::{ActivityDetail, ActivitySummary, Split, SplitRow};
pub use credential::Credential;
pub use filter::{BoundingBox, FilterCriteria};
pub use stream::{CoordinateRow, CoordinateStream, HeatmapRow, LatLng};
