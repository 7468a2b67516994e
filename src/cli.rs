// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use clap::{Parser, Subcommand};

/// Download Strava activities and their GPS tracks
#[derive(Parser)]
#[command(name = "strava-routes", version, about)]
pub struct Cli {
    /// Defaults to `sync`
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the authorization URL to open in a browser
    Authorize,

    /// Store the initial credentials from the pasted redirect URL
    Exchange {
        /// URL the browser was redirected to after approval
        redirect_url: String,
    },

    /// Download new activities and routes, then write the heatmap overlay
    Sync,

    /// Export the metric splits of every activity of one type
    Splits {
        /// Activity type, e.g. `Run`
        activity_type: String,
    },
}
