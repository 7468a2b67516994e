// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava-Routes command line tool

mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command};
use strava_routes::{
    config::Config,
    models::FilterCriteria,
    services::{
        export, heatmap, oauth, ActivityFilter, ActivitySync, CredentialStore, StravaService,
    },
    time_utils::format_utc_rfc3339,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Largest page size Strava accepts for the activity list.
const ACTIVITIES_PER_PAGE: u32 = 200;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging();

    let config = Config::from_env().context("Failed to load configuration")?;
    let store = CredentialStore::new(&config.data_dir, &config.credential_file_name);

    match cli.command.unwrap_or(Command::Sync) {
        Command::Authorize => {
            println!("{}", oauth::authorization_url(&config)?);
        }
        Command::Exchange { redirect_url } => {
            let code = oauth::code_from_redirect_url(&redirect_url)?;
            let mut strava = StravaService::new(&config)?.with_store(store);
            let credential = strava.exchange_code(&code).await?;
            tracing::info!(
                expires_at = %credential
                    .expires_at_utc()
                    .map(format_utc_rfc3339)
                    .unwrap_or_default(),
                "Credentials stored"
            );
        }
        Command::Sync => sync(&config, store).await?,
        Command::Splits { activity_type } => splits(&config, store, &activity_type).await?,
    }

    Ok(())
}

/// Refresh the activity table, fetch missing routes and write the overlay.
async fn sync(config: &Config, store: CredentialStore) -> anyhow::Result<()> {
    if !store.exists() {
        println!("No credentials found, authorize first:");
        println!("{}", oauth::authorization_url(config)?);
        return Ok(());
    }

    let mut strava = StravaService::from_store(config, store)?;

    let activities = strava.fetch_all_activities(ACTIVITIES_PER_PAGE).await?;
    export::write_activities_csv(&config.data_dir.join("activities.csv"), &activities)?;

    let route_sync = ActivitySync::new(config);
    route_sync.sync_missing(&mut strava, &activities).await?;

    let coordinates = route_sync.load_coordinates(&activities)?;
    if activities.is_empty() || coordinates.is_empty() {
        tracing::info!("No routes stored yet, skipping overlay");
        return Ok(());
    }

    let criteria = FilterCriteria::new().with_bounding_box(config.bounding_box);
    let rows = ActivityFilter::apply(&activities, &coordinates, &criteria)?;
    heatmap::write_overlay(&config.data_dir.join("heatmap.geojson"), &rows)?;

    let stats = heatmap::summary(&activities);
    tracing::info!(
        total_activities = stats.total_activities,
        total_distance_km = stats.total_distance_km,
        total_moving_time_secs = stats.total_moving_time_secs,
        total_elevation_gain_km = stats.total_elevation_gain_km,
        longest_activity_km = stats.longest_activity_km,
        longest_activity_month = stats.longest_activity_month.as_deref(),
        "Activity summary"
    );

    Ok(())
}

/// Export the metric splits of every stored activity of one type.
async fn splits(
    config: &Config,
    store: CredentialStore,
    activity_type: &str,
) -> anyhow::Result<()> {
    let activities = export::read_activities_csv(&config.data_dir.join("activities.csv"))
        .context("Run `sync` first to create activities.csv")?;

    let mut strava = StravaService::from_store(config, store)?;
    let rows = strava.get_activity_splits(activity_type, &activities).await?;

    let columns = config
        .split_columns
        .get(activity_type)
        .cloned()
        .unwrap_or_default();
    let path = config
        .data_dir
        .join(format!("splits_{}.csv", activity_type.to_lowercase()));
    export::write_splits_csv(&path, &rows, &columns)?;

    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("strava_routes=debug,info")),
        )
        .with(format)
        .init();
}
