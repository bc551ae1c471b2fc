// ABOUTME: Catalog seeder for local development and fresh deployments
// ABOUTME: Upserts the built-in muscle groups and exercises through the facade
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 ironlog contributors

//! Exercise catalog seeder.
//!
//! Populates the configured backend (remote when configured, the local
//! emulated store otherwise) with the built-in muscle groups and exercises.
//! Seeding is idempotent; run it as often as you like.
//!
//! Usage:
//! ```bash
//! # Seed whatever backend the environment selects
//! cargo run --bin seed-catalog
//!
//! # Seed a specific local data directory
//! cargo run --bin seed-catalog -- --data-dir /tmp/ironlog-dev
//!
//! # Wipe the catalog tables before seeding
//! cargo run --bin seed-catalog -- --reset
//! ```

use anyhow::Result;
use clap::Parser;
use ironlog::config::AppConfig;
use ironlog::constants::tables;
use ironlog::logging::LoggingConfig;
use ironlog::services::CatalogService;
use ironlog::store::Client;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "seed-catalog",
    about = "ironlog exercise catalog seeder",
    long_about = "Populate the configured backend with the built-in muscle groups and exercises"
)]
struct SeedArgs {
    /// Local data directory override (ignored when a remote store is configured)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Delete existing catalog rows before seeding
    #[arg(long)]
    reset: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = SeedArgs::parse();

    let mut logging = LoggingConfig::from_env();
    if args.verbose {
        logging.level = "debug".into();
    }
    logging.init()?;

    let mut config = AppConfig::from_env();
    if let Some(dir) = args.data_dir {
        config.storage.data_dir = dir;
    }

    let client = Client::from_config(&config)?;
    info!(backend = client.backend_info(), "seeding exercise catalog");

    if args.reset {
        client
            .table(tables::EXERCISES)
            .delete()
            .execute()
            .await?
            .into_result()?;
        client
            .table(tables::MUSCLE_GROUPS)
            .delete()
            .execute()
            .await?
            .into_result()?;
        info!("cleared existing catalog rows");
    }

    let summary = CatalogService::new(client).seed_catalog().await?;
    info!(
        muscle_groups = summary.muscle_groups,
        exercises = summary.exercises,
        "catalog seeded"
    );
    Ok(())
}
