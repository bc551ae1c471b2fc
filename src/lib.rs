// ABOUTME: Library entry point for the ironlog workout logging core
// ABOUTME: Persistence facade, query-builder emulator, local store, and progress analytics
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 ironlog contributors

//! # ironlog
//!
//! The persistence core of a workout-logging application. Users record
//! workout sessions (date, focus area, exercises, sets/reps/weights) and
//! derive history, calendar, and progress views from them.
//!
//! Persistence is delegated to a hosted relational backend when one is
//! configured; otherwise every operation is served by a local emulated
//! store that reproduces the remote client's externally-observed contract
//! against a durable key-value medium. Callers never branch on which
//! backend they got:
//!
//! ```no_run
//! use ironlog::config::AppConfig;
//! use ironlog::store::Client;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let client = Client::from_config(&AppConfig::from_env())?;
//! let envelope = client
//!     .table("workouts")
//!     .select("*")
//!     .eq("user_id", "local-user-jane")
//!     .order("workout_date", false)
//!     .limit(5)
//!     .fetch()
//!     .await?;
//! # let _ = envelope;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`store`]: the facade, query builder, local emulator, and remote client
//! - [`services`]: workout CRUD flows and catalog management
//! - [`analytics`]: pure weekly/monthly bucketing and personal records
//! - [`identity`]: the local stand-in for the identity provider
//! - [`models`], [`config`], [`errors`], [`logging`], [`constants`]

pub mod analytics;
pub mod config;
pub mod constants;
pub mod errors;
pub mod identity;
pub mod logging;
pub mod models;
pub mod services;
pub mod store;

pub use store::{Client, Envelope, TableQuery};
