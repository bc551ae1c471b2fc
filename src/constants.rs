// ABOUTME: Centralized constants for table names, storage keys, and tunable limits
// ABOUTME: Keeps magic strings out of the store, services, and analytics modules
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 ironlog contributors

//! Crate-wide constants.
//!
//! Every fixed key, table name, environment variable, and limit lives here so
//! the store, services, and analytics modules agree on a single source.

/// Table names shared by the remote store and the local emulator.
pub mod tables {
    /// Workout sessions, one row per logged occasion.
    pub const WORKOUTS: &str = "workouts";
    /// Performed sets, one row per set within a session.
    pub const WORKOUT_EXERCISES: &str = "workout_exercises";
    /// Exercise catalog reference data.
    pub const EXERCISES: &str = "exercises";
    /// Muscle group reference data.
    pub const MUSCLE_GROUPS: &str = "muscle_groups";
}

/// Fixed keys in the local key-value medium that are not table collections.
pub mod keys {
    /// The "current identity" slot the local identity store writes.
    pub const CURRENT_USER: &str = "current-user";
}

/// Environment variable names read by [`crate::config::environment`].
pub mod env_config {
    /// Base URL of the hosted relational backend.
    pub const REMOTE_STORE_URL: &str = "REMOTE_STORE_URL";
    /// Service credential sent with every remote request.
    pub const REMOTE_STORE_SERVICE_KEY: &str = "REMOTE_STORE_SERVICE_KEY";
    /// Override for the local store's data directory.
    pub const DATA_DIR: &str = "IRONLOG_DATA_DIR";
    /// Deployment environment (development, production, testing).
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
}

/// Markers that identify an unconfigured, copy-pasted remote URL.
///
/// A URL containing any of these is treated exactly like an absent one.
pub mod placeholders {
    /// Substrings that mark a remote URL as a template value.
    pub const MARKERS: [&str; 3] = ["placeholder", "your-project", "your_database_url"];
}

/// Identifier prefixes used by the local emulated store.
pub mod id {
    /// Prefix for every locally generated record identifier.
    pub const LOCAL_RECORD_PREFIX: &str = "local-";
    /// Prefix for identifiers derived deterministically from a login name.
    pub const LOCAL_USER_PREFIX: &str = "local-user-";
}

/// Tunable limits for derived views.
pub mod limits {
    /// Maximum personal records returned by the extraction helper.
    pub const PERSONAL_RECORD_LIMIT: usize = 10;
    /// Trailing full weeks included in the weekly volume view.
    pub const TRAILING_WEEKS: i64 = 12;
    /// Trailing full months included in the monthly volume view.
    pub const TRAILING_MONTHS: u32 = 6;
    /// Recent sessions shown on the dashboard.
    pub const RECENT_SESSIONS: usize = 5;
}

/// Service identity for logging.
pub mod service {
    /// Service name reported in structured logs.
    pub const NAME: &str = "ironlog";
}
