// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Decides between the remote store and the local emulator without any I/O
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 ironlog contributors

//! Environment-based configuration.
//!
//! Everything here is side-effect-free: reading the config touches only
//! environment variables, and [`RemoteConfig::is_configured`] performs no I/O
//! so it is safe to evaluate on every request. Absent or placeholder remote
//! settings are a normal, handled case that routes persistence to the local
//! emulated store; they are never an error.

use crate::constants::{env_config, placeholders};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use url::Url;

/// Deployment environment type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development, the default.
    #[default]
    Development,
    /// Production deployment.
    Production,
    /// Automated test runs.
    Testing,
}

impl Environment {
    /// Parse from string with fallback to [`Environment::Development`].
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment.
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Connection settings for the hosted relational backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the remote store, if any was supplied.
    pub url: Option<String>,
    /// Service credential sent with every request, if any was supplied.
    pub service_key: Option<String>,
}

impl RemoteConfig {
    /// Decide whether the remote store should be used.
    ///
    /// True only when the URL is present, parses as an `http`/`https` URL,
    /// carries no recognized placeholder marker, and a non-empty service key
    /// accompanies it. Performs no I/O and never fails; an invalid value
    /// simply routes callers to the local store.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        let Some(url) = self.url.as_deref() else {
            return false;
        };
        let Some(key) = self.service_key.as_deref() else {
            return false;
        };
        if key.trim().is_empty() {
            return false;
        }
        if placeholders::MARKERS.iter().any(|m| url.contains(m)) {
            return false;
        }
        Url::parse(url).is_ok_and(|parsed| matches!(parsed.scheme(), "http" | "https"))
    }
}

/// Location of the local emulated store's durable medium.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one serialized-text file per fixed key.
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Per-installation default data directory.
///
/// Falls back to a relative `.ironlog` directory when the platform reports
/// no local data dir (containerized environments, mostly).
#[must_use]
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir().map_or_else(|| PathBuf::from(".ironlog"), |dir| dir.join("ironlog"))
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Deployment environment.
    pub environment: Environment,
    /// Remote store connection settings.
    pub remote: RemoteConfig,
    /// Local store location.
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Build the configuration from environment variables.
    ///
    /// Missing variables fall back to defaults; this never fails because
    /// configuration absence is the supported local-development case.
    #[must_use]
    pub fn from_env() -> Self {
        let environment = env::var(env_config::ENVIRONMENT)
            .map(|value| Environment::from_str_or_default(&value))
            .unwrap_or_default();

        let remote = RemoteConfig {
            url: env::var(env_config::REMOTE_STORE_URL).ok(),
            service_key: env::var(env_config::REMOTE_STORE_SERVICE_KEY).ok(),
        };

        let storage = env::var(env_config::DATA_DIR).map_or_else(
            |_| StorageConfig::default(),
            |dir| StorageConfig {
                data_dir: PathBuf::from(dir),
            },
        );

        Self {
            environment,
            remote,
            storage,
        }
    }
}
