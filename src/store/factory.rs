// ABOUTME: Persistence facade choosing between the remote store and the local emulator
// ABOUTME: Configuration-driven backend selection with enum delegation
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 ironlog contributors

//! The facade callers build once and query through.
//!
//! [`Client::from_config`] applies the decision rule from
//! [`crate::config::environment::RemoteConfig::is_configured`]: the remote
//! backend is used only when its address is present, a syntactically valid
//! HTTP/HTTPS URL, and not a recognized placeholder; otherwise every
//! operation is served by the local emulated store. Configuration absence is
//! a normal, handled case; it is never surfaced as an error.

use crate::config::AppConfig;
use crate::logging::AppLogger;
use crate::store::kv::KeyValueMedium;
use crate::store::local::LocalStore;
use crate::store::query::{Envelope, Query, TableQuery};
use crate::store::remote::RemoteStore;
use crate::store::QueryExecutor;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
use url::Url;

/// The persistence backend behind the facade.
#[derive(Clone)]
pub enum Client {
    /// Hosted relational backend over HTTP.
    Remote(RemoteStore),
    /// Local emulated store over a durable key-value medium.
    Local(LocalStore),
}

impl Client {
    /// Select and construct a backend per the configuration decision rule.
    ///
    /// # Errors
    ///
    /// Returns an error only when the chosen backend cannot be constructed
    /// (unwritable data directory, HTTP client build failure), never for
    /// configuration absence.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        if config.remote.is_configured() {
            if let (Some(url), Some(key)) = (&config.remote.url, &config.remote.service_key) {
                let base = Url::parse(url).context("parsing remote store URL")?;
                info!(backend = "remote", url = %url, "using hosted relational backend");
                return Ok(Self::Remote(RemoteStore::new(base, key.clone())?));
            }
        }
        info!(
            backend = "local",
            data_dir = %config.storage.data_dir.display(),
            "remote store not configured; using local emulated store"
        );
        Ok(Self::Local(LocalStore::open(&config.storage.data_dir)?))
    }

    /// Build a local-backend client over an explicit medium.
    #[must_use]
    pub fn local_with_medium(medium: Arc<dyn KeyValueMedium>) -> Self {
        Self::Local(LocalStore::with_medium(medium))
    }

    /// Descriptive string for the selected backend.
    #[must_use]
    pub const fn backend_info(&self) -> &'static str {
        match self {
            Self::Remote(_) => "Remote (Hosted Backend)",
            Self::Local(_) => "Local (Emulated Store)",
        }
    }

    /// The local store behind this client, when one is in use.
    #[must_use]
    pub const fn local_store(&self) -> Option<&LocalStore> {
        match self {
            Self::Remote(_) => None,
            Self::Local(store) => Some(store),
        }
    }

    /// Start a query chain against `table`.
    #[must_use]
    pub fn table(&self, table: &str) -> TableQuery {
        TableQuery::new(self.clone(), table)
    }
}

#[async_trait]
impl QueryExecutor for Client {
    async fn execute(&self, query: Query) -> Result<Envelope> {
        AppLogger::log_store_operation(query.op.name(), &query.table, self.backend_info());
        match self {
            Self::Remote(store) => store.execute(query).await,
            Self::Local(store) => store.execute(query).await,
        }
    }
}
