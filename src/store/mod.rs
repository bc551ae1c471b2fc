// ABOUTME: Persistence abstraction layer with remote and locally-emulated backends
// ABOUTME: One capability set, two implementations, selected by configuration
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 ironlog contributors

//! # Persistence Layer
//!
//! A single capability set (select-like query, insert, update, delete,
//! upsert, with AND-composed filter chaining) served by two backends:
//!
//! - [`remote::RemoteStore`], a thin HTTP client for the hosted relational
//!   backend's REST dialect, and
//! - [`local::LocalStore`], an emulator that reproduces the remote client's
//!   externally-observed contract against a durable key-value medium.
//!
//! [`factory::Client`] picks one per the configuration decision rule and
//! callers never branch on which they got: they build a [`query::TableQuery`],
//! chain filters, and await a terminal. Every resolved operation yields the
//! same `{data, error}` envelope either way.

use anyhow::Result;
use async_trait::async_trait;

pub mod factory;
pub mod kv;
pub mod local;
pub mod query;
pub mod remote;

pub use factory::Client;
pub use query::{Envelope, Query, TableQuery};

/// The execution seam both backends implement.
///
/// The local implementation resolves synchronously under the hood but is
/// wrapped in the same async signature so callers written against the remote
/// store run against the emulator without modification.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Resolve an accumulated query against this backend.
    ///
    /// Remote operation failures are reported inside the envelope's `error`
    /// field, never as `Err`. An `Err` from the local backend signals a
    /// programming-environment fault (unreadable or malformed stored text),
    /// which is outside the emulator's contract.
    ///
    /// # Errors
    ///
    /// Returns an error only for local-medium faults; see above.
    async fn execute(&self, query: Query) -> Result<Envelope>;
}
