// ABOUTME: Error codes and the store error type carried in result envelopes
// ABOUTME: Remote operation failures are data, not panics; local faults use anyhow
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 ironlog contributors

//! # Error Handling
//!
//! The crate distinguishes three failure families:
//!
//! - **Configuration absence/invalidity** is a normal, handled case. The
//!   facade falls back to the local store and nothing here is involved.
//! - **Remote operation failure** is modeled as a [`StoreError`] carried in
//!   the result envelope's `error` field, mirroring the hosted backend's
//!   response contract.
//! - **Local environment faults** (unreadable medium, malformed stored text)
//!   are defects, not modeled cases: they surface as `anyhow::Error` from the
//!   operation itself, never through the envelope.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes for failures surfaced through the result envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// The remote store rejected or failed the operation.
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError,
    /// The remote store could not be reached at all.
    #[serde(rename = "EXTERNAL_SERVICE_UNAVAILABLE")]
    ExternalServiceUnavailable,
    /// The operation input could not be represented on the wire.
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ExternalServiceError => "EXTERNAL_SERVICE_ERROR",
            Self::ExternalServiceUnavailable => "EXTERNAL_SERVICE_UNAVAILABLE",
            Self::InvalidInput => "INVALID_INPUT",
        };
        f.write_str(name)
    }
}

/// An operation failure reported by the remote store.
///
/// The local emulated store never constructs one of these; all of its
/// operations resolve with a `None` error by design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{code}: {message}")]
pub struct StoreError {
    /// Machine-readable failure category.
    pub code: ErrorCode,
    /// Human-readable detail from the backend or transport.
    pub message: String,
}

impl StoreError {
    /// Failure response from the remote store (non-success HTTP status).
    #[must_use]
    pub fn service(status: u16, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::ExternalServiceError,
            message: format!("status {status}: {}", message.into()),
        }
    }

    /// Transport-level failure: the remote store never answered.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::ExternalServiceUnavailable,
            message: message.into(),
        }
    }

    /// The request itself could not be encoded.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::InvalidInput,
            message: message.into(),
        }
    }
}
