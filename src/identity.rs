// ABOUTME: Local stand-in for the identity provider during unconfigured development
// ABOUTME: Deterministic user identifiers and the current-identity slot, explicitly passed
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 ironlog contributors

//! The local identity store.
//!
//! The real deployment delegates authentication to a third-party identity
//! provider and the core only ever sees an opaque owning-user identifier
//! string. When no provider is configured, this module stands in: signing in
//! derives a deterministic identifier from the login name, so the same email
//! always maps to the same identifier and previously saved sessions stay
//! reachable across sign-ins.
//!
//! The store is an explicit value threaded to callers; there is no ambient
//! global identity. The current identity lives under a fixed slot in the
//! same medium the local store persists through.
//!
//! Earlier builds derived identifiers from a sign-in timestamp, which made
//! every sign-in a new owner and orphaned saved sessions. Sign-in therefore
//! runs a migration with an explicit trigger condition (see
//! [`crate::store::local::LocalStore::adopt_legacy_records`]) that reassigns
//! those orphaned records to the current identity and logs how many moved.

use crate::constants::{id, keys, tables};
use crate::logging::AppLogger;
use crate::store::local::LocalStore;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// The identity persisted in the current-identity slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalIdentity {
    /// Deterministic owning-user identifier.
    pub id: String,
    /// Login name the identifier was derived from.
    pub email: String,
    /// When this identity was first written.
    pub created_at: DateTime<Utc>,
}

/// Identity operations over a local store's medium.
#[derive(Clone)]
pub struct IdentityStore {
    store: LocalStore,
}

impl IdentityStore {
    /// Wrap the given local store.
    #[must_use]
    pub const fn new(store: LocalStore) -> Self {
        Self { store }
    }

    /// Derive the deterministic identifier for a login name.
    ///
    /// Non-alphanumeric characters map to `-`, so `jane@example.com` always
    /// becomes `local-user-jane-example-com`.
    #[must_use]
    pub fn derive_user_id(email: &str) -> String {
        let sanitized: String = email
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect();
        format!("{}{sanitized}", id::LOCAL_USER_PREFIX)
    }

    /// Sign in, persisting the derived identity and adopting legacy records.
    ///
    /// # Errors
    ///
    /// Returns an error on medium faults.
    pub fn sign_in(&self, email: &str) -> Result<LocalIdentity> {
        let identity = LocalIdentity {
            id: Self::derive_user_id(email),
            email: email.to_owned(),
            created_at: Utc::now(),
        };
        let text =
            serde_json::to_string(&identity).context("serializing current identity")?;
        self.store.write_text(keys::CURRENT_USER, &text)?;

        let adopted = self
            .store
            .adopt_legacy_records(tables::WORKOUTS, &identity.id)?;
        if adopted > 0 {
            info!(
                user.id = %identity.id,
                adopted,
                "reassigned legacy-owned sessions to current identity"
            );
        }
        AppLogger::log_identity_event(&identity.id, "sign_in", Some(email));
        Ok(identity)
    }

    /// Sign up behaves exactly like sign-in: the identifier is derived, not
    /// allocated, so repeat registrations converge on the same identity.
    ///
    /// # Errors
    ///
    /// Returns an error on medium faults.
    pub fn sign_up(&self, email: &str) -> Result<LocalIdentity> {
        self.sign_in(email)
    }

    /// Read the current identity, if one is signed in.
    ///
    /// # Errors
    ///
    /// Returns an error on medium faults or a malformed stored slot.
    pub fn current_user(&self) -> Result<Option<LocalIdentity>> {
        match self.store.read_text(keys::CURRENT_USER)? {
            None => Ok(None),
            Some(text) => serde_json::from_str(&text)
                .map(Some)
                .context("malformed current identity slot"),
        }
    }

    /// Clear the current identity.
    ///
    /// # Errors
    ///
    /// Returns an error on medium faults.
    pub fn sign_out(&self) -> Result<()> {
        if let Some(identity) = self.current_user().unwrap_or_default() {
            AppLogger::log_identity_event(&identity.id, "sign_out", None);
        }
        self.store.clear_text(keys::CURRENT_USER)
    }
}
