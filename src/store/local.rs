// ABOUTME: Local emulated store reproducing the remote query client's contract
// ABOUTME: JSON table collections over a key-value medium, read-modify-write per mutation
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 ironlog contributors

//! The fallback store used whenever the remote backend is not configured.
//!
//! Each table is an insertion-ordered JSON array of objects serialized under
//! the table's key in a [`KeyValueMedium`]. Every mutating operation reads
//! the whole collection, mutates it in memory, and writes it back: O(table
//! size), acceptable at local-development scale. An intra-process mutex
//! serializes those read-modify-write cycles; separate processes sharing one
//! data directory remain uncoordinated writers (see [`crate::store::kv`]).
//!
//! The emulator is a frictionless stand-in: no operation here ever populates
//! the envelope's `error` field. Zero matches on update resolve to null
//! data, not a not-found error; delete resolves to null data whether or not
//! anything was removed. An `Err` from these methods means the medium itself
//! failed (unreadable file, malformed stored text), a programming-
//! environment fault outside the emulated contract.
//!
//! Generated identifiers are a coarse millisecond timestamp plus a
//! process-wide sequence suffix. Within one process they are unique; across
//! processes inserting in the same millisecond, uniqueness is only
//! probabilistic. That weak invariant is inherited from the system this
//! emulator stands in for and is intentionally not hardened.

use crate::constants::id;
use crate::store::kv::{FileKv, KeyValueMedium};
use crate::store::query::{collapse_single, Envelope, OrderBy, PendingOp, Query};
use crate::store::QueryExecutor;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::cmp::Ordering;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};
use tracing::debug;

static INSERT_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generate a record identifier: coarse timestamp plus a sequence suffix.
fn generate_record_id() -> String {
    let seq = INSERT_SEQUENCE.fetch_add(1, AtomicOrdering::Relaxed);
    format!(
        "{}{}-{seq}",
        id::LOCAL_RECORD_PREFIX,
        Utc::now().timestamp_millis()
    )
}

/// The local emulated store.
#[derive(Clone)]
pub struct LocalStore {
    kv: Arc<dyn KeyValueMedium>,
    guard: Arc<Mutex<()>>,
}

impl LocalStore {
    /// Open a store backed by files under `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn open(dir: &Path) -> Result<Self> {
        Ok(Self::with_medium(Arc::new(FileKv::open(dir)?)))
    }

    /// Build a store over any medium (files, memory, ...).
    #[must_use]
    pub fn with_medium(kv: Arc<dyn KeyValueMedium>) -> Self {
        Self {
            kv,
            guard: Arc::new(Mutex::new(())),
        }
    }

    /// Read a raw slot from the underlying medium.
    pub(crate) fn read_text(&self, key: &str) -> Result<Option<String>> {
        self.kv.get(key)
    }

    /// Write a raw slot to the underlying medium.
    pub(crate) fn write_text(&self, key: &str, value: &str) -> Result<()> {
        self.kv.set(key, value)
    }

    /// Clear a raw slot in the underlying medium.
    pub(crate) fn clear_text(&self, key: &str) -> Result<()> {
        self.kv.remove(key)
    }

    /// Read a table collection; an absent key is an empty table.
    ///
    /// # Errors
    ///
    /// Returns an error when the stored text exists but is not a JSON array,
    /// a medium fault, not an emulated condition.
    pub fn read_table(&self, table: &str) -> Result<Vec<Value>> {
        match self.kv.get(table)? {
            None => Ok(Vec::new()),
            Some(text) => serde_json::from_str(&text)
                .with_context(|| format!("malformed stored collection for table {table}")),
        }
    }

    /// Replace a table collection wholesale.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be written.
    pub fn write_table(&self, table: &str, records: &[Value]) -> Result<()> {
        let text = serde_json::to_string(records)
            .with_context(|| format!("serializing collection for table {table}"))?;
        self.kv.set(table, &text)
    }

    /// Reassign records created under legacy timestamp-derived owner
    /// identifiers to `current_user_id`.
    ///
    /// Trigger condition, checked per record: `user_id` starts with the
    /// local record prefix but not the local *user* prefix, and differs from
    /// the current identity. Records owned by other real identities are
    /// untouched. Returns how many records were rewritten.
    ///
    /// # Errors
    ///
    /// Returns an error on medium faults.
    pub fn adopt_legacy_records(&self, table: &str, current_user_id: &str) -> Result<usize> {
        let _guard = self.lock()?;
        let mut records = self.read_table(table)?;
        let mut adopted = 0;
        for record in &mut records {
            let legacy = record.get("user_id").and_then(Value::as_str).is_some_and(|owner| {
                owner.starts_with(id::LOCAL_RECORD_PREFIX)
                    && !owner.starts_with(id::LOCAL_USER_PREFIX)
                    && owner != current_user_id
            });
            if legacy {
                if let Value::Object(map) = record {
                    map.insert("user_id".to_owned(), Value::String(current_user_id.to_owned()));
                    adopted += 1;
                }
            }
        }
        if adopted > 0 {
            self.write_table(table, &records)?;
            debug!(table, adopted, "reassigned legacy-owned records");
        }
        Ok(adopted)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.guard
            .lock()
            .map_err(|_| anyhow::anyhow!("local store lock poisoned"))
    }

    /// Resolve a query synchronously; the async trait wraps this.
    ///
    /// # Errors
    ///
    /// Returns an error only on medium faults.
    pub fn execute_sync(&self, query: Query) -> Result<Envelope> {
        let data = match &query.op {
            PendingOp::Select => self.run_select(&query)?,
            PendingOp::Insert { records, single } => {
                self.run_insert(&query, records.clone(), *single)?
            }
            PendingOp::Update(patch) => self.run_update(&query, patch)?,
            PendingOp::Delete => self.run_delete(&query)?,
            PendingOp::Upsert {
                record,
                on_conflict,
            } => self.run_upsert(&query, record.clone(), on_conflict)?,
        };
        Ok(Envelope::success(collapse_single(data, query.single)))
    }

    fn run_select(&self, query: &Query) -> Result<Option<Value>> {
        let records = self.read_table(&query.table)?;
        let mut matches: Vec<Value> = records
            .into_iter()
            .filter(|record| query.matches(record))
            .collect();
        if let Some(order) = &query.order {
            sort_records(&mut matches, order);
        }
        if let Some(limit) = query.limit {
            matches.truncate(limit);
        }
        Ok(Some(Value::Array(matches)))
    }

    fn run_insert(
        &self,
        query: &Query,
        mut records: Vec<Value>,
        single: bool,
    ) -> Result<Option<Value>> {
        let _guard = self.lock()?;
        let mut table = self.read_table(&query.table)?;
        let now = Utc::now().to_rfc3339();
        for record in &mut records {
            stamp_inserted(record, &now);
        }
        table.extend(records.iter().cloned());
        self.write_table(&query.table, &table)?;
        if single {
            Ok(records.into_iter().next())
        } else {
            Ok(Some(Value::Array(records)))
        }
    }

    fn run_update(&self, query: &Query, patch: &Value) -> Result<Option<Value>> {
        let _guard = self.lock()?;
        let mut table = self.read_table(&query.table)?;
        let now = Utc::now().to_rfc3339();
        let mut updated = Vec::new();
        for record in &mut table {
            if query.matches(record) {
                shallow_merge(record, patch);
                if let Value::Object(map) = record {
                    map.insert("updated_at".to_owned(), Value::String(now.clone()));
                }
                updated.push(record.clone());
            }
        }
        if updated.is_empty() {
            // Absence of a match is not an error condition here.
            return Ok(None);
        }
        self.write_table(&query.table, &table)?;
        Ok(Some(Value::Array(updated)))
    }

    fn run_delete(&self, query: &Query) -> Result<Option<Value>> {
        let _guard = self.lock()?;
        let mut table = self.read_table(&query.table)?;
        let before = table.len();
        table.retain(|record| !query.matches(record));
        if table.len() != before {
            self.write_table(&query.table, &table)?;
        }
        Ok(None)
    }

    fn run_upsert(
        &self,
        query: &Query,
        mut record: Value,
        on_conflict: &str,
    ) -> Result<Option<Value>> {
        let _guard = self.lock()?;
        let mut table = self.read_table(&query.table)?;
        let now = Utc::now().to_rfc3339();
        let conflict_value = record.get(on_conflict).cloned();

        let position = conflict_value.as_ref().and_then(|value| {
            table
                .iter()
                .position(|row| row.get(on_conflict) == Some(value))
        });

        let result = if let Some(pos) = position {
            let row = table
                .get_mut(pos)
                .context("upsert conflict position out of range")?;
            shallow_merge(row, &record);
            if let Value::Object(map) = row {
                map.insert("updated_at".to_owned(), Value::String(now));
            }
            row.clone()
        } else {
            stamp_inserted(&mut record, &now);
            table.push(record.clone());
            record
        };
        self.write_table(&query.table, &table)?;
        Ok(Some(result))
    }
}

#[async_trait]
impl QueryExecutor for LocalStore {
    async fn execute(&self, query: Query) -> Result<Envelope> {
        self.execute_sync(query)
    }
}

/// Stamp identifier and creation timestamp onto a record about to be stored.
///
/// An existing non-empty `id` is preserved so callers can append
/// pre-identified reference data; the creation timestamp is always refreshed.
fn stamp_inserted(record: &mut Value, now: &str) {
    if let Value::Object(map) = record {
        let needs_id = map
            .get("id")
            .and_then(Value::as_str)
            .is_none_or(str::is_empty);
        if needs_id {
            map.insert("id".to_owned(), Value::String(generate_record_id()));
        }
        map.insert("created_at".to_owned(), Value::String(now.to_owned()));
    }
}

/// Shallow-merge `patch`'s top-level fields into `record`.
fn shallow_merge(record: &mut Value, patch: &Value) {
    if let (Value::Object(target), Value::Object(source)) = (record, patch) {
        for (key, value) in source {
            target.insert(key.clone(), value.clone());
        }
    }
}

/// Stable sort by one column; missing fields order before present ones.
fn sort_records(records: &mut [Value], order: &OrderBy) {
    records.sort_by(|a, b| {
        let left = a.get(&order.column).unwrap_or(&Value::Null);
        let right = b.get(&order.column).unwrap_or(&Value::Null);
        let ordering = compare_fields(left, right);
        if order.ascending {
            ordering
        } else {
            ordering.reverse()
        }
    });
}

fn compare_fields(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}
