// ABOUTME: Strongly-typed query builder and the {data, error} result envelope
// ABOUTME: Chain calls accumulate intent; nothing executes until a terminal is awaited
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 ironlog contributors

//! The chainable query builder shared by both backends.
//!
//! A [`TableQuery`] is an immutable-functional value: every chain call
//! consumes the builder and returns a new one carrying the accumulated
//! filter list and a tagged pending operation, so one base builder can be
//! cloned and fanned into several chains without shared mutable state.
//! Execution happens only at a terminal ([`TableQuery::fetch`],
//! [`TableQuery::single`], [`TableQuery::execute`]), which resolves the
//! query against the owning backend and yields an [`Envelope`].

use crate::errors::StoreError;
use crate::store::factory::Client;
use crate::store::QueryExecutor;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// An equality or set-membership predicate on one column.
///
/// All accumulated filters must match (logical AND); OR is not supported.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Column value equals the given value.
    Eq {
        /// Column name.
        column: String,
        /// Value to compare against.
        value: Value,
    },
    /// Column value is one of the given values.
    In {
        /// Column name.
        column: String,
        /// Accepted values.
        values: Vec<Value>,
    },
}

impl Filter {
    /// Whether a record satisfies this predicate.
    #[must_use]
    pub fn matches(&self, record: &Value) -> bool {
        match self {
            Self::Eq { column, value } => record.get(column) == Some(value),
            Self::In { column, values } => record
                .get(column)
                .is_some_and(|field| values.iter().any(|v| v == field)),
        }
    }
}

/// Result ordering for read operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Column to sort by.
    pub column: String,
    /// Ascending when true, descending otherwise.
    pub ascending: bool,
}

/// The tagged pending operation a builder carries until execution.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PendingOp {
    /// Read the matching records.
    #[default]
    Select,
    /// Append records, stamping identifiers and creation timestamps.
    Insert {
        /// Records to append.
        records: Vec<Value>,
        /// Whether the caller supplied a single object rather than an array.
        single: bool,
    },
    /// Shallow-merge a partial record into every match.
    Update(Value),
    /// Remove every match.
    Delete,
    /// Merge into the record matching the conflict key, or append.
    Upsert {
        /// Record to merge or append.
        record: Value,
        /// Column whose equality decides merge-vs-append.
        on_conflict: String,
    },
}

impl PendingOp {
    /// Short operation name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Insert { .. } => "insert",
            Self::Update(_) => "update",
            Self::Delete => "delete",
            Self::Upsert { .. } => "upsert",
        }
    }
}

/// The accumulated intent of one query chain.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    /// Target table.
    pub table: String,
    /// AND-composed predicates.
    pub filters: Vec<Filter>,
    /// Optional result ordering.
    pub order: Option<OrderBy>,
    /// Optional result cap.
    pub limit: Option<usize>,
    /// Column projection; recorded for the remote dialect, ignored locally.
    pub columns: Option<String>,
    /// The operation to run at execution time.
    pub op: PendingOp,
    /// Resolve to the first match (or null) instead of an array.
    pub single: bool,
}

impl Query {
    /// A fresh select-intent query against `table`.
    #[must_use]
    pub fn table(table: &str) -> Self {
        Self {
            table: table.to_owned(),
            ..Self::default()
        }
    }

    /// Whether a record satisfies every accumulated filter.
    #[must_use]
    pub fn matches(&self, record: &Value) -> bool {
        self.filters.iter().all(|filter| filter.matches(record))
    }
}

/// The `{data, error}` pair every resolved operation yields.
///
/// `data` holds the record, array of records, or null; `error` is populated
/// only by the remote backend. The local emulator resolves every operation
/// with `error: None` by design.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    /// Resolved payload, shape depending on the operation.
    pub data: Option<Value>,
    /// Remote operation failure, if any.
    pub error: Option<StoreError>,
}

impl Envelope {
    /// A successful resolution carrying `data`.
    #[must_use]
    pub const fn success(data: Option<Value>) -> Self {
        Self { data, error: None }
    }

    /// A failed remote resolution carrying `error`.
    #[must_use]
    pub const fn failure(error: StoreError) -> Self {
        Self {
            data: None,
            error: Some(error),
        }
    }

    /// The resolved rows, empty when `data` is null or not an array.
    #[must_use]
    pub fn rows(&self) -> &[Value] {
        match &self.data {
            Some(Value::Array(items)) => items,
            _ => &[],
        }
    }

    /// Promote the envelope's error field, if set, into a hard error.
    ///
    /// # Errors
    ///
    /// Returns the carried [`StoreError`] when the operation failed.
    pub fn into_result(self) -> Result<Option<Value>> {
        match self.error {
            Some(err) => Err(err.into()),
            None => Ok(self.data),
        }
    }

    /// Decode array data into typed records.
    ///
    /// Null data decodes to an empty vector; single-object data decodes to a
    /// one-element vector.
    ///
    /// # Errors
    ///
    /// Returns the carried [`StoreError`] when the operation failed, or a
    /// deserialization error when stored records do not match `T`.
    pub fn decode_rows<T: DeserializeOwned>(self) -> Result<Vec<T>> {
        match self.into_result()? {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|item| serde_json::from_value(item).context("decoding stored record"))
                .collect(),
            Some(item) => Ok(vec![
                serde_json::from_value(item).context("decoding stored record")?
            ]),
        }
    }

    /// Decode single-record data into a typed record, `None` for null data.
    ///
    /// # Errors
    ///
    /// Returns the carried [`StoreError`] when the operation failed, or a
    /// deserialization error when the stored record does not match `T`.
    pub fn decode_single<T: DeserializeOwned>(self) -> Result<Option<T>> {
        match self.into_result()? {
            None => Ok(None),
            Some(Value::Array(items)) => items
                .into_iter()
                .next()
                .map(|item| serde_json::from_value(item).context("decoding stored record"))
                .transpose(),
            Some(item) => Ok(Some(
                serde_json::from_value(item).context("decoding stored record")?,
            )),
        }
    }
}

/// Collapse array data to its first element when the caller asked for one.
pub(crate) fn collapse_single(data: Option<Value>, single: bool) -> Option<Value> {
    if !single {
        return data;
    }
    match data {
        Some(Value::Array(items)) => items.into_iter().next(),
        other => other,
    }
}

/// A chainable query bound to a backend.
///
/// Obtained from [`Client::table`]; every method consumes the builder and
/// returns a new value.
#[derive(Clone)]
pub struct TableQuery {
    client: Client,
    query: Query,
}

impl TableQuery {
    /// Bind a fresh query against `table` to `client`.
    #[must_use]
    pub fn new(client: Client, table: &str) -> Self {
        Self {
            client,
            query: Query::table(table),
        }
    }

    /// Mark read intent with a column projection.
    ///
    /// The projection is passed to the remote dialect; the local emulator
    /// always returns whole records.
    #[must_use]
    pub fn select(mut self, columns: &str) -> Self {
        self.query.columns = Some(columns.to_owned());
        self
    }

    /// Append an equality filter; all accumulated filters must match.
    #[must_use]
    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.query.filters.push(Filter::Eq {
            column: column.to_owned(),
            value: value.into(),
        });
        self
    }

    /// Append a set-membership filter; AND-composed with the rest.
    #[must_use]
    pub fn in_any<V: Into<Value>>(
        mut self,
        column: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.query.filters.push(Filter::In {
            column: column.to_owned(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Order read results by `column`.
    #[must_use]
    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        self.query.order = Some(OrderBy {
            column: column.to_owned(),
            ascending,
        });
        self
    }

    /// Cap read results at `n` records.
    #[must_use]
    pub fn limit(mut self, n: usize) -> Self {
        self.query.limit = Some(n);
        self
    }

    /// Queue an insert of one record (object) or several (array).
    #[must_use]
    pub fn insert(mut self, records: impl Into<Value>) -> Self {
        self.query.op = match records.into() {
            Value::Array(items) => PendingOp::Insert {
                records: items,
                single: false,
            },
            item => PendingOp::Insert {
                records: vec![item],
                single: true,
            },
        };
        self
    }

    /// Queue a shallow-merge update of every record matching the filters.
    #[must_use]
    pub fn update(mut self, patch: impl Into<Value>) -> Self {
        self.query.op = PendingOp::Update(patch.into());
        self
    }

    /// Queue removal of every record matching the filters.
    #[must_use]
    pub fn delete(mut self) -> Self {
        self.query.op = PendingOp::Delete;
        self
    }

    /// Queue an upsert keyed on equality of `on_conflict`.
    #[must_use]
    pub fn upsert(mut self, record: impl Into<Value>, on_conflict: &str) -> Self {
        self.query.op = PendingOp::Upsert {
            record: record.into(),
            on_conflict: on_conflict.to_owned(),
        };
        self
    }

    /// Execute, resolving to an array of matching records.
    ///
    /// # Errors
    ///
    /// Returns an error only for local-medium faults; remote failures arrive
    /// inside the envelope.
    pub async fn fetch(self) -> Result<Envelope> {
        self.client.execute(self.query).await
    }

    /// Execute, resolving to the first matching record or null data.
    ///
    /// # Errors
    ///
    /// Returns an error only for local-medium faults; remote failures arrive
    /// inside the envelope.
    pub async fn single(mut self) -> Result<Envelope> {
        self.query.single = true;
        self.client.execute(self.query).await
    }

    /// Execute whatever operation is pending.
    ///
    /// # Errors
    ///
    /// Returns an error only for local-medium faults; remote failures arrive
    /// inside the envelope.
    pub async fn execute(self) -> Result<Envelope> {
        self.client.execute(self.query).await
    }
}
