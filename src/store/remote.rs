// ABOUTME: Thin HTTP client mapping builder values onto the hosted backend's REST dialect
// ABOUTME: Operation failures surface through the envelope's error field, never as panics
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 ironlog contributors

//! The remote store client.
//!
//! Maps the same [`Query`] values the local emulator executes onto a
//! PostgREST-style dialect: query-string filters (`col=eq.v`,
//! `col=in.(a,b)`), `order`/`limit`/`select` parameters, JSON bodies with
//! `Prefer: return=representation` for mutations, and
//! `resolution=merge-duplicates` + `on_conflict` for upserts. Non-success
//! responses and transport failures become [`StoreError`]s in the envelope;
//! this client never returns `Err` from [`QueryExecutor::execute`], keeping
//! the facade's error taxonomy intact.

use crate::errors::StoreError;
use crate::store::query::{collapse_single, Envelope, Filter, PendingOp, Query};
use crate::store::QueryExecutor;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the hosted relational backend.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    base: Url,
    service_key: String,
    http: reqwest::Client,
}

impl RemoteStore {
    /// Build a client for the backend at `base`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(base: Url, service_key: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("building HTTP client for remote store")?;
        Ok(Self {
            base,
            service_key,
            http,
        })
    }

    fn endpoint(&self, table: &str) -> Result<Url, StoreError> {
        let raw = format!(
            "{}/rest/v1/{table}",
            self.base.as_str().trim_end_matches('/')
        );
        Url::parse(&raw).map_err(|err| StoreError::invalid_input(format!("bad endpoint: {err}")))
    }

    async fn dispatch(&self, query: Query) -> Envelope {
        let url = match self.endpoint(&query.table) {
            Ok(url) => url,
            Err(err) => return Envelope::failure(err),
        };

        debug!(table = %query.table, op = query.op.name(), "dispatching remote operation");

        let request = match &query.op {
            PendingOp::Select => self.http.get(url).query(&read_params(&query)),
            PendingOp::Insert { records, single } => {
                let body = if *single {
                    records.first().cloned().unwrap_or(Value::Null)
                } else {
                    Value::Array(records.clone())
                };
                self.http
                    .post(url)
                    .query(&projection_params(&query))
                    .header("Prefer", "return=representation")
                    .json(&body)
            }
            PendingOp::Update(patch) => self
                .http
                .patch(url)
                .query(&filter_params(&query))
                .header("Prefer", "return=representation")
                .json(patch),
            PendingOp::Delete => self.http.delete(url).query(&filter_params(&query)),
            PendingOp::Upsert {
                record,
                on_conflict,
            } => self
                .http
                .post(url)
                .query(&[("on_conflict", on_conflict.as_str())])
                .header(
                    "Prefer",
                    "resolution=merge-duplicates,return=representation",
                )
                .json(record),
        };

        let response = match self.authorize(request).send().await {
            Ok(response) => response,
            Err(err) => return Envelope::failure(StoreError::unavailable(err.to_string())),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Envelope::failure(StoreError::service(status.as_u16(), body));
        }

        if matches!(query.op, PendingOp::Delete) {
            return Envelope::success(None);
        }

        let payload: Value = match response.json().await {
            Ok(payload) => payload,
            Err(err) => {
                return Envelope::failure(StoreError::service(
                    status.as_u16(),
                    format!("unparseable response body: {err}"),
                ))
            }
        };

        Envelope::success(collapse_single(shape_payload(&query.op, payload), query.single))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }
}

#[async_trait]
impl QueryExecutor for RemoteStore {
    async fn execute(&self, query: Query) -> Result<Envelope> {
        Ok(self.dispatch(query).await)
    }
}

/// Reshape the raw response payload to match the emulator's envelope shapes.
///
/// The backend answers every representation request with an array; updates
/// with zero matches collapse to null data (absence is not an error), and
/// single-record operations collapse to the record itself.
fn shape_payload(op: &PendingOp, payload: Value) -> Option<Value> {
    match (op, payload) {
        (PendingOp::Update(_), Value::Array(items)) => {
            if items.is_empty() {
                None
            } else {
                Some(Value::Array(items))
            }
        }
        (
            PendingOp::Insert { single: true, .. } | PendingOp::Upsert { .. },
            Value::Array(items),
        ) => items.into_iter().next(),
        (_, value) => Some(value),
    }
}

fn read_params(query: &Query) -> Vec<(String, String)> {
    let mut params = projection_params(query);
    params.extend(filter_params(query));
    if let Some(order) = &query.order {
        let direction = if order.ascending { "asc" } else { "desc" };
        params.push(("order".to_owned(), format!("{}.{direction}", order.column)));
    }
    if let Some(limit) = query.limit {
        params.push(("limit".to_owned(), limit.to_string()));
    }
    params
}

fn projection_params(query: &Query) -> Vec<(String, String)> {
    vec![(
        "select".to_owned(),
        query.columns.clone().unwrap_or_else(|| "*".to_owned()),
    )]
}

fn filter_params(query: &Query) -> Vec<(String, String)> {
    query
        .filters
        .iter()
        .map(|filter| match filter {
            Filter::Eq { column, value } => (column.clone(), format!("eq.{}", literal(value))),
            Filter::In { column, values } => {
                let list = values.iter().map(literal).collect::<Vec<_>>().join(",");
                (column.clone(), format!("in.({list})"))
            }
        })
        .collect()
}

/// Render a JSON value as a filter literal for the query string.
fn literal(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => "null".to_owned(),
        other => other.to_string(),
    }
}
