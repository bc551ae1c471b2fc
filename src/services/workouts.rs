// ABOUTME: Workout session CRUD flows over the persistence facade
// ABOUTME: Whole-exercise set replacement, cascade deletion, and history joins
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 ironlog contributors

//! The workout service.
//!
//! Carries the owning-user identifier explicitly; nothing here reads ambient
//! identity state. Set records are saved at whole-exercise granularity: every
//! save of one exercise's sets deletes the existing records for that
//! (session, exercise) pair and re-inserts from form order, so set numbers
//! are always contiguous from 1. The delete-then-insert pair is not atomic;
//! a failure between the steps can leave partial state, which the design
//! accepts at local-development scale.

use crate::constants::tables;
use crate::models::{
    ExerciseCatalogEntry, NewSession, Session, SessionPatch, SessionWithSets, SetEntry, SetRecord,
    WorkoutDraft,
};
use crate::store::Client;
use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::info;

/// Workout session operations for one user.
#[derive(Clone)]
pub struct WorkoutService {
    client: Client,
    user_id: String,
}

impl WorkoutService {
    /// Bind the service to a backend and an owning-user identifier.
    #[must_use]
    pub fn new(client: Client, user_id: impl Into<String>) -> Self {
        Self {
            client,
            user_id: user_id.into(),
        }
    }

    /// The owning-user identifier this service writes with.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Create a session owned by this user.
    ///
    /// # Errors
    ///
    /// Returns an error on backend failure or when the store returns no
    /// inserted record.
    pub async fn create_session(&self, new: &NewSession) -> Result<Session> {
        let record = json!({
            "user_id": self.user_id,
            "workout_date": new.workout_date,
            "focus": new.focus,
            "notes": new.notes,
        });
        let envelope = self
            .client
            .table(tables::WORKOUTS)
            .insert(record)
            .single()
            .await?;
        envelope
            .decode_single::<Session>()?
            .context("insert returned no session record")
    }

    /// Rewrite a session's metadata (date, focus, notes).
    ///
    /// Returns `None` when no session matches; absence of a match is not an
    /// error in the persistence contract.
    ///
    /// # Errors
    ///
    /// Returns an error on backend failure.
    pub async fn update_session(&self, id: &str, patch: &SessionPatch) -> Result<Option<Session>> {
        let patch = serde_json::to_value(patch).context("serializing session patch")?;
        let envelope = self
            .client
            .table(tables::WORKOUTS)
            .update(patch)
            .eq("id", id)
            .single()
            .await?;
        envelope.decode_single()
    }

    /// Look up one session by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error on backend failure.
    pub async fn get_session(&self, id: &str) -> Result<Option<Session>> {
        let envelope = self
            .client
            .table(tables::WORKOUTS)
            .select("*")
            .eq("id", id)
            .single()
            .await?;
        envelope.decode_single()
    }

    /// List this user's sessions ordered by workout date.
    ///
    /// # Errors
    ///
    /// Returns an error on backend failure.
    pub async fn list_sessions(
        &self,
        ascending: bool,
        limit: Option<usize>,
    ) -> Result<Vec<Session>> {
        let mut query = self
            .client
            .table(tables::WORKOUTS)
            .select("*")
            .eq("user_id", self.user_id.as_str())
            .order("workout_date", ascending);
        if let Some(n) = limit {
            query = query.limit(n);
        }
        query.fetch().await?.decode_rows()
    }

    /// Number of sessions this user has logged.
    ///
    /// # Errors
    ///
    /// Returns an error on backend failure.
    pub async fn session_count(&self) -> Result<usize> {
        Ok(self.list_sessions(true, None).await?.len())
    }

    /// Replace every set record for one exercise within one session.
    ///
    /// Deletes the existing (session, exercise) records, then re-inserts
    /// from `sets` with 1-based set numbers recomputed from position and the
    /// display name denormalized onto each record. An empty `sets` slice
    /// removes the exercise from the session entirely.
    ///
    /// # Errors
    ///
    /// Returns an error on backend failure.
    pub async fn replace_exercise_sets(
        &self,
        session_id: &str,
        exercise_id: &str,
        display_name: &str,
        sets: &[SetEntry],
    ) -> Result<Vec<SetRecord>> {
        self.client
            .table(tables::WORKOUT_EXERCISES)
            .delete()
            .eq("workout_id", session_id)
            .eq("exercise_id", exercise_id)
            .execute()
            .await?
            .into_result()?;

        if sets.is_empty() {
            return Ok(Vec::new());
        }

        let records = set_records(session_id, exercise_id, display_name, sets);
        self.client
            .table(tables::WORKOUT_EXERCISES)
            .insert(records)
            .execute()
            .await?
            .decode_rows()
    }

    /// Save a whole-workout draft: update or create the session, then
    /// replace every exercise's sets in one pass.
    ///
    /// # Errors
    ///
    /// Returns an error on backend failure, or when `session_id` names a
    /// session that does not exist.
    pub async fn save_workout(
        &self,
        session_id: Option<&str>,
        draft: &WorkoutDraft,
    ) -> Result<Session> {
        let session = match session_id {
            Some(id) => {
                let patch = SessionPatch {
                    workout_date: draft.workout_date,
                    focus: draft.focus,
                    notes: draft.notes.clone(),
                };
                let session = match self.update_session(id, &patch).await? {
                    Some(session) => session,
                    None => self
                        .get_session(id)
                        .await?
                        .context("workout not found")?,
                };
                self.client
                    .table(tables::WORKOUT_EXERCISES)
                    .delete()
                    .eq("workout_id", id)
                    .execute()
                    .await?
                    .into_result()?;
                session
            }
            None => {
                self.create_session(&NewSession {
                    workout_date: draft.workout_date,
                    focus: draft.focus,
                    notes: draft.notes.clone(),
                })
                .await?
            }
        };

        let records: Vec<Value> = draft
            .exercises
            .iter()
            .flat_map(|exercise| {
                set_records(
                    &session.id,
                    &exercise.exercise_id,
                    &exercise.display_name,
                    &exercise.sets,
                )
            })
            .collect();
        if !records.is_empty() {
            self.client
                .table(tables::WORKOUT_EXERCISES)
                .insert(records)
                .execute()
                .await?
                .into_result()?;
        }
        Ok(session)
    }

    /// Delete a session and every set record it owns.
    ///
    /// Set records go first so a failure between the steps cannot orphan
    /// them; deleting an already-absent session is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error on backend failure.
    pub async fn delete_session(&self, id: &str) -> Result<()> {
        self.client
            .table(tables::WORKOUT_EXERCISES)
            .delete()
            .eq("workout_id", id)
            .execute()
            .await?
            .into_result()?;
        self.client
            .table(tables::WORKOUTS)
            .delete()
            .eq("id", id)
            .execute()
            .await?
            .into_result()?;
        Ok(())
    }

    /// This user's sessions joined to their set records, for history and
    /// derived views.
    ///
    /// Set records whose denormalized display name is missing are healed
    /// through the exercise catalog and the resolved name is written back.
    ///
    /// # Errors
    ///
    /// Returns an error on backend failure.
    pub async fn sessions_with_sets(&self, ascending: bool) -> Result<Vec<SessionWithSets>> {
        let sessions = self.list_sessions(ascending, None).await?;
        let mut sets: Vec<SetRecord> = self
            .client
            .table(tables::WORKOUT_EXERCISES)
            .select("*")
            .fetch()
            .await?
            .decode_rows()?;

        let healed = self.heal_display_names(&mut sets).await?;
        if healed > 0 {
            info!(healed, "backfilled denormalized exercise names from catalog");
        }

        let mut by_session: HashMap<String, Vec<SetRecord>> = HashMap::new();
        for set in sets {
            by_session
                .entry(set.workout_id.clone())
                .or_default()
                .push(set);
        }

        Ok(sessions
            .into_iter()
            .map(|session| {
                let sets = by_session.remove(&session.id).unwrap_or_default();
                SessionWithSets { session, sets }
            })
            .collect())
    }

    /// Resolve missing display names through the catalog, persisting each
    /// fix. Returns how many records were healed.
    async fn heal_display_names(&self, sets: &mut [SetRecord]) -> Result<usize> {
        if sets.iter().all(|set| set.exercise_name.is_some()) {
            return Ok(0);
        }
        let catalog: Vec<ExerciseCatalogEntry> = self
            .client
            .table(tables::EXERCISES)
            .select("*")
            .fetch()
            .await?
            .decode_rows()?;
        let names: HashMap<&str, &str> = catalog
            .iter()
            .map(|entry| (entry.id.as_str(), entry.name.as_str()))
            .collect();

        let mut healed = 0;
        for set in sets.iter_mut() {
            if set.exercise_name.is_some() {
                continue;
            }
            let Some(name) = names.get(set.exercise_id.as_str()) else {
                continue;
            };
            set.exercise_name = Some((*name).to_owned());
            self.client
                .table(tables::WORKOUT_EXERCISES)
                .update(json!({ "exercise_name": name }))
                .eq("id", set.id.as_str())
                .execute()
                .await?
                .into_result()?;
            healed += 1;
        }
        Ok(healed)
    }
}

/// Build the insert payloads for one exercise's sets, numbering from 1.
fn set_records(
    session_id: &str,
    exercise_id: &str,
    display_name: &str,
    sets: &[SetEntry],
) -> Vec<Value> {
    sets.iter()
        .enumerate()
        .map(|(index, set)| {
            json!({
                "workout_id": session_id,
                "exercise_id": exercise_id,
                "exercise_name": display_name,
                "set_number": index + 1,
                "reps": set.reps,
                "weight": set.weight,
            })
        })
        .collect()
}
