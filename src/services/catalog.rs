// ABOUTME: Exercise catalog and muscle group reference data management
// ABOUTME: Focus-partitioned lookups, idempotent seeding, built-in fallback catalog
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 ironlog contributors

//! The catalog service.
//!
//! The exercise catalog is read-only reference data partitioned by muscle
//! group. Lookups go focus -> muscle group names -> group identifiers ->
//! exercises ordered by name. When the store has no rows for a focus (fresh
//! installation, unseeded backend), the built-in default catalog answers
//! instead so the logging form always has something to offer.
//!
//! Seeding upserts slug-identified records, so running it repeatedly
//! converges on the same store state.

use crate::constants::tables;
use crate::models::{ExerciseCatalogEntry, Focus, MuscleGroup};
use crate::store::Client;
use anyhow::Result;
use serde::Deserialize;
use serde_json::json;

/// Muscle groups the default catalog spans.
const DEFAULT_GROUPS: &[&str] = &[
    "Chest",
    "Triceps",
    "Shoulders",
    "Back",
    "Biceps",
    "Legs",
    "Core",
    "Cardio",
];

/// The built-in exercise catalog: display name and owning muscle group.
const DEFAULT_CATALOG: &[(&str, &str)] = &[
    ("Barbell Bench Press", "Chest"),
    ("Dumbbell Bench Press", "Chest"),
    ("Barbell Incline Bench Press", "Chest"),
    ("Dumbbell Incline Bench Press", "Chest"),
    ("Dumbbell Flyes", "Chest"),
    ("Machine Flyes", "Chest"),
    ("Bench Press", "Chest"),
    ("Dumbbell Shoulder Press", "Shoulders"),
    ("Overhead Press", "Shoulders"),
    ("Front Raises", "Shoulders"),
    ("Lateral Raises", "Shoulders"),
    ("Front x Lateral Raises", "Shoulders"),
    ("Tricep Pushdowns", "Triceps"),
    ("Tricep Rope Pulldowns", "Triceps"),
    ("Deadlift", "Back"),
    ("Pull-ups", "Back"),
    ("Barbell Row", "Back"),
    ("Lat Pulldown", "Back"),
    ("Barbell Curl", "Biceps"),
    ("Dumbbell Curl", "Biceps"),
    ("Squats", "Legs"),
    ("Split Squats", "Legs"),
    ("Leg Press", "Legs"),
    ("Romanian Deadlift", "Legs"),
    ("Leg Curls", "Legs"),
    ("Leg Extensions", "Legs"),
    ("Lunges", "Legs"),
    ("Plank", "Core"),
    ("Running", "Cardio"),
    ("Cycling", "Cardio"),
    ("Rowing", "Cardio"),
];

/// Seeding outcome counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CatalogSeedSummary {
    /// Muscle group records upserted.
    pub muscle_groups: usize,
    /// Exercise records upserted.
    pub exercises: usize,
}

#[derive(Deserialize)]
struct RowId {
    id: String,
}

/// Catalog operations over either backend.
#[derive(Clone)]
pub struct CatalogService {
    client: Client,
}

impl CatalogService {
    /// Bind the service to a backend.
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    /// All muscle groups, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error on backend failure.
    pub async fn muscle_groups(&self) -> Result<Vec<MuscleGroup>> {
        self.client
            .table(tables::MUSCLE_GROUPS)
            .select("*")
            .order("name", true)
            .fetch()
            .await?
            .decode_rows()
    }

    /// Exercises available for a focus category, ordered by name.
    ///
    /// Falls back to the built-in catalog when the focus maps to no muscle
    /// groups (`Other`) or the store has no matching rows.
    ///
    /// # Errors
    ///
    /// Returns an error on backend failure.
    pub async fn exercises_for_focus(&self, focus: Focus) -> Result<Vec<ExerciseCatalogEntry>> {
        let group_names = focus.muscle_groups();
        if group_names.is_empty() {
            return Ok(default_exercises(focus));
        }

        let groups: Vec<RowId> = self
            .client
            .table(tables::MUSCLE_GROUPS)
            .select("id")
            .in_any("name", group_names.iter().copied())
            .fetch()
            .await?
            .decode_rows()?;
        if groups.is_empty() {
            return Ok(default_exercises(focus));
        }

        let ids: Vec<String> = groups.into_iter().map(|group| group.id).collect();
        let exercises: Vec<ExerciseCatalogEntry> = self
            .client
            .table(tables::EXERCISES)
            .select("*")
            .in_any("muscle_group_id", ids)
            .order("name", true)
            .fetch()
            .await?
            .decode_rows()?;
        if exercises.is_empty() {
            return Ok(default_exercises(focus));
        }
        Ok(exercises)
    }

    /// Upsert the built-in muscle groups and exercises into the store.
    ///
    /// Identifiers are name slugs and the conflict key is `id`, so seeding
    /// twice yields the same store state as seeding once.
    ///
    /// # Errors
    ///
    /// Returns an error on backend failure.
    pub async fn seed_catalog(&self) -> Result<CatalogSeedSummary> {
        let mut summary = CatalogSeedSummary::default();

        for name in DEFAULT_GROUPS {
            let record = json!({ "id": slug(name), "name": name });
            self.client
                .table(tables::MUSCLE_GROUPS)
                .upsert(record, "id")
                .execute()
                .await?
                .into_result()?;
            summary.muscle_groups += 1;
        }

        for (name, group) in DEFAULT_CATALOG {
            let record = json!({
                "id": slug(name),
                "name": name,
                "muscle_group_id": slug(group),
            });
            self.client
                .table(tables::EXERCISES)
                .upsert(record, "id")
                .execute()
                .await?
                .into_result()?;
            summary.exercises += 1;
        }

        Ok(summary)
    }
}

/// The built-in exercises for a focus, in catalog order.
#[must_use]
pub fn default_exercises(focus: Focus) -> Vec<ExerciseCatalogEntry> {
    if focus == Focus::Other {
        return vec![ExerciseCatalogEntry {
            id: "builtin-custom".to_owned(),
            name: "Custom Exercise".to_owned(),
            muscle_group_id: String::new(),
        }];
    }
    let groups = focus.muscle_groups();
    DEFAULT_CATALOG
        .iter()
        .filter(|(_, group)| groups.contains(group))
        .map(|(name, group)| ExerciseCatalogEntry {
            id: format!("builtin-{}", slug(name)),
            name: (*name).to_owned(),
            muscle_group_id: slug(group),
        })
        .collect()
}

/// Lowercase, hyphen-separated identifier slug for a display name.
fn slug(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}
