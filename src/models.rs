// ABOUTME: Core data models for the workout logging domain
// ABOUTME: Defines Session, SetRecord, Focus and the catalog reference types
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 ironlog contributors

//! # Data Models
//!
//! Typed representations of the records both backends move around as JSON.
//!
//! ## Core Models
//!
//! - [`Session`]: one logged workout occasion
//! - [`SetRecord`]: one performed set (reps x weight) within a session
//! - [`Focus`]: the muscle-group grouping a session targets
//! - [`ExerciseCatalogEntry`] / [`MuscleGroup`]: read-only reference data
//!
//! A session's aggregate volume is derived, never stored; see
//! [`crate::analytics::session_volume`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The focus-category label a session targets.
///
/// Serialized as its display string, so records written by either backend
/// read back identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Focus {
    /// Pushing day: chest, triceps, and shoulders.
    #[serde(rename = "Chest/Triceps/Shoulders")]
    ChestTricepsShoulders,
    /// Pulling day: back and biceps.
    #[serde(rename = "Back/Biceps")]
    BackBiceps,
    /// Lower body.
    #[serde(rename = "Legs")]
    Legs,
    /// Compound whole-body session.
    #[serde(rename = "Full Body")]
    FullBody,
    /// Cardiovascular work.
    #[serde(rename = "Cardio")]
    Cardio,
    /// Anything that fits no listed category.
    #[serde(rename = "Other")]
    Other,
}

impl Focus {
    /// Every focus category, in presentation order.
    pub const ALL: [Self; 6] = [
        Self::ChestTricepsShoulders,
        Self::BackBiceps,
        Self::Legs,
        Self::FullBody,
        Self::Cardio,
        Self::Other,
    ];

    /// Display label, identical to the serialized form.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ChestTricepsShoulders => "Chest/Triceps/Shoulders",
            Self::BackBiceps => "Back/Biceps",
            Self::Legs => "Legs",
            Self::FullBody => "Full Body",
            Self::Cardio => "Cardio",
            Self::Other => "Other",
        }
    }

    /// Muscle group names that partition the catalog for this focus.
    ///
    /// `Other` maps to no groups; callers fall back to the built-in catalog.
    #[must_use]
    pub const fn muscle_groups(self) -> &'static [&'static str] {
        match self {
            Self::ChestTricepsShoulders => &["Chest", "Triceps", "Shoulders"],
            Self::BackBiceps => &["Back", "Biceps"],
            Self::Legs => &["Legs"],
            Self::FullBody => &[
                "Chest",
                "Triceps",
                "Shoulders",
                "Back",
                "Biceps",
                "Legs",
                "Core",
            ],
            Self::Cardio => &["Cardio"],
            Self::Other => &[],
        }
    }
}

impl fmt::Display for Focus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Focus {
    type Err = UnknownFocus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|focus| focus.label() == s)
            .ok_or_else(|| UnknownFocus(s.to_owned()))
    }
}

/// Parse error for an unrecognized focus label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown focus category: {0}")]
pub struct UnknownFocus(pub String);

/// One logged workout occasion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Record identifier.
    pub id: String,
    /// Opaque owning-user identifier.
    pub user_id: String,
    /// Calendar date of the workout, `YYYY-MM-DD`.
    pub workout_date: NaiveDate,
    /// Focus category the session targets.
    pub focus: Focus,
    /// Optional free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Stamped by the store on insert.
    pub created_at: DateTime<Utc>,
    /// Stamped by the store on every update; absent until the first one.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields the caller supplies when creating a session; the store stamps
/// identifier and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSession {
    /// Calendar date of the workout.
    pub workout_date: NaiveDate,
    /// Focus category the session targets.
    pub focus: Focus,
    /// Optional free-text notes.
    pub notes: Option<String>,
}

/// The session fields every metadata save rewrites.
///
/// `notes: None` clears the stored notes; the save flows always submit the
/// full trio, matching the form contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPatch {
    /// New calendar date.
    pub workout_date: NaiveDate,
    /// New focus category.
    pub focus: Focus,
    /// New notes, `None` to clear.
    pub notes: Option<String>,
}

/// One performed set within a session, tied to one exercise.
///
/// Despite the stored table name (`workout_exercises`), each record is a
/// single set. The display name is denormalized so history stays readable
/// when the catalog entry behind `exercise_id` is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetRecord {
    /// Record identifier.
    pub id: String,
    /// Owning session identifier.
    pub workout_id: String,
    /// Catalog identifier of the exercise performed.
    pub exercise_id: String,
    /// Denormalized exercise display name, if captured at save time.
    #[serde(default)]
    pub exercise_name: Option<String>,
    /// 1-based position within this (session, exercise) pair.
    pub set_number: u32,
    /// Repetition count.
    pub reps: u32,
    /// Weight in the user's unit.
    pub weight: f64,
    /// Stamped by the store on insert.
    pub created_at: DateTime<Utc>,
}

/// One reps/weight entry as captured by the logging form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetEntry {
    /// Repetition count.
    pub reps: u32,
    /// Weight in the user's unit.
    pub weight: f64,
}

/// One exercise's worth of form state inside a [`WorkoutDraft`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseEntry {
    /// Catalog identifier of the chosen exercise.
    pub exercise_id: String,
    /// Display name captured for denormalized storage.
    pub display_name: String,
    /// Sets in form order; positions become 1-based set numbers.
    pub sets: Vec<SetEntry>,
}

/// The whole-workout form state a single save submits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDraft {
    /// Calendar date of the workout.
    pub workout_date: NaiveDate,
    /// Focus category the session targets.
    pub focus: Focus,
    /// Optional free-text notes.
    pub notes: Option<String>,
    /// Every exercise with its sets, in form order.
    pub exercises: Vec<ExerciseEntry>,
}

/// Read-only exercise catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseCatalogEntry {
    /// Catalog identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Owning muscle group identifier; empty for uncategorized entries.
    #[serde(default)]
    pub muscle_group_id: String,
}

/// Muscle group reference record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MuscleGroup {
    /// Record identifier.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// A session joined to its set records, the shape the derived views consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionWithSets {
    /// The session itself.
    pub session: Session,
    /// Its set records, insertion-ordered.
    pub sets: Vec<SetRecord>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn focus_round_trips_through_label() {
        for focus in Focus::ALL {
            assert_eq!(focus.label().parse::<Focus>(), Ok(focus));
        }
    }

    #[test]
    fn focus_serializes_as_display_string() {
        let json = serde_json::to_string(&Focus::ChestTricepsShoulders).unwrap();
        assert_eq!(json, "\"Chest/Triceps/Shoulders\"");
    }

    #[test]
    fn unknown_focus_is_an_error() {
        assert!("Push Day".parse::<Focus>().is_err());
    }
}
