// ABOUTME: Pure derived-view helpers for progress charts and dashboard tiles
// ABOUTME: Weekly/monthly bucketing, personal records, and activity summaries
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 ironlog contributors

//! # Derived Views
//!
//! Total, pure functions over joined session data. Nothing here touches a
//! store, every function accepts borrowed input and returns owned output,
//! and empty input yields empty or zeroed structures rather than errors.
//!
//! Bucketing follows the progress-chart conventions: a trailing window of
//! full calendar periods plus the current partial one, with empty periods
//! present at zero so charts keep a stable axis.

use crate::constants::limits;
use crate::models::{Session, SessionWithSets};
use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// First day of the week, per the caller's locale convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    /// Weeks start on Sunday.
    #[default]
    Sunday,
    /// Weeks start on Monday.
    Monday,
}

/// One calendar-period bucket in a volume chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodBucket {
    /// First day of the period.
    pub start: NaiveDate,
    /// Axis label, e.g. `"Mar 3"` or `"Mar 2024"`.
    pub label: String,
    /// Summed session volume within the period.
    pub volume: f64,
    /// Number of sessions within the period.
    pub sessions: u32,
}

/// The best recorded set for one (exercise, rep count) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalRecord {
    /// Exercise display name.
    pub exercise: String,
    /// Repetition count the record was set at.
    pub reps: u32,
    /// Maximum weight lifted for that rep count.
    pub weight: f64,
    /// Date of the session the record was set in.
    pub date: NaiveDate,
}

/// Dashboard tile counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActivitySummary {
    /// All sessions on record.
    pub total: usize,
    /// Sessions dated within the last seven days, inclusive of today.
    pub this_week: usize,
    /// Sessions dated since the first of the current month.
    pub this_month: usize,
}

/// A session's aggregate volume: sum over its sets of reps x weight.
#[must_use]
pub fn session_volume(session: &SessionWithSets) -> f64 {
    session
        .sets
        .iter()
        .map(|set| f64::from(set.reps) * set.weight)
        .sum()
}

/// First day of the week containing `date`.
#[must_use]
pub fn start_of_week(date: NaiveDate, week_start: WeekStart) -> NaiveDate {
    let offset = match week_start {
        WeekStart::Sunday => date.weekday().num_days_from_sunday(),
        WeekStart::Monday => date.weekday().num_days_from_monday(),
    };
    date - Duration::days(i64::from(offset))
}

/// Bucket sessions into the trailing twelve calendar weeks plus the current
/// one: always exactly thirteen buckets, empty weeks included at zero.
#[must_use]
pub fn weekly_volume(
    sessions: &[SessionWithSets],
    now: NaiveDate,
    week_start: WeekStart,
) -> Vec<PeriodBucket> {
    let anchor = start_of_week(now - Duration::weeks(limits::TRAILING_WEEKS), week_start);
    let mut buckets = Vec::new();
    let mut week = anchor;
    while week <= now {
        let week_end = week + Duration::days(6);
        buckets.push(bucket_for(
            sessions,
            week,
            week_end,
            week.format("%b %-d").to_string(),
        ));
        week += Duration::days(7);
    }
    buckets
}

/// Bucket sessions into the trailing six calendar months plus the current
/// partial one: always exactly seven buckets, empty months included at zero.
#[must_use]
pub fn monthly_volume(sessions: &[SessionWithSets], now: NaiveDate) -> Vec<PeriodBucket> {
    let anchor = now
        .checked_sub_months(Months::new(limits::TRAILING_MONTHS))
        .and_then(|date| date.with_day(1))
        .unwrap_or(now);
    let mut buckets = Vec::new();
    let mut month = anchor;
    while month <= now {
        let next = match month.checked_add_months(Months::new(1)) {
            Some(next) if next > month => next,
            _ => break,
        };
        buckets.push(bucket_for(
            sessions,
            month,
            next - Duration::days(1),
            month.format("%b %Y").to_string(),
        ));
        month = next;
    }
    buckets
}

fn bucket_for(
    sessions: &[SessionWithSets],
    start: NaiveDate,
    end: NaiveDate,
    label: String,
) -> PeriodBucket {
    let members = sessions
        .iter()
        .filter(|s| s.session.workout_date >= start && s.session.workout_date <= end);
    let mut volume = 0.0;
    let mut count = 0u32;
    for member in members {
        volume += session_volume(member);
        count += 1;
    }
    PeriodBucket {
        start,
        label,
        volume,
        sessions: count,
    }
}

/// Extract maximum-weight personal records per (exercise name, rep count)
/// pair, sorted by weight descending and truncated to the top ten.
///
/// Sets without a resolvable display name are skipped; ties keep the
/// earliest record.
#[must_use]
pub fn personal_records(sessions: &[SessionWithSets]) -> Vec<PersonalRecord> {
    let mut best: HashMap<(String, u32), PersonalRecord> = HashMap::new();
    for session in sessions {
        for set in &session.sets {
            let Some(name) = set.exercise_name.as_deref() else {
                continue;
            };
            let key = (name.to_owned(), set.reps);
            let candidate = PersonalRecord {
                exercise: name.to_owned(),
                reps: set.reps,
                weight: set.weight,
                date: session.session.workout_date,
            };
            best.entry(key)
                .and_modify(|record| {
                    if set.weight > record.weight {
                        *record = candidate.clone();
                    }
                })
                .or_insert(candidate);
        }
    }
    let mut records: Vec<PersonalRecord> = best.into_values().collect();
    records.sort_by(|a, b| {
        b.weight
            .partial_cmp(&a.weight)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    records.truncate(limits::PERSONAL_RECORD_LIMIT);
    records
}

/// Dashboard tile counts over bare sessions.
#[must_use]
pub fn recent_counts(sessions: &[Session], today: NaiveDate) -> ActivitySummary {
    let week_ago = today - Duration::days(7);
    let month_start = today.with_day(1).unwrap_or(today);
    let this_week = sessions
        .iter()
        .filter(|s| s.workout_date >= week_ago && s.workout_date <= today)
        .count();
    let this_month = sessions
        .iter()
        .filter(|s| s.workout_date >= month_start && s.workout_date <= today)
        .count();
    ActivitySummary {
        total: sessions.len(),
        this_week,
        this_month,
    }
}

/// Group one calendar month's sessions by day-of-month for the calendar view.
#[must_use]
pub fn sessions_by_day(sessions: &[Session], year: i32, month: u32) -> BTreeMap<u32, Vec<Session>> {
    let mut days: BTreeMap<u32, Vec<Session>> = BTreeMap::new();
    for session in sessions {
        if session.workout_date.year() == year && session.workout_date.month() == month {
            days.entry(session.workout_date.day())
                .or_default()
                .push(session.clone());
        }
    }
    days
}
