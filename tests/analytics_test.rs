// ABOUTME: Unit tests for the derived-view helpers
// ABOUTME: Validates bucket counts, personal records, volumes, and dashboard tiles
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 ironlog contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use chrono::{NaiveDate, Utc, Weekday};
use chrono::Datelike;
use ironlog::analytics::{
    monthly_volume, personal_records, recent_counts, session_volume, sessions_by_day,
    start_of_week, weekly_volume, WeekStart,
};
use ironlog::models::{Focus, Session, SessionWithSets, SetRecord};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn session(id: &str, workout_date: NaiveDate) -> Session {
    Session {
        id: id.to_owned(),
        user_id: "local-user-jane".to_owned(),
        workout_date,
        focus: Focus::Legs,
        notes: None,
        created_at: Utc::now(),
        updated_at: None,
    }
}

fn set(session_id: &str, exercise: &str, set_number: u32, reps: u32, weight: f64) -> SetRecord {
    SetRecord {
        id: format!("{session_id}-{exercise}-{set_number}"),
        workout_id: session_id.to_owned(),
        exercise_id: exercise.to_lowercase(),
        exercise_name: Some(exercise.to_owned()),
        set_number,
        reps,
        weight,
        created_at: Utc::now(),
    }
}

fn with_sets(session: Session, sets: Vec<SetRecord>) -> SessionWithSets {
    SessionWithSets { session, sets }
}

#[test]
fn weekly_bucketing_of_no_sessions_yields_thirteen_zeroed_buckets() {
    let buckets = weekly_volume(&[], date(2024, 3, 15), WeekStart::Sunday);
    assert_eq!(buckets.len(), 13);
    for bucket in &buckets {
        assert_eq!(bucket.sessions, 0);
        assert!((bucket.volume - 0.0).abs() < f64::EPSILON);
    }
}

#[test]
fn weekly_bucket_count_is_stable_across_weekdays() {
    for day in 10..=16 {
        let buckets = weekly_volume(&[], date(2024, 3, day), WeekStart::Sunday);
        assert_eq!(buckets.len(), 13, "2024-03-{day}");
        let monday_buckets = weekly_volume(&[], date(2024, 3, day), WeekStart::Monday);
        assert_eq!(monday_buckets.len(), 13, "2024-03-{day} monday convention");
    }
}

#[test]
fn weekly_buckets_attribute_sessions_to_their_week() {
    let now = date(2024, 3, 15);
    let current_week = with_sets(
        session("w1", date(2024, 3, 13)),
        vec![set("w1", "Squats", 1, 5, 100.0)],
    );
    let previous_week = with_sets(
        session("w2", date(2024, 3, 6)),
        vec![set("w2", "Squats", 1, 5, 80.0)],
    );
    let out_of_window = with_sets(session("w3", date(2023, 11, 1)), Vec::new());

    let buckets = weekly_volume(
        &[current_week, previous_week, out_of_window],
        now,
        WeekStart::Sunday,
    );
    assert_eq!(buckets.len(), 13);

    let last = buckets.last().unwrap();
    assert_eq!(last.sessions, 1);
    assert!((last.volume - 500.0).abs() < f64::EPSILON);

    let second_to_last = &buckets[buckets.len() - 2];
    assert_eq!(second_to_last.sessions, 1);
    assert!((second_to_last.volume - 400.0).abs() < f64::EPSILON);

    let total: u32 = buckets.iter().map(|b| b.sessions).sum();
    assert_eq!(total, 2, "out-of-window sessions are excluded");
}

#[test]
fn monthly_bucketing_of_no_sessions_yields_seven_zeroed_buckets() {
    let buckets = monthly_volume(&[], date(2024, 3, 15));
    assert_eq!(buckets.len(), 7);
    assert_eq!(buckets.first().unwrap().start, date(2023, 9, 1));
    assert_eq!(buckets.last().unwrap().start, date(2024, 3, 1));
    for bucket in &buckets {
        assert_eq!(bucket.sessions, 0);
    }
}

#[test]
fn monthly_buckets_include_the_current_partial_month() {
    let now = date(2024, 3, 15);
    let in_current = with_sets(
        session("w1", date(2024, 3, 2)),
        vec![set("w1", "Squats", 1, 10, 50.0)],
    );
    let buckets = monthly_volume(&[in_current], now);
    let last = buckets.last().unwrap();
    assert_eq!(last.label, "Mar 2024");
    assert_eq!(last.sessions, 1);
    assert!((last.volume - 500.0).abs() < f64::EPSILON);
}

#[test]
fn start_of_week_respects_the_convention() {
    // 2024-03-15 is a Friday.
    let friday = date(2024, 3, 15);
    assert_eq!(friday.weekday(), Weekday::Fri);
    assert_eq!(start_of_week(friday, WeekStart::Sunday), date(2024, 3, 10));
    assert_eq!(start_of_week(friday, WeekStart::Monday), date(2024, 3, 11));
}

#[test]
fn personal_records_keep_only_the_max_weight_per_pair() {
    let sessions = vec![
        with_sets(
            session("w1", date(2024, 1, 8)),
            vec![set("w1", "Bench Press", 1, 8, 100.0)],
        ),
        with_sets(
            session("w2", date(2024, 2, 12)),
            vec![set("w2", "Bench Press", 1, 8, 120.0)],
        ),
    ];

    let records = personal_records(&sessions);
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.exercise, "Bench Press");
    assert_eq!(record.reps, 8);
    assert!((record.weight - 120.0).abs() < f64::EPSILON);
    assert_eq!(record.date, date(2024, 2, 12));
}

#[test]
fn personal_records_sort_by_weight_and_truncate_to_ten() {
    let sets = (0..12)
        .map(|n| {
            set(
                "w1",
                &format!("Exercise {n}"),
                1,
                5,
                f64::from(n) * 10.0 + 10.0,
            )
        })
        .collect();
    let sessions = vec![with_sets(session("w1", date(2024, 1, 8)), sets)];

    let records = personal_records(&sessions);
    assert_eq!(records.len(), 10);
    assert!(records
        .windows(2)
        .all(|pair| pair[0].weight >= pair[1].weight));
    assert!((records[0].weight - 120.0).abs() < f64::EPSILON);
}

#[test]
fn personal_records_skip_unnamed_sets() {
    let mut unnamed = set("w1", "Squats", 1, 5, 100.0);
    unnamed.exercise_name = None;
    let sessions = vec![with_sets(session("w1", date(2024, 1, 8)), vec![unnamed])];
    assert!(personal_records(&sessions).is_empty());
}

#[test]
fn legs_scenario_volume_is_2075() {
    let joined = with_sets(
        session("w1", date(2024, 1, 1)),
        vec![
            set("w1", "Squats", 1, 5, 135.0),
            set("w1", "Squats", 2, 5, 135.0),
            set("w1", "Squats", 3, 5, 145.0),
        ],
    );
    assert!((session_volume(&joined) - 2075.0).abs() < f64::EPSILON);
}

#[test]
fn empty_session_volume_is_zero() {
    let joined = with_sets(session("w1", date(2024, 1, 1)), Vec::new());
    assert!((session_volume(&joined) - 0.0).abs() < f64::EPSILON);
}

#[test]
fn recent_counts_window_by_week_and_month() {
    let today = date(2024, 3, 15);
    let sessions = vec![
        session("w1", date(2024, 3, 15)),
        session("w2", date(2024, 3, 9)),
        session("w3", date(2024, 3, 1)),
        session("w4", date(2024, 2, 28)),
    ];

    let summary = recent_counts(&sessions, today);
    assert_eq!(summary.total, 4);
    assert_eq!(summary.this_week, 2);
    assert_eq!(summary.this_month, 3);
}

#[test]
fn recent_counts_of_no_sessions_is_zeroed() {
    let summary = recent_counts(&[], date(2024, 3, 15));
    assert_eq!(summary.total, 0);
    assert_eq!(summary.this_week, 0);
    assert_eq!(summary.this_month, 0);
}

#[test]
fn sessions_by_day_groups_one_calendar_month() {
    let sessions = vec![
        session("w1", date(2024, 3, 5)),
        session("w2", date(2024, 3, 5)),
        session("w3", date(2024, 3, 20)),
        session("w4", date(2024, 2, 5)),
    ];

    let days = sessions_by_day(&sessions, 2024, 3);
    assert_eq!(days.len(), 2);
    assert_eq!(days.get(&5).unwrap().len(), 2);
    assert_eq!(days.get(&20).unwrap().len(), 1);
    assert!(days.get(&28).is_none());
}
