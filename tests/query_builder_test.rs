// ABOUTME: Unit tests for the query builder emulator's operation contracts
// ABOUTME: Validates insert/update/delete/upsert semantics and envelope shapes
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 ironlog contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use ironlog::store::kv::MemoryKv;
use ironlog::store::Client;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;

fn memory_client() -> Client {
    Client::local_with_medium(Arc::new(MemoryKv::new()))
}

fn ids_of(rows: &[Value]) -> Vec<String> {
    rows.iter()
        .map(|row| row["id"].as_str().unwrap_or_default().to_owned())
        .collect()
}

#[tokio::test]
async fn insert_stamps_nonempty_unique_ids() {
    let client = memory_client();

    for n in 0..3 {
        let envelope = client
            .table("things")
            .insert(json!({ "n": n }))
            .single()
            .await
            .unwrap();
        let record = envelope.data.unwrap();
        assert!(!record["id"].as_str().unwrap().is_empty());
        assert!(record["created_at"].is_string());
        assert!(envelope.error.is_none());
    }

    let envelope = client
        .table("things")
        .insert(json!([{ "n": 3 }, { "n": 4 }, { "n": 5 }]))
        .execute()
        .await
        .unwrap();
    assert_eq!(envelope.rows().len(), 3);

    let all = client.table("things").fetch().await.unwrap();
    let ids = ids_of(all.rows());
    let unique: HashSet<&String> = ids.iter().collect();
    assert_eq!(ids.len(), 6);
    assert_eq!(unique.len(), 6, "identifiers must be unique within a run");
}

#[tokio::test]
async fn insert_preserves_supplied_identifiers() {
    let client = memory_client();
    let envelope = client
        .table("exercises")
        .insert(json!({ "id": "squats", "name": "Squats" }))
        .single()
        .await
        .unwrap();
    assert_eq!(envelope.data.unwrap()["id"], "squats");
}

#[tokio::test]
async fn round_trip_preserves_insertion_order() {
    let client = memory_client();
    for n in 0..5 {
        client
            .table("things")
            .insert(json!({ "n": n }))
            .execute()
            .await
            .unwrap();
    }

    let envelope = client.table("things").select("*").fetch().await.unwrap();
    let ns: Vec<i64> = envelope
        .rows()
        .iter()
        .map(|row| row["n"].as_i64().unwrap())
        .collect();
    assert_eq!(ns, vec![0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn filters_compose_with_logical_and() {
    let client = memory_client();
    client
        .table("sets")
        .insert(json!([
            { "workout_id": "w1", "exercise_id": "squats", "reps": 5 },
            { "workout_id": "w1", "exercise_id": "lunges", "reps": 8 },
            { "workout_id": "w2", "exercise_id": "squats", "reps": 5 },
        ]))
        .execute()
        .await
        .unwrap();

    let envelope = client
        .table("sets")
        .select("*")
        .eq("workout_id", "w1")
        .eq("exercise_id", "squats")
        .fetch()
        .await
        .unwrap();
    assert_eq!(envelope.rows().len(), 1);
    assert_eq!(envelope.rows()[0]["reps"], 5);
}

#[tokio::test]
async fn in_any_matches_value_sets() {
    let client = memory_client();
    client
        .table("muscle_groups")
        .insert(json!([
            { "name": "Chest" },
            { "name": "Back" },
            { "name": "Legs" },
        ]))
        .execute()
        .await
        .unwrap();

    let envelope = client
        .table("muscle_groups")
        .select("*")
        .in_any("name", ["Chest", "Legs"])
        .fetch()
        .await
        .unwrap();
    assert_eq!(envelope.rows().len(), 2);
}

#[tokio::test]
async fn order_and_limit_shape_reads() {
    let client = memory_client();
    client
        .table("workouts")
        .insert(json!([
            { "workout_date": "2024-02-01" },
            { "workout_date": "2024-01-01" },
            { "workout_date": "2024-03-01" },
        ]))
        .execute()
        .await
        .unwrap();

    let envelope = client
        .table("workouts")
        .select("*")
        .order("workout_date", false)
        .limit(2)
        .fetch()
        .await
        .unwrap();
    let dates: Vec<&str> = envelope
        .rows()
        .iter()
        .map(|row| row["workout_date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2024-03-01", "2024-02-01"]);
}

#[tokio::test]
async fn single_resolves_first_match_or_null() {
    let client = memory_client();

    let empty = client.table("workouts").select("*").single().await.unwrap();
    assert!(empty.data.is_none());
    assert!(empty.error.is_none());

    client
        .table("workouts")
        .insert(json!([{ "focus": "Legs" }, { "focus": "Cardio" }]))
        .execute()
        .await
        .unwrap();
    let first = client.table("workouts").select("*").single().await.unwrap();
    assert_eq!(first.data.unwrap()["focus"], "Legs");
}

#[tokio::test]
async fn update_with_zero_matches_is_null_data_null_error() {
    let client = memory_client();
    let envelope = client
        .table("workouts")
        .update(json!({ "focus": "Legs" }))
        .eq("id", "does-not-exist")
        .execute()
        .await
        .unwrap();
    assert!(envelope.data.is_none());
    assert!(envelope.error.is_none());
}

#[tokio::test]
async fn update_shallow_merges_and_stamps_updated_at() {
    let client = memory_client();
    let inserted = client
        .table("workouts")
        .insert(json!({ "focus": "Legs", "notes": "felt strong" }))
        .single()
        .await
        .unwrap()
        .data
        .unwrap();

    let envelope = client
        .table("workouts")
        .update(json!({ "focus": "Cardio" }))
        .eq("id", inserted["id"].as_str().unwrap())
        .single()
        .await
        .unwrap();
    let updated = envelope.data.unwrap();
    assert_eq!(updated["focus"], "Cardio");
    assert_eq!(updated["notes"], "felt strong");
    assert!(updated["updated_at"].is_string());
}

#[tokio::test]
async fn delete_removes_matches_and_resolves_null_null() {
    let client = memory_client();
    client
        .table("sets")
        .insert(json!([
            { "workout_id": "w1" },
            { "workout_id": "w2" },
        ]))
        .execute()
        .await
        .unwrap();

    let envelope = client
        .table("sets")
        .delete()
        .eq("workout_id", "w1")
        .execute()
        .await
        .unwrap();
    assert!(envelope.data.is_none());
    assert!(envelope.error.is_none());

    let remaining = client.table("sets").fetch().await.unwrap();
    assert_eq!(remaining.rows().len(), 1);
    assert_eq!(remaining.rows()[0]["workout_id"], "w2");

    // Deleting nothing is indistinguishable from deleting something.
    let noop = client
        .table("sets")
        .delete()
        .eq("workout_id", "w1")
        .execute()
        .await
        .unwrap();
    assert!(noop.data.is_none());
    assert!(noop.error.is_none());
}

#[tokio::test]
async fn upsert_inserts_then_merges_on_conflict_key() {
    let client = memory_client();

    let first = client
        .table("muscle_groups")
        .upsert(json!({ "id": "chest", "name": "Chest" }), "id")
        .execute()
        .await
        .unwrap();
    assert_eq!(first.data.unwrap()["name"], "Chest");

    let second = client
        .table("muscle_groups")
        .upsert(json!({ "id": "chest", "name": "Chest & Upper" }), "id")
        .execute()
        .await
        .unwrap();
    let merged = second.data.unwrap();
    assert_eq!(merged["name"], "Chest & Upper");
    assert!(merged["updated_at"].is_string());

    let all = client.table("muscle_groups").fetch().await.unwrap();
    assert_eq!(all.rows().len(), 1);
}

#[tokio::test]
async fn upsert_is_idempotent_ignoring_update_timestamp() {
    let client = memory_client();
    let payload = json!({ "id": "legs", "name": "Legs" });

    client
        .table("muscle_groups")
        .upsert(payload.clone(), "id")
        .execute()
        .await
        .unwrap();
    let once = client.table("muscle_groups").fetch().await.unwrap();

    client
        .table("muscle_groups")
        .upsert(payload, "id")
        .execute()
        .await
        .unwrap();
    let twice = client.table("muscle_groups").fetch().await.unwrap();

    assert_eq!(once.rows().len(), twice.rows().len());
    let strip = |row: &Value| {
        let mut row = row.clone();
        row.as_object_mut().unwrap().remove("updated_at");
        row
    };
    assert_eq!(strip(&once.rows()[0]), strip(&twice.rows()[0]));
}

#[tokio::test]
async fn cloned_builders_do_not_share_chain_state() {
    let client = memory_client();
    client
        .table("sets")
        .insert(json!([
            { "workout_id": "w1", "exercise_id": "squats" },
            { "workout_id": "w1", "exercise_id": "lunges" },
        ]))
        .execute()
        .await
        .unwrap();

    let base = client.table("sets").select("*").eq("workout_id", "w1");
    let narrowed = base.clone().eq("exercise_id", "squats");

    assert_eq!(base.fetch().await.unwrap().rows().len(), 2);
    assert_eq!(narrowed.fetch().await.unwrap().rows().len(), 1);
}
