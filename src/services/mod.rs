// ABOUTME: Domain services driving the persistence facade
// ABOUTME: Workout CRUD flows and exercise catalog management
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 ironlog contributors

//! Domain services.
//!
//! These are the flows a UI drives. They are written purely against the
//! persistence facade, so the same code runs unchanged whether the backend
//! is the hosted store or the local emulator.

pub mod catalog;
pub mod workouts;

pub use catalog::{CatalogSeedSummary, CatalogService};
pub use workouts::WorkoutService;
