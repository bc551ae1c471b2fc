// ABOUTME: Configuration module for deployment-specific settings
// ABOUTME: Re-exports the environment-variable driven application config
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 ironlog contributors

//! Application configuration.

pub mod environment;

pub use environment::{AppConfig, Environment, RemoteConfig, StorageConfig};
