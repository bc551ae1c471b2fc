// ABOUTME: Unit tests for configuration parsing and backend selection
// ABOUTME: Validates the side-effect-free remote decision rule and the facade fallback
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 ironlog contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use ironlog::config::{AppConfig, Environment, RemoteConfig, StorageConfig};
use ironlog::store::Client;
use serial_test::serial;
use std::env;

fn remote(url: Option<&str>, key: Option<&str>) -> RemoteConfig {
    RemoteConfig {
        url: url.map(str::to_owned),
        service_key: key.map(str::to_owned),
    }
}

#[test]
fn remote_is_configured_only_for_real_http_urls_with_keys() {
    // Absence is the normal local-development case, never an error.
    assert!(!remote(None, None).is_configured());
    assert!(!remote(Some("https://db.example.io"), None).is_configured());
    assert!(!remote(None, Some("service-key")).is_configured());
    assert!(!remote(Some("https://db.example.io"), Some("   ")).is_configured());

    // Recognized placeholder values behave exactly like absence.
    assert!(!remote(Some("https://placeholder.example.io"), Some("k")).is_configured());
    assert!(!remote(Some("https://your-project.example.io"), Some("k")).is_configured());
    assert!(!remote(Some("your_database_url"), Some("k")).is_configured());

    // Only HTTP and HTTPS schemes qualify.
    assert!(!remote(Some("postgres://db.example.io"), Some("k")).is_configured());
    assert!(!remote(Some("not a url"), Some("k")).is_configured());

    assert!(remote(Some("https://db.example.io"), Some("k")).is_configured());
    assert!(remote(Some("http://localhost:54321"), Some("k")).is_configured());
}

#[tokio::test]
async fn unconfigured_facade_falls_back_to_the_local_store() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        environment: Environment::Testing,
        remote: RemoteConfig::default(),
        storage: StorageConfig {
            data_dir: dir.path().to_path_buf(),
        },
    };

    let client = Client::from_config(&config).unwrap();
    assert_eq!(client.backend_info(), "Local (Emulated Store)");
    assert!(client.local_store().is_some());

    // And the fallback backend actually serves operations.
    let envelope = client.table("workouts").select("*").fetch().await.unwrap();
    assert!(envelope.rows().is_empty());
    assert!(envelope.error.is_none());
}

#[test]
fn configured_facade_selects_the_remote_backend() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        environment: Environment::Production,
        remote: remote(Some("https://db.example.io"), Some("service-key")),
        storage: StorageConfig {
            data_dir: dir.path().to_path_buf(),
        },
    };

    // Construction performs no I/O against the remote endpoint.
    let client = Client::from_config(&config).unwrap();
    assert_eq!(client.backend_info(), "Remote (Hosted Backend)");
    assert!(client.local_store().is_none());
}

#[test]
#[serial]
fn from_env_reads_remote_settings() {
    env::set_var("REMOTE_STORE_URL", "https://db.example.io");
    env::set_var("REMOTE_STORE_SERVICE_KEY", "service-key");
    env::set_var("ENVIRONMENT", "production");

    let config = AppConfig::from_env();
    assert_eq!(config.environment, Environment::Production);
    assert!(config.remote.is_configured());

    env::remove_var("REMOTE_STORE_URL");
    env::remove_var("REMOTE_STORE_SERVICE_KEY");
    env::remove_var("ENVIRONMENT");
}

#[test]
#[serial]
fn from_env_defaults_to_unconfigured_development() {
    env::remove_var("REMOTE_STORE_URL");
    env::remove_var("REMOTE_STORE_SERVICE_KEY");
    env::remove_var("ENVIRONMENT");
    env::remove_var("IRONLOG_DATA_DIR");

    let config = AppConfig::from_env();
    assert_eq!(config.environment, Environment::Development);
    assert!(!config.remote.is_configured());
}

#[test]
#[serial]
fn data_dir_override_is_honored() {
    env::set_var("IRONLOG_DATA_DIR", "/tmp/ironlog-test-dir");
    let config = AppConfig::from_env();
    assert_eq!(
        config.storage.data_dir,
        std::path::PathBuf::from("/tmp/ironlog-test-dir")
    );
    env::remove_var("IRONLOG_DATA_DIR");
}
