//! Testing utilities for the preference store workspace
//!
//! Shared fixtures and tracing setup.

#![allow(missing_docs)]

use pref_core::{Preference, PreferenceConfig};
use pref_store::{Group, Store};
use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber honoring `RUST_LOG`; later calls are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_test_writer()
        .try_init();
}

/// `retries`: integer restricted to `{1, 3, 5}`
pub fn retries(value: i64) -> Preference<i64> {
    Preference::new(
        PreferenceConfig::new("retries")
            .with_allowed_values([1, 3, 5])
            .disallow_undefined_values()
            .with_value(value),
    )
    .unwrap()
}

pub fn bool_pref(name: &str, value: Option<bool>) -> Preference<bool> {
    let mut config = PreferenceConfig::new(name);
    config.value = value;
    Preference::new(config).unwrap()
}

pub fn int_pref(name: &str, value: Option<i64>) -> Preference<i64> {
    let mut config = PreferenceConfig::new(name);
    config.value = value;
    Preference::new(config).unwrap()
}

pub fn text_pref(name: &str, value: Option<&str>) -> Preference<String> {
    let mut config = PreferenceConfig::new(name);
    config.value = value.map(str::to_string);
    Preference::new(config).unwrap()
}

/// Group holding `retries` alone
pub fn retries_group(value: i64) -> Group {
    let mut group = Group::new();
    group.add(retries(value)).unwrap();
    group
}

/// Group with one integer `max`
pub fn limits_group(max: Option<i64>) -> Group {
    let mut group = Group::new();
    group.add(int_pref("max", max)).unwrap();
    group
}

/// Group with one integer `x`
pub fn server_group(x: Option<i64>) -> Group {
    let mut group = Group::new();
    group.add(int_pref("x", x)).unwrap();
    group
}

/// Store with `enabled` and nested group `limits.max`
pub fn settings_store() -> Store {
    let mut store = Store::new();
    store.add_preference(bool_pref("enabled", Some(false))).unwrap();
    store.add("limits", limits_group(Some(1))).unwrap();
    store
}

/// Store with `servers`, an array of two groups
pub fn servers_store() -> Store {
    let mut store = Store::new();
    store
        .add("servers", vec![server_group(None), server_group(None)])
        .unwrap();
    store
}
