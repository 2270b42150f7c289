//! End-to-end merge scenarios

use pref_core::{
    decode_custom, encode_custom, ConversionError, PrefValue, Preference, PreferenceConfig,
    PreferenceError, PreferenceValue, ValueKind,
};
use pref_merge::snapshot::store_to_value;
use pref_merge::{
    merge_group, merge_store, Change, KeyPath, MergeEngine, MergeError, MergeOptions, NullPolicy,
};
use pref_store::{Group, Store};
use pref_test_utils::{
    init_tracing, int_pref, limits_group, retries_group, server_group, servers_store,
    settings_store, text_pref,
};
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Window {
    w: u32,
    h: u32,
}

impl PreferenceValue for Window {
    fn kind() -> ValueKind {
        ValueKind::Custom("window")
    }

    fn to_boxed(&self) -> PrefValue {
        encode_custom("window", self)
    }

    fn from_boxed(value: PrefValue) -> Result<Self, ConversionError> {
        decode_custom("window", value)
    }
}

fn int_at(group: &Group, name: &str) -> Option<i64> {
    group.typed::<i64>(name).and_then(|p| p.value().copied())
}

#[test]
fn retries_accepts_member_then_rejects_outsider() {
    init_tracing();
    let mut group = retries_group(1);

    let changes = merge_group(&mut group, &json!({ "retries": 3 })).unwrap().unwrap();
    assert_eq!(serde_json::to_value(&changes).unwrap(), json!({ "retries": true }));
    assert_eq!(int_at(&group, "retries"), Some(3));

    let err = merge_group(&mut group, &json!({ "retries": 4 })).unwrap_err();
    assert!(matches!(
        err,
        MergeError::Preference {
            source: PreferenceError::AllowedValueViolation { .. },
            ..
        }
    ));
    assert_eq!(err.path(), &KeyPath::single("retries"));
    assert_eq!(int_at(&group, "retries"), Some(3));
}

#[test]
fn nested_group_reports_nested_changes() {
    init_tracing();
    let mut store = settings_store();

    let changes = merge_store(&mut store, &json!({ "enabled": true, "limits": { "max": 10 } }))
        .unwrap()
        .unwrap();

    assert_eq!(
        serde_json::to_value(&changes).unwrap(),
        json!({ "enabled": true, "limits": { "max": true } })
    );
    assert_eq!(store.group("limits").and_then(|g| int_at(g, "max")), Some(10));
}

#[test]
fn array_merge_never_resizes() {
    init_tracing();
    let mut store = servers_store();

    let changes = merge_store(&mut store, &json!({ "servers": [{ "x": 1 }, { "x": 2 }, { "x": 3 }] }))
        .unwrap()
        .unwrap();

    let servers = store.groups("servers").unwrap();
    assert_eq!(servers.len(), 2);
    assert_eq!(int_at(&servers[0], "x"), Some(1));
    assert_eq!(int_at(&servers[1], "x"), Some(2));

    let indexed = changes.get("servers").and_then(Change::as_indexed).unwrap();
    assert_eq!(indexed.keys().copied().collect::<Vec<_>>(), [0, 1]);
}

#[test]
fn shorter_input_array_leaves_tail_untouched() {
    let mut store = Store::new();
    store
        .add("servers", vec![server_group(Some(7)), server_group(Some(8))])
        .unwrap();

    merge_store(&mut store, &json!({ "servers": [{ "x": 1 }] })).unwrap();

    let servers = store.groups("servers").unwrap();
    assert_eq!(int_at(&servers[0], "x"), Some(1));
    assert_eq!(int_at(&servers[1], "x"), Some(8));
}

#[test]
fn leaf_shape_mismatch_aborts_remaining_keys() {
    let mut group = Group::new();
    group.add(int_pref("first", None)).unwrap();
    group.add(int_pref("bad", None)).unwrap();
    group.add(int_pref("last", None)).unwrap();

    let err = merge_group(
        &mut group,
        &json!({ "first": 1, "bad": { "nested": true }, "last": 3 }),
    )
    .unwrap_err();

    assert_eq!(
        err,
        MergeError::UnexpectedShape {
            path: KeyPath::single("bad"),
            expected: ValueKind::Integer,
            found: "object",
        }
    );
    assert_eq!(int_at(&group, "first"), Some(1));
    assert_eq!(int_at(&group, "last"), None);
}

#[test]
fn container_shape_mismatch_is_skipped() {
    let mut store = settings_store();
    store.add("servers", vec![server_group(None)]).unwrap();

    let changes = merge_store(
        &mut store,
        &json!({
            "limits": [{ "max": 5 }],
            "servers": { "x": 1 },
            "enabled": true
        }),
    )
    .unwrap()
    .unwrap();

    assert!(changes.get("limits").is_none());
    assert!(changes.get("servers").is_none());
    assert!(changes.is_changed("enabled"));
    assert_eq!(store.group("limits").and_then(|g| int_at(g, "max")), Some(1));
}

#[test]
fn null_and_absent_nodes_yield_no_entry() {
    let mut store = settings_store();
    let before = store_to_value(&store);

    assert_eq!(merge_store(&mut store, &json!(null)), Ok(None));

    let changes = merge_store(&mut store, &json!({ "limits": null, "enabled": null }))
        .unwrap()
        .unwrap();
    assert!(changes.is_empty());
    assert_eq!(store_to_value(&store), before);
}

#[test]
fn nested_input_present_but_unchanged() {
    let mut store = settings_store();
    let changes = merge_store(&mut store, &json!({ "limits": { "max": 1 } }))
        .unwrap()
        .unwrap();

    assert!(!changes.has_changes());
    let nested = changes.get("limits").and_then(Change::as_nested).unwrap();
    assert_eq!(nested.get("max"), Some(&Change::Value(false)));
}

#[test]
fn nested_failure_reports_full_path() {
    let mut nested = Store::new();
    nested.add("limits", limits_group(None)).unwrap();
    let mut store = Store::new();
    store.add("cluster", nested).unwrap();
    store.add("servers", vec![server_group(None)]).unwrap();

    let err = merge_store(&mut store, &json!({ "cluster": { "limits": { "max": "many" } } })).unwrap_err();
    assert_eq!(err.path().to_string(), "cluster.limits.max");
    assert!(matches!(
        err.preference_error(),
        Some(PreferenceError::Converting { .. })
    ));

    let err = merge_store(&mut store, &json!({ "servers": [{ "x": [] }] })).unwrap_err();
    assert_eq!(err.path().to_string(), "servers[0].x");
}

#[test]
fn null_unset_policy_resets_leaf() {
    let mut group = Group::new();
    group.add(text_pref("host", Some("example.org"))).unwrap();

    let engine = MergeEngine::new(MergeOptions::new().with_null_policy(NullPolicy::Unset));
    let changes = engine.merge_group(&mut group, &json!({ "host": null })).unwrap().unwrap();

    assert!(changes.is_changed("host"));
    assert!(!group.get("host").unwrap().is_set());
}

#[test]
fn self_snapshot_merge_changes_nothing() {
    let mut store = settings_store();
    store.add("servers", vec![server_group(Some(1)), server_group(None)]).unwrap();
    merge_store(&mut store, &json!({ "enabled": true, "limits": { "max": 42 } })).unwrap();

    let snapshot = store_to_value(&store);
    let changes = merge_store(&mut store, &snapshot).unwrap().unwrap();

    assert!(!changes.has_changes());
    assert!(changes.changed_paths().is_empty());
    assert_eq!(store_to_value(&store), snapshot);
}

#[test]
fn struct_typed_preference_merges_its_own_snapshot() {
    let mut group = Group::new();
    group
        .add(Preference::new(PreferenceConfig::new("win").with_value(Window { w: 1, h: 2 })).unwrap())
        .unwrap();
    let mut store = Store::new();
    store.add("g", group).unwrap();

    let snapshot = store_to_value(&store);
    assert_eq!(snapshot, json!({ "g": { "win": { "w": 1, "h": 2 } } }));

    let changes = merge_store(&mut store, &snapshot).unwrap().unwrap();
    assert!(!changes.has_changes());
    assert_eq!(store_to_value(&store), snapshot);

    let changes = merge_store(&mut store, &json!({ "g": { "win": { "w": 3, "h": 4 } } }))
        .unwrap()
        .unwrap();
    assert_eq!(changes.changed_paths(), ["g.win".parse::<KeyPath>().unwrap()]);
    assert_eq!(
        store.group("g").and_then(|g| g.typed::<Window>("win")).and_then(Preference::value),
        Some(&Window { w: 3, h: 4 })
    );
}

#[test]
fn struct_typed_preference_rejects_bad_payload() {
    let mut group = Group::new();
    group
        .add(Preference::new(PreferenceConfig::new("win").with_value(Window { w: 1, h: 2 })).unwrap())
        .unwrap();

    let err = merge_group(&mut group, &json!({ "win": { "w": "wide" } })).unwrap_err();
    assert_eq!(err.path(), &KeyPath::single("win"));
    assert!(matches!(
        err.preference_error(),
        Some(PreferenceError::Converting { .. })
    ));
    assert_eq!(
        group.typed::<Window>("win").and_then(Preference::value),
        Some(&Window { w: 1, h: 2 })
    );
}
