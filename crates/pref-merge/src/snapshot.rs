//! Container state as a token tree
//!
//! The output has the merge input shape, so merging a container's own
//! snapshot back into it changes nothing. Unset preferences render as
//! `null`.

use pref_store::{Container, Entry, Group, Store};
use serde_json::{Map, Value as JsonValue};

/// Render any container
#[must_use]
pub fn to_value<C: Container + ?Sized>(container: &C) -> JsonValue {
    let mut object = Map::new();
    for (name, entry) in container.entries() {
        object.insert(name.to_string(), entry_to_value(entry));
    }
    JsonValue::Object(object)
}

/// Render a group
#[must_use]
pub fn group_to_value(group: &Group) -> JsonValue {
    to_value(group)
}

/// Render a store
#[must_use]
pub fn store_to_value(store: &Store) -> JsonValue {
    to_value(store)
}

fn entry_to_value(entry: Entry<'_>) -> JsonValue {
    match entry {
        Entry::Preference(preference) => preference
            .value_as_boxed()
            .map_or(JsonValue::Null, |value| value.to_json()),
        Entry::Group(group) => group_to_value(group),
        Entry::Store(store) => store_to_value(store),
        Entry::Groups(groups) => groups.iter().map(group_to_value).collect(),
        Entry::Stores(stores) => stores.iter().map(store_to_value).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pref_core::{Preference, PreferenceConfig};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn renders_nested_state_in_order() {
        let mut limits = Group::new();
        limits
            .add(Preference::new(PreferenceConfig::new("max").with_value(10i64)).unwrap())
            .unwrap();

        let mut store = Store::new();
        store.add_preference(Preference::<bool>::named("enabled").unwrap()).unwrap();
        store.add("limits", limits.clone()).unwrap();
        store.add("servers", vec![limits]).unwrap();

        let value = store_to_value(&store);
        assert_eq!(
            value,
            json!({
                "enabled": null,
                "limits": { "max": 10 },
                "servers": [{ "max": 10 }]
            })
        );
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["enabled", "limits", "servers"]);
    }

    #[test]
    fn keys_follow_insertion_order_not_alphabet() {
        let mut store = Store::new();
        store.add_preference(Preference::<i64>::named("zeta").unwrap()).unwrap();
        store.add_preference(Preference::<i64>::named("alpha").unwrap()).unwrap();
        store.add("middle", Group::new()).unwrap();

        let value = store_to_value(&store);
        let keys: Vec<_> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha", "middle"]);
        assert_eq!(keys, store.names().collect::<Vec<_>>());
    }
}
