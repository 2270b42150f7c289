//! Recursive merge of a token tree into a container
//!
//! The walk follows container order. For each container key present in the
//! input object:
//!
//! - preference + scalar: decode, then write through the validity pipeline
//! - group or store + object: recurse
//! - array of groups or stores + array: merge index-aligned over the common
//!   prefix; the array is never grown or shrunk
//! - any other pairing: skip the key
//!
//! A leaf failure aborts the whole merge. Writes made before the failing key
//! stay applied.

use std::collections::BTreeMap;

use pref_core::DynPreference;
use pref_store::{Container, EntryMut, Group, Store};
use serde_json::Value as JsonValue;

use crate::change::{Change, ChangeSet};
use crate::decode::shape_name;
use crate::error::MergeError;
use crate::options::{MergeOptions, NullPolicy};
use crate::path::KeyPath;

/// Merges token trees into containers
///
/// # Examples
/// ```
/// # use pref_core::{Preference, PreferenceConfig};
/// # use pref_merge::MergeEngine;
/// # use pref_store::Group;
/// # use serde_json::json;
/// let mut group = Group::new();
/// group.add(Preference::new(PreferenceConfig::new("retries").with_value(1i64)).unwrap()).unwrap();
///
/// let engine = MergeEngine::default();
/// let changes = engine.merge(&mut group, &json!({ "retries": 3 })).unwrap().unwrap();
/// assert!(changes.is_changed("retries"));
///
/// // null input yields no entry at all
/// assert!(engine.merge(&mut group, &json!(null)).unwrap().is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MergeEngine {
    options: MergeOptions,
}

impl MergeEngine {
    /// Create engine with options
    #[inline]
    #[must_use]
    pub fn new(options: MergeOptions) -> Self {
        Self { options }
    }

    /// Get options
    #[inline]
    #[must_use]
    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// Merge `node` into `container`
    ///
    /// Returns `None` ("no entry") when `node` is null, not an object, or an
    /// empty object. Otherwise returns the change-set, which may hold only
    /// unchanged entries.
    ///
    /// # Errors
    /// - [`MergeError::UnexpectedShape`] when a preference receives an array
    ///   or object
    /// - [`MergeError::Decode`] when a custom decoder rejects a node
    /// - [`MergeError::Preference`] when a preference rejects the value
    pub fn merge<C>(&self, container: &mut C, node: &JsonValue) -> Result<Option<ChangeSet>, MergeError>
    where
        C: Container + ?Sized,
    {
        self.merge_container(container, node, &KeyPath::root())
    }

    /// Merge `node` into a group
    ///
    /// # Errors
    /// Same as [`MergeEngine::merge`]
    #[inline]
    pub fn merge_group(&self, group: &mut Group, node: &JsonValue) -> Result<Option<ChangeSet>, MergeError> {
        self.merge(group, node)
    }

    /// Merge `node` into a store
    ///
    /// # Errors
    /// Same as [`MergeEngine::merge`]
    #[inline]
    pub fn merge_store(&self, store: &mut Store, node: &JsonValue) -> Result<Option<ChangeSet>, MergeError> {
        self.merge(store, node)
    }

    fn merge_container<C>(
        &self,
        container: &mut C,
        node: &JsonValue,
        path: &KeyPath,
    ) -> Result<Option<ChangeSet>, MergeError>
    where
        C: Container + ?Sized,
    {
        let object = match node {
            JsonValue::Object(object) if !object.is_empty() => object,
            JsonValue::Null | JsonValue::Object(_) => return Ok(None),
            other => {
                tracing::debug!("Skipping {} input for container at '{}'", shape_name(other), path);
                return Ok(None);
            }
        };

        let mut changes = ChangeSet::new();
        for (name, entry) in container.entries_mut() {
            let Some(value) = object.get(name) else {
                continue;
            };
            let path = path.key(name);
            tracing::trace!("Merging '{}' into {}", path, entry.kind());
            if let Some(change) = self.merge_entry(entry, value, &path)? {
                changes.insert(name, change);
            }
        }
        Ok(Some(changes))
    }

    fn merge_entry(
        &self,
        entry: EntryMut<'_>,
        node: &JsonValue,
        path: &KeyPath,
    ) -> Result<Option<Change>, MergeError> {
        match (entry, node) {
            (EntryMut::Preference(preference), _) => self.merge_leaf(preference, node, path),
            (EntryMut::Group(group), JsonValue::Object(_)) => {
                Ok(self.merge_container(group, node, path)?.map(Change::Nested))
            }
            (EntryMut::Store(store), JsonValue::Object(_)) => {
                Ok(self.merge_container(store, node, path)?.map(Change::Nested))
            }
            (EntryMut::Groups(groups), JsonValue::Array(nodes)) => self.merge_indexed(groups, nodes, path),
            (EntryMut::Stores(stores), JsonValue::Array(nodes)) => self.merge_indexed(stores, nodes, path),
            (_, JsonValue::Null) => Ok(None),
            (entry, other) => {
                tracing::debug!(
                    "Skipping '{}': {} cannot take {} input",
                    path,
                    entry.kind(),
                    shape_name(other)
                );
                Ok(None)
            }
        }
    }

    fn merge_indexed<C: Container>(
        &self,
        items: &mut [C],
        nodes: &[JsonValue],
        path: &KeyPath,
    ) -> Result<Option<Change>, MergeError> {
        if items.len() != nodes.len() {
            tracing::warn!(
                "Array '{}' has {} elements but input has {}; merging the first {}",
                path,
                items.len(),
                nodes.len(),
                items.len().min(nodes.len())
            );
        }

        let mut per_index = BTreeMap::new();
        for (index, (item, node)) in items.iter_mut().zip(nodes).enumerate() {
            if let Some(changes) = self.merge_container(item, node, &path.index(index))? {
                per_index.insert(index, changes);
            }
        }
        Ok((!per_index.is_empty()).then_some(Change::Indexed(per_index)))
    }

    fn merge_leaf(
        &self,
        preference: &mut (dyn DynPreference + 'static),
        node: &JsonValue,
        path: &KeyPath,
    ) -> Result<Option<Change>, MergeError> {
        if node.is_null() {
            return Ok(match self.options.null_policy {
                NullPolicy::Ignore => None,
                NullPolicy::Unset => Some(Change::Value(preference.reset())),
            });
        }

        let value = self
            .options
            .decoders
            .decode(preference.value_kind(), node)
            .map_err(|e| MergeError::decode(path.clone(), e))?;
        let changed = preference
            .set_value_from_boxed(Some(value))
            .map_err(|source| MergeError::Preference {
                path: path.clone(),
                source,
            })?;
        Ok(Some(Change::Value(changed)))
    }
}

/// Merge `node` into a group with default options
///
/// # Errors
/// Same as [`MergeEngine::merge`]
pub fn merge_group(group: &mut Group, node: &JsonValue) -> Result<Option<ChangeSet>, MergeError> {
    MergeEngine::default().merge(group, node)
}

/// Merge `node` into a store with default options
///
/// # Errors
/// Same as [`MergeEngine::merge`]
pub fn merge_store(store: &mut Store, node: &JsonValue) -> Result<Option<ChangeSet>, MergeError> {
    MergeEngine::default().merge(store, node)
}
