//! Change-sets reported by a merge
//!
//! A [`ChangeSet`] mirrors the shape of the merged input: one entry per key
//! that had input, in container order. A missing key means "no input"; an
//! entry whose flag is `false` means "input present, nothing changed".

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;

use crate::path::{KeyPath, Segment};

/// Outcome for one container key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Change {
    /// Preference leaf; `true` when its value changed
    Value(bool),
    /// Nested group or store
    Nested(ChangeSet),
    /// Array of groups or stores, keyed by index
    Indexed(BTreeMap<usize, ChangeSet>),
}

impl Change {
    /// Check if anything under this entry changed
    #[must_use]
    pub fn is_changed(&self) -> bool {
        match self {
            Self::Value(changed) => *changed,
            Self::Nested(child) => child.has_changes(),
            Self::Indexed(children) => children.values().any(ChangeSet::has_changes),
        }
    }

    /// Nested change-set, if this is a nested entry
    #[inline]
    #[must_use]
    pub fn as_nested(&self) -> Option<&ChangeSet> {
        match self {
            Self::Nested(child) => Some(child),
            _ => None,
        }
    }

    /// Per-index change-sets, if this is an array entry
    #[inline]
    #[must_use]
    pub fn as_indexed(&self) -> Option<&BTreeMap<usize, ChangeSet>> {
        match self {
            Self::Indexed(children) => Some(children),
            _ => None,
        }
    }
}

/// Ordered name → [`Change`] record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChangeSet {
    entries: IndexMap<String, Change>,
}

impl ChangeSet {
    /// Create empty change-set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome for `name`
    pub fn insert(&mut self, name: impl Into<String>, change: Change) {
        self.entries.insert(name.into(), change);
    }

    /// Outcome recorded for `name`
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Change> {
        self.entries.get(name)
    }

    /// Outcome recorded at a nested path
    ///
    /// An index must be followed by a key, since array elements are
    /// change-sets rather than single outcomes.
    #[must_use]
    pub fn at(&self, path: &KeyPath) -> Option<&Change> {
        let (first, rest) = path.segments().split_first()?;
        let Segment::Key(name) = first else {
            return None;
        };
        descend(self.get(name)?, rest)
    }

    /// Check if `name` has input and anything under it changed
    #[inline]
    #[must_use]
    pub fn is_changed(&self, name: &str) -> bool {
        self.get(name).is_some_and(Change::is_changed)
    }

    /// Check if any entry changed, at any depth
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.entries.values().any(Change::is_changed)
    }

    /// Number of recorded entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no entry is recorded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in container order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Change)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Paths of every changed preference, in container order
    #[must_use]
    pub fn changed_paths(&self) -> Vec<KeyPath> {
        let mut out = Vec::new();
        self.collect_changed(&KeyPath::root(), &mut out);
        out
    }

    fn collect_changed(&self, prefix: &KeyPath, out: &mut Vec<KeyPath>) {
        for (name, change) in &self.entries {
            let path = prefix.key(name.as_str());
            match change {
                Change::Value(true) => out.push(path),
                Change::Value(false) => {}
                Change::Nested(child) => child.collect_changed(&path, out),
                Change::Indexed(children) => {
                    for (index, child) in children {
                        child.collect_changed(&path.index(*index), out);
                    }
                }
            }
        }
    }
}

fn descend<'a>(change: &'a Change, rest: &[Segment]) -> Option<&'a Change> {
    match rest {
        [] => Some(change),
        [Segment::Key(key), tail @ ..] => descend(change.as_nested()?.get(key)?, tail),
        [Segment::Index(index), Segment::Key(key), tail @ ..] => {
            descend(change.as_indexed()?.get(index)?.get(key)?, tail)
        }
        [Segment::Index(_), ..] => None,
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = (&'a String, &'a Change);
    type IntoIter = indexmap::map::Iter<'a, String, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
