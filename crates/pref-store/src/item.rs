//! Store items

use std::fmt;

use pref_core::{DynPreference, Preference, PreferenceValue};
use serde::Serialize;

use crate::group::Group;
use crate::store::Store;

/// One entry of a [`Store`]
#[derive(Debug, Clone)]
pub enum Item {
    /// Single preference
    Preference(Box<dyn DynPreference>),
    /// Nested group
    Group(Group),
    /// Nested store
    Store(Store),
    /// Array of groups
    Groups(Vec<Group>),
    /// Array of stores
    Stores(Vec<Store>),
}

impl Item {
    /// Variant tag
    #[inline]
    #[must_use]
    pub fn variant(&self) -> ItemKind {
        match self {
            Self::Preference(_) => ItemKind::Preference,
            Self::Group(_) => ItemKind::Group,
            Self::Store(_) => ItemKind::Store,
            Self::Groups(_) => ItemKind::Groups,
            Self::Stores(_) => ItemKind::Stores,
        }
    }
}

impl From<Box<dyn DynPreference>> for Item {
    fn from(preference: Box<dyn DynPreference>) -> Self {
        Self::Preference(preference)
    }
}

impl<T: PreferenceValue> From<Preference<T>> for Item {
    fn from(preference: Preference<T>) -> Self {
        Self::Preference(Box::new(preference))
    }
}

impl From<Group> for Item {
    fn from(group: Group) -> Self {
        Self::Group(group)
    }
}

impl From<Store> for Item {
    fn from(store: Store) -> Self {
        Self::Store(store)
    }
}

impl From<Vec<Group>> for Item {
    fn from(groups: Vec<Group>) -> Self {
        Self::Groups(groups)
    }
}

impl From<Vec<Store>> for Item {
    fn from(stores: Vec<Store>) -> Self {
        Self::Stores(stores)
    }
}

/// Shape of an [`Item`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Single preference
    Preference,
    /// Nested group
    Group,
    /// Nested store
    Store,
    /// Array of groups
    Groups,
    /// Array of stores
    Stores,
}

impl ItemKind {
    /// Check if the shape is an array
    #[inline]
    #[must_use]
    pub fn is_array(self) -> bool {
        matches!(self, Self::Groups | Self::Stores)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Preference => "preference",
            Self::Group => "group",
            Self::Store => "store",
            Self::Groups => "array of groups",
            Self::Stores => "array of stores",
        };
        write!(f, "{s}")
    }
}
