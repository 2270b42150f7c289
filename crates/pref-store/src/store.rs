//! Ordered, nestable stores

use indexmap::IndexMap;
use pref_core::name::normalize_name;
use pref_core::{DynPreference, Preference, PreferenceValue};

use crate::error::ContainerError;
use crate::group::Group;
use crate::item::Item;
use crate::names::Names;

/// Ordered name → [`Item`] mapping
///
/// Generalizes [`Group`] to arbitrary nesting: an item is a preference, a
/// group, a store, or an array of groups or stores.
#[derive(Debug, Clone, Default)]
pub struct Store {
    items: IndexMap<String, Item>,
}

impl Store {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item under `name`
    ///
    /// # Errors
    /// - [`ContainerError::InvalidName`] when `name` is invalid
    /// - [`ContainerError::DuplicateName`] when `name` is already present
    /// - [`ContainerError::NameMismatch`] when a preference has another name
    pub fn add(&mut self, name: &str, item: impl Into<Item>) -> Result<(), ContainerError> {
        let (key, item) = Self::checked(name, item.into())?;
        if self.items.contains_key(&key) {
            return Err(ContainerError::DuplicateName { name: key });
        }
        self.items.insert(key, item);
        Ok(())
    }

    /// Append a preference under its own name
    ///
    /// # Errors
    /// Same as [`Store::add`]
    pub fn add_preference(
        &mut self,
        preference: impl DynPreference + 'static,
    ) -> Result<(), ContainerError> {
        let name = preference.name().to_string();
        let boxed: Box<dyn DynPreference> = Box::new(preference);
        self.add(&name, boxed)
    }

    /// Replace the item stored under `name`, keeping its position
    ///
    /// The replacement may be a different variant. Returns the replaced item.
    ///
    /// # Errors
    /// - [`ContainerError::InvalidName`] when `name` is invalid
    /// - [`ContainerError::NameMismatch`] when a preference has another name
    /// - [`ContainerError::NotFound`] when `name` is absent
    pub fn set(&mut self, name: &str, item: impl Into<Item>) -> Result<Item, ContainerError> {
        let (key, item) = Self::checked(name, item.into())?;
        match self.items.get_mut(&key) {
            Some(slot) => Ok(std::mem::replace(slot, item)),
            None => Err(ContainerError::NotFound { name: key }),
        }
    }

    fn checked(name: &str, item: Item) -> Result<(String, Item), ContainerError> {
        let key = normalize_name(name)?;
        if let Item::Preference(preference) = &item {
            if preference.name() != key {
                return Err(ContainerError::NameMismatch {
                    key,
                    name: preference.name().to_string(),
                });
            }
        }
        Ok((key, item))
    }

    /// Get item by name
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Item> {
        self.items.get(name)
    }

    /// Get mutable item by name
    #[inline]
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Item> {
        self.items.get_mut(name)
    }

    /// Preference stored under `name`
    #[must_use]
    pub fn preference(&self, name: &str) -> Option<&(dyn DynPreference + 'static)> {
        match self.get(name)? {
            Item::Preference(p) => Some(&**p),
            _ => None,
        }
    }

    /// Mutable preference stored under `name`
    pub fn preference_mut(&mut self, name: &str) -> Option<&mut (dyn DynPreference + 'static)> {
        match self.get_mut(name)? {
            Item::Preference(p) => Some(&mut **p),
            _ => None,
        }
    }

    /// Preference stored under `name` with its declared value type
    #[inline]
    #[must_use]
    pub fn typed<T: PreferenceValue>(&self, name: &str) -> Option<&Preference<T>> {
        self.preference(name)?.downcast_ref()
    }

    /// Mutable variant of [`Store::typed`]
    #[inline]
    pub fn typed_mut<T: PreferenceValue>(&mut self, name: &str) -> Option<&mut Preference<T>> {
        self.preference_mut(name)?.downcast_mut()
    }

    /// Group stored under `name`
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&Group> {
        match self.get(name)? {
            Item::Group(g) => Some(g),
            _ => None,
        }
    }

    /// Mutable group stored under `name`
    pub fn group_mut(&mut self, name: &str) -> Option<&mut Group> {
        match self.get_mut(name)? {
            Item::Group(g) => Some(g),
            _ => None,
        }
    }

    /// Store stored under `name`
    #[must_use]
    pub fn store(&self, name: &str) -> Option<&Store> {
        match self.get(name)? {
            Item::Store(s) => Some(s),
            _ => None,
        }
    }

    /// Mutable store stored under `name`
    pub fn store_mut(&mut self, name: &str) -> Option<&mut Store> {
        match self.get_mut(name)? {
            Item::Store(s) => Some(s),
            _ => None,
        }
    }

    /// Group array stored under `name`
    #[must_use]
    pub fn groups(&self, name: &str) -> Option<&[Group]> {
        match self.get(name)? {
            Item::Groups(g) => Some(g.as_slice()),
            _ => None,
        }
    }

    /// Store array stored under `name`
    #[must_use]
    pub fn stores(&self, name: &str) -> Option<&[Store]> {
        match self.get(name)? {
            Item::Stores(s) => Some(s.as_slice()),
            _ => None,
        }
    }

    /// Remove item, keeping the order of the remaining ones
    #[inline]
    pub fn remove(&mut self, name: &str) -> Option<Item> {
        self.items.shift_remove(name)
    }

    /// Check if name is present
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    /// Number of items
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Names in insertion order
    #[inline]
    #[must_use]
    pub fn names(&self) -> Names<'_> {
        Names::new(self.items.keys())
    }

    /// Iterate items in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Item)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate items mutably in insertion order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Item)> {
        self.items.iter_mut().map(|(k, v)| (k.as_str(), v))
    }
}
