//! Ordered groups of preferences

use indexmap::IndexMap;
use pref_core::name::normalize_name;
use pref_core::{DynPreference, Preference, PreferenceValue};

use crate::error::ContainerError;
use crate::names::Names;

/// Ordered name → preference mapping
///
/// Keys are the preferences' own names. Insertion order is kept and is the
/// enumeration order of [`Group::names`] and [`Group::iter`].
///
/// # Examples
/// ```
/// # use pref_core::Preference;
/// # use pref_store::Group;
/// let mut group = Group::new();
/// group.add(Preference::<bool>::named("enabled").unwrap()).unwrap();
/// group.add(Preference::<i64>::named("retries").unwrap()).unwrap();
/// assert_eq!(group.names().collect::<Vec<_>>(), ["enabled", "retries"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Group {
    items: IndexMap<String, Box<dyn DynPreference>>,
}

impl Group {
    /// Create empty group
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a preference
    ///
    /// # Errors
    /// - [`ContainerError::InvalidName`] when the preference name is invalid
    /// - [`ContainerError::DuplicateName`] when the name is already present
    pub fn add(&mut self, preference: impl DynPreference + 'static) -> Result<(), ContainerError> {
        self.add_boxed(Box::new(preference))
    }

    /// Append an already boxed preference
    ///
    /// # Errors
    /// Same as [`Group::add`]
    pub fn add_boxed(&mut self, preference: Box<dyn DynPreference>) -> Result<(), ContainerError> {
        let name = normalize_name(preference.name())?;
        if self.items.contains_key(&name) {
            return Err(ContainerError::DuplicateName { name });
        }
        self.items.insert(name, preference);
        Ok(())
    }

    /// Replace the preference stored under `name`, keeping its position
    ///
    /// Returns the replaced preference.
    ///
    /// # Errors
    /// - [`ContainerError::InvalidName`] when `name` is invalid
    /// - [`ContainerError::NameMismatch`] when the preference has another name
    /// - [`ContainerError::NotFound`] when `name` is absent
    pub fn set(
        &mut self,
        name: &str,
        preference: Box<dyn DynPreference>,
    ) -> Result<Box<dyn DynPreference>, ContainerError> {
        let key = normalize_name(name)?;
        if preference.name() != key {
            return Err(ContainerError::NameMismatch {
                key,
                name: preference.name().to_string(),
            });
        }
        match self.items.get_mut(&key) {
            Some(slot) => Ok(std::mem::replace(slot, preference)),
            None => Err(ContainerError::NotFound { name: key }),
        }
    }

    /// Get preference by name
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&(dyn DynPreference + 'static)> {
        self.items.get(name).map(|p| &**p)
    }

    /// Get mutable preference by name
    #[inline]
    pub fn get_mut(&mut self, name: &str) -> Option<&mut (dyn DynPreference + 'static)> {
        self.items.get_mut(name).map(|p| &mut **p)
    }

    /// Get preference by name with its declared value type
    ///
    /// Returns `None` when absent or declared with another type.
    #[inline]
    #[must_use]
    pub fn typed<T: PreferenceValue>(&self, name: &str) -> Option<&Preference<T>> {
        self.get(name)?.downcast_ref()
    }

    /// Mutable variant of [`Group::typed`]
    #[inline]
    pub fn typed_mut<T: PreferenceValue>(&mut self, name: &str) -> Option<&mut Preference<T>> {
        self.get_mut(name)?.downcast_mut()
    }

    /// Remove preference, keeping the order of the remaining ones
    #[inline]
    pub fn remove(&mut self, name: &str) -> Option<Box<dyn DynPreference>> {
        self.items.shift_remove(name)
    }

    /// Check if name is present
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    /// Number of preferences
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

    /// Iterate preferences in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &(dyn DynPreference + 'static))> {
        self.items.iter().map(|(k, v)| (k.as_str(), &**v))
    }

    /// Iterate preferences mutably in insertion order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut (dyn DynPreference + 'static))> {
        self.items.iter_mut().map(|(k, v)| (k.as_str(), &mut **v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pref_core::{PrefValue, PreferenceConfig};
    use pretty_assertions::assert_eq;

    fn sample() -> Group {
        let mut group = Group::new();
        group.add(Preference::<bool>::named("enabled").unwrap()).unwrap();
        group
            .add(Preference::new(PreferenceConfig::new("retries").with_value(3i64)).unwrap())
            .unwrap();
        group.add(Preference::<String>::named("host").unwrap()).unwrap();
        group
    }

    #[test]
    fn add_keeps_insertion_order() {
        let group = sample();
        assert_eq!(group.names().collect::<Vec<_>>(), ["enabled", "retries", "host"]);
        assert_eq!(group.len(), 3);
    }

    #[test]
    fn duplicate_rejected() {
        let mut group = sample();
        let err = group.add(Preference::<u8>::named("retries").unwrap()).unwrap_err();
        assert_eq!(err, ContainerError::DuplicateName { name: "retries".into() });
        assert_eq!(group.typed::<i64>("retries").and_then(Preference::value), Some(&3));
    }

    #[test]
    fn set_replaces_in_place() {
        let mut group = sample();
        let replacement = Preference::new(PreferenceConfig::new("retries").with_value(5i64)).unwrap();
        let old = group.set("retries", Box::new(replacement)).unwrap();

        assert_eq!(old.value_as_boxed(), Some(PrefValue::Integer(3)));
        assert_eq!(group.names().collect::<Vec<_>>(), ["enabled", "retries", "host"]);
        assert_eq!(group.get("retries").unwrap().value_as_boxed(), Some(PrefValue::Integer(5)));
    }

    #[test]
    fn set_checks_key_and_presence() {
        let mut group = sample();
        let err = group
            .set("enabled", Box::new(Preference::<bool>::named("other").unwrap()))
            .unwrap_err();
        assert!(matches!(err, ContainerError::NameMismatch { .. }));

        let err = group
            .set("missing", Box::new(Preference::<bool>::named("missing").unwrap()))
            .unwrap_err();
        assert_eq!(err, ContainerError::NotFound { name: "missing".into() });

        let err = group.set("  ", Box::new(Preference::<bool>::named("x").unwrap())).unwrap_err();
        assert!(matches!(err, ContainerError::InvalidName(_)));
    }

    #[test]
    fn typed_access_checks_declared_type() {
        let mut group = sample();
        assert!(group.typed::<u8>("retries").is_none());
        group.typed_mut::<i64>("retries").unwrap().set_value(Some(7)).unwrap();
        assert_eq!(group.typed::<i64>("retries").and_then(Preference::value), Some(&7));
    }

    #[test]
    fn remove_keeps_order_of_rest() {
        let mut group = sample();
        assert!(group.remove("enabled").is_some());
        assert!(group.remove("enabled").is_none());
        assert_eq!(group.names().collect::<Vec<_>>(), ["retries", "host"]);
    }

    #[test]
    fn names_are_restartable() {
        let group = sample();
        let names = group.names();
        assert_eq!(names.len(), 3);
        let again = names.clone();
        assert_eq!(names.count(), again.count());
    }
}
