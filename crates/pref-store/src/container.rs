//! Uniform view over groups and stores
//!
//! Tree walkers (merge, snapshot) see a [`Group`] as a store whose items are
//! all preferences.

use pref_core::DynPreference;

use crate::group::Group;
use crate::item::{Item, ItemKind};
use crate::names::Names;
use crate::store::Store;

/// Borrowed item of a container
#[derive(Debug, Clone, Copy)]
pub enum Entry<'a> {
    /// Single preference
    Preference(&'a (dyn DynPreference + 'static)),
    /// Nested group
    Group(&'a Group),
    /// Nested store
    Store(&'a Store),
    /// Array of groups
    Groups(&'a [Group]),
    /// Array of stores
    Stores(&'a [Store]),
}

/// Mutably borrowed item of a container
#[derive(Debug)]
pub enum EntryMut<'a> {
    /// Single preference
    Preference(&'a mut (dyn DynPreference + 'static)),
    /// Nested group
    Group(&'a mut Group),
    /// Nested store
    Store(&'a mut Store),
    /// Array of groups
    Groups(&'a mut [Group]),
    /// Array of stores
    Stores(&'a mut [Store]),
}

impl Entry<'_> {
    /// Shape of the entry
    #[must_use]
    pub fn kind(self) -> ItemKind {
        match self {
            Self::Preference(_) => ItemKind::Preference,
            Self::Group(_) => ItemKind::Group,
            Self::Store(_) => ItemKind::Store,
            Self::Groups(_) => ItemKind::Groups,
            Self::Stores(_) => ItemKind::Stores,
        }
    }
}

impl EntryMut<'_> {
    /// Shape of the entry
    #[must_use]
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Preference(_) => ItemKind::Preference,
            Self::Group(_) => ItemKind::Group,
            Self::Store(_) => ItemKind::Store,
            Self::Groups(_) => ItemKind::Groups,
            Self::Stores(_) => ItemKind::Stores,
        }
    }
}

impl<'a> From<&'a Item> for Entry<'a> {
    fn from(item: &'a Item) -> Self {
        match item {
            Item::Preference(p) => Self::Preference(&**p),
            Item::Group(g) => Self::Group(g),
            Item::Store(s) => Self::Store(s),
            Item::Groups(g) => Self::Groups(g.as_slice()),
            Item::Stores(s) => Self::Stores(s.as_slice()),
        }
    }
}

impl<'a> From<&'a mut Item> for EntryMut<'a> {
    fn from(item: &'a mut Item) -> Self {
        match item {
            Item::Preference(p) => Self::Preference(&mut **p),
            Item::Group(g) => Self::Group(g),
            Item::Store(s) => Self::Store(s),
            Item::Groups(g) => Self::Groups(g.as_mut_slice()),
            Item::Stores(s) => Self::Stores(s.as_mut_slice()),
        }
    }
}

/// Ordered, name-keyed container of items
pub trait Container {
    /// Names in insertion order
    fn names(&self) -> Names<'_>;

    /// Entries in insertion order
    fn entries(&self) -> Box<dyn Iterator<Item = (&str, Entry<'_>)> + '_>;

    /// Mutable entries in insertion order
    fn entries_mut(&mut self) -> Box<dyn Iterator<Item = (&str, EntryMut<'_>)> + '_>;
}

impl Container for Group {
    fn names(&self) -> Names<'_> {
        Group::names(self)
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&str, Entry<'_>)> + '_> {
        Box::new(self.iter().map(|(name, p)| (name, Entry::Preference(p))))
    }

    fn entries_mut(&mut self) -> Box<dyn Iterator<Item = (&str, EntryMut<'_>)> + '_> {
        Box::new(self.iter_mut().map(|(name, p)| (name, EntryMut::Preference(p))))
    }
}

impl Container for Store {
    fn names(&self) -> Names<'_> {
        Store::names(self)
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&str, Entry<'_>)> + '_> {
        Box::new(self.iter().map(|(name, item)| (name, Entry::from(item))))
    }

    fn entries_mut(&mut self) -> Box<dyn Iterator<Item = (&str, EntryMut<'_>)> + '_> {
        Box::new(self.iter_mut().map(|(name, item)| (name, EntryMut::from(item))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pref_core::{PrefValue, Preference};

    fn walk(container: &dyn Container) -> Vec<(String, ItemKind)> {
        container
            .entries()
            .map(|(name, entry)| (name.to_string(), entry.kind()))
            .collect()
    }

    #[test]
    fn group_entries_are_preferences() {
        let mut group = Group::new();
        group.add(Preference::<bool>::named("a").unwrap()).unwrap();
        group.add(Preference::<bool>::named("b").unwrap()).unwrap();
        assert_eq!(
            walk(&group),
            [("a".to_string(), ItemKind::Preference), ("b".to_string(), ItemKind::Preference)]
        );
    }

    #[test]
    fn store_entries_follow_items() {
        let mut store = Store::new();
        store.add("inner", Group::new()).unwrap();
        store.add("many", vec![Store::new()]).unwrap();
        store.add_preference(Preference::<i64>::named("n").unwrap()).unwrap();
        assert_eq!(
            walk(&store),
            [
                ("inner".to_string(), ItemKind::Group),
                ("many".to_string(), ItemKind::Stores),
                ("n".to_string(), ItemKind::Preference),
            ]
        );
    }

    #[test]
    fn entries_mut_reach_preferences() {
        let mut store = Store::new();
        store.add_preference(Preference::<i64>::named("n").unwrap()).unwrap();
        for (_, entry) in store.entries_mut() {
            if let EntryMut::Preference(p) = entry {
                p.set_value_from_boxed(Some(PrefValue::Integer(2))).unwrap();
            }
        }
        assert_eq!(store.typed::<i64>("n").and_then(Preference::value), Some(&2));
    }
}
