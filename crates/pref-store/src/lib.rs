//! Preference Store
//!
//! Ordered, name-keyed containers of preferences.
//!
//! # Core Concepts
//!
//! - [`Group`]: Ordered name → preference mapping
//! - [`Store`]: Ordered name → [`Item`] mapping with arbitrary nesting
//! - [`Item`]: Preference, group, store, or an array of groups or stores
//! - [`Container`]: Uniform ordered view used by tree walkers
//!
//! Containers are not internally synchronized; share them across threads
//! behind a lock.

#![warn(unreachable_pub)]

mod container;
mod error;
mod group;
mod item;
mod names;
mod store;

pub use container::{Container, Entry, EntryMut};
pub use error::ContainerError;
pub use group::Group;
pub use item::{Item, ItemKind};
pub use names::Names;
pub use store::Store;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
