//! Preference Merge
//!
//! Applies an external token tree (a `serde_json::Value`) to a group or
//! store and reports what changed.
//!
//! # Core Concepts
//!
//! - [`MergeEngine`]: Recursive walk of container and token tree
//! - [`ChangeSet`]: Name-keyed record of which entries changed
//! - [`DecoderRegistry`]: Leaf decoding for custom value kinds
//! - [`MergeOptions`]: Null handling and decoders
//! - [`snapshot`]: Current container state as a token tree
//!
//! # Example
//!
//! ```rust
//! use pref_core::{Preference, PreferenceConfig};
//! use pref_merge::merge_store;
//! use pref_store::{Group, Store};
//! use serde_json::json;
//!
//! let mut limits = Group::new();
//! limits.add(Preference::<i64>::named("max").unwrap()).unwrap();
//!
//! let mut store = Store::new();
//! store.add_preference(Preference::<bool>::named("enabled").unwrap()).unwrap();
//! store.add("limits", limits).unwrap();
//!
//! let changes = merge_store(&mut store, &json!({ "enabled": true, "limits": { "max": 10 } }))
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(
//!     serde_json::to_value(&changes).unwrap(),
//!     json!({ "enabled": true, "limits": { "max": true } })
//! );
//! ```

#![warn(unreachable_pub)]

mod change;
mod decode;
mod engine;
mod error;
mod options;
mod path;

/// Container state as a token tree
pub mod snapshot;

pub use change::{Change, ChangeSet};
pub use decode::{shape_name, DecodeError, DecodeFn, DecoderRegistry};
pub use engine::{merge_group, merge_store, MergeEngine};
pub use error::MergeError;
pub use options::{MergeOptions, NullPolicy};
pub use path::{KeyPath, PathError, Segment};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
