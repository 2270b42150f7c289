//! Preference Core
//!
//! Named, typed configuration values guarded by a validity pipeline.
//!
//! # Core Concepts
//!
//! - [`Preference<T>`]: Named value slot with value and default value
//! - [`PreferenceConfig<T>`]: Construction record for a preference
//! - [`ValidityProcessor`]: `pre`, `is_valid` and `post` stages of a write
//! - [`ConstraintPolicy`]: Allowed values and undefined-value policy
//! - [`PrefValue`]: Type-erased value used by containers and merges
//! - [`DynPreference`]: Object-safe preference surface
//!
//! # Example
//!
//! ```rust
//! use pref_core::{PrefValue, Preference, PreferenceConfig, PreferenceError};
//!
//! let mut retries = Preference::new(
//!     PreferenceConfig::new("retries")
//!         .with_allowed_values([1i64, 3, 5])
//!         .disallow_undefined_values()
//!         .with_value(1),
//! )?;
//!
//! retries.set_value(Some(3))?;
//! assert!(retries.set_value(Some(4)).is_err());
//! assert_eq!(retries.value_as_boxed(), Some(PrefValue::Integer(3)));
//! # Ok::<(), PreferenceError>(())
//! ```

#![warn(unreachable_pub)]

// Core modules
mod constraint;
mod dynamic;
mod error;
mod pipeline;
mod preference;
mod processor;

/// Name normalization shared with containers
pub mod name;

/// Boxed values and the [`PreferenceValue`] trait
pub mod value;

// Re-exports
pub use constraint::{AllowedValues, ConstraintPolicy, Verdict};
pub use dynamic::DynPreference;
pub use error::{PreferenceError, ProcessingStep, Rejection};
pub use name::NameError;
pub use pipeline::ValidityPipeline;
pub use preference::{Preference, PreferenceConfig};
pub use processor::{ChainProcessor, DefaultProcessor, FnProcessor, ValidityProcessor};
pub use value::{
    decode_custom, encode_custom, ConversionError, CustomValue, PrefValue, PreferenceValue,
    ValueKind,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
