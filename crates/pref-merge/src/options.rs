//! Merge configuration

use pref_core::PrefValue;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::decode::{DecodeError, DecoderRegistry};

/// Handling of an explicit `null` at a preference leaf
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullPolicy {
    /// Leave the preference unchanged and record no entry
    #[default]
    Ignore,
    /// Unset the preference value
    Unset,
}

/// Merge options
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    /// Null handling at preference leaves
    pub null_policy: NullPolicy,
    /// Decoders for custom value kinds
    pub decoders: DecoderRegistry,
}

impl MergeOptions {
    /// Create default options
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With null policy
    #[inline]
    #[must_use]
    pub fn with_null_policy(mut self, policy: NullPolicy) -> Self {
        self.null_policy = policy;
        self
    }

    /// With decoder registry
    #[inline]
    #[must_use]
    pub fn with_decoders(mut self, decoders: DecoderRegistry) -> Self {
        self.decoders = decoders;
        self
    }

    /// With one additional custom decoder
    #[must_use]
    pub fn with_decoder<F>(mut self, tag: &'static str, decoder: F) -> Self
    where
        F: Fn(&JsonValue) -> Result<PrefValue, DecodeError> + Send + Sync + 'static,
    {
        self.decoders.register(tag, decoder);
        self
    }
}
