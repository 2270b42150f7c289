//! Leaf decoding
//!
//! Turns a token-tree node into a [`PrefValue`] for a preference of a given
//! [`ValueKind`]. Built-in kinds accept scalars only. Custom kinds dispatch
//! on their tag through [`DecoderRegistry`]; without a decoder the node is
//! kept as the raw payload.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use pref_core::{CustomValue, PrefValue, ValueKind};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;

/// Decoder for one custom kind
pub type DecodeFn = Arc<dyn Fn(&JsonValue) -> Result<PrefValue, DecodeError> + Send + Sync>;

/// Leaf decoding failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Node shape cannot hold the kind
    #[error("expected {expected}, found {found}")]
    UnexpectedShape {
        /// Declared kind
        expected: ValueKind,
        /// Shape of the node
        found: &'static str,
    },

    /// Node has the right shape but an invalid payload
    #[error("invalid {kind}: {reason}")]
    Invalid {
        /// Declared kind
        kind: ValueKind,
        /// Decoder message
        reason: String,
    },
}

/// Custom decoders keyed by tag
///
/// Custom kinds without a registered decoder accept scalars, wrapped as a
/// [`CustomValue`] under the declared tag.
///
/// # Examples
/// ```
/// # use pref_core::{PrefValue, ValueKind};
/// # use pref_merge::DecoderRegistry;
/// # use serde::{Deserialize, Serialize};
/// # use serde_json::json;
/// #[derive(Serialize, Deserialize)]
/// struct Window {
///     width: u32,
///     height: u32,
/// }
///
/// let mut registry = DecoderRegistry::new();
/// registry.register_serde::<Window>("window");
///
/// let value = registry
///     .decode(ValueKind::Custom("window"), &json!({ "width": 800, "height": 600 }))
///     .unwrap();
/// assert_eq!(value.kind(), ValueKind::Custom("window"));
/// ```
#[derive(Clone, Default)]
pub struct DecoderRegistry {
    decoders: HashMap<&'static str, DecodeFn>,
}

impl DecoderRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a decoder for `tag`, replacing any previous one
    pub fn register<F>(&mut self, tag: &'static str, decoder: F)
    where
        F: Fn(&JsonValue) -> Result<PrefValue, DecodeError> + Send + Sync + 'static,
    {
        self.decoders.insert(tag, Arc::new(decoder));
    }

    /// Register a decoder that accepts any JSON form `T` deserializes from
    ///
    /// The node is checked by deserializing into `T` and stored re-encoded
    /// from `T`, so the boxed payload is always in canonical form.
    pub fn register_serde<T>(&mut self, tag: &'static str)
    where
        T: Serialize + DeserializeOwned + 'static,
    {
        self.register(tag, move |node| {
            let kind = ValueKind::Custom(tag);
            let value: T = serde_json::from_value(node.clone()).map_err(|e| DecodeError::Invalid {
                kind,
                reason: e.to_string(),
            })?;
            CustomValue::encode(tag, &value)
                .map(PrefValue::Custom)
                .map_err(|e| DecodeError::Invalid {
                    kind,
                    reason: e.to_string(),
                })
        });
    }

    /// Check if `tag` has a decoder
    #[inline]
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.decoders.contains_key(tag)
    }

    /// Remove decoder
    #[inline]
    pub fn remove(&mut self, tag: &str) -> bool {
        self.decoders.remove(tag).is_some()
    }

    /// Number of registered decoders
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Decode a non-null node for a preference of `kind`
    ///
    /// # Errors
    /// - [`DecodeError::UnexpectedShape`] for an array or object where a
    ///   built-in kind needs a scalar, and for `null` without a decoder
    ///
    /// A custom kind without a decoder takes any non-null node as its raw
    /// payload; the preference's own conversion accepts or rejects it.
    /// - [`DecodeError::Invalid`] when a custom decoder rejects the node
    pub fn decode(&self, kind: ValueKind, node: &JsonValue) -> Result<PrefValue, DecodeError> {
        match kind {
            ValueKind::Custom(tag) => match self.decoders.get(tag) {
                Some(decoder) => decoder(node),
                None if node.is_null() => Err(DecodeError::UnexpectedShape {
                    expected: kind,
                    found: shape_name(node),
                }),
                None => Ok(PrefValue::Custom(CustomValue::new(tag, node.clone()))),
            },
            ValueKind::Bool
            | ValueKind::Integer
            | ValueKind::Unsigned
            | ValueKind::Float
            | ValueKind::Char
            | ValueKind::Text => scalar(kind, node),
        }
    }
}

impl fmt::Debug for DecoderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<_> = self.decoders.keys().collect();
        tags.sort();
        f.debug_struct("DecoderRegistry").field("tags", &tags).finish()
    }
}

fn scalar(kind: ValueKind, node: &JsonValue) -> Result<PrefValue, DecodeError> {
    PrefValue::from_json_scalar(node).ok_or_else(|| DecodeError::UnexpectedShape {
        expected: kind,
        found: shape_name(node),
    })
}

/// Name of a node's JSON shape
#[must_use]
pub fn shape_name(node: &JsonValue) -> &'static str {
    match node {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
