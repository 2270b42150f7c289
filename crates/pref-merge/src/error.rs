//! Merge errors

use pref_core::{PreferenceError, ValueKind};
use thiserror::Error;

use crate::decode::DecodeError;
use crate::path::KeyPath;

/// Errors that abort a merge
///
/// Container-shape mismatches are skipped rather than raised; only leaf
/// failures end up here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MergeError {
    /// Composite node where a preference expects a scalar
    #[error("unexpected shape at {path}: expected {expected}, found {found}")]
    UnexpectedShape {
        /// Location of the preference
        path: KeyPath,
        /// Declared value kind
        expected: ValueKind,
        /// Shape of the offending node
        found: &'static str,
    },

    /// Preference rejected the decoded value
    #[error("cannot set {path}: {source}")]
    Preference {
        /// Location of the preference
        path: KeyPath,
        /// Pipeline or conversion failure
        #[source]
        source: PreferenceError,
    },

    /// Custom decoder rejected the node
    #[error("cannot decode {path} as {kind}: {reason}")]
    Decode {
        /// Location of the preference
        path: KeyPath,
        /// Declared value kind
        kind: ValueKind,
        /// Decoder message
        reason: String,
    },
}

impl MergeError {
    /// Attach a path to a decoding failure
    #[must_use]
    pub fn decode(path: KeyPath, error: DecodeError) -> Self {
        match error {
            DecodeError::UnexpectedShape { expected, found } => Self::UnexpectedShape {
                path,
                expected,
                found,
            },
            DecodeError::Invalid { kind, reason } => Self::Decode { path, kind, reason },
        }
    }

    /// Location of the failing preference
    #[must_use]
    pub fn path(&self) -> &KeyPath {
        match self {
            Self::UnexpectedShape { path, .. }
            | Self::Preference { path, .. }
            | Self::Decode { path, .. } => path,
        }
    }

    /// Check if this is a shape mismatch
    #[inline]
    #[must_use]
    pub fn is_unexpected_shape(&self) -> bool {
        matches!(self, Self::UnexpectedShape { .. })
    }

    /// Underlying preference error, if any
    #[must_use]
    pub fn preference_error(&self) -> Option<&PreferenceError> {
        match self {
            Self::Preference { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_errors_keep_path() {
        let path = KeyPath::single("limits").key("max");
        let err = MergeError::decode(
            path.clone(),
            DecodeError::UnexpectedShape {
                expected: ValueKind::Integer,
                found: "array",
            },
        );
        assert!(err.is_unexpected_shape());
        assert_eq!(err.path(), &path);
        assert_eq!(
            err.to_string(),
            "unexpected shape at limits.max: expected integer, found array"
        );
    }

    #[test]
    fn preference_error_is_source() {
        use std::error::Error as _;

        let err = MergeError::Preference {
            path: KeyPath::single("retries"),
            source: PreferenceError::AllowedValueViolation {
                name: "retries".into(),
                value: "4".into(),
            },
        };
        assert!(err.source().is_some());
        assert!(matches!(
            err.preference_error(),
            Some(PreferenceError::AllowedValueViolation { .. })
        ));
    }
}
