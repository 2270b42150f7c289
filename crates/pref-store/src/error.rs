//! Container errors

use pref_core::NameError;
use thiserror::Error;

/// Errors raised by [`Group`](crate::Group) and [`Store`](crate::Store)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerError {
    /// Name is empty or whitespace only
    #[error(transparent)]
    InvalidName(#[from] NameError),

    /// Name already present
    #[error("duplicate name {name:?}")]
    DuplicateName {
        /// Offending name
        name: String,
    },

    /// Preference name differs from the key it is stored under
    #[error("preference {name:?} cannot be stored under key {key:?}")]
    NameMismatch {
        /// Container key
        key: String,
        /// Name reported by the preference
        name: String,
    },

    /// Name not present
    #[error("no item named {name:?}")]
    NotFound {
        /// Missing name
        name: String,
    },
}

impl ContainerError {
    /// Name the error is about
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::InvalidName(e) => &e.name,
            Self::DuplicateName { name } | Self::NotFound { name } => name,
            Self::NameMismatch { key, .. } => key,
        }
    }
}
