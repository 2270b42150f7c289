//! Error types for preferences
//!
//! Every failure of a preference write surfaces as a [`PreferenceError`].
//! Each variant carries the preference name and maps to the
//! [`ProcessingStep`] at which the write was aborted.

use std::fmt::{self, Display, Formatter};

use crate::name::NameError;
use crate::value::{ConversionError, ValueKind};

/// Stage of preference processing at which a failure occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessingStep {
    /// Name validation
    ProcessingName,
    /// Construction-time policy checks
    Configuration,
    /// Boxed value conversion
    Conversion,
    /// `pre` stage of the validity processor
    PreProcessing,
    /// Allowed-value membership or `is_valid`
    ValidityCheck,
    /// `post` stage of the validity processor
    PostProcessing,
}

impl Display for ProcessingStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ProcessingName => "name processing",
            Self::Configuration => "configuration",
            Self::Conversion => "conversion",
            Self::PreProcessing => "pre-processing",
            Self::ValidityCheck => "validity check",
            Self::PostProcessing => "post-processing",
        };
        f.write_str(label)
    }
}

/// Cause reported by a validity processor stage
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct Rejection {
    reason: String,
}

impl Rejection {
    /// Create rejection with a reason
    #[inline]
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Rejection reason
    #[inline]
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Preference errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PreferenceError {
    /// Name is empty or whitespace
    #[error("{0}")]
    InvalidName(#[from] NameError),

    /// `allow_undefined_values` is false but no allowed values were declared
    #[error("preference '{name}' disallows undefined values but declares no allowed values")]
    UndefinedValuesNotAllowed { name: String },

    /// Value outside a closed allowed-value set
    #[error("value {value} is not an allowed value of preference '{name}'")]
    AllowedValueViolation { name: String, value: String },

    /// `pre` stage rejected the value
    #[error("pre-processing rejected value for preference '{name}': {cause}")]
    PreProcessing {
        name: String,
        #[source]
        cause: Rejection,
    },

    /// `is_valid` rejected the value
    #[error("validity check failed for preference '{name}': {cause}")]
    ValidityCheck {
        name: String,
        #[source]
        cause: Rejection,
    },

    /// `post` stage rejected the value
    #[error("post-processing rejected value for preference '{name}': {cause}")]
    PostProcessing {
        name: String,
        #[source]
        cause: Rejection,
    },

    /// Boxed value of an incompatible kind
    #[error("cannot cast {actual} to {expected} for preference '{name}'")]
    Casting {
        name: String,
        expected: ValueKind,
        actual: ValueKind,
    },

    /// Boxed value of a compatible kind that failed to convert
    #[error("cannot convert {value:?} to {expected} for preference '{name}': {reason}")]
    Converting {
        name: String,
        expected: ValueKind,
        value: String,
        reason: String,
    },
}

impl PreferenceError {
    /// Attach a preference name to a conversion failure
    #[must_use]
    pub fn conversion(name: &str, error: ConversionError) -> Self {
        let name = name.to_string();
        match error {
            ConversionError::Casting { expected, actual } => Self::Casting {
                name,
                expected,
                actual,
            },
            ConversionError::Converting {
                expected,
                value,
                reason,
            } => Self::Converting {
                name,
                expected,
                value,
                reason,
            },
        }
    }

    /// Step at which processing was aborted
    #[must_use]
    pub fn step(&self) -> ProcessingStep {
        match self {
            Self::InvalidName(_) => ProcessingStep::ProcessingName,
            Self::UndefinedValuesNotAllowed { .. } => ProcessingStep::Configuration,
            Self::Casting { .. } | Self::Converting { .. } => ProcessingStep::Conversion,
            Self::PreProcessing { .. } => ProcessingStep::PreProcessing,
            Self::AllowedValueViolation { .. } | Self::ValidityCheck { .. } => {
                ProcessingStep::ValidityCheck
            }
            Self::PostProcessing { .. } => ProcessingStep::PostProcessing,
        }
    }

    /// Name of the preference involved
    ///
    /// For [`PreferenceError::InvalidName`] this is the rejected name.
    #[must_use]
    pub fn preference(&self) -> &str {
        match self {
            Self::InvalidName(e) => &e.name,
            Self::UndefinedValuesNotAllowed { name }
            | Self::AllowedValueViolation { name, .. }
            | Self::PreProcessing { name, .. }
            | Self::ValidityCheck { name, .. }
            | Self::PostProcessing { name, .. }
            | Self::Casting { name, .. }
            | Self::Converting { name, .. } => name,
        }
    }

    /// Underlying processor rejection, if any
    #[must_use]
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::PreProcessing { cause, .. }
            | Self::ValidityCheck { cause, .. }
            | Self::PostProcessing { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::normalize_name;

    #[test]
    fn invalid_name_step() {
        let err: PreferenceError = normalize_name(" ").unwrap_err().into();
        assert_eq!(err.step(), ProcessingStep::ProcessingName);
        assert_eq!(err.preference(), " ");
    }

    #[test]
    fn conversion_keeps_kinds() {
        let err = PreferenceError::conversion(
            "retries",
            ConversionError::Casting {
                expected: ValueKind::Integer,
                actual: ValueKind::Bool,
            },
        );
        assert_eq!(err.step(), ProcessingStep::Conversion);
        assert_eq!(err.preference(), "retries");
        assert_eq!(
            err.to_string(),
            "cannot cast bool to integer for preference 'retries'"
        );
    }

    #[test]
    fn allowed_value_violation_is_validity_step() {
        let err = PreferenceError::AllowedValueViolation {
            name: "retries".into(),
            value: "4".into(),
        };
        assert_eq!(err.step(), ProcessingStep::ValidityCheck);
        assert!(err.rejection().is_none());
    }

    #[test]
    fn rejection_is_exposed_as_source() {
        use std::error::Error;

        let err = PreferenceError::PostProcessing {
            name: "port".into(),
            cause: Rejection::new("port is reserved"),
        };
        assert_eq!(err.rejection().map(Rejection::reason), Some("port is reserved"));
        assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("port is reserved"));
    }
}
