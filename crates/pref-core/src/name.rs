//! Preference and container item names
//!
//! Names are trimmed before use; a name that is empty or whitespace-only
//! is rejected.

/// Normalize a name, returning its trimmed form
///
/// # Errors
/// Returns [`NameError`] if the name is empty or whitespace-only
///
/// # Examples
/// ```
/// # use pref_core::name::normalize_name;
/// assert_eq!(normalize_name("  retries ").unwrap(), "retries");
/// assert!(normalize_name("   ").is_err());
/// ```
pub fn normalize_name(name: &str) -> Result<String, NameError> {
    if name.is_empty() {
        return Err(NameError::new(name, "name is empty"));
    }

    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(NameError::new(name, "name is whitespace only"));
    }

    Ok(trimmed.to_string())
}

/// Check whether a name is already in normalized form
#[inline]
#[must_use]
pub fn is_normalized(name: &str) -> bool {
    !name.is_empty() && name.trim() == name
}

/// Rejected name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid name {name:?}: {reason}")]
pub struct NameError {
    /// The name as supplied
    pub name: String,
    /// Why it was rejected
    pub reason: &'static str,
}

impl NameError {
    #[inline]
    fn new(name: &str, reason: &'static str) -> Self {
        Self {
            name: name.to_string(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(normalize_name("\tlimits\n").unwrap(), "limits");
    }

    #[test]
    fn rejects_empty() {
        let err = normalize_name("").unwrap_err();
        assert_eq!(err.reason, "name is empty");
    }

    #[test]
    fn rejects_whitespace_only() {
        for name in [" ", "\t", " \n \r "] {
            assert!(normalize_name(name).is_err(), "{name:?} should be rejected");
        }
    }

    #[test]
    fn interior_whitespace_is_kept() {
        assert_eq!(normalize_name(" max retries ").unwrap(), "max retries");
    }

    #[test]
    fn normalized_check() {
        assert!(is_normalized("a"));
        assert!(!is_normalized(" a"));
        assert!(!is_normalized(""));
    }
}
