//! Allowed-value constraint evaluation
//!
//! Interposed between the `pre` and `is_valid` stages of the validity
//! pipeline. Membership is by value equality.

use crate::error::PreferenceError;

/// Set of values a preference may take
///
/// Order of first appearance is kept; duplicates are dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct AllowedValues<T>(Vec<T>);

impl<T: PartialEq> AllowedValues<T> {
    /// Create from values, dropping duplicates
    #[must_use]
    pub fn new(values: impl IntoIterator<Item = T>) -> Self {
        let mut unique: Vec<T> = Vec::new();
        for value in values {
            if !unique.contains(&value) {
                unique.push(value);
            }
        }
        Self(unique)
    }

    /// Check membership
    #[inline]
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.0.contains(value)
    }

    /// Number of allowed values
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no values are declared
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in declaration order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }

    /// Values as a slice
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.0
    }
}

impl<T: PartialEq> FromIterator<T> for AllowedValues<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Outcome of evaluating a candidate value against a policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Candidate is an allowed value; `is_valid` is skipped
    Member,
    /// No decision; `is_valid` decides
    Defer,
    /// Candidate is outside a closed allowed set
    Violation,
}

/// Allowed values together with the undefined-value policy
///
/// # Invariants
/// - `allowed_values` is never `Some` of an empty set
/// - if `allow_undefined_values` is false, `allowed_values` is `Some`
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintPolicy<T> {
    allowed_values: Option<AllowedValues<T>>,
    allow_undefined_values: bool,
}

impl<T: PartialEq> ConstraintPolicy<T> {
    /// Policy with no restriction
    #[inline]
    #[must_use]
    pub fn unrestricted() -> Self {
        Self {
            allowed_values: None,
            allow_undefined_values: true,
        }
    }

    /// Create policy for the named preference
    ///
    /// An empty allowed set is treated as no set.
    ///
    /// # Errors
    /// Returns [`PreferenceError::UndefinedValuesNotAllowed`] when undefined
    /// values are disallowed but no allowed values are declared
    pub fn new(
        name: &str,
        allowed_values: Option<AllowedValues<T>>,
        allow_undefined_values: bool,
    ) -> Result<Self, PreferenceError> {
        let allowed_values = allowed_values.filter(|values| !values.is_empty());
        if !allow_undefined_values && allowed_values.is_none() {
            return Err(PreferenceError::UndefinedValuesNotAllowed {
                name: name.to_string(),
            });
        }
        Ok(Self {
            allowed_values,
            allow_undefined_values,
        })
    }

    /// Declared allowed values
    #[inline]
    #[must_use]
    pub fn allowed_values(&self) -> Option<&AllowedValues<T>> {
        self.allowed_values.as_ref()
    }

    /// Whether values outside the allowed set may be accepted
    #[inline]
    #[must_use]
    pub fn allow_undefined_values(&self) -> bool {
        self.allow_undefined_values
    }

    /// Evaluate a candidate value
    #[must_use]
    pub fn evaluate(&self, candidate: &T) -> Verdict {
        match &self.allowed_values {
            None => Verdict::Defer,
            Some(allowed) if allowed.contains(candidate) => Verdict::Member,
            Some(_) if self.allow_undefined_values => Verdict::Defer,
            Some(_) => Verdict::Violation,
        }
    }
}

impl<T: PartialEq> Default for ConstraintPolicy<T> {
    fn default() -> Self {
        Self::unrestricted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closed(values: &[i64]) -> ConstraintPolicy<i64> {
        ConstraintPolicy::new("retries", Some(values.iter().copied().collect()), false).unwrap()
    }

    #[test]
    fn allowed_values_drop_duplicates_keep_order() {
        let allowed = AllowedValues::new([5, 1, 5, 3, 1]);
        assert_eq!(allowed.as_slice(), &[5, 1, 3]);
    }

    #[test]
    fn unrestricted_defers() {
        let policy = ConstraintPolicy::<i64>::unrestricted();
        assert_eq!(policy.evaluate(&42), Verdict::Defer);
    }

    #[test]
    fn member_short_circuits() {
        assert_eq!(closed(&[1, 3, 5]).evaluate(&3), Verdict::Member);
    }

    #[test]
    fn non_member_of_closed_set_is_violation() {
        assert_eq!(closed(&[1, 3, 5]).evaluate(&4), Verdict::Violation);
    }

    #[test]
    fn non_member_of_open_set_defers() {
        let policy = ConstraintPolicy::new("retries", Some(AllowedValues::new([1, 3, 5])), true).unwrap();
        assert_eq!(policy.evaluate(&4), Verdict::Defer);
        assert_eq!(policy.evaluate(&5), Verdict::Member);
    }

    #[test]
    fn closed_policy_requires_values() {
        let err = ConstraintPolicy::<i64>::new("retries", None, false).unwrap_err();
        assert!(matches!(err, PreferenceError::UndefinedValuesNotAllowed { .. }));

        let err = ConstraintPolicy::<i64>::new("retries", Some(AllowedValues::new([])), false)
            .unwrap_err();
        assert!(matches!(err, PreferenceError::UndefinedValuesNotAllowed { .. }));
    }

    #[test]
    fn empty_set_is_unrestricted() {
        let policy = ConstraintPolicy::<i64>::new("retries", Some(AllowedValues::new([])), true).unwrap();
        assert!(policy.allowed_values().is_none());
        assert_eq!(policy.evaluate(&9), Verdict::Defer);
    }

    #[test]
    fn membership_uses_value_equality() {
        let policy = ConstraintPolicy::new(
            "mode",
            Some(AllowedValues::new(["fast".to_string(), "safe".to_string()])),
            false,
        )
        .unwrap();
        let candidate = String::from("safe");
        assert_eq!(policy.evaluate(&candidate), Verdict::Member);
    }
}
