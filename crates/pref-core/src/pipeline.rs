//! Validity pipeline
//!
//! Every write to a preference value passes through
//! `pre → constraint → is_valid → post`. The pipeline only computes the value
//! to store; the caller writes it after the pipeline succeeds, so a failure
//! at any stage leaves the stored value untouched.

use crate::constraint::{ConstraintPolicy, Verdict};
use crate::error::PreferenceError;
use crate::processor::ValidityProcessor;
use crate::value::PreferenceValue;

/// Borrowed view of everything that decides a write
#[derive(Debug)]
pub struct ValidityPipeline<'a, T> {
    name: &'a str,
    policy: &'a ConstraintPolicy<T>,
    processor: &'a dyn ValidityProcessor<T>,
}

impl<'a, T: PreferenceValue> ValidityPipeline<'a, T> {
    /// Create pipeline for the named preference
    #[inline]
    #[must_use]
    pub fn new(
        name: &'a str,
        policy: &'a ConstraintPolicy<T>,
        processor: &'a dyn ValidityProcessor<T>,
    ) -> Self {
        Self {
            name,
            policy,
            processor,
        }
    }

    /// Run a candidate value through every stage
    ///
    /// `None` means "unset" and is accepted without consulting any stage.
    ///
    /// # Errors
    /// Returns the [`PreferenceError`] of the first failing stage
    pub fn apply(&self, candidate: Option<T>) -> Result<Option<T>, PreferenceError> {
        let Some(candidate) = candidate else {
            return Ok(None);
        };

        let Some(value) = self
            .processor
            .pre(candidate)
            .map_err(|cause| PreferenceError::PreProcessing {
                name: self.name.to_string(),
                cause,
            })?
        else {
            return Ok(None);
        };

        match self.policy.evaluate(&value) {
            Verdict::Member => {}
            Verdict::Defer => {
                self.processor
                    .is_valid(&value)
                    .map_err(|cause| PreferenceError::ValidityCheck {
                        name: self.name.to_string(),
                        cause,
                    })?;
            }
            Verdict::Violation => {
                return Err(PreferenceError::AllowedValueViolation {
                    name: self.name.to_string(),
                    value: value.render(None),
                });
            }
        }

        let value = self
            .processor
            .post(value)
            .map_err(|cause| PreferenceError::PostProcessing {
                name: self.name.to_string(),
                cause,
            })?;

        Ok(Some(value))
    }
}
