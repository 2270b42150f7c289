//! Typed preferences
//!
//! A [`Preference<T>`] is a named value slot. Its structural configuration
//! (name, policy, allowed values, processor) is fixed at construction; its
//! value and default value change over time, each write independently
//! validated.

use std::sync::Arc;

use crate::constraint::{AllowedValues, ConstraintPolicy};
use crate::error::PreferenceError;
use crate::name::normalize_name;
use crate::pipeline::ValidityPipeline;
use crate::processor::{DefaultProcessor, ValidityProcessor};
use crate::value::{PrefValue, PreferenceValue, ValueKind};

/// Construction record for a [`Preference`]
///
/// Fields are public; `with_*` setters exist for chaining.
///
/// # Examples
/// ```
/// # use pref_core::{Preference, PreferenceConfig};
/// let retries = Preference::new(
///     PreferenceConfig::new("retries")
///         .with_allowed_values([1i64, 3, 5])
///         .disallow_undefined_values()
///         .with_value(1),
/// )
/// .unwrap();
/// assert_eq!(retries.value(), Some(&1));
/// ```
#[derive(Debug, Clone)]
pub struct PreferenceConfig<T: PreferenceValue> {
    /// Preference name; trimmed on construction
    pub name: String,
    /// Informational description
    pub description: Option<String>,
    /// Accept values outside `allowed_values` when `is_valid` accepts them
    pub allow_undefined_values: bool,
    /// Values the preference may take; `None` or empty means unrestricted
    pub allowed_values: Option<Vec<T>>,
    /// Validity stages; `None` uses [`DefaultProcessor`]
    pub processor: Option<Arc<dyn ValidityProcessor<T>>>,
    /// Initial value
    pub value: Option<T>,
    /// Initial default value
    pub default_value: Option<T>,
}

impl<T: PreferenceValue> PreferenceConfig<T> {
    /// Create config with default policy
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            allow_undefined_values: true,
            allowed_values: None,
            processor: None,
            value: None,
            default_value: None,
        }
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// With allowed values
    #[inline]
    #[must_use]
    pub fn with_allowed_values(mut self, values: impl IntoIterator<Item = T>) -> Self {
        self.allowed_values = Some(values.into_iter().collect());
        self
    }

    /// Reject values outside the allowed set
    #[inline]
    #[must_use]
    pub fn disallow_undefined_values(mut self) -> Self {
        self.allow_undefined_values = false;
        self
    }

    /// With validity processor
    #[inline]
    #[must_use]
    pub fn with_processor(mut self, processor: impl ValidityProcessor<T> + 'static) -> Self {
        self.processor = Some(Arc::new(processor));
        self
    }

    /// With initial value
    #[inline]
    #[must_use]
    pub fn with_value(mut self, value: T) -> Self {
        self.value = Some(value);
        self
    }

    /// With initial default value
    #[inline]
    #[must_use]
    pub fn with_default_value(mut self, value: T) -> Self {
        self.default_value = Some(value);
        self
    }
}

/// Named, typed, independently validated value slot
///
/// # Invariants
/// - `name` is trimmed and non-empty
/// - stored values have passed the validity pipeline
/// - a failed write leaves the stored value unchanged
///
/// `value == None` means unset. When a default is present callers consult
/// [`Preference::effective_value`] for the value in force.
#[derive(Debug, Clone)]
pub struct Preference<T: PreferenceValue> {
    name: String,
    description: Option<String>,
    policy: ConstraintPolicy<T>,
    processor: Arc<dyn ValidityProcessor<T>>,
    value: Option<T>,
    default_value: Option<T>,
}

impl<T: PreferenceValue> Preference<T> {
    /// Create preference from config
    ///
    /// Initial `value` and `default_value` pass through the validity pipeline.
    ///
    /// # Errors
    /// - [`PreferenceError::InvalidName`] for an empty or whitespace name
    /// - [`PreferenceError::UndefinedValuesNotAllowed`] when undefined values
    ///   are disallowed without allowed values
    /// - any pipeline error raised by the initial values
    pub fn new(config: PreferenceConfig<T>) -> Result<Self, PreferenceError> {
        let name = normalize_name(&config.name)?;
        let policy = ConstraintPolicy::new(
            &name,
            config.allowed_values.map(AllowedValues::new),
            config.allow_undefined_values,
        )?;
        let processor: Arc<dyn ValidityProcessor<T>> = match config.processor {
            Some(processor) => processor,
            None => Arc::new(DefaultProcessor),
        };

        let mut preference = Self {
            name,
            description: config.description,
            policy,
            processor,
            value: None,
            default_value: None,
        };
        preference.set_default_value(config.default_value)?;
        preference.set_value(config.value)?;
        Ok(preference)
    }

    /// Create unrestricted preference with no initial value
    ///
    /// # Errors
    /// Returns [`PreferenceError::InvalidName`] for an invalid name
    pub fn named(name: impl Into<String>) -> Result<Self, PreferenceError> {
        Self::new(PreferenceConfig::new(name))
    }

    /// Preference name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Description
    #[inline]
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Whether values outside the allowed set may be accepted
    #[inline]
    #[must_use]
    pub fn allow_undefined_values(&self) -> bool {
        self.policy.allow_undefined_values()
    }

    /// Declared allowed values
    #[inline]
    #[must_use]
    pub fn allowed_values(&self) -> Option<&AllowedValues<T>> {
        self.policy.allowed_values()
    }

    /// Current value
    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Default value
    #[inline]
    #[must_use]
    pub fn default_value(&self) -> Option<&T> {
        self.default_value.as_ref()
    }

    /// Value in force: the current value, else the default
    #[inline]
    #[must_use]
    pub fn effective_value(&self) -> Option<&T> {
        self.value.as_ref().or(self.default_value.as_ref())
    }

    /// Check if a value is set
    #[inline]
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Declared value kind
    #[inline]
    #[must_use]
    pub fn value_kind(&self) -> ValueKind {
        T::kind()
    }

    /// Declared Rust type name
    #[inline]
    #[must_use]
    pub fn value_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    /// Set the value through the validity pipeline
    ///
    /// Returns whether the stored value changed.
    ///
    /// # Errors
    /// Returns the pipeline failure; the stored value is left unchanged
    pub fn set_value(&mut self, value: Option<T>) -> Result<bool, PreferenceError> {
        let accepted = self.validate(value)?;
        Ok(replace_if_changed(&mut self.value, accepted))
    }

    /// Set the default value through the validity pipeline
    ///
    /// Returns whether the stored default changed.
    ///
    /// # Errors
    /// Returns the pipeline failure; the stored default is left unchanged
    pub fn set_default_value(&mut self, value: Option<T>) -> Result<bool, PreferenceError> {
        let accepted = self.validate(value)?;
        Ok(replace_if_changed(&mut self.default_value, accepted))
    }

    /// Unset the value
    ///
    /// Returns whether a value was set before.
    #[inline]
    pub fn reset(&mut self) -> bool {
        self.value.take().is_some()
    }

    /// Current value, boxed
    #[inline]
    #[must_use]
    pub fn value_as_boxed(&self) -> Option<PrefValue> {
        self.value.as_ref().map(PreferenceValue::to_boxed)
    }

    /// Default value, boxed
    #[inline]
    #[must_use]
    pub fn default_value_as_boxed(&self) -> Option<PrefValue> {
        self.default_value.as_ref().map(PreferenceValue::to_boxed)
    }

    /// Set the value from a boxed value
    ///
    /// `None` always succeeds and unsets the value.
    ///
    /// # Errors
    /// - [`PreferenceError::Casting`] or [`PreferenceError::Converting`] when
    ///   the boxed value cannot become `T`
    /// - any pipeline failure
    pub fn set_value_from_boxed(&mut self, value: Option<PrefValue>) -> Result<bool, PreferenceError> {
        let value = self.unbox(value)?;
        self.set_value(value)
    }

    /// Set the default value from a boxed value
    ///
    /// # Errors
    /// Same as [`Preference::set_value_from_boxed`]
    pub fn set_default_value_from_boxed(
        &mut self,
        value: Option<PrefValue>,
    ) -> Result<bool, PreferenceError> {
        let value = self.unbox(value)?;
        self.set_default_value(value)
    }

    /// Render the current value as text
    ///
    /// Returns `None` when the value is unset.
    #[inline]
    #[must_use]
    pub fn value_as_string(&self, format: Option<&str>) -> Option<String> {
        self.value.as_ref().map(|v| v.render(format))
    }

    fn validate(&self, value: Option<T>) -> Result<Option<T>, PreferenceError> {
        ValidityPipeline::new(&self.name, &self.policy, self.processor.as_ref())
            .apply(value)
            .map_err(|e| {
                tracing::debug!("Rejected write to {} at {}: {}", self.name, e.step(), e);
                e
            })
    }

    fn unbox(&self, value: Option<PrefValue>) -> Result<Option<T>, PreferenceError> {
        value
            .map(T::from_boxed)
            .transpose()
            .map_err(|e| PreferenceError::conversion(&self.name, e))
    }
}

fn replace_if_changed<T: PartialEq>(slot: &mut Option<T>, value: Option<T>) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}
