//! Type-erased preference surface
//!
//! Containers hold preferences of mixed value types as
//! `Box<dyn DynPreference>`. The merge engine needs only the value kind, a
//! boxed setter and reset.

use std::any::Any;
use std::fmt::Debug;

use crate::error::PreferenceError;
use crate::preference::Preference;
use crate::value::{PrefValue, PreferenceValue, ValueKind};

/// Object-safe view of a [`Preference<T>`]
pub trait DynPreference: Debug + Send + Sync {
    /// Preference name
    fn name(&self) -> &str;

    /// Description
    fn description(&self) -> Option<&str>;

    /// Declared value kind
    fn value_kind(&self) -> ValueKind;

    /// Declared Rust type name
    fn value_type_name(&self) -> &'static str;

    /// Check if a value is set
    fn is_set(&self) -> bool;

    /// Current value, boxed
    fn value_as_boxed(&self) -> Option<PrefValue>;

    /// Default value, boxed
    fn default_value_as_boxed(&self) -> Option<PrefValue>;

    /// Set the value from a boxed value; returns whether it changed
    ///
    /// # Errors
    /// Conversion or pipeline failure; the stored value is left unchanged
    fn set_value_from_boxed(&mut self, value: Option<PrefValue>) -> Result<bool, PreferenceError>;

    /// Set the default value from a boxed value; returns whether it changed
    ///
    /// # Errors
    /// Conversion or pipeline failure; the stored default is left unchanged
    fn set_default_value_from_boxed(
        &mut self,
        value: Option<PrefValue>,
    ) -> Result<bool, PreferenceError>;

    /// Unset the value; returns whether a value was set before
    fn reset(&mut self) -> bool;

    /// Render the current value as text, `None` when unset
    fn value_as_string(&self, format: Option<&str>) -> Option<String>;

    /// Clone into a new box
    fn clone_box(&self) -> Box<dyn DynPreference>;

    /// Upcast for typed downcasting
    fn as_any(&self) -> &dyn Any;

    /// Upcast for typed downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl dyn DynPreference {
    /// Downcast to a typed preference
    #[inline]
    #[must_use]
    pub fn downcast_ref<T: PreferenceValue>(&self) -> Option<&Preference<T>> {
        self.as_any().downcast_ref()
    }

    /// Downcast to a typed preference
    #[inline]
    pub fn downcast_mut<T: PreferenceValue>(&mut self) -> Option<&mut Preference<T>> {
        self.as_any_mut().downcast_mut()
    }
}

impl Clone for Box<dyn DynPreference> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

impl<T: PreferenceValue> DynPreference for Preference<T> {
    fn name(&self) -> &str {
        Preference::name(self)
    }

    fn description(&self) -> Option<&str> {
        Preference::description(self)
    }

    fn value_kind(&self) -> ValueKind {
        T::kind()
    }

    fn value_type_name(&self) -> &'static str {
        Preference::value_type_name(self)
    }

    fn is_set(&self) -> bool {
        Preference::is_set(self)
    }

    fn value_as_boxed(&self) -> Option<PrefValue> {
        Preference::value_as_boxed(self)
    }

    fn default_value_as_boxed(&self) -> Option<PrefValue> {
        Preference::default_value_as_boxed(self)
    }

    fn set_value_from_boxed(&mut self, value: Option<PrefValue>) -> Result<bool, PreferenceError> {
        Preference::set_value_from_boxed(self, value)
    }

    fn set_default_value_from_boxed(
        &mut self,
        value: Option<PrefValue>,
    ) -> Result<bool, PreferenceError> {
        Preference::set_default_value_from_boxed(self, value)
    }

    fn reset(&mut self) -> bool {
        Preference::reset(self)
    }

    fn value_as_string(&self, format: Option<&str>) -> Option<String> {
        Preference::value_as_string(self, format)
    }

    fn clone_box(&self) -> Box<dyn DynPreference> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
