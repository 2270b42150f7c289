//! Validity processors
//!
//! A [`ValidityProcessor`] supplies the three caller-defined stages of the
//! validity pipeline: `pre`, `is_valid` and `post`. Every stage defaults to
//! a no-op, so a processor only overrides what it needs.

use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use crate::error::Rejection;

/// Pluggable stages of the validity pipeline
///
/// # Contract
/// Stages must be deterministic: the same input always yields the same
/// outcome. Processors take `&self` and hold no mutable state.
pub trait ValidityProcessor<T>: Send + Sync + Debug {
    /// Transform an incoming value before it is checked
    ///
    /// Returning `Ok(None)` turns the write into "unset", which skips every
    /// later stage.
    ///
    /// # Errors
    /// Returns [`Rejection`] to abort the write
    fn pre(&self, value: T) -> Result<Option<T>, Rejection> {
        Ok(Some(value))
    }

    /// Decide whether a value is valid
    ///
    /// Not called for values that are members of a preference's allowed set.
    ///
    /// # Errors
    /// Returns [`Rejection`] naming the cause when the value is invalid
    fn is_valid(&self, _value: &T) -> Result<(), Rejection> {
        Ok(())
    }

    /// Transform a checked value before it is stored
    ///
    /// # Errors
    /// Returns [`Rejection`] to abort the write
    fn post(&self, value: T) -> Result<T, Rejection> {
        Ok(value)
    }
}

/// Processor whose stages are all no-ops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultProcessor;

impl<T> ValidityProcessor<T> for DefaultProcessor {}

type PreFn<T> = Arc<dyn Fn(T) -> Result<Option<T>, Rejection> + Send + Sync>;
type ValidityFn<T> = Arc<dyn Fn(&T) -> Result<(), Rejection> + Send + Sync>;
type PostFn<T> = Arc<dyn Fn(T) -> Result<T, Rejection> + Send + Sync>;

/// Processor assembled from closures
///
/// Stages left unset behave like [`DefaultProcessor`].
///
/// # Examples
/// ```
/// # use pref_core::{FnProcessor, Rejection, ValidityProcessor};
/// let even = FnProcessor::<i64>::new().with_validity(|v| {
///     if v % 2 == 0 { Ok(()) } else { Err(Rejection::new("must be even")) }
/// });
/// assert!(even.is_valid(&4).is_ok());
/// assert!(even.is_valid(&3).is_err());
/// ```
pub struct FnProcessor<T> {
    pre: Option<PreFn<T>>,
    validity: Option<ValidityFn<T>>,
    post: Option<PostFn<T>>,
}

impl<T> FnProcessor<T> {
    /// Create processor with no stages set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            pre: None,
            validity: None,
            post: None,
        }
    }

    /// Set the `pre` stage
    #[must_use]
    pub fn with_pre<F>(mut self, f: F) -> Self
    where
        F: Fn(T) -> Result<Option<T>, Rejection> + Send + Sync + 'static,
    {
        self.pre = Some(Arc::new(f));
        self
    }

    /// Set the `is_valid` stage
    #[must_use]
    pub fn with_validity<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> Result<(), Rejection> + Send + Sync + 'static,
    {
        self.validity = Some(Arc::new(f));
        self
    }

    /// Set the `post` stage
    #[must_use]
    pub fn with_post<F>(mut self, f: F) -> Self
    where
        F: Fn(T) -> Result<T, Rejection> + Send + Sync + 'static,
    {
        self.post = Some(Arc::new(f));
        self
    }
}

impl<T> Default for FnProcessor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for FnProcessor<T> {
    fn clone(&self) -> Self {
        Self {
            pre: self.pre.clone(),
            validity: self.validity.clone(),
            post: self.post.clone(),
        }
    }
}

impl<T> Debug for FnProcessor<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProcessor")
            .field("pre", &self.pre.is_some())
            .field("validity", &self.validity.is_some())
            .field("post", &self.post.is_some())
            .finish()
    }
}

impl<T> ValidityProcessor<T> for FnProcessor<T> {
    fn pre(&self, value: T) -> Result<Option<T>, Rejection> {
        match &self.pre {
            Some(f) => f(value),
            None => Ok(Some(value)),
        }
    }

    fn is_valid(&self, value: &T) -> Result<(), Rejection> {
        match &self.validity {
            Some(f) => f(value),
            None => Ok(()),
        }
    }

    fn post(&self, value: T) -> Result<T, Rejection> {
        match &self.post {
            Some(f) => f(value),
            None => Ok(value),
        }
    }
}

/// Two processors run back to back at every stage
///
/// `first` runs before `second` in `pre`, `is_valid` and `post`. If `first`
/// maps the value to unset in `pre`, `second` is not consulted.
pub struct ChainProcessor<T> {
    first: Arc<dyn ValidityProcessor<T>>,
    second: Arc<dyn ValidityProcessor<T>>,
}

impl<T> ChainProcessor<T> {
    /// Chain two processors
    #[inline]
    #[must_use]
    pub fn new(first: Arc<dyn ValidityProcessor<T>>, second: Arc<dyn ValidityProcessor<T>>) -> Self {
        Self { first, second }
    }
}

impl<T> Clone for ChainProcessor<T> {
    fn clone(&self) -> Self {
        Self {
            first: Arc::clone(&self.first),
            second: Arc::clone(&self.second),
        }
    }
}

impl<T> Debug for ChainProcessor<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainProcessor")
            .field("first", &self.first)
            .field("second", &self.second)
            .finish()
    }
}

impl<T> ValidityProcessor<T> for ChainProcessor<T> {
    fn pre(&self, value: T) -> Result<Option<T>, Rejection> {
        match self.first.pre(value)? {
            Some(value) => self.second.pre(value),
            None => Ok(None),
        }
    }

    fn is_valid(&self, value: &T) -> Result<(), Rejection> {
        self.first.is_valid(value)?;
        self.second.is_valid(value)
    }

    fn post(&self, value: T) -> Result<T, Rejection> {
        self.second.post(self.first.post(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trimming() -> FnProcessor<String> {
        FnProcessor::new().with_pre(|s: String| {
            let trimmed = s.trim().to_string();
            Ok((!trimmed.is_empty()).then_some(trimmed))
        })
    }

    fn short() -> FnProcessor<String> {
        FnProcessor::new().with_validity(|s: &String| {
            if s.len() <= 4 {
                Ok(())
            } else {
                Err(Rejection::new("too long"))
            }
        })
    }

    #[test]
    fn default_processor_is_identity() {
        let p = DefaultProcessor;
        assert_eq!(ValidityProcessor::<i32>::pre(&p, 5), Ok(Some(5)));
        assert_eq!(ValidityProcessor::<i32>::is_valid(&p, &5), Ok(()));
        assert_eq!(ValidityProcessor::<i32>::post(&p, 5), Ok(5));
    }

    #[test]
    fn fn_processor_unset_stages_are_identity() {
        let p = FnProcessor::<i32>::new();
        assert_eq!(p.pre(1), Ok(Some(1)));
        assert_eq!(p.post(1), Ok(1));
    }

    #[test]
    fn fn_processor_pre_can_unset() {
        let p = trimming();
        assert_eq!(p.pre("  a ".to_string()), Ok(Some("a".to_string())));
        assert_eq!(p.pre("   ".to_string()), Ok(None));
    }

    #[test]
    fn chain_runs_both_validity_checks() {
        let chain = ChainProcessor::new(Arc::new(trimming()), Arc::new(short()));
        assert!(chain.is_valid(&"abcd".to_string()).is_ok());
        assert_eq!(
            chain.is_valid(&"abcde".to_string()),
            Err(Rejection::new("too long"))
        );
    }

    #[test]
    fn chain_stops_after_unset() {
        let rejecting = FnProcessor::new().with_pre(|_: String| Err(Rejection::new("unreachable")));
        let chain = ChainProcessor::new(Arc::new(trimming()), Arc::new(rejecting));
        assert_eq!(chain.pre("  ".to_string()), Ok(None));
    }

    #[test]
    fn chain_post_order() {
        let append_a = FnProcessor::new().with_post(|s: String| Ok(s + "a"));
        let append_b = FnProcessor::new().with_post(|s: String| Ok(s + "b"));
        let chain = ChainProcessor::new(Arc::new(append_a), Arc::new(append_b));
        assert_eq!(chain.post(String::new()), Ok("ab".to_string()));
    }

    #[test]
    fn debug_shows_configured_stages() {
        let rendered = format!("{:?}", short());
        assert!(rendered.contains("validity: true"));
        assert!(rendered.contains("pre: false"));
    }
}
