//! Key enumeration

use std::iter::FusedIterator;

/// Container keys in insertion order
///
/// The keys are collected into a list when created. Clone it to restart
/// the iteration from the current position.
#[derive(Debug, Clone)]
pub struct Names<'a> {
    inner: std::vec::IntoIter<&'a str>,
}

impl<'a> Names<'a> {
    pub(crate) fn new(keys: impl Iterator<Item = &'a String>) -> Self {
        Self {
            inner: keys.map(String::as_str).collect::<Vec<_>>().into_iter(),
        }
    }

    /// Remaining names as a slice
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[&'a str] {
        self.inner.as_slice()
    }
}

impl<'a> Iterator for Names<'a> {
    type Item = &'a str;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Names<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for Names<'_> {}

impl FusedIterator for Names<'_> {}
