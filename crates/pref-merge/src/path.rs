//! Key paths for addressing entries inside a container tree
//!
//! Provides [`KeyPath`] used in merge errors and change-set reports.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// One step of a [`KeyPath`]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Segment {
    /// Container key
    Key(String),
    /// Array index
    Index(usize),
}

/// Path from a root container to an entry
///
/// # Examples
/// - `["limits", "max"]` → `limits.max`
/// - `["servers", 0, "port"]` → `servers[0].port`
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyPath(Vec<Segment>);

impl KeyPath {
    /// Empty path (root)
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Path with one key
    #[inline]
    #[must_use]
    pub fn single(key: impl Into<String>) -> Self {
        Self(vec![Segment::Key(key.into())])
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    /// Get number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if path is empty (root)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a key, returning new path
    #[inline]
    #[must_use]
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut new = self.clone();
        new.0.push(Segment::Key(key.into()));
        new
    }

    /// Append an index, returning new path
    #[inline]
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut new = self.clone();
        new.0.push(Segment::Index(index));
        new
    }

    /// Get parent path (if not root)
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.0.split_last().map(|(_, rest)| Self(rest.to_vec()))
    }

    /// Get last segment (if not root)
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&Segment> {
        self.0.last()
    }

    /// Check if this path is a prefix of another
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl Display for KeyPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Key(key) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    for c in key.chars() {
                        if matches!(c, '.' | '[' | ']' | '\\') {
                            f.write_str("\\")?;
                        }
                        write!(f, "{c}")?;
                    }
                }
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Parses the [`Display`] form
///
/// A backslash escapes the next character of a key, so keys containing
/// `.`, `[` or `]` survive a round trip.
impl FromStr for KeyPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }

        let invalid = || PathError::InvalidIndex(s.to_string());
        let mut segments = Vec::new();
        let mut key = String::new();
        let mut in_key = true;
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' if in_key => key.push(chars.next().ok_or(PathError::DanglingEscape)?),
                '.' => {
                    if in_key {
                        push_key(&mut segments, &mut key)?;
                    }
                    in_key = true;
                }
                '[' => {
                    if in_key {
                        push_key(&mut segments, &mut key)?;
                        in_key = false;
                    }
                    let mut digits = String::new();
                    loop {
                        match chars.next() {
                            Some(']') => break,
                            Some(d) => digits.push(d),
                            None => return Err(invalid()),
                        }
                    }
                    segments.push(Segment::Index(digits.parse().map_err(|_| invalid())?));
                }
                c if in_key => key.push(c),
                _ => return Err(invalid()),
            }
        }
        if in_key {
            push_key(&mut segments, &mut key)?;
        }
        Ok(Self(segments))
    }
}

fn push_key(segments: &mut Vec<Segment>, key: &mut String) -> Result<(), PathError> {
    if key.is_empty() {
        return Err(PathError::EmptySegment);
    }
    segments.push(Segment::Key(std::mem::take(key)));
    Ok(())
}

/// Errors when parsing a [`KeyPath`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Empty key between separators
    #[error("empty path segment")]
    EmptySegment,

    /// Malformed `[index]` suffix
    #[error("invalid index in path: {0}")]
    InvalidIndex(String),

    /// Backslash at the end of the path
    #[error("dangling escape at end of path")]
    DanglingEscape,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mixes_keys_and_indices() {
        let path = KeyPath::single("servers").index(0).key("port");
        assert_eq!(path.to_string(), "servers[0].port");
        assert_eq!(KeyPath::root().to_string(), "");
    }

    #[test]
    fn parse_round_trips() {
        for text in ["retries", "limits.max", "servers[1].port", "grid[0][2].cell"] {
            let path: KeyPath = text.parse().unwrap();
            assert_eq!(path.to_string(), text);
        }
    }

    #[test]
    fn parse_rejects_malformed() {
        assert_eq!("a..b".parse::<KeyPath>(), Err(PathError::EmptySegment));
        assert!(matches!("a[x]".parse::<KeyPath>(), Err(PathError::InvalidIndex(_))));
        assert!(matches!("a[1".parse::<KeyPath>(), Err(PathError::InvalidIndex(_))));
        assert!(matches!("a[1]b".parse::<KeyPath>(), Err(PathError::InvalidIndex(_))));
    }

    #[test]
    fn keys_with_separators_are_escaped() {
        let path = KeyPath::single("a.b").index(2).key("c[0]").key("d\\e");
        let text = path.to_string();
        assert_eq!(text, r"a\.b[2].c\[0\].d\\e");
        assert_eq!(text.parse::<KeyPath>(), Ok(path));

        assert_eq!(r"x\".parse::<KeyPath>(), Err(PathError::DanglingEscape));
    }

    #[test]
    fn prefix_and_parent() {
        let parent: KeyPath = "servers[0]".parse().unwrap();
        let child = parent.key("port");
        assert!(parent.is_prefix_of(&child));
        assert!(!child.is_prefix_of(&parent));
        assert_eq!(child.parent(), Some(parent));
        assert_eq!(child.last(), Some(&Segment::Key("port".into())));
    }
}
