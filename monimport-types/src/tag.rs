//! Tags scoping the remote configuration service.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque scope identifier in the remote source.
///
/// Tags form a tree on the remote side; locally they are just strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(String);

impl Tag {
    /// Creates a tag from any string-like value, verbatim.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses a comma-separated tag list.
    ///
    /// Entries are trimmed; entries empty after trimming are dropped, so an
    /// empty or blank list yields no tags at all.
    #[must_use]
    pub fn parse_list(list: &str) -> Vec<Tag> {
        list.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(Tag::new)
            .collect()
    }

    /// Picks the root tags from the plural list and the legacy single tag.
    ///
    /// The plural list wins whenever it yields at least one tag; the legacy
    /// value is only consulted when it yields none. The two are never unioned.
    #[must_use]
    pub fn roots(tags: &str, legacy_tag: &str) -> Vec<Tag> {
        let roots = Self::parse_list(tags);
        if roots.is_empty() {
            Self::parse_list(legacy_tag)
        } else {
            roots
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Tag {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Tag {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for Tag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
