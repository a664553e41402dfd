//! Cache entries and locator matching

use serde::{Deserialize, Serialize};
use std::fmt;

/// One module resident in the cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Canonical module name from the package descriptor; also the directory name
    pub name: String,

    /// Resolved version: a tag name, or a commit id when untagged
    pub version: String,

    /// Origin the module was obtained from
    pub url: String,
}

impl CacheEntry {
    /// Create a new cache entry
    pub fn new(name: impl Into<String>, version: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            url: url.into(),
        }
    }

    /// Whether a name-or-locator query refers to this entry.
    ///
    /// Names match exactly; locators match after [`clean_locator`] on both sides.
    pub fn matches(&self, query: &str) -> bool {
        self.name == query || clean_locator(&self.url) == clean_locator(query)
    }
}

impl fmt::Display for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} ({})", self.name, self.version, self.url)
    }
}

/// Normalize a locator for comparison.
///
/// Drops a `#version` fragment, then one trailing slash and one `.git`
/// suffix, so `org/mod`, `org/mod.git`, `org/mod/` and `org/mod#v1` compare
/// equal.
pub fn clean_locator(locator: &str) -> &str {
    let base = locator.split('#').next().unwrap_or(locator);
    let base = base.strip_suffix('/').unwrap_or(base);
    base.strip_suffix(".git").unwrap_or(base)
}
