//! Locator expansion and temporary directory naming

use regex::Regex;
use std::sync::LazyLock;
use uuid::Uuid;

/// `scheme:` prefix, e.g. `https:`, `file:`, `git+ssh:`
static PROTOCOL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+\-.]*:").expect("valid regex"));

/// scp-style `user@host:path`
static SSH_LOCATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.+?@.+?:.+").expect("valid regex"));

/// Whether a locator already names a fetchable source
pub fn is_full_locator(locator: &str) -> bool {
    PROTOCOL.is_match(locator) || SSH_LOCATOR.is_match(locator)
}

/// Expand a short module name against the default source root.
///
/// Full URLs and SSH-style locators pass through unchanged.
pub fn expand_locator(name_or_url: &str, default_source: &str) -> String {
    if is_full_locator(name_or_url) {
        return name_or_url.to_string();
    }

    if default_source.is_empty() || default_source.ends_with('/') {
        format!("{}{}", default_source, name_or_url)
    } else {
        format!("{}/{}", default_source, name_or_url)
    }
}

/// Random, opaque directory name for an in-flight clone.
///
/// UUID v4 draws from the OS CSPRNG, so concurrent acquisitions never collide.
pub fn random_dir_name() -> String {
    format!("tmp-{}", Uuid::new_v4().simple())
}
