//! Package descriptor parsing
//!
//! Every cached module carries a `package.json` at its root. The cache only
//! cares about the `name` field (the canonical cache key) and the `scripts`
//! table consulted by the installer.

use serde::Deserialize;
use std::collections::HashMap;

/// File name of the package descriptor inside a module
pub const DESCRIPTOR_FILE: &str = "package.json";

/// Parsed `package.json`
#[derive(Debug, Clone, Deserialize)]
pub struct PackageDescriptor {
    /// Canonical module name
    pub name: String,

    /// Named lifecycle scripts
    #[serde(default)]
    pub scripts: HashMap<String, String>,
}

impl PackageDescriptor {
    /// Parse descriptor bytes, rejecting names that cannot be a directory name
    pub fn parse(bytes: &[u8]) -> Result<Self, String> {
        let descriptor: Self = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
        validate_name(&descriptor.name)?;
        Ok(descriptor)
    }

    /// Look up a lifecycle script by key
    pub fn script(&self, key: &str) -> Option<&str> {
        self.scripts
            .get(key)
            .map(String::as_str)
            .filter(|s| !s.trim().is_empty())
    }
}

/// The name becomes a directory under the cache root, so it must be a single
/// path component.
pub(crate) fn validate_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("\"name\" is empty".to_string());
    }
    if name == "." || name == ".." || name.contains('/') || name.contains('\\') || name.contains('\0')
    {
        return Err(format!(
            "invalid name '{}': must not contain path separators",
            name
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal() {
        let descriptor = PackageDescriptor::parse(br#"{"name": "example"}"#).unwrap();
        assert_eq!(descriptor.name, "example");
        assert!(descriptor.script("install").is_none());
    }

    #[test]
    fn parse_with_scripts() {
        let json = br#"{
            "name": "example",
            "version": "1.2.3",
            "scripts": {"install": "./install.sh", "test": ""}
        }"#;
        let descriptor = PackageDescriptor::parse(json).unwrap();
        assert_eq!(descriptor.script("install"), Some("./install.sh"));
        assert!(descriptor.script("test").is_none());
    }

    #[test]
    fn missing_name_rejected() {
        assert!(PackageDescriptor::parse(br#"{"version": "1.0.0"}"#).is_err());
    }

    #[test]
    fn malformed_json_rejected() {
        assert!(PackageDescriptor::parse(b"{not json").is_err());
    }

    #[test]
    fn path_like_names_rejected() {
        assert!(PackageDescriptor::parse(br#"{"name": "../escape"}"#).is_err());
        assert!(PackageDescriptor::parse(br#"{"name": ".."}"#).is_err());
        assert!(PackageDescriptor::parse(br#"{"name": ""}"#).is_err());
    }
}
