//! Error types for modcache
//!
//! All modules use `ModCacheResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for modcache operations
pub type ModCacheResult<T> = Result<T, ModCacheError>;

/// All errors that can occur in modcache
#[derive(Error, Debug)]
pub enum ModCacheError {
    // Identity resolution errors
    #[error("Module at {path} requires a valid package descriptor: {reason}")]
    InvalidDescriptor { path: PathBuf, reason: String },

    #[error("Could not determine version of {path}: {reason}")]
    VersionUnreadable { path: PathBuf, reason: String },

    #[error("Could not read remote URL of {path}: {reason}")]
    RemoteUnreadable { path: PathBuf, reason: String },

    // Acquisition errors
    #[error("Failed to clone {locator}: {reason}")]
    CloneFailed { locator: String, reason: String },

    #[error("Failed to set {name} to version {version}: {reason}")]
    VersionSwitch {
        name: String,
        version: String,
        reason: String,
    },

    #[error("Install script for {name} exited with code {code}")]
    InstallScript { name: String, code: i32 },

    // Placement errors
    #[error("Please remove existing module at {0} before linking")]
    LinkOccupied(PathBuf),

    #[error("Module not found in cache: {0}")]
    EntryNotFound(String),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command execution error: {command}, stderr: {stderr}")]
    CommandExecution { command: String, stderr: String },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl ModCacheError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a command execution error
    pub fn command_exec(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::CommandExecution {
            command: command.into(),
            stderr: stderr.into(),
        }
    }

    /// Whether this error came from resolving a directory's identity.
    ///
    /// These are the errors the startup scan swallows per directory.
    pub fn is_identity_failure(&self) -> bool {
        matches!(
            self,
            Self::InvalidDescriptor { .. }
                | Self::VersionUnreadable { .. }
                | Self::RemoteUnreadable { .. }
        )
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::LinkOccupied(_) => {
                Some("Remove the existing module directory manually, then retry with --link")
            }
            Self::InvalidDescriptor { .. } => {
                Some("The module must have a package.json with a \"name\" field")
            }
            Self::CloneFailed { .. } => Some("Check the locator and your git credentials"),
            Self::CommandFailed { .. } => Some("Is git installed and on PATH?"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ModCacheError::CloneFailed {
            locator: "https://github.com/org/mod".to_string(),
            reason: "not found".to_string(),
        };
        assert!(err.to_string().contains("https://github.com/org/mod"));
    }

    #[test]
    fn error_hint() {
        let err = ModCacheError::LinkOccupied(PathBuf::from("/project/modules/example"));
        assert!(err.hint().unwrap().contains("manually"));
        assert!(ModCacheError::User("x".to_string()).hint().is_none());
    }

    #[test]
    fn identity_failures() {
        let err = ModCacheError::InvalidDescriptor {
            path: PathBuf::from("/cache/123"),
            reason: "missing name".to_string(),
        };
        assert!(err.is_identity_failure());
        assert!(!ModCacheError::EntryNotFound("x".to_string()).is_identity_failure());
    }
}
