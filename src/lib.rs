//! modcache - local cache of version-controlled modules
//!
//! Clones modules once, names them by their own package descriptor, switches
//! them between tags and commits, and places them into projects by copy or
//! symlink.

pub mod cache;
pub mod cli;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod install;
pub mod ui;
pub mod vcs;

pub use error::{ModCacheError, ModCacheResult};
