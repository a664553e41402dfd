//! Local module cache
//!
//! Keeps one working copy per module under a cache root, keyed by the name
//! each module declares in its own package descriptor.
//!
//! # Directory Lifecycle
//!
//! | Stage | Directory name | Description |
//! |-------|----------------|-------------|
//! | Cloning | `tmp-<random>` | Fresh clone, identity unknown |
//! | Canonical | `<name>` | Identity resolved, registered in memory |
//! | Orphaned | `tmp-<random>` | Load failed or name already taken; left on disk |
//!
//! A rename to a canonical name never replaces an existing directory.

pub mod entry;
pub mod loader;
pub mod locator;
pub mod placement;
pub mod store;

pub use entry::{clean_locator, CacheEntry};
pub use locator::{expand_locator, is_full_locator};
pub use store::{CacheOptions, ModuleCache};
