//! Version-control client abstraction
//!
//! The cache never talks to git directly. Everything it needs from a working
//! copy (tags, HEAD, file contents at a revision, remote URL) and the clone
//! itself goes through the [`VersionControl`] trait, so the cache logic can be
//! exercised against an in-process fake.

mod git;

pub use git::GitCli;

use crate::error::ModCacheResult;
use async_trait::async_trait;
use semver::Version;
use std::path::Path;

/// Where clone progress goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneOutput {
    /// Stream directly to the operator's terminal
    Inherit,
    /// Capture and discard (stderr kept for error reporting)
    Quiet,
}

/// Abstract version-control client interface
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Latest tag in the local working copy, `None` if there are no tags
    async fn latest_local_tag(&self, repo: &Path) -> ModCacheResult<Option<String>>;

    /// Raw output of `rev-parse HEAD` (may carry a trailing newline)
    async fn rev_parse_head(&self, repo: &Path) -> ModCacheResult<String>;

    /// Contents of `file` as it exists at `rev`
    async fn read_file_at_revision(
        &self,
        repo: &Path,
        rev: &str,
        file: &str,
    ) -> ModCacheResult<Vec<u8>>;

    /// Recorded origin URL of the working copy
    async fn remote_url(&self, repo: &Path) -> ModCacheResult<String>;

    /// Clone `locator` into `dest`
    async fn clone_repo(
        &self,
        locator: &str,
        dest: &Path,
        output: CloneOutput,
    ) -> ModCacheResult<()>;

    /// Fetch tags from origin
    async fn fetch_tags(&self, repo: &Path) -> ModCacheResult<()>;

    /// All local tag names
    async fn list_tags(&self, repo: &Path) -> ModCacheResult<Vec<String>>;

    /// Check out a tag or commit
    async fn checkout(&self, repo: &Path, rev: &str) -> ModCacheResult<()>;
}

/// Pick the latest tag from a tag list.
///
/// Tags that parse as semver (an optional leading `v` is ignored) always win
/// over tags that don't; within each group the highest wins.
pub fn latest_tag<S: AsRef<str>>(tags: &[S]) -> Option<String> {
    let best_semver = tags
        .iter()
        .filter_map(|t| parse_tag_version(t.as_ref()).map(|v| (v, t.as_ref())))
        .max_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, t)| t.to_string());

    best_semver.or_else(|| {
        tags.iter()
            .map(AsRef::as_ref)
            .filter(|t| !t.is_empty())
            .max()
            .map(str::to_string)
    })
}

fn parse_tag_version(tag: &str) -> Option<Version> {
    let trimmed = tag.strip_prefix('v').unwrap_or(tag);
    Version::parse(trimmed).ok()
}
