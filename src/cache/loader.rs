//! Cache loader: identity resolution for a cache directory
//!
//! A directory's identity is derived purely from its version-control state:
//! the version (latest tag, else HEAD), the descriptor name *at that version*,
//! and the origin URL. Once known, the directory is moved to its canonical
//! location `<root>/<name>` unless something already lives there.

use crate::cache::entry::CacheEntry;
use crate::descriptor::{PackageDescriptor, DESCRIPTOR_FILE};
use crate::error::{ModCacheError, ModCacheResult};
use crate::vcs::VersionControl;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error, warn};

/// Resolve the version, name and origin of the working copy at `path`
pub async fn resolve_identity(
    vcs: &dyn VersionControl,
    path: &Path,
) -> ModCacheResult<CacheEntry> {
    let version = resolve_version(vcs, path).await?;

    let descriptor_bytes = vcs
        .read_file_at_revision(path, &version, DESCRIPTOR_FILE)
        .await
        .map_err(|e| {
            error!("Error reading module {} at {}", DESCRIPTOR_FILE, version);
            ModCacheError::InvalidDescriptor {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;

    let descriptor = PackageDescriptor::parse(&descriptor_bytes).map_err(|reason| {
        ModCacheError::InvalidDescriptor {
            path: path.to_path_buf(),
            reason,
        }
    })?;

    let url = vcs.remote_url(path).await.map_err(|e| {
        error!("Error getting module URL for {}: {}", path.display(), e);
        ModCacheError::RemoteUnreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
    })?;

    Ok(CacheEntry::new(descriptor.name, version, url))
}

/// Latest local tag, falling back to the checked-out commit
async fn resolve_version(vcs: &dyn VersionControl, path: &Path) -> ModCacheResult<String> {
    let unreadable = |e: ModCacheError| ModCacheError::VersionUnreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    if let Some(tag) = vcs.latest_local_tag(path).await.map_err(unreadable)? {
        return Ok(tag);
    }

    debug!("No tags in {}, using HEAD", path.display());
    let head = vcs.rev_parse_head(path).await.map_err(unreadable)?;
    let head = head.trim_end_matches(['\r', '\n']).to_string();

    if head.is_empty() {
        return Err(ModCacheError::VersionUnreadable {
            path: path.to_path_buf(),
            reason: "HEAD resolved to an empty revision".to_string(),
        });
    }

    Ok(head)
}

/// Move `path` to `<root>/<name>` if that slot is free.
///
/// Returns the directory that now holds the canonical copy. When the slot is
/// already taken the source directory is left untouched where it is.
///
/// The slot is claimed with an exclusive `create_dir` before the rename, so a
/// concurrent loader can never move onto a directory that appeared between a
/// check and the rename. On Unix the rename then replaces the empty claim; on
/// other platforms the claim is released first, leaving a short window.
pub async fn canonicalize(root: &Path, path: &Path, name: &str) -> ModCacheResult<PathBuf> {
    let target = root.join(name);

    if target == path {
        return Ok(target);
    }

    match fs::create_dir(&target).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            warn!(
                "{} already exists, leaving {} in place",
                target.display(),
                path.display()
            );
            return Ok(target);
        }
        Err(e) => {
            return Err(ModCacheError::io(
                format!("claiming {}", target.display()),
                e,
            ))
        }
    }

    #[cfg(not(unix))]
    fs::remove_dir(&target)
        .await
        .map_err(|e| ModCacheError::io(format!("releasing {}", target.display()), e))?;

    if let Err(e) = fs::rename(path, &target).await {
        // Only an empty claim is removed; a racer's copy stays
        let _ = fs::remove_dir(&target).await;
        return Err(ModCacheError::io(
            format!("renaming {} to {}", path.display(), target.display()),
            e,
        ));
    }

    debug!("Moved {} to {}", path.display(), target.display());
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn canonicalize_renames_into_free_slot() {
        let root = TempDir::new().unwrap();
        let tmp = root.path().join("tmp-abc");
        std::fs::create_dir(&tmp).unwrap();
        std::fs::write(tmp.join("file.txt"), "new").unwrap();

        let target = canonicalize(root.path(), &tmp, "example").await.unwrap();

        assert_eq!(target, root.path().join("example"));
        assert!(!tmp.exists());
        assert_eq!(
            std::fs::read_to_string(target.join("file.txt")).unwrap(),
            "new"
        );
    }

    #[tokio::test]
    async fn canonicalize_never_overwrites() {
        let root = TempDir::new().unwrap();
        let existing = root.path().join("example");
        std::fs::create_dir(&existing).unwrap();
        std::fs::write(existing.join("file.txt"), "original").unwrap();

        let tmp = root.path().join("tmp-abc");
        std::fs::create_dir(&tmp).unwrap();
        std::fs::write(tmp.join("file.txt"), "new").unwrap();

        let target = canonicalize(root.path(), &tmp, "example").await.unwrap();

        assert_eq!(target, existing);
        assert!(tmp.exists(), "temporary directory is left behind");
        assert_eq!(
            std::fs::read_to_string(existing.join("file.txt")).unwrap(),
            "original"
        );
    }

    #[tokio::test]
    async fn canonicalize_keeps_empty_existing_directory() {
        let root = TempDir::new().unwrap();
        let existing = root.path().join("example");
        std::fs::create_dir(&existing).unwrap();

        let tmp = root.path().join("tmp-abc");
        std::fs::create_dir(&tmp).unwrap();
        std::fs::write(tmp.join("file.txt"), "new").unwrap();

        let target = canonicalize(root.path(), &tmp, "example").await.unwrap();

        assert_eq!(target, existing);
        assert!(tmp.join("file.txt").exists());
        assert!(!existing.join("file.txt").exists());
    }

    #[tokio::test]
    async fn canonicalize_failed_rename_releases_slot() {
        let root = TempDir::new().unwrap();
        let missing = root.path().join("tmp-gone");

        let err = canonicalize(root.path(), &missing, "example").await.unwrap_err();

        assert!(matches!(err, ModCacheError::Io { .. }));
        assert!(!root.path().join("example").exists());
    }

    #[tokio::test]
    async fn canonicalize_same_path_is_noop() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("example");
        std::fs::create_dir(&dir).unwrap();

        let target = canonicalize(root.path(), &dir, "example").await.unwrap();
        assert_eq!(target, dir);
        assert!(dir.exists());
    }
}
