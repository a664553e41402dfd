//! Filesystem placement primitives: copy, link, remove

use crate::error::{ModCacheError, ModCacheResult};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Recursively copy the contents of `src` into `dest`.
///
/// `dest` and its parents are created as needed. Existing files are
/// overwritten; files only present in `dest` are kept. Permission bits are
/// preserved and symlinks are recreated as symlinks.
pub async fn copy_tree(src: &Path, dest: &Path) -> ModCacheResult<()> {
    let src = src.to_path_buf();
    let dest = dest.to_path_buf();

    tokio::task::spawn_blocking(move || copy_tree_blocking(&src, &dest))
        .await
        .map_err(|e| ModCacheError::Internal(format!("copy task failed: {}", e)))?
}

fn copy_tree_blocking(src: &Path, dest: &Path) -> ModCacheResult<()> {
    if !src.is_dir() {
        return Err(ModCacheError::io(
            format!("copying {}", src.display()),
            io::Error::new(io::ErrorKind::NotFound, "source directory does not exist"),
        ));
    }

    fs::create_dir_all(dest)
        .map_err(|e| ModCacheError::io(format!("creating {}", dest.display()), e))?;

    for entry in WalkDir::new(src).min_depth(1).follow_links(false) {
        let entry = entry.map_err(|e| {
            let context = format!("walking {}", src.display());
            match e.into_io_error() {
                Some(io_err) => ModCacheError::io(context, io_err),
                None => ModCacheError::Internal(context),
            }
        })?;

        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| ModCacheError::Internal(e.to_string()))?;
        let target = dest.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target)
                .map_err(|e| ModCacheError::io(format!("creating {}", target.display()), e))?;
            copy_permissions(entry.path(), &target)?;
        } else if file_type.is_symlink() {
            let link_target = fs::read_link(entry.path()).map_err(|e| {
                ModCacheError::io(format!("reading link {}", entry.path().display()), e)
            })?;
            if fs::symlink_metadata(&target).is_ok() {
                remove_path(&target)?;
            }
            symlink(&link_target, &target)?;
        } else {
            if fs::symlink_metadata(&target)
                .map(|m| m.file_type().is_symlink())
                .unwrap_or(false)
            {
                remove_path(&target)?;
            }
            // fs::copy carries the permission bits across
            fs::copy(entry.path(), &target).map_err(|e| {
                ModCacheError::io(
                    format!("copying {} to {}", entry.path().display(), target.display()),
                    e,
                )
            })?;
        }
    }

    Ok(())
}

fn copy_permissions(src: &Path, dest: &Path) -> ModCacheResult<()> {
    let perms = fs::metadata(src)
        .map_err(|e| ModCacheError::io(format!("reading {}", src.display()), e))?
        .permissions();
    fs::set_permissions(dest, perms)
        .map_err(|e| ModCacheError::io(format!("setting permissions on {}", dest.display()), e))
}

fn remove_path(path: &Path) -> ModCacheResult<()> {
    let meta = fs::symlink_metadata(path)
        .map_err(|e| ModCacheError::io(format!("inspecting {}", path.display()), e))?;
    let result = if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|e| ModCacheError::io(format!("removing {}", path.display()), e))
}

#[cfg(unix)]
fn symlink(original: &Path, link: &Path) -> ModCacheResult<()> {
    std::os::unix::fs::symlink(original, link).map_err(|e| {
        ModCacheError::io(
            format!("linking {} -> {}", link.display(), original.display()),
            e,
        )
    })
}

#[cfg(windows)]
fn symlink(original: &Path, link: &Path) -> ModCacheResult<()> {
    // Directory links need the dir variant on Windows
    let result = if original.is_dir() {
        std::os::windows::fs::symlink_dir(original, link)
    } else {
        std::os::windows::fs::symlink_file(original, link)
    };
    result.map_err(|e| {
        ModCacheError::io(
            format!("linking {} -> {}", link.display(), original.display()),
            e,
        )
    })
}

/// Create a symlink at `link` pointing to `src`.
///
/// An existing symlink at `link` is replaced. Anything else there is left
/// alone and reported as [`ModCacheError::LinkOccupied`].
pub async fn create_link(src: &Path, link: &Path) -> ModCacheResult<()> {
    match tokio::fs::symlink_metadata(link).await {
        Ok(meta) if meta.file_type().is_symlink() => {
            debug!("Replacing existing link {}", link.display());
            tokio::fs::remove_file(link)
                .await
                .map_err(|e| ModCacheError::io(format!("removing link {}", link.display()), e))?;
        }
        Ok(_) => return Err(ModCacheError::LinkOccupied(link.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(ModCacheError::io(
                format!("inspecting {}", link.display()),
                e,
            ))
        }
    }

    if let Some(parent) = link.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ModCacheError::io(format!("creating {}", parent.display()), e))?;
    }

    let src: PathBuf = src.to_path_buf();
    let dest: PathBuf = link.to_path_buf();
    tokio::task::spawn_blocking(move || symlink(&src, &dest))
        .await
        .map_err(|e| ModCacheError::Internal(format!("link task failed: {}", e)))?
}

/// Recursively delete a directory; a missing directory is not an error
pub async fn remove_dir(path: &Path) -> ModCacheResult<()> {
    match tokio::fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ModCacheError::io(format!("removing {}", path.display()), e)),
    }
}
