//! Process-scoped module cache
//!
//! [`ModuleCache`] owns the in-memory entry map for one cache root. It is
//! opened once per process, scans pre-existing directories in the background
//! and fires a one-shot "loaded" signal when that scan completes.

use crate::cache::entry::CacheEntry;
use crate::cache::loader::{canonicalize, resolve_identity};
use crate::cache::locator::{expand_locator, random_dir_name};
use crate::cache::placement::{copy_tree, create_link, remove_dir};
use crate::config::{Config, ConfigManager};
use crate::descriptor::validate_name;
use crate::error::{ModCacheError, ModCacheResult};
use crate::install::{GitInstaller, SetVersionOptions, VersionSwitcher};
use crate::vcs::{CloneOutput, GitCli, VersionControl};
use futures_util::future::join_all;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::fs;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Settings for opening a cache
#[derive(Debug, Clone)]
pub struct CacheOptions {
    /// Directory holding one subdirectory per module
    pub root: PathBuf,

    /// Source root that short names are expanded against
    pub default_source: String,

    /// Where clone progress is written
    pub clone_output: CloneOutput,
}

impl CacheOptions {
    /// Options for `root` with the configured default source
    pub fn from_config(config: &Config, root: PathBuf) -> Self {
        Self {
            root,
            default_source: config.cache.default_source.clone(),
            clone_output: CloneOutput::Inherit,
        }
    }
}

/// Local cache of version-controlled modules
pub struct ModuleCache {
    root: PathBuf,
    default_source: String,
    clone_output: CloneOutput,
    vcs: Arc<dyn VersionControl>,
    switcher: Arc<dyn VersionSwitcher>,
    // Never held across an .await
    entries: RwLock<BTreeMap<String, CacheEntry>>,
    loaded: watch::Sender<bool>,
}

impl ModuleCache {
    /// Open the cache at `options.root` and start the startup scan.
    ///
    /// The root is created if missing and made absolute. The returned cache is usable
    /// immediately; [`ModuleCache::wait_loaded`] resolves once every
    /// pre-existing directory has been inspected.
    pub async fn open(
        options: CacheOptions,
        vcs: Arc<dyn VersionControl>,
        switcher: Arc<dyn VersionSwitcher>,
    ) -> ModCacheResult<Arc<Self>> {
        fs::create_dir_all(&options.root).await.map_err(|e| {
            ModCacheError::io(
                format!("creating cache root {}", options.root.display()),
                e,
            )
        })?;

        // Symlinks into the cache must not depend on the caller's directory
        let root = std::path::absolute(&options.root).map_err(|e| {
            ModCacheError::io(
                format!("resolving cache root {}", options.root.display()),
                e,
            )
        })?;

        let (loaded, _) = watch::channel(false);
        let cache = Arc::new(Self {
            root,
            default_source: options.default_source,
            clone_output: options.clone_output,
            vcs,
            switcher,
            entries: RwLock::new(BTreeMap::new()),
            loaded,
        });

        let scanner = Arc::clone(&cache);
        tokio::spawn(async move {
            if let Err(e) = scanner.scan().await {
                warn!("Cache scan of {} failed: {}", scanner.root.display(), e);
            }
        });

        Ok(cache)
    }

    /// Open the cache with the git client and installer described by `config`
    pub async fn from_config(config: &Config, root: Option<PathBuf>) -> ModCacheResult<Arc<Self>> {
        let root = root.unwrap_or_else(|| ConfigManager::cache_root(config));
        let vcs: Arc<dyn VersionControl> = Arc::new(GitCli::new(config.git.program.clone()));
        let switcher = Arc::new(GitInstaller::new(Arc::clone(&vcs), config.install.clone()));

        Self::open(CacheOptions::from_config(config, root), vcs, switcher).await
    }

    /// Cache root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// On-disk directory of a cached module
    pub fn module_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Whether the startup scan has completed
    pub fn is_loaded(&self) -> bool {
        *self.loaded.borrow()
    }

    /// Wait for the startup scan to complete
    pub async fn wait_loaded(&self) {
        let mut rx = self.loaded.subscribe();
        // The sender lives in `self`, so this can only end with `true`
        let _ = rx.wait_for(|loaded| *loaded).await;
    }

    /// Inspect every directory under the root, then mark the cache loaded.
    ///
    /// Each directory loads independently; a failure is logged and skipped.
    async fn scan(&self) -> ModCacheResult<usize> {
        let result = self.scan_entries().await;
        self.loaded.send_replace(true);
        result
    }

    async fn scan_entries(&self) -> ModCacheResult<usize> {
        let mut dirs = Vec::new();
        let mut read_dir = fs::read_dir(&self.root).await.map_err(|e| {
            ModCacheError::io(format!("reading cache root {}", self.root.display()), e)
        })?;

        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| ModCacheError::io("reading cache entry", e))?
        {
            let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
            if is_dir {
                dirs.push(entry.path());
            }
        }

        let results = join_all(dirs.iter().map(|dir| self.load_cache_path(dir))).await;

        let mut loaded = 0;
        for (dir, result) in dirs.iter().zip(results) {
            match result {
                Ok(_) => loaded += 1,
                Err(e) if e.is_identity_failure() => {
                    warn!("Skipping cache directory {}: {}", dir.display(), e)
                }
                Err(e) => error!("Failed to load cache directory {}: {}", dir.display(), e),
            }
        }

        info!("Loaded {} cached module(s) from {}", loaded, self.root.display());
        Ok(loaded)
    }

    /// Resolve the identity of the working copy at `path`, move it to its
    /// canonical directory and register it under its name.
    pub async fn load_cache_path(&self, path: &Path) -> ModCacheResult<CacheEntry> {
        let entry = resolve_identity(self.vcs.as_ref(), path).await?;
        canonicalize(&self.root, path, &entry.name).await?;

        debug!("Registered {}", entry);
        self.write_entries()
            .insert(entry.name.clone(), entry.clone());

        Ok(entry)
    }

    /// Find an entry by exact name or by normalized locator.
    ///
    /// Short names are also tried in their expanded form so that a query
    /// matches an entry whose recorded origin is the expanded URL.
    pub fn find(&self, name_or_url: &str) -> Option<CacheEntry> {
        let entries = self.read_entries();

        if let Some(entry) = entries.values().find(|e| e.matches(name_or_url)) {
            return Some(entry.clone());
        }

        let expanded = expand_locator(name_or_url, &self.default_source);
        if expanded != name_or_url {
            return entries.values().find(|e| e.matches(&expanded)).cloned();
        }

        None
    }

    /// Whether a name or locator resolves to a cached entry
    pub fn has(&self, name_or_url: &str) -> bool {
        self.find(name_or_url).is_some()
    }

    /// All known entries, sorted by name
    pub fn entries(&self) -> Vec<CacheEntry> {
        self.read_entries().values().cloned().collect()
    }

    /// Ensure a module is cached and set to `version` (latest when `None`).
    ///
    /// A cache hit only switches the existing working copy. A miss clones
    /// into a temporary directory, resolves the module's identity, moves it
    /// to its canonical name and runs a forced install. A failure part-way
    /// through leaves the temporary directory on disk.
    pub async fn add(
        &self,
        name_or_url: &str,
        version: Option<&str>,
    ) -> ModCacheResult<CacheEntry> {
        self.wait_loaded().await;

        if let Some(entry) = self.find(name_or_url) {
            debug!("Cache hit for {}: {}", name_or_url, entry);
            let applied = self
                .switcher
                .set_version(
                    &self.module_path(&entry.name),
                    version,
                    SetVersionOptions::default(),
                )
                .await?;
            return Ok(self.record_version(entry, applied));
        }

        // A `#version` fragment is never part of what git fetches
        let base = name_or_url.split('#').next().unwrap_or(name_or_url);
        let url = expand_locator(base, &self.default_source);
        let temp_path = self.root.join(random_dir_name());

        info!("Adding {} to cache", url);
        if let Err(e) = self
            .vcs
            .clone_repo(&url, &temp_path, self.clone_output)
            .await
        {
            error!("Failed to clone {}: {}", url, e);
            return Err(match e {
                ModCacheError::CloneFailed { .. } => e,
                other => ModCacheError::CloneFailed {
                    locator: url,
                    reason: other.to_string(),
                },
            });
        }

        let entry = self.load_cache_path(&temp_path).await?;

        let applied = self
            .switcher
            .set_version(
                &self.module_path(&entry.name),
                version,
                SetVersionOptions {
                    force_install: true,
                },
            )
            .await?;

        Ok(self.record_version(entry, applied))
    }

    /// Delete a module's cache directory and forget its entry
    pub async fn remove(&self, name: &str) -> ModCacheResult<()> {
        validate_name(name).map_err(ModCacheError::User)?;

        let path = self.module_path(name);
        remove_dir(&path).await?;
        self.write_entries().remove(name);

        info!("Removed {} from cache", name);
        Ok(())
    }

    /// Copy a cached module's contents into `dest`
    pub async fn copy(&self, entry: &CacheEntry, dest: &Path) -> ModCacheResult<()> {
        info!("Installing {} at {}", entry.name, dest.display());
        copy_tree(&self.module_path(&entry.name), dest).await
    }

    /// Symlink a cached module at `dest/<name>`
    pub async fn link(&self, entry: &CacheEntry, dest: &Path) -> ModCacheResult<()> {
        let link = dest.join(&entry.name);
        info!("Linking {} at {}", entry.name, link.display());
        create_link(&self.module_path(&entry.name), &link).await
    }

    fn record_version(&self, mut entry: CacheEntry, version: String) -> CacheEntry {
        entry.version = version;
        self.write_entries()
            .insert(entry.name.clone(), entry.clone());
        entry
    }

    fn read_entries(&self) -> RwLockReadGuard<'_, BTreeMap<String, CacheEntry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_entries(&self) -> RwLockWriteGuard<'_, BTreeMap<String, CacheEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}
