//! Module version switching and install actions
//!
//! The cache hands a working copy to a [`VersionSwitcher`] whenever a module
//! is first acquired or re-requested. The default [`GitInstaller`] checks out
//! the requested tag/commit and runs the module's install script.

use crate::config::schema::InstallConfig;
use crate::descriptor::{PackageDescriptor, DESCRIPTOR_FILE};
use crate::error::{ModCacheError, ModCacheResult};
use crate::vcs::{latest_tag, VersionControl};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Options for a version switch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetVersionOptions {
    /// Run install actions even when the version did not change
    pub force_install: bool,
}

/// Abstract version switcher interface
#[async_trait]
pub trait VersionSwitcher: Send + Sync {
    /// Switch the working copy at `path` to `version` (latest when `None`)
    /// and return the version actually applied.
    async fn set_version(
        &self,
        path: &Path,
        version: Option<&str>,
        options: SetVersionOptions,
    ) -> ModCacheResult<String>;
}

/// Version switcher that checks out git revisions and runs install scripts
pub struct GitInstaller {
    vcs: Arc<dyn VersionControl>,
    config: InstallConfig,
}

impl GitInstaller {
    /// Create an installer on top of a version-control client
    pub fn new(vcs: Arc<dyn VersionControl>, config: InstallConfig) -> Self {
        Self { vcs, config }
    }

    /// Resolve "latest": the newest tag, or the current commit if untagged
    async fn resolve_latest(&self, path: &Path) -> ModCacheResult<String> {
        let tags = self.vcs.list_tags(path).await?;
        match latest_tag(&tags) {
            Some(tag) => Ok(tag),
            None => {
                let head = self.vcs.rev_parse_head(path).await?;
                Ok(head.trim_end().to_string())
            }
        }
    }

    async fn current_revision(&self, path: &Path) -> Option<String> {
        self.vcs
            .rev_parse_head(path)
            .await
            .ok()
            .map(|h| h.trim_end().to_string())
    }

    /// Run the configured install script from the descriptor, if any
    async fn run_install_script(&self, path: &Path, name: &str) -> ModCacheResult<()> {
        let descriptor_path = path.join(DESCRIPTOR_FILE);
        let bytes = tokio::fs::read(&descriptor_path).await.map_err(|e| {
            ModCacheError::io(format!("reading {}", descriptor_path.display()), e)
        })?;
        let descriptor =
            PackageDescriptor::parse(&bytes).map_err(|reason| ModCacheError::InvalidDescriptor {
                path: path.to_path_buf(),
                reason,
            })?;

        let Some(script) = descriptor.script(&self.config.script) else {
            debug!("{} has no '{}' script", name, self.config.script);
            return Ok(());
        };

        info!("Running install script for {}: {}", name, script);

        let status = Command::new("sh")
            .arg("-c")
            .arg(script)
            .current_dir(path)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| ModCacheError::command_failed(format!("sh -c {}", script), e))?;

        if status.success() {
            Ok(())
        } else {
            Err(ModCacheError::InstallScript {
                name: name.to_string(),
                code: status.code().unwrap_or(-1),
            })
        }
    }
}

#[async_trait]
impl VersionSwitcher for GitInstaller {
    async fn set_version(
        &self,
        path: &Path,
        version: Option<&str>,
        options: SetVersionOptions,
    ) -> ModCacheResult<String> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        // Offline caches still work against whatever tags are already local
        if let Err(e) = self.vcs.fetch_tags(path).await {
            warn!("Could not fetch tags for {}: {}", name, e);
        }

        let target = match version {
            Some(v) => v.to_string(),
            None => self.resolve_latest(path).await?,
        };

        let before = self.current_revision(path).await;

        self.vcs
            .checkout(path, &target)
            .await
            .map_err(|e| ModCacheError::VersionSwitch {
                name: name.clone(),
                version: target.clone(),
                reason: e.to_string(),
            })?;

        let after = self.current_revision(path).await;
        let changed = before.is_none() || before != after;

        if self.config.run_scripts && (changed || options.force_install) {
            self.run_install_script(path, &name).await?;
        } else {
            debug!("{} already at {}, skipping install actions", name, target);
        }

        Ok(target)
    }
}
