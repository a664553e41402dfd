//! Git client backed by the `git` CLI
//!
//! Every call is a short-lived `git -C <repo> ...` process. Clones can stream
//! straight to the terminal; everything else is captured.

use crate::error::{ModCacheError, ModCacheResult};
use crate::vcs::{latest_tag, CloneOutput, VersionControl};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

/// Version-control client using the git executable
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
}

impl GitCli {
    /// Create a client that runs `program` (usually "git")
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Check if the git executable can be run
    pub async fn is_installed(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Run git inside `repo` and return stdout bytes on success
    async fn exec_in(&self, repo: &Path, args: &[&str]) -> ModCacheResult<Vec<u8>> {
        debug!("Executing in {}: git {:?}", repo.display(), args);

        let output = Command::new(&self.program)
            .arg("-C")
            .arg(repo)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ModCacheError::command_failed(format!("git {:?}", args), e))?;

        if output.status.success() {
            Ok(output.stdout)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(ModCacheError::command_exec(
                format!("git {}", args.join(" ")),
                stderr.trim(),
            ))
        }
    }

    async fn exec_in_string(&self, repo: &Path, args: &[&str]) -> ModCacheResult<String> {
        let stdout = self.exec_in(repo, args).await?;
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

#[async_trait]
impl VersionControl for GitCli {
    async fn latest_local_tag(&self, repo: &Path) -> ModCacheResult<Option<String>> {
        let tags = self.list_tags(repo).await?;
        Ok(latest_tag(&tags))
    }

    async fn rev_parse_head(&self, repo: &Path) -> ModCacheResult<String> {
        self.exec_in_string(repo, &["rev-parse", "HEAD"]).await
    }

    async fn read_file_at_revision(
        &self,
        repo: &Path,
        rev: &str,
        file: &str,
    ) -> ModCacheResult<Vec<u8>> {
        let object = format!("{}:{}", rev, file);
        self.exec_in(repo, &["show", &object]).await
    }

    async fn remote_url(&self, repo: &Path) -> ModCacheResult<String> {
        let url = self
            .exec_in_string(repo, &["config", "--get", "remote.origin.url"])
            .await?;
        Ok(url.trim().to_string())
    }

    async fn clone_repo(
        &self,
        locator: &str,
        dest: &Path,
        output: CloneOutput,
    ) -> ModCacheResult<()> {
        info!("Cloning {} into {}", locator, dest.display());

        let mut cmd = Command::new(&self.program);
        cmd.arg("clone").stdin(Stdio::null());

        match output {
            CloneOutput::Inherit => {
                cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
            }
            CloneOutput::Quiet => {
                cmd.arg("--quiet")
                    .stdout(Stdio::null())
                    .stderr(Stdio::piped());
            }
        }

        // Locators are caller text and must never parse as options
        cmd.arg("--").arg(locator).arg(dest);

        let result = cmd
            .output()
            .await
            .map_err(|e| ModCacheError::command_failed(format!("git clone {}", locator), e))?;

        if result.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let reason = if stderr.trim().is_empty() {
                format!("git exited with {}", result.status)
            } else {
                stderr.trim().to_string()
            };
            Err(ModCacheError::CloneFailed {
                locator: locator.to_string(),
                reason,
            })
        }
    }

    async fn fetch_tags(&self, repo: &Path) -> ModCacheResult<()> {
        self.exec_in(repo, &["fetch", "--tags", "--quiet", "origin"])
            .await?;
        Ok(())
    }

    async fn list_tags(&self, repo: &Path) -> ModCacheResult<Vec<String>> {
        let stdout = self.exec_in_string(repo, &["tag", "--list"]).await?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    async fn checkout(&self, repo: &Path, rev: &str) -> ModCacheResult<()> {
        debug!("Checking out {} in {}", rev, repo.display());
        self.exec_in(repo, &["checkout", "--quiet", "--end-of-options", rev])
            .await?;
        Ok(())
    }
}
