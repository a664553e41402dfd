//! Integration tests for modcache

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    fn modcache() -> Command {
        cargo_bin_cmd!("modcache")
    }

    /// Command isolated from the user's config and cache
    fn isolated(temp: &TempDir) -> Command {
        let mut cmd = modcache();
        cmd.env_remove("MODCACHE_ROOT")
            .env_remove("MODCACHE_CONFIG")
            .arg("--config")
            .arg(temp.path().join("config.toml"))
            .arg("--cache-root")
            .arg(temp.path().join("modules"));
        cmd
    }

    #[test]
    fn help_displays() {
        modcache()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("local cache of version-controlled modules"));
    }

    #[test]
    fn version_displays() {
        modcache()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("modcache"));
    }

    #[test]
    fn config_path() {
        let temp = TempDir::new().unwrap();
        isolated(&temp)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let temp = TempDir::new().unwrap();
        isolated(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[cache]"))
            .stdout(predicate::str::contains("default_source"));
    }

    #[test]
    fn config_set_then_show() {
        let temp = TempDir::new().unwrap();
        isolated(&temp)
            .args(["config", "set", "cache.default_source", "https://git.example.com/"])
            .assert()
            .success();

        isolated(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("https://git.example.com/"));
    }

    #[test]
    fn config_set_keeps_cache_root_override_out_of_file() {
        let temp = TempDir::new().unwrap();
        isolated(&temp)
            .args(["config", "set", "git.program", "git"])
            .assert()
            .success();

        let saved = std::fs::read_to_string(temp.path().join("config.toml")).unwrap();
        assert!(saved.contains("[git]"));
        assert!(!saved.contains("root"), "override was persisted:\n{}", saved);
    }

    #[test]
    fn config_set_unknown_key() {
        let temp = TempDir::new().unwrap();
        isolated(&temp)
            .args(["config", "set", "vm.name", "x"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown config key"));
    }

    #[test]
    fn list_empty() {
        let temp = TempDir::new().unwrap();
        isolated(&temp)
            .arg("list")
            .assert()
            .success()
            .stdout(predicate::str::contains("No cached modules"));

        assert!(temp.path().join("modules").is_dir());
    }

    #[test]
    fn list_empty_json() {
        let temp = TempDir::new().unwrap();
        isolated(&temp)
            .args(["list", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[]"));
    }

    #[test]
    fn list_skips_unreadable_directories() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("modules").join("not-a-repo")).unwrap();

        isolated(&temp)
            .args(["list", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[]"));
    }

    #[test]
    fn has_missing_module() {
        let temp = TempDir::new().unwrap();
        isolated(&temp)
            .args(["has", "nonexistent-module"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Module not found"));
    }

    #[test]
    fn remove_missing_module() {
        let temp = TempDir::new().unwrap();
        isolated(&temp)
            .args(["remove", "nonexistent-module"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Module not found"));
    }

    #[test]
    fn remove_leftover_directory() {
        let temp = TempDir::new().unwrap();
        let leftover = temp.path().join("modules").join("leftover");
        std::fs::create_dir_all(&leftover).unwrap();

        isolated(&temp)
            .args(["remove", "leftover"])
            .assert()
            .success();

        assert!(!leftover.exists());
    }

    #[test]
    fn remove_rejects_path_names() {
        let temp = TempDir::new().unwrap();
        isolated(&temp)
            .args(["remove", ".."])
            .assert()
            .failure();
    }
}

#[cfg(unix)]
mod git_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn git_available() -> bool {
        std::process::Command::new("git")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn run_git(dir: &Path, args: &[&str]) {
        let output = std::process::Command::new("git")
            .args(["-c", "user.name=modcache", "-c", "user.email=modcache@example.com"])
            .args(["-c", "commit.gpgsign=false", "-c", "tag.gpgsign=false"])
            .arg("-C")
            .arg(dir)
            .args(args)
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "git {:?}: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    /// Repository in a directory whose name differs from the module name
    fn tagged_repo(base: &Path) -> String {
        let repo = base.join("upstream-checkout");
        std::fs::create_dir_all(&repo).unwrap();
        run_git(&repo, &["init", "--quiet"]);

        std::fs::write(repo.join("package.json"), r#"{"name": "example", "version": "1.0.0"}"#)
            .unwrap();
        run_git(&repo, &["add", "package.json"]);
        run_git(&repo, &["commit", "--quiet", "-m", "first"]);
        run_git(&repo, &["tag", "v1.0.0"]);

        std::fs::write(repo.join("package.json"), r#"{"name": "example", "version": "1.1.0"}"#)
            .unwrap();
        run_git(&repo, &["commit", "--quiet", "-am", "second"]);
        run_git(&repo, &["tag", "v1.1.0"]);

        format!("file://{}", repo.display())
    }

    /// Runs from inside `work` with a relative cache root
    fn modcache_in(work: &Path) -> Command {
        let mut cmd = cargo_bin_cmd!("modcache");
        cmd.current_dir(work)
            .env_remove("MODCACHE_ROOT")
            .env_remove("MODCACHE_CONFIG")
            .arg("--config")
            .arg(work.join("config.toml"))
            .args(["--cache-root", "cache"]);
        cmd
    }

    fn dir_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn add_install_and_switch_with_real_git() {
        if !git_available() {
            return;
        }

        let work = TempDir::new().unwrap();
        let url = tagged_repo(work.path());
        let cache = work.path().join("cache");

        modcache_in(work.path())
            .args(["add", &url])
            .assert()
            .success()
            .stdout(predicate::str::contains(format!("example@v1.1.0 ({})", url)));

        assert_eq!(dir_names(&cache), vec!["example".to_string()]);
        assert!(std::fs::read_to_string(cache.join("example/package.json"))
            .unwrap()
            .contains("1.1.0"));

        modcache_in(work.path())
            .args(["has", &format!("{}.git", url)])
            .assert()
            .success()
            .stdout(predicate::str::contains("example"));

        modcache_in(work.path())
            .args(["add", &url, "--rev", "v1.0.0"])
            .assert()
            .success()
            .stdout(predicate::str::contains("example@v1.0.0"));
        assert!(std::fs::read_to_string(cache.join("example/package.json"))
            .unwrap()
            .contains("1.0.0"));

        modcache_in(work.path())
            .args(["add", &format!("{}#v1.1.0", url)])
            .assert()
            .success()
            .stdout(predicate::str::contains("example@v1.1.0"));
        assert_eq!(dir_names(&cache), vec!["example".to_string()]);

        modcache_in(work.path())
            .args(["install", &url, "project/modules", "--link"])
            .assert()
            .success();
        let link = work.path().join("project/modules/example");
        assert!(std::fs::read_link(&link).unwrap().is_absolute());
        assert!(link.join("package.json").is_file());

        modcache_in(work.path())
            .args(["install", "example", "vendor"])
            .assert()
            .success();
        let copied = work.path().join("vendor/example");
        assert!(!std::fs::symlink_metadata(&copied)
            .unwrap()
            .file_type()
            .is_symlink());
        assert!(std::fs::read_to_string(copied.join("package.json"))
            .unwrap()
            .contains(r#""name": "example""#));

        modcache_in(work.path())
            .args(["list", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("v1.1.0"))
            .stdout(predicate::str::contains(url.as_str()));
    }
}
