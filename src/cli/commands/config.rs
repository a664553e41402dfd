//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::error::{ModCacheError, ModCacheResult};
use crate::ui::{self, UiContext};
use std::path::PathBuf;

/// Keys accepted by `config set`
const VALID_KEYS: &[&str] = &[
    "general.log_format",
    "cache.root",
    "cache.default_source",
    "git.program",
    "install.run_scripts",
    "install.script",
];

/// Execute the config command
pub async fn execute(
    args: ConfigArgs,
    config: &Config,
    manager: &ConfigManager,
) -> ModCacheResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value }) => {
            let mut updated = config.clone();
            apply_value(&mut updated, &key, &value)?;
            manager.save(&updated).await?;
            ui::step_ok(&UiContext::detect(), &format!("Set {} = {}", key, value));
        }
    }

    Ok(())
}

fn show_config(config: &Config) -> ModCacheResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    println!(
        "# effective cache root: {}",
        ConfigManager::cache_root(config).display()
    );
    Ok(())
}

async fn init_config(manager: &ConfigManager, force: bool) -> ModCacheResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    if path.exists() && !force {
        ui::step_warn_hint(
            &ctx,
            &format!("Config already exists at {}", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;
    ui::step_ok(&ctx, &format!("Configuration initialized at {}", path.display()));

    Ok(())
}

/// Apply a dot-separated key to a config
fn apply_value(config: &mut Config, key: &str, value: &str) -> ModCacheResult<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "log_format"] => config.general.log_format = parse_log_format(value)?,
        ["cache", "root"] => {
            config.cache.root = if value.is_empty() {
                None
            } else {
                Some(PathBuf::from(value))
            }
        }
        ["cache", "default_source"] => config.cache.default_source = value.to_string(),
        ["git", "program"] => config.git.program = value.to_string(),
        ["install", "run_scripts"] => config.install.run_scripts = parse_bool(value)?,
        ["install", "script"] => config.install.script = value.to_string(),
        _ => {
            return Err(ModCacheError::User(format!(
                "Unknown config key: {}. Valid keys: {}",
                key,
                VALID_KEYS.join(", ")
            )))
        }
    }

    Ok(())
}

fn parse_log_format(value: &str) -> ModCacheResult<String> {
    match value {
        "text" | "json" => Ok(value.to_string()),
        _ => Err(ModCacheError::User(format!(
            "Invalid log format: {}. Use text or json",
            value
        ))),
    }
}

fn parse_bool(value: &str) -> ModCacheResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ModCacheError::User(format!(
            "Invalid boolean value: {}. Use true/false",
            value
        ))),
    }
}
