//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// modcache - local cache of version-controlled modules
///
/// Clones modules once, names them by their package descriptor, and
/// installs them into projects by copy or symlink.
#[derive(Parser, Debug)]
#[command(name = "modcache")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "MODCACHE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Cache root directory (overrides cache.root)
    #[arg(long, global = true, env = "MODCACHE_ROOT")]
    pub cache_root: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Clone a module into the cache, or switch a cached one to a version
    Add(AddArgs),

    /// Delete a module from the cache
    Remove(RemoveArgs),

    /// Add a module and place it into a project directory
    Install(InstallArgs),

    /// Exit successfully if a name or locator is cached
    Has(HasArgs),

    /// List cached modules
    List(ListArgs),

    /// Show or edit configuration
    Config(ConfigArgs),
}

/// Arguments for the add command
#[derive(Parser, Debug)]
pub struct AddArgs {
    /// Module name, URL, or user@host:path locator (`#version` allowed)
    pub locator: String,

    /// Tag or commit to check out (defaults to latest)
    #[arg(long, value_name = "REV")]
    pub rev: Option<String>,
}

/// Arguments for the remove command
#[derive(Parser, Debug)]
pub struct RemoveArgs {
    /// Canonical module name
    pub name: String,
}

/// Arguments for the install command
#[derive(Parser, Debug)]
pub struct InstallArgs {
    /// Module name, URL, or user@host:path locator
    pub locator: String,

    /// Destination directory
    pub dest: PathBuf,

    /// Tag or commit to check out (defaults to latest)
    #[arg(long, value_name = "REV")]
    pub rev: Option<String>,

    /// Symlink `<dest>/<name>` to the cache instead of copying
    #[arg(long)]
    pub link: bool,
}

/// Arguments for the has command
#[derive(Parser, Debug)]
pub struct HasArgs {
    /// Module name or locator
    pub locator: String,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., cache.default_source)
        key: String,
        /// Value to set
        value: String,
    },
}

/// Output format for list command
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Names only, one per line
    Plain,
}

/// Split a `locator#version` into its parts; an explicit version wins
pub fn split_version(locator: &str, explicit: Option<&str>) -> (String, Option<String>) {
    match locator.split_once('#') {
        Some((base, fragment)) if !fragment.is_empty() => (
            base.to_string(),
            Some(explicit.unwrap_or(fragment).to_string()),
        ),
        Some((base, _)) => (base.to_string(), explicit.map(str::to_string)),
        None => (locator.to_string(), explicit.map(str::to_string)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_add() {
        let cli = Cli::parse_from(["modcache", "add", "example", "--rev", "v1.2.0"]);
        match cli.command {
            Commands::Add(args) => {
                assert_eq!(args.locator, "example");
                assert_eq!(args.rev.as_deref(), Some("v1.2.0"));
            }
            _ => panic!("expected Add command"),
        }
    }

    #[test]
    fn cli_parses_install_link() {
        let cli = Cli::parse_from(["modcache", "install", "org/mod", "./modules", "--link"]);
        match cli.command {
            Commands::Install(args) => {
                assert_eq!(args.locator, "org/mod");
                assert_eq!(args.dest, PathBuf::from("./modules"));
                assert!(args.link);
                assert!(args.rev.is_none());
            }
            _ => panic!("expected Install command"),
        }
    }

    #[test]
    fn cli_version_flag_still_works_on_subcommands() {
        let err = Cli::try_parse_from(["modcache", "add", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);

        let cli = Cli::parse_from(["modcache", "install", "example", "./vendor", "--rev", "abc123"]);
        match cli.command {
            Commands::Install(args) => assert_eq!(args.rev.as_deref(), Some("abc123")),
            _ => panic!("expected Install command"),
        }
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_global_cache_root() {
        let cli = Cli::parse_from(["modcache", "list", "--cache-root", "/tmp/modules"]);
        assert_eq!(cli.cache_root, Some(PathBuf::from("/tmp/modules")));
        assert!(matches!(cli.command, Commands::List(_)));
    }

    #[test]
    fn cli_verbose_levels() {
        let cli = Cli::parse_from(["modcache", "list"]);
        assert_eq!(cli.verbose, 0);

        let cli = Cli::parse_from(["modcache", "-vv", "list"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn split_version_fragment() {
        assert_eq!(
            split_version("org/mod#v1.2.3", None),
            ("org/mod".to_string(), Some("v1.2.3".to_string()))
        );
        assert_eq!(
            split_version("org/mod#v1.2.3", Some("v2.0.0")),
            ("org/mod".to_string(), Some("v2.0.0".to_string()))
        );
        assert_eq!(split_version("org/mod#", None), ("org/mod".to_string(), None));
        assert_eq!(split_version("org/mod", None), ("org/mod".to_string(), None));
    }
}
