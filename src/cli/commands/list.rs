//! List command - show cached modules

use crate::cache::CacheEntry;
use crate::cli::args::{ListArgs, OutputFormat};
use crate::config::Config;
use crate::error::ModCacheResult;
use crate::ui::{self, UiContext};
use console::style;

/// Execute the list command
pub async fn execute(args: ListArgs, config: &Config) -> ModCacheResult<()> {
    let ctx = UiContext::detect();
    let cache = super::open_cache(&ctx, config).await?;
    let entries = cache.entries();

    if entries.is_empty() {
        match args.format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => ui::step_info(
                &ctx,
                &format!("No cached modules in {}", cache.root().display()),
            ),
        }
        return Ok(());
    }

    match args.format {
        OutputFormat::Table => print_table(&ctx, &entries),
        OutputFormat::Json => print_json(&entries)?,
        OutputFormat::Plain => print_plain(&entries),
    }

    Ok(())
}

fn print_table(ctx: &UiContext, entries: &[CacheEntry]) {
    println!(
        "{:<24} {:<16} {}",
        style("NAME").bold(),
        style("VERSION").bold(),
        style("SOURCE").bold()
    );
    println!("{}", "-".repeat(72));

    for entry in entries {
        println!("{}", ui::entry_line(ctx, entry));
    }

    println!();
    println!("{} module(s)", entries.len());
}

fn print_json(entries: &[CacheEntry]) -> ModCacheResult<()> {
    println!("{}", serde_json::to_string_pretty(entries)?);
    Ok(())
}

fn print_plain(entries: &[CacheEntry]) {
    for entry in entries {
        println!("{}", entry.name);
    }
}
