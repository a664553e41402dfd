//! Output functions for consistent CLI formatting

use super::context::UiContext;
use crate::cache::CacheEntry;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Display a success step
pub fn step_ok(ctx: &UiContext, message: &str) {
    if ctx.is_interactive() {
        cliclack::log::success(message).ok();
    } else {
        println!("{} {}", style("[OK]").green(), message);
    }
}

/// Display an info step
pub fn step_info(ctx: &UiContext, message: &str) {
    if ctx.is_interactive() {
        cliclack::log::info(message).ok();
    } else {
        println!("{} {}", style("[INFO]").cyan(), message);
    }
}

/// Display a warning with a hint
pub fn step_warn_hint(ctx: &UiContext, message: &str, hint: &str) {
    if ctx.is_interactive() {
        cliclack::log::warning(format!("{} - {}", message, style(hint).dim())).ok();
    } else {
        println!("{} {} - {}", style("[WARN]").yellow(), message, hint);
    }
}

/// Format an entry as `name  version  url`, with styling only for terminals
pub fn entry_line(ctx: &UiContext, entry: &CacheEntry) -> String {
    if ctx.is_interactive() {
        format!(
            "{:<24} {:<16} {}",
            style(&entry.name).cyan(),
            style(&entry.version).green(),
            style(&entry.url).dim()
        )
    } else {
        format!("{:<24} {:<16} {}", entry.name, entry.version, entry.url)
    }
}

/// Spinner on stderr while waiting on the cache; hidden when not interactive
pub fn spinner(ctx: &UiContext, message: &str) -> ProgressBar {
    if !ctx.is_interactive() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(template);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_output_does_not_panic() {
        let ctx = UiContext::plain();
        step_ok(&ctx, "done");
        step_info(&ctx, "info");
        step_warn_hint(&ctx, "careful", "do this");
        spinner(&ctx, "waiting").finish_and_clear();
    }

    #[test]
    fn plain_entry_line() {
        let entry = CacheEntry::new("example", "v1.0.0", "https://github.com/org/example");
        let line = entry_line(&UiContext::plain(), &entry);
        assert!(line.starts_with("example "));
        assert!(line.contains("v1.0.0"));
        assert!(line.ends_with("https://github.com/org/example"));
    }
}
