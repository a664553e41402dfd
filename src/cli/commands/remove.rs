//! Remove command - evict a module from the cache

use crate::cli::args::RemoveArgs;
use crate::config::Config;
use crate::error::{ModCacheError, ModCacheResult};
use crate::ui::{self, UiContext};

/// Execute the remove command
pub async fn execute(args: RemoveArgs, config: &Config) -> ModCacheResult<()> {
    let ctx = UiContext::detect();
    let cache = super::open_cache(&ctx, config).await?;

    let known = cache.entries().iter().any(|e| e.name == args.name);
    if !known && !cache.module_path(&args.name).exists() {
        return Err(ModCacheError::EntryNotFound(args.name));
    }

    cache.remove(&args.name).await?;

    ui::step_ok(&ctx, &format!("Removed {}", args.name));
    Ok(())
}
