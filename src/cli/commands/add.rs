//! Add command - clone a module into the cache or switch its version

use crate::cli::args::{split_version, AddArgs};
use crate::config::Config;
use crate::error::ModCacheResult;
use crate::ui::{self, UiContext};
use tracing::debug;

/// Execute the add command
pub async fn execute(args: AddArgs, config: &Config) -> ModCacheResult<()> {
    let ctx = UiContext::detect();
    let cache = super::open_cache(&ctx, config).await?;

    let (locator, version) = split_version(&args.locator, args.rev.as_deref());
    debug!("Adding {} (version: {:?})", locator, version);

    let entry = cache.add(&locator, version.as_deref()).await?;

    ui::step_ok(&ctx, &format!("Cached {}", entry));
    Ok(())
}
