//! CLI command implementations

pub mod add;
pub mod config;
pub mod has;
pub mod install;
pub mod list;
pub mod remove;

pub use add::execute as add;
pub use config::execute as config;
pub use has::execute as has;
pub use install::execute as install;
pub use list::execute as list;
pub use remove::execute as remove;

use crate::cache::ModuleCache;
use crate::config::Config;
use crate::error::ModCacheResult;
use crate::ui::{self, UiContext};
use crate::vcs::GitCli;
use std::sync::Arc;
use tracing::warn;

/// Open the configured cache and wait for its startup scan
async fn open_cache(ctx: &UiContext, config: &Config) -> ModCacheResult<Arc<ModuleCache>> {
    if !GitCli::new(config.git.program.clone()).is_installed().await {
        warn!(
            "'{}' could not be run; cached modules cannot be identified",
            config.git.program
        );
    }

    let cache = ModuleCache::from_config(config, None).await?;

    let pb = ui::spinner(ctx, "Loading module cache...");
    cache.wait_loaded().await;
    pb.finish_and_clear();

    Ok(cache)
}
