//! Has command - check whether a module is cached

use crate::cli::args::HasArgs;
use crate::config::Config;
use crate::error::{ModCacheError, ModCacheResult};
use crate::ui::{self, UiContext};

/// Execute the has command; a miss is reported as an error exit
pub async fn execute(args: HasArgs, config: &Config) -> ModCacheResult<()> {
    let ctx = UiContext::detect();
    let cache = super::open_cache(&ctx, config).await?;

    match cache.find(&args.locator) {
        Some(entry) => {
            println!("{}", ui::entry_line(&ctx, &entry));
            Ok(())
        }
        None => Err(ModCacheError::EntryNotFound(args.locator)),
    }
}
