//! Install command - add a module and place it into a project

use crate::cli::args::{split_version, InstallArgs};
use crate::config::Config;
use crate::error::ModCacheResult;
use crate::ui::{self, UiContext};

/// Execute the install command
///
/// Both placements end up at `<dest>/<name>`: a copy of the module's files
/// or a symlink into the cache.
pub async fn execute(args: InstallArgs, config: &Config) -> ModCacheResult<()> {
    let ctx = UiContext::detect();
    let cache = super::open_cache(&ctx, config).await?;

    let (locator, version) = split_version(&args.locator, args.rev.as_deref());
    let entry = cache.add(&locator, version.as_deref()).await?;

    if args.link {
        cache.link(&entry, &args.dest).await?;
        ui::step_ok(
            &ctx,
            &format!(
                "Linked {} at {}",
                entry,
                args.dest.join(&entry.name).display()
            ),
        );
    } else {
        let target = args.dest.join(&entry.name);
        cache.copy(&entry, &target).await?;
        ui::step_ok(&ctx, &format!("Copied {} to {}", entry, target.display()));
    }

    Ok(())
}
