//! Console output helpers
//!
//! Interactive terminals get `cliclack` log lines and spinners; pipes and CI
//! get plain, greppable `[OK]`/`[WARN]` lines.

mod context;
mod output;

pub use context::UiContext;
pub use output::{entry_line, spinner, step_info, step_ok, step_warn_hint};
