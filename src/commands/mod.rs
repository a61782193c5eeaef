//! Subcommand implementations.
//!
//! Each command builds an [`Executor`] from the resolved settings and calls a
//! single lifecycle or query operation on it.

pub mod lifecycle;
pub mod query;

use terrakit::backend::local::LocalFs;
use terrakit::backend::terraform::TerraformCli;
use terrakit::{Credentials, Executor};

use crate::Context as AppContext;
use crate::state::StateDirs;

/// Build an executor over the real filesystem and terraform binary.
pub fn executor(ctx: &AppContext) -> Executor {
    let settings = &ctx.settings;
    let dirs = StateDirs::new(&settings.state_dir);
    let runner = TerraformCli::new(&settings.terraform).with_error_log(dirs.latest_error_path());

    log::debug!(
        "Using terraform {} with state in {}",
        settings.terraform.display(),
        dirs.root().display()
    );

    Executor::new(
        Box::new(runner),
        Box::new(dirs),
        Box::new(LocalFs::new()),
        settings.debug,
    )
}

/// Collect `--var` pairs into credentials. Later pairs win.
pub fn credentials(pairs: &[(String, String)]) -> Credentials {
    pairs.iter().cloned().collect()
}
