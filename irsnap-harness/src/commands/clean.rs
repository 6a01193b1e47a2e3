//! Clean command orchestration.

use irsnap_fs::Filesystem;
use irsnap_process::ProcessRunner;

use crate::cli::Cli;
use crate::context::Context;
use crate::logger::Logger;
use crate::orchestrator::clean_suite;

use super::{select, CommandResult};

/// Execute the clean command. Returns how many files were removed.
pub fn execute_clean<F, R, L>(cli: &Cli, ctx: &Context<'_, F, R, L>) -> CommandResult<usize>
where
    F: Filesystem,
    R: ProcessRunner,
    L: Logger,
{
    let selection = cli.selection()?;
    let fixtures = select(ctx, &cli.root, &selection.filters)?;
    Ok(clean_suite(ctx, &cli.root, &fixtures)?)
}
