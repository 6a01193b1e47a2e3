//! Run and update command orchestration.

use irsnap_fs::Filesystem;
use irsnap_process::ProcessRunner;

use crate::cli::{Cli, Command};
use crate::clock::Clock;
use crate::context::Context;
use crate::logger::Logger;
use crate::orchestrator::{run_suite, RunOptions};
use crate::outcome::RunReport;

use super::{select, write_json_report, CommandResult};

/// Execute the run command, rewriting goldens when the mode is update.
pub fn execute_run<F, R, L, C>(
    cli: &Cli,
    ctx: &Context<'_, F, R, L>,
    clock: &C,
) -> CommandResult<RunReport>
where
    F: Filesystem,
    R: ProcessRunner,
    L: Logger,
    C: Clock,
{
    let selection = cli.selection()?;
    let fixtures = select(ctx, &cli.root, &selection.filters)?;

    let options = RunOptions {
        update: cli.mode() == Command::Update,
        versions: selection.versions,
        keep_artifacts: cli.keep,
    };
    let report = run_suite(ctx, &cli.root, &fixtures, &options);

    write_json_report(ctx.fs, clock, cli, &report)?;
    Ok(report)
}
