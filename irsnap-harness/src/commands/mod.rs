//! Command orchestration for the CLI modes.
//!
//! Provides execute functions for:
//! - run / update - drive every selected fixture through the pipeline
//! - dump - materialize fixture sections only
//! - clean - remove generated files

pub mod clean;
pub mod dump;
pub mod run;

pub use clean::execute_clean;
pub use dump::execute_dump;
pub use run::execute_run;

use std::path::{Path, PathBuf};

use irsnap_fs::{discover_fixtures, find_collisions, select_fixtures, Collision, Filesystem, FsError};
use irsnap_process::ProcessRunner;
use thiserror::Error;

use crate::cli::{Cli, CliError, Command};
use crate::clock::Clock;
use crate::config::{ConfigError, HarnessConfig};
use crate::context::Context;
use crate::logger::Logger;
use crate::outcome::RunReport;

/// Errors that abort a whole run.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] CliError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("filesystem error: {0}")]
    Filesystem(#[from] FsError),

    #[error("fixtures share generated file names: {}", describe_collisions(.0))]
    Collision(Vec<Collision>),

    #[error("No tests found")]
    NoTests,

    #[error("failed to encode report: {0}")]
    Report(#[source] serde_json::Error),
}

fn describe_collisions(collisions: &[Collision]) -> String {
    collisions
        .iter()
        .map(|c| format!("{} and {}", c.first.display(), c.second.display()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result of command execution.
pub type CommandResult<T> = Result<T, CommandError>;

/// Build the configuration: defaults, then `--config`, then flag overrides.
pub fn build_config<F: Filesystem>(cli: &Cli, fs: &F) -> CommandResult<HarnessConfig> {
    cli.validate()?;

    let mut config = match &cli.config {
        Some(path) => HarnessConfig::load(fs, path)?,
        None => HarnessConfig::default(),
    };
    cli.apply_overrides(&mut config);
    config.validate()?;

    Ok(config)
}

/// Discover fixtures under `root` and apply the filters.
///
/// Fails when nothing is selected or when two selected fixtures would share
/// generated files.
pub fn select<F, R, L>(
    ctx: &Context<'_, F, R, L>,
    root: &Path,
    filters: &[String],
) -> CommandResult<Vec<PathBuf>>
where
    F: Filesystem,
    R: ProcessRunner,
    L: Logger,
{
    let all = discover_fixtures(ctx.fs, root, &ctx.config.fixture_pattern)?;
    let selected = select_fixtures(&all, filters);
    ctx.logger.verbose(&format!(
        "selected {} of {} fixtures under {}",
        selected.len(),
        all.len(),
        root.display()
    ));

    if selected.is_empty() {
        return Err(CommandError::NoTests);
    }

    let collisions = find_collisions(&selected);
    if !collisions.is_empty() {
        return Err(CommandError::Collision(collisions));
    }

    Ok(selected)
}

/// Write the JSON report when `--json-report` was given.
pub fn write_json_report<F, C>(
    fs: &F,
    clock: &C,
    cli: &Cli,
    report: &RunReport,
) -> CommandResult<()>
where
    F: Filesystem,
    C: Clock,
{
    let path = match &cli.json_report {
        Some(path) => path,
        None => return Ok(()),
    };

    let document = report.to_json(cli.mode().name(), &clock.timestamp());
    let mut json = serde_json::to_string_pretty(&document).map_err(CommandError::Report)?;
    json.push('\n');
    fs.write_atomic(path, json.as_bytes())?;
    Ok(())
}

/// Run the mode selected on the command line. Returns whether every
/// selected test passed.
pub fn execute<F, R, L, C>(cli: &Cli, ctx: &Context<'_, F, R, L>, clock: &C) -> CommandResult<bool>
where
    F: Filesystem,
    R: ProcessRunner,
    L: Logger,
    C: Clock,
{
    match cli.mode() {
        Command::Run | Command::Update => Ok(execute_run(cli, ctx, clock)?.succeeded()),
        Command::Dump => Ok(execute_dump(cli, ctx, clock)?.succeeded()),
        Command::Clean => {
            execute_clean(cli, ctx)?;
            Ok(true)
        }
    }
}
