//! CLI argument parsing for irsnap.
//!
//! ```text
//! irsnap [-c | -u | -d] [+FROM-TO] [FILTER]...
//! ```
//!
//! With no mode flag the selected fixtures are run and compared. A leading
//! `+FROM-TO` token translates IR between LLVM versions before comparing.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use thiserror::Error;

use crate::config::HarnessConfig;
use crate::normalizer::{VersionSpec, VersionSpecError};

/// Default fixture root.
pub const DEFAULT_ROOT: &str = ".";

/// Errors from CLI argument validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error(transparent)]
    InvalidVersions(#[from] VersionSpecError),

    #[error("timeout-sec must be at least 1, got {0}")]
    InvalidTimeout(u64),

    #[error("{0} must not be empty")]
    EmptyValue(&'static str),
}

/// Golden-snapshot regression tests for the compiler.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "irsnap")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Remove generated files of the selected fixtures.
    #[arg(short, long, group = "mode")]
    pub clean: bool,

    /// Rewrite goldens that differ from the actual output.
    #[arg(short, long, group = "mode")]
    pub update: bool,

    /// Only write the source and expected sections next to each fixture.
    #[arg(short, long, group = "mode")]
    pub dump: bool,

    /// Directory searched for fixtures.
    #[arg(long, default_value = DEFAULT_ROOT)]
    pub root: PathBuf,

    /// JSON configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Compiler under test.
    #[arg(long)]
    pub compiler: Option<String>,

    /// Source formatter; pass an empty string to disable the format check.
    #[arg(long)]
    pub formatter: Option<String>,

    /// Kill any tool that runs longer than this many seconds.
    #[arg(long)]
    pub timeout_sec: Option<u64>,

    /// Keep generated files of passing tests.
    #[arg(long)]
    pub keep: bool,

    /// Also write a JSON report to this path.
    #[arg(long)]
    pub json_report: Option<PathBuf>,

    /// Increase verbosity (-v stages, -vv commands).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Optional `+FROM-TO` version pair followed by fixture filters.
    #[arg(value_name = "[+FROM-TO] FILTER")]
    pub args: Vec<String>,
}

/// What to do with the selected fixtures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Run,
    Update,
    Dump,
    Clean,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Run => "run",
            Command::Update => "update",
            Command::Dump => "dump",
            Command::Clean => "clean",
        }
    }
}

/// Positional arguments split into the version pair and the filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub versions: Option<VersionSpec>,
    pub filters: Vec<String>,
}

impl Cli {
    /// The selected mode.
    pub fn mode(&self) -> Command {
        if self.clean {
            Command::Clean
        } else if self.update {
            Command::Update
        } else if self.dump {
            Command::Dump
        } else {
            Command::Run
        }
    }

    /// Split the positional arguments.
    pub fn selection(&self) -> Result<Selection, CliError> {
        match self.args.split_first() {
            Some((first, rest)) if first.starts_with('+') => Ok(Selection {
                versions: Some(first.parse()?),
                filters: rest.to_vec(),
            }),
            _ => Ok(Selection {
                versions: None,
                filters: self.args.clone(),
            }),
        }
    }

    /// Validate the arguments.
    pub fn validate(&self) -> Result<(), CliError> {
        if self.timeout_sec == Some(0) {
            return Err(CliError::InvalidTimeout(0));
        }
        if matches!(self.compiler.as_deref(), Some(c) if c.trim().is_empty()) {
            return Err(CliError::EmptyValue("compiler"));
        }
        self.selection()?;
        Ok(())
    }

    /// Apply command-line overrides on top of a loaded configuration.
    pub fn apply_overrides(&self, config: &mut HarnessConfig) {
        if let Some(compiler) = &self.compiler {
            config.compiler = compiler.clone();
        }
        if let Some(formatter) = &self.formatter {
            config.formatter = if formatter.is_empty() {
                None
            } else {
                Some(formatter.clone())
            };
        }
        if let Some(timeout) = self.timeout_sec {
            config.timeout_sec = Some(timeout);
        }
    }
}

/// Parse CLI arguments from an iterator (for testing).
pub fn parse_from<I, T>(iter: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(iter)
}
