//! irsnap harness.
//!
//! Golden-snapshot regression tests for the Saphyr compiler. Each fixture
//! holds a source program, the IR (or diagnostics) the compiler should
//! produce, and optionally the symbols of the compiled object. This crate
//! drives the compiler and its helper tools over every fixture, compares the
//! results against the goldens, and rewrites goldens on request.

pub mod cli;
pub mod clock;
pub mod commands;
pub mod comparator;
pub mod config;
pub mod context;
pub mod driver;
pub mod exit;
pub mod logger;
pub mod normalizer;
pub mod orchestrator;
pub mod outcome;
pub mod updater;

pub use cli::{parse_from, Cli, CliError, Command, Selection};
pub use clock::{Clock, MockClock, SystemClock};
pub use commands::{build_config, execute, CommandError, CommandResult};
pub use config::{ConfigError, HarnessConfig};
pub use context::Context;
pub use logger::{ConsoleLogger, Logger, MockLogger, Verbosity};
pub use normalizer::{VersionSpec, VersionSpecError, VolatileFilter};
pub use orchestrator::{run_suite, RunOptions};
pub use outcome::{Pass, RunReport, Stage, TestFailure, TestResult, UpdateKind};
