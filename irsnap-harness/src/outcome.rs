//! Per-test outcomes and the aggregate run report.
//!
//! Every test ends in exactly one outcome whose `Display` is the bracketed
//! tag printed on its status line.

use std::fmt;
use std::path::PathBuf;

use irsnap_fixture::{LoadError, StructuralError};
use irsnap_fs::FsError;
use serde::Serialize;
use thiserror::Error;

/// Pipeline stage that ran an external tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Format,
    Compile,
    Assemble,
    Disassemble,
    Diff,
    Symbols,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Format => "format",
            Stage::Compile => "compile",
            Stage::Assemble => "assemble",
            Stage::Disassemble => "disassemble",
            Stage::Diff => "diff",
            Stage::Symbols => "symbols",
        };
        f.write_str(name)
    }
}

/// Why a test failed.
#[derive(Debug, Error)]
pub enum TestFailure {
    #[error("[missing section]")]
    MissingSection,

    #[error("[extra section]")]
    ExtraSection,

    /// The compiler or formatter died on a signal.
    #[error("[crash {0}]")]
    Crash(Stage),

    #[error("[fail format]")]
    FormatMismatch,

    #[error("[fail compile]")]
    ArtifactMismatch,

    /// The compiler accepted but left no artifact; holds the extension.
    #[error("[no {0} file]")]
    NoArtifact(String),

    #[error("[no symbols]")]
    NoSymbols,

    #[error("[diff symbols]")]
    SymbolMismatch,

    /// A helper tool could not run or reported an error.
    #[error("[tool error]")]
    Tool { stage: Stage, detail: String },

    #[error("[timeout {0}]")]
    Timeout(Stage),

    #[error("[io error]")]
    Io(#[from] FsError),
}

impl From<StructuralError> for TestFailure {
    fn from(err: StructuralError) -> Self {
        match err {
            StructuralError::MissingSection => TestFailure::MissingSection,
            StructuralError::ExtraSection(_) => TestFailure::ExtraSection,
        }
    }
}

impl From<LoadError> for TestFailure {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::Read { source, .. } => TestFailure::Io(source),
            LoadError::Structure { source, .. } => source.into(),
        }
    }
}

/// Which golden section an update rewrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    Compile,
    Symbols,
}

/// How a test passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Ok,
    Dumped,
    Updated(UpdateKind),
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pass::Ok => f.write_str("[ok]"),
            Pass::Dumped => f.write_str("[dump]"),
            Pass::Updated(UpdateKind::Compile) => f.write_str("[updated compile]"),
            Pass::Updated(UpdateKind::Symbols) => f.write_str("[updated symbols]"),
        }
    }
}

/// Outcome of one fixture.
#[derive(Debug)]
pub struct TestResult {
    /// Fixture path as displayed, relative to the fixture root.
    pub fixture: PathBuf,
    pub outcome: Result<Pass, TestFailure>,
}

impl TestResult {
    pub fn new(fixture: PathBuf, outcome: Result<Pass, TestFailure>) -> Self {
        Self { fixture, outcome }
    }

    pub fn passed(&self) -> bool {
        self.outcome.is_ok()
    }

    /// The bracketed outcome tag.
    pub fn tag(&self) -> String {
        match &self.outcome {
            Ok(pass) => pass.to_string(),
            Err(failure) => failure.to_string(),
        }
    }

    /// `<fixture padded to width> = <tag>`
    pub fn status_line(&self, width: usize) -> String {
        format!(
            "{:<width$} = {}",
            self.fixture.display().to_string(),
            self.tag(),
            width = width
        )
    }
}

/// Aggregate of a run, in execution order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub results: Vec<TestResult>,
}

impl RunReport {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    pub fn succeeded(&self) -> bool {
        self.failed() == 0
    }

    /// `<passed> / <total> tests <verb>`
    pub fn summary(&self, verb: &str) -> String {
        format!("{} / {} tests {}", self.passed(), self.total(), verb)
    }

    /// Machine-readable form of the report.
    pub fn to_json(&self, command: &str, generated_at: &str) -> JsonReport {
        JsonReport {
            generated_at: generated_at.to_string(),
            command: command.to_string(),
            total: self.total(),
            passed: self.passed(),
            failed: self.failed(),
            results: self
                .results
                .iter()
                .map(|r| JsonResult {
                    fixture: r.fixture.display().to_string(),
                    tag: r.tag(),
                    passed: r.passed(),
                })
                .collect(),
        }
    }
}

/// JSON report document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonReport {
    pub generated_at: String,
    pub command: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub results: Vec<JsonResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonResult {
    pub fixture: String,
    pub tag: String,
    pub passed: bool,
}
