//! Harness configuration.
//!
//! Built once at startup (defaults, then an optional JSON file, then CLI
//! overrides) and passed by reference to every stage.

use std::path::Path;
use std::time::Duration;

use irsnap_fixture::SiblingExtensions;
use irsnap_fs::{Filesystem, FsError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default compiler under test, relative to the fixture root.
pub const DEFAULT_COMPILER: &str = "../saphyr";

/// Default source formatter, relative to the fixture root.
pub const DEFAULT_FORMATTER: &str = "../syfmt";

/// Default fixture file pattern.
pub const DEFAULT_FIXTURE_PATTERN: &str = "*.test";

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: FsError,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid volatile marker {marker:?}: {source}")]
    InvalidMarker {
        marker: String,
        #[source]
        source: regex::Error,
    },

    #[error("{0} must not be empty")]
    EmptyTool(&'static str),

    #[error("timeout must be at least 1 second")]
    ZeroTimeout,
}

/// Tool binaries, flags and file naming used by the harness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Compiler under test.
    pub compiler: String,
    /// Arguments placed before the source path on every compile.
    pub compiler_args: Vec<String>,
    /// Extra compiler flag for fixtures whose header asks for debug output.
    pub debug_flag: String,
    /// Source formatter; `None` disables the formatter check.
    pub formatter: Option<String>,
    /// Text diff tool.
    pub diff: String,
    pub diff_args: Vec<String>,
    /// Text-to-bitcode tool; a `-<version>` suffix selects the toolchain.
    pub assembler: String,
    /// Bitcode-to-text tool; a `-<version>` suffix selects the toolchain.
    pub disassembler: String,
    /// Symbol listing tool run on the object file.
    pub symbol_dump: String,
    pub symbol_dump_args: Vec<String>,
    /// File name glob identifying fixtures.
    pub fixture_pattern: String,
    /// Regexes; IR lines matching any of them are dropped before comparison.
    pub volatile_markers: Vec<String>,
    pub extensions: SiblingExtensions,
    /// Kill any external tool running longer than this.
    pub timeout_sec: Option<u64>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            compiler: DEFAULT_COMPILER.to_string(),
            compiler_args: vec!["--llvmir".to_string()],
            debug_flag: "--print-debug".to_string(),
            formatter: Some(DEFAULT_FORMATTER.to_string()),
            diff: "diff".to_string(),
            diff_args: vec!["-uwB".to_string()],
            assembler: "llvm-as".to_string(),
            disassembler: "llvm-dis".to_string(),
            symbol_dump: "nm".to_string(),
            symbol_dump_args: vec!["-fp".to_string()],
            fixture_pattern: DEFAULT_FIXTURE_PATTERN.to_string(),
            volatile_markers: vec!["; ModuleID".to_string(), "source_filename".to_string()],
            extensions: SiblingExtensions::default(),
            timeout_sec: None,
        }
    }
}

impl HarnessConfig {
    /// Parse a JSON config; missing fields keep their defaults.
    pub fn from_json(text: &str, origin: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })
    }

    /// Load a JSON config file.
    pub fn load<F: Filesystem>(fs: &F, path: &Path) -> Result<Self, ConfigError> {
        let text = fs.read_file(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text, &path.display().to_string())
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tools = [
            ("compiler", &self.compiler),
            ("diff", &self.diff),
            ("assembler", &self.assembler),
            ("disassembler", &self.disassembler),
            ("symbol_dump", &self.symbol_dump),
            ("fixture_pattern", &self.fixture_pattern),
        ];
        for (name, value) in tools {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyTool(name));
            }
        }
        if self.timeout_sec == Some(0) {
            return Err(ConfigError::ZeroTimeout);
        }
        self.volatile_patterns()?;
        Ok(())
    }

    /// Compile the volatile markers.
    pub fn volatile_patterns(&self) -> Result<Vec<Regex>, ConfigError> {
        self.volatile_markers
            .iter()
            .map(|marker| {
                Regex::new(marker).map_err(|source| ConfigError::InvalidMarker {
                    marker: marker.clone(),
                    source,
                })
            })
            .collect()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_sec.map(Duration::from_secs)
    }
}
