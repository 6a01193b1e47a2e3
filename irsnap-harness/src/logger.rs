//! Logging abstraction for testable output.
//!
//! Status lines and the run summary are logged at `Normal` level and go to
//! stdout; stage transitions (`-v`) and every external command line (`-vv`)
//! go to stderr. Tests capture everything with `MockLogger`.

use std::io::Write;
use std::sync::{Arc, RwLock};

/// Verbosity level for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Normal output (always shown)
    Normal,
    /// Verbose output (-v flag)
    Verbose,
    /// Debug output (-vv flag)
    Debug,
}

impl Verbosity {
    /// Create verbosity from CLI flag count.
    pub fn from_count(count: u8) -> Self {
        match count {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    }
}

/// Trait for logging output.
pub trait Logger: Send + Sync {
    /// Log a message at the given verbosity level.
    fn log(&self, level: Verbosity, message: &str);

    /// Log at normal level (always visible).
    fn info(&self, message: &str) {
        self.log(Verbosity::Normal, message);
    }

    /// Log at verbose level (requires -v).
    fn verbose(&self, message: &str) {
        self.log(Verbosity::Verbose, message);
    }

    /// Log at debug level (requires -vv).
    fn debug(&self, message: &str) {
        self.log(Verbosity::Debug, message);
    }
}

impl<L: Logger + ?Sized> Logger for &L {
    fn log(&self, level: Verbosity, message: &str) {
        (**self).log(level, message)
    }
}

/// Logger for the terminal: normal lines to stdout, diagnostics to stderr.
#[derive(Debug)]
pub struct ConsoleLogger {
    level: Verbosity,
}

impl ConsoleLogger {
    /// Create a new console logger with the given verbosity level.
    pub fn new(level: Verbosity) -> Self {
        Self { level }
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, level: Verbosity, message: &str) {
        if level > self.level {
            return;
        }
        let _ = match level {
            Verbosity::Normal => writeln!(std::io::stdout(), "{}", message),
            Verbosity::Verbose | Verbosity::Debug => writeln!(std::io::stderr(), "{}", message),
        };
    }
}

/// Mock logger for testing that captures all messages.
#[derive(Debug, Clone)]
pub struct MockLogger {
    level: Verbosity,
    messages: Arc<RwLock<Vec<LogEntry>>>,
}

/// A captured log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: Verbosity,
    pub message: String,
}

impl MockLogger {
    /// Create a new mock logger with the given verbosity level.
    pub fn new(level: Verbosity) -> Self {
        Self {
            level,
            messages: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Create a mock logger that captures all levels.
    pub fn capture_all() -> Self {
        Self::new(Verbosity::Debug)
    }

    /// Get all captured log entries.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.messages.read().unwrap().clone()
    }

    /// Get all captured messages (just the text).
    pub fn messages(&self) -> Vec<String> {
        self.entries().iter().map(|e| e.message.clone()).collect()
    }

    /// Get messages at a specific level.
    pub fn messages_at_level(&self, level: Verbosity) -> Vec<String> {
        self.entries()
            .iter()
            .filter(|e| e.level == level)
            .map(|e| e.message.clone())
            .collect()
    }

    /// Lines a user would see without `-v`.
    pub fn output(&self) -> Vec<String> {
        self.messages_at_level(Verbosity::Normal)
    }

    /// Check if any message contains the given substring.
    pub fn contains(&self, substring: &str) -> bool {
        self.messages().iter().any(|m| m.contains(substring))
    }

    /// Get count of captured messages.
    pub fn count(&self) -> usize {
        self.messages.read().unwrap().len()
    }
}

impl Logger for MockLogger {
    fn log(&self, level: Verbosity, message: &str) {
        if level > self.level {
            return;
        }
        self.messages.write().unwrap().push(LogEntry {
            level,
            message: message.to_string(),
        });
    }
}
