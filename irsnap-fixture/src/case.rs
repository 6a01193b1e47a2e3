//! Test cases and their generated sibling files.
//!
//! Every file the harness generates for a fixture sits next to it and shares
//! its base path, e.g. `expr/add.test` produces `expr/add.syp`,
//! `expr/add.ll`, `expr/add.err` and so on.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use irsnap_fs::{base_path, Filesystem, FsError};
use serde::{Deserialize, Serialize};

use crate::codec::Fixture;

/// Extensions of the generated sibling files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiblingExtensions {
    /// Source section written out for the compiler.
    pub source: String,
    /// Expected artifact section written out for diffing.
    pub expected: String,
    /// IR emitted by the compiler.
    pub artifact: String,
    /// Object file inspected by the symbol dump.
    pub object: String,
    /// Captured tool output and diffs of a failed test.
    pub error_log: String,
    /// Diagnostics of a rejected program.
    pub negative: String,
    /// Formatter output.
    pub formatted: String,
    /// Scratch file of the version translation round trip.
    pub bitcode: String,
}

impl Default for SiblingExtensions {
    fn default() -> Self {
        Self {
            source: ".syp".to_string(),
            expected: ".exp".to_string(),
            artifact: ".ll".to_string(),
            object: ".o".to_string(),
            error_log: ".err".to_string(),
            negative: ".neg".to_string(),
            formatted: ".syp.txt".to_string(),
            bitcode: ".bc".to_string(),
        }
    }
}

/// A fixture and the paths of everything generated for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub fixture: PathBuf,
    pub base: PathBuf,
    pub source: PathBuf,
    pub expected: PathBuf,
    pub artifact: PathBuf,
    pub object: PathBuf,
    pub error_log: PathBuf,
    pub negative: PathBuf,
    pub formatted: PathBuf,
    pub bitcode: PathBuf,
}

fn sibling(base: &Path, extension: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(extension);
    PathBuf::from(name)
}

impl TestCase {
    /// Derive sibling paths for the fixture at `fixture`.
    pub fn new(fixture: &Path, extensions: &SiblingExtensions) -> Self {
        let base = base_path(fixture);
        Self {
            fixture: fixture.to_path_buf(),
            source: sibling(&base, &extensions.source),
            expected: sibling(&base, &extensions.expected),
            artifact: sibling(&base, &extensions.artifact),
            object: sibling(&base, &extensions.object),
            error_log: sibling(&base, &extensions.error_log),
            negative: sibling(&base, &extensions.negative),
            formatted: sibling(&base, &extensions.formatted),
            bitcode: sibling(&base, &extensions.bitcode),
            base,
        }
    }

    /// Every generated sibling, in a fixed order.
    pub fn generated(&self) -> [&Path; 8] {
        [
            &self.source,
            &self.formatted,
            &self.artifact,
            &self.expected,
            &self.error_log,
            &self.negative,
            &self.bitcode,
            &self.object,
        ]
    }

    /// Write the source and expected-artifact sections next to the fixture.
    pub fn materialize<F: Filesystem>(&self, fs: &F, fixture: &Fixture) -> Result<(), FsError> {
        fs.write_atomic(&self.source, fixture.source.as_bytes())?;
        fs.write_atomic(&self.expected, fixture.expected_artifact.as_bytes())?;
        Ok(())
    }

    /// Remove every generated sibling that exists. Returns how many were removed.
    pub fn clean<F: Filesystem>(&self, fs: &F) -> Result<usize, FsError> {
        let mut removed = 0;
        for path in self.generated() {
            match fs.remove(path) {
                Ok(()) => removed += 1,
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e),
            }
        }
        Ok(removed)
    }
}
