//! Filesystem trait with real and in-memory implementations.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use glob::Pattern;
use thiserror::Error;
use walkdir::WalkDir;

/// Errors from filesystem operations.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("path error: {0}")]
    Path(String),

    #[error("invalid fixture pattern {pattern}: {message}")]
    Pattern { pattern: String, message: String },
}

impl FsError {
    /// Whether the error means the file simply isn't there.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FsError::Io(e) if e.kind() == io::ErrorKind::NotFound)
    }
}

/// Trait for filesystem operations.
/// Abstracted for testing with mock implementations.
pub trait Filesystem: Send + Sync {
    /// Write data atomically to a path (write to temp, then rename).
    fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<(), FsError>;

    /// Read file contents as a string.
    fn read_file(&self, path: &Path) -> Result<String, FsError>;

    /// Remove a file.
    fn remove(&self, path: &Path) -> Result<(), FsError>;

    /// Check if a path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Recursively list files under `root` whose file name matches `pattern`.
    /// Paths are returned as found under `root`, sorted.
    fn list_files(&self, root: &Path, pattern: &Pattern) -> Result<Vec<PathBuf>, FsError>;
}

impl<F: Filesystem + ?Sized> Filesystem for &F {
    fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<(), FsError> {
        (**self).write_atomic(path, data)
    }

    fn read_file(&self, path: &Path) -> Result<String, FsError> {
        (**self).read_file(path)
    }

    fn remove(&self, path: &Path) -> Result<(), FsError> {
        (**self).remove(path)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn list_files(&self, root: &Path, pattern: &Pattern) -> Result<Vec<PathBuf>, FsError> {
        (**self).list_files(root, pattern)
    }
}

/// Temp path used by `write_atomic`: the full file name plus `.tmp`, so two
/// siblings that differ only by extension never share a temp file.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn name_matches(path: &Path, pattern: &Pattern) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map_or(false, |n| pattern.matches(n))
}

/// Real filesystem implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFilesystem;

impl Filesystem for RealFilesystem {
    fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<(), FsError> {
        let temp = temp_path(path);

        fs::write(&temp, data)?;

        // Rename to final path (atomic on most filesystems)
        if let Err(e) = fs::rename(&temp, path) {
            let _ = fs::remove_file(&temp);
            return Err(e.into());
        }

        Ok(())
    }

    fn read_file(&self, path: &Path) -> Result<String, FsError> {
        Ok(fs::read_to_string(path)?)
    }

    fn remove(&self, path: &Path) -> Result<(), FsError> {
        fs::remove_file(path)?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn list_files(&self, root: &Path, pattern: &Pattern) -> Result<Vec<PathBuf>, FsError> {
        let mut files = Vec::new();

        if !root.exists() {
            return Ok(files);
        }

        for entry in WalkDir::new(root).follow_links(true) {
            let entry = entry.map_err(|e| match e.into_io_error() {
                Some(io) => FsError::Io(io),
                None => FsError::Path(format!("filesystem loop under {}", root.display())),
            })?;

            if entry.file_type().is_file() && name_matches(entry.path(), pattern) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        Ok(files)
    }
}

/// Mock filesystem for testing.
/// Cloning creates a new handle to the same underlying data.
#[derive(Debug, Clone, Default)]
pub struct MockFilesystem {
    files: Arc<RwLock<HashMap<PathBuf, Vec<u8>>>>,
    fail_writes: Arc<RwLock<bool>>,
}

impl MockFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all files in the mock filesystem.
    pub fn files(&self) -> HashMap<PathBuf, Vec<u8>> {
        self.files.read().unwrap().clone()
    }

    /// Sorted list of every path currently stored.
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.files.read().unwrap().keys().cloned().collect();
        paths.sort();
        paths
    }

    /// Get content of a specific file.
    pub fn get_file(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.read().unwrap().get(path).cloned()
    }

    /// Get content of a specific file as text.
    pub fn get_text(&self, path: &Path) -> Option<String> {
        self.get_file(path)
            .map(|data| String::from_utf8_lossy(&data).into_owned())
    }

    /// Add a file directly (for test setup).
    pub fn add_file(&self, path: impl Into<PathBuf>, data: impl AsRef<[u8]>) {
        self.files
            .write()
            .unwrap()
            .insert(path.into(), data.as_ref().to_vec());
    }

    /// Make every subsequent write fail with a permission error.
    pub fn fail_writes(&self) {
        *self.fail_writes.write().unwrap() = true;
    }
}

impl Filesystem for MockFilesystem {
    fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<(), FsError> {
        if *self.fail_writes.read().unwrap() {
            return Err(FsError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("read-only: {}", path.display()),
            )));
        }
        self.files
            .write()
            .unwrap()
            .insert(path.to_path_buf(), data.to_vec());
        Ok(())
    }

    fn read_file(&self, path: &Path) -> Result<String, FsError> {
        let files = self.files.read().unwrap();
        match files.get(path) {
            Some(data) => String::from_utf8(data.clone())
                .map_err(|e| FsError::Path(format!("invalid utf8: {}", e))),
            None => Err(FsError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {}", path.display()),
            ))),
        }
    }

    fn remove(&self, path: &Path) -> Result<(), FsError> {
        match self.files.write().unwrap().remove(path) {
            Some(_) => Ok(()),
            None => Err(FsError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {}", path.display()),
            ))),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.read().unwrap().contains_key(path)
    }

    fn list_files(&self, root: &Path, pattern: &Pattern) -> Result<Vec<PathBuf>, FsError> {
        let whole_tree = root.as_os_str().is_empty() || root == Path::new(".");
        let mut files: Vec<PathBuf> = self
            .files
            .read()
            .unwrap()
            .keys()
            .filter(|p| (whole_tree || p.starts_with(root)) && name_matches(p, pattern))
            .cloned()
            .collect();

        files.sort();
        Ok(files)
    }
}
