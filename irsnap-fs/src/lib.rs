//! Filesystem abstraction for irsnap.
//!
//! This crate provides:
//! - Filesystem trait for atomic writes and file operations
//! - Fixture discovery, filter-based selection and base-name collision checks

pub mod discovery;
pub mod filesystem;

pub use discovery::{base_path, discover_fixtures, find_collisions, select_fixtures, Collision};
pub use filesystem::{Filesystem, FsError, MockFilesystem, RealFilesystem};
