//! Golden fixtures for irsnap.
//!
//! A fixture is one text file bundling a source program with its expected
//! compiler output and, optionally, its expected symbol listing:
//!
//! ```text
//! <source>
//! ========
//! <expected artifact>
//! ========
//! <expected symbols>
//! ```
//!
//! This crate provides:
//! - The section codec (`Fixture::parse`, `serialize`)
//! - Header options read from the first lines of the source
//! - `TestCase`, the set of generated sibling files derived from a fixture path

pub mod case;
pub mod codec;
pub mod header;
pub mod loader;

pub use case::{SiblingExtensions, TestCase};
pub use codec::{serialize, Fixture, StructuralError, SECTION_DELIMITER};
pub use header::{HeaderOptions, NO_FORMAT_MARKER, PRINT_DEBUG_MARKER};
pub use loader::{load_fixture, LoadError};
