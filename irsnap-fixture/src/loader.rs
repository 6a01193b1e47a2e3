//! Fixture loading.

use std::path::Path;

use irsnap_fs::{Filesystem, FsError};

use crate::codec::{Fixture, StructuralError};

/// Errors that can occur when loading a fixture.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read fixture {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: FsError,
    },

    #[error("malformed fixture {path}: {source}")]
    Structure {
        path: String,
        #[source]
        source: StructuralError,
    },
}

/// Read and parse the fixture at `path`.
pub fn load_fixture<F: Filesystem>(fs: &F, path: &Path) -> Result<Fixture, LoadError> {
    let text = fs.read_file(path).map_err(|source| LoadError::Read {
        path: path.display().to_string(),
        source,
    })?;

    Fixture::parse(&text).map_err(|source| LoadError::Structure {
        path: path.display().to_string(),
        source,
    })
}
