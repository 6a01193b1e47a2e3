//! Fixture discovery and selection.
//!
//! Fixtures are found recursively under a root directory and reported
//! relative to it, in sorted order. Command-line filters then pick a subset
//! by substring match, each fixture at most once.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::filesystem::{Filesystem, FsError};

/// Two fixtures whose generated siblings would land on the same paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub base: PathBuf,
    pub first: PathBuf,
    pub second: PathBuf,
}

/// Path of a fixture with its last extension removed. Generated siblings are
/// named by appending their own extension to this.
pub fn base_path(path: &Path) -> PathBuf {
    path.with_extension("")
}

/// Find every fixture under `root` whose file name matches `pattern`.
///
/// Returned paths are relative to `root` and sorted.
pub fn discover_fixtures<F: Filesystem>(
    fs: &F,
    root: &Path,
    pattern: &str,
) -> Result<Vec<PathBuf>, FsError> {
    let glob = Pattern::new(pattern).map_err(|e| FsError::Pattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    let mut fixtures: Vec<PathBuf> = fs
        .list_files(root, &glob)?
        .into_iter()
        .map(|path| {
            let relative = path.strip_prefix(root).map(Path::to_path_buf).ok();
            relative.unwrap_or(path)
        })
        .collect();

    fixtures.sort();
    Ok(fixtures)
}

/// Drop a trailing `.ext` from a filter so `foo.test`, `foo.syp` and `foo`
/// select the same fixture. A leading dot is part of the name.
fn strip_filter_extension(filter: &str) -> &str {
    match filter.rfind('.') {
        Some(dot) if dot > 0 => &filter[..dot],
        _ => filter,
    }
}

/// Select fixtures matching any of `filters`.
///
/// With no filters every fixture is selected. Otherwise each filter, in
/// order, claims every not-yet-claimed fixture whose path contains it.
pub fn select_fixtures(all: &[PathBuf], filters: &[String]) -> Vec<PathBuf> {
    if filters.is_empty() {
        return all.to_vec();
    }

    let mut pool = all.to_vec();
    let mut selected = Vec::new();

    for filter in filters {
        let needle = strip_filter_extension(filter);
        let (matched, rest): (Vec<PathBuf>, Vec<PathBuf>) = pool
            .into_iter()
            .partition(|p| p.to_string_lossy().contains(needle));
        selected.extend(matched);
        pool = rest;
    }

    selected
}

/// Report fixtures that share a base path.
pub fn find_collisions(paths: &[PathBuf]) -> Vec<Collision> {
    let mut seen: HashMap<PathBuf, &PathBuf> = HashMap::new();
    let mut collisions = Vec::new();

    for path in paths {
        let base = base_path(path);
        match seen.get(&base) {
            Some(first) => collisions.push(Collision {
                base,
                first: (*first).clone(),
                second: path.clone(),
            }),
            None => {
                seen.insert(base, path);
            }
        }
    }

    collisions
}
