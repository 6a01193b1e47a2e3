//! IR normalization.
//!
//! Lines that differ between toolchain runs (module identifiers, source file
//! names) are stripped before any comparison. With a `VersionSpec` the
//! expected and actual IR are first round-tripped through the assembler of
//! one LLVM version and the disassembler of another, which rewrites both into
//! the target version's canonical text.

use std::path::Path;
use std::str::FromStr;

use irsnap_fixture::TestCase;
use irsnap_fs::Filesystem;
use irsnap_process::{Invocation, ProcessRunner};
use regex::Regex;
use thiserror::Error;

use crate::context::Context;
use crate::logger::Logger;
use crate::outcome::{Stage, TestFailure};

/// Removes volatile lines from IR text.
#[derive(Debug, Clone)]
pub struct VolatileFilter {
    patterns: Vec<Regex>,
}

impl VolatileFilter {
    pub fn new(patterns: Vec<Regex>) -> Self {
        Self { patterns }
    }

    fn is_volatile(&self, line: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(line))
    }

    /// Drop volatile lines, trim, and end with exactly one newline.
    pub fn strip(&self, text: &str) -> String {
        let kept: String = text
            .split_inclusive('\n')
            .filter(|line| !self.is_volatile(line))
            .collect();
        let mut out = kept.trim().to_string();
        out.push('\n');
        out
    }
}

/// Malformed `+from-to` token.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid version pair {0:?}: expected +FROM-TO")]
pub struct VersionSpecError(pub String);

/// Source and target toolchain versions for IR translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSpec {
    pub from: String,
    pub to: String,
}

impl VersionSpec {
    /// `base-version`, or just `base` when the version is empty.
    pub fn tool(base: &str, version: &str) -> String {
        if version.is_empty() {
            base.to_string()
        } else {
            format!("{}-{}", base, version)
        }
    }
}

impl FromStr for VersionSpec {
    type Err = VersionSpecError;

    /// Parse `+3.6-3.7` (the leading `+` is optional).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s.strip_prefix('+').unwrap_or(s);
        let parts: Vec<&str> = body.split('-').collect();
        match parts.as_slice() {
            [from, to] => Ok(Self {
                from: from.to_string(),
                to: to.to_string(),
            }),
            _ => Err(VersionSpecError(s.to_string())),
        }
    }
}

/// Rewrite `file` in place through the assembler/disassembler pair.
pub fn translate<F, R, L>(
    ctx: &Context<'_, F, R, L>,
    case: &TestCase,
    versions: &VersionSpec,
    file: &Path,
) -> Result<(), TestFailure>
where
    F: Filesystem,
    R: ProcessRunner,
    L: Logger,
{
    let config = ctx.config;
    let bitcode = case.bitcode.display().to_string();
    let text = file.display().to_string();

    let assemble = Invocation::new(VersionSpec::tool(&config.assembler, &versions.from))
        .args(["-o", bitcode.as_str(), text.as_str()]);
    ctx.exec_checked(Stage::Assemble, &assemble)?;

    let disassemble = Invocation::new(VersionSpec::tool(&config.disassembler, &versions.to))
        .args(["-o", text.as_str(), bitcode.as_str()]);
    ctx.exec_checked(Stage::Disassemble, &disassemble)?;

    Ok(())
}

/// Strip volatile lines from `file` in place.
pub fn patch<F, R, L>(ctx: &Context<'_, F, R, L>, file: &Path) -> Result<(), TestFailure>
where
    F: Filesystem,
    R: ProcessRunner,
    L: Logger,
{
    let text = ctx.fs.read_file(file)?;
    ctx.fs.write_atomic(file, ctx.volatile().strip(&text).as_bytes())?;
    Ok(())
}

/// Normalize the compiler's IR output, translating versions when requested.
///
/// The expected file is translated and patched before the actual one so both
/// sides of the diff come out of the same toolchain.
pub fn normalize<F, R, L>(
    ctx: &Context<'_, F, R, L>,
    case: &TestCase,
    versions: Option<&VersionSpec>,
) -> Result<(), TestFailure>
where
    F: Filesystem,
    R: ProcessRunner,
    L: Logger,
{
    if !ctx.fs.exists(&case.artifact) {
        return Err(TestFailure::NoArtifact(
            ctx.config.extensions.artifact.clone(),
        ));
    }

    if let Some(versions) = versions {
        ctx.logger.verbose(&format!(
            "translating IR {} -> {}",
            display_version(&versions.from),
            display_version(&versions.to)
        ));
        translate(ctx, case, versions, &case.expected)?;
        patch(ctx, &case.expected)?;
        translate(ctx, case, versions, &case.artifact)?;
    }

    patch(ctx, &case.artifact)
}

fn display_version(version: &str) -> &str {
    if version.is_empty() {
        "default"
    } else {
        version
    }
}
