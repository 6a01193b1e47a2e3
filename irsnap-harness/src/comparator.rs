//! Artifact and symbol comparison.
//!
//! Artifacts are compared by the external diff tool (whitespace and blank
//! line insensitive). Symbol listings are small, so they are diffed
//! in-process with a line-based unified diff.

use std::ops::Range;
use std::path::Path;

use irsnap_fixture::TestCase;
use irsnap_fs::Filesystem;
use irsnap_process::{Invocation, ProcessRunner};

use crate::context::Context;
use crate::logger::Logger;
use crate::outcome::{Stage, TestFailure};

/// Lines of context around each change in a symbol diff.
pub const CONTEXT_LINES: usize = 3;

/// Header names of the symbol diff.
pub const EXPECTED_SYMBOLS_LABEL: &str = "expected.sym";
pub const ACTUAL_SYMBOLS_LABEL: &str = "actual.sym";

/// Symbol type letter of read-only data, excluded from listings.
const READ_ONLY_TYPE: &str = "r";

/// Result of comparing an expected and an actual text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    Match,
    /// Holds the diff text.
    Mismatch(String),
}

impl Comparison {
    pub fn is_match(&self) -> bool {
        matches!(self, Comparison::Match)
    }
}

/// Diff two files with the configured diff tool.
///
/// Exit 0 is a match, exit 1 a mismatch with the diff on stdout; anything
/// else means the tool itself failed.
pub fn diff_files<F, R, L>(
    ctx: &Context<'_, F, R, L>,
    stage: Stage,
    expected: &Path,
    actual: &Path,
) -> Result<Comparison, TestFailure>
where
    F: Filesystem,
    R: ProcessRunner,
    L: Logger,
{
    let invocation = Invocation::new(ctx.config.diff.as_str())
        .args(ctx.config.diff_args.iter().cloned())
        .arg(expected.display().to_string())
        .arg(actual.display().to_string());

    let output = ctx.exec(stage, &invocation)?;
    match output.code() {
        Some(0) => Ok(Comparison::Match),
        Some(1) => Ok(Comparison::Mismatch(output.combined())),
        _ => Err(TestFailure::Tool {
            stage,
            detail: format!("{} ({})\n{}", invocation, output.exit, output.combined()),
        }),
    }
}

/// List the symbols of the test's object file, filtered for comparison.
///
/// A failing dump tool means the object is missing or unreadable: the
/// output is logged and the test fails with `[no symbols]`.
pub fn dump_symbols<F, R, L>(
    ctx: &Context<'_, F, R, L>,
    case: &TestCase,
) -> Result<String, TestFailure>
where
    F: Filesystem,
    R: ProcessRunner,
    L: Logger,
{
    let invocation = Invocation::new(ctx.config.symbol_dump.as_str())
        .args(ctx.config.symbol_dump_args.iter().cloned())
        .arg(case.object.display().to_string());

    let output = ctx.exec(Stage::Symbols, &invocation)?;
    if !output.success() {
        ctx.write_log(case, &output.combined());
        return Err(TestFailure::NoSymbols);
    }
    Ok(filter_symbols(&output.stdout))
}

/// Reduce a raw symbol listing to `name type` lines, dropping read-only data.
pub fn filter_symbols(raw: &str) -> String {
    let mut listing = String::new();
    for line in raw.lines() {
        let fields: Vec<&str> = line.split_whitespace().take(2).collect();
        if fields.is_empty() || fields.get(1) == Some(&READ_ONLY_TYPE) {
            continue;
        }
        listing.push_str(&fields.join(" "));
        listing.push('\n');
    }
    listing
}

/// Compare an expected symbol section against an actual listing.
pub fn compare_symbols(expected: &str, actual: &str) -> Comparison {
    let expected = symbol_lines(expected);
    let actual = symbol_lines(actual);
    let diff = unified_diff(
        &expected,
        &actual,
        EXPECTED_SYMBOLS_LABEL,
        ACTUAL_SYMBOLS_LABEL,
    );
    if diff.is_empty() {
        Comparison::Match
    } else {
        Comparison::Mismatch(diff)
    }
}

fn symbol_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect()
}

// ===========================================
// Unified diff
// ===========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Equal,
    Change,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Opcode {
    tag: Tag,
    a: Range<usize>,
    b: Range<usize>,
}

/// Edit script between `a` and `b` from a longest common subsequence.
/// Within a change, deletions are listed before insertions.
fn opcodes(a: &[&str], b: &[&str]) -> Vec<Opcode> {
    let (n, m) = (a.len(), b.len());

    // lcs[i][j] = LCS length of a[i..] and b[j..]
    let mut lcs = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i][j] = if a[i] == b[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut codes: Vec<Opcode> = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < n || j < m {
        let tag = if i < n && j < m && a[i] == b[j] {
            Tag::Equal
        } else {
            Tag::Change
        };
        let (next_i, next_j) = match tag {
            Tag::Equal => (i + 1, j + 1),
            Tag::Change if j == m || (i < n && lcs[i + 1][j] >= lcs[i][j + 1]) => (i + 1, j),
            Tag::Change => (i, j + 1),
        };
        match codes.last_mut() {
            Some(last) if last.tag == tag => {
                last.a.end = next_i;
                last.b.end = next_j;
            }
            _ => codes.push(Opcode {
                tag,
                a: i..next_i,
                b: j..next_j,
            }),
        }
        i = next_i;
        j = next_j;
    }
    codes
}

/// Split an edit script into hunks with `context` lines around each change.
fn grouped(mut codes: Vec<Opcode>, context: usize) -> Vec<Vec<Opcode>> {
    if codes.iter().all(|c| c.tag == Tag::Equal) {
        return Vec::new();
    }

    if let Some(first) = codes.first_mut() {
        if first.tag == Tag::Equal {
            first.a.start = first.a.start.max(first.a.end.saturating_sub(context));
            first.b.start = first.b.start.max(first.b.end.saturating_sub(context));
        }
    }
    if let Some(last) = codes.last_mut() {
        if last.tag == Tag::Equal {
            last.a.end = last.a.end.min(last.a.start + context);
            last.b.end = last.b.end.min(last.b.start + context);
        }
    }

    let mut groups = Vec::new();
    let mut group = Vec::new();
    for mut code in codes {
        if code.tag == Tag::Equal && code.a.len() > 2 * context {
            group.push(Opcode {
                tag: Tag::Equal,
                a: code.a.start..code.a.start + context,
                b: code.b.start..code.b.start + context,
            });
            groups.push(std::mem::take(&mut group));
            code.a.start = code.a.end - context;
            code.b.start = code.b.end - context;
        }
        group.push(code);
    }
    if !(group.len() == 1 && group[0].tag == Tag::Equal) && !group.is_empty() {
        groups.push(group);
    }
    groups
}

fn format_range(range: &Range<usize>) -> String {
    match range.len() {
        0 => format!("{},0", range.start),
        1 => format!("{}", range.start + 1),
        len => format!("{},{}", range.start + 1, len),
    }
}

/// Line-based unified diff; empty when `a` and `b` are equal.
pub fn unified_diff(a: &[&str], b: &[&str], from: &str, to: &str) -> String {
    let groups = grouped(opcodes(a, b), CONTEXT_LINES);
    if groups.is_empty() {
        return String::new();
    }

    let mut out = format!("--- {}\n+++ {}\n", from, to);
    for group in groups {
        let (first, last) = (&group[0], &group[group.len() - 1]);
        out.push_str(&format!(
            "@@ -{} +{} @@\n",
            format_range(&(first.a.start..last.a.end)),
            format_range(&(first.b.start..last.b.end))
        ));
        for code in &group {
            match code.tag {
                Tag::Equal => {
                    for line in &a[code.a.clone()] {
                        out.push_str(&format!(" {}\n", line));
                    }
                }
                Tag::Change => {
                    for line in &a[code.a.clone()] {
                        out.push_str(&format!("-{}\n", line));
                    }
                    for line in &b[code.b.clone()] {
                        out.push_str(&format!("+{}\n", line));
                    }
                }
            }
        }
    }
    out
}
