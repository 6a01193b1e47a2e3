//! Fixture section codec.
//!
//! Grammar:
//!
//! ```text
//! fixture  := source DELIM artifact [DELIM symbols]
//! DELIM    := "========"
//! ```
//!
//! Whitespace is normalized only at the seams: leading whitespace of the
//! artifact and symbols sections is dropped, and in the three-section form
//! the newline that precedes the second delimiter belongs to the delimiter.
//! Everything else is kept verbatim so diffs against the golden stay exact.

use thiserror::Error;

/// Separator between fixture sections.
pub const SECTION_DELIMITER: &str = "========";

/// A fixture whose section count is outside 2..=3.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum StructuralError {
    #[error("missing section: a fixture needs a source and an expected output")]
    MissingSection,

    #[error("extra section: found {0} sections, at most 3 are allowed")]
    ExtraSection(usize),
}

/// Parsed contents of a fixture file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    /// Source section, verbatim.
    pub source: String,
    /// Expected compiled IR, or expected diagnostics for a rejected program.
    pub expected_artifact: String,
    /// Expected symbol listing. `None` when the fixture has no third section,
    /// in which case symbols are not compared.
    pub expected_symbols: Option<String>,
}

/// Split `text` on every delimiter occurrence.
fn split_sections(text: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut rest = text;

    while let Some(at) = rest.find(SECTION_DELIMITER) {
        sections.push(&rest[..at]);
        rest = &rest[at + SECTION_DELIMITER.len()..];
    }
    sections.push(rest);

    sections
}

impl Fixture {
    /// Parse fixture text into its sections.
    pub fn parse(text: &str) -> Result<Self, StructuralError> {
        match split_sections(text).as_slice() {
            [source, artifact] => Ok(Self {
                source: source.to_string(),
                expected_artifact: artifact.trim_start().to_string(),
                expected_symbols: None,
            }),
            [source, artifact, symbols] => {
                let artifact = artifact.trim_start();
                let artifact = artifact.strip_suffix('\n').unwrap_or(artifact);
                Ok(Self {
                    source: source.to_string(),
                    expected_artifact: artifact.to_string(),
                    expected_symbols: Some(symbols.trim_start().to_string()),
                })
            }
            [_] => Err(StructuralError::MissingSection),
            sections => Err(StructuralError::ExtraSection(sections.len())),
        }
    }

    /// Whether the fixture carries a symbols section.
    pub fn has_symbols(&self) -> bool {
        self.expected_symbols.is_some()
    }

    /// Render the fixture back to text.
    pub fn serialize(&self) -> String {
        serialize(
            &self.source,
            &self.expected_artifact,
            self.expected_symbols.as_deref(),
        )
    }
}

/// Render fixture text.
///
/// The source is trimmed and framed by one blank line on each side. The
/// symbols section is written only when `symbols` is given, which callers
/// restrict to accepted programs.
pub fn serialize(source: &str, artifact: &str, symbols: Option<&str>) -> String {
    let mut text = String::with_capacity(
        source.len() + artifact.len() + symbols.map_or(0, str::len) + 32,
    );

    text.push('\n');
    text.push_str(source.trim());
    text.push_str("\n\n");
    text.push_str(SECTION_DELIMITER);
    text.push_str("\n\n");
    text.push_str(artifact);

    if let Some(symbols) = symbols {
        text.push('\n');
        text.push_str(SECTION_DELIMITER);
        text.push_str("\n\n");
        text.push_str(symbols);
    }

    text
}
