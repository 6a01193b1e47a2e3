//! Per-fixture options read from the head of the source section.

/// Marker that disables the formatter fixed-point check.
pub const NO_FORMAT_MARKER: &str = "nofmt";

/// Marker that passes the debug flag to the compiler. Debug output is not
/// formatter-stable, so it also disables the formatter check.
pub const PRINT_DEBUG_MARKER: &str = "print-debug";

/// Number of leading source lines searched for markers.
pub const HEADER_LINES: usize = 2;

/// Options derived from the fixture header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderOptions {
    pub skip_format: bool,
    pub print_debug: bool,
}

impl HeaderOptions {
    /// Read options from the first `HEADER_LINES` lines of `source`.
    pub fn from_source(source: &str) -> Self {
        let header: String = source.split_inclusive('\n').take(HEADER_LINES).collect();

        let print_debug = header.contains(PRINT_DEBUG_MARKER);
        let skip_format = print_debug || header.contains(NO_FORMAT_MARKER);

        Self {
            skip_format,
            print_debug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_markers() {
        assert_eq!(
            HeaderOptions::from_source("\nint main() {}\n"),
            HeaderOptions::default()
        );
    }

    #[test]
    fn test_nofmt() {
        let opts = HeaderOptions::from_source("\n// nofmt\nint main() {}\n");
        assert!(opts.skip_format);
        assert!(!opts.print_debug);
    }

    #[test]
    fn test_print_debug_implies_skip_format() {
        let opts = HeaderOptions::from_source("// print-debug\nint main() {}\n");
        assert!(opts.skip_format);
        assert!(opts.print_debug);
    }

    #[test]
    fn test_marker_past_header_ignored() {
        let opts = HeaderOptions::from_source("\nint main() {}\n// nofmt\n");
        assert_eq!(opts, HeaderOptions::default());
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(HeaderOptions::from_source(""), HeaderOptions::default());
    }
}
