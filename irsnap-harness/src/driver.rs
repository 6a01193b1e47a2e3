//! Compiler driver and formatter check.

use std::path::PathBuf;

use irsnap_fixture::{HeaderOptions, TestCase};
use irsnap_fs::Filesystem;
use irsnap_process::{Invocation, ProcessRunner};

use crate::comparator::{diff_files, Comparison};
use crate::context::Context;
use crate::logger::Logger;
use crate::outcome::{Stage, TestFailure};

/// What the formatter said about the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatCheck {
    /// Disabled by the fixture header or configuration.
    Skipped,
    /// The formatter exited non-zero: no opinion on this input.
    Declined,
    /// Formatting the source leaves it unchanged.
    Stable,
}

/// Classified result of a compiler run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Exit 0; IR was written to `artifact`.
    Accepted { artifact: PathBuf },
    /// Non-zero exit; stderr then stdout, also saved as the negative output.
    Rejected { diagnostics: String },
}

impl RunOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, RunOutcome::Accepted { .. })
    }
}

/// Check that the source is a fixed point of the formatter.
pub fn check_format<F, R, L>(
    ctx: &Context<'_, F, R, L>,
    case: &TestCase,
    header: HeaderOptions,
) -> Result<FormatCheck, TestFailure>
where
    F: Filesystem,
    R: ProcessRunner,
    L: Logger,
{
    let formatter = match &ctx.config.formatter {
        Some(formatter) if !header.skip_format => formatter,
        _ => return Ok(FormatCheck::Skipped),
    };

    let invocation = Invocation::new(formatter.as_str()).arg(case.source.display().to_string());
    let output = ctx.exec(Stage::Format, &invocation)?;

    if output.crashed() {
        ctx.write_log(case, &output.combined());
        return Err(TestFailure::Crash(Stage::Format));
    }
    if !output.success() {
        return Ok(FormatCheck::Declined);
    }

    ctx.fs.write_atomic(&case.formatted, output.stdout.as_bytes())?;
    match diff_files(ctx, Stage::Format, &case.source, &case.formatted)? {
        Comparison::Match => Ok(FormatCheck::Stable),
        Comparison::Mismatch(diff) => {
            ctx.write_log(case, &diff);
            Err(TestFailure::FormatMismatch)
        }
    }
}

/// Build the compiler command line for `case`.
pub fn compiler_invocation<F, R, L>(
    ctx: &Context<'_, F, R, L>,
    case: &TestCase,
    header: HeaderOptions,
) -> Invocation
where
    F: Filesystem,
    R: ProcessRunner,
    L: Logger,
{
    let config = ctx.config;
    let mut invocation = Invocation::new(config.compiler.as_str());
    if header.print_debug {
        invocation = invocation.arg(config.debug_flag.as_str());
    }
    invocation
        .args(config.compiler_args.iter().cloned())
        .arg(case.source.display().to_string())
}

/// Run the compiler on the test source and classify the result.
pub fn compile<F, R, L>(
    ctx: &Context<'_, F, R, L>,
    case: &TestCase,
    header: HeaderOptions,
) -> Result<RunOutcome, TestFailure>
where
    F: Filesystem,
    R: ProcessRunner,
    L: Logger,
{
    let invocation = compiler_invocation(ctx, case, header);
    let output = ctx.exec(Stage::Compile, &invocation)?;

    if output.crashed() {
        ctx.write_log(case, &output.combined());
        return Err(TestFailure::Crash(Stage::Compile));
    }
    if output.success() {
        return Ok(RunOutcome::Accepted {
            artifact: case.artifact.clone(),
        });
    }

    let diagnostics = output.combined();
    ctx.fs.write_atomic(&case.negative, diagnostics.as_bytes())?;
    Ok(RunOutcome::Rejected { diagnostics })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HarnessConfig;
    use crate::logger::MockLogger;
    use irsnap_fixture::SiblingExtensions;
    use irsnap_fs::MockFilesystem;
    use irsnap_process::{MockRunner, ProcessOutput};
    use std::path::Path;

    struct Harness {
        fs: MockFilesystem,
        runner: MockRunner,
        logger: MockLogger,
        config: HarnessConfig,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                fs: MockFilesystem::new(),
                runner: MockRunner::new(),
                logger: MockLogger::capture_all(),
                config: HarnessConfig::default(),
            }
        }

        fn ctx(&self) -> Context<'_, MockFilesystem, MockRunner, MockLogger> {
            Context::new(&self.fs, &self.runner, &self.logger, &self.config).unwrap()
        }
    }

    fn case() -> TestCase {
        TestCase::new(Path::new("t/a.test"), &SiblingExtensions::default())
    }

    fn plain() -> HeaderOptions {
        HeaderOptions::default()
    }

    // ===========================================
    // check_format Tests
    // ===========================================

    #[test]
    fn test_format_skipped_by_header() {
        let h = Harness::new();
        let header = HeaderOptions {
            skip_format: true,
            print_debug: false,
        };

        assert_eq!(check_format(&h.ctx(), &case(), header).unwrap(), FormatCheck::Skipped);
        assert!(h.runner.calls().is_empty());
    }

    #[test]
    fn test_format_skipped_without_formatter() {
        let mut h = Harness::new();
        h.config.formatter = None;

        assert_eq!(check_format(&h.ctx(), &case(), plain()).unwrap(), FormatCheck::Skipped);
    }

    #[test]
    fn test_format_declined() {
        let h = Harness::new();
        h.runner.respond("../syfmt", ProcessOutput::exited(1, "", "unsupported"));

        assert_eq!(check_format(&h.ctx(), &case(), plain()).unwrap(), FormatCheck::Declined);
        assert!(!h.runner.was_called("diff"));
        assert!(!h.fs.exists(Path::new("t/a.err")));
    }

    #[test]
    fn test_format_crash() {
        let h = Harness::new();
        h.runner.respond("../syfmt", ProcessOutput::signaled(11, "segfault\n"));

        let err = check_format(&h.ctx(), &case(), plain()).unwrap_err();

        assert_eq!(err.to_string(), "[crash format]");
        assert_eq!(h.fs.get_text(Path::new("t/a.err")).as_deref(), Some("segfault\n"));
    }

    #[test]
    fn test_format_stable() {
        let h = Harness::new();
        h.runner.respond("../syfmt", ProcessOutput::ok("int main() {}\n"));
        h.runner.respond("diff", ProcessOutput::ok(""));

        assert_eq!(check_format(&h.ctx(), &case(), plain()).unwrap(), FormatCheck::Stable);
        assert_eq!(
            h.fs.get_text(Path::new("t/a.syp.txt")).as_deref(),
            Some("int main() {}\n")
        );
        assert_eq!(h.runner.calls_to("diff")[0].args, vec!["-uwB", "t/a.syp", "t/a.syp.txt"]);
    }

    #[test]
    fn test_format_mismatch_logs_diff() {
        let h = Harness::new();
        h.runner.respond("../syfmt", ProcessOutput::ok("int main() { }\n"));
        h.runner.respond("diff", ProcessOutput::exited(1, "-int main(){}\n+int main() { }\n", ""));

        let err = check_format(&h.ctx(), &case(), plain()).unwrap_err();

        assert_eq!(err.to_string(), "[fail format]");
        assert!(h.fs.get_text(Path::new("t/a.err")).unwrap().contains("+int main() { }"));
    }

    // ===========================================
    // compile Tests
    // ===========================================

    #[test]
    fn test_compiler_invocation() {
        let h = Harness::new();
        let invocation = compiler_invocation(&h.ctx(), &case(), plain());
        assert_eq!(invocation.to_string(), "../saphyr --llvmir t/a.syp");
    }

    #[test]
    fn test_compiler_invocation_print_debug() {
        let h = Harness::new();
        let header = HeaderOptions::from_source("// print-debug\n");
        let invocation = compiler_invocation(&h.ctx(), &case(), header);
        assert_eq!(invocation.to_string(), "../saphyr --print-debug --llvmir t/a.syp");
    }

    #[test]
    fn test_compile_accepted() {
        let h = Harness::new();
        h.runner.respond("../saphyr", ProcessOutput::ok(""));

        let outcome = compile(&h.ctx(), &case(), plain()).unwrap();

        assert_eq!(
            outcome,
            RunOutcome::Accepted {
                artifact: PathBuf::from("t/a.ll")
            }
        );
        assert!(outcome.is_accepted());
    }

    #[test]
    fn test_compile_rejected_writes_negative_output() {
        let h = Harness::new();
        h.runner.respond(
            "../saphyr",
            ProcessOutput::exited(1, "found 1 error\n", "a.syp:1: type mismatch\n"),
        );

        let outcome = compile(&h.ctx(), &case(), plain()).unwrap();

        let expected = "a.syp:1: type mismatch\nfound 1 error\n";
        assert_eq!(
            outcome,
            RunOutcome::Rejected {
                diagnostics: expected.to_string()
            }
        );
        assert_eq!(h.fs.get_text(Path::new("t/a.neg")).as_deref(), Some(expected));
    }

    #[test]
    fn test_compile_crash() {
        let h = Harness::new();
        h.runner.respond("../saphyr", ProcessOutput::signaled(6, "assertion failed\n"));

        let err = compile(&h.ctx(), &case(), plain()).unwrap_err();

        assert_eq!(err.to_string(), "[crash compile]");
        assert_eq!(
            h.fs.get_text(Path::new("t/a.err")).as_deref(),
            Some("assertion failed\n")
        );
        assert!(!h.fs.exists(Path::new("t/a.neg")));
    }

    #[test]
    fn test_compile_missing_compiler() {
        let h = Harness::new();
        let err = compile(&h.ctx(), &case(), plain()).unwrap_err();
        assert_eq!(err.to_string(), "[tool error]");
    }
}
