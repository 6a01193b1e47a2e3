//! Test orchestration.
//!
//! Each fixture goes through
//! `parse -> format check -> compile -> normalize -> compare -> (ok | update | fail)`.
//! A failure in one fixture never stops the batch: it becomes that test's
//! outcome and the suite moves on. Generated files of a passing test are
//! removed; a failing test leaves everything on disk for inspection.

use std::path::{Path, PathBuf};

use irsnap_fixture::{load_fixture, HeaderOptions, TestCase};
use irsnap_fs::{Filesystem, FsError};
use irsnap_process::ProcessRunner;

use crate::comparator::{compare_symbols, diff_files, dump_symbols, Comparison};
use crate::context::Context;
use crate::driver::{check_format, compile, RunOutcome};
use crate::logger::Logger;
use crate::normalizer::{normalize, VersionSpec};
use crate::outcome::{Pass, RunReport, Stage, TestFailure, TestResult, UpdateKind};
use crate::updater::update_golden;

/// Per-run switches of the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Rewrite goldens instead of failing on a mismatch.
    pub update: bool,
    pub versions: Option<VersionSpec>,
    /// Leave generated files of passing tests on disk.
    pub keep_artifacts: bool,
}

/// Drive one test through the pipeline.
pub fn run_case<F, R, L>(
    ctx: &Context<'_, F, R, L>,
    case: &TestCase,
    options: &RunOptions,
) -> Result<Pass, TestFailure>
where
    F: Filesystem,
    R: ProcessRunner,
    L: Logger,
{
    let name = case.fixture.display();

    let fixture = load_fixture(ctx.fs, &case.fixture)?;
    case.materialize(ctx.fs, &fixture)?;
    let header = HeaderOptions::from_source(&fixture.source);

    ctx.logger.verbose(&format!("{}: format check", name));
    check_format(ctx, case, header)?;

    ctx.logger.verbose(&format!("{}: compile", name));
    let outcome = compile(ctx, case, header)?;
    let actual = match &outcome {
        RunOutcome::Accepted { artifact } => {
            ctx.logger.verbose(&format!("{}: normalize", name));
            normalize(ctx, case, options.versions.as_ref())?;
            artifact.clone()
        }
        RunOutcome::Rejected { .. } => case.negative.clone(),
    };
    let accepted = outcome.is_accepted();

    match diff_files(ctx, Stage::Diff, &case.expected, &actual)? {
        Comparison::Match if !accepted => return Ok(Pass::Ok),
        Comparison::Match => {}
        Comparison::Mismatch(_) if options.update => {
            update_golden(ctx, case, &fixture, accepted, None)?;
            return Ok(Pass::Updated(UpdateKind::Compile));
        }
        Comparison::Mismatch(diff) => {
            ctx.write_log(case, &diff);
            return Err(TestFailure::ArtifactMismatch);
        }
    }

    let expected_symbols = match &fixture.expected_symbols {
        Some(symbols) => symbols,
        None => return Ok(Pass::Ok),
    };

    ctx.logger.verbose(&format!("{}: symbols", name));
    let actual_symbols = dump_symbols(ctx, case)?;
    match compare_symbols(expected_symbols, &actual_symbols) {
        Comparison::Match => Ok(Pass::Ok),
        Comparison::Mismatch(_) if options.update => {
            update_golden(ctx, case, &fixture, true, Some(&actual_symbols))?;
            Ok(Pass::Updated(UpdateKind::Symbols))
        }
        Comparison::Mismatch(diff) => {
            ctx.write_log(case, &diff);
            Err(TestFailure::SymbolMismatch)
        }
    }
}

/// Run one test, then clean up after a pass or log a tool failure.
pub fn execute_case<F, R, L>(
    ctx: &Context<'_, F, R, L>,
    case: &TestCase,
    options: &RunOptions,
) -> Result<Pass, TestFailure>
where
    F: Filesystem,
    R: ProcessRunner,
    L: Logger,
{
    let outcome = run_case(ctx, case, options);

    match &outcome {
        Ok(_) if !options.keep_artifacts => {
            if let Err(e) = case.clean(ctx.fs) {
                ctx.logger.verbose(&format!(
                    "{}: cleanup failed: {}",
                    case.fixture.display(),
                    e
                ));
            }
        }
        Err(TestFailure::Tool { stage, detail }) => {
            ctx.logger
                .verbose(&format!("{}: {} tool failed", case.fixture.display(), stage));
            ctx.write_log(case, detail);
        }
        _ => {}
    }

    outcome
}

/// Materialize the source and expected sections without running anything.
pub fn dump_case<F, R, L>(ctx: &Context<'_, F, R, L>, case: &TestCase) -> Result<Pass, TestFailure>
where
    F: Filesystem,
    R: ProcessRunner,
    L: Logger,
{
    let fixture = load_fixture(ctx.fs, &case.fixture)?;
    case.materialize(ctx.fs, &fixture)?;
    Ok(Pass::Dumped)
}

/// Width of the fixture column of the status lines.
fn column_width(fixtures: &[PathBuf]) -> usize {
    fixtures
        .iter()
        .map(|f| f.display().to_string().chars().count())
        .max()
        .unwrap_or(0)
}

fn for_each_case<F, R, L, S>(
    ctx: &Context<'_, F, R, L>,
    root: &Path,
    fixtures: &[PathBuf],
    verb: &str,
    mut step: S,
) -> RunReport
where
    F: Filesystem,
    R: ProcessRunner,
    L: Logger,
    S: FnMut(&TestCase) -> Result<Pass, TestFailure>,
{
    let width = column_width(fixtures);
    let mut report = RunReport::default();

    for fixture in fixtures {
        let case = TestCase::new(&root.join(fixture), &ctx.config.extensions);
        let result = TestResult::new(fixture.clone(), step(&case));
        ctx.logger.info(&result.status_line(width));
        report.results.push(result);
    }

    ctx.logger.info(&report.summary(verb));
    report
}

/// Run (or update) every fixture in order and print a status line for each.
///
/// `fixtures` are relative to `root`; they are displayed as given.
pub fn run_suite<F, R, L>(
    ctx: &Context<'_, F, R, L>,
    root: &Path,
    fixtures: &[PathBuf],
    options: &RunOptions,
) -> RunReport
where
    F: Filesystem,
    R: ProcessRunner,
    L: Logger,
{
    for_each_case(ctx, root, fixtures, "passed", |case| {
        execute_case(ctx, case, options)
    })
}

/// Dump every fixture and print a status line for each.
pub fn dump_suite<F, R, L>(ctx: &Context<'_, F, R, L>, root: &Path, fixtures: &[PathBuf]) -> RunReport
where
    F: Filesystem,
    R: ProcessRunner,
    L: Logger,
{
    for_each_case(ctx, root, fixtures, "dumped", |case| dump_case(ctx, case))
}

/// Remove generated files of every fixture. Returns how many were removed.
pub fn clean_suite<F, R, L>(
    ctx: &Context<'_, F, R, L>,
    root: &Path,
    fixtures: &[PathBuf],
) -> Result<usize, FsError>
where
    F: Filesystem,
    R: ProcessRunner,
    L: Logger,
{
    let mut removed = 0;
    for fixture in fixtures {
        let case = TestCase::new(&root.join(fixture), &ctx.config.extensions);
        removed += case.clean(ctx.fs)?;
    }
    ctx.logger
        .verbose(&format!("removed {} generated files", removed));
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HarnessConfig;
    use crate::logger::MockLogger;
    use irsnap_fixture::SiblingExtensions;
    use irsnap_fs::MockFilesystem;
    use irsnap_process::{Invocation, MockRunner, ProcessOutput};

    const SOURCE: &str = "\nint main()\n{\n\treturn 0;\n}\n\n";
    const IR: &str = "define i32 @main() {\n  ret i32 0\n}\n";

    struct Harness {
        fs: MockFilesystem,
        runner: MockRunner,
        logger: MockLogger,
        config: HarnessConfig,
    }

    impl Harness {
        fn new() -> Self {
            let h = Self {
                fs: MockFilesystem::new(),
                runner: MockRunner::new(),
                logger: MockLogger::capture_all(),
                config: HarnessConfig::default(),
            };
            h.formatter_stable();
            h.diff_compares_files();
            h
        }

        fn ctx(&self) -> Context<'_, MockFilesystem, MockRunner, MockLogger> {
            Context::new(&self.fs, &self.runner, &self.logger, &self.config).unwrap()
        }

        /// Formatter echoes the source back.
        fn formatter_stable(&self) {
            let fs = self.fs.clone();
            self.runner.on("../syfmt", move |inv| {
                ProcessOutput::ok(fs.get_text(Path::new(&inv.args[0])).unwrap_or_default())
            });
        }

        /// `diff -uwB a b` over the mock filesystem, ignoring whitespace.
        fn diff_compares_files(&self) {
            let fs = self.fs.clone();
            self.runner.on("diff", move |inv| {
                let read = |p: &String| fs.get_text(Path::new(p));
                match (read(&inv.args[1]), read(&inv.args[2])) {
                    (Some(a), Some(b)) if squash(&a) == squash(&b) => ProcessOutput::ok(""),
                    (Some(a), Some(b)) => {
                        ProcessOutput::exited(1, format!("-{}+{}", a, b), "")
                    }
                    _ => ProcessOutput::exited(2, "", "diff: No such file or directory\n"),
                }
            });
        }

        /// Compiler accepts and writes `ir` (plus a module id line) next to the source.
        fn compiler_accepts(&self, ir: &'static str) {
            let fs = self.fs.clone();
            self.runner.on("../saphyr", move |inv| {
                let source = inv.args.last().cloned().unwrap_or_default();
                let base = source.trim_end_matches(".syp");
                fs.add_file(format!("{}.ll", base), format!("; ModuleID = '{}'\n{}", source, ir));
                ProcessOutput::ok("")
            });
        }

        fn compiler_rejects(&self, diagnostics: &'static str) {
            self.runner
                .respond("../saphyr", ProcessOutput::exited(1, "", diagnostics));
        }

        fn symbols(&self, listing: &'static str) {
            self.runner.respond("nm", ProcessOutput::ok(listing));
        }

        fn run(&self, fixture: &str, options: &RunOptions) -> Result<Pass, TestFailure> {
            let case = TestCase::new(Path::new(fixture), &SiblingExtensions::default());
            execute_case(&self.ctx(), &case, options)
        }
    }

    fn squash(text: &str) -> String {
        text.split_whitespace().collect()
    }

    fn fixture_text(artifact: &str, symbols: Option<&str>) -> String {
        irsnap_fixture::serialize(SOURCE, artifact, symbols)
    }

    fn update() -> RunOptions {
        RunOptions {
            update: true,
            ..RunOptions::default()
        }
    }

    // ===========================================
    // Structural Tests
    // ===========================================

    #[test]
    fn test_missing_section_spawns_nothing() {
        let h = Harness::new();
        h.fs.add_file("a.test", "int main() {}\n");

        let err = h.run("a.test", &RunOptions::default()).unwrap_err();

        assert_eq!(err.to_string(), "[missing section]");
        assert!(h.runner.calls().is_empty());
        assert_eq!(h.fs.paths(), vec![PathBuf::from("a.test")]);
    }

    #[test]
    fn test_extra_section() {
        let h = Harness::new();
        h.fs.add_file("a.test", "s\n========\na\n========\nb\n========\nc\n");

        let err = h.run("a.test", &RunOptions::default()).unwrap_err();

        assert_eq!(err.to_string(), "[extra section]");
        assert!(h.runner.calls().is_empty());
    }

    #[test]
    fn test_unreadable_fixture_is_io_error() {
        let h = Harness::new();
        let err = h.run("gone.test", &RunOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "[io error]");
    }

    // ===========================================
    // Accepted Program Tests
    // ===========================================

    #[test]
    fn test_accepted_match_is_ok_and_cleans_up() {
        let h = Harness::new();
        h.fs.add_file("a.test", fixture_text(IR, None));
        h.compiler_accepts(IR);

        assert_eq!(h.run("a.test", &RunOptions::default()).unwrap(), Pass::Ok);
        assert_eq!(h.fs.paths(), vec![PathBuf::from("a.test")]);
        assert!(!h.runner.was_called("nm"));
    }

    #[test]
    fn test_keep_artifacts_skips_cleanup() {
        let h = Harness::new();
        h.fs.add_file("a.test", fixture_text(IR, None));
        h.compiler_accepts(IR);
        let options = RunOptions {
            keep_artifacts: true,
            ..RunOptions::default()
        };

        assert_eq!(h.run("a.test", &options).unwrap(), Pass::Ok);
        assert_eq!(h.fs.get_text(Path::new("a.ll")).as_deref(), Some(IR));
        assert!(h.fs.exists(Path::new("a.syp")));
    }

    #[test]
    fn test_accepted_mismatch_fails_and_keeps_files() {
        let h = Harness::new();
        h.fs.add_file("a.test", fixture_text(IR, None));
        h.compiler_accepts("define i32 @main() {\n  ret i32 1\n}\n");

        let err = h.run("a.test", &RunOptions::default()).unwrap_err();

        assert_eq!(err.to_string(), "[fail compile]");
        assert!(h.fs.get_text(Path::new("a.err")).unwrap().contains("ret i32 1"));
        assert!(h.fs.exists(Path::new("a.ll")));
        assert!(h.fs.exists(Path::new("a.syp")));
        assert_eq!(
            h.fs.get_text(Path::new("a.test")),
            Some(fixture_text(IR, None))
        );
    }

    #[test]
    fn test_update_rewrites_golden_and_converges() {
        let h = Harness::new();
        let new_ir = "define i32 @main() {\n  ret i32 1\n}\n";
        h.fs.add_file("a.test", fixture_text(IR, None));
        h.compiler_accepts(new_ir);

        assert_eq!(
            h.run("a.test", &update()).unwrap(),
            Pass::Updated(UpdateKind::Compile)
        );
        assert_eq!(h.fs.get_text(Path::new("a.test")), Some(fixture_text(new_ir, None)));

        assert_eq!(h.run("a.test", &RunOptions::default()).unwrap(), Pass::Ok);
    }

    #[test]
    fn test_plain_run_is_idempotent() {
        let h = Harness::new();
        let text = fixture_text(IR, Some("main T\n"));
        h.fs.add_file("a.test", text.clone());
        h.compiler_accepts(IR);
        h.symbols("main T 0 10\n");

        for _ in 0..2 {
            assert_eq!(h.run("a.test", &RunOptions::default()).unwrap(), Pass::Ok);
        }
        assert_eq!(h.fs.get_text(Path::new("a.test")), Some(text));
    }

    #[test]
    fn test_no_artifact_file() {
        let h = Harness::new();
        h.fs.add_file("a.test", fixture_text(IR, None));
        h.runner.respond("../saphyr", ProcessOutput::ok(""));

        let err = h.run("a.test", &RunOptions::default()).unwrap_err();

        assert_eq!(err.to_string(), "[no .ll file]");
    }

    #[test]
    fn test_compile_crash_stops_pipeline() {
        let h = Harness::new();
        h.fs.add_file("a.test", fixture_text(IR, None));
        h.runner
            .respond("../saphyr", ProcessOutput::signaled(11, "Segmentation fault\n"));

        let err = h.run("a.test", &update()).unwrap_err();

        assert_eq!(err.to_string(), "[crash compile]");
        assert_eq!(h.runner.calls_to("diff").len(), 1);
        assert_eq!(h.fs.get_text(Path::new("a.test")), Some(fixture_text(IR, None)));
    }

    #[test]
    fn test_format_failure_stops_before_compile() {
        let h = Harness::new();
        h.fs.add_file("a.test", fixture_text(IR, None));
        h.runner.respond("../syfmt", ProcessOutput::ok("int main() { return 1; }\n"));

        let err = h.run("a.test", &RunOptions::default()).unwrap_err();

        assert_eq!(err.to_string(), "[fail format]");
        assert!(!h.runner.was_called("../saphyr"));
    }

    #[test]
    fn test_nofmt_header_skips_formatter() {
        let h = Harness::new();
        let text = irsnap_fixture::serialize("// nofmt\nint main(){return 0;}", IR, None);
        h.fs.add_file("a.test", text);
        h.compiler_accepts(IR);

        assert_eq!(h.run("a.test", &RunOptions::default()).unwrap(), Pass::Ok);
        assert!(!h.runner.was_called("../syfmt"));
    }

    #[test]
    fn test_tool_error_writes_log() {
        let h = Harness::new();
        h.fs.add_file("a.test", fixture_text(IR, None));
        h.compiler_accepts(IR);
        h.runner.respond("diff", ProcessOutput::exited(2, "", "diff: trouble\n"));

        let err = h.run("a.test", &RunOptions::default()).unwrap_err();

        assert_eq!(err.to_string(), "[tool error]");
        assert!(h.fs.get_text(Path::new("a.err")).unwrap().contains("diff: trouble"));
    }

    #[test]
    fn test_timeout_fails_test() {
        let h = Harness::new();
        h.fs.add_file("a.test", fixture_text(IR, None));
        h.runner.respond("../saphyr", ProcessOutput::deadline_expired());

        let err = h.run("a.test", &RunOptions::default()).unwrap_err();

        assert_eq!(err.to_string(), "[timeout compile]");
        assert!(h.fs.exists(Path::new("a.syp")));
    }

    // ===========================================
    // Rejected Program Tests
    // ===========================================

    #[test]
    fn test_rejected_match_is_ok() {
        let h = Harness::new();
        let diagnostics = "a.syp:3: error: type mismatch\n";
        h.fs.add_file("a.test", fixture_text(diagnostics, Some("main T\n")));
        h.compiler_rejects(diagnostics);

        assert_eq!(h.run("a.test", &RunOptions::default()).unwrap(), Pass::Ok);
        assert!(!h.runner.was_called("nm"));
        assert!(!h.fs.exists(Path::new("a.neg")));
    }

    #[test]
    fn test_rejected_update_drops_symbols() {
        let h = Harness::new();
        h.fs.add_file("a.test", fixture_text(IR, Some("main T\n")));
        h.compiler_rejects("error: bad\n");

        assert_eq!(
            h.run("a.test", &update()).unwrap(),
            Pass::Updated(UpdateKind::Compile)
        );
        assert_eq!(
            h.fs.get_text(Path::new("a.test")),
            Some(fixture_text("error: bad\n", None))
        );
    }

    #[test]
    fn test_rejected_mismatch_fails() {
        let h = Harness::new();
        h.fs.add_file("a.test", fixture_text("error: expected\n", None));
        h.compiler_rejects("error: actual\n");

        let err = h.run("a.test", &RunOptions::default()).unwrap_err();

        assert_eq!(err.to_string(), "[fail compile]");
        assert_eq!(
            h.fs.get_text(Path::new("a.neg")).as_deref(),
            Some("error: actual\n")
        );
    }

    // ===========================================
    // Symbol Tests
    // ===========================================

    #[test]
    fn test_symbols_match() {
        let h = Harness::new();
        h.fs.add_file("a.test", fixture_text(IR, Some("main T\n")));
        h.compiler_accepts(IR);
        h.symbols("main T 0000000000000000 000000000000000b\n.L.str r 0 4\n");

        assert_eq!(h.run("a.test", &RunOptions::default()).unwrap(), Pass::Ok);
        assert_eq!(h.runner.calls_to("nm")[0].args, vec!["-fp", "a.o"]);
    }

    #[test]
    fn test_symbols_mismatch_logs_diff() {
        let h = Harness::new();
        h.fs.add_file("a.test", fixture_text(IR, Some("main T\n")));
        h.compiler_accepts(IR);
        h.symbols("main T 0 1\nhelper t 1 1\n");

        let err = h.run("a.test", &RunOptions::default()).unwrap_err();

        assert_eq!(err.to_string(), "[diff symbols]");
        let log = h.fs.get_text(Path::new("a.err")).unwrap();
        assert!(log.starts_with("--- expected.sym\n+++ actual.sym\n"));
        assert!(log.contains("+helper t\n"));
    }

    #[test]
    fn test_symbols_update() {
        let h = Harness::new();
        h.fs.add_file("a.test", fixture_text(IR, Some("\n")));
        h.compiler_accepts(IR);
        h.symbols("main T 0 1\n");

        assert_eq!(
            h.run("a.test", &update()).unwrap(),
            Pass::Updated(UpdateKind::Symbols)
        );
        assert_eq!(
            h.fs.get_text(Path::new("a.test")),
            Some(fixture_text(IR, Some("main T\n")))
        );
        assert_eq!(h.run("a.test", &RunOptions::default()).unwrap(), Pass::Ok);
    }

    #[test]
    fn test_symbols_dump_failure() {
        let h = Harness::new();
        h.fs.add_file("a.test", fixture_text(IR, Some("main T\n")));
        h.compiler_accepts(IR);
        h.runner
            .respond("nm", ProcessOutput::exited(1, "", "nm: a.o: no such file\n"));

        let err = h.run("a.test", &RunOptions::default()).unwrap_err();

        assert_eq!(err.to_string(), "[no symbols]");
    }

    // ===========================================
    // Version Translation Tests
    // ===========================================

    #[test]
    fn test_version_translation_runs_both_sides() {
        let h = Harness::new();
        h.fs.add_file("a.test", fixture_text(IR, None));
        h.compiler_accepts(IR);
        h.runner.respond("llvm-as-3.6", ProcessOutput::ok(""));
        h.runner.respond("llvm-dis-3.7", ProcessOutput::ok(""));
        let options = RunOptions {
            versions: Some("+3.6-3.7".parse().unwrap()),
            ..RunOptions::default()
        };

        assert_eq!(h.run("a.test", &options).unwrap(), Pass::Ok);
        let translated: Vec<Invocation> = h.runner.calls_to("llvm-dis-3.7");
        assert_eq!(translated.len(), 2);
        assert_eq!(translated[0].args, vec!["-o", "a.exp", "a.bc"]);
        assert_eq!(translated[1].args, vec!["-o", "a.ll", "a.bc"]);
    }

    #[test]
    fn test_version_translation_failure_is_not_a_mismatch() {
        let h = Harness::new();
        h.fs.add_file("a.test", fixture_text(IR, None));
        h.compiler_accepts(IR);
        let options = RunOptions {
            update: true,
            versions: Some("+3.6-3.7".parse().unwrap()),
            ..RunOptions::default()
        };

        let err = h.run("a.test", &options).unwrap_err();

        assert_eq!(err.to_string(), "[tool error]");
        assert_eq!(h.fs.get_text(Path::new("a.test")), Some(fixture_text(IR, None)));
        assert!(h.fs.exists(Path::new("a.err")));
    }

    // ===========================================
    // Suite Tests
    // ===========================================

    #[test]
    fn test_run_suite_status_lines() {
        let h = Harness::new();
        h.fs.add_file("t/a.test", fixture_text(IR, None));
        h.fs.add_file("t/expr/broken.test", "no delimiter");
        h.compiler_accepts(IR);
        let fixtures = vec![PathBuf::from("a.test"), PathBuf::from("expr/broken.test")];

        let report = run_suite(&h.ctx(), Path::new("t"), &fixtures, &RunOptions::default());

        assert_eq!(report.passed(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(
            h.logger.output(),
            vec![
                "a.test           = [ok]".to_string(),
                "expr/broken.test = [missing section]".to_string(),
                "1 / 2 tests passed".to_string(),
            ]
        );
    }

    #[test]
    fn test_dump_suite() {
        let h = Harness::new();
        h.fs.add_file("a.test", fixture_text(IR, None));
        h.fs.add_file("b.test", "broken");
        let fixtures = vec![PathBuf::from("a.test"), PathBuf::from("b.test")];

        let report = dump_suite(&h.ctx(), Path::new(""), &fixtures);

        assert!(!report.succeeded());
        assert_eq!(h.fs.get_text(Path::new("a.exp")).as_deref(), Some(IR));
        assert_eq!(
            h.fs.get_text(Path::new("a.syp")).as_deref(),
            Some("\nint main()\n{\n\treturn 0;\n}\n\n")
        );
        assert!(h.runner.calls().is_empty());
        assert_eq!(
            h.logger.output(),
            vec![
                "a.test = [dump]".to_string(),
                "b.test = [missing section]".to_string(),
                "1 / 2 tests dumped".to_string(),
            ]
        );
    }

    #[test]
    fn test_clean_suite() {
        let h = Harness::new();
        h.fs.add_file("a.test", "");
        h.fs.add_file("a.syp", "");
        h.fs.add_file("a.err", "");
        h.fs.add_file("b.test", "");
        h.fs.add_file("b.ll", "");
        let fixtures = vec![PathBuf::from("a.test"), PathBuf::from("b.test")];

        let removed = clean_suite(&h.ctx(), Path::new(""), &fixtures).unwrap();

        assert_eq!(removed, 3);
        assert_eq!(
            h.fs.paths(),
            vec![PathBuf::from("a.test"), PathBuf::from("b.test")]
        );
    }
}
