//! Dump command orchestration.

use irsnap_fs::Filesystem;
use irsnap_process::ProcessRunner;

use crate::cli::Cli;
use crate::clock::Clock;
use crate::context::Context;
use crate::logger::Logger;
use crate::orchestrator::dump_suite;
use crate::outcome::RunReport;

use super::{select, write_json_report, CommandResult};

/// Execute the dump command: write source and expected sections only.
pub fn execute_dump<F, R, L, C>(
    cli: &Cli,
    ctx: &Context<'_, F, R, L>,
    clock: &C,
) -> CommandResult<RunReport>
where
    F: Filesystem,
    R: ProcessRunner,
    L: Logger,
    C: Clock,
{
    let selection = cli.selection()?;
    let fixtures = select(ctx, &cli.root, &selection.filters)?;

    let report = dump_suite(ctx, &cli.root, &fixtures);

    write_json_report(ctx.fs, clock, cli, &report)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::parse_from;
    use crate::clock::MockClock;
    use crate::config::HarnessConfig;
    use crate::logger::MockLogger;
    use irsnap_fs::MockFilesystem;
    use irsnap_process::MockRunner;
    use std::path::Path;

    #[test]
    fn test_dump_materializes_sections() {
        let fs = MockFilesystem::new();
        fs.add_file("t/a.test", "\nint main() {}\n\n========\n\nir\n");
        fs.add_file("t/b.test", "\nint f() {}\n\n========\n\nir\n");
        let runner = MockRunner::new();
        let logger = MockLogger::capture_all();
        let config = HarnessConfig::default();
        let ctx = Context::new(&fs, &runner, &logger, &config).unwrap();
        let cli = parse_from(["irsnap", "-d", "--root", "t", "a"]).unwrap();

        let report = execute_dump(&cli, &ctx, &MockClock::new(0)).unwrap();

        assert_eq!(report.total(), 1);
        assert_eq!(fs.get_text(Path::new("t/a.exp")).as_deref(), Some("ir\n"));
        assert!(!fs.exists(Path::new("t/b.exp")));
        assert!(runner.calls().is_empty());
        assert_eq!(logger.output().last().map(String::as_str), Some("1 / 1 tests dumped"));
    }
}
