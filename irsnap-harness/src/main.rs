//! irsnap CLI binary.
//!
//! Entry point for the `irsnap` command-line tool.

use std::process::ExitCode;

use clap::Parser;
use irsnap_fs::RealFilesystem;
use irsnap_harness::exit::{exit_code, run_code};
use irsnap_harness::{build_config, execute, Cli, CommandError, ConsoleLogger, Context, SystemClock, Verbosity};
use irsnap_process::RealRunner;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            report(&e);
            ExitCode::from(exit_code(&e) as u8)
        }
    }
}

/// An empty selection is an ordinary run result and goes to stdout with the
/// status lines; everything else is a harness error.
fn report(error: &CommandError) {
    match error {
        CommandError::NoTests => println!("{}", error),
        _ => eprintln!("error: {}", error),
    }
}

fn run(cli: &Cli) -> Result<i32, CommandError> {
    let fs = RealFilesystem;
    let logger = ConsoleLogger::new(Verbosity::from_count(cli.verbose));

    let config = build_config(cli, &fs)?;
    let runner = RealRunner::with_timeout(config.timeout());
    let ctx = Context::new(&fs, &runner, &logger, &config)?;

    let all_passed = execute(cli, &ctx, &SystemClock)?;
    Ok(run_code(all_passed))
}
