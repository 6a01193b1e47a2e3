//! Exit codes for the irsnap CLI.
//!
//! 0 and 1 keep their meaning for callers that only check pass/fail; the
//! higher codes separate harness problems from test failures.

use crate::commands::CommandError;

/// Exit code constants.
pub mod codes {
    /// Every selected test passed.
    pub const SUCCESS: i32 = 0;
    /// At least one test failed, or no tests were found.
    pub const TESTS_FAILED: i32 = 1;
    /// Invalid arguments or conflicting fixtures.
    pub const INVALID_ARGS: i32 = 2;
    /// Configuration could not be loaded or is invalid.
    pub const CONFIG_ERROR: i32 = 3;
    /// IO error.
    pub const IO_ERROR: i32 = 4;
}

/// Map a CommandError to an exit code.
pub fn exit_code(error: &CommandError) -> i32 {
    match error {
        CommandError::InvalidArgument(_) => codes::INVALID_ARGS,
        CommandError::Collision(_) => codes::INVALID_ARGS,
        CommandError::Config(_) => codes::CONFIG_ERROR,
        CommandError::Filesystem(_) => codes::IO_ERROR,
        CommandError::Report(_) => codes::IO_ERROR,
        CommandError::NoTests => codes::TESTS_FAILED,
    }
}

/// Exit code of a finished run.
pub fn run_code(all_passed: bool) -> i32 {
    if all_passed {
        codes::SUCCESS
    } else {
        codes::TESTS_FAILED
    }
}
