//! Collaborators shared by every pipeline stage.

use irsnap_fixture::TestCase;
use irsnap_fs::Filesystem;
use irsnap_process::{Invocation, ProcessOutput, ProcessRunner};

use crate::config::{ConfigError, HarnessConfig};
use crate::logger::Logger;
use crate::normalizer::VolatileFilter;
use crate::outcome::{Stage, TestFailure};

/// Filesystem, process runner, logger and configuration for one run.
pub struct Context<'a, F, R, L> {
    pub fs: &'a F,
    pub runner: &'a R,
    pub logger: &'a L,
    pub config: &'a HarnessConfig,
    volatile: VolatileFilter,
}

impl<'a, F, R, L> Context<'a, F, R, L>
where
    F: Filesystem,
    R: ProcessRunner,
    L: Logger,
{
    /// Bundle the collaborators; fails if a volatile marker is not a valid regex.
    pub fn new(
        fs: &'a F,
        runner: &'a R,
        logger: &'a L,
        config: &'a HarnessConfig,
    ) -> Result<Self, ConfigError> {
        let volatile = VolatileFilter::new(config.volatile_patterns()?);
        Ok(Self {
            fs,
            runner,
            logger,
            config,
            volatile,
        })
    }

    pub fn volatile(&self) -> &VolatileFilter {
        &self.volatile
    }

    /// Run a tool. Launch failures become `[tool error]` and an expired
    /// deadline becomes `[timeout <stage>]`; every other exit is returned for
    /// the caller to classify.
    pub fn exec(&self, stage: Stage, invocation: &Invocation) -> Result<ProcessOutput, TestFailure> {
        self.logger.debug(&format!("$ {}", invocation));

        let output = self
            .runner
            .run(invocation)
            .map_err(|e| TestFailure::Tool {
                stage,
                detail: e.to_string(),
            })?;

        if output.timed_out() {
            return Err(TestFailure::Timeout(stage));
        }
        self.logger
            .debug(&format!("  {} -> {}", invocation.program, output.exit));
        Ok(output)
    }

    /// Run a tool that must exit 0.
    pub fn exec_checked(
        &self,
        stage: Stage,
        invocation: &Invocation,
    ) -> Result<ProcessOutput, TestFailure> {
        let output = self.exec(stage, invocation)?;
        if output.success() {
            Ok(output)
        } else {
            Err(TestFailure::Tool {
                stage,
                detail: format!("{} ({})\n{}", invocation, output.exit, output.combined()),
            })
        }
    }

    /// Write the error log of a failed test. A log that cannot be written
    /// does not change the outcome.
    pub fn write_log(&self, case: &TestCase, text: &str) {
        if let Err(e) = self.fs.write_atomic(&case.error_log, text.as_bytes()) {
            self.logger.verbose(&format!(
                "could not write {}: {}",
                case.error_log.display(),
                e
            ));
        }
    }
}
