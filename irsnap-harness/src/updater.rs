//! Golden updates.

use irsnap_fixture::{serialize, Fixture, TestCase};
use irsnap_fs::Filesystem;
use irsnap_process::ProcessRunner;

use crate::context::Context;
use crate::logger::Logger;
use crate::outcome::TestFailure;

/// Rewrite the fixture from the actual output of this run.
///
/// Accepted runs take the normalized IR and keep a symbols section: the
/// freshly dumped listing if there is one, else the fixture's previous
/// section. Rejected runs take the negative output and never carry symbols.
/// The fixture is replaced atomically.
pub fn update_golden<F, R, L>(
    ctx: &Context<'_, F, R, L>,
    case: &TestCase,
    fixture: &Fixture,
    accepted: bool,
    actual_symbols: Option<&str>,
) -> Result<(), TestFailure>
where
    F: Filesystem,
    R: ProcessRunner,
    L: Logger,
{
    let (artifact, symbols) = if accepted {
        let artifact = ctx.fs.read_file(&case.artifact)?;
        (artifact, actual_symbols.or(fixture.expected_symbols.as_deref()))
    } else {
        (ctx.fs.read_file(&case.negative)?, None)
    };

    let text = serialize(&fixture.source, &artifact, symbols);
    ctx.fs.write_atomic(&case.fixture, text.as_bytes())?;
    ctx.logger
        .verbose(&format!("rewrote {}", case.fixture.display()));
    Ok(())
}
