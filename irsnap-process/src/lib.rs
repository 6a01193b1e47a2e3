//! External process abstraction for irsnap.
//!
//! Every tool the harness drives (compiler, formatter, diff, assembler,
//! disassembler, symbol dump) goes through the `ProcessRunner` trait, with a
//! real implementation that blocks until the child exits and a scripted mock
//! that lets the pipeline be tested without any binaries installed.

use std::collections::HashMap;
use std::fmt;
use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::{Arc, RwLock};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

/// How often a child is polled while a deadline is armed.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How long output readers may linger after a child was killed.
const DRAIN_GRACE: Duration = Duration::from_millis(200);

/// Errors from launching or waiting on an external process.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to wait for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// A single external command: program plus arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// Create an invocation with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// How a child process terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitKind {
    /// Normal exit with a status code.
    Exited(i32),
    /// Terminated by a signal (number when the platform reports one).
    Signaled(Option<i32>),
    /// Killed by the runner after the configured deadline.
    TimedOut,
}

impl ExitKind {
    /// Classify a std exit status.
    pub fn from_status(status: ExitStatus) -> Self {
        match status.code() {
            Some(code) => ExitKind::Exited(code),
            None => ExitKind::Signaled(signal_of(status)),
        }
    }
}

impl fmt::Display for ExitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitKind::Exited(code) => write!(f, "exit status {}", code),
            ExitKind::Signaled(Some(signal)) => write!(f, "signal {}", signal),
            ExitKind::Signaled(None) => write!(f, "signal"),
            ExitKind::TimedOut => write!(f, "timed out"),
        }
    }
}

#[cfg(unix)]
fn signal_of(status: ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn signal_of(_status: ExitStatus) -> Option<i32> {
    None
}

/// Captured result of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub exit: ExitKind,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    /// Output of a process that exited normally.
    pub fn exited(code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit: ExitKind::Exited(code),
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Output of a process that exited with status 0.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self::exited(0, stdout, "")
    }

    /// Output of a process killed by a signal.
    pub fn signaled(signal: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit: ExitKind::Signaled(Some(signal)),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Output of a process killed at its deadline.
    pub fn deadline_expired() -> Self {
        Self {
            exit: ExitKind::TimedOut,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    /// Exit status 0.
    pub fn success(&self) -> bool {
        self.exit == ExitKind::Exited(0)
    }

    /// Signal termination or a negative status code.
    pub fn crashed(&self) -> bool {
        match self.exit {
            ExitKind::Signaled(_) => true,
            ExitKind::Exited(code) => code < 0,
            ExitKind::TimedOut => false,
        }
    }

    /// Positive status code: the tool ran and said no.
    pub fn declined(&self) -> bool {
        matches!(self.exit, ExitKind::Exited(code) if code > 0)
    }

    /// Killed by the runner at its deadline.
    pub fn timed_out(&self) -> bool {
        self.exit == ExitKind::TimedOut
    }

    /// Status code when the process exited normally.
    pub fn code(&self) -> Option<i32> {
        match self.exit {
            ExitKind::Exited(code) => Some(code),
            _ => None,
        }
    }

    /// Stderr followed by stdout, the order diagnostics are logged in.
    pub fn combined(&self) -> String {
        let mut text = String::with_capacity(self.stderr.len() + self.stdout.len());
        text.push_str(&self.stderr);
        text.push_str(&self.stdout);
        text
    }
}

/// Trait for running an external command to completion.
pub trait ProcessRunner: Send + Sync {
    /// Run the command, wait for it, and capture both output streams.
    fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ProcessError>;
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for &R {
    fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ProcessError> {
        (**self).run(invocation)
    }
}

/// Runner backed by `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealRunner {
    timeout: Option<Duration>,
}

impl RealRunner {
    /// Create a runner that waits indefinitely.
    pub fn new() -> Self {
        Self { timeout: None }
    }

    /// Kill children that run longer than `timeout`.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl ProcessRunner for RealRunner {
    fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ProcessError> {
        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if self.timeout.is_some() {
            own_process_group(&mut command);
        }

        let mut child = command
            .spawn()
            .map_err(|source| ProcessError::Spawn {
                program: invocation.program.clone(),
                source,
            })?;

        // Both pipes are drained concurrently so a chatty child never blocks
        // on a full pipe while we wait on it.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match self.timeout {
            None => child.wait().map(Some),
            Some(limit) => wait_with_deadline(&mut child, limit),
        }
        .map_err(|source| ProcessError::Wait {
            program: invocation.program.clone(),
            source,
        })?;

        let (exit, stdout, stderr) = match status {
            Some(status) => (ExitKind::from_status(status), collect(stdout), collect(stderr)),
            // A grandchild that escaped the kill may still hold the pipes open.
            None => (
                ExitKind::TimedOut,
                collect_within(stdout, DRAIN_GRACE),
                collect_within(stderr, DRAIN_GRACE),
            ),
        };

        Ok(ProcessOutput {
            exit,
            stdout,
            stderr,
        })
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

fn collect(handle: thread::JoinHandle<Vec<u8>>) -> String {
    let buf = handle.join().unwrap_or_default();
    String::from_utf8_lossy(&buf).into_owned()
}

/// Like `collect`, but gives up (returning nothing) when the reader has not
/// finished within `grace`. The reader thread is detached in that case.
fn collect_within(handle: thread::JoinHandle<Vec<u8>>, grace: Duration) -> String {
    let deadline = Instant::now() + grace;
    while !handle.is_finished() {
        if Instant::now() >= deadline {
            return String::new();
        }
        thread::sleep(POLL_INTERVAL);
    }
    collect(handle)
}

/// Start the child as leader of a new process group so a timeout can take
/// down everything it launched.
#[cfg(unix)]
fn own_process_group(command: &mut Command) {
    use std::os::unix::process::CommandExt;
    command.process_group(0);
}

#[cfg(not(unix))]
fn own_process_group(_command: &mut Command) {}

/// Kill the child's whole process group, then the child itself.
fn kill_tree(child: &mut Child) {
    #[cfg(unix)]
    {
        let group = format!("-{}", child.id());
        let _ = Command::new("kill")
            .args(["-KILL", "--", &group])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
    }
    // The child may exit between try_wait and kill.
    let _ = child.kill();
}

/// Returns `None` when the child had to be killed.
fn wait_with_deadline(child: &mut Child, limit: Duration) -> io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + limit;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            kill_tree(child);
            child.wait()?;
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

type Handler = Box<dyn Fn(&Invocation) -> ProcessOutput + Send + Sync>;

/// Scripted runner for tests.
///
/// Handlers are registered per program name. A handler may perform side
/// effects (for example writing the compiler's output file into a mock
/// filesystem) before returning the scripted output. Every invocation is
/// recorded, including ones with no handler, which fail to spawn.
/// Cloning creates a new handle to the same script and call log.
#[derive(Clone, Default)]
pub struct MockRunner {
    handlers: Arc<RwLock<HashMap<String, Handler>>>,
    calls: Arc<RwLock<Vec<Invocation>>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for `program`, replacing any previous one.
    pub fn on<F>(&self, program: &str, handler: F)
    where
        F: Fn(&Invocation) -> ProcessOutput + Send + Sync + 'static,
    {
        self.handlers
            .write()
            .unwrap()
            .insert(program.to_string(), Box::new(handler));
    }

    /// Always answer `program` with the same output.
    pub fn respond(&self, program: &str, output: ProcessOutput) {
        self.on(program, move |_| output.clone());
    }

    /// All recorded invocations, in call order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.read().unwrap().clone()
    }

    /// Recorded invocations of one program.
    pub fn calls_to(&self, program: &str) -> Vec<Invocation> {
        self.calls()
            .into_iter()
            .filter(|c| c.program == program)
            .collect()
    }

    /// Whether `program` was invoked at all.
    pub fn was_called(&self, program: &str) -> bool {
        self.calls.read().unwrap().iter().any(|c| c.program == program)
    }
}

impl fmt::Debug for MockRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut programs: Vec<String> = self.handlers.read().unwrap().keys().cloned().collect();
        programs.sort();
        f.debug_struct("MockRunner")
            .field("programs", &programs)
            .field("calls", &self.calls.read().unwrap().len())
            .finish()
    }
}

impl ProcessRunner for MockRunner {
    fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ProcessError> {
        self.calls.write().unwrap().push(invocation.clone());

        let handlers = self.handlers.read().unwrap();
        match handlers.get(&invocation.program) {
            Some(handler) => Ok(handler(invocation)),
            None => Err(ProcessError::Spawn {
                program: invocation.program.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "no scripted handler"),
            }),
        }
    }
}
