//! External process invocation
//!
//! Orchestration never touches `std::process` directly. It describes the
//! command it wants as an [`Invocation`] and hands it to a [`ProcessRunner`],
//! so tests can substitute a scripted runner for the real toolchain.

use crate::error::{CovError, CovResult};
use std::ffi::OsString;
use std::fmt;
use std::process::{Command, Stdio};

/// Where the child's standard input comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StdinMode {
    /// Share our standard input
    #[default]
    Inherit,
    /// No input (`/dev/null`)
    Null,
}

/// Where the child's standard output goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StdoutMode {
    /// Capture it and return it in [`InvocationOutput::stdout`]
    #[default]
    Capture,
    /// Forward it to our standard error, keeping our stdout clean
    Stderr,
}

/// A fully described command to run
///
/// Standard error of the child is always passed through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to execute
    pub program: String,
    /// Arguments, excluding the program
    pub args: Vec<OsString>,
    /// Standard input handling
    pub stdin: StdinMode,
    /// Standard output handling
    pub stdout: StdoutMode,
}

impl Invocation {
    /// Create an invocation with inherited stdin and captured stdout
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdin: StdinMode::default(),
            stdout: StdoutMode::default(),
        }
    }

    /// Append one argument
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set standard input handling
    #[must_use]
    pub const fn with_stdin(mut self, stdin: StdinMode) -> Self {
        self.stdin = stdin;
        self
    }

    /// Set standard output handling
    #[must_use]
    pub const fn with_stdout(mut self, stdout: StdoutMode) -> Self {
        self.stdout = stdout;
        self
    }

    /// Arguments as lossy UTF-8 strings
    #[must_use]
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in self.args_lossy() {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {arg:?}")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Outcome of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationOutput {
    /// Exit code, `None` when terminated by a signal
    pub status: Option<i32>,
    /// Captured stdout (empty unless [`StdoutMode::Capture`])
    pub stdout: Vec<u8>,
}

impl InvocationOutput {
    /// A successful exit with the given stdout
    #[must_use]
    pub fn success(stdout: impl Into<Vec<u8>>) -> Self {
        Self {
            status: Some(0),
            stdout: stdout.into(),
        }
    }

    /// A failed exit with the given code
    #[must_use]
    pub const fn failure(code: i32) -> Self {
        Self {
            status: Some(code),
            stdout: Vec::new(),
        }
    }

    /// Whether the process exited with status zero
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.status, Some(0))
    }

    /// Captured stdout as lossy UTF-8
    #[must_use]
    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }
}

/// Capability to run external processes
pub trait ProcessRunner: fmt::Debug {
    /// Run the invocation to completion
    ///
    /// # Errors
    ///
    /// Returns [`CovError::Spawn`] if the process cannot be started. A
    /// non-zero exit is not an error at this level.
    fn run(&self, invocation: &Invocation) -> CovResult<InvocationOutput>;
}

/// Runs invocations with `std::process::Command`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> CovResult<InvocationOutput> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args).stderr(Stdio::inherit());

        match invocation.stdin {
            StdinMode::Inherit => cmd.stdin(Stdio::inherit()),
            StdinMode::Null => cmd.stdin(Stdio::null()),
        };

        let spawn_err = |source| CovError::Spawn {
            program: invocation.program.clone(),
            source,
        };

        match invocation.stdout {
            StdoutMode::Capture => {
                let output = cmd.stdout(Stdio::piped()).output().map_err(spawn_err)?;
                Ok(InvocationOutput {
                    status: output.status.code(),
                    stdout: output.stdout,
                })
            }
            StdoutMode::Stderr => {
                let status = cmd
                    .stdout(std::io::stderr())
                    .status()
                    .map_err(spawn_err)?;
                Ok(InvocationOutput {
                    status: status.code(),
                    stdout: Vec::new(),
                })
            }
        }
    }
}
