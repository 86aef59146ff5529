//! The external calculator seam.
//!
//! The runner only ever talks to a [`Calculator`]. The production
//! implementation spawns a process per trip; tests substitute closures.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use super::record::Trip;
use crate::config::CalculatorConfig;
use crate::error::{RunnerError, RunnerResult};

/// What one calculator run left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Captured standard output, possibly empty
    pub stdout: String,
    /// Set when the process could not be started or exited non-zero
    pub failure: Option<String>,
}

impl Invocation {
    pub fn completed(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            failure: None,
        }
    }

    pub fn failed(stdout: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            failure: Some(reason.into()),
        }
    }
}

/// Something that turns a trip into a line of output.
pub trait Calculator {
    fn invoke(&mut self, trip: &Trip) -> Invocation;
}

impl<F> Calculator for F
where
    F: FnMut(&Trip) -> Invocation,
{
    fn invoke(&mut self, trip: &Trip) -> Invocation {
        self(trip)
    }
}

/// Runs an external program once per trip, blocking until it exits.
///
/// The trip values are appended after the configured leading arguments, so
/// `["python3", "calculate_reimbursement.py"]` becomes
/// `python3 calculate_reimbursement.py 3 100 45.50`.
#[derive(Debug, Clone)]
pub struct ProcessCalculator {
    program: String,
    leading_args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl ProcessCalculator {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
            working_dir: None,
        }
    }

    pub fn from_config(config: &CalculatorConfig) -> RunnerResult<Self> {
        let (program, rest) = config
            .command
            .split_first()
            .ok_or(RunnerError::EmptyCommand)?;

        if program.trim().is_empty() {
            return Err(RunnerError::EmptyCommand);
        }

        Ok(Self {
            program: program.clone(),
            leading_args: rest.to_vec(),
            working_dir: config.working_dir.clone(),
        })
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.leading_args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Calculator for ProcessCalculator {
    fn invoke(&mut self, trip: &Trip) -> Invocation {
        let mut command = Command::new(&self.program);
        command
            .args(&self.leading_args)
            .args(trip.args())
            .stdin(Stdio::null());
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        tracing::debug!(
            target: "calculator",
            "{} {} {}",
            self.program,
            self.leading_args.join(" "),
            trip.args().join(" ")
        );

        let output = match command.output() {
            Ok(output) => output,
            Err(e) => {
                return Invocation::failed("", format!("cannot start '{}': {e}", self.program));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

        if output.status.success() {
            Invocation::completed(stdout)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Invocation::failed(stdout, format!("{}: {}", output.status, stderr.trim()))
        }
    }
}
