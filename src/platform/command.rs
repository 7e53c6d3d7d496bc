//! Shell command capability.
//!
//! Collectors never spawn processes directly; they go through a
//! [`CommandRunner`] so tests can substitute canned outputs.

use std::io;
use std::process::{Command, Stdio};

/// Exit status and captured standard output of one command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Process exit code, or -1 when the process was killed by a signal
    pub exit_code: i32,
    pub output: String,
}

impl CommandOutput {
    pub fn new(exit_code: i32, output: impl Into<String>) -> Self {
        Self {
            exit_code,
            output: output.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

pub trait CommandRunner: Send + Sync {
    /// Run a shell command line and capture its standard output.
    ///
    /// Standard error is discarded unless the command redirects it.
    fn run(&self, command: &str) -> io::Result<CommandOutput>;

    /// Whether `program` can be found on the search path
    fn is_available(&self, program: &str) -> bool;

    /// Run a command and return its output, or an empty string on any failure
    fn output_or_empty(&self, command: &str) -> String {
        match self.run(command) {
            Ok(result) => result.output,
            Err(e) => {
                log::debug!("Command '{}' failed to start: {}", command, e);
                String::new()
            }
        }
    }
}

/// Runs commands through `sh -c`
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str) -> io::Result<CommandOutput> {
        log::debug!("Running: {}", command);
        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()?;

        Ok(CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            output: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }

    fn is_available(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}
