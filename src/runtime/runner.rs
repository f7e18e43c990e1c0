//! Process execution behind a trait so dispatch can be tested without docker

use std::process::{Command, Stdio};

use log::debug;

use super::invocation::Invocation;
use crate::error::{DldError, Result};

/// Executes runtime invocations
pub trait Runner {
    /// Run with inherited stdio; a non-zero exit status is an error.
    fn run(&mut self, invocation: &Invocation) -> Result<()>;

    /// Run and capture stdout; a non-zero exit status is an error.
    fn capture(&mut self, invocation: &Invocation) -> Result<String>;
}

/// Runs invocations as real child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }

    fn command(invocation: &Invocation) -> Command {
        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args);
        command
    }
}

impl Runner for SystemRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<()> {
        debug!("spawning {:?}", invocation);
        let status = Self::command(invocation)
            .status()
            .map_err(|source| DldError::Spawn {
                program: invocation.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(DldError::CommandFailed {
                command: invocation.render(),
                status: status.to_string(),
            });
        }
        Ok(())
    }

    fn capture(&mut self, invocation: &Invocation) -> Result<String> {
        debug!("capturing {:?}", invocation);
        let output = Self::command(invocation)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| DldError::Spawn {
                program: invocation.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(DldError::CommandFailed {
                command: invocation.render(),
                status: output.status.to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
