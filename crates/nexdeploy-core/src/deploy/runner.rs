//! Process execution seam for the deploy tool.

use std::process::Command;

use super::command::DeployInvocation;
use crate::{Error, Result};

/// Runs one invocation to completion and reports its exit code.
///
/// Implementations block until the process exits; the orchestrator relies on
/// that to keep invocations strictly sequential.
pub trait ProcessRunner {
    fn run(&mut self, invocation: &DeployInvocation) -> Result<i32>;
}

/// Runs invocations with [`std::process::Command`], inheriting stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&mut self, invocation: &DeployInvocation) -> Result<i32> {
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .status()
            .map_err(|source| Error::Spawn {
                program: invocation.program_name(),
                source,
            })?;

        match status.code() {
            Some(code) => Ok(code),
            None => {
                tracing::warn!(
                    program = %invocation.program_name(),
                    "Process terminated without an exit code"
                );
                Ok(1)
            }
        }
    }
}
