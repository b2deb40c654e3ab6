//! Detached process launching.

use std::process::Command;

use anyhow::{Context, Result, anyhow};

use crate::infra::editors::LaunchCommand;

/// Starts editor processes.
pub trait Launcher {
    fn launch(&self, command: &LaunchCommand) -> Result<()>;
}

/// Spawns the command as a child process without waiting for it.
///
/// The child inherits stdio so terminal editors keep working. The editor's environment entries
/// apply to the child only.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    fn launch(&self, command: &LaunchCommand) -> Result<()> {
        let (program, args) = command
            .argv
            .split_first()
            .ok_or_else(|| anyhow!("editor command is empty"))?;

        let child = Command::new(program)
            .args(args)
            .envs(&command.env)
            .spawn()
            .with_context(|| format!("failed to spawn editor: {program}"))?;
        tracing::debug!(pid = child.id(), program = %program, "editor launched");
        Ok(())
    }
}
