//! External command execution
//!
//! Every generator and installer invocation goes through a [`CommandRunner`].
//! [`ShellRunner`] is the real one; tests substitute their own.
//!
//! # Process Handling
//!
//! - Command lines run through `sh -c` in the step's directory
//! - Each child leads its own process group and sits in the global
//!   [`ChildRegistry`](crate::process_guard::ChildRegistry) while it runs
//! - stdout/stderr are inherited so generator output streams to the user;
//!   stdin is null, which keeps generators on their non-interactive path

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::process_guard::{CommandProcessGroup, RegisteredChild};

/// How a command ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code (None if terminated by signal)
    pub exit_code: Option<i32>,
    pub success: bool,
}

impl CommandOutput {
    pub fn exited(code: i32) -> Self {
        Self {
            exit_code: Some(code),
            success: code == 0,
        }
    }

    /// Why the command counts as failed, or `None` if it succeeded
    pub fn failure_reason(&self) -> Option<String> {
        if self.success {
            return None;
        }
        Some(match self.exit_code {
            Some(code) => format!("command exited with code {}", code),
            None => "command was terminated by a signal".to_string(),
        })
    }
}

/// Something that can run a shell command line in a directory
pub trait CommandRunner {
    /// Run `command` to completion in `cwd`.
    ///
    /// A non-zero exit is `Ok` with `success == false`; `Err` means the
    /// command could not be started or waited on.
    fn run(&mut self, command: &str, cwd: &Path) -> Result<CommandOutput>;
}

/// Runs commands through `sh -c`
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ShellRunner {
    fn run(&mut self, command: &str, cwd: &Path) -> Result<CommandOutput> {
        info!(command, cwd = %cwd.display(), "Running command");

        let mut child = Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .in_new_process_group()
            .spawn()?;

        let registered = RegisteredChild::register(child.id());
        let status = child.wait()?;
        drop(registered);

        let output = CommandOutput {
            exit_code: status.code(),
            success: status.success(),
        };
        match output.failure_reason() {
            None => debug!(command, "Command succeeded"),
            Some(reason) => warn!(command, %reason, "Command failed"),
        }
        Ok(output)
    }
}
