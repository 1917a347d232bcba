//! External command execution.
//!
//! Actions never call `std::process::Command` directly. They describe what
//! they want to run as a [`ShellCommand`] and hand it to a [`CommandRunner`],
//! which lets the CLI swap in a dry-run runner and lets tests script results.

use std::fmt;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::{debug, info};

use crate::error::{GumError, Result};
use crate::process_guard::{ChildRegistry, CommandProcessGroup};

/// One invocation of an external program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
    pub current_dir: Option<PathBuf>,
    /// Read-only check; safe to execute even in dry-run mode
    pub read_only: bool,
}

impl ShellCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            env: Vec::new(),
            current_dir: None,
            read_only: false,
        }
    }

    /// `bash -c <script>`
    pub fn bash(script: impl Into<String>) -> Self {
        Self::new("bash", ["-c".to_string(), script.into()])
    }

    /// Mark this command as a read-only check
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Output from a command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code (None if terminated by signal).
    pub exit_code: Option<i32>,
    /// Whether the command exited successfully (exit code 0).
    pub success: bool,
    /// Whether the command was skipped because of dry-run mode.
    pub dry_run: bool,
}

impl CommandOutput {
    /// Successful output with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: Some(0),
            success: true,
            dry_run: false,
        }
    }

    /// Failed output with the given exit code and stderr
    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            exit_code: Some(exit_code),
            success: false,
            dry_run: false,
        }
    }

    /// Return a [`GumError::Command`] if the command did not succeed.
    pub fn ensure_success(&self, context: &str) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            let code = self.exit_code.unwrap_or(-1);
            Err(GumError::command(format!(
                "{} failed (exit code {}): stdout: {} stderr: {}",
                context,
                code,
                self.stdout.trim(),
                self.stderr.trim()
            )))
        }
    }
}

/// Executes [`ShellCommand`]s.
///
/// Spawn failures are errors; a command that runs and exits non-zero is an
/// `Ok` output with `success == false`, so checks can treat it as "no".
pub trait CommandRunner: fmt::Debug + Send + Sync {
    fn run(&self, command: &ShellCommand) -> Result<CommandOutput>;
}

/// Runs commands on the host, each in its own tracked process group.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &ShellCommand) -> Result<CommandOutput> {
        debug!(env = ?command.env, "running command: {}", command);

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .in_new_process_group();
        for (key, value) in &command.env {
            cmd.env(key, value);
        }
        if let Some(dir) = &command.current_dir {
            cmd.current_dir(dir);
        }

        let child = cmd.spawn().map_err(|e| {
            GumError::command(format!("failed to spawn `{}`: {}", command.program, e))
        })?;
        let pid = child.id();
        if let Ok(mut registry) = ChildRegistry::global().lock() {
            registry.register(pid);
        }

        let output = child.wait_with_output();

        if let Ok(mut registry) = ChildRegistry::global().lock() {
            registry.unregister(pid);
        }
        let output = output?;

        let result = CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code(),
            success: output.status.success(),
            dry_run: false,
        };
        if !result.success {
            debug!(
                stdout = %result.stdout,
                stderr = %result.stderr,
                "command exited with {:?}",
                result.exit_code
            );
        }
        Ok(result)
    }
}

/// Executes read-only checks for real and skips everything else.
///
/// Keeping checks live means should-run decisions in a dry run match what a
/// real run would decide.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunRunner {
    inner: SystemRunner,
}

impl CommandRunner for DryRunRunner {
    fn run(&self, command: &ShellCommand) -> Result<CommandOutput> {
        if command.read_only {
            return self.inner.run(command);
        }
        info!("[DRY RUN] would run: {}", command);
        Ok(CommandOutput {
            stdout: format!("[DRY RUN] Skipped: {}\n", command),
            dry_run: true,
            ..CommandOutput::ok("")
        })
    }
}
