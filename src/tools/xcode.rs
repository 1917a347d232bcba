//! Xcode command line tools.

use std::sync::Arc;
use tracing::debug;

use crate::command::{CommandRunner, ShellCommand};
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct Xcode {
    runner: Arc<dyn CommandRunner>,
}

impl Xcode {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// `xcode-select -p` succeeds once the tools are installed
    pub fn is_installed(&self) -> bool {
        debug!("Checking if xcode command line tools are installed");
        self.runner
            .run(&ShellCommand::new("xcode-select", ["-p"]).read_only())
            .map(|output| output.success)
            .unwrap_or(false)
    }

    pub fn ensure_installed(&self) -> Result<()> {
        if self.is_installed() {
            debug!("xcode command line tools are already installed");
            return Ok(());
        }

        debug!("Installing xcode command line tools");
        let command = ShellCommand::new("xcode-select", ["--install"]);
        self.runner
            .run(&command)?
            .ensure_success(&command.to_string())
    }
}
