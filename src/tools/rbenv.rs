//! rbenv client: installs the Ruby version pinned by the project.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use crate::command::{CommandRunner, ShellCommand};
use crate::error::{GumError, Result};
use crate::tools::homebrew::{Homebrew, Package};

#[derive(Debug, Clone)]
pub struct Rbenv {
    runner: Arc<dyn CommandRunner>,
    brew: Homebrew,
    project_dir: PathBuf,
}

impl Rbenv {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        brew: Homebrew,
        project_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runner,
            brew,
            project_dir: project_dir.into(),
        }
    }

    /// The project's Ruby is installed when `rbenv version` resolves it.
    pub fn is_ruby_installed(&self) -> bool {
        debug!("Checking ruby version");
        let command = ShellCommand::new("rbenv", ["version"])
            .current_dir(&self.project_dir)
            .read_only();

        match self.runner.run(&command) {
            Ok(output) if output.success => !output.stdout.contains("not installed"),
            Ok(output) => {
                debug!("Failed to check ruby version: {}", output.stderr.trim());
                false
            }
            Err(e) => {
                debug!("Failed to check ruby version: {}", e);
                false
            }
        }
    }

    pub fn ensure_ruby_installed(&self) -> Result<()> {
        if self.is_ruby_installed() {
            info!("Ruby version is already installed");
            return Ok(());
        }

        info!("Updating ruby-build");
        self.brew
            .upgrade(&Package::new("ruby-build"))
            .map_err(|e| GumError::command(format!("Failed to update ruby-build: {}", e)))?;

        info!("Installing ruby version");
        let command = ShellCommand::new("rbenv", ["install", "--skip-existing"])
            .current_dir(&self.project_dir);
        self.runner
            .run(&command)?
            .ensure_success("Ruby installation")
    }
}
