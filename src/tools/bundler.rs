//! Bundler client: pins the Bundler gem and installs project gems.
//!
//! The Bundler version comes from `.bundler-version` when present, otherwise
//! from the `BUNDLED WITH` section of `Gemfile.lock`. With neither, the
//! Bundler that ships with Ruby is used as-is.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::command::{CommandRunner, ShellCommand};
use crate::error::{GumError, Result};

#[derive(Debug, Clone)]
pub struct Bundler {
    runner: Arc<dyn CommandRunner>,
    project_dir: PathBuf,
}

impl Bundler {
    pub fn new(runner: Arc<dyn CommandRunner>, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            project_dir: project_dir.into(),
        }
    }

    pub fn install_gems(&self) -> Result<()> {
        debug!("Installing gems with Bundler");
        let gemfile = self.project_dir.join("Gemfile");
        if !gemfile.exists() {
            return Err(GumError::command(format!(
                "Gemfile not found in {}",
                self.project_dir.display()
            )));
        }

        info!("Running bundle install");
        let command = ShellCommand::new("bundle", ["install"]).current_dir(&self.project_dir);
        self.runner
            .run(&command)?
            .ensure_success("Failed to install gems")
    }

    pub fn ensure_bundler_installed(&self) -> Result<()> {
        if self.is_bundler_installed() {
            info!("Bundler is already installed");
            return Ok(());
        }
        self.install_bundler()
    }

    pub fn is_bundler_installed(&self) -> bool {
        let Some(version) = self.bundler_version() else {
            debug!("No bundler version pinned, using the default bundler");
            return true;
        };

        let command = ShellCommand::new(
            "gem",
            ["list", "--installed", "--exact", "bundler", "--version", version.as_str()],
        )
        .current_dir(&self.project_dir)
        .read_only();

        match self.runner.run(&command) {
            Ok(output) if output.success => output.stdout.trim().eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    pub fn install_bundler(&self) -> Result<()> {
        let Some(version) = self.bundler_version() else {
            debug!("No bundler version pinned, using the default bundler");
            return Ok(());
        };

        info!("Installing Bundler version {}", version);
        let args = ["install".to_string(), format!("bundler:{}", version)];
        let command = ShellCommand::new("gem", args).current_dir(&self.project_dir);
        self.runner
            .run(&command)?
            .ensure_success("Failed to install bundler gem")
    }

    /// Pinned Bundler version, if any
    pub fn bundler_version(&self) -> Option<String> {
        version_from_file(&self.project_dir.join(".bundler-version"))
            .or_else(|| version_from_lockfile(&self.project_dir.join("Gemfile.lock")))
    }
}

fn version_from_file(path: &Path) -> Option<String> {
    debug!("Checking for Bundler version in {}", path.display());
    let content = fs::read_to_string(path).ok()?;
    let version = content.trim();
    if is_release_version(version) {
        Some(version.to_string())
    } else {
        debug!("Ignoring invalid Bundler version {:?} in {}", version, path.display());
        None
    }
}

fn version_from_lockfile(path: &Path) -> Option<String> {
    debug!("Checking for Bundler version in {}", path.display());
    let content = fs::read_to_string(path).ok()?;
    let mut lines = content.lines();
    lines.find(|line| line.trim() == "BUNDLED WITH")?;
    let version = lines.next()?.trim();
    is_release_version(version).then(|| version.to_string())
}

/// `X.Y.Z` with numeric components
fn is_release_version(version: &str) -> bool {
    let parts: Vec<&str> = version.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandOutput;
    use crate::command::testing::ScriptedRunner;

    const LOCKFILE: &str = "GEM\n  remote: https://rubygems.org/\n  specs:\n    rake (13.1.0)\n\nBUNDLED WITH\n   2.5.6\n";

    #[test]
    fn test_is_release_version() {
        assert!(is_release_version("2.5.6"));
        assert!(!is_release_version("2.5"));
        assert!(!is_release_version("2.5.x"));
        assert!(!is_release_version(""));
    }

    #[test]
    fn test_version_file_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".bundler-version"), "2.4.22\n").unwrap();
        fs::write(dir.path().join("Gemfile.lock"), LOCKFILE).unwrap();

        let bundler = Bundler::new(ScriptedRunner::new(), dir.path());
        assert_eq!(bundler.bundler_version().as_deref(), Some("2.4.22"));
    }

    #[test]
    fn test_version_from_lockfile() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Gemfile.lock"), LOCKFILE).unwrap();

        let bundler = Bundler::new(ScriptedRunner::new(), dir.path());
        assert_eq!(bundler.bundler_version().as_deref(), Some("2.5.6"));
    }

    #[test]
    fn test_no_pin_means_installed() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ScriptedRunner::new();
        let bundler = Bundler::new(runner.clone(), dir.path());

        assert!(bundler.is_bundler_installed());
        bundler.ensure_bundler_installed().unwrap();
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_installs_pinned_version_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".bundler-version"), "2.5.6").unwrap();
        let runner = ScriptedRunner::new();
        runner.respond(
            "gem list --installed --exact bundler --version 2.5.6",
            CommandOutput::ok("false\n"),
        );

        Bundler::new(runner.clone(), dir.path())
            .ensure_bundler_installed()
            .unwrap();
        assert!(runner.was_called("gem install bundler:2.5.6"));
    }

    #[test]
    fn test_pinned_version_already_installed() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".bundler-version"), "2.5.6").unwrap();
        let runner = ScriptedRunner::new();
        runner.respond(
            "gem list --installed --exact bundler --version 2.5.6",
            CommandOutput::ok("true\n"),
        );

        Bundler::new(runner.clone(), dir.path())
            .ensure_bundler_installed()
            .unwrap();
        assert!(!runner.was_called("gem install bundler:2.5.6"));
    }

    #[test]
    fn test_install_gems_requires_gemfile() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ScriptedRunner::new();
        let bundler = Bundler::new(runner.clone(), dir.path());

        assert!(bundler.install_gems().is_err());
        assert!(runner.calls().is_empty());

        fs::write(dir.path().join("Gemfile"), "source 'https://rubygems.org'\n").unwrap();
        bundler.install_gems().unwrap();
        assert!(runner.was_called("bundle install"));
    }
}
