//! Homebrew client.
//!
//! Presence checks look at the Homebrew prefix on disk instead of asking
//! `brew`, which keeps should-run decisions fast.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use crate::command::{CommandRunner, ShellCommand};
use crate::error::{GumError, Result};
use crate::platform::Platform;

/// A Homebrew formula or cask
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Package {
    #[serde(default)]
    pub name: String,
    /// Install with `--cask`
    #[serde(default)]
    pub cask: bool,
    /// Force-link after installing (keg-only formulae)
    #[serde(default)]
    pub link: bool,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cask: false,
            link: false,
        }
    }

    pub fn cask(name: impl Into<String>) -> Self {
        Self {
            cask: true,
            ..Self::new(name)
        }
    }
}

/// Default prefix when `HOMEBREW_PREFIX` is not exported
pub fn default_prefix(platform: Platform) -> PathBuf {
    match platform {
        Platform::Darwin if cfg!(target_arch = "aarch64") => PathBuf::from("/opt/homebrew"),
        Platform::Darwin => PathBuf::from("/usr/local"),
        Platform::Linux => PathBuf::from("/home/linuxbrew/.linuxbrew"),
    }
}

#[derive(Debug, Clone)]
pub struct Homebrew {
    runner: Arc<dyn CommandRunner>,
    prefix: PathBuf,
}

impl Homebrew {
    pub fn new(runner: Arc<dyn CommandRunner>, prefix: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            prefix: prefix.into(),
        }
    }

    /// Install `pkg` unless present, linking afterwards when requested.
    pub fn ensure_installed(&self, pkg: &Package) -> Result<()> {
        info!("Ensuring package {} is installed", pkg.name);

        if self.is_installed(pkg) {
            info!("Brew package {} is already installed", pkg.name);
            return Ok(());
        }

        self.install(pkg)?;
        if pkg.link {
            self.link(pkg)?;
        }

        info!("Brew package {} installed successfully", pkg.name);
        Ok(())
    }

    pub fn install(&self, pkg: &Package) -> Result<()> {
        require_name(pkg)?;
        debug!("Installing brew package {}", pkg.name);

        let mut args = vec!["install".to_string()];
        if pkg.cask {
            args.push("--cask".to_string());
        }
        args.push(pkg.name.clone());
        self.brew(args)
    }

    pub fn is_installed(&self, pkg: &Package) -> bool {
        if pkg.name.is_empty() {
            return false;
        }
        let dir = if pkg.cask { "Caskroom" } else { "opt" };
        self.prefix.join(dir).join(&pkg.name).exists()
    }

    pub fn link(&self, pkg: &Package) -> Result<()> {
        require_name(pkg)?;
        if !pkg.link {
            return Ok(());
        }
        if pkg.cask {
            return Err(GumError::command(format!(
                "Cannot link cask package {}",
                pkg.name
            )));
        }

        debug!("Linking brew package {}", pkg.name);
        self.brew(["link", "--force", "--overwrite", pkg.name.as_str()])
    }

    pub fn upgrade(&self, pkg: &Package) -> Result<()> {
        require_name(pkg)?;
        debug!("Upgrading brew package {}", pkg.name);
        self.brew(["upgrade", pkg.name.as_str()])
    }

    fn brew<I, S>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let command = ShellCommand::new("brew", args);
        self.runner
            .run(&command)?
            .ensure_success(&command.to_string())
    }
}

fn require_name(pkg: &Package) -> Result<()> {
    if pkg.name.is_empty() {
        return Err(GumError::validation("Package name is required"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::testing::ScriptedRunner;

    fn brew_with_prefix(runner: Arc<ScriptedRunner>) -> (Homebrew, tempfile::TempDir) {
        let prefix = tempfile::tempdir().unwrap();
        (Homebrew::new(runner, prefix.path()), prefix)
    }

    #[test]
    fn test_is_installed_checks_prefix() {
        let (brew, prefix) = brew_with_prefix(ScriptedRunner::new());
        std::fs::create_dir_all(prefix.path().join("opt/jq")).unwrap();
        std::fs::create_dir_all(prefix.path().join("Caskroom/iterm2")).unwrap();

        assert!(brew.is_installed(&Package::new("jq")));
        assert!(!brew.is_installed(&Package::new("iterm2")));
        assert!(brew.is_installed(&Package::cask("iterm2")));
        assert!(!brew.is_installed(&Package::new("")));
    }

    #[test]
    fn test_ensure_installed_skips_present_package() {
        let runner = ScriptedRunner::new();
        let (brew, prefix) = brew_with_prefix(runner.clone());
        std::fs::create_dir_all(prefix.path().join("opt/go")).unwrap();

        brew.ensure_installed(&Package::new("go")).unwrap();
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_ensure_installed_installs_and_links() {
        let runner = ScriptedRunner::new();
        let (brew, _prefix) = brew_with_prefix(runner.clone());
        let pkg = Package {
            link: true,
            ..Package::new("openssl@3")
        };

        brew.ensure_installed(&pkg).unwrap();
        assert_eq!(
            runner.calls(),
            vec![
                "brew install openssl@3",
                "brew link --force --overwrite openssl@3"
            ]
        );
    }

    #[test]
    fn test_install_cask_passes_flag() {
        let runner = ScriptedRunner::new();
        let (brew, _prefix) = brew_with_prefix(runner.clone());

        brew.install(&Package::cask("iterm2")).unwrap();
        assert!(runner.was_called("brew install --cask iterm2"));
    }

    #[test]
    fn test_install_failure_is_reported() {
        let runner = ScriptedRunner::new();
        runner.fail("brew install nope");
        let (brew, _prefix) = brew_with_prefix(runner);

        let err = brew.install(&Package::new("nope")).unwrap_err();
        assert!(err.to_string().contains("brew install nope"));
    }

    #[test]
    fn test_link_rejects_cask() {
        let (brew, _prefix) = brew_with_prefix(ScriptedRunner::new());
        let pkg = Package {
            link: true,
            ..Package::cask("docker")
        };
        assert!(brew.link(&pkg).is_err());
    }

    #[test]
    fn test_default_prefix_linux() {
        assert_eq!(
            default_prefix(Platform::Linux),
            PathBuf::from("/home/linuxbrew/.linuxbrew")
        );
    }
}
