//! Package-set actions backed by Homebrew.

use super::registry::brew_ensure;
use super::{deps_should_run, Action, ActionContext, ActionId, SetupAction};
use crate::error::{GumError, Result};
use crate::platform::{Platform, PlatformSet};
use crate::tools::{Homebrew, Package};

#[derive(Debug, Clone)]
pub struct BrewAction {
    packages: Vec<Package>,
    brew: Homebrew,
    context: ActionContext,
}

impl BrewAction {
    pub fn new(packages: Vec<Package>, context: &ActionContext) -> Self {
        Self {
            packages,
            brew: context.homebrew(),
            context: context.clone(),
        }
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }
}

impl SetupAction for BrewAction {
    fn name(&self) -> &str {
        "brew"
    }

    /// `brew-<name>-<name>...` in package order
    fn identifier(&self) -> ActionId {
        let mut id = String::from("brew");
        for pkg in &self.packages {
            id.push('-');
            id.push_str(&pkg.name);
        }
        ActionId::new(id)
    }

    fn dependencies(&self) -> Vec<Action> {
        vec![brew_ensure(&self.context)]
    }

    fn platforms(&self) -> PlatformSet {
        PlatformSet::ALL
    }

    fn is_public(&self) -> bool {
        true
    }

    fn validate(&self) -> Result<()> {
        let missing_names = self.packages.iter().filter(|p| p.name.is_empty()).count();
        if missing_names > 0 {
            return Err(GumError::validation(format!(
                "{} package(s) missing name",
                missing_names
            )));
        }
        if self.packages.is_empty() {
            return Err(GumError::validation("no packages specified"));
        }
        Ok(())
    }

    fn should_run(&self, platform: Platform) -> bool {
        deps_should_run(&self.dependencies(), platform)
            || self.packages.iter().any(|pkg| !self.brew.is_installed(pkg))
    }

    fn run(&self) -> Result<()> {
        for pkg in &self.packages {
            self.brew.ensure_installed(pkg)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::testing::ScriptedRunner;
    use std::sync::Arc;

    fn context(runner: Arc<ScriptedRunner>, prefix: &std::path::Path) -> ActionContext {
        ActionContext::new(runner, "/tmp", prefix)
    }

    #[test]
    fn test_identifier_concatenates_package_names() {
        let prefix = tempfile::tempdir().unwrap();
        let ctx = context(ScriptedRunner::new(), prefix.path());
        let action = BrewAction::new(vec![Package::new("go"), Package::new("gopls")], &ctx);
        assert_eq!(action.identifier().as_str(), "brew-go-gopls");
        assert_eq!(action.name(), "brew");
    }

    #[test]
    fn test_validate_no_packages() {
        let prefix = tempfile::tempdir().unwrap();
        let ctx = context(ScriptedRunner::new(), prefix.path());
        let err = BrewAction::new(vec![], &ctx).validate().unwrap_err();
        assert!(err.to_string().contains("no packages specified"));
    }

    #[test]
    fn test_validate_missing_names() {
        let prefix = tempfile::tempdir().unwrap();
        let ctx = context(ScriptedRunner::new(), prefix.path());
        let action = BrewAction::new(vec![Package::new(""), Package::new("package1")], &ctx);
        let err = action.validate().unwrap_err();
        assert!(err.to_string().contains("1 package(s) missing name"));
    }

    #[test]
    fn test_depends_on_brew_ensure() {
        let prefix = tempfile::tempdir().unwrap();
        let ctx = context(ScriptedRunner::new(), prefix.path());
        let deps = BrewAction::new(vec![Package::new("jq")], &ctx).dependencies();
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].identifier().as_str(), "brew_ensure");
    }

    #[test]
    fn test_should_run_when_package_missing() {
        let prefix = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(prefix.path().join("opt/go")).unwrap();
        let runner = ScriptedRunner::new();
        // brew and xcode are present, so only package presence matters
        let ctx = context(runner, prefix.path());

        let installed = BrewAction::new(vec![Package::new("go")], &ctx);
        assert!(!installed.should_run(Platform::Linux));

        let missing = BrewAction::new(vec![Package::new("go"), Package::new("jq")], &ctx);
        assert!(missing.should_run(Platform::Linux));
    }

    #[test]
    fn test_should_run_when_homebrew_missing() {
        let prefix = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(prefix.path().join("opt/go")).unwrap();
        let runner = ScriptedRunner::new();
        runner.fail("bash -c brew --version");
        let ctx = context(runner, prefix.path());

        assert!(BrewAction::new(vec![Package::new("go")], &ctx).should_run(Platform::Linux));
    }

    #[test]
    fn test_should_run_ignores_dependencies_off_platform() {
        let prefix = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(prefix.path().join("opt/go")).unwrap();
        let runner = ScriptedRunner::new();
        runner.fail("xcode-select -p");
        let ctx = context(runner, prefix.path());
        let action = BrewAction::new(vec![Package::new("go")], &ctx);

        // Missing command line tools only matter on darwin
        assert!(!action.should_run(Platform::Linux));
        assert!(action.should_run(Platform::Darwin));
    }

    #[test]
    fn test_run_installs_in_order_and_stops_at_failure() {
        let prefix = tempfile::tempdir().unwrap();
        let runner = ScriptedRunner::new();
        runner.fail("brew install b");
        let ctx = context(runner.clone(), prefix.path());
        let action = BrewAction::new(
            vec![Package::new("a"), Package::new("b"), Package::new("c")],
            &ctx,
        );

        assert!(action.run().is_err());
        assert_eq!(runner.calls(), vec!["brew install a", "brew install b"]);
    }
}
