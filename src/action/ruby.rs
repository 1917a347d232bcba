//! Ruby toolchain: the project's Ruby via rbenv, its pinned Bundler, and gems.

use super::{Action, ActionContext, ActionId, BrewAction, SetupAction};
use crate::error::Result;
use crate::platform::{Platform, PlatformSet};
use crate::tools::{Bundler, Package, Rbenv};

#[derive(Debug, Clone)]
pub struct RubyAction {
    context: ActionContext,
}

impl RubyAction {
    pub fn new(context: &ActionContext) -> Self {
        Self {
            context: context.clone(),
        }
    }

    fn rbenv(&self) -> Rbenv {
        Rbenv::new(
            self.context.runner.clone(),
            self.context.homebrew(),
            &self.context.project_dir,
        )
    }

    fn bundler(&self) -> Bundler {
        Bundler::new(self.context.runner.clone(), &self.context.project_dir)
    }
}

impl SetupAction for RubyAction {
    fn name(&self) -> &str {
        "ruby"
    }

    fn identifier(&self) -> ActionId {
        ActionId::from("ruby")
    }

    fn dependencies(&self) -> Vec<Action> {
        vec![BrewAction::new(vec![Package::new("rbenv")], &self.context).into()]
    }

    fn platforms(&self) -> PlatformSet {
        PlatformSet::ALL
    }

    fn is_public(&self) -> bool {
        true
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    // Gem state is cheap to re-check and bundler is idempotent.
    fn should_run(&self, _platform: Platform) -> bool {
        true
    }

    fn run(&self) -> Result<()> {
        self.rbenv().ensure_ruby_installed()?;

        let bundler = self.bundler();
        bundler.ensure_bundler_installed()?;
        bundler.install_gems()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandOutput;
    use crate::command::testing::ScriptedRunner;

    #[test]
    fn test_depends_on_rbenv_package() {
        let ctx = ActionContext::new(ScriptedRunner::new(), "/tmp", "/nonexistent");
        let deps = RubyAction::new(&ctx).dependencies();
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].identifier().as_str(), "brew-rbenv");
    }

    #[test]
    fn test_run_installs_ruby_bundler_and_gems() {
        let project = tempfile::tempdir().unwrap();
        std::fs::write(project.path().join("Gemfile"), "source 'https://rubygems.org'\n").unwrap();
        let runner = ScriptedRunner::new();
        runner.respond("rbenv version", CommandOutput::ok("3.3.0 (set by .ruby-version)\n"));
        let ctx = ActionContext::new(runner.clone(), project.path(), "/nonexistent");

        RubyAction::new(&ctx).run().unwrap();
        assert_eq!(runner.calls(), vec!["rbenv version", "bundle install"]);
    }
}
