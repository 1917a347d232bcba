//! Xcode command line tools, a Homebrew prerequisite on macOS.

use super::{Action, ActionContext, ActionId, SetupAction};
use crate::error::Result;
use crate::platform::{Platform, PlatformSet};
use crate::tools::Xcode;

#[derive(Debug, Clone)]
pub struct XcodeAction {
    xcode: Xcode,
}

impl XcodeAction {
    pub fn new(context: &ActionContext) -> Self {
        Self {
            xcode: Xcode::new(context.runner.clone()),
        }
    }
}

impl SetupAction for XcodeAction {
    fn name(&self) -> &str {
        "xcode"
    }

    fn identifier(&self) -> ActionId {
        ActionId::from("xcode")
    }

    fn dependencies(&self) -> Vec<Action> {
        Vec::new()
    }

    fn platforms(&self) -> PlatformSet {
        PlatformSet::only(Platform::Darwin)
    }

    fn is_public(&self) -> bool {
        false
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn should_run(&self, _platform: Platform) -> bool {
        !self.xcode.is_installed()
    }

    fn run(&self) -> Result<()> {
        self.xcode.ensure_installed()
    }
}
