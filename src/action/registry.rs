//! Named built-in actions.
//!
//! The registry is built once at startup from an [`ActionContext`] and handed
//! by reference to whatever resolves configuration into root actions. It is
//! read-only after construction.

use std::collections::BTreeMap;

use super::{
    Action, ActionContext, AggregateAction, BrewAction, RubyAction, ScriptAction,
    ScriptDefinition, XcodeAction,
};
use crate::tools::Package;

const HOMEBREW_INSTALL: &str =
    "/bin/bash -c \"$(curl -fsSL https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh)\"";

/// Go toolchain packages installed by the `golang` action
pub const GOLANG_PACKAGES: &[&str] = &[
    "go",
    "goreleaser",
    "golangci-lint",
    "go-task",
    "mockery",
    "gopls",
];

/// Prerequisites for any Homebrew package: command line tools and brew itself
pub fn brew_ensure(context: &ActionContext) -> Action {
    let install_homebrew = ScriptAction::new(
        ScriptDefinition::new("Install Homebrew", HOMEBREW_INSTALL).with_test("brew --version"),
        context.runner.clone(),
    );
    AggregateAction::new(
        "brew_ensure",
        vec![
            Action::Xcode(XcodeAction::new(context)),
            install_homebrew.into(),
        ],
    )
    .into()
}

pub fn golang(context: &ActionContext) -> Action {
    let packages = GOLANG_PACKAGES.iter().copied().map(Package::new).collect();
    AggregateAction::new("golang", vec![BrewAction::new(packages, context).into()])
        .public()
        .into()
}

pub fn ruby(context: &ActionContext) -> Action {
    Action::Ruby(RubyAction::new(context))
}

pub fn xcode(context: &ActionContext) -> Action {
    Action::Xcode(XcodeAction::new(context))
}

#[derive(Debug, Clone)]
pub struct ActionRegistry {
    context: ActionContext,
    actions: BTreeMap<String, Action>,
}

impl ActionRegistry {
    /// Registry holding every built-in action
    pub fn builtin(context: &ActionContext) -> Self {
        let actions = [
            ("golang", golang(context)),
            ("ruby", ruby(context)),
            ("brew_ensure", brew_ensure(context)),
            ("xcode", xcode(context)),
        ];
        Self {
            context: context.clone(),
            actions: actions
                .into_iter()
                .map(|(name, action)| (name.to_string(), action))
                .collect(),
        }
    }

    /// Collaborators used to build inline actions alongside the built-ins
    pub fn context(&self) -> &ActionContext {
        &self.context
    }

    pub fn get(&self, name: &str) -> Option<&Action> {
        self.actions.get(name)
    }

    /// A fresh copy of the public action called `name`
    pub fn resolve(&self, name: &str) -> Option<Action> {
        self.get(name).filter(|a| a.is_public()).cloned()
    }

    /// Names configuration may use, sorted
    pub fn public_names(&self) -> Vec<&str> {
        self.actions
            .iter()
            .filter(|(_, action)| action.is_public())
            .map(|(name, _)| name.as_str())
            .collect()
    }
}
