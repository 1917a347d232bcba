//! Script actions: run a shell command unless its test says the effect
//! already holds.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use super::{Action, ActionId, SetupAction};
use crate::command::{CommandRunner, ShellCommand};
use crate::error::{GumError, Result};
use crate::platform::{Platform, PlatformSet};

/// What a script action runs, as written in gum.yml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptDefinition {
    /// Unique title; doubles as the action identifier
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub command: String,
    /// Test command; success means `command` need not run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<String>,
}

impl ScriptDefinition {
    pub fn new(title: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            command: command.into(),
            test: None,
        }
    }

    pub fn with_test(mut self, test: impl Into<String>) -> Self {
        self.test = Some(test.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct ScriptAction {
    definition: ScriptDefinition,
    runner: Arc<dyn CommandRunner>,
}

impl ScriptAction {
    pub fn new(definition: ScriptDefinition, runner: Arc<dyn CommandRunner>) -> Self {
        Self { definition, runner }
    }

    pub fn definition(&self) -> &ScriptDefinition {
        &self.definition
    }
}

impl SetupAction for ScriptAction {
    fn name(&self) -> &str {
        "script"
    }

    fn identifier(&self) -> ActionId {
        ActionId::new(self.definition.title.clone())
    }

    fn dependencies(&self) -> Vec<Action> {
        Vec::new()
    }

    fn platforms(&self) -> PlatformSet {
        PlatformSet::ALL
    }

    fn is_public(&self) -> bool {
        true
    }

    fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();
        if self.definition.title.is_empty() {
            problems.push("title is empty");
        }
        if self.definition.command.is_empty() {
            problems.push("command is empty");
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(GumError::validation(problems.join(", ")))
        }
    }

    fn should_run(&self, _platform: Platform) -> bool {
        let Some(test) = self.definition.test.as_deref().filter(|t| !t.is_empty()) else {
            return true;
        };

        match self.runner.run(&ShellCommand::bash(test).read_only()) {
            Ok(output) if output.success => {
                debug!("Script test {} passed", test);
                false
            }
            _ => {
                debug!("Script test {} failed", test);
                true
            }
        }
    }

    fn run(&self) -> Result<()> {
        self.runner
            .run(&ShellCommand::bash(self.definition.command.as_str()))?
            .ensure_success(&format!("Script '{}'", self.definition.title))
    }
}
