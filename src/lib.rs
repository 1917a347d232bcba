//! gum library
//!
//! Turns the setup steps a project declares in gum.yml into one
//! deduplicated, dependency-ordered, platform-filtered plan and runs it.

pub mod action;
pub mod cli;
pub mod command;
pub mod config_file;
pub mod engine;
pub mod error;
pub mod platform;
pub mod process_guard;
pub mod tools;

// Re-export main types for convenience
pub use action::{
    Action, ActionContext, ActionId, ActionRegistry, AggregateAction, BrewAction, RubyAction,
    ScriptAction, ScriptDefinition, SetupAction, XcodeAction,
};
pub use command::{CommandOutput, CommandRunner, DryRunRunner, ShellCommand, SystemRunner};
pub use config_file::{GumConfig, UpEntry};
pub use engine::{
    ActionHandler, DependencyCycle, Plan, PlanBuilder, PlanEntry, RunSummary, ValidationFailure,
    ValidationReport,
};
pub use error::{GumError, Result};
pub use platform::{Platform, PlatformSet};
pub use process_guard::{ChildRegistry, CommandProcessGroup, ProcessGuard};
pub use tools::Package;
