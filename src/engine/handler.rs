//! Action Handler: owns a built plan and drives its two phases.
//!
//! Validation visits every action and collects every failure. Running stops
//! at the first failure and leaves completed actions in place.

use serde::Serialize;
use std::fmt;
use tracing::{debug, error, info};

use super::plan::{DependencyCycle, Plan};
use crate::action::Action;
use crate::error::{GumError, Result};
use crate::platform::Platform;

/// One action that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    pub name: String,
    pub identifier: String,
    pub message: String,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.name, self.identifier, self.message)
    }
}

/// Everything wrong with a plan, gathered in one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub failures: Vec<ValidationFailure>,
    pub cycles: Vec<DependencyCycle>,
}

impl ValidationReport {
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty() && self.cycles.is_empty()
    }

    /// Number of report lines
    pub fn len(&self) -> usize {
        self.failures.len() + self.cycles.len()
    }

    fn record(&mut self, action: &Action, error: &GumError) {
        self.failures.push(ValidationFailure {
            name: action.name().to_string(),
            identifier: action.identifier().to_string(),
            message: error.to_string(),
        });
    }

    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(GumError::ValidationFailed(self))
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed ({} problem(s)):", self.len())?;
        for failure in &self.failures {
            write!(f, "\n  - {}", failure)?;
        }
        for cycle in &self.cycles {
            write!(f, "\n  - {}", cycle)?;
        }
        Ok(())
    }
}

/// Outcome counts of a successful run phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub ran: usize,
    pub skipped: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ran, {} skipped", self.ran, self.skipped)
    }
}

#[derive(Debug, Clone)]
pub struct ActionHandler {
    plan: Plan,
}

impl ActionHandler {
    /// Build the plan for `roots` on `platform` and take ownership of it.
    pub fn new(roots: &[Action], platform: Platform) -> Self {
        Self::from_plan(Plan::build(roots, platform))
    }

    pub fn from_plan(plan: Plan) -> Self {
        Self { plan }
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    /// Validate every planned action.
    ///
    /// Never stops early. Fails with [`GumError::ValidationFailed`] listing
    /// one line per failing action plus any dependency cycles.
    pub fn validate(&self) -> Result<()> {
        let mut report = ValidationReport {
            cycles: self.plan.cycles().to_vec(),
            ..Default::default()
        };

        for action in &self.plan {
            debug!("Validating {}", action);
            match action.validate() {
                Ok(()) => debug!("Validated {}", action),
                Err(e) => {
                    debug!("Validation of {} failed: {}", action, e);
                    report.record(action, &e);
                }
            }
        }

        if report.is_empty() {
            info!("Validated {} action(s)", self.plan.len());
        }
        report.into_result()
    }

    /// Run the plan in order, skipping actions whose effect already holds.
    ///
    /// The first failing action aborts the phase; its error is returned
    /// wrapped with the action's name and identifier.
    pub fn run(&self) -> Result<RunSummary> {
        if !self.plan.cycles().is_empty() {
            return Err(GumError::ValidationFailed(ValidationReport {
                cycles: self.plan.cycles().to_vec(),
                ..Default::default()
            }));
        }

        let platform = self.plan.platform();
        let mut summary = RunSummary::default();
        for action in &self.plan {
            if !action.should_run(platform) {
                info!("Skipping {}: already satisfied", action);
                summary.skipped += 1;
                continue;
            }

            info!("Running {}", action);
            action.run().map_err(|e| {
                error!("Action {} failed: {}", action, e);
                GumError::action_failed(action.name(), action.identifier().as_str(), e)
            })?;
            info!("Ran {}", action);
            summary.ran += 1;
        }

        info!("Run complete: {}", summary);
        Ok(summary)
    }
}
