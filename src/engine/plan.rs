//! Plan Builder
//!
//! Flattens a forest of action dependency graphs into one ordered plan:
//!
//! - **Platform-filtered**: actions the host does not support are dropped,
//!   together with everything reachable only through them
//! - **Deduplicated**: one entry per identifier, kept at its first position
//! - **Dependency-ordered**: a supported dependency always precedes its dependent
//! - **Deterministic**: independent actions keep first-discovery order
//!
//! Expansion is depth-first. Each action's dependencies are placed before the
//! action itself, whether or not an action with the same identifier is
//! already in the plan. A stack of identifiers currently being expanded catches
//! dependency cycles; a cycle is recorded on the plan instead of recursing.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info, warn};

use crate::action::{Action, ActionId};
use crate::platform::Platform;

/// A dependency path that leads back to an action still being expanded.
///
/// The first and last identifiers are equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyCycle {
    pub path: Vec<ActionId>,
}

impl fmt::Display for DependencyCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<&str> = self.path.iter().map(ActionId::as_str).collect();
        write!(f, "dependency cycle: {}", ids.join(" -> "))
    }
}

/// Serializable view of one plan entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanEntry {
    pub position: usize,
    pub name: String,
    pub identifier: ActionId,
    pub public: bool,
    /// Dependencies that made it into the plan
    pub depends_on: Vec<ActionId>,
}

/// Ordered, deduplicated, platform-filtered sequence of actions.
///
/// Immutable once built.
#[derive(Debug, Clone)]
pub struct Plan {
    actions: Vec<Action>,
    platform: Platform,
    cycles: Vec<DependencyCycle>,
}

impl Plan {
    /// Build the plan for `roots` on `platform`.
    pub fn build(roots: &[Action], platform: Platform) -> Self {
        PlanBuilder::new(platform).build(roots)
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Action> {
        self.actions.iter()
    }

    pub fn identifiers(&self) -> Vec<ActionId> {
        self.actions.iter().map(Action::identifier).collect()
    }

    /// Index of the entry with identifier `id`
    pub fn position(&self, id: &ActionId) -> Option<usize> {
        self.actions.iter().position(|a| &a.identifier() == id)
    }

    /// Cycles found while expanding; a plan with cycles must not run
    pub fn cycles(&self) -> &[DependencyCycle] {
        &self.cycles
    }

    pub fn entries(&self) -> Vec<PlanEntry> {
        self.actions
            .iter()
            .enumerate()
            .map(|(position, action)| PlanEntry {
                position,
                name: action.name().to_string(),
                identifier: action.identifier(),
                public: action.is_public(),
                depends_on: action
                    .dependencies()
                    .iter()
                    .map(Action::identifier)
                    .filter(|id| self.position(id).is_some())
                    .collect(),
            })
            .collect()
    }

    /// Returns a summary of the plan for logging/display.
    pub fn summary(&self) -> String {
        let mut lines = vec![format!(
            "Plan for {} ({} action(s)):",
            self.platform,
            self.actions.len()
        )];
        for (i, action) in self.actions.iter().enumerate() {
            lines.push(format!("  {}. {}", i + 1, action));
        }
        for cycle in &self.cycles {
            lines.push(format!("  ! {}", cycle));
        }
        lines.join("\n")
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}

/// Depth-first plan construction state.
#[derive(Debug)]
pub struct PlanBuilder {
    platform: Platform,
    plan: Vec<Action>,
    placed: HashSet<ActionId>,
    expanding: Vec<ActionId>,
    cycles: Vec<DependencyCycle>,
}

impl PlanBuilder {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            plan: Vec::new(),
            placed: HashSet::new(),
            expanding: Vec::new(),
            cycles: Vec::new(),
        }
    }

    pub fn build(mut self, roots: &[Action]) -> Plan {
        self.expand(roots, true);
        info!("Built plan with {} action(s) for {}", self.plan.len(), self.platform);
        Plan {
            actions: self.plan,
            platform: self.platform,
            cycles: self.cycles,
        }
    }

    fn expand(&mut self, actions: &[Action], roots: bool) {
        for action in actions {
            let id = action.identifier();

            if !action.supports(self.platform) {
                if roots {
                    info!(
                        "Skipping action {}: supported on {}, not {}",
                        action,
                        action.platforms(),
                        self.platform
                    );
                } else {
                    warn!(
                        "Dropping dependency {}: supported on {}, not {}",
                        action,
                        action.platforms(),
                        self.platform
                    );
                }
                continue;
            }

            if let Some(start) = self.expanding.iter().position(|e| e == &id) {
                let mut path = self.expanding[start..].to_vec();
                path.push(id);
                let cycle = DependencyCycle { path };
                warn!("Not expanding {}: {}", action, cycle);
                self.cycles.push(cycle);
                continue;
            }

            self.expanding.push(id.clone());
            self.expand(&action.dependencies(), false);
            self.expanding.pop();

            // Dependencies are expanded even when the identifier is already
            // planned; only the action itself is deduplicated.
            if self.placed.insert(id) {
                self.plan.push(action.clone());
            } else {
                debug!("Action {} already planned", action);
            }
        }
    }
}
