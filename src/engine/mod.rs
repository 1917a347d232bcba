//! Orchestration engine: plan building and plan execution.
//!
//! Root actions go in, a deduplicated dependency-ordered plan comes out of
//! [`PlanBuilder`], and [`ActionHandler`] validates and runs it.

pub mod handler;
pub mod plan;

pub use handler::{ActionHandler, RunSummary, ValidationFailure, ValidationReport};
pub use plan::{DependencyCycle, Plan, PlanBuilder, PlanEntry};
