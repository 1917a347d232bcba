//! Setup actions.
//!
//! An action is the atomic unit of setup work. Every kind of action exposes
//! the same capability set through [`SetupAction`]: identity, dependencies,
//! platform support, and the validate / should-run / run operations.
//!
//! The set of kinds is closed: [`Action`] is a tagged union over them, which
//! keeps the plan builder and handler variant-agnostic without open-ended
//! trait objects.
//!
//! | Kind        | Identifier                | Public | Purpose |
//! |-------------|---------------------------|--------|---------|
//! | `Aggregate` | its name (e.g. `golang`)  | varies | pull in dependencies only |
//! | `Brew`      | `brew-<pkg>-<pkg>...`     | yes    | install a package set |
//! | `Script`    | its title                 | yes    | run a shell command guarded by a test |
//! | `Xcode`     | `xcode`                   | no     | macOS command line tools |
//! | `Ruby`      | `ruby`                    | yes    | rbenv Ruby + Bundler + gems |

pub mod aggregate;
pub mod brew;
pub mod registry;
pub mod ruby;
pub mod script;
pub mod xcode;

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::command::CommandRunner;
use crate::error::Result;
use crate::platform::{Platform, PlatformSet};
use crate::tools::Homebrew;
use crate::tools::homebrew::default_prefix;

pub use aggregate::AggregateAction;
pub use brew::BrewAction;
pub use registry::ActionRegistry;
pub use ruby::RubyAction;
pub use script::{ScriptAction, ScriptDefinition};
pub use xcode::XcodeAction;

/// Identity of a unit of work. Actions with equal identifiers are the same
/// plan node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ActionId(String);

impl ActionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ActionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Capability set shared by every kind of action.
pub trait SetupAction {
    /// Human-readable label; not unique.
    fn name(&self) -> &str;

    fn identifier(&self) -> ActionId;

    /// Actions that must be in the plan, and complete, before this one.
    fn dependencies(&self) -> Vec<Action>;

    fn platforms(&self) -> PlatformSet;

    /// Whether configuration may reference this action by name
    fn is_public(&self) -> bool;

    /// Check preconditions without side effects.
    fn validate(&self) -> Result<()>;

    /// Idempotency check; `false` means the effect already holds.
    ///
    /// `platform` is the platform the plan was built for.
    fn should_run(&self, platform: Platform) -> bool;

    fn run(&self) -> Result<()>;
}

/// Any setup action.
#[derive(Debug, Clone)]
pub enum Action {
    Aggregate(AggregateAction),
    Brew(BrewAction),
    Script(ScriptAction),
    Xcode(XcodeAction),
    Ruby(RubyAction),
}

impl Action {
    fn inner(&self) -> &dyn SetupAction {
        match self {
            Self::Aggregate(a) => a,
            Self::Brew(a) => a,
            Self::Script(a) => a,
            Self::Xcode(a) => a,
            Self::Ruby(a) => a,
        }
    }

    pub fn name(&self) -> &str {
        self.inner().name()
    }

    pub fn identifier(&self) -> ActionId {
        self.inner().identifier()
    }

    pub fn dependencies(&self) -> Vec<Action> {
        self.inner().dependencies()
    }

    pub fn platforms(&self) -> PlatformSet {
        self.inner().platforms()
    }

    pub fn supports(&self, platform: Platform) -> bool {
        self.platforms().contains(platform)
    }

    pub fn is_public(&self) -> bool {
        self.inner().is_public()
    }

    pub fn validate(&self) -> Result<()> {
        self.inner().validate()
    }

    pub fn should_run(&self, platform: Platform) -> bool {
        self.inner().should_run(platform)
    }

    pub fn run(&self) -> Result<()> {
        self.inner().run()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.identifier())
    }
}

impl From<AggregateAction> for Action {
    fn from(action: AggregateAction) -> Self {
        Self::Aggregate(action)
    }
}

impl From<BrewAction> for Action {
    fn from(action: BrewAction) -> Self {
        Self::Brew(action)
    }
}

impl From<ScriptAction> for Action {
    fn from(action: ScriptAction) -> Self {
        Self::Script(action)
    }
}

/// True if any dependency still has work to do on `platform`.
///
/// Dependencies `platform` does not support never enter the plan, so they
/// cannot have pending work either.
pub(crate) fn deps_should_run(deps: &[Action], platform: Platform) -> bool {
    deps.iter()
        .filter(|dep| dep.supports(platform))
        .any(|dep| dep.should_run(platform))
}

/// Collaborators shared by the built-in actions.
#[derive(Debug, Clone)]
pub struct ActionContext {
    pub runner: Arc<dyn CommandRunner>,
    /// Directory holding gum.yml; project-scoped tools run here
    pub project_dir: PathBuf,
    pub brew_prefix: PathBuf,
}

impl ActionContext {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        project_dir: impl Into<PathBuf>,
        brew_prefix: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runner,
            project_dir: project_dir.into(),
            brew_prefix: brew_prefix.into(),
        }
    }

    /// Use `HOMEBREW_PREFIX` when exported, else the platform default.
    pub fn from_env(
        runner: Arc<dyn CommandRunner>,
        project_dir: impl Into<PathBuf>,
        platform: Platform,
    ) -> Self {
        let brew_prefix = std::env::var_os("HOMEBREW_PREFIX")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| default_prefix(platform));
        Self::new(runner, project_dir, brew_prefix)
    }

    pub fn homebrew(&self) -> Homebrew {
        Homebrew::new(Arc::clone(&self.runner), &self.brew_prefix)
    }
}
