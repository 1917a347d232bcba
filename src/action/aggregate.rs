//! Aggregate actions: no effect of their own, they exist to pull in
//! dependencies (e.g. "golang" is "install the Go tool packages").

use super::{deps_should_run, Action, ActionId, SetupAction};
use crate::error::Result;
use crate::platform::{Platform, PlatformSet};

#[derive(Debug, Clone)]
pub struct AggregateAction {
    name: String,
    identifier: ActionId,
    dependencies: Vec<Action>,
    platforms: PlatformSet,
    public: bool,
}

impl AggregateAction {
    /// Internal aggregate on every platform, identified by its name.
    pub fn new(name: impl Into<String>, dependencies: Vec<Action>) -> Self {
        let name = name.into();
        Self {
            identifier: ActionId::new(name.clone()),
            name,
            dependencies,
            platforms: PlatformSet::ALL,
            public: false,
        }
    }

    pub fn with_platforms(mut self, platforms: PlatformSet) -> Self {
        self.platforms = platforms;
        self
    }

    pub fn public(mut self) -> Self {
        self.public = true;
        self
    }
}

impl SetupAction for AggregateAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn identifier(&self) -> ActionId {
        self.identifier.clone()
    }

    fn dependencies(&self) -> Vec<Action> {
        self.dependencies.clone()
    }

    fn platforms(&self) -> PlatformSet {
        self.platforms
    }

    fn is_public(&self) -> bool {
        self.public
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn should_run(&self, platform: Platform) -> bool {
        deps_should_run(&self.dependencies, platform)
    }

    fn run(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_defaults_to_name() {
        let action = AggregateAction::new("golang", vec![]);
        assert_eq!(action.identifier(), ActionId::from("golang"));
        assert!(!action.is_public());
        assert!(action.public().is_public());
    }

    #[test]
    fn test_leaf_aggregate_has_nothing_to_do() {
        let action = AggregateAction::new("empty", vec![]);
        assert!(!action.should_run(Platform::Linux));
        assert!(action.validate().is_ok());
        assert!(action.run().is_ok());
    }

    #[test]
    fn test_with_platforms() {
        let action = AggregateAction::new("xcode-ish", vec![])
            .with_platforms(PlatformSet::only(Platform::Darwin));
        assert_eq!(action.identifier().as_str(), "xcode-ish");
        assert!(!action.platforms().contains(Platform::Linux));
    }
}
