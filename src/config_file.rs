//! Project configuration: `gum.yml`.
//!
//! Each entry under `up:` becomes one root action, in file order. An entry
//! names a public built-in action, lists an inline package set, or defines
//! an inline script.
//!
//! ```yaml
//! up:
//!   - action: golang
//!   - brew:
//!       - name: jq
//!       - name: iterm2
//!         cask: true
//!   - script:
//!       title: Create scratch dir
//!       command: mkdir -p ~/scratch
//!       test: test -d ~/scratch
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::action::{Action, ActionRegistry, BrewAction, ScriptAction, ScriptDefinition};
use crate::error::{GumError, Result};
use crate::tools::Package;

/// Filenames searched for, in order
pub const CONFIG_FILENAMES: &[&str] = &["gum.yml", "gum.yaml"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GumConfig {
    #[serde(default)]
    pub up: Vec<UpEntry>,
}

/// One `up:` entry. Exactly one field must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brew: Option<Vec<Package>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<ScriptDefinition>,
}

impl UpEntry {
    pub fn named(action: impl Into<String>) -> Self {
        Self {
            action: Some(action.into()),
            ..Default::default()
        }
    }

    pub fn brew(packages: Vec<Package>) -> Self {
        Self {
            brew: Some(packages),
            ..Default::default()
        }
    }

    pub fn script(definition: ScriptDefinition) -> Self {
        Self {
            script: Some(definition),
            ..Default::default()
        }
    }

    fn defined_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.action.is_some() {
            fields.push("action");
        }
        if self.brew.is_some() {
            fields.push("brew");
        }
        if self.script.is_some() {
            fields.push("script");
        }
        fields
    }

    /// Configuration-level problems with this entry, if any.
    ///
    /// Package names and script fields are left to the actions' own
    /// validation so they show up in the plan report.
    fn problem(&self, registry: &ActionRegistry) -> Option<String> {
        let fields = self.defined_fields();
        if fields.len() != 1 {
            let found = if fields.is_empty() {
                "none".to_string()
            } else {
                fields.join(", ")
            };
            return Some(format!(
                "must define exactly one of action, brew, script (found {})",
                found
            ));
        }

        let name = self.action.as_deref()?;
        match registry.get(name) {
            None => Some(format!(
                "unknown action '{}' (available: {})",
                name,
                registry.public_names().join(", ")
            )),
            Some(action) if !action.is_public() => Some(format!(
                "action '{}' is internal and cannot be used in gum.yml",
                name
            )),
            Some(_) => None,
        }
    }

    fn to_action(&self, registry: &ActionRegistry) -> Result<Action> {
        if let Some(problem) = self.problem(registry) {
            return Err(GumError::config(problem));
        }

        let context = registry.context();
        if let Some(name) = &self.action {
            registry
                .resolve(name)
                .ok_or_else(|| GumError::config(format!("unknown action '{}'", name)))
        } else if let Some(packages) = &self.brew {
            Ok(BrewAction::new(packages.clone(), context).into())
        } else if let Some(definition) = &self.script {
            Ok(ScriptAction::new(definition.clone(), context.runner.clone()).into())
        } else {
            Err(GumError::config("empty entry"))
        }
    }
}

impl GumConfig {
    /// Locate the config file in `dir`.
    pub fn find(dir: &Path) -> Result<PathBuf> {
        CONFIG_FILENAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
            .ok_or_else(|| {
                GumError::config(format!(
                    "no {} found in {}",
                    CONFIG_FILENAMES.join(" or "),
                    dir.display()
                ))
            })
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            GumError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_yaml(&content)?;
        debug!("Loaded {} entries from {}", config.up.len(), path.display());
        Ok(config)
    }

    /// Find and load the config file in `dir`.
    pub fn load_from_dir(dir: &Path) -> Result<(PathBuf, Self)> {
        let path = Self::find(dir)?;
        let config = Self::load_from_file(&path)?;
        Ok((path, config))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty file parses as null
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check every entry against `registry`, reporting all problems at once.
    pub fn validate(&self, registry: &ActionRegistry) -> Result<()> {
        let problems: Vec<String> = self
            .up
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| {
                entry
                    .problem(registry)
                    .map(|problem| format!("up[{}]: {}", i, problem))
            })
            .collect();

        if problems.is_empty() {
            Ok(())
        } else {
            Err(GumError::config(format!(
                "invalid gum.yml:\n  - {}",
                problems.join("\n  - ")
            )))
        }
    }

    /// Resolve entries into root actions, one per entry, in file order.
    pub fn root_actions(&self, registry: &ActionRegistry) -> Result<Vec<Action>> {
        self.up
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                entry
                    .to_action(registry)
                    .map_err(|e| GumError::config(format!("up[{}]: {}", i, e)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionContext;
    use crate::command::testing::ScriptedRunner;
    use crate::engine::Plan;
    use crate::platform::Platform;

    fn registry() -> ActionRegistry {
        ActionRegistry::builtin(&ActionContext::new(ScriptedRunner::new(), "/tmp", "/nonexistent"))
    }

    const SAMPLE: &str = r#"
up:
  - action: golang
  - brew:
      - name: jq
      - name: iterm2
        cask: true
      - name: openssl@3
        link: true
  - script:
      title: Create scratch dir
      command: mkdir -p ~/scratch
      test: test -d ~/scratch
"#;

    #[test]
    fn test_parse_all_entry_kinds() {
        let config = GumConfig::from_yaml(SAMPLE).unwrap();
        assert_eq!(config.up.len(), 3);
        assert_eq!(config.up[0], UpEntry::named("golang"));

        let packages = config.up[1].brew.as_ref().unwrap();
        assert_eq!(packages.len(), 3);
        assert!(packages[1].cask);
        assert!(packages[2].link);
        assert!(!packages[0].cask);

        let script = config.up[2].script.as_ref().unwrap();
        assert_eq!(script.title, "Create scratch dir");
        assert_eq!(script.test.as_deref(), Some("test -d ~/scratch"));
    }

    #[test]
    fn test_root_actions_in_file_order() {
        let registry = registry();
        let config = GumConfig::from_yaml(SAMPLE).unwrap();
        config.validate(&registry).unwrap();

        let roots = config.root_actions(&registry).unwrap();
        let ids: Vec<String> = roots.iter().map(|a| a.identifier().to_string()).collect();
        assert_eq!(ids, vec!["golang", "brew-jq-iterm2-openssl@3", "Create scratch dir"]);
    }

    #[test]
    fn test_validate_reports_every_bad_entry() {
        let config = GumConfig {
            up: vec![
                UpEntry::named("nodejs"),
                UpEntry::default(),
                UpEntry::named("brew_ensure"),
                UpEntry {
                    action: Some("golang".into()),
                    brew: Some(vec![Package::new("jq")]),
                    script: None,
                },
                UpEntry::named("ruby"),
            ],
        };

        let text = config.validate(&registry()).unwrap_err().to_string();
        assert!(text.contains("up[0]: unknown action 'nodejs' (available: golang, ruby)"));
        assert!(text.contains(
            "up[1]: must define exactly one of action, brew, script (found none)"
        ));
        assert!(text.contains("up[2]: action 'brew_ensure' is internal"));
        assert!(text.contains("(found action, brew)"));
        assert!(!text.contains("up[4]"));
    }

    #[test]
    fn test_empty_package_list_is_left_to_action_validation() {
        let registry = registry();
        let config = GumConfig::from_yaml("up:\n  - brew: []\n").unwrap();
        config.validate(&registry).unwrap();

        let roots = config.root_actions(&registry).unwrap();
        let text = roots[0].validate().unwrap_err().to_string();
        assert!(text.contains("no packages specified"));
    }

    #[test]
    fn test_script_sharing_a_builtin_name_keeps_builtin_dependencies() {
        let registry = registry();
        let config = GumConfig::from_yaml(
            "up:\n  - script:\n      title: ruby\n      command: echo hi\n  - action: ruby\n",
        )
        .unwrap();

        let roots = config.root_actions(&registry).unwrap();
        let plan = Plan::build(&roots, Platform::Linux);
        let ids: Vec<String> = plan.identifiers().iter().map(|i| i.to_string()).collect();
        assert_eq!(ids, vec!["ruby", "Install Homebrew", "brew_ensure", "brew-rbenv"]);
        assert_eq!(plan.iter().next().map(|a| a.name()), Some("script"));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = GumConfig::from_yaml("up:\n  - actoin: golang\n").unwrap_err();
        assert!(matches!(err, GumError::Yaml(_)));
    }

    #[test]
    fn test_empty_file_is_empty_config() {
        assert!(GumConfig::from_yaml("").unwrap().up.is_empty());
        assert!(GumConfig::from_yaml("up: []").unwrap().up.is_empty());
    }

    #[test]
    fn test_find_prefers_yml() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(GumConfig::find(dir.path()), Err(GumError::Config(_))));

        fs::write(dir.path().join("gum.yaml"), "up: []\n").unwrap();
        assert_eq!(GumConfig::find(dir.path()).unwrap(), dir.path().join("gum.yaml"));

        fs::write(dir.path().join("gum.yml"), "up: []\n").unwrap();
        assert_eq!(GumConfig::find(dir.path()).unwrap(), dir.path().join("gum.yml"));
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("gum.yml"), SAMPLE).unwrap();

        let (path, config) = GumConfig::load_from_dir(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("gum.yml"));
        assert_eq!(config.up.len(), 3);
    }

    #[test]
    fn test_yaml_output_parses_back() {
        let config = GumConfig::from_yaml(SAMPLE).unwrap();
        let yaml = config.to_yaml().unwrap();
        assert_eq!(GumConfig::from_yaml(&yaml).unwrap(), config);
    }
}
