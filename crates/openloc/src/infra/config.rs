//! Configuration management utilities.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::errors::ConfigError;
use crate::infra::editors::{EditorCatalog, TemplateEditor};

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));

/// Editor selection rules, `name[=regex];...`.
pub const EDITOR_ENV: &str = "OPENLOC_EDITOR";
/// Path of the config file, replacing the per-user default location.
pub const CONFIG_ENV: &str = "OPENLOC_CONFIG";

/// Layered configuration loaded from defaults, the user config file, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
    /// Extra editors, registered on top of the built-in catalog.
    #[serde(default)]
    pub editors: BTreeMap<String, TemplateEditor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defaults {
    /// Editor used when no selection rules are configured.
    #[serde(default = "Defaults::default_editor")]
    pub editor: String,
    /// Selection rules in the same syntax as `OPENLOC_EDITOR`.
    #[serde(default)]
    pub rules: Option<String>,
}

impl Defaults {
    fn default_editor() -> String {
        "vim".to_owned()
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            editor: Self::default_editor(),
            rules: None,
        }
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    editor_rules: Option<String>,
    config_path: Option<PathBuf>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            editor_rules: env::var(EDITOR_ENV)
                .ok()
                .filter(|rules| !rules.trim().is_empty()),
            config_path: env::var_os(CONFIG_ENV).map(PathBuf::from),
        }
    }

    #[cfg(test)]
    fn for_tests(editor_rules: &str) -> Self {
        Self {
            editor_rules: Some(editor_rules.to_owned()),
            config_path: None,
        }
    }
}

impl Config {
    /// Load configuration from defaults, the user config file, and env overrides.
    pub fn load() -> Result<Self> {
        let env = EnvOverrides::from_env();
        let user = env.config_path.clone().or_else(user_config_path);
        Self::load_with_layers(user, env)
    }

    fn load_with_layers(user: Option<PathBuf>, env_overrides: EnvOverrides) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_toml(&DEFAULT_CONFIG)?);

        if let Some(user_path) = user.filter(|path| path.exists()) {
            tracing::debug!(path = %user_path.display(), "loading user config");
            layers.push(Self::from_file(&user_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        Ok(apply_env_overrides(merged, env_overrides))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_toml(&data)
            .with_context(|| format!("invalid config file: {}", path.display()))
    }

    fn from_toml(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        let mut editors = self.editors;
        editors.extend(other.editors);
        Self {
            defaults: merge_defaults(self.defaults, other.defaults),
            editors,
        }
    }

    /// Built-in editors plus the editors defined in configuration.
    pub fn catalog(&self) -> EditorCatalog {
        let mut catalog = EditorCatalog::builtin();
        for (name, editor) in &self.editors {
            catalog.register(name.clone(), editor.clone());
        }
        catalog
    }

    /// Rules choosing an editor per file, falling back to the default editor for everything.
    pub fn editor_rules(&self) -> Result<EditorRules, ConfigError> {
        match &self.defaults.rules {
            Some(text) => EditorRules::parse(text),
            None => Ok(EditorRules::catch_all(&self.defaults.editor)),
        }
    }
}

fn merge_defaults(base: Defaults, overlay: Defaults) -> Defaults {
    Defaults {
        editor: if overlay.editor != Defaults::default_editor() {
            overlay.editor
        } else {
            base.editor
        },
        rules: overlay.rules.or(base.rules),
    }
}

fn user_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("openloc/config.toml"))
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(rules) = env.editor_rules {
        config.defaults.rules = Some(rules);
    }
    config
}

/// One `editor[=pattern]` entry. A rule without a pattern matches every file.
#[derive(Debug, Clone)]
pub struct EditorRule {
    pub editor: String,
    pub pattern: Option<Regex>,
}

impl EditorRule {
    pub fn matches(&self, file_name: &str) -> bool {
        self.pattern
            .as_ref()
            .is_none_or(|pattern| pattern.is_match(file_name))
    }
}

/// Ordered editor selection rules; the first rule matching a file's basename wins.
#[derive(Debug, Clone)]
pub struct EditorRules {
    rules: Vec<EditorRule>,
}

impl EditorRules {
    /// Parse `;`-separated `editor[=regex]` entries. Empty entries are skipped.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut rules = Vec::new();
        for entry in text.split(';').map(str::trim).filter(|entry| !entry.is_empty()) {
            let (editor, pattern) = entry.split_once('=').unwrap_or((entry, ""));
            let editor = editor.trim();
            if editor.is_empty() {
                return Err(ConfigError::InvalidRule {
                    rule: entry.to_owned(),
                    reason: "missing editor name".to_owned(),
                });
            }
            let pattern = if pattern.is_empty() {
                None
            } else {
                Some(Regex::new(pattern).map_err(|err| ConfigError::InvalidRule {
                    rule: entry.to_owned(),
                    reason: err.to_string(),
                })?)
            };
            rules.push(EditorRule {
                editor: editor.to_owned(),
                pattern,
            });
        }
        Ok(Self { rules })
    }

    /// A single rule sending every file to `editor`.
    pub fn catch_all(editor: &str) -> Self {
        Self {
            rules: vec![EditorRule {
                editor: editor.to_owned(),
                pattern: None,
            }],
        }
    }

    pub fn rules(&self) -> &[EditorRule] {
        &self.rules
    }

    /// Editor name for a file with the given basename.
    pub fn select(&self, file_name: &str) -> Result<&str, ConfigError> {
        self.rules
            .iter()
            .find(|rule| rule.matches(file_name))
            .map(|rule| rule.editor.as_str())
            .ok_or_else(|| ConfigError::NoEditorMatches {
                file_name: file_name.to_owned(),
            })
    }
}
