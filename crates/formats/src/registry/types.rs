//! Registry type definitions for directive mappings.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which directives a [`ConfiguredFormat`](crate::ConfiguredFormat) provides.
///
/// Loaded from JSON or YAML, or built in code starting from
/// [`default_registry`](super::defaults::default_registry).
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegistryConfig {
    /// Admonition directives (note, warning, ...).
    #[serde(default)]
    pub admonitions: Vec<AdmonitionMapping>,
    /// The literal code directive, if enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_block: Option<CodeBlockConfig>,
}

/// One admonition directive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdmonitionMapping {
    /// Directive name (e.g. "note").
    pub directive: String,
    /// Other names for the same directive.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// Kind recorded on the node; defaults to the directive name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Fixed title; otherwise the directive has none unless `title_required`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// The directive argument is the title and must be present, as for the
    /// generic `admonition` directive.
    #[serde(default)]
    pub title_required: bool,
}

impl AdmonitionMapping {
    /// A mapping whose kind is the directive name.
    pub fn new(directive: impl Into<String>) -> Self {
        Self {
            directive: directive.into(),
            aliases: Vec::new(),
            kind: None,
            title: None,
            title_required: false,
        }
    }

    /// Kind recorded on the node.
    pub fn kind(&self) -> &str {
        self.kind.as_deref().unwrap_or(&self.directive)
    }
}

/// The code directive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CodeBlockConfig {
    /// Directive name.
    #[serde(default = "default_code_block_name")]
    pub directive: String,
    /// Other names for the same directive.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Language used when the directive has no argument.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_language: Option<String>,
}

fn default_code_block_name() -> String {
    "code-block".to_string()
}

impl Default for CodeBlockConfig {
    fn default() -> Self {
        Self {
            directive: default_code_block_name(),
            aliases: vec!["code".to_string(), "sourcecode".to_string()],
            default_language: None,
        }
    }
}

impl RegistryConfig {
    /// Parses a JSON config and validates it.
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a YAML config and validates it.
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that no directive name or alias is claimed twice.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for name in self.directive_names() {
            if !seen.insert(name.to_lowercase()) {
                return Err(ConfigError::DuplicateDirective(name.to_string()));
            }
        }
        Ok(())
    }

    /// Every configured directive name and alias, in declaration order.
    pub fn directive_names(&self) -> Vec<&str> {
        let admonitions = self.admonitions.iter().flat_map(|m| {
            std::iter::once(m.directive.as_str()).chain(m.aliases.iter().map(String::as_str))
        });
        let code = self.code_block.iter().flat_map(|c| {
            std::iter::once(c.directive.as_str()).chain(c.aliases.iter().map(String::as_str))
        });
        admonitions.chain(code).collect()
    }

    /// Check if a directive name is configured.
    pub fn is_supported_directive(&self, name: &str) -> bool {
        self.directive_names()
            .iter()
            .any(|n| n.eq_ignore_ascii_case(name))
    }

    /// The admonition answering to `name`.
    pub fn get_admonition(&self, name: &str) -> Option<&AdmonitionMapping> {
        self.admonitions.iter().find(|m| {
            m.directive.eq_ignore_ascii_case(name)
                || m.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_config_with_defaults() {
        let config = RegistryConfig::from_json(
            r#"{
                "admonitions": [
                    { "directive": "note", "aliases": ["memo"] },
                    { "directive": "admonition", "titleRequired": true }
                ],
                "codeBlock": {}
            }"#,
        )
        .unwrap();

        assert_eq!(config.admonitions.len(), 2);
        assert_eq!(config.get_admonition("MEMO").unwrap().kind(), "note");
        assert!(config.admonitions[1].title_required);
        let code = config.code_block.as_ref().unwrap();
        assert_eq!(code.directive, "code-block");
        assert!(code.aliases.is_empty());
        assert!(config.is_supported_directive("code-block"));
    }

    #[test]
    fn yaml_config() {
        let config = RegistryConfig::from_yaml(
            "admonitions:\n  - directive: warning\n    kind: caution\n    title: Careful\n",
        )
        .unwrap();
        let warning = config.get_admonition("warning").unwrap();
        assert_eq!(warning.kind(), "caution");
        assert_eq!(warning.title.as_deref(), Some("Careful"));
        assert!(config.code_block.is_none());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = RegistryConfig::from_json(
            r#"{ "admonitions": [ { "directive": "note" }, { "directive": "tip", "aliases": ["Note"] } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateDirective(name) if name == "Note"));
    }

    #[test]
    fn malformed_input_is_reported() {
        assert!(matches!(
            RegistryConfig::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            RegistryConfig::from_yaml("admonitions: 3"),
            Err(ConfigError::Yaml(_))
        ));
    }
}
