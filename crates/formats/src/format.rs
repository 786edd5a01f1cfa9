//! A [`Format`] whose directives come from a [`RegistryConfig`].

use crate::directives::{AdmonitionDirective, CodeBlockDirective, IncludeDirective};
use crate::error::ConfigError;
use crate::registry::{RegistryConfig, default_registry};
use std::sync::Arc;
use xrst_core::{Directive, Format};

/// Format built from a registry configuration.
#[derive(Debug, Clone)]
pub struct ConfiguredFormat {
    name: String,
    config: RegistryConfig,
    include: Option<IncludeDirective>,
}

impl ConfiguredFormat {
    /// Creates a format after validating `config`.
    pub fn new(name: impl Into<String>, config: RegistryConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            name: name.into(),
            config,
            include: None,
        })
    }

    /// The default registry under the name "default".
    pub fn standard() -> Self {
        Self {
            name: "default".to_string(),
            config: default_registry(),
            include: None,
        }
    }

    /// Enables `.. include::` with the given directive.
    pub fn with_include(mut self, include: IncludeDirective) -> Self {
        self.include = Some(include);
        self
    }

    /// The configuration this format was built from.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}

impl Format for ConfiguredFormat {
    fn name(&self) -> &str {
        &self.name
    }

    fn directives(&self) -> Vec<Arc<dyn Directive>> {
        let mut directives: Vec<Arc<dyn Directive>> = self
            .config
            .admonitions
            .iter()
            .cloned()
            .map(|mapping| Arc::new(AdmonitionDirective::new(mapping)) as Arc<dyn Directive>)
            .collect();
        if let Some(code) = &self.config.code_block {
            directives.push(Arc::new(CodeBlockDirective::new(code.clone())));
        }
        if let Some(include) = &self.include {
            directives.push(Arc::new(include.clone()));
        }
        log::debug!("Format \"{}\" provides {} directives", self.name, directives.len());
        directives
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::AdmonitionMapping;

    #[test]
    fn standard_format_provides_every_directive() {
        let format = ConfiguredFormat::standard();
        let names: Vec<String> = format
            .directives()
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        assert_eq!(names.len(), 11);
        assert!(names.contains(&"note".to_string()));
        assert!(names.contains(&"code-block".to_string()));
        assert!(!names.contains(&"include".to_string()));
    }

    #[test]
    fn include_is_opt_in() {
        let format = ConfiguredFormat::standard().with_include(IncludeDirective::new(|_| Ok(String::new())));
        assert!(format.directives().iter().any(|d| d.name() == "include"));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = RegistryConfig {
            admonitions: vec![AdmonitionMapping::new("note"), AdmonitionMapping::new("note")],
            code_block: None,
        };
        assert!(matches!(
            ConfiguredFormat::new("broken", config),
            Err(ConfigError::DuplicateDirective(_))
        ));
    }
}
