//! Default registry configuration.
//!
//! The standard admonitions plus the code directive, as a starting point when
//! no custom registry is provided.

use super::types::{AdmonitionMapping, CodeBlockConfig, RegistryConfig};

/// Names of the specific admonitions in the default registry.
const STANDARD_ADMONITIONS: &[&str] = &[
    "attention",
    "caution",
    "danger",
    "error",
    "hint",
    "important",
    "note",
    "tip",
    "warning",
];

/// Creates the default registry configuration.
///
/// # Example
///
/// ```
/// use xrst_formats::registry::defaults::default_registry;
///
/// let registry = default_registry();
/// assert!(registry.is_supported_directive("note"));
/// assert!(registry.is_supported_directive("code"));
/// ```
pub fn default_registry() -> RegistryConfig {
    let mut admonitions: Vec<AdmonitionMapping> = STANDARD_ADMONITIONS
        .iter()
        .map(|name| AdmonitionMapping::new(*name))
        .collect();
    admonitions.push(AdmonitionMapping {
        title_required: true,
        ..AdmonitionMapping::new("admonition")
    });

    RegistryConfig {
        admonitions,
        code_block: Some(CodeBlockConfig::default()),
    }
}

/// Directive names the default registry answers to.
pub fn default_supported_directives() -> Vec<&'static str> {
    let mut names = STANDARD_ADMONITIONS.to_vec();
    names.extend(["admonition", "code-block", "code", "sourcecode"]);
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_is_consistent() {
        let registry = default_registry();
        assert!(registry.validate().is_ok());
        for name in default_supported_directives() {
            assert!(registry.is_supported_directive(name), "{} missing", name);
        }
        assert_eq!(
            registry.directive_names().len(),
            default_supported_directives().len()
        );
    }

    #[test]
    fn generic_admonition_requires_a_title() {
        let registry = default_registry();
        assert!(registry.get_admonition("admonition").unwrap().title_required);
        assert!(!registry.get_admonition("note").unwrap().title_required);
        assert!(!registry.is_supported_directive("unknown"));
    }
}
