//! Inline role resolution.
//!
//! Interpreted text such as `` :ref:`intro` `` or `` :doc:`guide/install` `` is
//! resolved by the [`Reference`] registered for its role. Role-less text
//! (`` `intro` ``) goes to the default role.

use crate::environment::{Anchor, Environment};
use crate::slug::normalize_name;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Interpreted text handed to a [`Reference`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceInvocation {
    /// Role the text was written with, or the default role's name.
    pub role: String,
    /// Target as written.
    pub target: String,
    /// Explicit link text from `label <target>` syntax.
    pub label: Option<String>,
}

/// Successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedReference {
    /// Link destination.
    pub url: String,
    /// Link text.
    pub text: String,
}

/// What a reference may consult while resolving: anchors declared by the
/// document being parsed and, when one is bound, the environment.
pub struct ResolveScope<'a> {
    local_anchors: &'a BTreeMap<String, Anchor>,
    environment: Option<&'a Environment>,
}

impl<'a> ResolveScope<'a> {
    /// Creates a scope.
    pub fn new(
        local_anchors: &'a BTreeMap<String, Anchor>,
        environment: Option<&'a Environment>,
    ) -> Self {
        Self {
            local_anchors,
            environment,
        }
    }

    /// Finds an anchor, preferring the document's own declarations.
    pub fn anchor(&self, name: &str) -> Option<&'a Anchor> {
        self.local_anchors
            .get(&normalize_name(name))
            .or_else(|| self.environment.and_then(|env| env.anchor(name)))
    }

    /// Title of an indexed document.
    pub fn document(&self, path: &str) -> Option<&'a str> {
        self.environment.and_then(|env| env.document(path))
    }

    /// Identity of the document being parsed.
    pub fn current_file(&self) -> Option<&'a str> {
        self.environment.and_then(Environment::current_file)
    }
}

/// An inline-role extension point.
pub trait Reference: Send + Sync {
    /// Role name this reference resolves.
    fn role(&self) -> &str;

    /// Whether this reference also serves role-less interpreted text.
    fn is_default(&self) -> bool {
        false
    }

    /// Resolves the invocation, or returns `None` when the target is unknown.
    fn resolve(
        &self,
        scope: &ResolveScope<'_>,
        invocation: &ReferenceInvocation,
    ) -> Option<ResolvedReference>;
}

/// The built-in document/anchor reference.
///
/// Registered twice by every parser: as `doc` (targets are document paths)
/// and as `ref`, the default role (targets are anchor names).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Doc {
    role: String,
    default: bool,
}

impl Doc {
    /// The `doc` role.
    pub fn new() -> Self {
        Self::with_role("doc", false)
    }

    /// A `Doc` reference under another role, optionally as the default.
    pub fn with_role(role: impl Into<String>, default: bool) -> Self {
        Self {
            role: role.into(),
            default,
        }
    }

    fn resolve_document(
        scope: &ResolveScope<'_>,
        invocation: &ReferenceInvocation,
    ) -> Option<ResolvedReference> {
        let path = invocation.target.trim().trim_end_matches(".rst");
        let title = scope.document(path)?;
        Some(ResolvedReference {
            url: format!("{}.html", path),
            text: invocation
                .label
                .clone()
                .unwrap_or_else(|| title.to_string()),
        })
    }

    fn resolve_anchor(
        scope: &ResolveScope<'_>,
        invocation: &ReferenceInvocation,
    ) -> Option<ResolvedReference> {
        let anchor = scope.anchor(&invocation.target)?;
        let url = match (&anchor.url, anchor.document.as_deref()) {
            (Some(url), _) => url.clone(),
            (None, Some(document)) if Some(document) != scope.current_file() => {
                format!("{}.html#{}", document, anchor.id)
            }
            (None, _) => format!("#{}", anchor.id),
        };
        Some(ResolvedReference {
            url,
            text: invocation
                .label
                .clone()
                .unwrap_or_else(|| anchor.title.clone()),
        })
    }
}

impl Default for Doc {
    fn default() -> Self {
        Self::new()
    }
}

impl Reference for Doc {
    fn role(&self) -> &str {
        &self.role
    }

    fn is_default(&self) -> bool {
        self.default
    }

    fn resolve(
        &self,
        scope: &ResolveScope<'_>,
        invocation: &ReferenceInvocation,
    ) -> Option<ResolvedReference> {
        if self.role == "doc" {
            Self::resolve_document(scope, invocation)
        } else {
            Self::resolve_anchor(scope, invocation)
        }
    }
}

/// References keyed by role.
#[derive(Clone, Default)]
pub struct ReferenceRegistry {
    entries: HashMap<String, Arc<dyn Reference>>,
    default_role: Option<String>,
}

impl ReferenceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a reference under its role, replacing any previous one.
    ///
    /// The first default-capable reference claims the default role. A later
    /// reference only takes over role-less lookups by replacing that role.
    pub fn register(&mut self, reference: Arc<dyn Reference>) {
        let role = reference.role().to_string();
        if reference.is_default() && self.default_role.is_none() {
            self.default_role = Some(role.clone());
        }
        if self.entries.insert(role.clone(), reference).is_some() {
            log::debug!("Reference role \"{}\" re-registered", role);
        }
    }

    /// Looks up a role; `None` asks for the default role.
    pub fn get(&self, role: Option<&str>) -> Option<&Arc<dyn Reference>> {
        match role {
            Some(role) => self.entries.get(role),
            None => self
                .default_role
                .as_deref()
                .and_then(|role| self.entries.get(role)),
        }
    }

    /// Name of the default role.
    pub fn default_role(&self) -> Option<&str> {
        self.default_role.as_deref()
    }

    /// Registered roles, sorted.
    pub fn roles(&self) -> Vec<&str> {
        let mut roles: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        roles.sort_unstable();
        roles
    }

    /// Number of registered roles.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no role is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ReferenceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReferenceRegistry")
            .field("roles", &self.roles())
            .field("default_role", &self.default_role)
            .finish()
    }
}

/// A reference registry shared by a parser and its sub-parsers.
///
/// Registrations through any handle are visible through every other handle.
#[derive(Debug, Clone, Default)]
pub struct SharedReferenceRegistry {
    inner: Arc<RwLock<ReferenceRegistry>>,
}

impl SharedReferenceRegistry {
    /// Wraps a registry.
    pub fn new(registry: ReferenceRegistry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    /// Read access.
    pub fn read(&self) -> RwLockReadGuard<'_, ReferenceRegistry> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write access.
    pub fn write(&self) -> RwLockWriteGuard<'_, ReferenceRegistry> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a reference.
    pub fn register(&self, reference: Arc<dyn Reference>) {
        self.write().register(reference);
    }

    /// Whether both handles share one registry.
    pub fn ptr_eq(&self, other: &SharedReferenceRegistry) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation(role: &str, target: &str, label: Option<&str>) -> ReferenceInvocation {
        ReferenceInvocation {
            role: role.into(),
            target: target.into(),
            label: label.map(Into::into),
        }
    }

    #[test]
    fn builtins_claim_default_in_order() {
        let mut registry = ReferenceRegistry::new();
        registry.register(Arc::new(Doc::new()));
        registry.register(Arc::new(Doc::with_role("ref", true)));
        registry.register(Arc::new(Doc::with_role("other", true)));

        assert_eq!(registry.default_role(), Some("ref"));
        assert_eq!(registry.get(None).unwrap().role(), "ref");
        assert_eq!(registry.roles(), vec!["doc", "other", "ref"]);
        assert!(registry.get(Some("missing")).is_none());
    }

    #[test]
    fn replacing_default_role_by_name() {
        let mut registry = ReferenceRegistry::new();
        registry.register(Arc::new(Doc::with_role("ref", true)));
        let replacement: Arc<dyn Reference> = Arc::new(Doc::with_role("ref", false));
        registry.register(Arc::clone(&replacement));

        assert!(Arc::ptr_eq(registry.get(None).unwrap(), &replacement));
    }

    #[test]
    fn ref_resolves_local_then_environment() {
        let mut env = Environment::new();
        env.set_current_file("index");
        env.register_anchor("Install", "Installation");

        let mut local = BTreeMap::new();
        local.insert(
            "intro".to_string(),
            Anchor {
                id: "intro".into(),
                title: "Introduction".into(),
                document: Some("index".into()),
                url: None,
            },
        );
        let scope = ResolveScope::new(&local, Some(&env));
        let reference = Doc::with_role("ref", true);

        let resolved = reference
            .resolve(&scope, &invocation("ref", "intro", None))
            .unwrap();
        assert_eq!(resolved.url, "#intro");
        assert_eq!(resolved.text, "Introduction");

        let resolved = reference
            .resolve(&scope, &invocation("ref", "install", Some("here")))
            .unwrap();
        assert_eq!(resolved.url, "#install");
        assert_eq!(resolved.text, "here");

        assert!(reference.resolve(&scope, &invocation("ref", "nope", None)).is_none());
    }

    #[test]
    fn ref_to_other_document_links_across() {
        let mut env = Environment::new();
        env.set_current_file("guide");
        env.register_anchor("setup", "Setup");
        env.set_current_file("index");

        let local = BTreeMap::new();
        let scope = ResolveScope::new(&local, Some(&env));
        let resolved = Doc::with_role("ref", true)
            .resolve(&scope, &invocation("ref", "setup", None))
            .unwrap();
        assert_eq!(resolved.url, "guide.html#setup");
    }

    #[test]
    fn doc_resolves_indexed_documents() {
        let mut env = Environment::new();
        env.register_document("guide/install", "Installation");
        let local = BTreeMap::new();
        let scope = ResolveScope::new(&local, Some(&env));

        let resolved = Doc::new()
            .resolve(&scope, &invocation("doc", "guide/install.rst", None))
            .unwrap();
        assert_eq!(resolved.url, "guide/install.html");
        assert_eq!(resolved.text, "Installation");
        assert!(Doc::new().resolve(&scope, &invocation("doc", "missing", None)).is_none());

        let unbound = ResolveScope::new(&local, None);
        assert!(Doc::new()
            .resolve(&unbound, &invocation("doc", "guide/install", None))
            .is_none());
    }

    #[test]
    fn shared_registry_handles_alias() {
        let shared = SharedReferenceRegistry::default();
        let other = shared.clone();
        other.register(Arc::new(Doc::new()));
        assert_eq!(shared.read().len(), 1);
        assert!(shared.ptr_eq(&other));
    }
}
