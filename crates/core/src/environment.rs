//! Per-document parsing context.
//!
//! An [`Environment`] accumulates what a document declares while it is being
//! parsed: the title adornment hierarchy, section numbers and anchors. It is
//! owned by the caller and handed to the parser as a [`SharedEnvironment`], so
//! nested parses of included content can keep accumulating into it.

use crate::slug::{Slugger, normalize_name};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Adornment style of a section title: the character plus whether an
/// overline was used. `=` with overline and `=` without are distinct levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TitleStyle {
    /// Adornment character.
    pub marker: char,
    /// Whether the title has an overline.
    pub overline: bool,
}

impl TitleStyle {
    /// Creates a title style.
    pub fn new(marker: char, overline: bool) -> Self {
        Self { marker, overline }
    }
}

/// Adornment hierarchy, discovered in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleHierarchy {
    styles: Vec<TitleStyle>,
}

impl TitleHierarchy {
    /// Returns the 1-based level of `style`, assigning the next level when the
    /// style has not been seen before.
    pub fn level_of(&mut self, style: TitleStyle) -> usize {
        if let Some(pos) = self.styles.iter().position(|s| *s == style) {
            return pos + 1;
        }
        self.styles.push(style);
        self.styles.len()
    }

    /// Number of levels discovered so far.
    pub fn depth(&self) -> usize {
        self.styles.len()
    }
}

/// An anchor a reference can point at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// Fragment id.
    pub id: String,
    /// Title text shown when a reference has no label.
    pub title: String,
    /// Document the anchor lives in.
    pub document: Option<String>,
    /// Destination of a target that points outside the project.
    pub url: Option<String>,
}

/// Mutable state of one top-level parse.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    current_file: Option<String>,
    titles: TitleHierarchy,
    section_counters: Vec<usize>,
    anchors: BTreeMap<String, Anchor>,
    slugger: Slugger,
    documents: BTreeMap<String, String>,
}

impl Environment {
    /// Creates an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all per-document state.
    ///
    /// The document index filled through [`register_document`](Self::register_document)
    /// describes the project rather than one document and survives a reset.
    pub fn reset(&mut self) {
        self.current_file = None;
        self.titles = TitleHierarchy::default();
        self.section_counters.clear();
        self.anchors.clear();
        self.slugger.clear();
    }

    /// Binds the identity of the document being parsed.
    pub fn set_current_file(&mut self, file: impl Into<String>) {
        self.current_file = Some(file.into());
    }

    /// Identity of the document being parsed.
    pub fn current_file(&self) -> Option<&str> {
        self.current_file.as_deref()
    }

    /// Returns the level for a title style, discovering it if new.
    pub fn title_level(&mut self, style: TitleStyle) -> usize {
        self.titles.level_of(style)
    }

    /// The adornment hierarchy seen so far.
    pub fn title_hierarchy(&self) -> &TitleHierarchy {
        &self.titles
    }

    /// Advances the section counter at `level` and returns the full number.
    ///
    /// Counters of deeper levels restart when a shallower section begins.
    pub fn next_section_number(&mut self, level: usize) -> Vec<usize> {
        let level = level.max(1);
        self.section_counters.resize(level, 0);
        self.section_counters[level - 1] += 1;
        self.section_counters.clone()
    }

    /// Registers an anchor under its normalized name and returns its id.
    ///
    /// A name registered twice keeps its first anchor; the second declaration
    /// still gets a unique id so fragment ids never collide.
    pub fn register_anchor(&mut self, name: &str, title: &str) -> String {
        let id = self.slugger.next_id(name);
        self.anchors
            .entry(normalize_name(name))
            .or_insert_with(|| Anchor {
                id: id.clone(),
                title: title.to_string(),
                document: self.current_file.clone(),
                url: None,
            });
        id
    }

    /// Registers a target that points at an external URL.
    pub fn register_external_target(&mut self, name: &str, url: &str) {
        let id = self.slugger.next_id(name);
        self.anchors.insert(
            normalize_name(name),
            Anchor {
                id,
                title: name.to_string(),
                document: None,
                url: Some(url.to_string()),
            },
        );
    }

    /// Replaces the display title of an anchor, e.g. once the section a
    /// target precedes has been read.
    pub fn set_anchor_title(&mut self, name: &str, title: &str) {
        if let Some(anchor) = self.anchors.get_mut(&normalize_name(name)) {
            anchor.title = title.to_string();
        }
    }

    /// Looks up an anchor by (unnormalized) name.
    pub fn anchor(&self, name: &str) -> Option<&Anchor> {
        self.anchors.get(&normalize_name(name))
    }

    /// Every anchor registered since the last reset.
    pub fn anchors(&self) -> impl Iterator<Item = (&str, &Anchor)> {
        self.anchors.iter().map(|(name, anchor)| (name.as_str(), anchor))
    }

    /// Adds a document of the project to the index used by the `doc` role.
    pub fn register_document(&mut self, path: impl Into<String>, title: impl Into<String>) {
        self.documents.insert(path.into(), title.into());
    }

    /// Title of an indexed document.
    pub fn document(&self, path: &str) -> Option<&str> {
        self.documents.get(path).map(String::as_str)
    }
}

/// Handle through which the caller and the parser share one [`Environment`].
///
/// Guards returned by [`lock`](Self::lock) must not be held across a nested
/// parse; the parser locks the environment itself while it records titles
/// and anchors.
#[derive(Debug, Clone, Default)]
pub struct SharedEnvironment {
    inner: Arc<Mutex<Environment>>,
}

impl SharedEnvironment {
    /// Wraps an environment.
    pub fn new(environment: Environment) -> Self {
        Self {
            inner: Arc::new(Mutex::new(environment)),
        }
    }

    /// Locks the environment.
    ///
    /// A panic in another holder does not leave the environment in a state
    /// the parser cannot continue from, so poisoning is ignored.
    pub fn lock(&self) -> MutexGuard<'_, Environment> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether both handles point at the same environment.
    pub fn ptr_eq(&self, other: &SharedEnvironment) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl From<Environment> for SharedEnvironment {
    fn from(environment: Environment) -> Self {
        Self::new(environment)
    }
}
