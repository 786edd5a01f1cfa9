use std::collections::HashMap;

/// Normalizes a reference name the way targets are matched.
///
/// Case is folded and every run of whitespace becomes a single space, so
/// `` :ref:`Getting  Started` `` finds the target declared as `getting started`.
///
/// # Examples
///
/// ```
/// use xrst_core::slug::normalize_name;
///
/// assert_eq!(normalize_name("  Getting\n  Started "), "getting started");
/// ```
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Converts a name into an identifier usable as a fragment id.
///
/// Letters and digits are kept (lowercased), every other run of characters
/// collapses into one hyphen, and hyphens at either end are dropped.
pub fn make_id(text: &str) -> String {
    let mut id = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for ch in text.chars() {
        if ch.is_alphanumeric() || ch == '_' {
            if pending_hyphen && !id.is_empty() {
                id.push('-');
            }
            pending_hyphen = false;
            for lower in ch.to_lowercase() {
                id.push(lower);
            }
        } else {
            pending_hyphen = true;
        }
    }

    id
}

/// Id generator that keeps ids unique within one document.
#[derive(Debug, Clone, Default)]
pub struct Slugger {
    counts: HashMap<String, usize>,
}

impl Slugger {
    /// Creates a new slugger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates the next unique id for the given text.
    ///
    /// Text without any letters or digits falls back to `section`.
    pub fn next_id(&mut self, text: &str) -> String {
        let mut id = make_id(text);
        if id.is_empty() {
            id.push_str("section");
        }

        let entry = self.counts.entry(id.clone()).or_insert(0);
        if *entry > 0 {
            id.push_str(&format!("-{}", *entry));
        }
        *entry += 1;

        id
    }

    /// Forgets every id handed out so far.
    pub fn clear(&mut self) {
        self.counts.clear();
    }
}
