//! Deterministic component sanitization

use crate::{NamingRules, RepoPath};

/// A pure string-to-string transform derived from a [`NamingRules`].
///
/// `apply` is idempotent: sanitizing an already-sanitized component is
/// a no-op.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    rules: NamingRules,
}

impl Sanitizer {
    pub fn new(rules: NamingRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &NamingRules {
        &self.rules
    }

    /// Rewrite one path component into a compliant name.
    ///
    /// Steps, in order: a wholly forbidden name gets the safe character
    /// appended; a forbidden prefix gets it prepended; a forbidden
    /// suffix gets it appended; every forbidden code point is replaced
    /// by its deterministic substitute.
    pub fn apply(&self, component: &str) -> String {
        let safe = self.rules.safe_character();
        let mut out = component.to_string();
        if self.rules.is_unsafe_name(&out) {
            out.push(safe);
        }
        if self.rules.matching_prefixes(&out).next().is_some() {
            out.insert(0, safe);
        }
        if self.rules.matching_suffixes(&out).next().is_some() {
            out.push(safe);
        }
        out.chars()
            .map(|ch| self.rules.replacement_for(ch).unwrap_or(ch))
            .collect()
    }

    /// True if sanitizing the component would change nothing.
    pub fn is_clean(&self, component: &str) -> bool {
        self.apply(component) == component
    }

    /// Sanitize every component of a path.
    pub fn apply_path(&self, path: &RepoPath) -> RepoPath {
        path.transform(|component| self.apply(component))
    }
}
