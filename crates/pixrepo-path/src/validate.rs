//! Path validation against a naming-rule set

use std::collections::BTreeSet;

use crate::{Error, NamingRules, RepoPath, Result};

/// Checks every component of a path against a [`NamingRules`] and
/// reports all violations at once rather than failing fast.
#[derive(Debug, Clone)]
pub struct PathValidator {
    rules: NamingRules,
}

impl PathValidator {
    pub fn new(rules: NamingRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &NamingRules {
        &self.rules
    }

    /// Walk every component and code point, accumulating all violated
    /// code points, prefixes, suffixes, and names.
    ///
    /// On any violation returns [`Error::NamingViolation`] carrying the
    /// four collections plus the offending canonical path string.
    pub fn validate(&self, path: &RepoPath) -> Result<()> {
        let mut code_points = BTreeSet::new();
        let mut prefixes = BTreeSet::new();
        let mut suffixes = BTreeSet::new();
        let mut names = BTreeSet::new();

        for component in path.components() {
            if self.rules.is_unsafe_name(component) {
                names.insert(component.clone());
            }
            prefixes.extend(self.rules.matching_prefixes(component).map(str::to_string));
            suffixes.extend(self.rules.matching_suffixes(component).map(str::to_string));
            code_points.extend(self.rules.matching_code_points(component));
        }

        if code_points.is_empty() && prefixes.is_empty() && suffixes.is_empty() && names.is_empty()
        {
            return Ok(());
        }
        tracing::debug!(path = %path, "path rejected by naming rules");
        Err(Error::NamingViolation {
            path: path.to_string(),
            code_points: code_points.into_iter().collect(),
            prefixes: prefixes.into_iter().collect(),
            suffixes: suffixes.into_iter().collect(),
            names: names.into_iter().collect(),
        })
    }
}
