//! Error types for pixrepo-path

use std::path::PathBuf;

/// Result type for pixrepo-path operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in path and naming-rule operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Could not resolve host path {path:?}: {source}")]
    Unresolvable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid path component {component:?}: {reason}")]
    InvalidComponent { component: String, reason: String },

    #[error("Truncation depth must be at least 1")]
    InvalidDepth,

    #[error("Rule sets cannot be combined: {reason}")]
    IrreconcilableRules { reason: String },

    #[error(
        "Path {path:?} violates naming rules \
         (code points: {code_points:?}, prefixes: {prefixes:?}, \
         suffixes: {suffixes:?}, names: {names:?})"
    )]
    NamingViolation {
        path: String,
        code_points: Vec<char>,
        prefixes: Vec<String>,
        suffixes: Vec<String>,
        names: Vec<String>,
    },
}

impl Error {
    pub fn unresolvable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Unresolvable {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_component(component: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidComponent {
            component: component.into(),
            reason: reason.into(),
        }
    }
}
