//! Repository-relative paths and naming rules
//!
//! Provides the path-naming core of the pixel repository: immutable
//! repository-relative paths, combinable platform naming-rule sets,
//! idempotent component sanitization, and full-diagnostic validation.

pub mod error;
pub mod path;
pub mod rules;
pub mod sanitize;
pub mod validate;

pub use error::{Error, Result};
pub use path::{RepoPath, SEPARATOR};
pub use rules::{NamingRules, RuleTable};
pub use sanitize::Sanitizer;
pub use validate::PathValidator;
