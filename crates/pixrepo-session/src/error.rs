//! Error types for pixrepo-session

/// Result type for pixrepo-session operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in servant-registry operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Servant registry is at its configured ceiling of {limit} entries")]
    OverQuota { limit: usize },
}
