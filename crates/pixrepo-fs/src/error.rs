//! Error types for pixrepo-fs

use std::path::PathBuf;

/// Result type for pixrepo-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in transformation, allocation, and
/// configuration operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Path(#[from] pixrepo_path::Error),

    #[error("Failed to parse {format} config at {path:?}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported config format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Repository base directory does not exist: {path:?}")]
    BaseDirMissing { path: PathBuf },

    #[error("Client path depth must be at least 1")]
    InvalidClientDepth,

    #[error("Servant ceiling must be at least 1")]
    InvalidServantCeiling,

    #[error("Tile bounds must be at least 1x1, got {width}x{height}")]
    InvalidTileBounds { width: u32, height: u32 },

    #[error("No naming-rule tables selected")]
    NoRulesSelected,

    #[error("Host path {path:?} lies outside the repository root {base:?}")]
    OutsideRepository { path: PathBuf, base: PathBuf },

    #[error("File set cannot be disambiguated at any depth: {path:?} occurs more than once")]
    NotUnique { path: String },

    #[error("Directory {path:?} already claimed by a concurrent allocator")]
    ClaimCollision { path: PathBuf },

    #[error("Claim of {path:?} failed although the directory is still available")]
    ClaimInconsistent { path: PathBuf },

    #[error("Gave up claiming a directory after contending past index {last_index}")]
    ContentionTimeout { last_index: u64 },

    #[error("Candidate index search exhausted the index space")]
    IndexSpaceExhausted,
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
