//! Error types for pixrepo-tile

/// Result type for pixrepo-tile operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tile iteration and tile access
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Dimension {axis} must be at least 1")]
    EmptyExtent { axis: &'static str },

    #[error("Tile bounds must be at least 1x1, got {width}x{height}")]
    InvalidTileSize { width: u32, height: u32 },

    #[error("Tile access failed: {message}")]
    Access { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn access(message: impl Into<String>) -> Self {
        Self::Access {
            message: message.into(),
        }
    }
}
