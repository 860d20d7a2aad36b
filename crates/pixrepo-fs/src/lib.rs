//! Host-path transformation and directory allocation
//!
//! Sits between the naming core and the host filesystem: client- and
//! server-side path transformers, race-safe next-directory allocation,
//! and the repository configuration surface.

pub mod alloc;
pub mod config;
pub mod error;
pub mod repository;
pub mod transform;

pub use alloc::{DirSlots, NextDirAllocator, NumberedDirSlots};
pub use config::RepositoryConfig;
pub use error::{Error, Result};
pub use repository::Repository;
pub use transform::{ClientPathTransformer, ServerPathTransformer};
