//! Session-scoped servant registry
//!
//! Maps opaque per-session identities to server-side handler objects,
//! with named per-key locks and a hard cap on entries.

pub mod error;
pub mod registry;

pub use error::{Error, Result};
pub use registry::{KeyGuard, ServantRegistry};
