//! N-dimensional tile iteration
//!
//! Walks a 5-dimensional (X, Y, Z, Channel, Time) pixel array in tiles
//! of bounded width and height, driving a pluggable tile-access
//! strategy through a narrow byte-oriented interface. Tiles bound the
//! memory and bandwidth cost of a single I/O operation.

pub mod driver;
pub mod error;
pub mod extents;
pub mod iter;

pub use driver::{TileData, for_each_tile};
pub use error::{Error, Result};
pub use extents::{Extents, TileShape};
pub use iter::{TileRegion, Tiles};
