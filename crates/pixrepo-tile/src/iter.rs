//! The tile descriptor sequence
//!
//! Visits a 5-dimensional array in a fixed nesting order: outermost
//! Time, then Channel, then Z, then tile-row, then tile-column. The
//! order and the exact tile count are part of the contract, so this is
//! an explicit restartable sequence rather than a generator chain.

use crate::{Extents, TileShape};

/// One rectangular tile of one 2D plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRegion {
    /// Zero-based running tile counter
    pub index: u64,
    /// Tile origin within the plane
    pub x: u32,
    pub y: u32,
    /// Actual tile size, truncated at the array boundary
    pub width: u32,
    pub height: u32,
    /// Plane coordinates
    pub z: u32,
    pub c: u32,
    pub t: u32,
}

/// The finite sequence of tiles covering an array.
#[derive(Debug, Clone)]
pub struct Tiles {
    extents: Extents,
    shape: TileShape,
    x: u32,
    y: u32,
    z: u32,
    c: u32,
    t: u32,
    index: u64,
}

impl Tiles {
    pub fn new(extents: Extents, shape: TileShape) -> Self {
        Self {
            extents,
            shape,
            x: 0,
            y: 0,
            z: 0,
            c: 0,
            t: 0,
            index: 0,
        }
    }

    /// Total number of tiles the sequence will produce:
    /// ceil(X/w) x ceil(Y/h) x Z x C x T.
    pub fn total(&self) -> u64 {
        let columns = u64::from(self.extents.size_x.div_ceil(self.shape.width));
        let rows = u64::from(self.extents.size_y.div_ceil(self.shape.height));
        columns * rows * self.extents.planes()
    }
}

impl Iterator for Tiles {
    type Item = TileRegion;

    fn next(&mut self) -> Option<TileRegion> {
        if self.t >= self.extents.size_t {
            return None;
        }
        let region = TileRegion {
            index: self.index,
            x: self.x,
            y: self.y,
            width: self.shape.width.min(self.extents.size_x - self.x),
            height: self.shape.height.min(self.extents.size_y - self.y),
            z: self.z,
            c: self.c,
            t: self.t,
        };
        self.index += 1;

        // advance, X innermost
        self.x = self.x.saturating_add(self.shape.width);
        if self.x >= self.extents.size_x {
            self.x = 0;
            self.y = self.y.saturating_add(self.shape.height);
            if self.y >= self.extents.size_y {
                self.y = 0;
                self.z += 1;
                if self.z >= self.extents.size_z {
                    self.z = 0;
                    self.c += 1;
                    if self.c >= self.extents.size_c {
                        self.c = 0;
                        self.t = self.t.saturating_add(1);
                    }
                }
            }
        }
        Some(region)
    }
}
