//! Pixel-array dimensions and tile bounds

use crate::{Error, Result};

/// The five dimension extents of a pixel array:
/// X, Y, Z (focal sections), Channel, Time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extents {
    pub size_x: u32,
    pub size_y: u32,
    pub size_z: u32,
    pub size_c: u32,
    pub size_t: u32,
}

impl Extents {
    /// Errors if any dimension is zero.
    pub fn new(size_x: u32, size_y: u32, size_z: u32, size_c: u32, size_t: u32) -> Result<Self> {
        for (axis, size) in [
            ("X", size_x),
            ("Y", size_y),
            ("Z", size_z),
            ("C", size_c),
            ("T", size_t),
        ] {
            if size == 0 {
                return Err(Error::EmptyExtent { axis });
            }
        }
        Ok(Self {
            size_x,
            size_y,
            size_z,
            size_c,
            size_t,
        })
    }

    /// Number of 2D planes (Z x C x T).
    pub fn planes(&self) -> u64 {
        u64::from(self.size_z) * u64::from(self.size_c) * u64::from(self.size_t)
    }
}

/// The maximum width and height of a single tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileShape {
    pub width: u32,
    pub height: u32,
}

impl TileShape {
    /// Errors if either bound is zero.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidTileSize { width, height });
        }
        Ok(Self { width, height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extents_reject_zero_dimension() {
        assert!(Extents::new(10, 10, 1, 1, 1).is_ok());
        let err = Extents::new(10, 0, 1, 1, 1).unwrap_err();
        assert!(matches!(err, Error::EmptyExtent { axis: "Y" }));
    }

    #[test]
    fn test_tile_shape_rejects_zero_bound() {
        assert!(TileShape::new(256, 256).is_ok());
        assert!(matches!(
            TileShape::new(0, 4),
            Err(Error::InvalidTileSize { .. })
        ));
    }

    #[test]
    fn test_planes() {
        let extents = Extents::new(512, 512, 5, 3, 2).unwrap();
        assert_eq!(extents.planes(), 30);
    }
}
