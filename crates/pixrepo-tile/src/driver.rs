//! The per-tile driver loop and the tile-data access seam

use crate::{Extents, Result, TileRegion, TileShape, Tiles};

/// Pluggable strategy for reading or writing rectangular byte regions
/// of a pixel array, typically backed by a remote raw-pixel handle.
///
/// `close` must be called exactly once per created instance and must
/// finalize any pending writes.
pub trait TileData {
    /// Read the bytes of one rectangular region of one plane.
    #[allow(clippy::too_many_arguments)]
    fn get_tile(
        &mut self,
        z: u32,
        c: u32,
        t: u32,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>>;

    /// Write the bytes of one rectangular region of one plane.
    #[allow(clippy::too_many_arguments)]
    fn set_tile(
        &mut self,
        data: &[u8],
        z: u32,
        c: u32,
        t: u32,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<()>;

    /// Release the underlying resources, flushing pending writes.
    fn close(&mut self) -> Result<()>;
}

/// Drive `action` over every tile of the array, one tile at a time, in
/// the thread of the caller.
///
/// The tile-data strategy is closed exactly once, on success or on the
/// first error; a close failure after an action failure is logged and
/// the action error wins. Returns the total tile count.
pub fn for_each_tile<D, F>(
    extents: Extents,
    shape: TileShape,
    mut data: D,
    mut action: F,
) -> Result<u64>
where
    D: TileData,
    F: FnMut(&mut D, &TileRegion) -> Result<()>,
{
    let mut count = 0u64;
    let sweep: Result<()> = (|| {
        for region in Tiles::new(extents, shape) {
            action(&mut data, &region)?;
            count += 1;
        }
        Ok(())
    })();
    let closed = data.close();

    match (sweep, closed) {
        (Ok(()), Ok(())) => Ok(count),
        (Ok(()), Err(e)) => Err(e),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(close_error)) => {
            tracing::warn!(error = %close_error, "tile data close failed after sweep error");
            Err(e)
        }
    }
}
