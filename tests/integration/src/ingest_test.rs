//! Streaming a pixel array into the repository tile by tile

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use assert_fs::prelude::*;
use pixrepo_session::ServantRegistry;
use pixrepo_tile::{Error, Extents, Result, TileData, TileShape, for_each_tile};
use pretty_assertions::assert_eq;

/// Byte-per-pixel store flushed to a host file on close, standing in
/// for a remote raw-pixel handle.
struct FileBackedPixels {
    extents: Extents,
    buffer: Vec<u8>,
    target: PathBuf,
    closes: Arc<AtomicU32>,
}

impl FileBackedPixels {
    fn new(extents: Extents, target: PathBuf, closes: Arc<AtomicU32>) -> Self {
        let pixels = u64::from(extents.size_x) * u64::from(extents.size_y) * extents.planes();
        Self {
            extents,
            buffer: vec![0; pixels as usize],
            target,
            closes,
        }
    }

    fn offset(&self, z: u32, c: u32, t: u32, x: u32, y: u32) -> usize {
        let plane = (u64::from(t) * u64::from(self.extents.size_c) + u64::from(c))
            * u64::from(self.extents.size_z)
            + u64::from(z);
        let plane_size = u64::from(self.extents.size_x) * u64::from(self.extents.size_y);
        (plane * plane_size
            + u64::from(y) * u64::from(self.extents.size_x)
            + u64::from(x)) as usize
    }
}

impl TileData for FileBackedPixels {
    fn get_tile(
        &mut self,
        z: u32,
        c: u32,
        t: u32,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity((width * height) as usize);
        for row in 0..height {
            let start = self.offset(z, c, t, x, y + row);
            out.extend_from_slice(&self.buffer[start..start + width as usize]);
        }
        Ok(out)
    }

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
    ) -> Result<()> {
        if data.len() != (width * height) as usize {
            return Err(Error::access("tile byte count does not match region"));
        }
        for row in 0..height {
            let start = self.offset(z, c, t, x, y + row);
            let from = (row * width) as usize;
            self.buffer[start..start + width as usize]
                .copy_from_slice(&data[from..from + width as usize]);
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        fs::write(&self.target, &self.buffer)?;
        Ok(())
    }
}

#[test]
fn test_tile_sweep_writes_full_array_and_closes_once() {
    let temp = assert_fs::TempDir::new().unwrap();
    let target = temp.path().join("pixels.raw");

    let extents = Extents::new(10, 10, 2, 1, 1).unwrap();
    let shape = TileShape::new(4, 4).unwrap();
    let closes = Arc::new(AtomicU32::new(0));
    let store = FileBackedPixels::new(extents, target.clone(), Arc::clone(&closes));

    let count = for_each_tile(extents, shape, store, |data, region| {
        // fill every tile with a marker derived from its counter
        let fill = (region.index % 251) as u8 + 1;
        let bytes = vec![fill; (region.width * region.height) as usize];
        data.set_tile(
            &bytes,
            region.z,
            region.c,
            region.t,
            region.x,
            region.y,
            region.width,
            region.height,
        )
    })
    .unwrap();

    assert_eq!(count, 18);
    assert_eq!(closes.load(Ordering::SeqCst), 1);

    // the flushed file covers every pixel, none left at zero
    let written = fs::read(&target).unwrap();
    assert_eq!(written.len(), 200);
    assert!(written.iter().all(|byte| *byte != 0));
}

#[test]
fn test_failed_sweep_still_closes_the_handle() {
    let temp = assert_fs::TempDir::new().unwrap();
    let target = temp.path().join("pixels.raw");

    let extents = Extents::new(10, 10, 1, 1, 1).unwrap();
    let shape = TileShape::new(4, 4).unwrap();
    let closes = Arc::new(AtomicU32::new(0));
    let store = FileBackedPixels::new(extents, target, Arc::clone(&closes));

    let err = for_each_tile(extents, shape, store, |_, region| {
        if region.index == 3 {
            Err(Error::access("remote handle dropped"))
        } else {
            Ok(())
        }
    })
    .unwrap_err();

    assert!(matches!(err, Error::Access { .. }));
    assert_eq!(closes.load(Ordering::SeqCst), 1);
}

#[test]
fn test_registry_guards_concurrent_sweeps_per_handle() {
    let registry: Arc<ServantRegistry<Arc<AtomicU32>>> = Arc::new(ServantRegistry::new(8));
    registry
        .put("pixels-1", Arc::new(AtomicU32::new(0)))
        .unwrap();

    let threads: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                // one sweep at a time per raw-pixel identity
                let _guard = registry.lock_key("pixels-1");
                let handle = registry.get("pixels-1").unwrap();

                let extents = Extents::new(6, 6, 1, 1, 1).unwrap();
                let shape = TileShape::new(4, 4).unwrap();
                let swept = for_each_tile(
                    extents,
                    shape,
                    NullTiles,
                    |_, _| Ok(()),
                )
                .unwrap();
                handle.fetch_add(swept as u32, Ordering::SeqCst);
            })
        })
        .collect();

    for thread in threads {
        thread.join().expect("Thread should not panic");
    }

    let total = registry.get("pixels-1").unwrap().load(Ordering::SeqCst);
    assert_eq!(total, 4 * 4);
}

struct NullTiles;

impl TileData for NullTiles {
    fn get_tile(
        &mut self,
        _z: u32,
        _c: u32,
        _t: u32,
        _x: u32,
        _y: u32,
        _width: u32,
        _height: u32,
    ) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }

    fn set_tile(
        &mut self,
        _data: &[u8],
        _z: u32,
        _c: u32,
        _t: u32,
        _x: u32,
        _y: u32,
        _width: u32,
        _height: u32,
    ) -> Result<()> {
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
