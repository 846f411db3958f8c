//! Per-pixel threshold maps and their reset snapshots.

use tracing::debug;

use crate::raster::RasterBuffer;
use crate::{EngineError, Result};

/// Mutable row-major grid of thresholds, one per raster pixel.
///
/// The shape is fixed at creation; only values change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DensityMap {
    width: u32,
    height: u32,
    thresholds: Vec<u8>,
}

/// Frozen copy of a density map taken when its image was loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    width: u32,
    height: u32,
    thresholds: Box<[u8]>,
}

impl DensityMap {
    /// Create a map of the given shape with every threshold set to `value`.
    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        Self {
            width,
            height,
            thresholds: vec![value; width as usize * height as usize],
        }
    }

    /// Create a map matching `raster`'s shape.
    pub fn for_raster(raster: &RasterBuffer, value: u8) -> Self {
        Self::filled(raster.width(), raster.height(), value)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn thresholds(&self) -> &[u8] {
        &self.thresholds
    }

    /// Threshold at `(x, y)`, or `None` outside the map.
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        self.index(i64::from(x), i64::from(y))
            .map(|i| self.thresholds[i])
    }

    /// Set one threshold. Out-of-bounds coordinates are skipped.
    ///
    /// Returns whether a value was written.
    pub fn set_pixel(&mut self, x: i64, y: i64, value: u8) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.thresholds[i] = value;
                true
            }
            None => false,
        }
    }

    /// Fill a rectangle, clipped to the map.
    pub fn set_region(&mut self, x0: i64, y0: i64, width: u32, height: u32, value: u8) {
        let x_start = x0.max(0);
        let y_start = y0.max(0);
        let x_end = x0.saturating_add(i64::from(width)).min(i64::from(self.width));
        let y_end = y0.saturating_add(i64::from(height)).min(i64::from(self.height));
        if x_start >= x_end || y_start >= y_end {
            return;
        }

        let stride = self.width as usize;
        for y in y_start as usize..y_end as usize {
            let row = y * stride;
            self.thresholds[row + x_start as usize..row + x_end as usize].fill(value);
        }
    }

    /// Copy the current thresholds into an immutable snapshot.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            width: self.width,
            height: self.height,
            thresholds: self.thresholds.clone().into_boxed_slice(),
        }
    }

    /// Overwrite every threshold from `snapshot`.
    ///
    /// Nothing is written when the shapes differ.
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<()> {
        if snapshot.dimensions() != self.dimensions() {
            return Err(EngineError::mismatch(
                snapshot.dimensions(),
                self.dimensions(),
            ));
        }
        debug!(width = self.width, height = self.height, "Restoring density map");
        self.thresholds.copy_from_slice(&snapshot.thresholds);
        Ok(())
    }

    pub(crate) fn thresholds_mut(&mut self) -> &mut [u8] {
        &mut self.thresholds
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}

impl Snapshot {
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn thresholds(&self) -> &[u8] {
        &self.thresholds
    }
}
