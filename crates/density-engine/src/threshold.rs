//! Per-pixel threshold conversion to a black-and-white raster.
//!
//! Each output pixel is `0` when the source sample is below its own
//! threshold and `255` otherwise. No blending, dithering or neighbor
//! lookups are involved.

use image::{GrayImage, Luma};
use tracing::debug;

use crate::density::DensityMap;
use crate::raster::RasterBuffer;
use crate::{EngineError, Result};

const BLACK: u8 = 0;
const WHITE: u8 = 255;

/// Rendered output: every pixel is exactly 0 (black) or 255 (white).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryRaster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl BinaryRaster {
    /// An all-white raster, used as a reusable render target.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![WHITE; width as usize * height as usize],
        }
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

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the raster.
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y as usize * self.width as usize + x as usize])
    }

    /// Number of black pixels.
    pub fn black_count(&self) -> usize {
        self.pixels.iter().filter(|&&p| p == BLACK).count()
    }

    /// Copy into a grayscale image for display or PNG export.
    pub fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            Luma([self.pixels[y as usize * self.width as usize + x as usize]])
        })
    }

    /// One byte per pixel, `1` = black, `0` = white, as printers expect.
    pub fn to_print_bitmap(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .map(|&p| u8::from(p == BLACK))
            .collect()
    }
}

/// Threshold `raster` against `density` into a new binary raster.
pub fn apply(raster: &RasterBuffer, density: &DensityMap) -> Result<BinaryRaster> {
    let mut out = BinaryRaster::blank(raster.width(), raster.height());
    apply_into(raster, density, &mut out)?;
    Ok(out)
}

/// Threshold into an existing output, reusing its allocation.
///
/// The output is resized to the raster's shape if needed. On a dimension
/// mismatch the output is left untouched.
pub fn apply_into(raster: &RasterBuffer, density: &DensityMap, out: &mut BinaryRaster) -> Result<()> {
    if raster.dimensions() != density.dimensions() {
        return Err(EngineError::mismatch(
            raster.dimensions(),
            density.dimensions(),
        ));
    }

    let (width, height) = raster.dimensions();
    debug!(width, height, "Applying density threshold");

    if out.dimensions() != (width, height) {
        *out = BinaryRaster::blank(width, height);
    }

    for ((dst, &sample), &threshold) in out
        .pixels
        .iter_mut()
        .zip(raster.samples())
        .zip(density.thresholds())
    {
        *dst = if sample < threshold { BLACK } else { WHITE };
    }

    Ok(())
}
