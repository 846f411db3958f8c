//! Source luminance buffers built from decoded images.

use std::path::Path;
use std::str::FromStr;

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{EngineError, Result};

/// Which single channel a multi-channel pixel is reduced to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleChannel {
    /// Perceptual luminance.
    #[default]
    Luma,
    /// Red channel only (alpha is ignored).
    Red,
}

impl FromStr for SampleChannel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "luma" => Ok(Self::Luma),
            "red" => Ok(Self::Red),
            other => Err(format!("unknown sample channel '{other}' (expected luma or red)")),
        }
    }
}

/// Immutable row-major grid of 8-bit samples, origin top-left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    samples: Vec<u8>,
}

impl RasterBuffer {
    /// Build a raster from raw samples.
    ///
    /// Fails with [`EngineError::InvalidImage`] for a zero-area grid or when
    /// the sample count does not match `width * height`.
    pub fn new(width: u32, height: u32, samples: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidImage(format!(
                "image has zero area ({width}x{height})"
            )));
        }
        let expected = width as usize * height as usize;
        if samples.len() != expected {
            return Err(EngineError::InvalidImage(format!(
                "expected {expected} samples for {width}x{height}, got {}",
                samples.len()
            )));
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Reduce a decoded image to one sample per pixel.
    pub fn from_image(img: &DynamicImage, channel: SampleChannel) -> Result<Self> {
        let (width, height) = (img.width(), img.height());
        debug!(width, height, ?channel, "Building raster buffer");

        let samples = match channel {
            SampleChannel::Luma => img.to_luma8().into_raw(),
            SampleChannel::Red => img.to_rgba8().pixels().map(|p| p.0[0]).collect(),
        };
        Self::new(width, height, samples)
    }

    /// Decode an encoded image (PNG, JPEG, BMP, ...) from memory.
    pub fn decode(bytes: &[u8], channel: SampleChannel) -> Result<Self> {
        let img = image::load_from_memory(bytes).map_err(|e| EngineError::Decode(e.to_string()))?;
        Self::from_image(&img, channel)
    }

    /// Decode an image file from disk.
    pub fn open(path: impl AsRef<Path>, channel: SampleChannel) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|e| EngineError::Decode(format!("{}: {e}", path.display())))?;
        Self::from_image(&img, channel)
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

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Sample at `(x, y)`, or `None` outside the buffer.
    pub fn sample(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.samples[y as usize * self.width as usize + x as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgba, RgbaImage};

    #[test]
    fn test_new_rejects_zero_area() {
        assert!(matches!(
            RasterBuffer::new(0, 4, Vec::new()),
            Err(EngineError::InvalidImage(_))
        ));
        assert!(matches!(
            RasterBuffer::new(4, 0, Vec::new()),
            Err(EngineError::InvalidImage(_))
        ));
    }

    #[test]
    fn test_new_rejects_wrong_sample_count() {
        let result = RasterBuffer::new(2, 2, vec![0; 3]);
        assert!(matches!(result, Err(EngineError::InvalidImage(_))));
    }

    #[test]
    fn test_from_gray_image_keeps_values() {
        let mut img = GrayImage::from_pixel(3, 2, Luma([100]));
        img.put_pixel(2, 1, Luma([7]));
        let raster = RasterBuffer::from_image(&DynamicImage::ImageLuma8(img), SampleChannel::Luma)
            .unwrap();

        assert_eq!(raster.dimensions(), (3, 2));
        assert_eq!(raster.sample(0, 0), Some(100));
        assert_eq!(raster.sample(2, 1), Some(7));
        assert_eq!(raster.sample(3, 0), None);
    }

    #[test]
    fn test_red_channel_sampling() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([200, 10, 20, 255]));
        let raster =
            RasterBuffer::from_image(&DynamicImage::ImageRgba8(img), SampleChannel::Red).unwrap();
        assert!(raster.samples().iter().all(|&s| s == 200));
    }

    #[test]
    fn test_luma_of_pure_white_and_black() {
        let mut img = RgbaImage::from_pixel(2, 1, Rgba([255, 255, 255, 255]));
        img.put_pixel(1, 0, Rgba([0, 0, 0, 255]));
        let raster =
            RasterBuffer::from_image(&DynamicImage::ImageRgba8(img), SampleChannel::Luma).unwrap();
        assert_eq!(raster.samples(), &[255, 0]);
    }

    #[test]
    fn test_decode_garbage_fails_with_decode_error() {
        let result = RasterBuffer::decode(b"definitely not an image", SampleChannel::Luma);
        assert!(matches!(result, Err(EngineError::Decode(_))));
    }

    #[test]
    fn test_decode_png_round_trip() {
        let img = GrayImage::from_pixel(5, 3, Luma([42]));
        let mut bytes = Vec::new();
        DynamicImage::ImageLuma8(img)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let raster = RasterBuffer::decode(&bytes, SampleChannel::Luma).unwrap();
        assert_eq!(raster.dimensions(), (5, 3));
        assert!(raster.samples().iter().all(|&s| s == 42));
    }

    #[test]
    fn test_sample_channel_from_str() {
        assert_eq!("LUMA".parse::<SampleChannel>(), Ok(SampleChannel::Luma));
        assert_eq!(" red ".parse::<SampleChannel>(), Ok(SampleChannel::Red));
        assert!("green".parse::<SampleChannel>().is_err());
    }
}
