//! Printer protocol definitions.

pub mod escpos;

pub use escpos::EscPosProtocol;

use crate::Result;

/// Interface for encoding print jobs into a device command set.
pub trait PrinterProtocol: Send + Sync {
    /// Human-readable protocol name (e.g. "ESC/POS").
    fn name(&self) -> &str;

    /// Commands sent once before the first image, including the density setting.
    fn build_init_sequence(&self, density: u8) -> Vec<Vec<u8>>;

    /// Encode a whole bitmap (1 byte per pixel, 0=white, non-zero=black).
    fn encode_raster(&self, bitmap: &[u8], width: u32) -> Result<Vec<u8>>;

    /// Paper feed command for the given number of lines.
    fn build_feed_command(&self, lines: u8) -> Vec<u8>;
}
