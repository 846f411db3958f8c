//! ESC/POS raster protocol.
//!
//! Init: `ESC @`, then `DC2 n` for print density.
//! Image: `GS v 0 m xL xH yL yH` + packed rows, MSB first, 1 = black.
//! Feed: `ESC d n`.

use tracing::debug;

use super::PrinterProtocol;
use crate::{PrinterError, Result};

const ESC_INIT: [u8; 2] = [0x1b, 0x40];
const DC2_DENSITY: u8 = 0x12;
const GS_RASTER: [u8; 3] = [0x1d, 0x76, 0x30];
const ESC_FEED: [u8; 2] = [0x1b, 0x64];

/// Raster mode `m`: normal width and height.
const RASTER_MODE_NORMAL: u8 = 0x00;

/// Pack one row of pixels into bytes, MSB first, zero-padding the last byte.
fn pack_row(row: &[u8]) -> impl Iterator<Item = u8> + '_ {
    row.chunks(8).map(|chunk| {
        let mut byte_val: u8 = 0;
        for (bit, &px) in chunk.iter().enumerate() {
            if px != 0 {
                byte_val |= 0x80 >> bit;
            }
        }
        byte_val
    })
}

fn check_dimensions(bitmap: &[u8], width: u32) -> Result<(u16, u16)> {
    let row_width = width as usize;
    if row_width == 0 {
        return Err(PrinterError::InvalidBitmap(
            "bitmap width must be greater than 0".into(),
        ));
    }
    if bitmap.is_empty() || !bitmap.len().is_multiple_of(row_width) {
        return Err(PrinterError::InvalidBitmap(format!(
            "{} pixels is not a whole number of {width}px rows",
            bitmap.len()
        )));
    }

    let bytes_per_row = u16::try_from(row_width.div_ceil(8)).map_err(|_| {
        PrinterError::InvalidBitmap(format!("width {width} exceeds raster limit"))
    })?;
    let rows = u16::try_from(bitmap.len() / row_width).map_err(|_| {
        PrinterError::InvalidBitmap(format!(
            "height {} exceeds raster limit",
            bitmap.len() / row_width
        ))
    })?;
    Ok((bytes_per_row, rows))
}

/// ESC/POS printer over a raw byte channel.
#[derive(Debug, Clone, Default)]
pub struct EscPosProtocol;

impl EscPosProtocol {
    pub fn new() -> Self {
        Self
    }
}

impl PrinterProtocol for EscPosProtocol {
    fn name(&self) -> &str {
        "ESC/POS"
    }

    fn build_init_sequence(&self, density: u8) -> Vec<Vec<u8>> {
        vec![ESC_INIT.to_vec(), vec![DC2_DENSITY, density]]
    }

    fn encode_raster(&self, bitmap: &[u8], width: u32) -> Result<Vec<u8>> {
        let (bytes_per_row, rows) = check_dimensions(bitmap, width)?;
        debug!(width, rows, bytes_per_row, "Encoding raster image");

        let mut buf = Vec::with_capacity(8 + bytes_per_row as usize * rows as usize);
        buf.extend_from_slice(&GS_RASTER);
        buf.push(RASTER_MODE_NORMAL);
        buf.extend_from_slice(&bytes_per_row.to_le_bytes());
        buf.extend_from_slice(&rows.to_le_bytes());
        for row in bitmap.chunks(width as usize) {
            buf.extend(pack_row(row));
        }
        Ok(buf)
    }

    fn build_feed_command(&self, lines: u8) -> Vec<u8> {
        vec![ESC_FEED[0], ESC_FEED[1], lines]
    }
}
