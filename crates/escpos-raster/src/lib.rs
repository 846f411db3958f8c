//! Thermal printer payload encoding.
//!
//! Turns monochrome bitmaps into printer command streams and validates
//! multi-image print jobs (per-image copy counts and print order). Sending
//! the bytes to a device is left to the caller.

pub mod job;
pub mod options;
pub mod protocol;

// Re-exports for convenience
pub use job::{Bitmap, MAX_COPIES, PrintJob, parse_number_list};
pub use options::PrintOptions;
pub use protocol::{EscPosProtocol, PrinterProtocol};

/// Errors that can occur while building a print payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrinterError {
    #[error("Invalid bitmap: {0}")]
    InvalidBitmap(String),

    #[error("Please upload at least one image")]
    NoImages,

    #[error("The number of counts ({counts}) must match the number of images ({images})")]
    CountMismatch { counts: usize, images: usize },

    #[error("Image {index} asks for {count} copies, at most {max} allowed")]
    TooManyCopies { index: usize, count: u32, max: u32 },

    #[error("Order index {index} out of range for {images} images")]
    OrderOutOfRange { index: usize, images: usize },
}

/// Result type alias for printer payload operations.
pub type Result<T> = std::result::Result<T, PrinterError>;
