//! Per-pixel density threshold engine for thermal printer previews.
//!
//! Holds the source luminance of each loaded image, a paintable threshold
//! map of the same shape, and renders the pair into a pure black/white
//! raster. Painting goes through a circular brush stamp addressed in
//! display coordinates that are mapped back to buffer pixels.

pub mod batch;
pub mod brush;
pub mod controller;
pub mod density;
pub mod mapper;
pub mod preview;
pub mod raster;
pub mod session;
pub mod threshold;

// Re-exports for convenience
pub use batch::{LoadFailure, SessionBatch};
pub use brush::{BrushConfig, paint, stamp_coords};
pub use controller::{BrushCursor, EventOutcome, InputEvent, PaintController};
pub use density::{DensityMap, Snapshot};
pub use mapper::{SurfaceRect, to_buffer_coords};
pub use preview::{PreviewSurface, RenderSurface, render_with_cursor};
pub use raster::{RasterBuffer, SampleChannel};
pub use session::{EditSession, SessionState};
pub use threshold::{BinaryRaster, apply, apply_into};

/// Density used for freshly loaded images when nothing else is configured.
pub const DEFAULT_DENSITY: u8 = 127;

/// Brush radius in buffer pixels when nothing else is configured.
pub const DEFAULT_BRUSH_RADIUS: u32 = 10;

/// Errors that can occur while loading, painting or rendering.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error(
        "Dimension mismatch: raster is {raster_width}x{raster_height}, density map is {density_width}x{density_height}"
    )]
    DimensionMismatch {
        raster_width: u32,
        raster_height: u32,
        density_width: u32,
        density_height: u32,
    },

    #[error("Session {0} is faulted and can no longer be edited")]
    SessionFaulted(uuid::Uuid),

    #[error("No session at index {0}")]
    SessionNotFound(usize),
}

impl EngineError {
    pub(crate) fn mismatch(raster: (u32, u32), density: (u32, u32)) -> Self {
        Self::DimensionMismatch {
            raster_width: raster.0,
            raster_height: raster.1,
            density_width: density.0,
            density_height: density.1,
        }
    }
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
