//! Editing state for one loaded image.
//!
//! A session owns the image's source raster, its live density map, the
//! snapshot taken at load time and the last rendered output. Every mutation
//! re-renders before returning, so the output always reflects the map.

use tracing::{debug, error, info};
use uuid::Uuid;

use crate::brush::BrushConfig;
use crate::density::{DensityMap, Snapshot};
use crate::mapper::{SurfaceRect, to_buffer_coords};
use crate::preview::RenderSurface;
use crate::raster::RasterBuffer;
use crate::threshold::{BinaryRaster, apply, apply_into};
use crate::{EngineError, Result};

/// Lifecycle state of a loaded session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// Loaded and rendered, not yet painted.
    Ready,
    /// At least one stroke or reset has been applied.
    Editing,
    /// An internal shape invariant broke; the session refuses further edits.
    Faulted,
}

#[derive(Debug)]
pub struct EditSession {
    id: Uuid,
    name: String,
    raster: RasterBuffer,
    density: DensityMap,
    snapshot: Snapshot,
    output: BinaryRaster,
    state: SessionState,
}

impl EditSession {
    /// Build a ready session: default-filled map, its snapshot, first render.
    pub fn new(name: impl Into<String>, raster: RasterBuffer, default_density: u8) -> Result<Self> {
        let density = DensityMap::for_raster(&raster, default_density);
        let snapshot = density.snapshot();
        let output = apply(&raster, &density)?;
        let session = Self {
            id: Uuid::new_v4(),
            name: name.into(),
            raster,
            density,
            snapshot,
            output,
            state: SessionState::Ready,
        };
        info!(
            id = %session.id,
            name = %session.name,
            width = session.raster.width(),
            height = session.raster.height(),
            default_density,
            "Session ready"
        );
        Ok(session)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn raster(&self) -> &RasterBuffer {
        &self.raster
    }

    pub fn density(&self) -> &DensityMap {
        &self.density
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn output(&self) -> &BinaryRaster {
        &self.output
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.raster.dimensions()
    }

    /// Stamp `brush` at a buffer coordinate and re-render.
    pub fn paint(&mut self, center_x: i32, center_y: i32, brush: BrushConfig) -> Result<()> {
        self.ensure_editable()?;
        brush.stamp(&mut self.density, center_x, center_y);
        self.state = SessionState::Editing;
        self.render()
    }

    /// Map a display-space pointer through `surface` and paint there.
    ///
    /// Returns `false` without painting when the surface geometry cannot be
    /// mapped (zero-size or non-finite).
    pub fn paint_at(
        &mut self,
        pointer_x: f64,
        pointer_y: f64,
        surface: &SurfaceRect,
        brush: BrushConfig,
    ) -> Result<bool> {
        let (width, height) = self.dimensions();
        let Some((bx, by)) = to_buffer_coords(pointer_x, pointer_y, surface, width, height) else {
            debug!(id = %self.id, ?surface, "Unmappable surface geometry, stroke skipped");
            return Ok(false);
        };
        self.paint(bx, by, brush)?;
        Ok(true)
    }

    /// Restore the load-time thresholds and re-render.
    pub fn reset(&mut self) -> Result<()> {
        self.ensure_editable()?;
        if let Err(e) = self.density.restore(&self.snapshot) {
            return Err(self.fault(e));
        }
        self.state = SessionState::Editing;
        debug!(id = %self.id, "Session reset to snapshot");
        self.render()
    }

    /// Recompute the output from the current raster and density map.
    pub fn render(&mut self) -> Result<()> {
        self.ensure_editable()?;
        if let Err(e) = apply_into(&self.raster, &self.density, &mut self.output) {
            return Err(self.fault(e));
        }
        Ok(())
    }

    /// Push the current output to a rendering surface.
    pub fn present(&self, surface: &mut impl RenderSurface) -> Result<()> {
        self.ensure_editable()?;
        surface.present(&self.output);
        Ok(())
    }

    fn ensure_editable(&self) -> Result<()> {
        if self.state == SessionState::Faulted {
            return Err(EngineError::SessionFaulted(self.id));
        }
        Ok(())
    }

    /// Swap in a density map of another shape so the next render or reset
    /// hits `DimensionMismatch`.
    #[cfg(test)]
    pub(crate) fn break_density_shape(&mut self) {
        let (width, height) = self.dimensions();
        self.density = DensityMap::filled(width + 1, height, 0);
    }

    fn fault(&mut self, cause: EngineError) -> EngineError {
        error!(id = %self.id, name = %self.name, error = %cause, "Session faulted");
        self.state = SessionState::Faulted;
        cause
    }
}
