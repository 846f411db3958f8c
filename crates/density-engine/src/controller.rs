//! Input-event state machine driving painting.
//!
//! The host forwards pointer and control events; the controller holds the
//! shared control values (global density, brush radius), the painting flag
//! and the brush cursor, and applies strokes to the session batch.
//!
//! The global density has two roles: the fill value for images loaded
//! from now on, and the value painted by every later stroke. Changing it
//! never touches thresholds that are already in a loaded map.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::batch::{LoadFailure, SessionBatch};
use crate::brush::BrushConfig;
use crate::mapper::{SurfaceRect, to_buffer_coords};
use crate::raster::RasterBuffer;
use crate::{DEFAULT_BRUSH_RADIUS, DEFAULT_DENSITY, EngineError, Result};

/// Events a host forwards to the controller.
///
/// `session` is the index of the surface the event happened on.
/// `PointerUp` carries no target: it must be delivered for releases
/// anywhere, including outside every surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown {
        session: usize,
    },
    PointerMove {
        session: usize,
        x: f64,
        y: f64,
        surface: SurfaceRect,
    },
    PointerUp,
    PointerEnter {
        session: usize,
    },
    PointerLeave {
        session: usize,
    },
    DensityChanged {
        value: u8,
    },
    BrushRadiusChanged {
        radius: u32,
    },
    Reset,
}

/// What handling an event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Nothing observable changed.
    Ignored,
    /// Controller state (flag, cursor, controls) changed; no re-render.
    Updated,
    /// A stroke was applied and this session re-rendered.
    Painted { session: usize },
    /// Every session was reset and re-rendered.
    ResetAll,
}

/// Brush outline shown under the pointer, in surface-local display units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BrushCursor {
    pub session: Option<usize>,
    pub visible: bool,
    pub x: f64,
    pub y: f64,
    /// Outline diameter: twice the brush radius, in display units.
    pub diameter: f64,
    /// Pointer position mapped into the session's buffer, if mappable.
    pub buffer_pos: Option<(i32, i32)>,
}

#[derive(Debug, Clone)]
pub struct PaintController {
    density: u8,
    brush_radius: u32,
    painting: bool,
    stroke_target: Option<usize>,
    cursor: BrushCursor,
}

impl Default for PaintController {
    fn default() -> Self {
        Self::new(DEFAULT_DENSITY, DEFAULT_BRUSH_RADIUS)
    }
}

impl PaintController {
    pub fn new(density: u8, brush_radius: u32) -> Self {
        Self {
            density,
            brush_radius,
            painting: false,
            stroke_target: None,
            cursor: BrushCursor::default(),
        }
    }

    pub fn density(&self) -> u8 {
        self.density
    }

    pub fn brush_radius(&self) -> u32 {
        self.brush_radius
    }

    pub fn is_painting(&self) -> bool {
        self.painting
    }

    pub fn cursor(&self) -> &BrushCursor {
        &self.cursor
    }

    /// Brush as it would be applied right now.
    pub fn brush(&self) -> BrushConfig {
        BrushConfig::new(self.brush_radius, self.density)
    }

    /// Replace the batch, filling new maps with the current global density.
    pub fn load<I, S>(&mut self, batch: &mut SessionBatch, inputs: I) -> Vec<LoadFailure>
    where
        I: IntoIterator<Item = (S, Result<RasterBuffer>)>,
        S: Into<String>,
    {
        self.end_stroke();
        self.cursor = BrushCursor::default();
        batch.replace(inputs, self.density)
    }

    /// Apply one input event.
    pub fn handle(&mut self, batch: &mut SessionBatch, event: InputEvent) -> Result<EventOutcome> {
        match event {
            InputEvent::PointerDown { session } => {
                ensure_exists(batch, session)?;
                debug!(session, "Stroke started");
                self.painting = true;
                self.stroke_target = Some(session);
                Ok(EventOutcome::Updated)
            }
            InputEvent::PointerUp => {
                if !self.painting {
                    return Ok(EventOutcome::Ignored);
                }
                self.end_stroke();
                Ok(EventOutcome::Updated)
            }
            InputEvent::PointerEnter { session } => {
                ensure_exists(batch, session)?;
                self.cursor.session = Some(session);
                self.cursor.visible = true;
                Ok(EventOutcome::Updated)
            }
            InputEvent::PointerLeave { session } => {
                if self.cursor.session != Some(session) || !self.cursor.visible {
                    return Ok(EventOutcome::Ignored);
                }
                self.cursor.visible = false;
                Ok(EventOutcome::Updated)
            }
            InputEvent::PointerMove {
                session,
                x,
                y,
                surface,
            } => self.pointer_move(batch, session, x, y, &surface),
            InputEvent::DensityChanged { value } => {
                info!(density = value, "Global density changed");
                self.density = value;
                Ok(EventOutcome::Updated)
            }
            InputEvent::BrushRadiusChanged { radius } => {
                debug!(radius, "Brush radius changed");
                self.brush_radius = radius;
                self.cursor.diameter = f64::from(radius) * 2.0;
                Ok(EventOutcome::Updated)
            }
            InputEvent::Reset => {
                info!(sessions = batch.len(), "Resetting all sessions");
                batch.reset_all()?;
                Ok(EventOutcome::ResetAll)
            }
        }
    }

    fn pointer_move(
        &mut self,
        batch: &mut SessionBatch,
        session: usize,
        x: f64,
        y: f64,
        surface: &SurfaceRect,
    ) -> Result<EventOutcome> {
        let target = batch.session_mut(session)?;
        let (width, height) = target.dimensions();

        self.cursor = BrushCursor {
            session: Some(session),
            visible: self.cursor.visible && self.cursor.session == Some(session),
            x: x - surface.left,
            y: y - surface.top,
            diameter: f64::from(self.brush_radius) * 2.0,
            buffer_pos: to_buffer_coords(x, y, surface, width, height),
        };

        if !self.painting || self.stroke_target != Some(session) {
            return Ok(EventOutcome::Updated);
        }

        if target.paint_at(x, y, surface, self.brush())? {
            Ok(EventOutcome::Painted { session })
        } else {
            Ok(EventOutcome::Updated)
        }
    }

    fn end_stroke(&mut self) {
        if self.painting {
            debug!(session = ?self.stroke_target, "Stroke ended");
        }
        self.painting = false;
        self.stroke_target = None;
    }
}

fn ensure_exists(batch: &SessionBatch, session: usize) -> Result<()> {
    if batch.get(session).is_none() {
        return Err(EngineError::SessionNotFound(session));
    }
    Ok(())
}
