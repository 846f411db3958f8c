//! Display-to-buffer coordinate mapping.
//!
//! A rendering surface may be shown at any size relative to its native
//! buffer resolution (zoom, layout scaling). Pointer positions arrive in
//! display units and are mapped back through the rendered bounding box.

use serde::{Deserialize, Serialize};

/// On-screen bounding box of a rendering surface, in display units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SurfaceRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A 1:1 rect at the origin for a `width` x `height` buffer.
    pub fn native(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, f64::from(width), f64::from(height))
    }

    /// Whether the rect has a finite, positive size that can be mapped through.
    pub fn is_renderable(&self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }

    /// Map a buffer coordinate to the display position of that pixel's
    /// top-left corner.
    pub fn buffer_to_surface(
        &self,
        buffer_x: f64,
        buffer_y: f64,
        buffer_width: u32,
        buffer_height: u32,
    ) -> (f64, f64) {
        let sx = self.width / f64::from(buffer_width.max(1));
        let sy = self.height / f64::from(buffer_height.max(1));
        (self.left + buffer_x * sx, self.top + buffer_y * sy)
    }
}

/// Map a pointer position to integer buffer coordinates.
///
/// `bx = floor((pointer_x - rect.left) * buffer_width / rect.width)`, and
/// likewise for `by`. Pointers outside the surface map outside
/// `[0, width) x [0, height)`; callers clip. Returns `None` when the rect
/// is degenerate or the pointer is not finite.
pub fn to_buffer_coords(
    pointer_x: f64,
    pointer_y: f64,
    rect: &SurfaceRect,
    buffer_width: u32,
    buffer_height: u32,
) -> Option<(i32, i32)> {
    if !rect.is_renderable() || !pointer_x.is_finite() || !pointer_y.is_finite() {
        return None;
    }

    let bx = ((pointer_x - rect.left) * f64::from(buffer_width) / rect.width).floor();
    let by = ((pointer_y - rect.top) * f64::from(buffer_height) / rect.height).floor();

    // Float-to-int casts saturate, so far-off pointers stay far off.
    Some((bx as i32, by as i32))
}
