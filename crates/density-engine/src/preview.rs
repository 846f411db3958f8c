//! Rendering surfaces and preview overlays.

use image::{GrayImage, Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_circle_mut;

use crate::mapper::SurfaceRect;
use crate::threshold::BinaryRaster;

/// Brush ring color (red, slightly translucent).
const CURSOR_COLOR: Rgba<u8> = Rgba([255, 0, 0, 204]);

/// A drawing target that receives rendered output and reports where it
/// sits on screen.
pub trait RenderSurface {
    /// Current on-screen bounding box, used for pointer mapping.
    fn geometry(&self) -> SurfaceRect;

    /// Replace the surface contents with `output`.
    fn present(&mut self, output: &BinaryRaster);
}

/// In-memory surface holding the last presented frame.
#[derive(Debug, Clone)]
pub struct PreviewSurface {
    rect: SurfaceRect,
    frame: Option<GrayImage>,
}

impl PreviewSurface {
    pub fn new(rect: SurfaceRect) -> Self {
        Self { rect, frame: None }
    }

    /// Move or rescale the surface on screen.
    pub fn set_geometry(&mut self, rect: SurfaceRect) {
        self.rect = rect;
    }

    /// Last presented frame, at native buffer resolution.
    pub fn frame(&self) -> Option<&GrayImage> {
        self.frame.as_ref()
    }
}

impl RenderSurface for PreviewSurface {
    fn geometry(&self) -> SurfaceRect {
        self.rect
    }

    fn present(&mut self, output: &BinaryRaster) {
        self.frame = Some(output.to_gray_image());
    }
}

/// Render `output` with a two-pixel brush ring centered at `center`
/// (buffer coordinates).
pub fn render_with_cursor(output: &BinaryRaster, center: (i32, i32), radius: u32) -> RgbaImage {
    let gray = output.to_gray_image();
    let mut canvas = RgbaImage::from_fn(output.width(), output.height(), |x, y| {
        let v = gray.get_pixel(x, y).0[0];
        Rgba([v, v, v, 255])
    });

    if ring_touches_canvas(output.dimensions(), center, radius) {
        let r = i32::try_from(radius).unwrap_or(i32::MAX - 1);
        draw_hollow_circle_mut(&mut canvas, center, r, CURSOR_COLOR);
        draw_hollow_circle_mut(&mut canvas, center, r + 1, CURSOR_COLOR);
    }
    canvas
}

/// Whether a ring of `radius` (plus its second pixel) can cross the canvas.
fn ring_touches_canvas((width, height): (u32, u32), center: (i32, i32), radius: u32) -> bool {
    let (w, h) = (f64::from(width), f64::from(height));
    let (cx, cy) = (f64::from(center.0), f64::from(center.1));
    let r = f64::from(radius);

    let nearest = (cx.clamp(0.0, w) - cx).hypot(cy.clamp(0.0, h) - cy);
    let farthest = [(0.0, 0.0), (w, 0.0), (0.0, h), (w, h)]
        .iter()
        .map(|&(x, y)| (x - cx).hypot(y - cy))
        .fold(0.0, f64::max);

    r + 1.0 >= nearest - 1.0 && r <= farthest + 1.0
}
