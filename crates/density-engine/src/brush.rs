//! Circular brush stamps on a density map.
//!
//! A stamp covers every integer offset `(dx, dy)` with `dx² + dy² <= r²`
//! around the center, clipped to the map. Radius 0 covers only the center.

use serde::{Deserialize, Serialize};

use crate::density::DensityMap;

/// Brush parameters read at the moment of a paint operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrushConfig {
    /// Radius in buffer pixels.
    pub radius: u32,
    /// Threshold written into every covered pixel.
    pub value: u8,
}

impl BrushConfig {
    pub fn new(radius: u32, value: u8) -> Self {
        Self { radius, value }
    }

    /// Stamp this brush onto `density` centered at `(center_x, center_y)`.
    pub fn stamp(&self, density: &mut DensityMap, center_x: i32, center_y: i32) {
        paint(density, center_x, center_y, self.radius, self.value);
    }
}

/// Paint a filled circle of `value` into `density`, skipping off-map pixels.
pub fn paint(density: &mut DensityMap, center_x: i32, center_y: i32, radius: u32, value: u8) {
    let (width, height) = density.dimensions();
    let stride = width as usize;
    let thresholds = density.thresholds_mut();
    for_each_covered(center_x, center_y, radius, width, height, |x, y| {
        thresholds[y as usize * stride + x as usize] = value;
    });
}

/// Buffer coordinates covered by a stamp, clipped to `width` x `height`.
///
/// Ordered row by row, left to right.
pub fn stamp_coords(
    center_x: i32,
    center_y: i32,
    radius: u32,
    width: u32,
    height: u32,
) -> Vec<(u32, u32)> {
    let mut coords = Vec::new();
    for_each_covered(center_x, center_y, radius, width, height, |x, y| {
        coords.push((x, y));
    });
    coords
}

/// Visit covered in-bounds pixels, iterating only the clipped bounding box.
fn for_each_covered(
    center_x: i32,
    center_y: i32,
    radius: u32,
    width: u32,
    height: u32,
    mut visit: impl FnMut(u32, u32),
) {
    let cx = i64::from(center_x);
    let cy = i64::from(center_y);
    let r = i64::from(radius);
    let r_sq = i128::from(r) * i128::from(r);

    let y_start = (cy - r).max(0);
    let y_end = (cy + r).min(i64::from(height) - 1);
    let x_start = (cx - r).max(0);
    let x_end = (cx + r).min(i64::from(width) - 1);

    for y in y_start..=y_end {
        let dy = i128::from(y - cy);
        for x in x_start..=x_end {
            let dx = i128::from(x - cx);
            if dx * dx + dy * dy <= r_sq {
                visit(x as u32, y as u32);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn painted(dm: &DensityMap, value: u8) -> Vec<(u32, u32)> {
        let (w, h) = dm.dimensions();
        let mut out = Vec::new();
        for y in 0..h {
            for x in 0..w {
                if dm.get(x, y) == Some(value) {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn test_radius_zero_paints_center_only() {
        let mut dm = DensityMap::filled(4, 4, 127);
        paint(&mut dm, 2, 2, 0, 50);
        assert_eq!(painted(&dm, 50), vec![(2, 2)]);
    }

    #[test]
    fn test_radius_one_is_a_plus_shape() {
        let mut dm = DensityMap::filled(5, 5, 0);
        paint(&mut dm, 2, 2, 1, 9);
        assert_eq!(
            painted(&dm, 9),
            vec![(2, 1), (1, 2), (2, 2), (3, 2), (2, 3)]
        );
    }

    #[test]
    fn test_radius_two_disc_size() {
        // 13 lattice points satisfy dx² + dy² <= 4
        let coords = stamp_coords(10, 10, 2, 32, 32);
        assert_eq!(coords.len(), 13);
        assert!(!coords.contains(&(8, 8)));
        assert!(coords.contains(&(8, 10)));
    }

    #[test]
    fn test_stamp_is_clipped_at_corner() {
        let mut dm = DensityMap::filled(3, 3, 0);
        paint(&mut dm, 0, 0, 2, 7);

        // Quarter of a radius-2 disc: (0,0),(1,0),(2,0),(0,1),(1,1),(0,2)
        assert_eq!(
            painted(&dm, 7),
            vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (0, 2)]
        );
    }

    #[test]
    fn test_stamp_entirely_off_buffer_is_noop() {
        let mut dm = DensityMap::filled(4, 4, 1);
        paint(&mut dm, -50, -50, 3, 200);
        paint(&mut dm, 100, 2, 5, 200);
        assert!(dm.thresholds().iter().all(|&t| t == 1));
    }

    #[test]
    fn test_huge_radius_covers_whole_map() {
        let mut dm = DensityMap::filled(6, 4, 0);
        paint(&mut dm, 3, 2, 1_000_000, 33);
        assert!(dm.thresholds().iter().all(|&t| t == 33));
    }

    #[test]
    fn test_extreme_values_do_not_overflow() {
        // Distance to the buffer is ~3.04e9, well inside a u32::MAX radius
        let coords = stamp_coords(i32::MAX, i32::MIN, u32::MAX, 8, 8);
        assert_eq!(coords.len(), 64);

        let coords = stamp_coords(i32::MAX, i32::MAX, 1000, 8, 8);
        assert!(coords.is_empty());
    }

    #[test]
    fn test_brush_config_stamp_matches_paint() {
        let mut a = DensityMap::filled(9, 9, 0);
        let mut b = a.clone();
        BrushConfig::new(3, 90).stamp(&mut a, 4, 4);
        paint(&mut b, 4, 4, 3, 90);
        assert_eq!(a, b);
    }
}
