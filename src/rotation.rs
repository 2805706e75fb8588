//! Coordinate rotation utilities
//!
//! This module maps logical pixel coordinates to the physical, page-organized
//! framebuffer. Page-addressed controllers store 8 vertical pixels per byte:
//! byte `width * (y / 8) + x` holds rows `y & !7 ..= y | 7` of column `x`, with
//! bit `y & 7` selecting the row (LSB at the top).
//!
//! Rotation is applied at pixel-set time only. Changing it never rewrites what
//! is already in the buffer.
//!
//! ## Rotation Modes
//!
//! Using the *physical* width `W` and height `H`:
//!
//! - **Rotate0**: `(x, y)`
//! - **Rotate90**: `(W - 1 - y, x)`
//! - **Rotate180**: `(W - 1 - x, H - 1 - y)`
//! - **Rotate270**: `(y, H - 1 - x)`
//!
//! ## Example
//!
//! ```
//! use monoraster::{rotation::apply_rotation, Rotation};
//!
//! // On a 128x64 panel, pixel (0, 9) lives in page 1, column 0, bit 1
//! assert_eq!(apply_rotation(0, 9, 128, 64, Rotation::Rotate0), Some((128, 0x02)));
//!
//! // Off-panel coordinates map to nothing
//! assert_eq!(apply_rotation(-1, 0, 128, 64, Rotation::Rotate0), None);
//! ```

use crate::config::Rotation;

/// Map a logical point to physical panel coordinates
///
/// The result may lie outside the panel; callers bounds-check it.
pub fn map_point(x: i32, y: i32, width: i32, height: i32, rotation: Rotation) -> (i32, i32) {
    match rotation {
        Rotation::Rotate0 => (x, y),
        Rotation::Rotate90 => ((width - 1).saturating_sub(y), x),
        Rotation::Rotate180 => ((width - 1).saturating_sub(x), (height - 1).saturating_sub(y)),
        Rotation::Rotate270 => (y, (height - 1).saturating_sub(x)),
    }
}

/// Apply rotation transformation to get buffer index and bit mask
///
/// Returns `None` when the mapped point falls outside the physical panel.
///
/// # Arguments
///
/// * `x` - Logical X coordinate
/// * `y` - Logical Y coordinate
/// * `width` - Physical panel width in pixels
/// * `height` - Physical panel height in pixels (multiple of 8)
/// * `rotation` - Rotation mode
pub fn apply_rotation(
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    rotation: Rotation,
) -> Option<(usize, u8)> {
    let (px, py) = map_point(x, y, width as i32, height as i32, rotation);
    if px < 0 || py < 0 || px >= width as i32 || py >= height as i32 {
        return None;
    }
    let (px, py) = (px as usize, py as usize);
    let index = width as usize * (py / 8) + px;
    let bit = 0x01 << (py & 7);
    Some((index, bit))
}
