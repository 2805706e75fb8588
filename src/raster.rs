//! Drawing primitives
//!
//! [`Raster`] is implemented for every [`PixelSink`]. Each shape is expressed
//! purely in terms of `set_pixel`, so clipping is inherited from the sink and
//! no primitive can fail. Degenerate sizes collapse to a point, a line or
//! nothing.
//!
//! ## Example
//!
//! ```
//! use monoraster::{Color, PixelBuffer, PixelSink, Raster};
//!
//! let mut storage = [0u8; 128 * 64 / 8];
//! let mut buffer = match PixelBuffer::new(128, 64, &mut storage) {
//!     Ok(buffer) => buffer,
//!     Err(_) => return,
//! };
//! buffer.draw_line(0, 0, 127, 63, Color::Foreground);
//! buffer.fill_circle(64, 32, 10, Color::Foreground);
//! buffer.draw_round_rect(4, 4, 40, 20, 5, Color::Invert);
//! ```

use crate::buffer::PixelSink;
use crate::color::Color;

/// Corner masks for [`Raster::draw_circle_helper`]
pub mod corner {
    /// Top-left quarter
    pub const TOP_LEFT: u8 = 0x1;
    /// Top-right quarter
    pub const TOP_RIGHT: u8 = 0x2;
    /// Bottom-right quarter
    pub const BOTTOM_RIGHT: u8 = 0x4;
    /// Bottom-left quarter
    pub const BOTTOM_LEFT: u8 = 0x8;
}

/// Half-circle masks for [`Raster::fill_circle_helper`]
pub mod half {
    /// Right half
    pub const RIGHT: u8 = 0x1;
    /// Left half
    pub const LEFT: u8 = 0x2;
}

/// Shape drawing built on [`PixelSink::set_pixel`]
pub trait Raster: PixelSink {
    /// Draw a single pixel
    fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.set_pixel(x, y, color);
    }

    /// Horizontal line of `w` pixels starting at `(x, y)`
    fn draw_fast_hline(&mut self, x: i32, y: i32, w: i32, color: Color) {
        for i in 0..w.max(0) {
            self.set_pixel(x + i, y, color);
        }
    }

    /// Vertical line of `h` pixels starting at `(x, y)`
    fn draw_fast_vline(&mut self, x: i32, y: i32, h: i32, color: Color) {
        for i in 0..h.max(0) {
            self.set_pixel(x, y + i, color);
        }
    }

    /// Bresenham line between two points, both ends inclusive
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let (mut x0, mut y0, mut x1, mut y1) = (x0, y0, x1, y1);
        let steep = (y1 - y0).abs() > (x1 - x0).abs();
        if steep {
            core::mem::swap(&mut x0, &mut y0);
            core::mem::swap(&mut x1, &mut y1);
        }
        if x0 > x1 {
            core::mem::swap(&mut x0, &mut x1);
            core::mem::swap(&mut y0, &mut y1);
        }

        let dx = x1 - x0;
        let dy = (y1 - y0).abs();
        let mut err = dx / 2;
        let ystep = if y0 < y1 { 1 } else { -1 };

        let mut y = y0;
        for x in x0..=x1 {
            if steep {
                self.set_pixel(y, x, color);
            } else {
                self.set_pixel(x, y, color);
            }
            err -= dy;
            if err < 0 {
                y += ystep;
                err += dx;
            }
        }
    }

    /// Rectangle outline
    fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        if w <= 0 || h <= 0 {
            return;
        }
        self.draw_fast_hline(x, y, w, color);
        if h > 1 {
            self.draw_fast_hline(x, y + h - 1, w, color);
        }
        if h > 2 {
            self.draw_fast_vline(x, y + 1, h - 2, color);
            if w > 1 {
                self.draw_fast_vline(x + w - 1, y + 1, h - 2, color);
            }
        }
    }

    /// Filled rectangle
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        for i in 0..w.max(0) {
            self.draw_fast_vline(x + i, y, h, color);
        }
    }

    /// Fill the whole logical surface
    fn fill_screen(&mut self, color: Color) {
        let (w, h) = self.logical_size();
        self.fill_rect(0, 0, w, h, color);
    }

    /// Midpoint circle outline
    fn draw_circle(&mut self, x0: i32, y0: i32, r: i32, color: Color) {
        if r < 0 {
            return;
        }
        let mut f = 1 - r;
        let mut ddf_x = 1;
        let mut ddf_y = -2 * r;
        let mut x = 0;
        let mut y = r;

        self.set_pixel(x0, y0 + r, color);
        if r == 0 {
            return;
        }
        self.set_pixel(x0, y0 - r, color);
        self.set_pixel(x0 + r, y0, color);
        self.set_pixel(x0 - r, y0, color);

        while x < y {
            if f >= 0 {
                y -= 1;
                ddf_y += 2;
                f += ddf_y;
            }
            x += 1;
            ddf_x += 2;
            f += ddf_x;
            // Past the diagonal every point was plotted by the previous step
            if x > y {
                break;
            }

            self.set_pixel(x0 + x, y0 + y, color);
            self.set_pixel(x0 - x, y0 + y, color);
            self.set_pixel(x0 + x, y0 - y, color);
            self.set_pixel(x0 - x, y0 - y, color);
            // On the diagonal both octants name the same pixel
            if x == y {
                continue;
            }
            self.set_pixel(x0 + y, y0 + x, color);
            self.set_pixel(x0 - y, y0 + x, color);
            self.set_pixel(x0 + y, y0 - x, color);
            self.set_pixel(x0 - y, y0 - x, color);
        }
    }

    /// Quarter-circle arcs selected by a [`corner`] mask
    fn draw_circle_helper(&mut self, x0: i32, y0: i32, r: i32, corners: u8, color: Color) {
        if r <= 0 {
            return;
        }
        let mut f = 1 - r;
        let mut ddf_x = 1;
        let mut ddf_y = -2 * r;
        let mut x = 0;
        let mut y = r;

        while x < y {
            if f >= 0 {
                y -= 1;
                ddf_y += 2;
                f += ddf_y;
            }
            x += 1;
            ddf_x += 2;
            f += ddf_x;
            if x > y {
                break;
            }
            let mirrored = x != y;

            if corners & corner::BOTTOM_RIGHT != 0 {
                self.set_pixel(x0 + x, y0 + y, color);
                if mirrored {
                    self.set_pixel(x0 + y, y0 + x, color);
                }
            }
            if corners & corner::TOP_RIGHT != 0 {
                self.set_pixel(x0 + x, y0 - y, color);
                if mirrored {
                    self.set_pixel(x0 + y, y0 - x, color);
                }
            }
            if corners & corner::BOTTOM_LEFT != 0 {
                self.set_pixel(x0 - x, y0 + y, color);
                if mirrored {
                    self.set_pixel(x0 - y, y0 + x, color);
                }
            }
            if corners & corner::TOP_LEFT != 0 {
                self.set_pixel(x0 - x, y0 - y, color);
                if mirrored {
                    self.set_pixel(x0 - y, y0 - x, color);
                }
            }
        }
    }

    /// Filled circle
    fn fill_circle(&mut self, x0: i32, y0: i32, r: i32, color: Color) {
        if r < 0 {
            return;
        }
        self.draw_fast_vline(x0, y0 - r, 2 * r + 1, color);
        self.fill_circle_helper(x0, y0, r, half::RIGHT | half::LEFT, 0, color);
    }

    /// Vertical spans filling the [`half`] circles selected by `sides`
    ///
    /// `delta` stretches every span downward, which lets rounded rectangles
    /// reuse this for their straight middle section. The centre column is not
    /// drawn.
    fn fill_circle_helper(
        &mut self,
        x0: i32,
        y0: i32,
        r: i32,
        sides: u8,
        delta: i32,
        color: Color,
    ) {
        if r <= 0 {
            return;
        }
        let mut f = 1 - r;
        let mut ddf_x = 1;
        let mut ddf_y = -2 * r;
        let mut x = 0;
        let mut y = r;
        let mut px = x;
        let mut py = y;
        let delta = delta + 1;

        while x < y {
            if f >= 0 {
                y -= 1;
                ddf_y += 2;
                f += ddf_y;
            }
            x += 1;
            ddf_x += 2;
            f += ddf_x;

            // Skip spans already drawn by the steep octant on the last step
            if x < y + 1 {
                if sides & half::RIGHT != 0 {
                    self.draw_fast_vline(x0 + x, y0 - y, 2 * y + delta, color);
                }
                if sides & half::LEFT != 0 {
                    self.draw_fast_vline(x0 - x, y0 - y, 2 * y + delta, color);
                }
            }
            if y != py {
                if sides & half::RIGHT != 0 {
                    self.draw_fast_vline(x0 + py, y0 - px, 2 * px + delta, color);
                }
                if sides & half::LEFT != 0 {
                    self.draw_fast_vline(x0 - py, y0 - px, 2 * px + delta, color);
                }
                py = y;
            }
            px = x;
        }
    }

    /// Triangle outline
    fn draw_triangle(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: Color,
    ) {
        self.draw_line(x0, y0, x1, y1, color);
        self.draw_line(x1, y1, x2, y2, color);
        self.draw_line(x2, y2, x0, y0, color);
    }

    /// Filled triangle, scan-converted one row at a time
    fn fill_triangle(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: Color,
    ) {
        let (mut x0, mut y0, mut x1, mut y1, mut x2, mut y2) = (x0, y0, x1, y1, x2, y2);

        // Sort by y: y0 <= y1 <= y2
        if y0 > y1 {
            core::mem::swap(&mut y0, &mut y1);
            core::mem::swap(&mut x0, &mut x1);
        }
        if y1 > y2 {
            core::mem::swap(&mut y2, &mut y1);
            core::mem::swap(&mut x2, &mut x1);
        }
        if y0 > y1 {
            core::mem::swap(&mut y0, &mut y1);
            core::mem::swap(&mut x0, &mut x1);
        }

        if y0 == y2 {
            let a = x0.min(x1).min(x2);
            let b = x0.max(x1).max(x2);
            self.draw_fast_hline(a, y0, b - a + 1, color);
            return;
        }

        let dx01 = x1 - x0;
        let dy01 = y1 - y0;
        let dx02 = x2 - x0;
        let dy02 = y2 - y0;
        let dx12 = x2 - x1;
        let dy12 = y2 - y1;
        let mut sa = 0;
        let mut sb = 0;

        // Upper part: edges 0-1 and 0-2. Include y1 only when the lower part
        // would be empty (flat bottom).
        let last = if y1 == y2 { y1 } else { y1 - 1 };

        let mut y = y0;
        while y <= last {
            let mut a = x0 + sa / dy01;
            let mut b = x0 + sb / dy02;
            sa += dx01;
            sb += dx02;
            if a > b {
                core::mem::swap(&mut a, &mut b);
            }
            self.draw_fast_hline(a, y, b - a + 1, color);
            y += 1;
        }

        // Lower part: edges 1-2 and 0-2
        sa = dx12 * (y - y1);
        sb = dx02 * (y - y0);
        while y <= y2 {
            let mut a = x1 + sa / dy12;
            let mut b = x0 + sb / dy02;
            sa += dx12;
            sb += dx02;
            if a > b {
                core::mem::swap(&mut a, &mut b);
            }
            self.draw_fast_hline(a, y, b - a + 1, color);
            y += 1;
        }
    }

    /// Rounded rectangle outline
    ///
    /// The radius is clamped to half the shorter side.
    fn draw_round_rect(&mut self, x: i32, y: i32, w: i32, h: i32, r: i32, color: Color) {
        if w <= 0 || h <= 0 {
            return;
        }
        let r = r.clamp(0, w.min(h) / 2);
        if r == 0 {
            self.draw_rect(x, y, w, h, color);
            return;
        }
        self.draw_fast_hline(x + r, y, w - 2 * r, color);
        self.draw_fast_hline(x + r, y + h - 1, w - 2 * r, color);
        self.draw_fast_vline(x, y + r, h - 2 * r, color);
        self.draw_fast_vline(x + w - 1, y + r, h - 2 * r, color);

        self.draw_circle_helper(x + r, y + r, r, corner::TOP_LEFT, color);
        self.draw_circle_helper(x + w - r - 1, y + r, r, corner::TOP_RIGHT, color);
        self.draw_circle_helper(x + w - r - 1, y + h - r - 1, r, corner::BOTTOM_RIGHT, color);
        self.draw_circle_helper(x + r, y + h - r - 1, r, corner::BOTTOM_LEFT, color);
    }

    /// Filled rounded rectangle
    fn fill_round_rect(&mut self, x: i32, y: i32, w: i32, h: i32, r: i32, color: Color) {
        if w <= 0 || h <= 0 {
            return;
        }
        let r = r.clamp(0, w.min(h) / 2);
        // Inner block spans the full height; the caps only add the side columns
        self.fill_rect(x + r, y, w - 2 * r, h, color);
        self.fill_circle_helper(x + w - r - 1, y + r, r, half::RIGHT, h - 2 * r - 1, color);
        self.fill_circle_helper(x + r, y + r, r, half::LEFT, h - 2 * r - 1, color);
    }
}

impl<T: PixelSink + ?Sized> Raster for T {}
