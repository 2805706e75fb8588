//! Page-organized framebuffer
//!
//! [`PixelBuffer`] borrows a caller-owned byte slice of exactly
//! `width * (height / 8)` bytes and exposes the pixel-set primitive every
//! drawing algorithm in this crate is built on. The caller keeps ownership of
//! the storage; the buffer only validates its size.
//!
//! [`PixelSink`] is the seam between drawing algorithms and storage. Raster,
//! text and bitmap operations are written against it, so anything that can set
//! a pixel can be drawn on.
//!
//! ## Example
//!
//! ```
//! use monoraster::{Color, PixelBuffer, PixelSink};
//!
//! let mut storage = [0u8; 128 * 64 / 8];
//! let mut buffer = match PixelBuffer::new(128, 64, &mut storage) {
//!     Ok(buffer) => buffer,
//!     Err(_) => return,
//! };
//! buffer.set_pixel(3, 9, Color::Foreground);
//! assert_eq!(buffer.pixel(3, 9), Some(true));
//! assert_eq!(buffer.as_bytes()[128 + 3], 0x02);
//! ```

use crate::color::Color;
use crate::config::Rotation;
use crate::error::{BufferError, MAX_COLUMNS, MAX_ROWS};
use crate::rotation::apply_rotation;

/// Something pixels can be drawn on
///
/// Coordinates are logical (after rotation). Implementations must treat
/// out-of-range coordinates as a no-op.
pub trait PixelSink {
    /// Logical `(width, height)` of the drawing surface
    fn logical_size(&self) -> (i32, i32);

    /// Set a single pixel
    fn set_pixel(&mut self, x: i32, y: i32, color: Color);
}

/// Byte-packed 1bpp framebuffer in page layout
#[derive(Debug)]
pub struct PixelBuffer<'a> {
    width: u16,
    height: u16,
    rotation: Rotation,
    data: &'a mut [u8],
}

impl<'a> PixelBuffer<'a> {
    /// Wrap a caller-owned slice as a framebuffer
    ///
    /// # Errors
    ///
    /// - [`BufferError::BufferNullptr`] if `data` is empty
    /// - [`BufferError::Dimensions`] if `width > MAX_COLUMNS` or
    ///   `height > MAX_ROWS`
    /// - [`BufferError::BufferSize`] if `data.len() != width * (height / 8)`
    pub fn new(width: u16, height: u16, data: &'a mut [u8]) -> Result<Self, BufferError> {
        if data.is_empty() {
            return Err(BufferError::BufferNullptr);
        }
        if width > MAX_COLUMNS || height > MAX_ROWS {
            return Err(BufferError::Dimensions { width, height });
        }
        let required = width as usize * (height as usize / 8);
        if data.len() != required || !height.is_multiple_of(8) {
            return Err(BufferError::BufferSize {
                required,
                provided: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rotation: Rotation::Rotate0,
            data,
        })
    }

    /// Physical width in pixels
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Physical height in pixels
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Number of 8-row pages
    pub fn pages(&self) -> u16 {
        self.height / 8
    }

    /// Current rotation
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Set the rotation used by subsequent pixel writes
    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    /// Read a pixel through the current rotation
    ///
    /// Returns `None` for coordinates outside the panel.
    pub fn pixel(&self, x: i32, y: i32) -> Option<bool> {
        let (index, bit) = apply_rotation(
            x,
            y,
            u32::from(self.width),
            u32::from(self.height),
            self.rotation,
        )?;
        self.data.get(index).map(|byte| byte & bit != 0)
    }

    /// Zero the whole buffer
    pub fn clear(&mut self) {
        self.data.fill(0x00);
    }

    /// Fill every byte with `value`
    pub fn fill(&mut self, value: u8) {
        self.data.fill(value);
    }

    /// Paint every pixel with `color`, ignoring rotation
    pub fn fill_color(&mut self, color: Color) {
        match color.fill_byte() {
            Some(value) => self.data.fill(value),
            None => self.data.iter_mut().for_each(|byte| *byte = !*byte),
        }
    }

    /// Raw page-organized bytes
    pub fn as_bytes(&self) -> &[u8] {
        &*self.data
    }

    /// Mutable raw page-organized bytes
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut *self.data
    }

    /// Bytes of one page, or `None` past the last page
    pub fn page(&self, page: u16) -> Option<&[u8]> {
        let start = page as usize * self.width as usize;
        self.data.get(start..start + self.width as usize)
    }
}

impl PixelSink for PixelBuffer<'_> {
    fn logical_size(&self) -> (i32, i32) {
        if self.rotation.is_transposed() {
            (i32::from(self.height), i32::from(self.width))
        } else {
            (i32::from(self.width), i32::from(self.height))
        }
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        let Some((index, bit)) = apply_rotation(
            x,
            y,
            u32::from(self.width),
            u32::from(self.height),
            self.rotation,
        ) else {
            return;
        };
        if let Some(byte) = self.data.get_mut(index) {
            *byte = color.apply(*byte, bit);
        }
    }
}
