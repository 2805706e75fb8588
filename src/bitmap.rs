//! Bitmap blitting
//!
//! Copies a 1bpp source image onto a [`PixelSink`]. Two source layouts are
//! supported, selected by [`BitmapMode`]:
//!
//! - **Vertical**: page strips, the same layout the framebuffer uses. Byte
//!   `data[page * width + col]` holds 8 rows of column `col`, LSB at the top.
//! - **Horizontal**: row-major, `ceil(width / 8)` bytes per row, MSB leftmost.
//!
//! Every source bit is written, set bits as `fg` and clear bits as `bg`, so a
//! blit fully overwrites its destination rectangle.

use crate::buffer::PixelSink;
use crate::color::Color;

/// Source layout of a bitmap
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BitmapMode {
    /// Page strips, LSB at the top
    #[default]
    Vertical,
    /// Row-major, MSB first
    Horizontal,
}

/// Errors raised while blitting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitmapError {
    /// Source data is shorter than the bitmap geometry requires
    DataTooShort {
        /// Bytes the geometry requires
        required: usize,
        /// Bytes supplied
        provided: usize,
    },
}

impl core::fmt::Display for BitmapError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::DataTooShort { required, provided } => write!(
                f,
                "Bitmap data too short: {required} bytes required, {provided} provided"
            ),
        }
    }
}

impl core::error::Error for BitmapError {}

/// Borrowed 1bpp image
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bitmap<'a> {
    /// Packed pixel data
    pub data: &'a [u8],
    /// Width in pixels
    pub width: u16,
    /// Height in pixels
    pub height: u16,
}

impl<'a> Bitmap<'a> {
    /// Wrap packed data of the given size
    pub const fn new(data: &'a [u8], width: u16, height: u16) -> Self {
        Self {
            data,
            width,
            height,
        }
    }

    /// Bytes required to hold the image in `mode`
    pub fn required_len(&self, mode: BitmapMode) -> usize {
        let (w, h) = (self.width as usize, self.height as usize);
        match mode {
            BitmapMode::Vertical => w * h.div_ceil(8),
            BitmapMode::Horizontal => w.div_ceil(8) * h,
        }
    }

    /// Source bit at `(col, row)`; callers stay within bounds
    fn bit(&self, col: usize, row: usize, mode: BitmapMode) -> bool {
        let (index, mask) = match mode {
            BitmapMode::Vertical => (
                (row / 8) * self.width as usize + col,
                1u8 << (row & 7),
            ),
            BitmapMode::Horizontal => (
                row * (self.width as usize).div_ceil(8) + col / 8,
                0x80u8 >> (col & 7),
            ),
        };
        self.data.get(index).is_some_and(|byte| byte & mask != 0)
    }
}

/// Blit `bitmap` with its top-left corner at `(x, y)`
///
/// Destination pixels outside the sink are clipped.
///
/// # Errors
///
/// Returns [`BitmapError::DataTooShort`] without writing anything if the data
/// is shorter than [`Bitmap::required_len`].
pub fn draw_bitmap<S: PixelSink + ?Sized>(
    sink: &mut S,
    x: i32,
    y: i32,
    bitmap: &Bitmap<'_>,
    fg: Color,
    bg: Color,
    mode: BitmapMode,
) -> Result<(), BitmapError> {
    let required = bitmap.required_len(mode);
    if bitmap.data.len() < required {
        return Err(BitmapError::DataTooShort {
            required,
            provided: bitmap.data.len(),
        });
    }

    for row in 0..bitmap.height {
        for col in 0..bitmap.width {
            let color = if bitmap.bit(col as usize, row as usize, mode) {
                fg
            } else {
                bg
            };
            sink.set_pixel(x + i32::from(col), y + i32::from(row), color);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::PixelBuffer;

    #[test]
    fn test_required_len() {
        let bitmap = Bitmap::new(&[], 10, 12);
        assert_eq!(bitmap.required_len(BitmapMode::Vertical), 20);
        assert_eq!(bitmap.required_len(BitmapMode::Horizontal), 24);
    }

    #[test]
    fn test_short_data_writes_nothing() {
        let mut storage = [0u8; 1024];
        let mut buffer = PixelBuffer::new(128, 64, &mut storage).unwrap();
        let data = [0xFFu8; 3];
        let bitmap = Bitmap::new(&data, 8, 8);
        let result = draw_bitmap(
            &mut buffer,
            0,
            0,
            &bitmap,
            Color::Foreground,
            Color::Background,
            BitmapMode::Horizontal,
        );
        assert_eq!(
            result,
            Err(BitmapError::DataTooShort {
                required: 8,
                provided: 3
            })
        );
        assert!(buffer.as_bytes().iter().all(|b| *b == 0));
    }

    #[test]
    fn test_vertical_matches_page_layout() {
        let mut storage = [0u8; 1024];
        let mut buffer = PixelBuffer::new(128, 64, &mut storage).unwrap();
        let data = [0x01, 0x80, 0x3C];
        let bitmap = Bitmap::new(&data, 3, 8);
        draw_bitmap(
            &mut buffer,
            0,
            0,
            &bitmap,
            Color::Foreground,
            Color::Background,
            BitmapMode::Vertical,
        )
        .unwrap();
        assert_eq!(&buffer.as_bytes()[0..3], &data);
    }

    #[test]
    fn test_vertical_skips_rows_past_height() {
        let mut storage = [0u8; 1024];
        let mut buffer = PixelBuffer::new(128, 64, &mut storage).unwrap();
        let data = [0xFFu8; 2];
        let bitmap = Bitmap::new(&data, 2, 5);
        draw_bitmap(
            &mut buffer,
            0,
            0,
            &bitmap,
            Color::Foreground,
            Color::Background,
            BitmapMode::Vertical,
        )
        .unwrap();
        assert_eq!(&buffer.as_bytes()[0..2], &[0x1F, 0x1F]);
    }

    #[test]
    fn test_horizontal_msb_first() {
        let mut storage = [0u8; 1024];
        let mut buffer = PixelBuffer::new(128, 64, &mut storage).unwrap();
        // 10 wide: 2 bytes per row
        let data = [0x80, 0x40, 0x01, 0x00];
        let bitmap = Bitmap::new(&data, 10, 2);
        draw_bitmap(
            &mut buffer,
            4,
            0,
            &bitmap,
            Color::Foreground,
            Color::Background,
            BitmapMode::Horizontal,
        )
        .unwrap();
        assert_eq!(buffer.pixel(4, 0), Some(true));
        assert_eq!(buffer.pixel(13, 0), Some(true));
        assert_eq!(buffer.pixel(11, 1), Some(true));
        assert_eq!(buffer.pixel(5, 0), Some(false));
        assert_eq!(buffer.pixel(12, 1), Some(false));
    }

    #[test]
    fn test_blit_overwrites_background() {
        let mut storage = [0xFFu8; 1024];
        let mut buffer = PixelBuffer::new(128, 64, &mut storage).unwrap();
        let data = [0x00u8; 8];
        let bitmap = Bitmap::new(&data, 8, 8);
        draw_bitmap(
            &mut buffer,
            0,
            0,
            &bitmap,
            Color::Foreground,
            Color::Background,
            BitmapMode::Horizontal,
        )
        .unwrap();
        assert!(buffer.as_bytes()[0..8].iter().all(|b| *b == 0));
        assert_eq!(buffer.as_bytes()[8], 0xFF);
    }

    #[test]
    fn test_full_screen_reblit_is_identical() {
        let data = [0xFFu8; 128 / 8 * 64];
        let bitmap = Bitmap::new(&data, 128, 64);
        let mut storage = [0u8; 1024];
        let mut buffer = PixelBuffer::new(128, 64, &mut storage).unwrap();
        draw_bitmap(
            &mut buffer,
            0,
            0,
            &bitmap,
            Color::Foreground,
            Color::Background,
            BitmapMode::Horizontal,
        )
        .unwrap();
        let mut first = [0u8; 1024];
        first.copy_from_slice(buffer.as_bytes());
        assert!(first.iter().all(|b| *b == 0xFF));

        buffer.clear();
        assert!(buffer.as_bytes().iter().all(|b| *b == 0));

        draw_bitmap(
            &mut buffer,
            0,
            0,
            &bitmap,
            Color::Foreground,
            Color::Background,
            BitmapMode::Horizontal,
        )
        .unwrap();
        assert_eq!(buffer.as_bytes(), &first[..]);
    }

    #[test]
    fn test_clipped_at_panel_edge() {
        let mut storage = [0u8; 1024];
        let mut buffer = PixelBuffer::new(128, 64, &mut storage).unwrap();
        let data = [0xFFu8; 8];
        let bitmap = Bitmap::new(&data, 8, 8);
        draw_bitmap(
            &mut buffer,
            124,
            -4,
            &bitmap,
            Color::Foreground,
            Color::Background,
            BitmapMode::Vertical,
        )
        .unwrap();
        assert_eq!(&buffer.as_bytes()[124..128], &[0x0F; 4]);
        assert_eq!(buffer.as_bytes()[123], 0);
    }
}
