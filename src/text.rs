//! Text rendering
//!
//! [`draw_char`] renders one glyph of a [`Font`] onto any [`PixelSink`].
//! [`TextCursor`] layers a small state machine on top: it tracks the pen
//! position, scale, wrap mode and colors, and advances as characters are
//! written.
//!
//! Rendering is not atomic. A failing character in the middle of a string
//! leaves every earlier character drawn.
//!
//! ## Example
//!
//! ```
//! use monoraster::{font::FONT_5X8, PixelBuffer, TextCursor};
//!
//! let mut storage = [0u8; 128 * 64 / 8];
//! let mut buffer = match PixelBuffer::new(128, 64, &mut storage) {
//!     Ok(buffer) => buffer,
//!     Err(_) => return,
//! };
//! let mut cursor = TextCursor::new(FONT_5X8);
//! let _ = cursor.print(&mut buffer, "Hi\n42");
//! assert_eq!((cursor.x, cursor.y), (12, 8));
//! ```

use core::fmt::Write;

use crate::buffer::PixelSink;
use crate::color::Color;
use crate::font::{Font, FontEncoding, FontError};
use crate::raster::Raster;

/// Longest formatted number (`i64::MIN` is 20 characters)
pub const MAX_DIGITS: usize = 20;

/// Errors raised by text layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextError {
    /// The formatted value needs more columns than were reserved
    DigitCountExceeded {
        /// Reserved columns
        digits: usize,
        /// Columns the formatted value needs
        length: usize,
    },
    /// A character could not be rendered
    Font(FontError),
}

impl core::fmt::Display for TextError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::DigitCountExceeded { digits, length } => write!(
                f,
                "Number needs {length} columns but only {digits} are reserved"
            ),
            Self::Font(e) => write!(f, "{e}"),
        }
    }
}

impl core::error::Error for TextError {}

impl From<FontError> for TextError {
    fn from(e: FontError) -> Self {
        Self::Font(e)
    }
}

/// Render one glyph with its top-left corner at `(x, y)`
///
/// Set glyph bits draw `fg`; clear bits draw `bg` unless `bg == fg`, which
/// leaves the background untouched. Each glyph pixel becomes a
/// `scale x scale` block (a scale of 0 is treated as 1).
///
/// # Errors
///
/// Returns [`FontError::CharacterOutOfRange`] without writing any pixel if
/// the font has no glyph for `code`.
pub fn draw_char<S: PixelSink + ?Sized>(
    sink: &mut S,
    x: i32,
    y: i32,
    code: u8,
    font: &Font,
    fg: Color,
    bg: Color,
    scale: u8,
) -> Result<(), FontError> {
    let glyph = font.glyph(code)?;
    let scale = i32::from(scale.max(1));

    for col in 0..font.width() {
        for row in 0..font.height() {
            let color = if font.glyph_pixel(glyph, col, row) {
                fg
            } else if bg == fg {
                continue;
            } else {
                bg
            };
            let px = x + i32::from(col) * scale;
            let py = y + i32::from(row) * scale;
            if scale == 1 {
                sink.set_pixel(px, py, color);
            } else {
                sink.fill_rect(px, py, scale, scale, color);
            }
        }
    }
    Ok(())
}

/// Numeric text alignment inside a fixed number of character columns
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NumberAlignment {
    /// Start at column 0
    #[default]
    Left,
    /// End at the last column
    Right,
    /// Zero-pad to the full width
    RightWithLeadingZeros,
}

/// A number formatted for a fixed-width field
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumberLayout {
    /// First character column within the field
    pub column: usize,
    /// Formatted text
    pub text: heapless::String<MAX_DIGITS>,
}

/// Format `value` into a field of `digits` character columns
///
/// # Errors
///
/// Returns [`TextError::DigitCountExceeded`] if the formatted value (after
/// zero padding, if requested) is longer than `digits`, or if `digits`
/// exceeds [`MAX_DIGITS`].
pub fn layout_number(
    value: i64,
    digits: usize,
    alignment: NumberAlignment,
) -> Result<NumberLayout, TextError> {
    if digits > MAX_DIGITS {
        return Err(TextError::DigitCountExceeded {
            digits,
            length: digits,
        });
    }
    let mut text = heapless::String::<MAX_DIGITS>::new();
    let formatted = match alignment {
        NumberAlignment::RightWithLeadingZeros => {
            write!(text, "{:0width$}", value, width = digits)
        }
        NumberAlignment::Left | NumberAlignment::Right => write!(text, "{value}"),
    };
    if formatted.is_err() || text.len() > digits {
        return Err(TextError::DigitCountExceeded {
            digits,
            length: text.len().max(digits + 1),
        });
    }
    let column = match alignment {
        NumberAlignment::Right => digits - text.len(),
        NumberAlignment::Left | NumberAlignment::RightWithLeadingZeros => 0,
    };
    Ok(NumberLayout { column, text })
}

/// Text pen state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextCursor {
    /// Pen X position in pixels
    pub x: i32,
    /// Pen Y position in pixels
    pub y: i32,
    /// Pixel scale factor
    pub scale: u8,
    /// Wrap to a new line at the right edge
    pub wrap: bool,
    /// Glyph color
    pub fg: Color,
    /// Cell background color; equal to `fg` for transparent text
    pub bg: Color,
    /// Active font
    pub font: Font,
}

impl TextCursor {
    /// Cursor at the origin with opaque text at scale 1
    pub fn new(font: Font) -> Self {
        Self {
            x: 0,
            y: 0,
            scale: 1,
            wrap: true,
            fg: Color::Foreground,
            bg: Color::Background,
            font,
        }
    }

    /// Move the pen
    pub fn set_cursor(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    /// Set text colors
    pub fn set_colors(&mut self, fg: Color, bg: Color) {
        self.fg = fg;
        self.bg = bg;
    }

    /// Horizontal advance per character
    pub fn pitch(&self) -> i32 {
        (i32::from(self.font.width()) + 1) * i32::from(self.scale.max(1))
    }

    /// Vertical advance per line
    pub fn line_height(&self) -> i32 {
        i32::from(self.font.height()) * i32::from(self.scale.max(1))
    }

    /// Write one character and advance the pen
    ///
    /// `'\n'` starts a new line, `'\r'` is ignored. With a
    /// [`FontEncoding::PackedRowsWide`] font, `'.'` is drawn as a filled
    /// circle rather than looked up in the glyph table.
    ///
    /// # Errors
    ///
    /// Returns [`FontError::CharacterOutOfRange`] if the font has no glyph for
    /// `code`; the pen does not move.
    pub fn write<S: PixelSink + ?Sized>(
        &mut self,
        sink: &mut S,
        code: u8,
    ) -> Result<(), FontError> {
        match code {
            b'\n' => {
                self.x = 0;
                self.y += self.line_height();
            }
            b'\r' => {}
            b'.' if self.font.encoding() == FontEncoding::PackedRowsWide => {
                self.draw_decimal_point(sink);
                self.advance(sink);
            }
            _ => {
                draw_char(
                    sink, self.x, self.y, code, &self.font, self.fg, self.bg, self.scale,
                )?;
                self.advance(sink);
            }
        }
        Ok(())
    }

    /// Write every byte of `text`, stopping at the first error
    pub fn print<S: PixelSink + ?Sized>(
        &mut self,
        sink: &mut S,
        text: &str,
    ) -> Result<(), FontError> {
        text.bytes().try_for_each(|code| self.write(sink, code))
    }

    /// Render `value` in a field of `digits` characters starting at the pen
    ///
    /// Leading columns of a right-aligned field are skipped, not cleared.
    pub fn draw_number<S: PixelSink + ?Sized>(
        &mut self,
        sink: &mut S,
        value: i64,
        digits: usize,
        alignment: NumberAlignment,
    ) -> Result<(), TextError> {
        let layout = layout_number(value, digits, alignment)?;
        self.x += layout.column as i32 * self.pitch();
        self.print(sink, &layout.text)?;
        Ok(())
    }

    // Large numeral fonts carry no '.' glyph; the text layer borrows the
    // circle primitive instead, centred horizontally near the cell bottom.
    fn draw_decimal_point<S: PixelSink + ?Sized>(&self, sink: &mut S) {
        let scale = i32::from(self.scale.max(1));
        let w = i32::from(self.font.width()) * scale;
        let h = i32::from(self.font.height()) * scale;
        let r = (w / 8).max(1);
        sink.fill_circle(self.x + w / 2, self.y + h - r - 1, r, self.fg);
    }

    fn advance<S: PixelSink + ?Sized>(&mut self, sink: &S) {
        self.x += self.pitch();
        let glyph_w = i32::from(self.font.width()) * i32::from(self.scale.max(1));
        let (width, _) = sink.logical_size();
        if self.wrap && self.x > width - glyph_w {
            self.x = 0;
            self.y += self.line_height();
        }
    }
}
