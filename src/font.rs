//! Bitmap fonts
//!
//! A [`Font`] pairs a [`FontDescriptor`] with its glyph table. Two table
//! encodings are supported:
//!
//! - [`FontEncoding::PackedColumns`]: each glyph is `width` columns of
//!   `height / 8` page bytes, stored page-major (every column of page 0, then
//!   page 1, ...). Bit 0 of each byte is the top row of its page. This matches
//!   the panel's own memory layout and is used for small and medium fonts.
//! - [`FontEncoding::PackedRowsWide`]: each glyph is `height` rows of one
//!   big-endian 16-bit word, MSB leftmost. Used for large numerals that are
//!   not page aligned.
//!
//! Glyph tables are opaque data supplied by the caller. [`FONT_5X8`] is
//! bundled so text works without any.
//!
//! ## Example
//!
//! ```
//! use monoraster::font::{FontError, FONT_5X8};
//!
//! assert_eq!(FONT_5X8.glyph_index(b'A'), Ok(33));
//! assert!(matches!(
//!     FONT_5X8.glyph_index(0x7F),
//!     Err(FontError::CharacterOutOfRange { code: 0x7F, .. })
//! ));
//! ```

/// Glyph table encoding
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontEncoding {
    /// Page-aligned column bytes, LSB at the top
    PackedColumns,
    /// 16-bit rows, MSB first
    PackedRowsWide,
}

/// Geometry and code range of a font
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FontDescriptor {
    /// Caller-chosen identifier
    pub id: u8,
    /// Glyph width in pixels
    pub width: u8,
    /// Glyph height in pixels
    pub height: u8,
    /// Character code of the first glyph
    pub ascii_offset: u8,
    /// Number of glyphs in the table
    pub glyph_count: u8,
    /// Table encoding
    pub encoding: FontEncoding,
}

impl FontDescriptor {
    /// Bytes occupied by one glyph
    pub const fn glyph_size(&self) -> usize {
        match self.encoding {
            FontEncoding::PackedColumns => self.width as usize * (self.height as usize / 8),
            FontEncoding::PackedRowsWide => self.height as usize * 2,
        }
    }
}

/// Errors raised by font lookup and construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontError {
    /// The character has no glyph in this font
    CharacterOutOfRange {
        /// Requested character code
        code: u8,
        /// First supported code
        first: u8,
        /// Number of supported codes
        count: u8,
    },
    /// The glyph table does not match the descriptor
    InvalidFontData {
        /// Bytes the descriptor requires
        expected: usize,
        /// Bytes supplied
        provided: usize,
    },
}

impl core::fmt::Display for FontError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::CharacterOutOfRange { code, first, count } => write!(
                f,
                "Character 0x{code:02X} outside font range 0x{first:02X}+{count}"
            ),
            Self::InvalidFontData { expected, provided } => write!(
                f,
                "Invalid font data: expected {expected} bytes, provided {provided}"
            ),
        }
    }
}

impl core::error::Error for FontError {}

/// A font: descriptor plus glyph table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Font {
    descriptor: FontDescriptor,
    data: &'static [u8],
}

impl Font {
    /// Create a font, checking the table against the descriptor
    ///
    /// # Errors
    ///
    /// Returns [`FontError::InvalidFontData`] if the table length is not
    /// `glyph_count * glyph_size`, if a `PackedColumns` height is not a
    /// multiple of 8, or if a `PackedRowsWide` glyph is wider than 16 pixels.
    pub const fn new(descriptor: FontDescriptor, data: &'static [u8]) -> Result<Self, FontError> {
        let expected = descriptor.glyph_count as usize * descriptor.glyph_size();
        let shape_ok = match descriptor.encoding {
            FontEncoding::PackedColumns => descriptor.height % 8 == 0,
            FontEncoding::PackedRowsWide => descriptor.width <= 16,
        };
        if !shape_ok || descriptor.width == 0 || descriptor.height == 0 || data.len() != expected
        {
            return Err(FontError::InvalidFontData {
                expected,
                provided: data.len(),
            });
        }
        Ok(Self { descriptor, data })
    }

    /// Font descriptor
    pub const fn descriptor(&self) -> &FontDescriptor {
        &self.descriptor
    }

    /// Glyph width in pixels
    pub const fn width(&self) -> u8 {
        self.descriptor.width
    }

    /// Glyph height in pixels
    pub const fn height(&self) -> u8 {
        self.descriptor.height
    }

    /// Table encoding
    pub const fn encoding(&self) -> FontEncoding {
        self.descriptor.encoding
    }

    /// Index of the glyph for `code`
    ///
    /// # Errors
    ///
    /// Returns [`FontError::CharacterOutOfRange`] unless
    /// `code - ascii_offset` lies in `[0, glyph_count)`.
    pub const fn glyph_index(&self, code: u8) -> Result<usize, FontError> {
        let first = self.descriptor.ascii_offset;
        let count = self.descriptor.glyph_count;
        if code < first || (code - first) >= count {
            return Err(FontError::CharacterOutOfRange { code, first, count });
        }
        Ok((code - first) as usize)
    }

    /// Raw bytes of the glyph for `code`
    pub fn glyph(&self, code: u8) -> Result<&'static [u8], FontError> {
        let index = self.glyph_index(code)?;
        let size = self.descriptor.glyph_size();
        let data: &'static [u8] = self.data;
        data.get(index * size..(index + 1) * size)
            .ok_or(FontError::InvalidFontData {
                expected: (index + 1) * size,
                provided: data.len(),
            })
    }

    /// Whether the glyph pixel at `(col, row)` is set
    ///
    /// `glyph` must come from [`Font::glyph`] of this font.
    pub fn glyph_pixel(&self, glyph: &[u8], col: u8, row: u8) -> bool {
        let d = &self.descriptor;
        if col >= d.width || row >= d.height {
            return false;
        }
        match d.encoding {
            FontEncoding::PackedColumns => {
                let index = (row as usize / 8) * d.width as usize + col as usize;
                glyph.get(index).is_some_and(|byte| byte & (1 << (row & 7)) != 0)
            }
            FontEncoding::PackedRowsWide => {
                let index = row as usize * 2;
                match (glyph.get(index), glyph.get(index + 1)) {
                    (Some(hi), Some(lo)) => {
                        let word = u16::from_be_bytes([*hi, *lo]);
                        word & (0x8000 >> col) != 0
                    }
                    _ => false,
                }
            }
        }
    }
}

/// Identifier of [`FONT_5X8`]
pub const FONT_5X8_ID: u8 = 1;

const FONT_5X8_DESCRIPTOR: FontDescriptor = FontDescriptor {
    id: FONT_5X8_ID,
    width: 5,
    height: 8,
    ascii_offset: 0x20,
    glyph_count: 95,
    encoding: FontEncoding::PackedColumns,
};

/// Default 5x8 ASCII font (0x20 to 0x7E)
pub const FONT_5X8: Font = Font {
    descriptor: FONT_5X8_DESCRIPTOR,
    data: &FONT_5X8_DATA,
};

#[rustfmt::skip]
const FONT_5X8_DATA: [u8; 95 * 5] = [
    0x00, 0x00, 0x00, 0x00, 0x00, // 0x20
    0x00, 0x00, 0x5F, 0x00, 0x00, // 0x21
    0x00, 0x07, 0x00, 0x07, 0x00, // 0x22
    0x14, 0x7F, 0x14, 0x7F, 0x14, // 0x23
    0x24, 0x2A, 0x7F, 0x2A, 0x12, // 0x24
    0x23, 0x13, 0x08, 0x64, 0x62, // 0x25
    0x36, 0x49, 0x55, 0x22, 0x50, // 0x26
    0x00, 0x05, 0x03, 0x00, 0x00, // 0x27
    0x00, 0x1C, 0x22, 0x41, 0x00, // 0x28
    0x00, 0x41, 0x22, 0x1C, 0x00, // 0x29
    0x08, 0x2A, 0x1C, 0x2A, 0x08, // 0x2A
    0x08, 0x08, 0x3E, 0x08, 0x08, // 0x2B
    0x00, 0x50, 0x30, 0x00, 0x00, // 0x2C
    0x08, 0x08, 0x08, 0x08, 0x08, // 0x2D
    0x00, 0x60, 0x60, 0x00, 0x00, // 0x2E
    0x20, 0x10, 0x08, 0x04, 0x02, // 0x2F
    0x3E, 0x51, 0x49, 0x45, 0x3E, // 0x30
    0x00, 0x42, 0x7F, 0x40, 0x00, // 0x31
    0x42, 0x61, 0x51, 0x49, 0x46, // 0x32
    0x21, 0x41, 0x45, 0x4B, 0x31, // 0x33
    0x18, 0x14, 0x12, 0x7F, 0x10, // 0x34
    0x27, 0x45, 0x45, 0x45, 0x39, // 0x35
    0x3C, 0x4A, 0x49, 0x49, 0x30, // 0x36
    0x01, 0x71, 0x09, 0x05, 0x03, // 0x37
    0x36, 0x49, 0x49, 0x49, 0x36, // 0x38
    0x06, 0x49, 0x49, 0x29, 0x1E, // 0x39
    0x00, 0x36, 0x36, 0x00, 0x00, // 0x3A
    0x00, 0x56, 0x36, 0x00, 0x00, // 0x3B
    0x00, 0x08, 0x14, 0x22, 0x41, // 0x3C
    0x14, 0x14, 0x14, 0x14, 0x14, // 0x3D
    0x41, 0x22, 0x14, 0x08, 0x00, // 0x3E
    0x02, 0x01, 0x51, 0x09, 0x06, // 0x3F
    0x32, 0x49, 0x79, 0x41, 0x3E, // 0x40
    0x7E, 0x11, 0x11, 0x11, 0x7E, // 0x41
    0x7F, 0x49, 0x49, 0x49, 0x36, // 0x42
    0x3E, 0x41, 0x41, 0x41, 0x22, // 0x43
    0x7F, 0x41, 0x41, 0x22, 0x1C, // 0x44
    0x7F, 0x49, 0x49, 0x49, 0x41, // 0x45
    0x7F, 0x09, 0x09, 0x01, 0x01, // 0x46
    0x3E, 0x41, 0x41, 0x51, 0x32, // 0x47
    0x7F, 0x08, 0x08, 0x08, 0x7F, // 0x48
    0x00, 0x41, 0x7F, 0x41, 0x00, // 0x49
    0x20, 0x40, 0x41, 0x3F, 0x01, // 0x4A
    0x7F, 0x08, 0x14, 0x22, 0x41, // 0x4B
    0x7F, 0x40, 0x40, 0x40, 0x40, // 0x4C
    0x7F, 0x02, 0x04, 0x02, 0x7F, // 0x4D
    0x7F, 0x04, 0x08, 0x10, 0x7F, // 0x4E
    0x3E, 0x41, 0x41, 0x41, 0x3E, // 0x4F
    0x7F, 0x09, 0x09, 0x09, 0x06, // 0x50
    0x3E, 0x41, 0x51, 0x21, 0x5E, // 0x51
    0x7F, 0x09, 0x19, 0x29, 0x46, // 0x52
    0x46, 0x49, 0x49, 0x49, 0x31, // 0x53
    0x01, 0x01, 0x7F, 0x01, 0x01, // 0x54
    0x3F, 0x40, 0x40, 0x40, 0x3F, // 0x55
    0x1F, 0x20, 0x40, 0x20, 0x1F, // 0x56
    0x7F, 0x20, 0x18, 0x20, 0x7F, // 0x57
    0x63, 0x14, 0x08, 0x14, 0x63, // 0x58
    0x03, 0x04, 0x78, 0x04, 0x03, // 0x59
    0x61, 0x51, 0x49, 0x45, 0x43, // 0x5A
    0x00, 0x00, 0x7F, 0x41, 0x41, // 0x5B
    0x02, 0x04, 0x08, 0x10, 0x20, // 0x5C
    0x41, 0x41, 0x7F, 0x00, 0x00, // 0x5D
    0x04, 0x02, 0x01, 0x02, 0x04, // 0x5E
    0x40, 0x40, 0x40, 0x40, 0x40, // 0x5F
    0x00, 0x01, 0x02, 0x04, 0x00, // 0x60
    0x20, 0x54, 0x54, 0x54, 0x78, // 0x61
    0x7F, 0x48, 0x44, 0x44, 0x38, // 0x62
    0x38, 0x44, 0x44, 0x44, 0x20, // 0x63
    0x38, 0x44, 0x44, 0x48, 0x7F, // 0x64
    0x38, 0x54, 0x54, 0x54, 0x18, // 0x65
    0x08, 0x7E, 0x09, 0x01, 0x02, // 0x66
    0x08, 0x14, 0x54, 0x54, 0x3C, // 0x67
    0x7F, 0x08, 0x04, 0x04, 0x78, // 0x68
    0x00, 0x44, 0x7D, 0x40, 0x00, // 0x69
    0x20, 0x40, 0x44, 0x3D, 0x00, // 0x6A
    0x7F, 0x10, 0x28, 0x44, 0x00, // 0x6B
    0x00, 0x41, 0x7F, 0x40, 0x00, // 0x6C
    0x7C, 0x04, 0x18, 0x04, 0x78, // 0x6D
    0x7C, 0x08, 0x04, 0x04, 0x78, // 0x6E
    0x38, 0x44, 0x44, 0x44, 0x38, // 0x6F
    0x7C, 0x14, 0x14, 0x14, 0x08, // 0x70
    0x08, 0x14, 0x14, 0x18, 0x7C, // 0x71
    0x7C, 0x08, 0x04, 0x04, 0x08, // 0x72
    0x48, 0x54, 0x54, 0x54, 0x20, // 0x73
    0x04, 0x3F, 0x44, 0x40, 0x20, // 0x74
    0x3C, 0x40, 0x40, 0x20, 0x7C, // 0x75
    0x1C, 0x20, 0x40, 0x20, 0x1C, // 0x76
    0x3C, 0x40, 0x30, 0x40, 0x3C, // 0x77
    0x44, 0x28, 0x10, 0x28, 0x44, // 0x78
    0x0C, 0x50, 0x50, 0x50, 0x3C, // 0x79
    0x44, 0x64, 0x54, 0x4C, 0x44, // 0x7A
    0x00, 0x08, 0x36, 0x41, 0x00, // 0x7B
    0x00, 0x00, 0x7F, 0x00, 0x00, // 0x7C
    0x00, 0x41, 0x36, 0x08, 0x00, // 0x7D
    0x08, 0x04, 0x08, 0x10, 0x08, // 0x7E
];
