//! Pixel colors for monochrome displays
//!
//! This module defines the [`Color`] enum used by every drawing operation.
//! Monochrome panels store one bit per pixel, so a "color" is really an
//! operation on that bit:
//!
//! | Color        | Effect on the pixel bit |
//! |--------------|-------------------------|
//! | `Foreground` | set (1)                 |
//! | `Background` | clear (0)               |
//! | `Invert`     | toggle (XOR)            |
//!
//! ## Example
//!
//! ```
//! use monoraster::Color;
//!
//! assert_eq!(Color::Foreground.apply(0x00, 0x01), 0x01);
//! assert_eq!(Color::Background.apply(0xFF, 0x01), 0xFE);
//! assert_eq!(Color::Invert.apply(0x01, 0x01), 0x00);
//! ```

/// Pixel color of a monochrome display
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Color {
    /// Lit pixel (bit set)
    #[default]
    Foreground,
    /// Unlit pixel (bit cleared)
    Background,
    /// Toggle whatever the pixel currently holds
    Invert,
}

#[cfg(feature = "graphics")]
impl embedded_graphics_core::prelude::PixelColor for Color {
    type Raw = embedded_graphics_core::pixelcolor::raw::RawU1;
}

#[cfg(feature = "graphics")]
impl From<embedded_graphics_core::pixelcolor::BinaryColor> for Color {
    fn from(color: embedded_graphics_core::pixelcolor::BinaryColor) -> Self {
        match color {
            embedded_graphics_core::pixelcolor::BinaryColor::On => Self::Foreground,
            embedded_graphics_core::pixelcolor::BinaryColor::Off => Self::Background,
        }
    }
}

impl Color {
    /// Apply the color to `byte` at the bits selected by `mask`
    pub fn apply(self, byte: u8, mask: u8) -> u8 {
        match self {
            Self::Foreground => byte | mask,
            Self::Background => byte & !mask,
            Self::Invert => byte ^ mask,
        }
    }

    /// Byte value used when filling a whole page with this color
    ///
    /// `Invert` has no fixed fill value and returns `None`.
    pub fn fill_byte(self) -> Option<u8> {
        match self {
            Self::Foreground => Some(0xFF),
            Self::Background => Some(0x00),
            Self::Invert => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_foreground_sets_only_masked_bits() {
        assert_eq!(Color::Foreground.apply(0b1000_0000, 0b0000_0100), 0b1000_0100);
    }

    #[test]
    fn test_apply_invert_twice_restores_byte() {
        let once = Color::Invert.apply(0xA5, 0x10);
        assert_eq!(Color::Invert.apply(once, 0x10), 0xA5);
    }

    #[test]
    fn test_fill_byte() {
        assert_eq!(Color::Foreground.fill_byte(), Some(0xFF));
        assert_eq!(Color::Background.fill_byte(), Some(0x00));
        assert_eq!(Color::Invert.fill_byte(), None);
    }
}
