//! Page-addressed controller command definitions
//!
//! Opcodes shared by the SSD1306, SH1106 and ST7565 family of 1bpp
//! controllers. Power-on register tables differ per controller and are
//! supplied by the caller to [`Driver::init`](crate::Driver::init); only the
//! commands the driver itself issues live here.
//!
//! ## Page Addressing
//!
//! Display RAM is split into pages of 8 rows. Before streaming a page, the
//! controller is pointed at it with three single-byte commands:
//!
//! 1. `SET_LOW_COLUMN | (column & 0x0F)`
//! 2. `SET_HIGH_COLUMN | (column >> 4)`
//! 3. `SET_PAGE_ADDRESS | page`
//!
//! ## Example
//!
//! ```
//! use monoraster::command;
//!
//! // Column 0x2A of page 3
//! let sequence = [
//!     command::SET_LOW_COLUMN | 0x0A,
//!     command::SET_HIGH_COLUMN | 0x02,
//!     command::SET_PAGE_ADDRESS | 3,
//! ];
//! assert_eq!(sequence, [0x0A, 0x12, 0xB3]);
//! ```

// Addressing commands

/// Set lower column nibble (0x00 - 0x0F)
pub const SET_LOW_COLUMN: u8 = 0x00;

/// Set upper column nibble (0x10 - 0x1F)
pub const SET_HIGH_COLUMN: u8 = 0x10;

/// Set page address (0xB0 - 0xB7 on 64-row panels)
pub const SET_PAGE_ADDRESS: u8 = 0xB0;

/// Set display start line (0x40 - 0x7F)
pub const SET_START_LINE: u8 = 0x40;

// Panel control commands

/// Display off, sleep mode (0xAE)
pub const DISPLAY_OFF: u8 = 0xAE;

/// Display on (0xAF)
pub const DISPLAY_ON: u8 = 0xAF;

/// Contrast control (0x81)
///
/// Followed by 1 byte, 0x00 - 0xFF.
pub const SET_CONTRAST: u8 = 0x81;

/// Normal display, set bit = lit pixel (0xA6)
pub const NORMAL_DISPLAY: u8 = 0xA6;

/// Inverse display, set bit = dark pixel (0xA7)
pub const INVERT_DISPLAY: u8 = 0xA7;

// I2C framing

/// I2C control byte preceding command bytes
pub const I2C_CONTROL_COMMAND: u8 = 0x00;

/// I2C control byte preceding display data
pub const I2C_CONTROL_DATA: u8 = 0x40;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addressing_ranges_do_not_overlap() {
        assert_eq!(SET_LOW_COLUMN | 0x0F, 0x0F);
        assert_eq!(SET_HIGH_COLUMN | 0x0F, 0x1F);
        assert_eq!(SET_PAGE_ADDRESS | 7, 0xB7);
    }

    #[test]
    fn test_i2c_control_bytes() {
        assert_eq!(I2C_CONTROL_COMMAND, 0x00);
        assert_eq!(I2C_CONTROL_DATA, 0x40);
    }
}
