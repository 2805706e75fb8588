//! Monochrome page-addressed display driver core
//!
//! A driver core for 1-bit-per-pixel panels built on SSD1306, SH1106, ST7565
//! and similar page-addressed controllers: up to 256 columns and 16 pages
//! (128 rows).
//!
//! ## Features
//!
//! - `no_std` compatible, no allocation
//! - `embedded-hal` v1.0 support (hardware SPI, bit-banged SPI, I2C)
//! - `embedded-graphics` integration (with `graphics` feature)
//! - Caller-owned framebuffer in controller page layout
//! - Drawing primitives, bitmap fonts and bitmap blitting
//! - Rotation support
//! - Partial (region) updates
//! - Bounded retry of failed bus transfers
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::OutputPin;
//! use embedded_hal::spi::{Operation, SpiDevice};
//! use monoraster::{
//!     Builder, Color, Dimensions, Driver, NumberAlignment, Raster, Rotation, SpiInterface,
//! };
//!
//! # struct MockSpi;
//! # impl embedded_hal::spi::ErrorType for MockSpi { type Error = Infallible; }
//! # impl SpiDevice for MockSpi {
//! #     fn transaction(
//! #         &mut self,
//! #         _operations: &mut [Operation<'_, u8>],
//! #     ) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let spi = MockSpi;
//! # let dc = MockPin;
//! # let rst = MockPin;
//! # let mut delay = MockDelay;
//! // Controller-specific power-on table
//! const INIT: &[u8] = &[0xAE, 0xD5, 0x80, 0xA8, 0x3F, 0x8D, 0x14, 0xA1, 0xC8];
//!
//! let interface = SpiInterface::new(spi, dc, rst, MockDelay);
//! let dims = match Dimensions::new(128, 64) {
//!     Ok(dims) => dims,
//!     Err(_) => return,
//! };
//! let config = match Builder::new().dimensions(dims).rotation(Rotation::Rotate180).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let mut framebuffer = [0u8; 1024];
//! let mut display = Driver::new(interface, config);
//! let _ = display.init(&mut delay, INIT);
//! let _ = display.set_buffer(128, 64, &mut framebuffer);
//!
//! display.fill_round_rect(0, 0, 60, 20, 4, Color::Foreground);
//! display.set_cursor(4, 6);
//! display.cursor_mut().set_colors(Color::Background, Color::Background);
//! let _ = display.draw_number(42, 4, NumberAlignment::RightWithLeadingZeros);
//!
//! let _ = display.update();
//! let _ = display.display_on();
//! ```

#![no_std]

#[cfg(any(test, feature = "alloc"))]
extern crate alloc;

/// Bitmap blitting
pub mod bitmap;
/// Page-organized framebuffer
pub mod buffer;
/// Monochrome pixel colors
pub mod color;
/// Controller command definitions
pub mod command;
/// Display configuration types and builder
pub mod config;
/// Core display operations
pub mod display;
/// Error types for the driver
pub mod error;
/// Bitmap fonts
pub mod font;
/// Hardware interface abstraction
pub mod interface;
/// Page/column addressing and region flush
pub mod protocol;
/// Drawing primitives
pub mod raster;
/// Bounded transfer retry
pub mod retry;
/// Coordinate rotation utilities
pub mod rotation;
/// Text rendering
pub mod text;

/// Graphics support via embedded-graphics (requires `graphics` feature)
#[cfg(feature = "graphics")]
pub mod graphics;

pub use bitmap::{Bitmap, BitmapError, BitmapMode, draw_bitmap};
pub use buffer::{PixelBuffer, PixelSink};
pub use color::Color;
pub use config::{Builder, Config, Dimensions, MAX_COLUMNS, MAX_ROWS, Rotation};
pub use display::Driver;
pub use error::{BufferError, BuilderError, Error};
pub use font::{FONT_5X8, Font, FontDescriptor, FontEncoding, FontError};
pub use interface::{
    BitBangInterface, DEFAULT_HALF_PERIOD_US, DEFAULT_I2C_ADDRESS, DisplayInterface,
    I2cInterface, InterfaceError, SpiInterface, TransportErrorKind,
};
pub use protocol::Region;
pub use raster::Raster;
pub use retry::RetryPolicy;
pub use text::{NumberAlignment, NumberLayout, TextCursor, TextError, draw_char, layout_number};
