//! Core display operations
//!
//! [`Driver`] ties a [`DisplayInterface`] to a [`Config`] and a caller-owned
//! framebuffer. Drawing happens in RAM through [`PixelSink`] (so every
//! [`Raster`](crate::Raster) primitive, text and bitmap call works on the
//! driver directly); nothing reaches the panel until [`Driver::update`] or
//! [`Driver::update_region`] is called.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::delay::DelayNs;
//! use monoraster::{command, Builder, Dimensions, DisplayInterface, Driver, Raster, Color};
//! # use core::convert::Infallible;
//! # struct MockInterface;
//! # impl DisplayInterface for MockInterface {
//! #     type Error = Infallible;
//! #     fn send_command(&mut self, _command: u8) -> Result<(), Self::Error> { Ok(()) }
//! #     fn send_data(&mut self, _data: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn reset<D: DelayNs>(&mut self, _delay: &mut D) {}
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let mut delay = MockDelay;
//! let dims = match Dimensions::new(128, 64) {
//!     Ok(dims) => dims,
//!     Err(_) => return,
//! };
//! let config = match Builder::new().dimensions(dims).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let mut storage = [0u8; 1024];
//! let mut display = Driver::new(MockInterface, config);
//! let _ = display.init(&mut delay, &[command::DISPLAY_OFF, command::NORMAL_DISPLAY]);
//! let _ = display.set_buffer(128, 64, &mut storage);
//!
//! display.draw_rect(0, 0, 128, 64, Color::Foreground);
//! let _ = display.print("Hello");
//! let _ = display.update();
//! let _ = display.display_on();
//! ```

use embedded_hal::delay::DelayNs;

use crate::buffer::{PixelBuffer, PixelSink};
use crate::color::Color;
use crate::command::{DISPLAY_OFF, DISPLAY_ON, INVERT_DISPLAY, NORMAL_DISPLAY, SET_CONTRAST};
use crate::config::{Config, Dimensions, Rotation};
use crate::error::Error;
use crate::font::{FONT_5X8, Font, FontError};
use crate::interface::{DisplayInterface, TransportErrorKind};
use crate::protocol::flush_region;
use crate::text::{NumberAlignment, TextCursor, TextError};

type DisplayResult<I> = core::result::Result<(), Error<I>>;

/// Display driver for page-addressed monochrome controllers
///
/// The framebuffer is borrowed for `'a`; register it with
/// [`set_buffer`](Self::set_buffer) before drawing or flushing. Without a
/// buffer, pixel writes are ignored and flushes fail with
/// [`Error::BufferNotSet`].
pub struct Driver<'a, I>
where
    I: DisplayInterface,
{
    /// Hardware interface
    interface: I,
    /// Display configuration
    config: Config,
    /// Registered framebuffer
    buffer: Option<PixelBuffer<'a>>,
    /// Text pen
    cursor: TextCursor,
    /// Kind of the most recent transport failure
    last_error: Option<TransportErrorKind>,
}

impl<'a, I> Driver<'a, I>
where
    I: DisplayInterface,
{
    /// Create a new driver
    ///
    /// The interface adopts the configured retry policy.
    pub fn new(mut interface: I, config: Config) -> Self {
        interface.set_retry_policy(config.retry);
        let mut cursor = TextCursor::new(FONT_5X8);
        cursor.wrap = config.text_wrap;
        cursor.scale = config.text_scale.max(1);
        Self {
            interface,
            config,
            buffer: None,
            cursor,
            last_error: None,
        }
    }

    /// Register the framebuffer
    ///
    /// The buffer picks up the current rotation. On failure no buffer is
    /// registered, even if one was before.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Buffer`] if `buffer` is empty or its length is not
    /// `width * (height / 8)`.
    pub fn set_buffer(
        &mut self,
        width: u16,
        height: u16,
        buffer: &'a mut [u8],
    ) -> DisplayResult<I> {
        self.buffer = None;
        let mut buffer = PixelBuffer::new(width, height, buffer).inspect_err(|e| {
            if self.config.debug {
                log::debug!("set_buffer {width}x{height} rejected: {e}");
            }
        })?;
        buffer.set_rotation(self.config.rotation);
        if self.config.debug {
            log::debug!(
                "set_buffer {width}x{height}, {} bytes",
                buffer.as_bytes().len()
            );
        }
        self.buffer = Some(buffer);
        Ok(())
    }

    /// Registered framebuffer, if any
    pub fn buffer(&self) -> Option<&PixelBuffer<'a>> {
        self.buffer.as_ref()
    }

    /// Mutable access to the registered framebuffer
    pub fn buffer_mut(&mut self) -> Option<&mut PixelBuffer<'a>> {
        self.buffer.as_mut()
    }

    /// Unregister and return the framebuffer
    pub fn take_buffer(&mut self) -> Option<PixelBuffer<'a>> {
        self.buffer.take()
    }

    /// Set the rotation used by subsequent drawing
    ///
    /// Existing framebuffer contents are left as they are.
    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.config.rotation = rotation;
        if let Some(buffer) = self.buffer.as_mut() {
            buffer.set_rotation(rotation);
        }
    }

    /// Get display rotation
    pub fn rotation(&self) -> Rotation {
        self.config.rotation
    }

    /// Get display dimensions
    pub fn dimensions(&self) -> &Dimensions {
        &self.config.dimensions
    }

    /// Access the underlying configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Zero the framebuffer; does nothing without one
    pub fn clear(&mut self) {
        if let Some(buffer) = self.buffer.as_mut() {
            buffer.clear();
        }
    }

    /// Send the whole framebuffer to the panel
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferNotSet`] without a framebuffer, or
    /// [`Error::Interface`] if a transfer fails.
    pub fn update(&mut self) -> DisplayResult<I> {
        let (width, height) = match self.buffer.as_ref() {
            Some(buffer) => (buffer.width(), buffer.height()),
            None => return Err(Error::BufferNotSet),
        };
        self.update_region(0, 0, i32::from(width), i32::from(height))
    }

    /// Send the part of the framebuffer under a physical rectangle
    ///
    /// Every page the rectangle touches is sent for the clipped column span.
    /// An off-panel rectangle sends nothing.
    ///
    /// # Errors
    ///
    /// - [`Error::BufferNotSet`] without a framebuffer
    /// - [`Error::ColumnOutOfRange`] if the span plus the column offset runs
    ///   past the last RAM column
    /// - [`Error::Interface`] if a transfer fails
    pub fn update_region(&mut self, x: i32, y: i32, w: i32, h: i32) -> DisplayResult<I> {
        let Some(buffer) = self.buffer.as_ref() else {
            return Err(Error::BufferNotSet);
        };
        if self.config.debug {
            log::debug!(
                "flush region x={x} y={y} w={w} h={h} column_offset={}",
                self.config.column_offset
            );
        }
        let result = flush_region(
            &mut self.interface,
            buffer,
            x,
            y,
            w,
            h,
            self.config.column_offset,
        );
        self.record(result)
    }

    /// Hardware reset followed by a controller init sequence
    ///
    /// `commands` is the controller's power-on table, sent verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Interface`] if a transfer fails.
    pub fn init<D: DelayNs>(&mut self, delay: &mut D, commands: &[u8]) -> DisplayResult<I> {
        self.interface.reset(delay);
        if self.config.debug {
            log::debug!("init: {} command bytes", commands.len());
        }
        self.send_commands(commands)
    }

    /// Turn the panel on
    pub fn display_on(&mut self) -> DisplayResult<I> {
        self.send_command(DISPLAY_ON)
    }

    /// Turn the panel off (sleep)
    pub fn display_off(&mut self) -> DisplayResult<I> {
        self.send_command(DISPLAY_OFF)
    }

    /// Invert the panel output without touching RAM
    pub fn invert(&mut self, inverted: bool) -> DisplayResult<I> {
        self.send_command(if inverted {
            INVERT_DISPLAY
        } else {
            NORMAL_DISPLAY
        })
    }

    /// Set panel contrast
    pub fn set_contrast(&mut self, contrast: u8) -> DisplayResult<I> {
        self.send_commands(&[SET_CONTRAST, contrast])
    }

    /// Text pen state
    pub fn cursor(&self) -> &TextCursor {
        &self.cursor
    }

    /// Mutable text pen state
    pub fn cursor_mut(&mut self) -> &mut TextCursor {
        &mut self.cursor
    }

    /// Move the text pen
    pub fn set_cursor(&mut self, x: i32, y: i32) {
        self.cursor.set_cursor(x, y);
    }

    /// Select the font for subsequent text
    pub fn set_font(&mut self, font: Font) {
        self.cursor.font = font;
    }

    /// Write one character at the pen
    ///
    /// # Errors
    ///
    /// Returns [`FontError::CharacterOutOfRange`] if the font has no glyph.
    pub fn write(&mut self, code: u8) -> Result<(), FontError> {
        let mut cursor = self.cursor;
        let result = cursor.write(self, code);
        self.cursor = cursor;
        result
    }

    /// Write a string at the pen, stopping at the first bad character
    ///
    /// # Errors
    ///
    /// Returns [`FontError::CharacterOutOfRange`] if the font has no glyph.
    pub fn print(&mut self, text: &str) -> Result<(), FontError> {
        let mut cursor = self.cursor;
        let result = cursor.print(self, text);
        self.cursor = cursor;
        result
    }

    /// Render a number in a fixed-width field at the pen
    ///
    /// # Errors
    ///
    /// Returns [`TextError::DigitCountExceeded`] if the value does not fit.
    pub fn draw_number(
        &mut self,
        value: i64,
        digits: usize,
        alignment: NumberAlignment,
    ) -> Result<(), TextError> {
        let mut cursor = self.cursor;
        let result = cursor.draw_number(self, value, digits, alignment);
        self.cursor = cursor;
        result
    }

    /// Direct access to the interface
    pub fn interface_mut(&mut self) -> &mut I {
        &mut self.interface
    }

    /// Kind of the most recent transport failure
    ///
    /// Set whenever an operation returns [`Error::Interface`] and kept until
    /// the next failure or [`take_last_error`](Self::take_last_error).
    /// Transports that do not classify errors are recorded as
    /// [`TransportErrorKind::Other`].
    pub fn last_error(&self) -> Option<TransportErrorKind> {
        self.last_error
    }

    /// Clear the recorded failure, returning it
    pub fn take_last_error(&mut self) -> Option<TransportErrorKind> {
        self.last_error.take()
    }

    /// Send a command to the display controller
    fn send_command(&mut self, cmd: u8) -> DisplayResult<I> {
        if self.config.debug {
            log::debug!("command {cmd:#04x}");
        }
        let result = self.interface.send_command(cmd).map_err(Error::Interface);
        self.record(result)
    }

    /// Send a command sequence to the display controller
    fn send_commands(&mut self, cmds: &[u8]) -> DisplayResult<I> {
        let result = self.interface.send_commands(cmds).map_err(Error::Interface);
        self.record(result)
    }

    /// Note the kind of any transport error before handing it back
    fn record(&mut self, result: DisplayResult<I>) -> DisplayResult<I> {
        if let Err(Error::Interface(e)) = &result {
            let kind = self
                .interface
                .last_error()
                .unwrap_or(TransportErrorKind::Other);
            log::error!("transport error {kind:?}: {e:?}");
            self.last_error = Some(kind);
        }
        result
    }
}

impl<I: DisplayInterface> PixelSink for Driver<'_, I> {
    fn logical_size(&self) -> (i32, i32) {
        match self.buffer.as_ref() {
            Some(buffer) => buffer.logical_size(),
            None => {
                let dims = self.config.rotated_dimensions();
                (i32::from(dims.width), i32::from(dims.height))
            }
        }
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(buffer) = self.buffer.as_mut() {
            buffer.set_pixel(x, y, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Builder;
    use crate::error::BufferError;
    use crate::raster::Raster;
    use crate::retry::RetryPolicy;

    #[derive(Debug)]
    struct MockInterface {
        commands: alloc::vec::Vec<u8>,
        data: alloc::vec::Vec<alloc::vec::Vec<u8>>,
        resets: u8,
        retry: Option<RetryPolicy>,
        /// Fail every transfer with this kind
        fail_with: Option<TransportErrorKind>,
    }

    impl MockInterface {
        fn new() -> Self {
            Self {
                commands: alloc::vec::Vec::new(),
                data: alloc::vec::Vec::new(),
                resets: 0,
                retry: None,
                fail_with: None,
            }
        }
    }

    impl DisplayInterface for MockInterface {
        type Error = TransportErrorKind;

        fn send_command(&mut self, command: u8) -> Result<(), Self::Error> {
            if let Some(kind) = self.fail_with {
                return Err(kind);
            }
            self.commands.push(command);
            Ok(())
        }

        fn send_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
            if let Some(kind) = self.fail_with {
                return Err(kind);
            }
            self.data.push(data.to_vec());
            Ok(())
        }

        fn last_error(&self) -> Option<TransportErrorKind> {
            self.fail_with
        }

        fn reset<D: DelayNs>(&mut self, _delay: &mut D) {
            self.resets += 1;
        }

        fn set_retry_policy(&mut self, policy: RetryPolicy) {
            self.retry = Some(policy);
        }
    }

    struct MockDelay;
    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn test_display<'a>() -> Driver<'a, MockInterface> {
        let interface = MockInterface::new();
        let config = Builder::new()
            .dimensions(Dimensions::new(128, 64).unwrap())
            .build()
            .unwrap();
        Driver::new(interface, config)
    }

    #[test]
    fn test_new_applies_retry_policy() {
        let interface = MockInterface::new();
        let config = Builder::new()
            .dimensions(Dimensions::new(128, 64).unwrap())
            .retry(RetryPolicy::new(5, 10))
            .build()
            .unwrap();
        let mut display = Driver::new(interface, config);
        assert_eq!(display.interface_mut().retry, Some(RetryPolicy::new(5, 10)));
    }

    #[test]
    fn test_set_buffer_wrong_size_leaves_buffer_unset() {
        let mut storage = [0u8; 1023];
        let mut display = test_display();
        let result = display.set_buffer(128, 64, &mut storage);
        assert!(matches!(
            result,
            Err(Error::Buffer(BufferError::BufferSize {
                required: 1024,
                provided: 1023
            }))
        ));
        assert!(display.buffer().is_none());
        assert!(matches!(display.update(), Err(Error::BufferNotSet)));
    }

    #[test]
    fn test_set_buffer_empty_is_nullptr() {
        let mut storage: [u8; 0] = [];
        let mut display = test_display();
        assert!(matches!(
            display.set_buffer(128, 64, &mut storage),
            Err(Error::Buffer(BufferError::BufferNullptr))
        ));
    }

    #[test]
    fn test_drawing_without_buffer_is_noop() {
        let mut display = test_display();
        display.fill_rect(0, 0, 10, 10, Color::Foreground);
        assert_eq!(display.logical_size(), (128, 64));
        assert!(matches!(
            display.update_region(0, 0, 8, 8),
            Err(Error::BufferNotSet)
        ));
        assert!(display.interface.commands.is_empty());
    }

    #[test]
    fn test_update_sends_all_pages() {
        let mut storage = [0u8; 1024];
        let mut display = test_display();
        display.set_buffer(128, 64, &mut storage).unwrap();
        display.set_pixel(1, 9, Color::Foreground);
        display.update().unwrap();

        assert_eq!(display.interface.commands.len(), 8 * 3);
        assert_eq!(display.interface.data.len(), 8);
        assert_eq!(&display.interface.commands[3..6], &[0x00, 0x10, 0xB1]);
        assert_eq!(display.interface.data[1][1], 0x02);
    }

    #[test]
    fn test_update_region_applies_column_offset() {
        let interface = MockInterface::new();
        let config = Builder::new()
            .dimensions(Dimensions::new(128, 64).unwrap())
            .column_offset(2)
            .build()
            .unwrap();
        let mut storage = [0u8; 1024];
        let mut display = Driver::new(interface, config);
        display.set_buffer(128, 64, &mut storage).unwrap();
        display.update_region(0, 16, 4, 8).unwrap();
        assert_eq!(display.interface.commands, alloc::vec![0x02, 0x10, 0xB2]);
        assert_eq!(display.interface.data, alloc::vec![alloc::vec![0u8; 4]]);
    }

    #[test]
    fn test_update_region_off_screen_sends_nothing() {
        let mut storage = [0u8; 1024];
        let mut display = test_display();
        display.set_buffer(128, 64, &mut storage).unwrap();
        display.update_region(-50, -50, 10, 10).unwrap();
        assert!(display.interface.commands.is_empty());
        assert!(display.interface.data.is_empty());
    }

    #[test]
    fn test_set_rotation_applies_to_buffer() {
        let mut storage = [0u8; 1024];
        let mut display = test_display();
        display.set_buffer(128, 64, &mut storage).unwrap();
        display.set_rotation(Rotation::Rotate180);
        display.set_pixel(0, 0, Color::Foreground);
        assert_eq!(display.rotation(), Rotation::Rotate180);
        assert_eq!(display.buffer().unwrap().as_bytes()[1023], 0x80);
    }

    #[test]
    fn test_buffer_inherits_configured_rotation() {
        let interface = MockInterface::new();
        let config = Builder::new()
            .dimensions(Dimensions::new(128, 64).unwrap())
            .rotation(Rotation::Rotate90)
            .build()
            .unwrap();
        let mut storage = [0u8; 1024];
        let mut display = Driver::new(interface, config);
        display.set_buffer(128, 64, &mut storage).unwrap();
        assert_eq!(display.logical_size(), (64, 128));
    }

    #[test]
    fn test_clear_zeroes_buffer() {
        let mut storage = [0xFFu8; 1024];
        let mut display = test_display();
        display.set_buffer(128, 64, &mut storage).unwrap();
        display.clear();
        assert!(display.buffer().unwrap().as_bytes().iter().all(|b| *b == 0));
    }

    #[test]
    fn test_init_resets_and_sends_table() {
        let mut display = test_display();
        display
            .init(&mut MockDelay, &[0xAE, 0xD5, 0x80, 0xA8, 0x3F])
            .unwrap();
        assert_eq!(display.interface.resets, 1);
        assert_eq!(
            display.interface.commands,
            alloc::vec![0xAE, 0xD5, 0x80, 0xA8, 0x3F]
        );
    }

    #[test]
    fn test_panel_commands() {
        let mut display = test_display();
        display.display_on().unwrap();
        display.display_off().unwrap();
        display.invert(true).unwrap();
        display.invert(false).unwrap();
        display.set_contrast(0x7F).unwrap();
        assert_eq!(
            display.interface.commands,
            alloc::vec![0xAF, 0xAE, 0xA7, 0xA6, 0x81, 0x7F]
        );
    }

    #[test]
    fn test_transport_failure_is_recorded() {
        let mut storage = [0u8; 1024];
        let mut display = test_display();
        display.set_buffer(128, 64, &mut storage).unwrap();
        assert_eq!(display.last_error(), None);

        let kind = TransportErrorKind::Spi(embedded_hal::spi::ErrorKind::Overrun);
        display.interface_mut().fail_with = Some(kind);
        assert!(matches!(display.display_on(), Err(Error::Interface(_))));
        assert_eq!(display.last_error(), Some(kind));

        display.interface_mut().fail_with = None;
        display.update().unwrap();
        assert_eq!(display.take_last_error(), Some(kind));
        assert_eq!(display.last_error(), None);
    }

    #[test]
    fn test_update_rejects_offset_past_last_column() {
        let interface = MockInterface::new();
        let config = Builder::new()
            .dimensions(Dimensions::new(128, 64).unwrap())
            .column_offset(128)
            .build()
            .unwrap();
        let mut storage = alloc::vec![0u8; 256 * 8];
        let mut display = Driver::new(interface, config);
        display.set_buffer(256, 64, &mut storage).unwrap();
        assert!(matches!(
            display.update(),
            Err(Error::ColumnOutOfRange { end: 384 })
        ));
        assert!(display.interface.commands.is_empty());
        assert_eq!(display.last_error(), None);
    }

    #[test]
    fn test_print_draws_into_buffer_and_moves_cursor() {
        let mut storage = [0u8; 1024];
        let mut display = test_display();
        display.set_buffer(128, 64, &mut storage).unwrap();
        display.print("A").unwrap();
        assert_eq!(display.cursor().x, 6);
        assert_eq!(
            &display.buffer().unwrap().as_bytes()[0..5],
            &[0x7E, 0x11, 0x11, 0x11, 0x7E]
        );
    }

    #[test]
    fn test_print_error_keeps_partial_progress() {
        let mut storage = [0u8; 1024];
        let mut display = test_display();
        display.set_buffer(128, 64, &mut storage).unwrap();
        display.set_cursor(0, 8);
        assert!(display.print("ok\u{1}").is_err());
        assert_eq!((display.cursor().x, display.cursor().y), (12, 8));
    }

    #[test]
    fn test_draw_number_uses_config_scale() {
        let interface = MockInterface::new();
        let config = Builder::new()
            .dimensions(Dimensions::new(128, 64).unwrap())
            .text_scale(2)
            .build()
            .unwrap();
        let mut storage = [0u8; 1024];
        let mut display = Driver::new(interface, config);
        display.set_buffer(128, 64, &mut storage).unwrap();
        display
            .draw_number(5, 2, NumberAlignment::RightWithLeadingZeros)
            .unwrap();
        assert_eq!(display.cursor().x, 24);
        assert!(matches!(
            display.draw_number(100, 2, NumberAlignment::Left),
            Err(TextError::DigitCountExceeded { .. })
        ));
    }
}
