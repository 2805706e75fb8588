//! Graphics support via embedded-graphics
//!
//! [`PixelBuffer`] and [`Driver`] implement the
//! [`DrawTarget`](embedded_graphics_core::draw_target::DrawTarget) trait from
//! the embedded-graphics ecosystem with [`BinaryColor`] pixels. `On` sets a
//! bit, `Off` clears it, and the current rotation applies as it does for the
//! native primitives.
//!
//! ## Example
//!
//! ```rust
//! use embedded_graphics::{
//!     mono_font::{ascii::FONT_6X10, MonoTextStyle},
//!     pixelcolor::BinaryColor,
//!     prelude::*,
//!     primitives::{Circle, PrimitiveStyle, Rectangle},
//!     text::Text,
//! };
//! use monoraster::PixelBuffer;
//!
//! let mut storage = [0u8; 128 * 64 / 8];
//! let mut buffer = match PixelBuffer::new(128, 64, &mut storage) {
//!     Ok(buffer) => buffer,
//!     Err(_) => return,
//! };
//!
//! let _ = Rectangle::new(Point::new(10, 10), Size::new(50, 30))
//!     .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
//!     .draw(&mut buffer);
//!
//! let _ = Circle::new(Point::new(70, 10), 40)
//!     .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 2))
//!     .draw(&mut buffer);
//!
//! let _ = Text::new(
//!     "Hello, OLED!",
//!     Point::new(0, 60),
//!     MonoTextStyle::new(&FONT_6X10, BinaryColor::On),
//! )
//! .draw(&mut buffer);
//! ```

use core::convert::Infallible;
use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    pixelcolor::BinaryColor,
    prelude::Pixel,
};

use crate::buffer::{PixelBuffer, PixelSink};
use crate::display::Driver;
use crate::interface::DisplayInterface;

fn to_size((width, height): (i32, i32)) -> Size {
    Size::new(width.max(0) as u32, height.max(0) as u32)
}

impl DrawTarget for PixelBuffer<'_> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            self.set_pixel(x, y, color.into());
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill_color(color.into());
        Ok(())
    }
}

impl OriginDimensions for PixelBuffer<'_> {
    fn size(&self) -> Size {
        to_size(self.logical_size())
    }
}

impl<I> DrawTarget for Driver<'_, I>
where
    I: DisplayInterface,
{
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Pixel<Self::Color>>,
    {
        // Without a framebuffer every pixel is dropped
        if let Some(buffer) = self.buffer_mut() {
            buffer.draw_iter(pixels)?;
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        if let Some(buffer) = self.buffer_mut() {
            buffer.fill_color(color.into());
        }
        Ok(())
    }
}

impl<I> OriginDimensions for Driver<'_, I>
where
    I: DisplayInterface,
{
    fn size(&self) -> Size {
        to_size(self.logical_size())
    }
}
