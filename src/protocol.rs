//! Page/column addressing and region flush
//!
//! A flush walks every 8-row page that intersects the target rectangle. For
//! each page the controller is pointed at the first column and page with
//! three address commands, then the page's bytes for the clipped column span
//! are streamed as data.
//!
//! Regions are in physical panel coordinates. They are clipped before any
//! traffic is generated, so a region entirely off the panel sends nothing.

use crate::buffer::PixelBuffer;
use crate::command;
use crate::error::{Error, MAX_COLUMNS};
use crate::interface::DisplayInterface;

/// A clipped rectangle in physical panel coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    /// First column
    pub x: u16,
    /// First row
    pub y: u16,
    /// Width in columns, never zero
    pub width: u16,
    /// Height in rows, never zero
    pub height: u16,
}

impl Region {
    /// First page touched by the region
    pub fn first_page(&self) -> u16 {
        self.y / 8
    }

    /// Last page touched by the region (inclusive)
    pub fn last_page(&self) -> u16 {
        (self.y + self.height - 1) / 8
    }
}

/// Clip `(x, y, w, h)` against a `panel_width x panel_height` panel
///
/// Returns `None` when nothing of the rectangle lies on the panel.
pub fn clip_region(
    panel_width: u16,
    panel_height: u16,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
) -> Option<Region> {
    let clip = |start: i32, len: i32, limit: u16| -> Option<(u16, u16)> {
        let lo = start.max(0);
        let hi = start.saturating_add(len).min(i32::from(limit));
        (lo < hi).then(|| (lo as u16, (hi - lo) as u16))
    };
    let (x, width) = clip(x, w, panel_width)?;
    let (y, height) = clip(y, h, panel_height)?;
    Some(Region {
        x,
        y,
        width,
        height,
    })
}

/// Address commands selecting `column` of `page`
///
/// `page` must be below 16; [`PixelBuffer`] never holds more pages than that.
pub fn page_address_commands(page: u8, column: u8) -> [u8; 3] {
    [
        command::SET_LOW_COLUMN | (column & 0x0F),
        command::SET_HIGH_COLUMN | (column >> 4),
        command::SET_PAGE_ADDRESS | page,
    ]
}

/// Stream the part of `buffer` under `(x, y, w, h)` to the controller
///
/// `column_offset` is added to every column address, for controllers whose
/// RAM is wider than the glass (132-column SH1106 driving 128 pixels).
///
/// # Errors
///
/// - [`Error::ColumnOutOfRange`] if the clipped span plus `column_offset`
///   runs past [`MAX_COLUMNS`]; nothing is sent
/// - [`Error::Interface`] with the first transport error; earlier pages have
///   already been sent
pub fn flush_region<I: DisplayInterface>(
    interface: &mut I,
    buffer: &PixelBuffer<'_>,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    column_offset: u8,
) -> Result<(), Error<I>> {
    let Some(region) = clip_region(buffer.width(), buffer.height(), x, y, w, h) else {
        return Ok(());
    };
    let start = region.x + u16::from(column_offset);
    let end = start + region.width;
    if end > MAX_COLUMNS {
        return Err(Error::ColumnOutOfRange { end });
    }
    let column = start as u8;
    let span = region.x as usize..(region.x + region.width) as usize;

    for page in region.first_page()..=region.last_page() {
        let Some(bytes) = buffer.page(page).and_then(|p| p.get(span.clone())) else {
            continue;
        };
        interface
            .send_commands(&page_address_commands(page as u8, column))
            .map_err(Error::Interface)?;
        interface.send_data(bytes).map_err(Error::Interface)?;
    }
    Ok(())
}
