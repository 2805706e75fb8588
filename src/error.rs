//! Error types for the driver
//!
//! This module defines error types for configuration building ([`BuilderError`]),
//! framebuffer registration ([`BufferError`]), and display operations ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors during configuration construction
//! - [`BufferError`] - A framebuffer slice that does not match the panel
//! - [`Error`] - Runtime errors during display operations
//! - [`InterfaceError`](crate::interface::InterfaceError) - Low-level hardware communication errors
//! - [`FontError`](crate::font::FontError) / [`TextError`](crate::text::TextError) - Out of range text input
//!
//! Pixels outside the panel are never an error; they are clipped silently.
//!
//! ## Example
//!
//! ```
//! use monoraster::{Builder, BuilderError, Dimensions};
//!
//! // Missing dimensions
//! let result = Builder::new().build();
//! assert!(matches!(result, Err(BuilderError::MissingDimensions)));
//!
//! // Height must be a whole number of pages
//! let result = Dimensions::new(128, 60);
//! assert!(result.is_err());
//! ```

use crate::interface::DisplayInterface;

/// Maximum addressable columns for page-addressed controllers
///
/// The column address is split into two 4-bit nibbles, so 256 columns is the
/// upper bound of the addressing scheme.
pub const MAX_COLUMNS: u16 = 256;

/// Maximum rows supported (16 pages of 8 rows)
///
/// The page address command carries the page in its low nibble
/// (`0xB0..=0xBF`).
pub const MAX_ROWS: u16 = 128;

/// Errors that can occur when registering a framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// Buffer length does not equal `width * (height / 8)`
    BufferSize {
        /// Required buffer size in bytes
        required: usize,
        /// Provided buffer size in bytes
        provided: usize,
    },
    /// No storage was provided (empty slice)
    BufferNullptr,
    /// Width or height beyond what page/column addressing can reach
    Dimensions {
        /// Width in pixels requested
        width: u16,
        /// Height in pixels requested
        height: u16,
    },
}

impl core::fmt::Display for BufferError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BufferSize { required, provided } => write!(
                f,
                "Buffer size mismatch: required {required} bytes, provided {provided}"
            ),
            Self::BufferNullptr => write!(f, "Buffer has no storage"),
            Self::Dimensions { width, height } => write!(
                f,
                "Buffer dimensions {width}x{height} exceed {MAX_COLUMNS}x{MAX_ROWS}"
            ),
        }
    }
}

impl core::error::Error for BufferError {}

/// Errors that can occur when interacting with the display
///
/// Generic over the interface type to preserve the specific error type.
/// This allows error handling code to match on the underlying hardware error.
#[derive(Debug)]
pub enum Error<I: DisplayInterface> {
    /// Interface error (SPI/I2C/GPIO)
    ///
    /// Wraps the underlying hardware error from the [`DisplayInterface`] implementation,
    /// after the transport's retry budget has been spent.
    Interface(I::Error),
    /// The framebuffer could not be registered
    Buffer(BufferError),
    /// An operation needed the framebuffer but none is registered
    BufferNotSet,
    /// A flush would address a RAM column past the last one
    ///
    /// `end` is one past the highest column, offset included. Nothing is
    /// sent when this is returned.
    ColumnOutOfRange {
        /// One past the last column the flush would touch
        end: u16,
    },
}

impl<I: DisplayInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(_) => write!(f, "Interface error"),
            Self::Buffer(e) => write!(f, "{e}"),
            Self::BufferNotSet => write!(f, "No framebuffer registered"),
            Self::ColumnOutOfRange { end } => write!(
                f,
                "Flush reaches column {end}, past the {MAX_COLUMNS}-column limit"
            ),
        }
    }
}

impl<I: DisplayInterface + core::fmt::Debug> core::error::Error for Error<I> {}

impl<I: DisplayInterface> From<BufferError> for Error<I> {
    fn from(e: BufferError) -> Self {
        Self::Buffer(e)
    }
}

/// Errors that can occur when building configuration
///
/// These errors occur during the builder pattern before the display is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderError {
    /// Dimensions were not specified
    ///
    /// [`Builder::dimensions()`](crate::config::Builder::dimensions) must be called before building.
    MissingDimensions,
    /// Invalid dimensions provided
    ///
    /// See [`Dimensions::new()`](crate::config::Dimensions::new) for constraints.
    InvalidDimensions {
        /// Width in pixels requested
        width: u16,
        /// Height in pixels requested
        height: u16,
    },
    /// Column offset pushes the last column past [`MAX_COLUMNS`]
    ColumnOffset {
        /// Requested offset
        offset: u8,
        /// Panel width in pixels
        width: u16,
    },
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingDimensions => write!(f, "Dimensions must be specified"),
            Self::InvalidDimensions { width, height } => write!(
                f,
                "Invalid dimensions {width}x{height} (max {MAX_COLUMNS}x{MAX_ROWS}, height must be multiple of 8)"
            ),
            Self::ColumnOffset { offset, width } => write!(
                f,
                "Column offset {offset} with width {width} exceeds {MAX_COLUMNS} columns"
            ),
        }
    }
}

impl core::error::Error for BuilderError {}
