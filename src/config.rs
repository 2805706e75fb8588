//! Display configuration types and builder
//!
//! All runtime knobs live in [`Config`], built once with [`Builder`] and handed
//! to [`Driver::new`](crate::display::Driver::new). [`Builder::default`] is the
//! single place defaults come from.

pub use crate::error::{BuilderError, MAX_COLUMNS, MAX_ROWS};
pub use crate::retry::RetryPolicy;

/// Display dimensions in physical (unrotated) pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    /// Number of columns (width in pixels, corresponds to segment outputs)
    pub width: u16,
    /// Number of rows (height in pixels, corresponds to common outputs)
    pub height: u16,
}

impl Dimensions {
    /// Create new dimensions with validation
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidDimensions` if:
    /// - width is 0 or > MAX_COLUMNS
    /// - height is 0 or > MAX_ROWS
    /// - height % 8 != 0 (must be a whole number of pages)
    pub fn new(width: u16, height: u16) -> Result<Self, BuilderError> {
        if width == 0 || width > MAX_COLUMNS {
            return Err(BuilderError::InvalidDimensions { width, height });
        }
        if height == 0 || height > MAX_ROWS || !height.is_multiple_of(8) {
            return Err(BuilderError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// Number of 8-row pages
    pub fn pages(&self) -> u16 {
        self.height / 8
    }

    /// Calculate required buffer size in bytes
    pub fn buffer_size(&self) -> usize {
        self.width as usize * self.pages() as usize
    }
}

/// Display rotation relative to native orientation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rotation {
    /// No rotation
    #[default]
    Rotate0,
    /// Rotate 90 degrees clockwise
    Rotate90,
    /// Rotate 180 degrees
    Rotate180,
    /// Rotate 270 degrees clockwise
    Rotate270,
}

impl Rotation {
    /// Rotation angle in degrees
    pub fn degrees(self) -> u16 {
        match self {
            Self::Rotate0 => 0,
            Self::Rotate90 => 90,
            Self::Rotate180 => 180,
            Self::Rotate270 => 270,
        }
    }

    /// Whether logical width and height are swapped relative to the panel
    pub fn is_transposed(self) -> bool {
        matches!(self, Self::Rotate90 | Self::Rotate270)
    }
}

impl TryFrom<u16> for Rotation {
    type Error = u16;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Self::Rotate0),
            90 => Ok(Self::Rotate90),
            180 => Ok(Self::Rotate180),
            270 => Ok(Self::Rotate270),
            other => Err(other),
        }
    }
}

/// Display configuration
///
/// Use `Builder` to create a Config.
#[derive(Clone, Debug)]
pub struct Config {
    /// Display dimensions
    pub dimensions: Dimensions,
    /// Initial display rotation
    pub rotation: Rotation,
    /// First visible RAM column (e.g. 2 on SH1106 panels with 132-column RAM)
    pub column_offset: u8,
    /// Wrap text to the next line at the right edge
    pub text_wrap: bool,
    /// Initial text scale factor
    pub text_scale: u8,
    /// Emit `log::debug!` traces of protocol traffic
    pub debug: bool,
    /// Retry policy for bus transfers
    pub retry: RetryPolicy,
}

impl Config {
    /// Get the rotated dimensions based on rotation setting
    pub fn rotated_dimensions(&self) -> Dimensions {
        if self.rotation.is_transposed() {
            Dimensions {
                width: self.dimensions.height,
                height: self.dimensions.width,
            }
        } else {
            self.dimensions
        }
    }
}

/// Builder for constructing display configuration
///
/// # Example
///
/// ```
/// use monoraster::{Builder, Dimensions, Rotation};
///
/// let dims = match Dimensions::new(128, 64) {
///     Ok(dims) => dims,
///     Err(_) => return,
/// };
/// let config = match Builder::new().dimensions(dims).rotation(Rotation::Rotate180).build() {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// assert_eq!(config.rotation, Rotation::Rotate180);
/// ```
#[must_use]
pub struct Builder {
    /// Display dimensions (required)
    dimensions: Option<Dimensions>,
    /// Display rotation
    rotation: Rotation,
    /// First visible RAM column
    column_offset: u8,
    /// Text wrap at right edge
    text_wrap: bool,
    /// Text scale factor
    text_scale: u8,
    /// Debug tracing
    debug: bool,
    /// Bus retry policy
    retry: RetryPolicy,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            dimensions: None,
            rotation: Rotation::Rotate0,
            column_offset: 0,
            text_wrap: true,
            text_scale: 1,
            debug: false,
            retry: RetryPolicy::default(),
        }
    }
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set display dimensions (required)
    pub fn dimensions(mut self, dims: Dimensions) -> Self {
        self.dimensions = Some(dims);
        self
    }

    /// Set display rotation
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the first visible RAM column
    pub fn column_offset(mut self, offset: u8) -> Self {
        self.column_offset = offset;
        self
    }

    /// Enable or disable text wrapping
    pub fn text_wrap(mut self, wrap: bool) -> Self {
        self.text_wrap = wrap;
        self
    }

    /// Set the initial text scale (0 is treated as 1)
    pub fn text_scale(mut self, scale: u8) -> Self {
        self.text_scale = scale.max(1);
        self
    }

    /// Enable protocol debug tracing through `log`
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the bus retry policy
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// - `BuilderError::MissingDimensions` if dimensions were not set
    /// - `BuilderError::ColumnOffset` if `column_offset + width` exceeds
    ///   [`MAX_COLUMNS`]
    pub fn build(self) -> Result<Config, BuilderError> {
        let dimensions = self.dimensions.ok_or(BuilderError::MissingDimensions)?;
        if u16::from(self.column_offset) + dimensions.width > MAX_COLUMNS {
            return Err(BuilderError::ColumnOffset {
                offset: self.column_offset,
                width: dimensions.width,
            });
        }
        Ok(Config {
            dimensions,
            rotation: self.rotation,
            column_offset: self.column_offset,
            text_wrap: self.text_wrap,
            text_scale: self.text_scale,
            debug: self.debug,
            retry: self.retry,
        })
    }
}
