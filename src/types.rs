//! Core pixel data types.

/// Number of multiplexed pixels, one per anode line.
pub const PIXEL_COUNT: usize = 6;

/// Raw compare value that keeps a channel dark.
pub const RAW_OFF: u8 = 255;

/// One color channel of a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// Red cathode, direct drive.
    Red,

    /// Green cathode, direct drive.
    Green,

    /// Blue cathode, driven through the charge pump.
    Blue,
}

/// Raw PWM compare values for one pixel.
///
/// Values are inverted: [`RAW_OFF`] (255) means the channel is dark and
/// smaller values are brighter. The scale is non-linear and depends on the
/// drive circuit, see [`crate::gamma`] for the calibrated mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawPixel {
    /// Red compare value.
    pub red: u8,

    /// Green compare value.
    pub green: u8,

    /// Blue compare value.
    pub blue: u8,
}

impl RawPixel {
    /// All channels dark.
    pub const OFF: Self = Self::new(RAW_OFF, RAW_OFF, RAW_OFF);

    /// Creates a raw pixel from compare values.
    #[inline]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Returns the compare value for `channel`.
    #[inline]
    pub const fn channel(&self, channel: Channel) -> u8 {
        match channel {
            Channel::Red => self.red,
            Channel::Green => self.green,
            Channel::Blue => self.blue,
        }
    }

    /// True if the blue channel will emit any light.
    ///
    /// The charge pump is only cycled for pixels where this holds.
    #[inline]
    pub const fn has_blue(&self) -> bool {
        self.blue != RAW_OFF
    }

    /// True if every channel is dark.
    #[inline]
    pub const fn is_off(&self) -> bool {
        self.red == RAW_OFF && self.green == RAW_OFF && self.blue == RAW_OFF
    }
}

impl Default for RawPixel {
    fn default() -> Self {
        Self::OFF
    }
}

/// One complete set of raw values, indexed by anode line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawPixelSet {
    pixels: [RawPixel; PIXEL_COUNT],
}

impl RawPixelSet {
    /// Every pixel dark.
    pub const OFF: Self = Self {
        pixels: [RawPixel::OFF; PIXEL_COUNT],
    };

    /// Creates a set from an array of raw pixels.
    #[inline]
    pub const fn new(pixels: [RawPixel; PIXEL_COUNT]) -> Self {
        Self { pixels }
    }

    /// Returns the pixel at `index`, or an error if out of range.
    #[inline]
    pub fn get(&self, index: usize) -> Result<RawPixel, PixelError> {
        self.pixels
            .get(index)
            .copied()
            .ok_or(PixelError::IndexOutOfRange {
                index,
                count: PIXEL_COUNT,
            })
    }

    /// Overwrites the pixel at `index`.
    #[inline]
    pub fn set(&mut self, index: usize, pixel: RawPixel) -> Result<(), PixelError> {
        let slot = self
            .pixels
            .get_mut(index)
            .ok_or(PixelError::IndexOutOfRange {
                index,
                count: PIXEL_COUNT,
            })?;
        *slot = pixel;
        Ok(())
    }

    /// Overwrites every pixel.
    #[inline]
    pub fn fill(&mut self, pixel: RawPixel) {
        self.pixels = [pixel; PIXEL_COUNT];
    }

    /// Iterates over the pixels in anode order.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, RawPixel> {
        self.pixels.iter()
    }

    /// Indexes without bounds reporting. Callers must pass `index < PIXEL_COUNT`.
    #[inline]
    pub(crate) fn at(&self, index: usize) -> RawPixel {
        self.pixels[index]
    }
}

impl Default for RawPixelSet {
    fn default() -> Self {
        Self::OFF
    }
}

/// Pixel operation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PixelError {
    /// Pixel index is not a valid anode line.
    IndexOutOfRange {
        /// The rejected index.
        index: usize,
        /// Number of pixels on the tile.
        count: usize,
    },

    /// Color component is beyond the 5-bit level range.
    LevelOutOfRange {
        /// The rejected level.
        level: u8,
    },
}

impl core::fmt::Display for PixelError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PixelError::IndexOutOfRange { index, count } => {
                write!(f, "pixel index {} out of range (tile has {} pixels)", index, count)
            }
            PixelError::LevelOutOfRange { level } => {
                write!(
                    f,
                    "color level {} out of range (maximum is {})",
                    level,
                    crate::gamma::MAX_LEVEL
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PixelError {}
