//! Gamma-ready pixel colors.
//!
//! [`PixelColor`] holds one 5-bit brightness level per channel, the input
//! format of the [`gamma`](crate::gamma) tables. Conversions from `palette`
//! colors and HSB are provided for animation code that works in floats.

use crate::gamma::{self, MAX_LEVEL};
use crate::types::{Channel, PixelError, RawPixel};
use palette::{FromColor, Hsv, Srgb};

/// A color as three brightness levels in `0..=31`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PixelColor {
    r: u8,
    g: u8,
    b: u8,
}

impl PixelColor {
    pub const OFF: Self = Self::from_levels(0, 0, 0);
    pub const RED: Self = Self::from_levels(MAX_LEVEL, 0, 0);
    pub const ORANGE: Self = Self::from_levels(MAX_LEVEL, 15, 0);
    pub const YELLOW: Self = Self::from_levels(MAX_LEVEL, MAX_LEVEL, 0);
    pub const GREEN: Self = Self::from_levels(0, MAX_LEVEL, 0);
    pub const CYAN: Self = Self::from_levels(0, MAX_LEVEL, MAX_LEVEL);
    pub const BLUE: Self = Self::from_levels(0, 0, MAX_LEVEL);
    pub const MAGENTA: Self = Self::from_levels(MAX_LEVEL, 0, MAX_LEVEL);
    pub const WHITE: Self = Self::from_levels(MAX_LEVEL, MAX_LEVEL, MAX_LEVEL);

    /// Creates a color from three levels.
    ///
    /// # Errors
    /// Returns [`PixelError::LevelOutOfRange`] if any level exceeds 31.
    pub fn new(r: u8, g: u8, b: u8) -> Result<Self, PixelError> {
        for level in [r, g, b] {
            if level > MAX_LEVEL {
                return Err(PixelError::LevelOutOfRange { level });
            }
        }
        Ok(Self::from_levels(r, g, b))
    }

    // Only for levels already known to be in range.
    const fn from_levels(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Converts 8-bit components by dropping the three low bits.
    pub const fn from_rgb888(r: u8, g: u8, b: u8) -> Self {
        Self::from_levels(r >> 3, g >> 3, b >> 3)
    }

    /// Converts an sRGB color with components in 0.0-1.0, rounding to the nearest level.
    ///
    /// Out-of-range components are clamped.
    pub fn from_srgb(color: Srgb) -> Self {
        fn level(v: f32) -> u8 {
            (v.clamp(0.0, 1.0) * MAX_LEVEL as f32 + 0.5) as u8
        }
        Self::from_levels(level(color.red), level(color.green), level(color.blue))
    }

    /// Red level.
    pub const fn r(&self) -> u8 {
        self.r
    }

    /// Green level.
    pub const fn g(&self) -> u8 {
        self.g
    }

    /// Blue level.
    pub const fn b(&self) -> u8 {
        self.b
    }

    /// Scales every channel by `brightness / 255`.
    pub const fn dim(self, brightness: u8) -> Self {
        const fn scale(level: u8, brightness: u8) -> u8 {
            ((level as u16 * brightness as u16) / 255) as u8
        }
        Self::from_levels(
            scale(self.r, brightness),
            scale(self.g, brightness),
            scale(self.b, brightness),
        )
    }

    /// Looks up the raw compare values for this color.
    pub fn to_raw(self) -> RawPixel {
        RawPixel::new(
            gamma::map_level(Channel::Red, self.r),
            gamma::map_level(Channel::Green, self.g),
            gamma::map_level(Channel::Blue, self.b),
        )
    }
}

impl From<PixelColor> for RawPixel {
    fn from(color: PixelColor) -> Self {
        color.to_raw()
    }
}

/// Creates a pixel color from hue (degrees), saturation and brightness (0.0-1.0).
#[inline]
pub fn hsb(hue: f32, saturation: f32, brightness: f32) -> PixelColor {
    let hsv = Hsv::new(hue, saturation, brightness);
    PixelColor::from_srgb(Srgb::from_color(hsv))
}

/// Creates a fully saturated, full brightness pixel color from hue only.
#[inline]
pub fn hue(hue: f32) -> PixelColor {
    hsb(hue, 1.0, 1.0)
}
