//! Gamma mapping from 5-bit brightness levels to raw compare values.
//!
//! Each channel has a 32-entry table, indexed by brightness level. Level 0
//! maps to [`RAW_OFF`](crate::types::RAW_OFF) and the table decreases monotonically to the
//! brightest compare value at [`MAX_LEVEL`]. The entries are calibration
//! data for the direct-drive red/green cathodes and the pumped blue cathode;
//! they are derived from a standard 8-bit gamma curve compressed to 32 steps
//! and inverted so that 255 is dark.

use crate::types::Channel;

/// Highest brightness level accepted by the tables.
pub const MAX_LEVEL: u8 = 31;

/// Number of brightness levels per channel.
pub const LEVELS: usize = MAX_LEVEL as usize + 1;

/// Red channel compare values by level.
pub static GAMMA_RED: [u8; LEVELS] = [
    255, 254, 253, 251, 250, 248, 245, 242, 238, 234, 230, 224, 218, 211, 204, 195, 186, 176, 165,
    153, 140, 126, 111, 95, 78, 59, 40, 19, 13, 9, 3, 1,
];

/// Green channel compare values by level.
pub static GAMMA_GREEN: [u8; LEVELS] = [
    255, 254, 253, 251, 250, 248, 245, 242, 238, 234, 230, 224, 218, 211, 204, 195, 186, 176, 165,
    153, 140, 126, 111, 95, 78, 59, 40, 19, 13, 9, 3, 1,
];

/// Blue channel compare values by level.
pub static GAMMA_BLUE: [u8; LEVELS] = [
    255, 254, 253, 251, 250, 248, 245, 242, 238, 234, 230, 224, 218, 211, 204, 195, 186, 176, 165,
    153, 140, 126, 111, 95, 78, 59, 40, 19, 13, 9, 3, 1,
];

/// Returns the gamma table for `channel`.
#[inline]
pub fn table(channel: Channel) -> &'static [u8; LEVELS] {
    match channel {
        Channel::Red => &GAMMA_RED,
        Channel::Green => &GAMMA_GREEN,
        Channel::Blue => &GAMMA_BLUE,
    }
}

/// Maps a brightness level to the raw compare value for `channel`.
///
/// Levels above [`MAX_LEVEL`] saturate at full brightness.
#[inline]
pub fn map_level(channel: Channel, level: u8) -> u8 {
    table(channel)[level.min(MAX_LEVEL) as usize]
}
