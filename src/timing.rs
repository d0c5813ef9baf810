//! Scan timing configuration.
//!
//! Both timers run in fast PWM mode with a fixed TOP and the same prescaler,
//! so every timing figure of the scan follows from the CPU clock:
//!
//! ```text
//! 4 MHz / 8 prescaler      = 500 kHz timer clock, 2 µs per tick
//! 256 ticks per overflow   = 512 µs per phase
//! 5 phases per pixel       = 2.56 ms per pixel
//! 6 pixels per frame       = 15.36 ms per frame, about 65 Hz
//! ```
//!
//! The midpoint compare interrupt fires 128 ticks after each overflow,
//! doubling the callback rate for collaborators that sample on this clock.

use crate::phase::PHASE_COUNT;
use crate::types::PIXEL_COUNT;

/// Counter steps per PWM cycle (fast PWM, TOP = 0xFF).
pub const TIMER_TOP: u32 = 256;

/// Clock division applied to both timers.
pub const TIMER_PRESCALER: u32 = 8;

/// Overflow interrupts per pixel.
pub const PHASES_PER_PIXEL: u32 = PHASE_COUNT as u32;

/// Overflow interrupts per frame.
pub const PHASES_PER_FRAME: u32 = PHASES_PER_PIXEL * PIXEL_COUNT as u32;

/// OCR2A value placing the compare interrupt half way between overflows.
pub const COMPARE_MIDPOINT: u8 = (TIMER_TOP / 2) as u8;

/// CPU clock of the reference tile.
pub const REFERENCE_CPU_HZ: u32 = 4_000_000;

/// Timing derived from a CPU clock frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanTiming {
    cpu_hz: u32,
}

impl ScanTiming {
    /// Timing of the reference tile.
    pub const REFERENCE: Self = Self::new(REFERENCE_CPU_HZ);

    /// Timing for a CPU running at `cpu_hz`. `cpu_hz` must be non-zero.
    pub const fn new(cpu_hz: u32) -> Self {
        Self { cpu_hz }
    }

    /// CPU clock in Hz.
    pub const fn cpu_hz(&self) -> u32 {
        self.cpu_hz
    }

    /// Length of one timer tick in nanoseconds.
    pub const fn tick_ns(&self) -> u64 {
        TIMER_PRESCALER as u64 * 1_000_000_000 / self.cpu_hz as u64
    }

    /// Time between overflow interrupts, which is also one scan phase.
    pub const fn overflow_period_ns(&self) -> u64 {
        TIMER_TOP as u64 * TIMER_PRESCALER as u64 * 1_000_000_000 / self.cpu_hz as u64
    }

    /// Time between overflow interrupts in microseconds.
    pub const fn overflow_period_us(&self) -> u64 {
        self.overflow_period_ns() / 1_000
    }

    /// Offset of the midpoint compare interrupt after each overflow, in microseconds.
    pub const fn midpoint_offset_us(&self) -> u64 {
        COMPARE_MIDPOINT as u64 * self.tick_ns() / 1_000
    }

    /// Time spent on one pixel in microseconds.
    pub const fn pixel_period_us(&self) -> u64 {
        self.overflow_period_ns() * PHASES_PER_PIXEL as u64 / 1_000
    }

    /// Time for one full scan of every pixel in microseconds.
    pub const fn frame_period_us(&self) -> u64 {
        self.overflow_period_ns() * PHASES_PER_FRAME as u64 / 1_000
    }

    /// Whole frames per second.
    pub const fn refresh_rate_hz(&self) -> u64 {
        1_000_000_000 / (self.overflow_period_ns() * PHASES_PER_FRAME as u64)
    }

    /// Converts a count of overflow interrupts to elapsed milliseconds.
    pub const fn overflows_to_millis(&self, overflows: u32) -> u64 {
        overflows as u64 * self.overflow_period_ns() / 1_000_000
    }

    /// Converts a count of completed frames to elapsed milliseconds.
    pub const fn frames_to_millis(&self, frames: u32) -> u64 {
        frames as u64 * self.overflow_period_ns() * PHASES_PER_FRAME as u64 / 1_000_000
    }
}

impl Default for ScanTiming {
    fn default() -> Self {
        Self::REFERENCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_tile_figures() {
        let t = ScanTiming::REFERENCE;
        assert_eq!(t.tick_ns(), 2_000);
        assert_eq!(t.overflow_period_us(), 512);
        assert_eq!(t.midpoint_offset_us(), 256);
        assert_eq!(t.pixel_period_us(), 2_560);
        assert_eq!(t.frame_period_us(), 15_360);
        assert_eq!(t.refresh_rate_hz(), 65);
    }

    #[test]
    fn counts_convert_to_millis() {
        let t = ScanTiming::REFERENCE;
        assert_eq!(t.overflows_to_millis(1_000), 512);
        assert_eq!(t.frames_to_millis(100), 1_536);
    }
}
