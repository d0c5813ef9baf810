#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`FrameStore`**: Two pixel sets, one displayed and one buffered, split into a writer and a reader
//! - **`FrameWriter`**: Foreground handle; writes the buffered set and requests swaps
//! - **`FrameReader`**: Interrupt handle; reads the displayed set and performs swaps at frame boundaries
//! - **`PixelDriver`**: Owns the hardware and runs one scan phase per timer overflow
//! - **`PixelRegisters`**: Trait to implement for your register access (or a mock)
//! - **`PixelColor`**: A 5-bit-per-channel color, gamma-mapped on write
//! - **`RawPixel`**: Hardware compare values, where 255 is off and lower is brighter
//! - **`TimerHooks`**: Callbacks for collaborators that share the scan timers
//!
//! Colors are written as 0-31 brightness levels per channel and converted to
//! inverted compare values through per-channel gamma tables. Raw values can be
//! written directly for calibration.

// Re-export Srgb from palette for user convenience
pub use palette::Srgb;

pub mod colors;
pub mod controller;
pub mod driver;
pub mod frame;
pub mod gamma;
pub mod hooks;
pub mod phase;
pub mod regs;
pub mod timing;
pub mod types;

pub use colors::{PixelColor, hsb, hue};
pub use driver::PixelDriver;
pub use frame::{FrameReader, FrameStore, FrameWriter, PendingSwap};
pub use hooks::{InterruptControl, TimerHooks};
pub use phase::{Cursor, Phase};
pub use regs::PixelRegisters;
pub use timing::ScanTiming;
pub use types::{Channel, PIXEL_COUNT, PixelError, RAW_OFF, RawPixel, RawPixelSet};
