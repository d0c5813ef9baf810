//! The five-phase per-pixel scan.
//!
//! Every timer overflow advances the scan by one phase. Each pixel gets five
//! phases, so a frame is `PIXEL_COUNT * 5` overflows:
//!
//! | Phase | Visible during this cycle | Work done at its start |
//! |---|---|---|
//! | [`PumpCharge`](Phase::PumpCharge) | nothing | anodes off; if blue is lit, connect pump and sink to charge the capacitor |
//! | [`Rest`](Phase::Rest) | nothing | sink off; select anode; load blue |
//! | [`BlueShown`](Phase::BlueShown) | blue | load blue off, red on |
//! | [`RedShown`](Phase::RedShown) | red | float blue pin; load red off, green on |
//! | [`GreenShown`](Phase::GreenShown) | green | load green off; advance pixel, swap at frame end |
//!
//! Compare registers only latch at counter wrap, so every load made in a
//! phase shapes the *following* cycle. The blue value loaded in `Rest` is
//! what lights `BlueShown`, and so on. At most one channel's compare value is
//! ever latched non-dark.
//!
//! [`transition`] is a pure function of the cursor and the current pixel;
//! the driver applies the returned [`Action`]s to the hardware.

use crate::regs::CompareRegister;
use crate::types::{PIXEL_COUNT, RAW_OFF, RawPixel};
use heapless::Vec;

/// Most actions any single phase emits.
pub const MAX_ACTIONS: usize = 3;

/// Phases per pixel.
pub const PHASE_COUNT: usize = 5;

/// Position within one pixel's five-phase cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Anodes off; the pump capacitor charges if blue is lit.
    PumpCharge = 0,
    /// Dark cycle after the anode is selected.
    Rest = 1,
    /// Blue is lit.
    BlueShown = 2,
    /// Red is lit.
    RedShown = 3,
    /// Green is lit; the last phase of a pixel.
    GreenShown = 4,
}

impl Phase {
    /// Numeric phase, 0-4.
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// The phase after this one, wrapping after `GreenShown`.
    pub const fn next(self) -> Self {
        match self {
            Phase::PumpCharge => Phase::Rest,
            Phase::Rest => Phase::BlueShown,
            Phase::BlueShown => Phase::RedShown,
            Phase::RedShown => Phase::GreenShown,
            Phase::GreenShown => Phase::PumpCharge,
        }
    }
}

/// Current pixel and phase of the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cursor {
    pixel: u8,
    phase: Phase,
}

impl Cursor {
    /// First phase of the first pixel.
    pub const START: Self = Self {
        pixel: 0,
        phase: Phase::PumpCharge,
    };

    /// Pixel index, `0..PIXEL_COUNT`.
    pub const fn pixel(&self) -> usize {
        self.pixel as usize
    }

    /// Phase within the pixel.
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Moves one phase forward.
    ///
    /// Returns the new cursor and whether the pixel index wrapped, which
    /// marks the end of a frame.
    pub const fn advance(self) -> (Self, bool) {
        match self.phase {
            Phase::GreenShown => {
                let pixel = self.pixel + 1;
                if pixel as usize == PIXEL_COUNT {
                    (Self::START, true)
                } else {
                    (
                        Self {
                            pixel,
                            phase: Phase::PumpCharge,
                        },
                        false,
                    )
                }
            }
            phase => (
                Self {
                    pixel: self.pixel,
                    phase: phase.next(),
                },
                false,
            ),
        }
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::START
    }
}

/// Hardware work requested by one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Drive every anode low.
    DeactivateAnodes,

    /// Connect the blue timer output, drive the blue pin and start sinking
    /// through the pump capacitor.
    ChargePump,

    /// Stop sinking through the pump capacitor.
    StopPumpSink,

    /// Drive the given anode high.
    ActivateAnode(usize),

    /// Load a compare register for the next cycle.
    Load(CompareRegister, u8),

    /// Disconnect and float the blue pin.
    FloatBlue,
}

/// Result of one phase transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Cursor for the next overflow.
    pub next: Cursor,

    /// Work to perform now, in order.
    pub actions: Vec<Action, MAX_ACTIONS>,

    /// True if this step completed a frame; the frame store swap check belongs here.
    pub frame_end: bool,
}

/// Computes the work for the phase at `cursor`, given the pixel it points at.
pub fn transition(cursor: Cursor, pixel: RawPixel) -> Step {
    let mut actions = Vec::new();
    let mut act = |action| {
        let pushed = actions.push(action);
        debug_assert!(pushed.is_ok(), "phase emitted more than MAX_ACTIONS actions");
    };

    match cursor.phase {
        Phase::PumpCharge => {
            act(Action::DeactivateAnodes);
            if pixel.has_blue() {
                act(Action::ChargePump);
            }
        }
        Phase::Rest => {
            act(Action::StopPumpSink);
            act(Action::ActivateAnode(cursor.pixel()));
            act(Action::Load(CompareRegister::Blue, pixel.blue));
        }
        Phase::BlueShown => {
            act(Action::Load(CompareRegister::Blue, RAW_OFF));
            act(Action::Load(CompareRegister::Red, pixel.red));
        }
        Phase::RedShown => {
            act(Action::FloatBlue);
            act(Action::Load(CompareRegister::Red, RAW_OFF));
            act(Action::Load(CompareRegister::Green, pixel.green));
        }
        Phase::GreenShown => {
            act(Action::Load(CompareRegister::Green, RAW_OFF));
        }
    }

    let (next, frame_end) = cursor.advance();
    Step {
        next,
        actions,
        frame_end,
    }
}
