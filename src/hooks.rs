//! Callbacks for collaborators sharing the scan timers.
//!
//! Other subsystems (infrared sampling, button bookkeeping) piggyback on
//! the same two timer interrupts. The driver never interprets them; it only
//! promises when they run.
//!
//! # Handler structure
//!
//! Both handlers are split into two ordered sections:
//!
//! 1. **Masked section.** Runs with interrupts disabled, as the handler was
//!    entered. Only [`TimerHooks::masked`] runs here, so it sees minimal
//!    jitter.
//! 2. **Unmasked section.** Interrupts are re-enabled via
//!    [`InterruptControl::enable_nested`], then the remaining work runs.
//!
//! Consequently the overflow handler's unmasked section, including the pixel
//! scan, may itself be interrupted by the compare-match handler. The
//! compare-match handler touches no pixel state, so this nesting is safe;
//! hooks that share state between the two handlers must handle it
//! themselves.
//!
//! | Handler | Masked | Unmasked |
//! |---|---|---|
//! | overflow (every phase) | `masked` | pixel scan, `double_rate`, `per_overflow` |
//! | compare match (half a phase later) | `masked` | `double_rate` |

/// Re-enables interrupts from inside a handler.
pub trait InterruptControl {
    /// Allows other interrupts to preempt the running handler.
    fn enable_nested(&self);
}

fn noop() {}

/// Collaborator callbacks, registered once at startup.
#[derive(Debug, Clone, Copy)]
pub struct TimerHooks {
    /// Twice per phase, with interrupts masked. Keep it short.
    pub masked: fn(),

    /// Twice per phase, with interrupts enabled.
    pub double_rate: fn(),

    /// Once per phase, after the pixel scan, with interrupts enabled.
    pub per_overflow: fn(),
}

impl TimerHooks {
    /// No callbacks.
    pub const NONE: Self = Self {
        masked: noop,
        double_rate: noop,
        per_overflow: noop,
    };

    /// Sets the masked double-rate callback.
    pub const fn with_masked(mut self, f: fn()) -> Self {
        self.masked = f;
        self
    }

    /// Sets the unmasked double-rate callback.
    pub const fn with_double_rate(mut self, f: fn()) -> Self {
        self.double_rate = f;
        self
    }

    /// Sets the once-per-overflow callback.
    pub const fn with_per_overflow(mut self, f: fn()) -> Self {
        self.per_overflow = f;
        self
    }

    /// Body of the midpoint compare-match interrupt.
    pub fn on_compare_match<C: InterruptControl>(&self, irq: &C) {
        (self.masked)();
        irq.enable_nested();
        (self.double_rate)();
    }
}

impl Default for TimerHooks {
    fn default() -> Self {
        Self::NONE
    }
}
