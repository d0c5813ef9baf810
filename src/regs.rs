//! Typed register values and the hardware access trait.
//!
//! The pixel hardware is two 8-bit timer/counters plus a handful of GPIO
//! lines. Rather than writing bit masks directly, the driver builds the
//! value types in this module, each of which names the semantic setting
//! and encodes it with [`bits()`](TimerControlA::bits) using the
//! ATmega168PB register layout:
//!
//! ```text
//! TCCRnA  COMnA1 COMnA0 COMnB1 COMnB0   -      -    WGMn1  WGMn0
//! TCCRnB  FOCnA  FOCnB    -      -    WGMn2  CSn2   CSn1   CSn0
//! GTCCR   TSM      -      -      -      -      -   PSRASY PSRSYNC
//! TIMSKn    -      -      -      -      -   OCIEnB OCIEnA  TOIEn
//! ```
//!
//! Implement [`PixelRegisters`] for your target to connect the driver to
//! real hardware. Implementations are expected to be simple volatile writes;
//! every call happens either inside the overflow interrupt or while the
//! timers are stopped.

/// One of the two synchronized timer/counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerId {
    /// Timer 0. Drives red (OC0A) and green (OC0B) and raises the overflow interrupt.
    RedGreen,

    /// Timer 2. Drives the blue charge pump (OC2B) and raises the mid-period compare interrupt.
    BluePump,
}

/// Output compare registers used by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CompareRegister {
    /// OCR0A, red cathode.
    Red,

    /// OCR0B, green cathode.
    Green,

    /// OCR2A, half-period match used only to raise the compare interrupt.
    Midpoint,

    /// OCR2B, blue charge pump.
    Blue,
}

impl CompareRegister {
    /// Timer that owns this register.
    pub const fn timer(self) -> TimerId {
        match self {
            CompareRegister::Red | CompareRegister::Green => TimerId::RedGreen,
            CompareRegister::Midpoint | CompareRegister::Blue => TimerId::BluePump,
        }
    }
}

/// Waveform generation mode, the low two WGM bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Waveform {
    /// Plain counting, no PWM.
    Normal = 0b00,

    /// Fast PWM, TOP = 0xFF, compare registers update at BOTTOM.
    FastPwm = 0b11,
}

/// Output pin behaviour on compare match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CompareOutput {
    /// Pin is not driven by the timer.
    Disconnected = 0b00,

    /// Non-inverting fast PWM: clear on match, set at BOTTOM.
    ///
    /// A set output keeps the cathode high, so the LED is dark until the
    /// match pulls it low.
    ClearOnMatch = 0b10,
}

/// Clock source, shared encoding for both timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockSelect {
    /// No clock, counter halted.
    Stopped = 0b000,

    /// I/O clock divided by 8.
    Div8 = 0b010,
}

/// TCCRnA: waveform and compare output modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerControlA {
    /// WGM bits held in this register.
    pub waveform: Waveform,
    /// Output compare A pin mode.
    pub output_a: CompareOutput,
    /// Output compare B pin mode.
    pub output_b: CompareOutput,
}

impl TimerControlA {
    /// Everything disconnected, normal mode. The register reset value.
    pub const OFF: Self = Self {
        waveform: Waveform::Normal,
        output_a: CompareOutput::Disconnected,
        output_b: CompareOutput::Disconnected,
    };

    /// Fast PWM with the given output modes.
    pub const fn fast_pwm(output_a: CompareOutput, output_b: CompareOutput) -> Self {
        Self {
            waveform: Waveform::FastPwm,
            output_a,
            output_b,
        }
    }

    /// Encodes the register value.
    pub const fn bits(self) -> u8 {
        ((self.output_a as u8) << 6) | ((self.output_b as u8) << 4) | self.waveform as u8
    }
}

/// TCCRnB: clock select and force output compare strobes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerControlB {
    /// Counter clock source.
    pub clock: ClockSelect,
    /// Strobe that applies the compare A output action immediately.
    pub force_a: bool,
    /// Same strobe for compare B.
    pub force_b: bool,
}

impl TimerControlB {
    /// Clock stopped, no strobes.
    pub const STOPPED: Self = Self::clock(ClockSelect::Stopped);

    /// Runs the timer from `clock` without forcing a compare.
    pub const fn clock(clock: ClockSelect) -> Self {
        Self {
            clock,
            force_a: false,
            force_b: false,
        }
    }

    /// Leaves the timer stopped and strobes the selected force-compare bits.
    ///
    /// With the counter at BOTTOM, forcing a compare in non-inverting fast
    /// PWM sets the output, which is the dark level.
    pub const fn force(force_a: bool, force_b: bool) -> Self {
        Self {
            clock: ClockSelect::Stopped,
            force_a,
            force_b,
        }
    }

    /// Encodes the register value.
    pub const fn bits(self) -> u8 {
        ((self.force_a as u8) << 7) | ((self.force_b as u8) << 6) | self.clock as u8
    }
}

/// GTCCR: timer synchronization control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SyncControl {
    /// TSM. While set, the prescaler reset strobes stay asserted and every timer is halted.
    pub hold: bool,

    /// PSRASY, reset the timer 2 prescaler.
    pub reset_async_prescaler: bool,

    /// PSRSYNC, reset the shared timer 0/1 prescaler.
    pub reset_sync_prescaler: bool,
}

impl SyncControl {
    /// Halt all timers and reset both prescalers.
    pub const HOLD: Self = Self {
        hold: true,
        reset_async_prescaler: true,
        reset_sync_prescaler: true,
    };

    /// Release all timers at the same instant.
    pub const RELEASE: Self = Self {
        hold: false,
        reset_async_prescaler: false,
        reset_sync_prescaler: false,
    };

    /// Encodes the register value.
    pub const fn bits(self) -> u8 {
        ((self.hold as u8) << 7)
            | ((self.reset_async_prescaler as u8) << 1)
            | self.reset_sync_prescaler as u8
    }
}

/// TIMSKn: interrupt enables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptEnable {
    /// TOIEn.
    pub overflow: bool,
    /// OCIEnA.
    pub compare_a: bool,
    /// OCIEnB.
    pub compare_b: bool,
}

impl InterruptEnable {
    /// Interrupt on counter overflow only.
    pub const OVERFLOW: Self = Self {
        overflow: true,
        compare_a: false,
        compare_b: false,
    };

    /// Interrupt on compare match A only.
    pub const COMPARE_A: Self = Self {
        overflow: false,
        compare_a: true,
        compare_b: false,
    };

    /// Encodes the register value.
    pub const fn bits(self) -> u8 {
        ((self.compare_b as u8) << 2) | ((self.compare_a as u8) << 1) | self.overflow as u8
    }
}

/// Cathode-side pins that the driver reconfigures at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DrivePin {
    /// Red cathode, OC0A.
    Red,

    /// Green cathode, OC0B.
    Green,

    /// Blue charge pump input, OC2B.
    Blue,

    /// Charge pump sink. Its port bit is always low, so output means sinking.
    BlueSink,
}

/// Pin direction (DDR bit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinDirection {
    /// High impedance. With the port bit low there is no pull-up.
    Input,

    /// Driven from the port bit or the attached timer.
    Output,
}

/// Output level (PORT bit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Port bit cleared.
    Low,
    /// Port bit set.
    High,
}

/// Register-level access to the pixel hardware.
///
/// Every method is a single register write or bit update. Anode lines are
/// numbered `0..PIXEL_COUNT` in the same order as the frame buffer.
pub trait PixelRegisters {
    /// Writes TCCRnA.
    fn write_control_a(&mut self, timer: TimerId, value: TimerControlA);

    /// Writes TCCRnB.
    fn write_control_b(&mut self, timer: TimerId, value: TimerControlB);

    /// Writes an OCRnx double-buffered compare register.
    ///
    /// In fast PWM mode the new value only takes effect when the counter
    /// next wraps to BOTTOM.
    fn write_compare(&mut self, register: CompareRegister, value: u8);

    /// Writes TCNTn.
    fn write_counter(&mut self, timer: TimerId, value: u8);

    /// Writes GTCCR.
    fn write_sync_control(&mut self, value: SyncControl);

    /// Writes TIMSKn.
    fn write_interrupt_enable(&mut self, timer: TimerId, value: InterruptEnable);

    /// Sets the direction of anode line `line`.
    fn set_anode_direction(&mut self, line: usize, direction: PinDirection);

    /// Drives anode line `line`. High selects the pixel.
    fn set_anode_level(&mut self, line: usize, level: Level);

    /// Sets the direction of a cathode-side pin.
    fn set_pin_direction(&mut self, pin: DrivePin, direction: PinDirection);

    /// Sets the port bit of a cathode-side pin.
    fn set_pin_level(&mut self, pin: DrivePin, level: Level);
}
