//! Dual-timer PWM and anode multiplex controller.
//!
//! Red and green are generated by timer 0 in fast PWM mode, with the outputs
//! set (LED dark) at BOTTOM and cleared (LED lit) on compare match, so each
//! LED lights during the tail of the counting cycle. Blue is generated the
//! same way by timer 2 on the charge pump input. Timer 2 must count in
//! lockstep with timer 0, because the five-phase scan in
//! [`phase`](crate::phase) depends on a fixed relationship between the pump
//! and the red/green cycles. Both timers are therefore always started
//! together from a synchronized hold.

use crate::regs::{
    ClockSelect, CompareOutput, CompareRegister, DrivePin, InterruptEnable, Level, PinDirection,
    PixelRegisters, SyncControl, TimerControlA, TimerControlB, TimerId,
};
use crate::timing::COMPARE_MIDPOINT;
use crate::types::{PIXEL_COUNT, RAW_OFF};

/// Timer 0 mode: fast PWM on both red and green outputs.
const RED_GREEN_PWM: TimerControlA =
    TimerControlA::fast_pwm(CompareOutput::ClearOnMatch, CompareOutput::ClearOnMatch);

/// Timer 2 mode with the blue pump output connected.
const BLUE_CONNECTED: TimerControlA =
    TimerControlA::fast_pwm(CompareOutput::Disconnected, CompareOutput::ClearOnMatch);

/// Timer 2 mode with the blue pump output released to the port bit.
const BLUE_DISCONNECTED: TimerControlA =
    TimerControlA::fast_pwm(CompareOutput::Disconnected, CompareOutput::Disconnected);

/// Owns the pixel hardware and expresses the semantic operations on it.
pub struct PwmController<R: PixelRegisters> {
    regs: R,
}

impl<R: PixelRegisters> PwmController<R> {
    /// Wraps the register access. No hardware is touched.
    pub fn new(regs: R) -> Self {
        Self { regs }
    }

    /// Returns the register access.
    pub fn registers(&self) -> &R {
        &self.regs
    }

    /// Returns the register access mutably.
    pub fn registers_mut(&mut self) -> &mut R {
        &mut self.regs
    }

    /// Releases the register access.
    pub fn release(self) -> R {
        self.regs
    }

    /// Configures pin directions for multiplexing.
    ///
    /// Anodes become low outputs. Red and green cathodes are driven high
    /// (dark) before they become outputs. Blue drive and blue sink stay as
    /// inputs with their port bits low, so no pull-up can feed the pump
    /// capacitor; the scan connects them only while blue is needed.
    pub fn setup_pins(&mut self) {
        for line in 0..PIXEL_COUNT {
            self.regs.set_anode_level(line, Level::Low);
            self.regs.set_anode_direction(line, PinDirection::Output);
        }

        self.regs.set_pin_level(DrivePin::Red, Level::High);
        self.regs.set_pin_level(DrivePin::Green, Level::High);
        self.regs.set_pin_direction(DrivePin::Red, PinDirection::Output);
        self.regs.set_pin_direction(DrivePin::Green, PinDirection::Output);

        self.regs.set_pin_level(DrivePin::Blue, Level::Low);
        self.regs.set_pin_direction(DrivePin::Blue, PinDirection::Input);
        self.regs.set_pin_level(DrivePin::BlueSink, Level::Low);
        self.regs.set_pin_direction(DrivePin::BlueSink, PinDirection::Input);
    }

    /// Enables the overflow interrupt on timer 0 and the midpoint compare
    /// interrupt on timer 2.
    pub fn setup_interrupts(&mut self) {
        self.regs
            .write_interrupt_enable(TimerId::RedGreen, InterruptEnable::OVERFLOW);
        self.regs
            .write_interrupt_enable(TimerId::BluePump, InterruptEnable::COMPARE_A);
    }

    /// Configures both timers and starts them in lockstep.
    ///
    /// Outputs are forced to the dark level before the compare outputs are
    /// connected, and the counters only start clocking once both have been
    /// released from the synchronized hold, so no LED lights while this runs.
    pub fn enable(&mut self) {
        // Timer 0: dark compare values, counter at BOTTOM, force outputs set.
        self.regs.write_compare(CompareRegister::Red, RAW_OFF);
        self.regs.write_compare(CompareRegister::Green, RAW_OFF);
        self.regs.write_counter(TimerId::RedGreen, 0);
        self.regs
            .write_control_b(TimerId::RedGreen, TimerControlB::force(true, true));
        self.regs.write_control_a(TimerId::RedGreen, RED_GREEN_PWM);

        // Timer 2: blue pump connected, midpoint interrupt half way through the cycle.
        self.regs.write_control_a(TimerId::BluePump, BLUE_CONNECTED);
        self.regs
            .write_compare(CompareRegister::Midpoint, COMPARE_MIDPOINT);
        self.regs.write_compare(CompareRegister::Blue, RAW_OFF);
        self.regs.write_counter(TimerId::BluePump, 0);
        self.regs
            .write_control_b(TimerId::BluePump, TimerControlB::force(false, true));

        self.regs.write_sync_control(SyncControl::HOLD);
        self.regs.write_control_b(
            TimerId::RedGreen,
            TimerControlB::clock(ClockSelect::Div8),
        );
        self.regs.write_control_b(
            TimerId::BluePump,
            TimerControlB::clock(ClockSelect::Div8),
        );
        self.regs.write_sync_control(SyncControl::RELEASE);
    }

    /// Stops both timers and leaves every output in a non-leaking state.
    ///
    /// Timer 0 is stopped first so no overflow can select another anode
    /// while the outputs are being released.
    pub fn disable(&mut self) {
        self.regs
            .write_control_b(TimerId::RedGreen, TimerControlB::STOPPED);
        self.deactivate_anodes();
        self.regs
            .write_control_b(TimerId::BluePump, TimerControlB::STOPPED);

        self.regs.write_control_a(TimerId::RedGreen, TimerControlA::OFF);
        self.regs.write_control_a(TimerId::BluePump, TimerControlA::OFF);

        self.disable_pump_sink();
        self.regs.set_pin_direction(DrivePin::Blue, PinDirection::Input);
    }

    /// Drives every anode low. Cheaper than tracking which one is active.
    pub fn deactivate_anodes(&mut self) {
        for line in 0..PIXEL_COUNT {
            self.regs.set_anode_level(line, Level::Low);
        }
    }

    /// Selects the pixel on anode `line`.
    pub fn activate_anode(&mut self, line: usize) {
        self.regs.set_anode_level(line, Level::High);
    }

    /// Connects timer 2 to the blue pin and drives it.
    ///
    /// The timer output is high at this point, which is the pump input side.
    pub fn connect_blue(&mut self) {
        self.regs.write_control_a(TimerId::BluePump, BLUE_CONNECTED);
        self.regs.set_pin_direction(DrivePin::Blue, PinDirection::Output);
    }

    /// Floats the blue pin and releases it from timer 2.
    ///
    /// Both are needed: with the timer connected the output latch keeps the
    /// pull-up on even as an input.
    pub fn float_blue(&mut self) {
        self.regs.set_pin_direction(DrivePin::Blue, PinDirection::Input);
        self.regs.write_control_a(TimerId::BluePump, BLUE_DISCONNECTED);
    }

    /// Starts sinking through the pump capacitor. Only safe with all anodes low.
    pub fn enable_pump_sink(&mut self) {
        self.regs
            .set_pin_direction(DrivePin::BlueSink, PinDirection::Output);
    }

    /// Stops sinking through the pump capacitor.
    pub fn disable_pump_sink(&mut self) {
        self.regs
            .set_pin_direction(DrivePin::BlueSink, PinDirection::Input);
    }

    /// Loads a compare register for the next PWM cycle.
    pub fn load_compare(&mut self, register: CompareRegister, value: u8) {
        self.regs.write_compare(register, value);
    }
}
