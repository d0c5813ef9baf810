//! Shared test infrastructure for tile-pixels integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use core::cell::Cell;
use tile_pixels::regs::{
    CompareOutput, CompareRegister, DrivePin, InterruptEnable, Level, PinDirection, SyncControl,
    TimerControlA, TimerControlB, TimerId,
};
use tile_pixels::timing::PHASES_PER_FRAME;
use tile_pixels::{InterruptControl, PIXEL_COUNT, PixelDriver, PixelRegisters, RAW_OFF, RawPixel};

// ============================================================================
// Mock Registers
// ============================================================================

/// One call made through [`PixelRegisters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegWrite {
    ControlA(TimerId, TimerControlA),
    ControlB(TimerId, TimerControlB),
    Compare(CompareRegister, u8),
    Counter(TimerId, u8),
    Sync(SyncControl),
    InterruptEnable(TimerId, InterruptEnable),
    AnodeDirection(usize, PinDirection),
    AnodeLevel(usize, Level),
    PinDirection(DrivePin, PinDirection),
    PinLevel(DrivePin, Level),
}

const HISTORY: usize = 256;

fn timer_slot(timer: TimerId) -> usize {
    match timer {
        TimerId::RedGreen => 0,
        TimerId::BluePump => 1,
    }
}

fn compare_slot(register: CompareRegister) -> usize {
    match register {
        CompareRegister::Red => 0,
        CompareRegister::Green => 1,
        CompareRegister::Midpoint => 2,
        CompareRegister::Blue => 3,
    }
}

fn pin_slot(pin: DrivePin) -> usize {
    match pin {
        DrivePin::Red => 0,
        DrivePin::Green => 1,
        DrivePin::Blue => 2,
        DrivePin::BlueSink => 3,
    }
}

/// Register file model that records every write.
///
/// Compare writes are double buffered like fast PWM hardware: they land in
/// a pending slot and only become active on [`wrap`](Self::wrap).
pub struct MockRegisters {
    control_a: [TimerControlA; 2],
    control_b: [TimerControlB; 2],
    counters: [u8; 2],
    interrupts: [InterruptEnable; 2],
    sync: SyncControl,
    pending: [u8; 4],
    latched: [u8; 4],
    anode_directions: [PinDirection; PIXEL_COUNT],
    anode_levels: [Level; PIXEL_COUNT],
    pin_directions: [PinDirection; 4],
    pin_levels: [Level; 4],
    history: heapless::Vec<RegWrite, HISTORY>,
}

impl MockRegisters {
    /// Register file in its reset state.
    pub fn new() -> Self {
        Self {
            control_a: [TimerControlA::OFF; 2],
            control_b: [TimerControlB::STOPPED; 2],
            counters: [0; 2],
            interrupts: [InterruptEnable::default(); 2],
            sync: SyncControl::RELEASE,
            pending: [0; 4],
            latched: [0; 4],
            anode_directions: [PinDirection::Input; PIXEL_COUNT],
            anode_levels: [Level::Low; PIXEL_COUNT],
            pin_directions: [PinDirection::Input; 4],
            pin_levels: [Level::Low; 4],
            history: heapless::Vec::new(),
        }
    }

    fn record(&mut self, write: RegWrite) {
        // Oldest writes are kept; tests clear the history before the part they inspect
        let _ = self.history.push(write);
    }

    /// Counter wrap: pending compare values become active.
    pub fn wrap(&mut self) {
        self.latched = self.pending;
    }

    pub fn pending(&self, register: CompareRegister) -> u8 {
        self.pending[compare_slot(register)]
    }

    pub fn latched(&self, register: CompareRegister) -> u8 {
        self.latched[compare_slot(register)]
    }

    pub fn control_a(&self, timer: TimerId) -> TimerControlA {
        self.control_a[timer_slot(timer)]
    }

    pub fn control_b(&self, timer: TimerId) -> TimerControlB {
        self.control_b[timer_slot(timer)]
    }

    pub fn counter(&self, timer: TimerId) -> u8 {
        self.counters[timer_slot(timer)]
    }

    pub fn interrupt_enable(&self, timer: TimerId) -> InterruptEnable {
        self.interrupts[timer_slot(timer)]
    }

    pub fn sync(&self) -> SyncControl {
        self.sync
    }

    pub fn anode_direction(&self, line: usize) -> PinDirection {
        self.anode_directions[line]
    }

    pub fn anode_level(&self, line: usize) -> Level {
        self.anode_levels[line]
    }

    /// Lines currently driven high.
    pub fn active_anodes(&self) -> impl Iterator<Item = usize> + '_ {
        (0..PIXEL_COUNT).filter(|&line| self.anode_levels[line] == Level::High)
    }

    /// The single selected anode, if exactly one is high.
    pub fn active_anode(&self) -> Option<usize> {
        let mut active = self.active_anodes();
        match (active.next(), active.next()) {
            (Some(line), None) => Some(line),
            _ => None,
        }
    }

    pub fn pin_direction(&self, pin: DrivePin) -> PinDirection {
        self.pin_directions[pin_slot(pin)]
    }

    pub fn pin_level(&self, pin: DrivePin) -> Level {
        self.pin_levels[pin_slot(pin)]
    }

    /// True while timer 2 drives the blue pin.
    pub fn blue_driven(&self) -> bool {
        self.pin_direction(DrivePin::Blue) == PinDirection::Output
            && self.control_a(TimerId::BluePump).output_b == CompareOutput::ClearOnMatch
    }

    /// Channels whose active compare value would light during this cycle.
    pub fn lit_channels(&self) -> usize {
        let red = self.latched(CompareRegister::Red) != RAW_OFF;
        let green = self.latched(CompareRegister::Green) != RAW_OFF;
        let blue = self.blue_driven() && self.latched(CompareRegister::Blue) != RAW_OFF;
        red as usize + green as usize + blue as usize
    }

    pub fn history(&self) -> &[RegWrite] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Position of the first recorded write equal to `write`.
    pub fn position(&self, write: RegWrite) -> Option<usize> {
        self.history.iter().position(|w| *w == write)
    }
}

impl Default for MockRegisters {
    fn default() -> Self {
        Self::new()
    }
}

impl PixelRegisters for MockRegisters {
    fn write_control_a(&mut self, timer: TimerId, value: TimerControlA) {
        self.control_a[timer_slot(timer)] = value;
        self.record(RegWrite::ControlA(timer, value));
    }

    fn write_control_b(&mut self, timer: TimerId, value: TimerControlB) {
        self.control_b[timer_slot(timer)] = value;
        self.record(RegWrite::ControlB(timer, value));
    }

    fn write_compare(&mut self, register: CompareRegister, value: u8) {
        self.pending[compare_slot(register)] = value;
        self.record(RegWrite::Compare(register, value));
    }

    fn write_counter(&mut self, timer: TimerId, value: u8) {
        self.counters[timer_slot(timer)] = value;
        self.record(RegWrite::Counter(timer, value));
    }

    fn write_sync_control(&mut self, value: SyncControl) {
        self.sync = value;
        self.record(RegWrite::Sync(value));
    }

    fn write_interrupt_enable(&mut self, timer: TimerId, value: InterruptEnable) {
        self.interrupts[timer_slot(timer)] = value;
        self.record(RegWrite::InterruptEnable(timer, value));
    }

    fn set_anode_direction(&mut self, line: usize, direction: PinDirection) {
        self.anode_directions[line] = direction;
        self.record(RegWrite::AnodeDirection(line, direction));
    }

    fn set_anode_level(&mut self, line: usize, level: Level) {
        self.anode_levels[line] = level;
        self.record(RegWrite::AnodeLevel(line, level));
    }

    fn set_pin_direction(&mut self, pin: DrivePin, direction: PinDirection) {
        self.pin_directions[pin_slot(pin)] = direction;
        self.record(RegWrite::PinDirection(pin, direction));
    }

    fn set_pin_level(&mut self, pin: DrivePin, level: Level) {
        self.pin_levels[pin_slot(pin)] = level;
        self.record(RegWrite::PinLevel(pin, level));
    }
}

// ============================================================================
// Mock Interrupt Control
// ============================================================================

/// Counts how often a handler re-enabled interrupts.
pub struct MockInterrupts {
    nested: Cell<u32>,
}

impl MockInterrupts {
    pub fn new() -> Self {
        Self { nested: Cell::new(0) }
    }

    pub fn nested_count(&self) -> u32 {
        self.nested.get()
    }
}

impl InterruptControl for MockInterrupts {
    fn enable_nested(&self) {
        self.nested.set(self.nested.get() + 1);
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

/// One overflow: the counter wraps, then the interrupt runs.
pub fn overflow(driver: &mut PixelDriver<'_, MockRegisters>, irq: &MockInterrupts) {
    driver.registers_mut().wrap();
    driver.on_overflow(irq);
}

/// Runs `phases` overflows, folding what each pixel showed into `shown`.
///
/// A channel counts as shown when its active compare value is not dark
/// while exactly one anode is selected. Also checks that no cycle ever
/// lights more than one channel.
pub fn scan_into(
    driver: &mut PixelDriver<'_, MockRegisters>,
    irq: &MockInterrupts,
    phases: u32,
    shown: &mut [RawPixel; PIXEL_COUNT],
) {
    for _ in 0..phases {
        overflow(driver, irq);

        let regs = driver.registers();
        assert!(regs.lit_channels() <= 1, "more than one channel lit in a cycle");
        assert!(regs.active_anodes().count() <= 1, "more than one anode selected");

        if let Some(line) = regs.active_anode() {
            let pixel = &mut shown[line];
            pixel.red = pixel.red.min(regs.latched(CompareRegister::Red));
            pixel.green = pixel.green.min(regs.latched(CompareRegister::Green));
            if regs.blue_driven() {
                pixel.blue = pixel.blue.min(regs.latched(CompareRegister::Blue));
            }
        }
    }
}

/// Runs one frame of overflows and returns what each pixel showed.
pub fn scan_frame(
    driver: &mut PixelDriver<'_, MockRegisters>,
    irq: &MockInterrupts,
) -> [RawPixel; PIXEL_COUNT] {
    let mut shown = [RawPixel::OFF; PIXEL_COUNT];
    scan_into(driver, irq, PHASES_PER_FRAME, &mut shown);
    shown
}
