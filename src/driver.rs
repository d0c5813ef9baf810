//! Interrupt-side pixel driver.
//!
//! [`PixelDriver`] owns everything the scan interrupt touches: the hardware,
//! the reader half of the frame store, the scan cursor and the collaborator
//! hooks. Foreground code only holds the [`FrameWriter`](crate::FrameWriter).
//!
//! On a target the driver lives in interrupt-owned storage and
//! [`on_overflow`](PixelDriver::on_overflow) is called from the timer 0
//! overflow vector. Power management calls [`enable`](PixelDriver::enable)
//! and [`disable`](PixelDriver::disable) with interrupts masked, e.g. from
//! inside a critical section.

use crate::controller::PwmController;
use crate::frame::FrameReader;
use crate::hooks::{InterruptControl, TimerHooks};
use crate::phase::{self, Action, Cursor};
use crate::regs::PixelRegisters;

/// Runs the multiplexed scan over one frame store.
pub struct PixelDriver<'a, R: PixelRegisters> {
    controller: PwmController<R>,
    reader: FrameReader<'a>,
    hooks: TimerHooks,
    cursor: Cursor,
    frames: u32,
    overflows: u32,
    enabled: bool,
}

impl<'a, R: PixelRegisters> PixelDriver<'a, R> {
    /// Creates a driver without touching the hardware. Call [`init`](Self::init) next.
    pub fn new(regs: R, reader: FrameReader<'a>) -> Self {
        Self {
            controller: PwmController::new(regs),
            reader,
            hooks: TimerHooks::NONE,
            cursor: Cursor::START,
            frames: 0,
            overflows: 0,
            enabled: false,
        }
    }

    /// Registers collaborator callbacks.
    pub fn with_hooks(mut self, hooks: TimerHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// The registered callbacks, for use by the compare-match handler.
    pub fn hooks(&self) -> TimerHooks {
        self.hooks
    }

    /// One-time setup: pin directions, interrupt masks, then starts the timers.
    pub fn init(&mut self) {
        self.cursor = Cursor::START;
        self.controller.setup_pins();
        self.controller.setup_interrupts();
        self.enable();
        #[cfg(feature = "defmt")]
        defmt::debug!("pixels: initialised");
    }

    /// Restarts the timers after [`disable`](Self::disable).
    ///
    /// The scan resumes at the cursor where it stopped; the previously
    /// selected anode is deactivated again by the next pump phase before any
    /// other anode is selected.
    pub fn enable(&mut self) {
        self.controller.enable();
        self.enabled = true;
        #[cfg(feature = "defmt")]
        defmt::debug!("pixels: enabled at {}", self.cursor);
    }

    /// Stops the timers and turns every pixel off, e.g. before sleeping.
    ///
    /// A writer blocked in
    /// [`display_buffered_pixels`](crate::FrameWriter::display_buffered_pixels)
    /// will not be released until the driver is enabled again.
    pub fn disable(&mut self) {
        self.controller.disable();
        self.enabled = false;
        #[cfg(feature = "defmt")]
        defmt::debug!("pixels: disabled");
    }

    /// True between [`enable`](Self::enable) and [`disable`](Self::disable).
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Body of the timer 0 overflow interrupt.
    ///
    /// Runs the masked hook, re-enables interrupts, then performs one scan
    /// phase followed by the unmasked hooks. See [`crate::hooks`] for the
    /// nesting this allows.
    pub fn on_overflow<C: InterruptControl>(&mut self, irq: &C) {
        (self.hooks.masked)();
        irq.enable_nested();

        self.step();

        (self.hooks.double_rate)();
        (self.hooks.per_overflow)();
    }

    /// Performs one scan phase.
    ///
    /// Must complete before the next overflow. If it does not, the affected
    /// cycle shows the previous compare values and the next phase corrects it.
    pub fn step(&mut self) {
        let pixel = self.reader.pixel(self.cursor.pixel());
        let step = phase::transition(self.cursor, pixel);

        for action in step.actions {
            self.apply(action);
        }

        self.cursor = step.next;
        self.overflows = self.overflows.wrapping_add(1);

        if step.frame_end {
            self.frames = self.frames.wrapping_add(1);
            self.reader.swap_if_pending();
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::DeactivateAnodes => self.controller.deactivate_anodes(),
            Action::ChargePump => {
                self.controller.connect_blue();
                self.controller.enable_pump_sink();
            }
            Action::StopPumpSink => self.controller.disable_pump_sink(),
            Action::ActivateAnode(line) => self.controller.activate_anode(line),
            Action::Load(register, value) => self.controller.load_compare(register, value),
            Action::FloatBlue => self.controller.float_blue(),
        }
    }

    /// Where the next overflow will resume the scan.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Frame boundaries passed, each of which checked for a pending swap. Wraps.
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Scan phases performed. Wraps.
    pub fn overflows(&self) -> u32 {
        self.overflows
    }

    /// Read-only view of the frame store.
    pub fn reader(&self) -> &FrameReader<'a> {
        &self.reader
    }

    /// The hardware access.
    pub fn registers(&self) -> &R {
        self.controller.registers()
    }

    /// The hardware access, mutably.
    pub fn registers_mut(&mut self) -> &mut R {
        self.controller.registers_mut()
    }

    /// Tears the driver down, returning its parts. Disable it first.
    pub fn release(self) -> (R, FrameReader<'a>) {
        (self.controller.release(), self.reader)
    }
}
