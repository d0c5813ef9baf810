//! Double-buffered frame store shared between foreground code and the scan interrupt.
//!
//! The store holds two [`RawPixelSet`]s. One is *displayed*, read by the
//! interrupt through a [`FrameReader`]; the other is *buffered*, written by
//! foreground code through a [`FrameWriter`]. Roles are exchanged by flipping
//! an index, never by copying, and only at a frame boundary.
//!
//! The handshake is a single flag:
//!
//! 1. The writer fills the buffered set, then sets the flag
//!    ([`FrameWriter::request_swap`]).
//! 2. At the next frame boundary the reader flips the roles and clears the
//!    flag ([`FrameReader::swap_if_pending`]).
//! 3. The writer sees the flag clear and copies the new displayed set into
//!    the new buffered set, so a partial update never reverts untouched
//!    pixels to stale values.
//!
//! While the flag is set the writer is mutably borrowed by the
//! [`PendingSwap`] guard, so it cannot touch the buffered set until the swap
//! has happened. If the guard is leaked with `mem::forget`, the writer still
//! remembers the request and completes step 3 before its next access.

use crate::colors::PixelColor;
use crate::types::{PixelError, RawPixel, RawPixelSet};
use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// Storage for both pixel sets and the swap handshake.
///
/// Typically placed in a `static` and split once at startup.
pub struct FrameStore {
    sets: [UnsafeCell<RawPixelSet>; 2],
    /// Index of the displayed set. Only the reader stores to it.
    front: AtomicU8,
    swap_pending: AtomicBool,
}

// NOTE(unsafe): The two sets are partitioned by the handshake. The writer
// NOTE(unsafe): only mutates the set at `front ^ 1` while `swap_pending` is
// NOTE(unsafe): clear, and the reader only changes `front` while it is set.
unsafe impl Sync for FrameStore {}

impl FrameStore {
    /// Creates a store with every pixel of both sets dark.
    pub const fn new() -> Self {
        Self {
            sets: [
                UnsafeCell::new(RawPixelSet::OFF),
                UnsafeCell::new(RawPixelSet::OFF),
            ],
            front: AtomicU8::new(0),
            swap_pending: AtomicBool::new(false),
        }
    }

    /// Splits the store into its foreground and interrupt halves.
    ///
    /// The exclusive borrow guarantees only one pair of handles exists.
    pub fn split(&mut self) -> (FrameWriter<'_>, FrameReader<'_>) {
        let store: &FrameStore = self;
        (
            FrameWriter {
                store,
                swap_requested: false,
            },
            FrameReader { store },
        )
    }

    fn front(&self) -> usize {
        self.front.load(Ordering::Acquire) as usize
    }

    fn displayed(&self) -> &RawPixelSet {
        // NOTE(unsafe): Nobody mutates a set while it is displayed.
        unsafe { &*self.sets[self.front()].get() }
    }
}

impl Default for FrameStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Foreground half of the frame store.
pub struct FrameWriter<'a> {
    store: &'a FrameStore,
    /// Set by `request_swap`, cleared once the new buffered set has been primed.
    swap_requested: bool,
}

impl<'a> FrameWriter<'a> {
    fn wait_for_swap(&self) {
        while self.store.swap_pending.load(Ordering::Acquire) {
            core::hint::spin_loop();
        }
    }

    /// Completes an outstanding swap request: waits for the reader, then primes.
    ///
    /// Every access to the back set goes through here first, so a leaked
    /// [`PendingSwap`] cannot let a write race the reader's flip.
    fn settle(&mut self) {
        if !self.swap_requested {
            return;
        }
        self.wait_for_swap();
        self.swap_requested = false;

        let displayed = *self.store.displayed();
        *self.back_mut() = displayed;
    }

    fn back_mut(&mut self) -> &mut RawPixelSet {
        let back = self.store.front() ^ 1;
        // NOTE(unsafe): Callers settle first, so no swap is pending and the
        // NOTE(unsafe): reader never looks at the back set; it is this writer's alone.
        unsafe { &mut *self.store.sets[back].get() }
    }

    fn buffered_mut(&mut self) -> &mut RawPixelSet {
        self.settle();
        self.back_mut()
    }

    fn buffered_ref(&self) -> &RawPixelSet {
        if self.swap_requested {
            // Not primed yet, but priming will copy exactly what is displayed.
            self.wait_for_swap();
            return self.store.displayed();
        }
        let back = self.store.front() ^ 1;
        // NOTE(unsafe): No swap is outstanding and only this writer mutates the
        // NOTE(unsafe): back set, which is borrowed immutably here.
        unsafe { &*self.store.sets[back].get() }
    }

    /// Writes raw compare values into the buffered set, bypassing gamma mapping.
    ///
    /// Intended for calibration tools. Has no visible effect until the next
    /// [`display_buffered_pixels`](Self::display_buffered_pixels).
    ///
    /// # Errors
    /// [`PixelError::IndexOutOfRange`] if `index` is not a pixel; nothing is written.
    pub fn set_pixel_raw(&mut self, index: usize, red: u8, green: u8, blue: u8) -> Result<(), PixelError> {
        self.buffered_mut().set(index, RawPixel::new(red, green, blue))
    }

    /// Writes a gamma-mapped color into the buffered set.
    ///
    /// # Errors
    /// [`PixelError::IndexOutOfRange`] if `index` is not a pixel; nothing is written.
    pub fn set_pixel_color(&mut self, index: usize, color: PixelColor) -> Result<(), PixelError> {
        self.buffered_mut().set(index, color.to_raw())
    }

    /// Writes the same raw values into every buffered pixel.
    pub fn fill_raw(&mut self, pixel: RawPixel) {
        self.buffered_mut().fill(pixel);
    }

    /// Writes the same color into every buffered pixel.
    pub fn fill_color(&mut self, color: PixelColor) {
        self.buffered_mut().fill(color.to_raw());
    }

    /// Reads back a pixel from the buffered set.
    ///
    /// Waits for an outstanding swap, like every other buffered-set access.
    pub fn buffered(&self, index: usize) -> Result<RawPixel, PixelError> {
        self.buffered_ref().get(index)
    }

    /// Reads a pixel from the displayed set.
    pub fn displayed(&self, index: usize) -> Result<RawPixel, PixelError> {
        self.store.displayed().get(index)
    }

    /// Copy of the whole displayed set.
    pub fn displayed_set(&self) -> RawPixelSet {
        *self.store.displayed()
    }

    /// Copy of the whole buffered set.
    pub fn buffered_set(&self) -> RawPixelSet {
        *self.buffered_ref()
    }

    /// Asks the scan to display the buffered set at the next frame boundary.
    ///
    /// Returns immediately. The returned guard holds the writer until the
    /// swap completes; dropping it waits for the swap. If the guard is leaked
    /// instead, the next access to the buffered set waits and primes.
    pub fn request_swap(&mut self) -> PendingSwap<'_, 'a> {
        self.settle();
        self.swap_requested = true;
        self.store.swap_pending.store(true, Ordering::Release);
        PendingSwap { writer: self }
    }

    /// Displays the buffered set, blocking until the next frame boundary.
    ///
    /// Busy-waits for at most one frame while the scan is running. Must not
    /// be called while the scan is disabled, since nothing would complete
    /// the swap.
    ///
    /// On return the buffered set holds a copy of what is now displayed.
    pub fn display_buffered_pixels(&mut self) {
        self.request_swap().wait();
    }
}

/// A swap requested but not yet performed by the scan.
///
/// Dropping the guard blocks until the swap completes and then primes the
/// new buffered set, exactly like [`wait`](Self::wait).
pub struct PendingSwap<'w, 'a> {
    writer: &'w mut FrameWriter<'a>,
}

impl PendingSwap<'_, '_> {
    /// True once the scan has swapped the sets.
    pub fn is_complete(&self) -> bool {
        !self.writer.store.swap_pending.load(Ordering::Acquire)
    }

    /// Blocks until the swap has happened and primes the new buffered set.
    pub fn wait(self) {
        drop(self);
    }

    /// Finishes the swap if it has already happened, otherwise hands the guard back.
    pub fn try_finish(self) -> Result<(), Self> {
        if self.is_complete() {
            drop(self);
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Drop for PendingSwap<'_, '_> {
    fn drop(&mut self) {
        self.writer.settle();
    }
}

/// Interrupt half of the frame store.
pub struct FrameReader<'a> {
    store: &'a FrameStore,
}

impl FrameReader<'_> {
    /// Reads a pixel from the displayed set.
    pub fn displayed(&self, index: usize) -> Result<RawPixel, PixelError> {
        self.store.displayed().get(index)
    }

    /// Fast path for the scan. `index` must be below `PIXEL_COUNT`.
    pub(crate) fn pixel(&self, index: usize) -> RawPixel {
        self.store.displayed().at(index)
    }

    /// True while the writer is waiting for a swap.
    pub fn is_swap_pending(&self) -> bool {
        self.store.swap_pending.load(Ordering::Acquire)
    }

    /// Exchanges the displayed and buffered roles if a swap was requested.
    ///
    /// Must only be called at a frame boundary. Constant time.
    pub fn swap_if_pending(&mut self) -> bool {
        if !self.is_swap_pending() {
            return false;
        }
        let front = self.store.front.load(Ordering::Relaxed);
        self.store.front.store(front ^ 1, Ordering::Release);
        self.store.swap_pending.store(false, Ordering::Release);
        true
    }
}
