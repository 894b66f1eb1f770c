//! Scheduler shared between application code and the timer interrupt
//!
//! The scheduler lives in a `static` behind a critical-section mutex. The
//! interrupt handler calls [`SharedTones::on_tick`]; application code calls
//! [`SharedTones::with`]. Inside the closure the tick cannot run, so the
//! stop-mutate-rearm sequence of every play call is atomic with respect to
//! it.
//!
//! ```ignore
//! static TONES: SharedTones<'static, EspToneTimer, EspDacSink, fn() -> bool> = SharedTones::new();
//!
//! // timer ISR
//! TONES.on_tick();
//!
//! // game code
//! TONES.with(|t| t.play_two(440, 100, 880, 100));
//! ```

use core::cell::RefCell;

use critical_section::Mutex;

use super::output::{MuteGate, ToneTimer, WaveformSink};
use super::scheduler::{ToneControl, ToneScheduler};
use super::volume::VolumeMode;

/// Interrupt-safe home for a [`ToneScheduler`].
pub struct SharedTones<'a, T, S, M> {
    inner: Mutex<RefCell<Option<ToneScheduler<'a, T, S, M>>>>,
}

impl<'a, T, S, M> SharedTones<'a, T, S, M> {
    /// Empty slot, usable in a `static`.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Put a scheduler in the slot, returning the previous one.
    pub fn install(
        &self,
        scheduler: ToneScheduler<'a, T, S, M>,
    ) -> Option<ToneScheduler<'a, T, S, M>> {
        critical_section::with(|cs| self.inner.borrow(cs).replace(Some(scheduler)))
    }

    /// Take the scheduler out. Ticks become no-ops.
    pub fn take(&self) -> Option<ToneScheduler<'a, T, S, M>> {
        critical_section::with(|cs| self.inner.borrow(cs).take())
    }

    /// Whether a scheduler is installed.
    pub fn is_installed(&self) -> bool {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().is_some())
    }

    /// Run `f` on the scheduler with the tick held off.
    ///
    /// Returns `None` if nothing is installed.
    pub fn with<R>(&self, f: impl FnOnce(&mut ToneScheduler<'a, T, S, M>) -> R) -> Option<R> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).as_mut().map(f))
    }
}

impl<'a, T, S, M> SharedTones<'a, T, S, M>
where
    T: ToneTimer,
    S: WaveformSink,
    M: MuteGate,
{
    /// Timer interrupt entry point.
    #[inline]
    pub fn on_tick(&self) {
        self.with(|t| t.tick());
    }
}

impl<T, S, M> Default for SharedTones<'_, T, S, M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Console access to a `static` shared scheduler.
impl<'a, T, S, M> ToneControl for &SharedTones<'a, T, S, M>
where
    T: ToneTimer,
    S: WaveformSink,
    M: MuteGate,
{
    fn play_one(&mut self, freq: u16, dur: u16) {
        self.with(|t| t.play_one(freq, dur));
    }

    fn play_sequence(&mut self, codes: &'static [u16]) {
        self.with(|t| t.play_sequence(codes));
    }

    fn stop(&mut self) {
        self.with(|t| t.stop());
    }

    fn set_volume_mode(&mut self, mode: VolumeMode) {
        self.with(|t| t.set_volume_mode(mode));
    }

    fn volume_mode(&self) -> VolumeMode {
        self.with(|t| t.volume_mode()).unwrap_or_default()
    }

    fn is_playing(&self) -> bool {
        self.with(|t| t.is_playing()).unwrap_or(false)
    }
}
