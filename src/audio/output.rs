//! Peripheral contracts the tone core drives
//!
//! The core never touches registers. Platform adapters in [`crate::hal`]
//! implement these traits; tests implement them with recorders.

/// Periodic timer that fires the tone tick.
///
/// The adapter owns the interrupt registration and routes it to
/// [`SharedTones::on_tick`](super::shared::SharedTones::on_tick).
pub trait ToneTimer {
    /// Program the period register (ticks fire every `period + 1` counts).
    fn set_period(&mut self, period: u32);

    /// Start periodic ticking.
    fn enable(&mut self);

    /// Stop periodic ticking. Must be safe to call when already stopped.
    fn disable(&mut self);
}

/// DAC-like output written once per toggle.
pub trait WaveformSink {
    /// Drive the output to `level`.
    fn write_sample(&mut self, level: u16);

    /// Power up the output stage.
    fn enable(&mut self);

    /// Power down the output stage.
    fn disable(&mut self);
}

/// Whether sound is currently permitted.
///
/// Queried once per tone, from tick context: keep it short and
/// non-blocking.
pub trait MuteGate {
    fn sound_enabled(&mut self) -> bool;
}

impl<F: FnMut() -> bool> MuteGate for F {
    #[inline]
    fn sound_enabled(&mut self) -> bool {
        self()
    }
}

impl<T: ToneTimer + ?Sized> ToneTimer for &mut T {
    fn set_period(&mut self, period: u32) {
        (**self).set_period(period)
    }

    fn enable(&mut self) {
        (**self).enable()
    }

    fn disable(&mut self) {
        (**self).disable()
    }
}

impl<S: WaveformSink + ?Sized> WaveformSink for &mut S {
    fn write_sample(&mut self, level: u16) {
        (**self).write_sample(level)
    }

    fn enable(&mut self) {
        (**self).enable()
    }

    fn disable(&mut self) {
        (**self).disable()
    }
}
