//! Hardware Abstraction Layer for dotmg-tones.
//!
//! Thin wrappers implementing [`ToneTimer`](crate::audio::ToneTimer) and
//! [`WaveformSink`](crate::audio::WaveformSink) over real peripherals.
//! Tone logic stays in [`crate::audio`], HAL is just I/O.

pub mod samd_dac;

#[cfg(target_os = "espidf")]
pub mod dac;
#[cfg(target_os = "espidf")]
pub mod timer;

pub use samd_dac::{DacChannel, DacRegisters, SamdDacSink, DAC_BASE};

#[cfg(target_os = "espidf")]
pub use dac::{EspDacPin, EspDacSink};
#[cfg(target_os = "espidf")]
pub use timer::EspToneTimer;
