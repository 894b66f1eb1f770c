//! # dotmg-tones
//!
//! Interrupt-driven square-wave tone and tone-sequence player.
//!
//! ## Architecture
//!
//! A periodic timer interrupt toggles a DAC between 0 and the tone level.
//! Application code queues tones; the interrupt consumes them:
//! - [`ToneScheduler`] decodes one tone at a time from a sequence
//! - [`SharedTones`] joins it to the interrupt through a critical section
//! - Peripherals are reached only through [`ToneTimer`] and [`WaveformSink`]
//! - Logging from either context goes through lock-free [`LogStream`]s

#![cfg_attr(not(test), no_std)]

pub mod audio;
pub mod config;
pub mod console;
pub mod hal;
pub mod log_globals;
pub mod logging;
pub mod uart_logger;

pub use audio::{
    MuteGate, PlaybackState, SharedTones, ToneControl, ToneScheduler, ToneTimer, VolumeMode,
    WaveformSink, TONES_END, TONES_REPEAT, TONE_HIGH_VOLUME,
};
pub use config::{ConfigError, ToneConfig};
pub use log_globals::{APP_LOG_STREAM, IRQ_LOG_STREAM};
pub use logging::{LogLevel, LogStream};
