//! Tone subsystem
//!
//! Architecture:
//! - Sequence: flat `u16` codes in flash, RAM or the internal 3-tone buffer
//! - Scheduler: decodes one tone at a time, programs the timer period
//! - Waveform: timer tick toggles the DAC between 0 and the tone level
//! - Shared: critical-section slot joining the scheduler to the timer ISR

pub mod melody;
pub mod output;
pub mod scheduler;
pub mod sequence;
pub mod shared;
pub mod volume;
pub mod waveform;

pub use output::{MuteGate, ToneTimer, WaveformSink};
pub use scheduler::{PlaybackState, ToneControl, ToneScheduler};
pub use sequence::{
    ram_sequence, SequenceCursor, SequenceStorage, MAX_TONES, TONES_END, TONES_REPEAT,
    TONE_HIGH_VOLUME,
};
pub use shared::SharedTones;
pub use volume::{VolumeController, VolumeMode};
pub use waveform::{LoadedTone, TickOutcome, ToggleBudget, WaveformGenerator};
