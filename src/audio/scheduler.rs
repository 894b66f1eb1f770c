//! Tone scheduler
//!
//! Owns every piece of playback state: the internal 3-tone buffer, the
//! sequence cursor, the waveform generator and the peripherals.
//!
//! # Discipline
//!
//! Application calls and the timer tick both mutate this object. Every
//! mutating call stops the timer first, rewrites state, then loads the
//! first tone, which re-arms the timer with the new period. The tick can
//! never observe a half-written sequence. Sharing with the interrupt goes
//! through [`SharedTones`](super::shared::SharedTones).
//!
//! # Tone load
//!
//! ```text
//! code = next()
//!   END    → stop, Idle
//!   REPEAT → rewind, code = next()
//! high   = volume.resolve(code & 0x8000)
//! freq   = code & 0x7FFF          (0 → silent_freq, silent)
//! muted  → silent
//! period = clock / (prescaler * freq * 2) - 1
//! budget = dur == 0 ? ∞ : (dur * freq) >> 9
//! arm timer
//! ```

use core::sync::atomic::AtomicU16;

use super::output::{MuteGate, ToneTimer, WaveformSink};
use super::sequence::{
    SequenceCursor, SequenceStorage, INTERNAL_LEN, TONES_END, TONES_REPEAT, TONE_HIGH_VOLUME,
};
use super::volume::{VolumeController, VolumeMode};
use super::waveform::{LoadedTone, TickOutcome, ToggleBudget, WaveformGenerator};
use crate::config::ToneConfig;
use crate::log_globals::{APP_LOG_STREAM, IRQ_LOG_STREAM};
use crate::{rt_debug, rt_info, rt_trace};

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Timer stopped, nothing loaded
    Idle,
    /// A tone is loaded (possibly silent)
    Playing,
}

/// Operations the console and other front ends need.
pub trait ToneControl {
    /// Play one tone. `dur` 0 plays until stopped.
    fn play_one(&mut self, freq: u16, dur: u16);
    /// Play a terminated sequence from flash.
    fn play_sequence(&mut self, codes: &'static [u16]);
    /// Stop playback.
    fn stop(&mut self);
    /// Change the volume override for tones loaded from now on.
    fn set_volume_mode(&mut self, mode: VolumeMode);
    /// Current volume override.
    fn volume_mode(&self) -> VolumeMode;
    /// Whether a tone (possibly silent) is loaded.
    fn is_playing(&self) -> bool;
}

/// Interrupt-driven tone and tone-sequence player.
pub struct ToneScheduler<'a, T, S, M> {
    config: ToneConfig,
    timer: T,
    sink: S,
    mute_gate: M,
    volume: VolumeController,
    /// Backing store for `play_one/two/three`; the last slot is END forever
    buffer: [u16; INTERNAL_LEN],
    cursor: SequenceCursor<'a>,
    generator: WaveformGenerator,
    state: PlaybackState,
    period: u32,
    /// Ticks handled while playing, used as the log stamp
    ticks: u32,
}

impl<'a, T, S, M> ToneScheduler<'a, T, S, M>
where
    T: ToneTimer,
    S: WaveformSink,
    M: MuteGate,
{
    /// Create an idle scheduler. Stops the timer and enables the output.
    pub fn new(config: ToneConfig, mut timer: T, mut sink: S, mute_gate: M) -> Self {
        timer.disable();
        sink.enable();

        let mut buffer = [0u16; INTERNAL_LEN];
        buffer[INTERNAL_LEN - 1] = TONES_END;

        Self {
            config,
            timer,
            sink,
            mute_gate,
            volume: VolumeController::new(),
            buffer,
            cursor: SequenceCursor::new(),
            generator: WaveformGenerator::new(),
            state: PlaybackState::Idle,
            period: 0,
            ticks: 0,
        }
    }

    /// Play one tone, superseding anything playing.
    pub fn play_one(&mut self, freq: u16, dur: u16) {
        self.timer.disable();
        self.buffer[0] = freq;
        self.buffer[1] = dur;
        self.buffer[2] = TONES_END;
        rt_info!(APP_LOG_STREAM, self.ticks, "play {:#06x}/{}", freq, dur);
        self.start(SequenceStorage::Internal);
    }

    /// Play two tones back to back, superseding anything playing.
    pub fn play_two(&mut self, freq1: u16, dur1: u16, freq2: u16, dur2: u16) {
        self.timer.disable();
        self.buffer[..5].copy_from_slice(&[freq1, dur1, freq2, dur2, TONES_END]);
        rt_info!(APP_LOG_STREAM, self.ticks, "play 2 tones from {:#06x}", freq1);
        self.start(SequenceStorage::Internal);
    }

    /// Play three tones back to back, superseding anything playing.
    ///
    /// The END after the third tone was written by [`Self::new`].
    #[allow(clippy::too_many_arguments)]
    pub fn play_three(
        &mut self,
        freq1: u16,
        dur1: u16,
        freq2: u16,
        dur2: u16,
        freq3: u16,
        dur3: u16,
    ) {
        self.timer.disable();
        self.buffer[..6].copy_from_slice(&[freq1, dur1, freq2, dur2, freq3, dur3]);
        rt_info!(APP_LOG_STREAM, self.ticks, "play 3 tones from {:#06x}", freq1);
        self.start(SequenceStorage::Internal);
    }

    /// Play a read-only sequence terminated by `TONES_END` or `TONES_REPEAT`.
    pub fn play_sequence(&mut self, codes: &'static [u16]) {
        self.timer.disable();
        rt_info!(APP_LOG_STREAM, self.ticks, "play sequence ({} codes)", codes.len());
        self.start(SequenceStorage::Flash(codes));
    }

    /// Play a sequence from RAM. The caller may edit codes not yet read
    /// while it plays.
    pub fn play_sequence_ram(&mut self, codes: &'a [AtomicU16]) {
        self.timer.disable();
        rt_info!(APP_LOG_STREAM, self.ticks, "play RAM sequence ({} codes)", codes.len());
        self.start(SequenceStorage::Ram(codes));
    }

    /// Stop playback. Does nothing when idle.
    pub fn stop(&mut self) {
        if self.state == PlaybackState::Playing {
            rt_info!(APP_LOG_STREAM, self.ticks, "stop");
        }
        self.halt();
    }

    /// Whether a tone (possibly silent) is loaded.
    #[inline]
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Current playback state.
    #[inline]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Change the volume override. The tone sounding now is unaffected.
    pub fn set_volume_mode(&self, mode: VolumeMode) {
        self.volume.set_mode(mode);
        rt_info!(APP_LOG_STREAM, self.ticks, "volume {}", mode.as_str());
    }

    /// Current volume override.
    #[inline]
    pub fn volume_mode(&self) -> VolumeMode {
        self.volume.mode()
    }

    /// Period programmed for the current tone.
    #[inline]
    pub fn timer_period(&self) -> u32 {
        self.period
    }

    /// Tone currently loaded, if playing.
    pub fn current_tone(&self) -> Option<&LoadedTone> {
        match self.state {
            PlaybackState::Playing => Some(self.generator.tone()),
            PlaybackState::Idle => None,
        }
    }

    /// Ticks handled while playing (wraps).
    #[inline]
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Board configuration in use.
    #[inline]
    pub fn config(&self) -> &ToneConfig {
        &self.config
    }

    /// Timer interrupt body.
    ///
    /// Flips the output or, when the tone's budget is spent, loads the next
    /// tone. Ticks arriving while idle are ignored.
    #[inline]
    pub fn tick(&mut self) {
        if self.state == PlaybackState::Idle {
            return;
        }
        self.ticks = self.ticks.wrapping_add(1);

        if self.generator.tick(&mut self.sink) == TickOutcome::ToneComplete {
            self.advance();
        }
    }

    /// Stop the timer and the output and give the peripherals back.
    pub fn into_parts(mut self) -> (T, S, M) {
        self.timer.disable();
        self.sink.disable();
        (self.timer, self.sink, self.mute_gate)
    }

    fn halt(&mut self) {
        self.timer.disable();
        self.state = PlaybackState::Idle;
    }

    /// Point the cursor at `storage` and load its first tone. The timer must
    /// already be stopped.
    fn start(&mut self, storage: SequenceStorage<'a>) {
        self.cursor = SequenceCursor::open(storage);
        self.advance();
    }

    /// Load the next tone and arm the timer, or go idle on END.
    fn advance(&mut self) {
        let mut code = self.cursor.next(&self.buffer);

        if code == TONES_END {
            rt_debug!(IRQ_LOG_STREAM, self.ticks, "sequence end");
            self.halt();
            return;
        }

        self.state = PlaybackState::Playing;

        if code == TONES_REPEAT {
            rt_debug!(IRQ_LOG_STREAM, self.ticks, "sequence repeat");
            self.cursor.rewind();
            code = self.cursor.next(&self.buffer);
        }

        let high_volume = self.volume.resolve(code & TONE_HIGH_VOLUME != 0);
        let mut freq = code & !TONE_HIGH_VOLUME;

        let mut silent = false;
        if freq == 0 {
            freq = self.config.silent_freq;
            silent = true;
        }
        if !self.mute_gate.sound_enabled() {
            silent = true;
        }

        self.period = self.config.timer_period(freq);

        let duration = self.cursor.next(&self.buffer);
        let budget = ToggleBudget::from_duration(duration, freq);

        self.generator.load(LoadedTone {
            silent,
            level: self.config.level(high_volume),
            budget,
        });

        rt_trace!(
            IRQ_LOG_STREAM,
            self.ticks,
            "tone {} Hz dur {} period {} silent {} high {}",
            freq,
            duration,
            self.period,
            silent,
            high_volume
        );

        self.timer.set_period(self.period);
        self.timer.enable();
    }
}

impl<'a, T, S, M> ToneControl for ToneScheduler<'a, T, S, M>
where
    T: ToneTimer,
    S: WaveformSink,
    M: MuteGate,
{
    fn play_one(&mut self, freq: u16, dur: u16) {
        ToneScheduler::play_one(self, freq, dur)
    }

    fn play_sequence(&mut self, codes: &'static [u16]) {
        ToneScheduler::play_sequence(self, codes)
    }

    fn stop(&mut self) {
        ToneScheduler::stop(self)
    }

    fn set_volume_mode(&mut self, mode: VolumeMode) {
        ToneScheduler::set_volume_mode(self, mode)
    }

    fn volume_mode(&self) -> VolumeMode {
        ToneScheduler::volume_mode(self)
    }

    fn is_playing(&self) -> bool {
        ToneScheduler::is_playing(self)
    }
}
