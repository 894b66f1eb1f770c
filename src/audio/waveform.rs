//! Square-wave generator driven by the timer tick
//!
//! Holds the state of the tone currently loaded: toggle budget, silence and
//! volume. Each tick flips the output once; when the budget is spent the
//! tick reports [`TickOutcome::ToneComplete`] and the scheduler loads the
//! next tone.

use super::output::WaveformSink;

/// Toggles left before the current tone completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleBudget {
    /// Counts down to zero
    Finite(u32),
    /// Duration 0: plays until stopped or superseded
    Infinite,
}

impl ToggleBudget {
    /// Budget for `duration` (1/1024 s units) at `freq` Hz.
    ///
    /// Two toggles per cycle means `duration * freq * 2 / 1024` toggles;
    /// this is computed as `(duration * freq) >> 9`. Durations thought of
    /// as milliseconds therefore play 2.34% short (512 instead of 500).
    /// Existing sound effects are tuned against this, keep it.
    #[inline]
    pub fn from_duration(duration: u16, freq: u16) -> Self {
        if duration == 0 {
            Self::Infinite
        } else {
            Self::Finite((duration as u32 * freq as u32) >> 9)
        }
    }

    /// True once a finite budget reaches zero.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        *self == Self::Finite(0)
    }
}

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Toggle slot consumed (output flipped unless silent)
    Sounding,
    /// Budget was already spent, load the next tone
    ToneComplete,
}

/// Tone parameters resolved by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadedTone {
    /// Output stays untouched (rest or muted)
    pub silent: bool,
    /// Level written for the "on" half of the wave
    pub level: u16,
    /// Toggles to play
    pub budget: ToggleBudget,
}

/// Square-wave generator
pub struct WaveformGenerator {
    tone: LoadedTone,
    /// Output currently at the tone level (not at 0)
    output_high: bool,
}

impl WaveformGenerator {
    /// Generator with nothing loaded.
    pub const fn new() -> Self {
        Self {
            tone: LoadedTone {
                silent: true,
                level: 0,
                budget: ToggleBudget::Finite(0),
            },
            output_high: false,
        }
    }

    /// Replace the current tone. The output level carries over, like a
    /// DAC data register would.
    #[inline]
    pub fn load(&mut self, tone: LoadedTone) {
        self.tone = tone;
    }

    /// Currently loaded tone
    #[inline]
    pub fn tone(&self) -> &LoadedTone {
        &self.tone
    }

    /// Remaining toggle budget
    #[inline]
    pub fn budget(&self) -> ToggleBudget {
        self.tone.budget
    }

    /// Whether the output is at the tone level
    #[inline]
    pub fn output_high(&self) -> bool {
        self.output_high
    }

    /// One timer tick.
    #[inline]
    pub fn tick<S: WaveformSink>(&mut self, sink: &mut S) -> TickOutcome {
        if self.tone.budget.is_exhausted() {
            return TickOutcome::ToneComplete;
        }

        if !self.tone.silent {
            self.output_high = !self.output_high;
            sink.write_sample(if self.output_high { self.tone.level } else { 0 });
        }

        if let ToggleBudget::Finite(n) = &mut self.tone.budget {
            *n -= 1;
        }

        TickOutcome::Sounding
    }
}

impl Default for WaveformGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        samples: Vec<u16>,
    }

    impl WaveformSink for Recorder {
        fn write_sample(&mut self, level: u16) {
            self.samples.push(level);
        }
        fn enable(&mut self) {}
        fn disable(&mut self) {}
    }

    fn tone(silent: bool, level: u16, budget: ToggleBudget) -> LoadedTone {
        LoadedTone { silent, level, budget }
    }

    #[test]
    fn test_budget_uses_shift_by_512() {
        assert_eq!(ToggleBudget::from_duration(1024, 440), ToggleBudget::Finite(880));
        // 1000 "ms" at 1 kHz: 1953 toggles, not the exact 2000
        assert_eq!(ToggleBudget::from_duration(1000, 1000), ToggleBudget::Finite(1953));
        assert_eq!(ToggleBudget::from_duration(0, 440), ToggleBudget::Infinite);
        assert_eq!(ToggleBudget::from_duration(1, 100), ToggleBudget::Finite(0));
    }

    #[test]
    fn test_budget_largest_inputs_fit() {
        assert_eq!(
            ToggleBudget::from_duration(u16::MAX, 0x7FFF),
            ToggleBudget::Finite((65_535u32 * 32_767) >> 9)
        );
    }

    #[test]
    fn test_tick_alternates_levels() {
        let mut gen = WaveformGenerator::new();
        let mut sink = Recorder::default();
        gen.load(tone(false, 511, ToggleBudget::Finite(4)));

        for _ in 0..4 {
            assert_eq!(gen.tick(&mut sink), TickOutcome::Sounding);
        }
        assert_eq!(sink.samples, vec![511, 0, 511, 0]);
        assert_eq!(gen.tick(&mut sink), TickOutcome::ToneComplete);
        assert_eq!(sink.samples.len(), 4);
    }

    #[test]
    fn test_silent_tone_counts_without_writing() {
        let mut gen = WaveformGenerator::new();
        let mut sink = Recorder::default();
        gen.load(tone(true, 1023, ToggleBudget::Finite(3)));

        for _ in 0..3 {
            assert_eq!(gen.tick(&mut sink), TickOutcome::Sounding);
        }
        assert_eq!(gen.tick(&mut sink), TickOutcome::ToneComplete);
        assert!(sink.samples.is_empty());
    }

    #[test]
    fn test_infinite_budget_never_completes() {
        let mut gen = WaveformGenerator::new();
        let mut sink = Recorder::default();
        gen.load(tone(false, 1023, ToggleBudget::Infinite));

        for _ in 0..10_000 {
            assert_eq!(gen.tick(&mut sink), TickOutcome::Sounding);
        }
        assert_eq!(gen.budget(), ToggleBudget::Infinite);
    }

    #[test]
    fn test_output_level_carries_across_tones() {
        let mut gen = WaveformGenerator::new();
        let mut sink = Recorder::default();
        gen.load(tone(false, 511, ToggleBudget::Finite(1)));
        gen.tick(&mut sink);
        assert!(gen.output_high());

        // Next tone starts from the high level, so its first toggle goes to 0
        gen.load(tone(false, 1023, ToggleBudget::Finite(2)));
        gen.tick(&mut sink);
        gen.tick(&mut sink);
        assert_eq!(sink.samples, vec![511, 0, 1023]);
    }
}
