//! Module: config
//!
//! Purpose: Timer and output constants of the tone player.
//!
//! Architecture:
//! - `ToneConfig`: clock, prescaler, rest frequency and DAC levels for one board
//! - Board presets are `const` so the scheduler can live in a `static`
//! - `nvs`: persistence of the runtime volume mode
//!
//! Safety: RT-safe. Plain values, no locks.

pub mod nvs;

/// Configuration rejected by [`ToneConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Timer input clock is zero
    ZeroClock,
    /// Prescaler is zero
    ZeroPrescaler,
    /// Rest frequency is zero
    ZeroSilentFreq,
    /// Rest frequency needs a period the counter cannot hold
    PeriodOverflow { period: u32 },
    /// Output level above the DAC range
    LevelOutOfRange { level: u16 },
}

impl ConfigError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ZeroClock => "C01",
            Self::ZeroPrescaler => "C02",
            Self::ZeroSilentFreq => "C03",
            Self::PeriodOverflow { .. } => "C04",
            Self::LevelOutOfRange { .. } => "C05",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::ZeroClock => "timer clock is zero",
            Self::ZeroPrescaler => "prescaler is zero",
            Self::ZeroSilentFreq => "rest frequency is zero",
            Self::PeriodOverflow { .. } => "rest period overflows timer",
            Self::LevelOutOfRange { .. } => "level exceeds DAC range",
        }
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::PeriodOverflow { period } => {
                write!(f, "{}: {} ({})", self.code(), self.message(), period)
            }
            Self::LevelOutOfRange { level } => {
                write!(f, "{}: {} ({})", self.code(), self.message(), level)
            }
            _ => write!(f, "{}: {}", self.code(), self.message()),
        }
    }
}

/// Timer and output configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneConfig {
    /// Timer input clock in Hz, before the prescaler
    pub clock_hz: u32,
    /// Fixed timer prescaler
    pub prescaler: u32,
    /// Stand-in frequency for rests: sets both period and toggle budget
    pub silent_freq: u16,
    /// DAC level for normal volume tones
    pub normal_level: u16,
    /// DAC level for high volume tones
    pub high_level: u16,
    /// Largest level the DAC accepts
    pub dac_max: u16,
    /// Largest value the period register holds
    pub max_period: u32,
}

impl ToneConfig {
    /// dotMG handheld: 48 MHz GCLK0, /16, 16-bit match counter, 10-bit DAC.
    pub const DOTMG: Self = Self {
        clock_hz: 48_000_000,
        prescaler: 16,
        silent_freq: 25,
        normal_level: 511,
        high_level: 1023,
        dac_max: 1023,
        max_period: 0xFFFF,
    };

    /// ESP32: 80 MHz APB timer group clock, /16, 64-bit counter.
    ///
    /// Levels stay on the 10-bit scale, the DAC adapter narrows them.
    pub const ESP32: Self = Self {
        clock_hz: 80_000_000,
        prescaler: 16,
        silent_freq: 25,
        normal_level: 511,
        high_level: 1023,
        dac_max: 1023,
        max_period: u32::MAX,
    };

    /// Timer period for a tone at `freq` Hz (two ticks per cycle).
    ///
    /// `clock_hz / (prescaler * freq * 2) - 1`. Frequencies too high for the
    /// clock saturate at 0 instead of wrapping.
    #[inline]
    pub const fn timer_period(&self, freq: u16) -> u32 {
        let divisor = self.prescaler * freq as u32 * 2;
        (self.clock_hz / divisor).saturating_sub(1)
    }

    /// DAC level for the "on" half of the square wave.
    #[inline]
    pub const fn level(&self, high_volume: bool) -> u16 {
        if high_volume {
            self.high_level
        } else {
            self.normal_level
        }
    }

    /// Check the values the tick path divides by or writes to hardware.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clock_hz == 0 {
            return Err(ConfigError::ZeroClock);
        }
        if self.prescaler == 0 {
            return Err(ConfigError::ZeroPrescaler);
        }
        if self.silent_freq == 0 {
            return Err(ConfigError::ZeroSilentFreq);
        }

        let period = self.timer_period(self.silent_freq);
        if period > self.max_period {
            return Err(ConfigError::PeriodOverflow { period });
        }

        for level in [self.normal_level, self.high_level] {
            if level > self.dac_max {
                return Err(ConfigError::LevelOutOfRange { level });
            }
        }

        Ok(())
    }
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self::DOTMG
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert_eq!(ToneConfig::DOTMG.validate(), Ok(()));
        assert_eq!(ToneConfig::ESP32.validate(), Ok(()));
    }

    #[test]
    fn test_timer_period_formula() {
        let cfg = ToneConfig::DOTMG;
        // 48 MHz / 16 / 880 - 1
        assert_eq!(cfg.timer_period(440), 3408);
        assert_eq!(cfg.timer_period(25), 59_999);
        assert_eq!(cfg.timer_period(1), 1_499_999);
    }

    #[test]
    fn test_timer_period_saturates() {
        let cfg = ToneConfig {
            clock_hz: 1000,
            ..ToneConfig::DOTMG
        };
        assert_eq!(cfg.timer_period(32_767), 0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero_pre = ToneConfig { prescaler: 0, ..ToneConfig::DOTMG };
        assert_eq!(zero_pre.validate(), Err(ConfigError::ZeroPrescaler));

        let slow_rest = ToneConfig { silent_freq: 10, ..ToneConfig::DOTMG };
        assert_eq!(
            slow_rest.validate(),
            Err(ConfigError::PeriodOverflow { period: 149_999 })
        );

        let loud = ToneConfig { high_level: 4095, ..ToneConfig::DOTMG };
        assert_eq!(loud.validate(), Err(ConfigError::LevelOutOfRange { level: 4095 }));
    }

    #[test]
    fn test_error_display() {
        let e = ConfigError::PeriodOverflow { period: 7 };
        assert_eq!(format!("{}", e), "C04: rest period overflows timer (7)");
        assert_eq!(format!("{}", ConfigError::ZeroClock), "C01: timer clock is zero");
    }
}
