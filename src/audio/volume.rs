//! Volume override
//!
//! Atomic selection between per-tone volume and a forced level.

use core::sync::atomic::{AtomicU8, Ordering};

/// Volume override mode
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VolumeMode {
    /// Each tone's high-volume bit decides
    #[default]
    InTone = 0,
    /// Every tone at normal volume
    AlwaysNormal = 1,
    /// Every tone at high volume
    AlwaysHigh = 2,
}

impl VolumeMode {
    /// Convert from u8. Unknown values mean `InTone`.
    #[inline]
    pub fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::AlwaysNormal,
            2 => Self::AlwaysHigh,
            _ => Self::InTone,
        }
    }

    /// Console spelling
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InTone => "tone",
            Self::AlwaysNormal => "normal",
            Self::AlwaysHigh => "high",
        }
    }

    /// Parse the console spelling
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "tone" => Some(Self::InTone),
            "normal" => Some(Self::AlwaysNormal),
            "high" => Some(Self::AlwaysHigh),
            _ => None,
        }
    }
}

impl From<u8> for VolumeMode {
    fn from(v: u8) -> Self {
        Self::from_u8(v)
    }
}

impl From<VolumeMode> for u8 {
    fn from(m: VolumeMode) -> Self {
        m as u8
    }
}

/// Thread-safe volume controller
///
/// Written from application code, read once per tone from the tick.
pub struct VolumeController {
    mode: AtomicU8,
}

impl VolumeController {
    /// Create new controller (starts at `InTone`)
    pub const fn new() -> Self {
        Self {
            mode: AtomicU8::new(VolumeMode::InTone as u8),
        }
    }

    /// Get current mode
    #[inline]
    pub fn mode(&self) -> VolumeMode {
        VolumeMode::from_u8(self.mode.load(Ordering::Acquire))
    }

    /// Set mode. Tones already sounding keep their volume.
    #[inline]
    pub fn set_mode(&self, mode: VolumeMode) {
        self.mode.store(mode as u8, Ordering::Release);
    }

    /// Combine the override with a tone's own high-volume bit.
    #[inline]
    pub fn resolve(&self, tone_high: bool) -> bool {
        match self.mode() {
            VolumeMode::InTone => tone_high,
            VolumeMode::AlwaysNormal => false,
            VolumeMode::AlwaysHigh => true,
        }
    }
}

impl Default for VolumeController {
    fn default() -> Self {
        Self::new()
    }
}
