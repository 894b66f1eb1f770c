//! NVS persistence of the volume mode with schema versioning.
//!
//! # Version History
//!
//! - **v1** (current): `volume` key holding the [`VolumeMode`] byte

use crate::audio::VolumeMode;

#[cfg(target_os = "espidf")]
use esp_idf_svc::nvs::{EspDefaultNvsPartition, EspNvs, NvsDefault};
#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::EspError;

/// Current NVS schema version
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// NVS namespace for tone settings
pub const NVS_NAMESPACE: &str = "tones";

/// NVS key for schema version
pub const VERSION_KEY: &str = "schema_ver";

/// NVS key for the volume mode
pub const VOLUME_KEY: &str = "volume";

/// NVS operation errors
#[derive(Debug)]
pub enum NvsError {
    /// NVS initialization failed
    #[cfg(target_os = "espidf")]
    InitFailed(EspError),
    /// NVS read/write error
    #[cfg(target_os = "espidf")]
    IoError(EspError),
    /// Schema version too new (downgrade not supported)
    TooNew { stored_version: u32 },
    /// Stored byte is not a volume mode
    InvalidValue(u8),
    /// Feature not available on this platform
    #[cfg(not(target_os = "espidf"))]
    NotAvailable,
}

#[cfg(target_os = "espidf")]
impl From<EspError> for NvsError {
    fn from(e: EspError) -> Self {
        NvsError::IoError(e)
    }
}

impl core::fmt::Display for NvsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            #[cfg(target_os = "espidf")]
            Self::InitFailed(e) => write!(f, "NVS init failed: {}", e),
            #[cfg(target_os = "espidf")]
            Self::IoError(e) => write!(f, "NVS I/O error: {}", e),
            Self::TooNew { stored_version } => {
                write!(f, "NVS schema v{} is newer than v{}", stored_version, CURRENT_SCHEMA_VERSION)
            }
            Self::InvalidValue(v) => write!(f, "invalid stored volume mode {}", v),
            #[cfg(not(target_os = "espidf"))]
            Self::NotAvailable => write!(f, "NVS not available"),
        }
    }
}

/// Byte stored for `mode`.
#[inline]
pub fn encode_volume(mode: VolumeMode) -> u8 {
    mode.into()
}

/// Stored byte back to a mode. Unlike [`VolumeMode::from_u8`] this rejects
/// unknown values so flash corruption is reported, not masked.
pub fn decode_volume(raw: u8) -> Result<VolumeMode, NvsError> {
    match raw {
        0..=2 => Ok(VolumeMode::from_u8(raw)),
        _ => Err(NvsError::InvalidValue(raw)),
    }
}

/// Check a stored schema version. `Ok(false)` means fresh install.
pub fn check_version(stored_version: u32) -> Result<bool, NvsError> {
    match stored_version {
        0 => Ok(false),
        v if v > CURRENT_SCHEMA_VERSION => Err(NvsError::TooNew { stored_version: v }),
        _ => Ok(true),
    }
}

#[cfg(target_os = "espidf")]
fn open(partition: EspDefaultNvsPartition) -> Result<EspNvs<NvsDefault>, NvsError> {
    EspNvs::new(partition, NVS_NAMESPACE, true).map_err(NvsError::InitFailed)
}

/// Load the saved volume mode.
///
/// `Ok(None)` on a fresh install (keep the default).
#[cfg(target_os = "espidf")]
pub fn load_volume_mode(partition: EspDefaultNvsPartition) -> Result<Option<VolumeMode>, NvsError> {
    let storage = open(partition)?;

    let stored_version = storage.get_u32(VERSION_KEY)?.unwrap_or(0);
    if !check_version(stored_version)? {
        return Ok(None);
    }

    match storage.get_u8(VOLUME_KEY)? {
        Some(raw) => decode_volume(raw).map(Some),
        None => Ok(None),
    }
}

/// Stub for non-ESP platforms
#[cfg(not(target_os = "espidf"))]
pub fn load_volume_mode() -> Result<Option<VolumeMode>, NvsError> {
    Err(NvsError::NotAvailable)
}

/// Save the volume mode with the current schema version.
#[cfg(target_os = "espidf")]
pub fn save_volume_mode(
    partition: EspDefaultNvsPartition,
    mode: VolumeMode,
) -> Result<(), NvsError> {
    let mut storage = open(partition)?;

    // Write version first
    storage.set_u32(VERSION_KEY, CURRENT_SCHEMA_VERSION)?;
    storage.set_u8(VOLUME_KEY, encode_volume(mode))?;

    Ok(())
}

/// Stub for non-ESP platforms
#[cfg(not(target_os = "espidf"))]
pub fn save_volume_mode(_mode: VolumeMode) -> Result<(), NvsError> {
    Err(NvsError::NotAvailable)
}

/// Somewhere the console can persist the volume mode.
pub trait VolumeStore {
    fn save_volume(&mut self, mode: VolumeMode) -> Result<(), NvsError>;
}

/// [`VolumeStore`] backed by the default NVS partition.
#[cfg(target_os = "espidf")]
pub struct NvsVolumeStore {
    partition: EspDefaultNvsPartition,
}

#[cfg(target_os = "espidf")]
impl NvsVolumeStore {
    pub fn new(partition: EspDefaultNvsPartition) -> Self {
        Self { partition }
    }
}

#[cfg(target_os = "espidf")]
impl VolumeStore for NvsVolumeStore {
    fn save_volume(&mut self, mode: VolumeMode) -> Result<(), NvsError> {
        save_volume_mode(self.partition.clone(), mode)
    }
}

/// [`VolumeStore`] for builds without flash storage.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Default)]
pub struct NvsVolumeStore;

#[cfg(not(target_os = "espidf"))]
impl VolumeStore for NvsVolumeStore {
    fn save_volume(&mut self, mode: VolumeMode) -> Result<(), NvsError> {
        save_volume_mode(mode)
    }
}
