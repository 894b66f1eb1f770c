//! ESP32 internal DAC in one-shot mode.
//!
//! 8-bit converter: the 10-bit tone levels lose their low two bits. Writes
//! are immediate, no status to poll.

use esp_idf_svc::sys::{
    dac_channel_t, dac_channel_t_DAC_CHAN_0, dac_channel_t_DAC_CHAN_1, dac_oneshot_config_t,
    dac_oneshot_del_channel, dac_oneshot_handle_t, dac_oneshot_new_channel,
    dac_oneshot_output_voltage, esp, EspError,
};

use crate::audio::WaveformSink;

/// ESP32 DAC output pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EspDacPin {
    /// DAC channel 0
    Gpio25,
    /// DAC channel 1
    Gpio26,
}

impl EspDacPin {
    fn channel(self) -> dac_channel_t {
        match self {
            Self::Gpio25 => dac_channel_t_DAC_CHAN_0,
            Self::Gpio26 => dac_channel_t_DAC_CHAN_1,
        }
    }
}

/// Waveform sink on the ESP32 one-shot DAC
pub struct EspDacSink {
    handle: dac_oneshot_handle_t,
}

// The handle is only used by whoever owns the sink
unsafe impl Send for EspDacSink {}

impl EspDacSink {
    /// Claim a DAC channel.
    pub fn new(pin: EspDacPin) -> Result<Self, EspError> {
        let config = dac_oneshot_config_t {
            chan_id: pin.channel(),
        };
        let mut handle: dac_oneshot_handle_t = core::ptr::null_mut();
        esp!(unsafe { dac_oneshot_new_channel(&config, &mut handle) })?;
        Ok(Self { handle })
    }

    /// Scale a 10-bit tone level to the 8-bit converter.
    #[inline]
    pub const fn scale(level: u16) -> u8 {
        let scaled = level >> 2;
        if scaled > u8::MAX as u16 {
            u8::MAX
        } else {
            scaled as u8
        }
    }
}

impl WaveformSink for EspDacSink {
    #[inline]
    fn write_sample(&mut self, level: u16) {
        unsafe {
            dac_oneshot_output_voltage(self.handle, Self::scale(level));
        }
    }

    fn enable(&mut self) {}

    fn disable(&mut self) {
        self.write_sample(0);
    }
}

impl Drop for EspDacSink {
    fn drop(&mut self) {
        unsafe {
            dac_oneshot_del_channel(self.handle);
        }
    }
}
