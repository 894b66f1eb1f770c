//! Tone tick on an ESP32 general-purpose timer.
//!
//! The timer counts at `APB / 16` and raises its alarm every `period + 1`
//! counts, auto-reloading to zero, which matches the compare-match timers
//! [`ToneConfig::timer_period`](crate::config::ToneConfig::timer_period)
//! was written for.

use esp_idf_svc::hal::peripheral::Peripheral;
use esp_idf_svc::hal::timer::{config::Config as TimerConfig, Timer, TimerDriver};
use esp_idf_svc::sys::EspError;

use crate::audio::ToneTimer;
use crate::log_globals::IRQ_LOG_STREAM;
use crate::rt_warn;

/// Divider applied to the 80 MHz APB clock
pub const TIMER_DIVIDER: u32 = 16;

/// ToneTimer over an esp-idf-hal timer driver
pub struct EspToneTimer<'d> {
    driver: TimerDriver<'d>,
}

impl<'d> EspToneTimer<'d> {
    /// Configure the timer stopped, auto-reloading, with the tone divider.
    pub fn new(timer: impl Peripheral<P = impl Timer> + 'd) -> Result<Self, EspError> {
        let config = TimerConfig::new().divider(TIMER_DIVIDER).auto_reload(true);
        let mut driver = TimerDriver::new(timer, &config)?;
        driver.enable(false)?;
        driver.set_counter(0)?;
        Ok(Self { driver })
    }

    /// Route the alarm interrupt to `callback`.
    ///
    /// # Safety
    ///
    /// `callback` runs in ISR context: it must not block or allocate.
    pub unsafe fn subscribe(
        &mut self,
        callback: impl FnMut() + Send + 'static,
    ) -> Result<(), EspError> {
        self.driver.subscribe(callback)?;
        self.driver.enable_interrupt()
    }
}

impl ToneTimer for EspToneTimer<'_> {
    fn set_period(&mut self, period: u32) {
        let alarm = period as u64 + 1;
        if self.driver.set_counter(0).is_err() || self.driver.set_alarm(alarm).is_err() {
            rt_warn!(IRQ_LOG_STREAM, 0, "timer: alarm {} rejected", alarm);
        }
    }

    fn enable(&mut self) {
        if self.driver.enable_alarm(true).is_err() || self.driver.enable(true).is_err() {
            rt_warn!(IRQ_LOG_STREAM, 0, "timer: start failed");
        }
    }

    fn disable(&mut self) {
        if self.driver.enable(false).is_err() {
            rt_warn!(IRQ_LOG_STREAM, 0, "timer: stop failed");
        }
    }
}
