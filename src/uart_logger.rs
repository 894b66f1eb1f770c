//! UART log output.
//!
//! Drains [`IRQ_LOG_STREAM`] and [`APP_LOG_STREAM`] to a UART TX pin.
//! Requires an external USB-UART adapter (CH340, CP2102, etc).
//!
//! # Hardware Setup
//!
//! ```text
//! ESP32 GPIO17 (TX) ──────▶ USB-UART RX
//!                            └─▶ PC Serial Monitor
//! ```

use core::fmt::Write;

use crate::log_globals::{APP_LOG_STREAM, IRQ_LOG_STREAM};
use crate::logging::{LogEntry, LogStream};

#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::gpio;
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::peripheral::Peripheral;
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::uart::{self, UartTxDriver};

/// Size of one formatted line
pub const LINE_BUF_SIZE: usize = 160;

/// Interval between dropped-entry reports, in microseconds
pub const DROP_REPORT_INTERVAL_US: i64 = 10_000_000;

/// UART configuration for logging.
pub struct UartLoggerConfig {
    pub baud_rate: u32,
    pub tx_pin: u8,
}

impl Default for UartLoggerConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115200,
            tx_pin: 17, // GPIO17 - UART2 TX on most DevKits
        }
    }
}

/// Byte-slice writer that truncates instead of failing.
struct BufWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl Write for BufWriter<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let bytes = s.as_bytes();
        let to_write = bytes.len().min(self.buf.len() - self.pos);
        self.buf[self.pos..self.pos + to_write].copy_from_slice(&bytes[..to_write]);
        self.pos += to_write;
        Ok(())
    }
}

/// Format log entry to bytes.
///
/// Format: `[stamp] LEVEL: message\n`
pub fn format_log_entry(entry: &LogEntry, buf: &mut [u8]) -> usize {
    let mut writer = BufWriter { buf, pos: 0 };
    let _ = writeln!(
        writer,
        "[{:10}] {}: {}",
        entry.stamp,
        entry.level.as_str(),
        entry.text()
    );
    writer.pos
}

/// Format the periodic dropped-entries warning.
pub fn format_dropped_report(irq_dropped: u32, app_dropped: u32, buf: &mut [u8]) -> usize {
    let mut writer = BufWriter { buf, pos: 0 };
    let _ = writeln!(writer, "[WARN] Dropped: IRQ={}, APP={}", irq_dropped, app_dropped);
    writer.pos
}

/// Drain `stream` into `write`, one formatted line per entry.
///
/// Returns the number of entries written.
pub fn drain_stream<const N: usize>(stream: &LogStream<N>, mut write: impl FnMut(&[u8])) -> usize {
    let mut line = [0u8; LINE_BUF_SIZE];
    let mut count = 0;
    while let Some(entry) = stream.drain() {
        let len = format_log_entry(&entry, &mut line);
        write(&line[..len]);
        count += 1;
    }
    count
}

/// Drain both global streams, tick context first.
pub fn drain_all(mut write: impl FnMut(&[u8])) -> usize {
    drain_stream(&IRQ_LOG_STREAM, &mut write) + drain_stream(&APP_LOG_STREAM, &mut write)
}

/// Emit a drop report if either global stream lost entries, then reset the
/// counters. Returns true if a report was written.
pub fn report_dropped(mut write: impl FnMut(&[u8])) -> bool {
    let irq_dropped = IRQ_LOG_STREAM.dropped();
    let app_dropped = APP_LOG_STREAM.dropped();
    if irq_dropped == 0 && app_dropped == 0 {
        return false;
    }

    let mut msg = [0u8; 64];
    let len = format_dropped_report(irq_dropped, app_dropped, &mut msg);
    write(&msg[..len]);

    IRQ_LOG_STREAM.reset_dropped();
    APP_LOG_STREAM.reset_dropped();
    true
}

/// Initialize a TX-only UART for logging output.
#[cfg(target_os = "espidf")]
pub fn init_uart_logger<'d>(
    uart: impl Peripheral<P = impl uart::Uart> + 'd,
    tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
    config: &UartLoggerConfig,
) -> Result<UartTxDriver<'d>, esp_idf_svc::sys::EspError> {
    let uart_config =
        uart::config::Config::default().baudrate(esp_idf_svc::hal::units::Hertz(config.baud_rate));

    UartTxDriver::new(
        uart,
        tx_pin,
        Option::<gpio::AnyIOPin>::None, // CTS
        Option::<gpio::AnyIOPin>::None, // RTS
        &uart_config,
    )
}

/// UART log consumer task.
///
/// Drains both streams and reports drops every 10 seconds.
#[cfg(target_os = "espidf")]
pub fn uart_logger_task(uart: &mut UartTxDriver<'_>) -> ! {
    let mut last_dropped_report = 0i64;

    loop {
        let written = drain_all(|bytes| {
            let _ = uart.write(bytes);
        });

        let now = unsafe { esp_idf_svc::sys::esp_timer_get_time() };
        if now - last_dropped_report > DROP_REPORT_INTERVAL_US {
            report_dropped(|bytes| {
                let _ = uart.write(bytes);
            });
            last_dropped_report = now;
        }

        // If no work, wait before checking again
        if written == 0 {
            unsafe {
                esp_idf_svc::sys::vTaskDelay(10);
            }
        }
    }
}
