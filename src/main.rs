//! dotmg-tones - Firmware entry point
//!
//! 1. Bring up the UART log drain
//! 2. Build the timer and DAC adapters, install the scheduler
//! 3. Restore the saved volume mode
//! 4. Run the serial console on stdin/stdout

use core::sync::atomic::{AtomicBool, Ordering};
use std::io::Read;

use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::sys as esp_idf_sys;

use dotmg_tones::audio::{melody, SharedTones, ToneControl, ToneScheduler};
use dotmg_tones::config::{nvs, ToneConfig};
use dotmg_tones::console::{Console, Session};
use dotmg_tones::hal::{EspDacPin, EspDacSink, EspToneTimer};
use dotmg_tones::uart_logger::{init_uart_logger, uart_logger_task, UartLoggerConfig};
use dotmg_tones::{rt_info, rt_warn, APP_LOG_STREAM};

type Tones = SharedTones<'static, EspToneTimer<'static>, EspDacSink, fn() -> bool>;

static TONES: Tones = SharedTones::new();

/// Global sound switch read by the mute gate
static SOUND_ENABLED: AtomicBool = AtomicBool::new(true);

fn sound_enabled() -> bool {
    SOUND_ENABLED.load(Ordering::Relaxed)
}

/// Console output on stdout
struct StdoutWriter;

impl core::fmt::Write for StdoutWriter {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        use std::io::Write;
        std::io::stdout()
            .write_all(s.as_bytes())
            .map_err(|_| core::fmt::Error)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    esp_idf_sys::link_patches();

    let peripherals = Peripherals::take()?;
    let nvs_partition = EspDefaultNvsPartition::take()?;

    let mut uart = init_uart_logger(
        peripherals.uart2,
        peripherals.pins.gpio17,
        &UartLoggerConfig::default(),
    )?;
    std::thread::Builder::new()
        .name("log-drain".into())
        .stack_size(4096)
        .spawn(move || uart_logger_task(&mut uart))?;

    let config = ToneConfig::ESP32;
    config.validate().map_err(|e| e.to_string())?;

    let mut timer = EspToneTimer::new(peripherals.timer00)?;
    // SAFETY: on_tick only takes a critical section and touches registers
    unsafe { timer.subscribe(|| TONES.on_tick())? };
    let dac = EspDacSink::new(EspDacPin::Gpio25)?;

    TONES.install(ToneScheduler::new(
        config,
        timer,
        dac,
        sound_enabled as fn() -> bool,
    ));

    match nvs::load_volume_mode(nvs_partition.clone()) {
        Ok(Some(mode)) => {
            TONES.with(|t| t.set_volume_mode(mode));
        }
        Ok(None) => {}
        Err(e) => rt_warn!(APP_LOG_STREAM, 0, "volume not restored: {}", e),
    }

    let mut tones = &TONES;
    tones.play_sequence(&melody::COIN);
    rt_info!(APP_LOG_STREAM, 0, "ready");

    let mut store = nvs::NvsVolumeStore::new(nvs_partition);
    let mut console = Console::new();
    let mut out = StdoutWriter;
    let mut stdin = std::io::stdin();
    let mut byte = [0u8; 1];

    console.print_banner(&mut out);

    loop {
        match stdin.read(&mut byte) {
            Ok(1) => {
                let mut session = Session {
                    tones: &mut tones,
                    store: &mut store,
                };
                console.process_byte(byte[0], &mut session, &mut out);
                use std::io::Write;
                let _ = std::io::stdout().flush();
            }
            _ => unsafe {
                esp_idf_sys::vTaskDelay(1);
            },
        }
    }
}
