//! Command handler tests

use dotmg_tones::audio::{melody, ToneControl, VolumeMode, TONE_HIGH_VOLUME};
use dotmg_tones::config::nvs::{NvsError, VolumeStore};
use dotmg_tones::console::commands::{execute, parse_frequency, Session, COMMANDS};
use dotmg_tones::console::parser::parse_line;
use dotmg_tones::console::ConsoleError;
use dotmg_tones::{LogLevel, APP_LOG_STREAM, IRQ_LOG_STREAM};

#[test]
fn test_command_registry_has_all_commands() {
    let expected = ["help", "tone", "melody", "stop", "volume", "status", "log", "save"];

    for name in expected {
        assert!(
            COMMANDS.iter().any(|c| c.name == name),
            "Command '{}' should be in registry",
            name
        );
    }
}

#[test]
fn test_execute_unknown_command() {
    let mut rig = Rig::new();
    assert_eq!(rig.run("foobar"), Err(ConsoleError::UnknownCommand));
}

#[test]
fn test_execute_empty_line_is_noop() {
    let mut rig = Rig::new();
    assert_eq!(rig.run("   "), Ok(()));
    assert!(rig.tones.calls.is_empty());
}

#[test]
fn test_execute_help() {
    let mut rig = Rig::new();
    assert!(rig.run("help").is_ok());
    for c in COMMANDS {
        assert!(rig.out.contains(c.name));
    }

    let mut rig = Rig::new();
    assert!(rig.run("help tone").is_ok());
    assert!(rig.out.contains("tone <freq[h]> [dur]"));
    assert_eq!(rig.run("help nope"), Err(ConsoleError::UnknownCommand));
}

#[test]
fn test_tone_plays_one() {
    let mut rig = Rig::new();
    assert!(rig.run("tone 440 500").is_ok());
    assert_eq!(rig.tones.calls, vec![Call::One(440, 500)]);
    assert!(rig.out.contains("440 Hz"));
}

#[test]
fn test_tone_without_duration_plays_forever() {
    let mut rig = Rig::new();
    assert!(rig.run("tone 1000").is_ok());
    assert_eq!(rig.tones.calls, vec![Call::One(1000, 0)]);
    assert!(rig.out.contains("until stop"));
}

#[test]
fn test_tone_high_suffix() {
    let mut rig = Rig::new();
    assert!(rig.run("tone 440h 100").is_ok());
    assert_eq!(rig.tones.calls, vec![Call::One(440 | TONE_HIGH_VOLUME, 100)]);
}

#[test]
fn test_tone_argument_errors() {
    let mut rig = Rig::new();
    assert_eq!(rig.run("tone"), Err(ConsoleError::MissingArg));
    assert_eq!(rig.run("tone abc"), Err(ConsoleError::InvalidValue));
    assert_eq!(rig.run("tone 40000"), Err(ConsoleError::OutOfRange));
    assert_eq!(rig.run("tone 440 -5"), Err(ConsoleError::InvalidValue));
    assert!(rig.tones.calls.is_empty());
}

#[test]
fn test_parse_frequency() {
    assert_eq!(parse_frequency("0"), Ok(0));
    assert_eq!(parse_frequency("32767"), Ok(0x7FFF));
    assert_eq!(parse_frequency("32768"), Err(ConsoleError::OutOfRange));
    assert_eq!(parse_frequency("1h"), Ok(1 | TONE_HIGH_VOLUME));
    assert_eq!(parse_frequency("h"), Err(ConsoleError::InvalidValue));
}

#[test]
fn test_melody_plays_named_sequence() {
    let mut rig = Rig::new();
    assert!(rig.run("melody coin").is_ok());
    assert_eq!(rig.tones.calls, vec![Call::Sequence(melody::COIN.as_ptr())]);

    assert_eq!(rig.run("melody nope"), Err(ConsoleError::UnknownMelody));
}

#[test]
fn test_melody_without_name_lists() {
    let mut rig = Rig::new();
    assert!(rig.run("melody").is_ok());
    assert!(rig.out.contains("siren"));
    assert!(rig.tones.calls.is_empty());
}

#[test]
fn test_stop() {
    let mut rig = Rig::new();
    assert!(rig.run("stop").is_ok());
    assert_eq!(rig.tones.calls, vec![Call::Stop]);
}

#[test]
fn test_volume_show_and_set() {
    let mut rig = Rig::new();
    assert!(rig.run("volume").is_ok());
    assert!(rig.out.contains("volume=tone"));

    assert!(rig.run("volume high").is_ok());
    assert_eq!(rig.tones.mode, VolumeMode::AlwaysHigh);
    assert!(rig.out.contains("volume=high"));

    assert_eq!(rig.run("volume loud"), Err(ConsoleError::InvalidValue));
    assert_eq!(rig.tones.mode, VolumeMode::AlwaysHigh);
}

#[test]
fn test_status_reports_state() {
    let mut rig = Rig::new();
    rig.tones.playing = true;
    assert!(rig.run("status").is_ok());
    assert!(rig.out.contains("state: playing"));
    assert!(rig.out.contains("volume: tone"));
    assert!(rig.out.contains("dropped:"));
}

#[test]
fn test_log_levels() {
    let mut rig = Rig::new();

    assert!(rig.run("log irq trace").is_ok());
    assert_eq!(IRQ_LOG_STREAM.max_level(), LogLevel::Trace);

    assert!(rig.run("log warn").is_ok());
    assert_eq!(IRQ_LOG_STREAM.max_level(), LogLevel::Warn);
    assert_eq!(APP_LOG_STREAM.max_level(), LogLevel::Warn);

    assert_eq!(rig.run("log app"), Err(ConsoleError::MissingArg));
    assert_eq!(rig.run("log loud"), Err(ConsoleError::InvalidValue));

    assert!(rig.run("log info").is_ok());
    assert_eq!(APP_LOG_STREAM.max_level(), LogLevel::Info);
}

#[test]
fn test_save_persists_current_mode() {
    let mut rig = Rig::new();
    rig.tones.mode = VolumeMode::AlwaysNormal;
    assert!(rig.run("save").is_ok());
    assert_eq!(rig.store.saved, Some(VolumeMode::AlwaysNormal));
}

#[test]
fn test_save_reports_nvs_failure() {
    let mut rig = Rig::new();
    rig.store.fail = true;
    assert_eq!(rig.run("save"), Err(ConsoleError::NvsError));
}

// --- Test doubles ---

#[derive(Debug, PartialEq)]
enum Call {
    One(u16, u16),
    Sequence(*const u16),
    Stop,
}

#[derive(Default)]
struct FakeTones {
    calls: Vec<Call>,
    mode: VolumeMode,
    playing: bool,
}

impl ToneControl for FakeTones {
    fn play_one(&mut self, freq: u16, dur: u16) {
        self.calls.push(Call::One(freq, dur));
    }

    fn play_sequence(&mut self, codes: &'static [u16]) {
        self.calls.push(Call::Sequence(codes.as_ptr()));
    }

    fn stop(&mut self) {
        self.calls.push(Call::Stop);
    }

    fn set_volume_mode(&mut self, mode: VolumeMode) {
        self.mode = mode;
    }

    fn volume_mode(&self) -> VolumeMode {
        self.mode
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}

#[derive(Default)]
struct FakeStore {
    saved: Option<VolumeMode>,
    fail: bool,
}

impl VolumeStore for FakeStore {
    fn save_volume(&mut self, mode: VolumeMode) -> Result<(), NvsError> {
        if self.fail {
            return Err(NvsError::InvalidValue(0xFF));
        }
        self.saved = Some(mode);
        Ok(())
    }
}

struct Rig {
    tones: FakeTones,
    store: FakeStore,
    out: TestOutput,
}

impl Rig {
    fn new() -> Self {
        Self {
            tones: FakeTones::default(),
            store: FakeStore::default(),
            out: TestOutput::default(),
        }
    }

    fn run(&mut self, line: &str) -> Result<(), ConsoleError> {
        let cmd = parse_line(line);
        let mut session = Session {
            tones: &mut self.tones,
            store: &mut self.store,
        };
        execute(&cmd, &mut session, &mut self.out)
    }
}

// Test output buffer
#[derive(Default)]
struct TestOutput {
    text: String,
}

impl TestOutput {
    fn contains(&self, s: &str) -> bool {
        self.text.contains(s)
    }
}

impl core::fmt::Write for TestOutput {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.text.push_str(s);
        Ok(())
    }
}
