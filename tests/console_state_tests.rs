//! Byte-level console state machine tests, against a real scheduler

mod common;

use common::{rig, Recorder, TestScheduler};
use dotmg_tones::config::nvs::NvsVolumeStore;
use dotmg_tones::console::{Console, ConsoleError, Session};

struct Term {
    console: Console,
    out: String,
}

impl Term {
    fn new() -> Self {
        Self {
            console: Console::new(),
            out: String::new(),
        }
    }

    /// Feed bytes, returning the result of the last completed command.
    fn feed(
        &mut self,
        scheduler: &mut TestScheduler<'_>,
        bytes: &[u8],
    ) -> Option<Result<(), ConsoleError>> {
        let mut store = NvsVolumeStore::default();
        let mut last = None;
        for &b in bytes {
            let mut session = Session {
                tones: &mut *scheduler,
                store: &mut store,
            };
            if let Some(result) = self.console.process_byte(b, &mut session, &mut self.out) {
                last = Some(result);
            }
        }
        last
    }
}

fn setup() -> (Term, TestScheduler<'static>, Recorder) {
    let (scheduler, rec) = rig();
    (Term::new(), scheduler, rec)
}

#[test]
fn test_enter_runs_command() {
    let (mut term, mut scheduler, rec) = setup();

    let result = term.feed(&mut scheduler, b"tone 440 1024\r");
    assert_eq!(result, Some(Ok(())));
    assert!(scheduler.is_playing());
    assert_eq!(rec.last_period(), Some(3408));
    assert!(term.out.contains("tone 440 1024"));
    assert!(term.out.ends_with("tones> "));
}

#[test]
fn test_empty_enter_just_prompts() {
    let (mut term, mut scheduler, _rec) = setup();

    assert_eq!(term.feed(&mut scheduler, b"\r\r"), None);
    assert_eq!(term.out.matches("tones> ").count(), 2);
}

#[test]
fn test_backspace_edits_line() {
    let (mut term, mut scheduler, _rec) = setup();

    term.feed(&mut scheduler, b"stopx\x7f");
    assert_eq!(term.console.line(), "stop");
    assert!(term.out.ends_with("\x08 \x08"));
}

#[test]
fn test_ctrl_c_discards_line() {
    let (mut term, mut scheduler, _rec) = setup();

    assert_eq!(term.feed(&mut scheduler, b"tone 440\x03\r"), None);
    assert!(!scheduler.is_playing());
    assert!(term.out.contains("^C"));
}

#[test]
fn test_ctrl_u_clears_line() {
    let (mut term, mut scheduler, _rec) = setup();

    term.feed(&mut scheduler, b"melody coin\x15");
    assert_eq!(term.console.line(), "");
}

#[test]
fn test_escape_sequences_are_swallowed() {
    let (mut term, mut scheduler, _rec) = setup();

    // Up arrow, then a longer CSI sequence
    term.feed(&mut scheduler, b"\x1b[Ast\x1b[1;5Cop");
    assert_eq!(term.console.line(), "stop");
}

#[test]
fn test_errors_are_printed_with_code() {
    let (mut term, mut scheduler, _rec) = setup();

    let result = term.feed(&mut scheduler, b"bogus\r");
    assert_eq!(result, Some(Err(ConsoleError::UnknownCommand)));
    assert!(term.out.contains("E01: unknown command"));
}

#[test]
fn test_save_without_flash_reports_e06() {
    let (mut term, mut scheduler, _rec) = setup();

    let result = term.feed(&mut scheduler, b"save\r");
    assert_eq!(result, Some(Err(ConsoleError::NvsError)));
    assert!(term.out.contains("E06"));
}

#[test]
fn test_stop_from_console() {
    let (mut term, mut scheduler, rec) = setup();

    term.feed(&mut scheduler, b"tone 440\rstop\r");
    assert!(!scheduler.is_playing());
    assert!(!rec.timer_running());
}
