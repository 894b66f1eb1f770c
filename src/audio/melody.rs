//! Built-in sequences for the console and power-on chime
//!
//! Frequencies in Hz, durations in 1/1024 s.

use super::sequence::{TONES_END, TONES_REPEAT, TONE_HIGH_VOLUME};

/// C major scale, C4 to C5.
pub static SCALE: [u16; 17] = [
    262, 200, 294, 200, 330, 200, 349, 200, 392, 200, 440, 200, 494, 200, 523, 400, TONES_END,
];

/// Two-tone siren, loops until stopped.
pub static SIREN: [u16; 5] = [
    660 | TONE_HIGH_VOLUME, 300, 440 | TONE_HIGH_VOLUME, 300, TONES_REPEAT,
];

/// Short rising pickup sound.
pub static COIN: [u16; 5] = [988, 80, 1319, 400, TONES_END];

/// Falling "game over" phrase with a rest.
pub static FAIL: [u16; 9] = [392, 150, 0, 50, 330, 150, 262, 600, TONES_END];

/// Name → sequence table used by the `melody` command.
pub static MELODIES: &[(&str, &[u16])] = &[
    ("scale", &SCALE),
    ("siren", &SIREN),
    ("coin", &COIN),
    ("fail", &FAIL),
];

/// Look a melody up by name.
pub fn find(name: &str) -> Option<&'static [u16]> {
    MELODIES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, codes)| *codes)
}
