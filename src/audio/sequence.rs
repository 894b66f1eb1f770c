//! Tone sequence storage and cursor
//!
//! A sequence is a flat list of `u16` codes:
//!
//! ```text
//! [freq0, dur0, freq1, dur1, ..., TONES_END | TONES_REPEAT]
//! ```
//!
//! Bit 15 of a frequency code is the high-volume flag, the low 15 bits are
//! the frequency in Hz (0 = rest). Durations are in 1/1024 s, 0 = forever.

use core::sync::atomic::{AtomicU16, Ordering};

/// Frequency slot marker: stop after the previous tone.
pub const TONES_END: u16 = 0x8000;

/// Frequency slot marker: continue from the first tone.
pub const TONES_REPEAT: u16 = 0x8001;

/// High-volume flag, OR it into a frequency code.
pub const TONE_HIGH_VOLUME: u16 = 0x8000;

/// Most tones the `play_one/two/three` calls store.
pub const MAX_TONES: usize = 3;

/// Length of the internal buffer: `MAX_TONES` pairs plus the END slot.
pub const INTERNAL_LEN: usize = MAX_TONES * 2 + 1;

/// Where the codes of the active sequence live.
#[derive(Debug, Clone, Copy)]
pub enum SequenceStorage<'a> {
    /// The scheduler's own buffer filled by `play_one/two/three`
    Internal,
    /// Read-only table, usually in flash
    Flash(&'static [u16]),
    /// Caller RAM that may be edited while it plays
    Ram(&'a [AtomicU16]),
}

/// Read position inside a [`SequenceStorage`].
///
/// The start of a sequence is always index 0 of its storage.
#[derive(Debug, Clone, Copy)]
pub struct SequenceCursor<'a> {
    storage: SequenceStorage<'a>,
    index: usize,
}

impl<'a> SequenceCursor<'a> {
    /// Cursor over the internal buffer, at its start.
    pub const fn new() -> Self {
        Self::open(SequenceStorage::Internal)
    }

    /// Start reading `storage` from its first code.
    pub const fn open(storage: SequenceStorage<'a>) -> Self {
        Self { storage, index: 0 }
    }

    /// Back to the first code (REPEAT).
    #[inline]
    pub fn rewind(&mut self) {
        self.index = 0;
    }

    /// Storage being read.
    #[inline]
    pub fn storage(&self) -> SequenceStorage<'a> {
        self.storage
    }

    /// Index of the next code to be read.
    #[inline]
    pub fn position(&self) -> usize {
        self.index
    }

    /// Return the code at the cursor and step past it.
    ///
    /// `internal` is the scheduler's buffer, used for
    /// [`SequenceStorage::Internal`]. Sequences must be terminated; a cursor
    /// that runs off the end of its storage reads `TONES_END`.
    #[inline]
    pub fn next(&mut self, internal: &[u16]) -> u16 {
        let i = self.index;
        self.index += 1;
        match self.storage {
            SequenceStorage::Internal => internal.get(i).copied(),
            SequenceStorage::Flash(codes) => codes.get(i).copied(),
            SequenceStorage::Ram(codes) => codes.get(i).map(|c| c.load(Ordering::Relaxed)),
        }
        .unwrap_or(TONES_END)
    }
}

impl Default for SequenceCursor<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a RAM sequence at compile time, e.g. for a `static`.
///
/// ```ignore
/// static JINGLE: [AtomicU16; 5] = ram_sequence([440, 100, 880, 100, TONES_END]);
/// ```
pub const fn ram_sequence<const N: usize>(codes: [u16; N]) -> [AtomicU16; N] {
    const ZERO: AtomicU16 = AtomicU16::new(0);
    let mut out = [ZERO; N];
    let mut i = 0;
    while i < N {
        out[i] = AtomicU16::new(codes[i]);
        i += 1;
    }
    out
}
