//! Global log stream instances.
//!
//! One stream per execution context, both drained by the same task.

use crate::logging::LogStream;

/// Tick-context log stream.
///
/// Receives records produced inside the timer interrupt (tone loads,
/// REPEAT, END).
pub static IRQ_LOG_STREAM: LogStream = LogStream::new();

/// Application-context log stream.
///
/// Receives records from play/stop/volume calls and the console.
pub static APP_LOG_STREAM: LogStream = LogStream::new();
