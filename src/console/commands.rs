//! Command handlers

use core::fmt::Write;

use super::parser::ParsedCommand;
use super::ConsoleError;
use crate::audio::{melody, ToneControl, VolumeMode, TONE_HIGH_VOLUME};
use crate::config::nvs::VolumeStore;
use crate::log_globals::{APP_LOG_STREAM, IRQ_LOG_STREAM};
use crate::logging::LogLevel;

/// What a command can act on.
pub struct Session<'s> {
    pub tones: &'s mut dyn ToneControl,
    pub store: &'s mut dyn VolumeStore,
}

/// Command handler signature
pub type Handler =
    fn(&ParsedCommand<'_>, &mut Session<'_>, &mut dyn Write) -> Result<(), ConsoleError>;

/// Command descriptor
pub struct CommandDescriptor {
    pub name: &'static str,
    pub brief: &'static str,
    pub usage: &'static str,
    pub handler: Handler,
}

/// All available commands
pub static COMMANDS: &[CommandDescriptor] = &[
    CommandDescriptor { name: "help", brief: "List commands", usage: "help [cmd]", handler: cmd_help },
    CommandDescriptor { name: "tone", brief: "Play one tone", usage: "tone <freq[h]> [dur]", handler: cmd_tone },
    CommandDescriptor { name: "melody", brief: "Play a stored melody", usage: "melody [name]", handler: cmd_melody },
    CommandDescriptor { name: "stop", brief: "Stop playback", usage: "stop", handler: cmd_stop },
    CommandDescriptor { name: "volume", brief: "Show or set volume mode", usage: "volume [tone|normal|high]", handler: cmd_volume },
    CommandDescriptor { name: "status", brief: "Playback and log status", usage: "status", handler: cmd_status },
    CommandDescriptor { name: "log", brief: "Show or set log level", usage: "log [irq|app] [level]", handler: cmd_log },
    CommandDescriptor { name: "save", brief: "Persist volume mode to NVS", usage: "save", handler: cmd_save },
];

/// Execute a parsed command
pub fn execute(
    cmd: &ParsedCommand<'_>,
    session: &mut Session<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    if cmd.command.is_empty() {
        return Ok(()); // Empty line, do nothing
    }

    let descriptor = COMMANDS
        .iter()
        .find(|c| c.name == cmd.command)
        .ok_or(ConsoleError::UnknownCommand)?;

    (descriptor.handler)(cmd, session, out)
}

/// All command names
pub fn command_names() -> impl Iterator<Item = &'static str> {
    COMMANDS.iter().map(|c| c.name)
}

/// Parse a frequency argument. A trailing `h` sets the high-volume bit.
pub fn parse_frequency(arg: &str) -> Result<u16, ConsoleError> {
    let (digits, high) = match arg.strip_suffix('h') {
        Some(digits) => (digits, true),
        None => (arg, false),
    };

    let freq: u16 = digits.parse().map_err(|_| ConsoleError::InvalidValue)?;
    if freq & TONE_HIGH_VOLUME != 0 {
        return Err(ConsoleError::OutOfRange);
    }

    Ok(if high { freq | TONE_HIGH_VOLUME } else { freq })
}

// --- Command Implementations ---

fn cmd_help(cmd: &ParsedCommand<'_>, _s: &mut Session<'_>, out: &mut dyn Write) -> Result<(), ConsoleError> {
    if let Some(name) = cmd.arg(0) {
        let c = COMMANDS
            .iter()
            .find(|c| c.name == name)
            .ok_or(ConsoleError::UnknownCommand)?;
        let _ = writeln!(out, "{}: {}", c.usage, c.brief);
    } else {
        for c in COMMANDS {
            let _ = writeln!(out, "  {:<8} {}", c.name, c.brief);
        }
    }
    Ok(())
}

fn cmd_tone(cmd: &ParsedCommand<'_>, s: &mut Session<'_>, out: &mut dyn Write) -> Result<(), ConsoleError> {
    let freq = parse_frequency(cmd.arg(0).ok_or(ConsoleError::MissingArg)?)?;
    let dur = match cmd.arg(1) {
        Some(v) => v.parse::<u16>().map_err(|_| ConsoleError::InvalidValue)?,
        None => 0,
    };

    s.tones.play_one(freq, dur);

    let hz = freq & !TONE_HIGH_VOLUME;
    if dur == 0 {
        let _ = writeln!(out, "tone {} Hz until stop", hz);
    } else {
        let _ = writeln!(out, "tone {} Hz for {}", hz, dur);
    }
    Ok(())
}

fn cmd_melody(cmd: &ParsedCommand<'_>, s: &mut Session<'_>, out: &mut dyn Write) -> Result<(), ConsoleError> {
    let Some(name) = cmd.arg(0) else {
        for (name, _) in melody::MELODIES {
            let _ = writeln!(out, "  {}", name);
        }
        return Ok(());
    };

    let codes = melody::find(name).ok_or(ConsoleError::UnknownMelody)?;
    s.tones.play_sequence(codes);
    let _ = writeln!(out, "melody {}", name);
    Ok(())
}

fn cmd_stop(_cmd: &ParsedCommand<'_>, s: &mut Session<'_>, out: &mut dyn Write) -> Result<(), ConsoleError> {
    s.tones.stop();
    let _ = writeln!(out, "stopped");
    Ok(())
}

fn cmd_volume(cmd: &ParsedCommand<'_>, s: &mut Session<'_>, out: &mut dyn Write) -> Result<(), ConsoleError> {
    if let Some(value) = cmd.arg(0) {
        let mode = VolumeMode::parse(value).ok_or(ConsoleError::InvalidValue)?;
        s.tones.set_volume_mode(mode);
    }
    let _ = writeln!(out, "volume={}", s.tones.volume_mode().as_str());
    Ok(())
}

fn cmd_status(_cmd: &ParsedCommand<'_>, s: &mut Session<'_>, out: &mut dyn Write) -> Result<(), ConsoleError> {
    let state = if s.tones.is_playing() { "playing" } else { "idle" };
    let _ = writeln!(out, "state: {}", state);
    let _ = writeln!(out, "volume: {}", s.tones.volume_mode().as_str());
    let _ = writeln!(
        out,
        "log: irq={} app={}",
        IRQ_LOG_STREAM.max_level().as_str(),
        APP_LOG_STREAM.max_level().as_str()
    );
    let _ = writeln!(
        out,
        "dropped: irq={} app={}",
        IRQ_LOG_STREAM.dropped(),
        APP_LOG_STREAM.dropped()
    );
    Ok(())
}

fn cmd_log(cmd: &ParsedCommand<'_>, _s: &mut Session<'_>, out: &mut dyn Write) -> Result<(), ConsoleError> {
    let (irq, app, level) = match (cmd.arg(0), cmd.arg(1)) {
        (None, _) => {
            let _ = writeln!(
                out,
                "irq={} app={}",
                IRQ_LOG_STREAM.max_level().as_str(),
                APP_LOG_STREAM.max_level().as_str()
            );
            return Ok(());
        }
        (Some("irq"), Some(level)) => (true, false, level),
        (Some("app"), Some(level)) => (false, true, level),
        (Some("irq" | "app"), None) => return Err(ConsoleError::MissingArg),
        (Some(level), _) => (true, true, level),
    };

    let level = LogLevel::parse(level).ok_or(ConsoleError::InvalidValue)?;
    if irq {
        IRQ_LOG_STREAM.set_max_level(level);
    }
    if app {
        APP_LOG_STREAM.set_max_level(level);
    }
    let _ = writeln!(out, "log={}", level.as_str());
    Ok(())
}

fn cmd_save(_cmd: &ParsedCommand<'_>, s: &mut Session<'_>, out: &mut dyn Write) -> Result<(), ConsoleError> {
    let mode = s.tones.volume_mode();
    s.store.save_volume(mode).map_err(|_| ConsoleError::NvsError)?;
    let _ = writeln!(out, "saved volume={}", mode.as_str());
    Ok(())
}
