use std::{
    collections::BTreeMap,
    fmt,
    io::Write,
    sync::{Arc, Mutex},
    time::{SystemTime, UNIX_EPOCH},
};

use chrono::{DateTime, Local};
use clap::ValueEnum;

/// Severity of a log message. Lower is more verbose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum)]
#[repr(u8)]
pub enum Severity {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
}

impl Severity {
    pub const ALL: [Severity; 6] = [
        Severity::Trace,
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::Fatal,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    pub fn from_u8(raw: u8) -> Option<Self> {
        Self::ALL.get(usize::from(raw)).copied()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<log::Level> for Severity {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Severity::Error,
            log::Level::Warn => Severity::Warn,
            log::Level::Info => Severity::Info,
            log::Level::Debug => Severity::Debug,
            log::Level::Trace => Severity::Trace,
        }
    }
}

/// Name for a raw severity value. Unknown values render as `??` and are
/// reported on stderr.
pub fn severity_name(raw: u8) -> &'static str {
    match Severity::from_u8(raw) {
        Some(severity) => severity.name(),
        None => {
            eprintln!("Unknown log level: {}", raw);
            "??"
        }
    }
}

/// How `%T` is rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum TimestampMode {
    None,
    EpochSeconds,
    EpochMillis,
    EpochMicros,
    #[default]
    DateTime,
}

impl TimestampMode {
    /// Renders the current wall-clock time. Never cached.
    pub fn render(&self) -> String {
        match self {
            TimestampMode::None => String::new(),
            TimestampMode::DateTime => Self::ctime(&Local::now()),
            mode => {
                let since_epoch = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .unwrap_or_default();

                match mode {
                    TimestampMode::EpochSeconds => since_epoch.as_secs().to_string(),
                    TimestampMode::EpochMillis => since_epoch.as_millis().to_string(),
                    // NOTE: older releases printed milliseconds for this mode. We emit real
                    // microseconds; anything parsing these stamps must expect the extra digits.
                    _ => since_epoch.as_micros().to_string(),
                }
            }
        }
    }

    /// `Www Mmm dd hh:mm:ss yyyy`, the asctime layout without its newline.
    pub fn ctime(time: &DateTime<Local>) -> String {
        time.format("%a %b %e %H:%M:%S %Y").to_string()
    }
}

/// Which sinks receive a rendered line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    None,
    Console,
    File,
    Both,
}

impl OutputMode {
    pub fn writes_file(&self) -> bool {
        matches!(self, OutputMode::File | OutputMode::Both)
    }

    pub fn writes_console(&self) -> bool {
        matches!(self, OutputMode::Console | OutputMode::Both)
    }
}

impl Default for OutputMode {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            OutputMode::Both
        } else {
            OutputMode::File
        }
    }
}

/// Console destination for a severity.
#[derive(Clone)]
pub enum ConsoleStream {
    Stdout,
    Stderr,
    Writer(Arc<Mutex<dyn Write + Send>>),
}

impl fmt::Debug for ConsoleStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleStream::Stdout => f.write_str("Stdout"),
            ConsoleStream::Stderr => f.write_str("Stderr"),
            ConsoleStream::Writer(_) => f.write_str("Writer(..)"),
        }
    }
}

pub type StreamMap = BTreeMap<Severity, ConsoleStream>;

/// TRACE, DEBUG and INFO go to stdout; WARN, ERROR and FATAL to stderr.
pub fn default_stream_map() -> StreamMap {
    Severity::ALL
        .into_iter()
        .map(|severity| {
            let stream = if severity < Severity::Warn {
                ConsoleStream::Stdout
            } else {
                ConsoleStream::Stderr
            };
            (severity, stream)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_names_are_uppercase() {
        let names: Vec<_> = Severity::ALL.iter().map(Severity::name).collect();
        assert_eq!(names, ["TRACE", "DEBUG", "INFO", "WARN", "ERROR", "FATAL"]);
        assert_eq!(Severity::Warn.to_string(), "WARN");
    }

    #[test]
    fn unknown_raw_severity_renders_placeholder() {
        assert_eq!(severity_name(6), "??");
        assert_eq!(severity_name(u8::MAX), "??");
        assert_eq!(severity_name(5), "FATAL");
    }

    #[test]
    fn severities_are_ordered() {
        assert!(Severity::Trace < Severity::Debug);
        assert!(Severity::Error < Severity::Fatal);
        assert_eq!(Severity::from_u8(2), Some(Severity::Info));
    }

    #[test]
    fn log_levels_map_onto_severities() {
        assert_eq!(Severity::from(log::Level::Error), Severity::Error);
        assert_eq!(Severity::from(log::Level::Trace), Severity::Trace);
    }

    #[test]
    fn no_timestamp_is_empty() {
        assert_eq!(TimestampMode::None.render(), "");
    }

    #[test]
    fn date_time_matches_local_clock() {
        let before = TimestampMode::ctime(&Local::now());
        let stamp = TimestampMode::DateTime.render();
        let after = TimestampMode::ctime(&Local::now());

        assert_eq!(stamp.len(), 24);
        assert!(!stamp.ends_with('\n'));
        assert!(stamp == before || stamp == after, "{stamp} not in [{before}, {after}]");
    }

    #[test]
    fn epoch_stamps_have_increasing_resolution() {
        let secs: u128 = TimestampMode::EpochSeconds.render().parse().unwrap();
        let millis: u128 = TimestampMode::EpochMillis.render().parse().unwrap();
        let micros: u128 = TimestampMode::EpochMicros.render().parse().unwrap();

        assert!(millis / 1000 >= secs && millis / 1000 - secs <= 1);
        assert!(micros / 1000 >= millis && micros / 1000 - millis <= 1000);
    }

    #[test]
    fn default_streams_split_on_warn() {
        let map = default_stream_map();
        assert_eq!(map.len(), 6);
        assert!(matches!(map[&Severity::Info], ConsoleStream::Stdout));
        assert!(matches!(map[&Severity::Warn], ConsoleStream::Stderr));
        assert!(matches!(map[&Severity::Fatal], ConsoleStream::Stderr));
    }

    #[test]
    fn output_mode_sink_selection() {
        assert!(OutputMode::Both.writes_file() && OutputMode::Both.writes_console());
        assert!(!OutputMode::Console.writes_file());
        assert!(!OutputMode::File.writes_console());
        assert!(!OutputMode::None.writes_file() && !OutputMode::None.writes_console());
    }
}
