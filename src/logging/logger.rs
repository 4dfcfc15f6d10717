use std::{
    path::{Path, PathBuf},
    process,
    sync::{Mutex, MutexGuard, OnceLock, PoisonError},
};

use eyre::Context;
use log::{LevelFilter, Log};

use super::{
    attributes::{
        default_stream_map, ConsoleStream, OutputMode, Severity, StreamMap, TimestampMode,
    },
    formatters::{TemplateFormatter, DEFAULT_FORMAT},
    sinks::{ConsoleSink, FileSink},
    LogSink, Record,
};

pub const DEFAULT_FILE_NAME: &str = "supernova_log.txt";

static GLOBAL: OnceLock<Logger> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct Config {
    pub min_severity: Severity,
    pub timestamp_mode: TimestampMode,
    pub output_mode: OutputMode,
    pub format: String,
    pub file_path: PathBuf,
    pub streams: StreamMap,
    pub use_ansi: bool,
}

impl Config {
    pub fn new() -> Self {
        let min_severity = if cfg!(debug_assertions) {
            Severity::Trace
        } else {
            Severity::Info
        };

        Self {
            min_severity,
            timestamp_mode: TimestampMode::default(),
            output_mode: OutputMode::default(),
            format: DEFAULT_FORMAT.to_string(),
            file_path: PathBuf::from(DEFAULT_FILE_NAME),
            streams: default_stream_map(),
            use_ansi: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

struct State {
    min_severity: Severity,
    active_severity: Severity,
    output_mode: OutputMode,
    file_path: PathBuf,
    formatter: TemplateFormatter,
    file: Option<FileSink>,
    console: ConsoleSink,
    scratch: String,
}

impl State {
    fn flush_out(&mut self) {
        if self.scratch.is_empty() {
            return;
        }

        if self.output_mode.writes_file() {
            if let Some(file) = self.file.as_mut() {
                if let Err(err) = file.write_line(self.active_severity, &self.scratch) {
                    eprintln!("[ERROR] : {:#}", err);
                }
            }
        }

        if self.output_mode.writes_console() {
            if let Err(err) = self.console.write_line(self.active_severity, &self.scratch) {
                eprintln!("[ERROR] : {:#}", err);
            }
        }
    }
}

/// Severity-filtered dispatcher of rendered log lines.
///
/// All state sits behind one mutex, so a `write` renders and emits its line
/// without interleaving with other threads. Configuration changes made while
/// another thread is writing apply from the next `write` on.
pub struct Logger {
    state: Mutex<State>,
}

impl Logger {
    pub fn new(config: Config) -> Self {
        let state = State {
            min_severity: config.min_severity,
            active_severity: Severity::Info,
            output_mode: config.output_mode,
            file_path: config.file_path,
            formatter: TemplateFormatter::new(config.format, config.timestamp_mode),
            file: None,
            console: ConsoleSink::new(config.streams, config.use_ansi),
            scratch: String::new(),
        };

        Self {
            state: Mutex::new(state),
        }
    }

    /// The process-wide logger, created with the default config on first use
    /// unless one was installed earlier.
    pub fn global() -> &'static Logger {
        GLOBAL.get_or_init(|| Logger::new(Config::default()))
    }

    /// Makes this logger the process-wide one.
    pub fn install(self) -> eyre::Result<&'static Logger> {
        let mut installed = false;
        let logger = GLOBAL.get_or_init(|| {
            installed = true;
            self
        });

        if !installed {
            eyre::bail!("A global logger is already installed");
        }
        Ok(logger)
    }

    /// Routes records from the `log` crate macros through this logger.
    pub fn init_log_facade(&'static self) -> eyre::Result<()> {
        log::set_logger(self).context("Failed registering logger with the log facade")?;
        log::set_max_level(LevelFilter::Trace);
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens the log file. Failures are printed to the console and leave file
    /// output disabled.
    pub fn init(&self, path: impl AsRef<Path>, append: bool) {
        let output_mode = self.output_mode();
        if !output_mode.writes_file() {
            println!(
                "[INFO] : Cannot log into the file. Output mode {:?} has no file output",
                output_mode
            );
            return;
        }

        if let Err(err) = self.try_init(path, append) {
            eprintln!("[ERROR] : {:#}", err);
        }
    }

    pub fn try_init(&self, path: impl AsRef<Path>, append: bool) -> eyre::Result<()> {
        let path = path.as_ref();
        let mut state = self.lock();

        if !state.output_mode.writes_file() {
            eyre::bail!(
                "Cannot log into the file. Output mode {:?} has no file output",
                state.output_mode
            );
        }
        if path.as_os_str().is_empty() {
            eyre::bail!("No log file specified.");
        }

        state.file = None;
        state.file_path = path.to_path_buf();
        state.file = Some(FileSink::new(path, append)?);

        Ok(())
    }

    pub fn write(&self, severity: Severity, file: &str, function: &str, line: u32, message: &str) {
        let mut state = self.lock();
        if severity < state.min_severity {
            return;
        }
        state.active_severity = severity;

        let record = Record {
            severity,
            file,
            function,
            line,
            body: message,
        };
        let State {
            formatter, scratch, ..
        } = &mut *state;
        scratch.clear();
        formatter.format_into(scratch, &record);

        state.flush_out();

        let fatal =
            state.output_mode != OutputMode::None && state.active_severity == Severity::Fatal;
        drop(state);

        if fatal {
            if cfg!(debug_assertions) {
                eprintln!("[ERROR] : A fatal log has been encountered.");
            }
            process::abort();
        }
    }

    pub fn configure(
        &self,
        min_severity: Severity,
        timestamp_mode: TimestampMode,
        output_mode: OutputMode,
        format: impl Into<String>,
        file_path: impl Into<PathBuf>,
    ) {
        let mut state = self.lock();
        state.min_severity = min_severity;
        state.formatter.set_timestamp_mode(timestamp_mode);
        state.output_mode = output_mode;
        state.formatter.set_template(format);
        state.file_path = file_path.into();
    }

    pub fn min_severity(&self) -> Severity {
        self.lock().min_severity
    }

    pub fn set_min_severity(&self, severity: Severity) {
        self.lock().min_severity = severity;
    }

    pub fn is_enabled(&self, severity: Severity) -> bool {
        self.lock().min_severity <= severity
    }

    /// Severity of the most recent accepted message.
    pub fn active_severity(&self) -> Severity {
        self.lock().active_severity
    }

    pub fn timestamp_mode(&self) -> TimestampMode {
        self.lock().formatter.timestamp_mode()
    }

    pub fn set_timestamp_mode(&self, mode: TimestampMode) {
        self.lock().formatter.set_timestamp_mode(mode);
    }

    pub fn output_mode(&self) -> OutputMode {
        self.lock().output_mode
    }

    pub fn set_output_mode(&self, mode: OutputMode) {
        self.lock().output_mode = mode;
    }

    pub fn enable_console_logging(&self) {
        self.set_output_mode(OutputMode::Console);
    }

    pub fn enable_file_logging(&self) {
        self.set_output_mode(OutputMode::File);
    }

    pub fn file_path(&self) -> PathBuf {
        self.lock().file_path.clone()
    }

    /// Only records the path; `init` opens it.
    pub fn set_file_path(&self, path: impl Into<PathBuf>) {
        self.lock().file_path = path.into();
    }

    pub fn is_file_open(&self) -> bool {
        self.lock().file.is_some()
    }

    pub fn format(&self) -> String {
        self.lock().formatter.template().to_string()
    }

    pub fn set_format(&self, format: impl Into<String>) {
        self.lock().formatter.set_template(format);
    }

    pub fn set_stream(&self, severity: Severity, stream: ConsoleStream) {
        self.lock().console.set_stream(severity, stream);
    }

    pub fn use_ansi(&self) -> bool {
        self.lock().console.use_ansi()
    }

    pub fn set_use_ansi(&self, use_ansi: bool) {
        self.lock().console.set_use_ansi(use_ansi);
    }

    /// Runs `f` on the render buffer, which holds the line of the last
    /// accepted `write`.
    pub fn with_scratch<R>(&self, f: impl FnOnce(&mut String) -> R) -> R {
        f(&mut self.lock().scratch)
    }

    pub fn flush(&self) {
        let mut state = self.lock();
        let State { file, console, .. } = &mut *state;

        let file_result = file.as_mut().map_or(Ok(()), |file| file.flush());
        for result in [file_result, console.flush()] {
            if let Err(err) = result {
                eprintln!("[ERROR] : {:#}", err);
            }
        }
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.is_enabled(metadata.level().into())
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let body = record.args().to_string();
        self.write(
            record.level().into(),
            record.file().unwrap_or(""),
            record.module_path().unwrap_or(record.target()),
            record.line().unwrap_or(0),
            &body,
        );
    }

    fn flush(&self) {
        Logger::flush(self)
    }
}

pub struct Builder {
    config: Config,
    file: Option<(PathBuf, bool)>,
}

impl Builder {
    pub fn new() -> Self {
        Self {
            config: Config::new(),
            file: None,
        }
    }

    pub fn with_min_severity(mut self, severity: Severity) -> Self {
        self.config.min_severity = severity;
        self
    }

    pub fn with_timestamp_mode(mut self, mode: TimestampMode) -> Self {
        self.config.timestamp_mode = mode;
        self
    }

    pub fn with_output_mode(mut self, mode: OutputMode) -> Self {
        self.config.output_mode = mode;
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.config.format = format.into();
        self
    }

    pub fn with_stream(mut self, severity: Severity, stream: ConsoleStream) -> Self {
        self.config.streams.insert(severity, stream);
        self
    }

    pub fn with_ansi(mut self, use_ansi: bool) -> Self {
        self.config.use_ansi = use_ansi;
        self
    }

    /// Opens `path` when the logger is built.
    pub fn with_file_sink(mut self, path: impl Into<PathBuf>, append: bool) -> Self {
        let path = path.into();
        self.config.file_path = path.clone();
        self.file = Some((path, append));
        self
    }

    pub fn build(self) -> eyre::Result<Logger> {
        let logger = Logger::new(self.config);
        if let Some((path, append)) = self.file {
            logger
                .try_init(&path, append)
                .context("Failed constructing file sink")?;
        }
        Ok(logger)
    }

    pub fn install(self) -> eyre::Result<&'static Logger> {
        self.build()?.install()
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}
