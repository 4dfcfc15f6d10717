//! Severity-filtered, template-formatted logging to a file and/or the console.
//!
//! ```no_run
//! use supernova_log::{sn_info, Builder, OutputMode, Severity};
//!
//! Builder::new()
//!     .with_min_severity(Severity::Debug)
//!     .with_output_mode(OutputMode::Both)
//!     .with_file_sink("app.log", true)
//!     .install()?;
//!
//! sn_info!("listening on port {}", 8080);
//! # Ok::<(), eyre::Report>(())
//! ```

pub mod logging;

pub use logging::{
    attributes::{
        default_stream_map, severity_name, ConsoleStream, OutputMode, Severity, StreamMap,
        TimestampMode,
    },
    formatters::{TemplateFormatter, DEFAULT_FORMAT},
    logger::{Builder, Config, Logger, DEFAULT_FILE_NAME},
    message::LogMessage,
    sinks::{ConsoleSink, FileSink},
    LogSink, Record,
};
