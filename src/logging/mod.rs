pub mod attributes;
pub mod formatters;
pub mod logger;
pub mod macros;
pub mod message;
pub mod sinks;

use attributes::Severity;

/// Everything a single log statement contributes to the rendered line.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    pub severity: Severity,
    pub file: &'a str,
    pub function: &'a str,
    pub line: u32,
    pub body: &'a str,
}

pub trait LogSink: Send {
    fn write_line(&mut self, severity: Severity, line: &str) -> eyre::Result<()>;
    fn flush(&mut self) -> eyre::Result<()>;
}
