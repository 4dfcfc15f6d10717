use std::{
    fs::File,
    io::{self, LineWriter, Write},
    path::{Path, PathBuf},
};

use eyre::Context;
use yansi::{Paint, Style};

use super::{
    attributes::{default_stream_map, ConsoleStream, Severity, StreamMap},
    LogSink,
};

pub struct FileSink {
    file: LineWriter<File>,
    file_path: PathBuf,
}

impl FileSink {
    /// Opens `path` for writing, truncating it unless `append` is set.
    pub fn new(path: impl AsRef<Path>, append: bool) -> eyre::Result<Self> {
        let path = path.as_ref();
        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)
            .with_context(|| format!("Couldn't open file {} for write.", path.display()))?;

        Ok(Self {
            file: LineWriter::new(file),
            file_path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl LogSink for FileSink {
    fn write_line(&mut self, _severity: Severity, line: &str) -> eyre::Result<()> {
        writeln!(self.file, "{}", line)?;
        self.flush()
    }

    fn flush(&mut self) -> eyre::Result<()> {
        self.file.flush().context("Can't flush file")
    }
}

/// Writes each line to the stream mapped to its severity.
pub struct ConsoleSink {
    streams: StreamMap,
    use_ansi: bool,
}

impl ConsoleSink {
    pub fn new(streams: StreamMap, use_ansi: bool) -> Self {
        Self { streams, use_ansi }
    }

    pub fn set_stream(&mut self, severity: Severity, stream: ConsoleStream) {
        self.streams.insert(severity, stream);
    }

    pub fn stream(&self, severity: Severity) -> Option<&ConsoleStream> {
        self.streams.get(&severity)
    }

    pub fn use_ansi(&self) -> bool {
        self.use_ansi
    }

    pub fn set_use_ansi(&mut self, use_ansi: bool) {
        self.use_ansi = use_ansi;
    }

    fn style(severity: Severity) -> Style {
        match severity {
            Severity::Trace => Style::new().dim(),
            Severity::Debug => Style::new().blue(),
            Severity::Info => Style::new().green(),
            Severity::Warn => Style::new().yellow(),
            Severity::Error => Style::new().red(),
            Severity::Fatal => Style::new().red().bold(),
        }
    }

    fn emit(writer: &mut dyn Write, line: &dyn std::fmt::Display) -> eyre::Result<()> {
        writeln!(writer, "{}", line)?;
        writer.flush().context("Can't flush console stream")
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new(default_stream_map(), false)
    }
}

impl LogSink for ConsoleSink {
    fn write_line(&mut self, severity: Severity, line: &str) -> eyre::Result<()> {
        let Some(stream) = self.streams.get(&severity) else {
            return Ok(());
        };

        let painted = line.paint(Self::style(severity));
        let line: &dyn std::fmt::Display = if self.use_ansi { &painted } else { &line };

        match stream {
            ConsoleStream::Stdout => Self::emit(&mut io::stdout().lock(), line),
            ConsoleStream::Stderr => Self::emit(&mut io::stderr().lock(), line),
            ConsoleStream::Writer(writer) => {
                let mut writer = writer.lock().map_err(|e| eyre::eyre!(e.to_string()))?;
                Self::emit(&mut *writer, line)
            }
        }
    }

    fn flush(&mut self) -> eyre::Result<()> {
        for stream in self.streams.values() {
            match stream {
                ConsoleStream::Stdout => io::stdout().flush()?,
                ConsoleStream::Stderr => io::stderr().flush()?,
                ConsoleStream::Writer(writer) => writer
                    .lock()
                    .map_err(|e| eyre::eyre!(e.to_string()))?
                    .flush()?,
            }
        }
        Ok(())
    }
}
