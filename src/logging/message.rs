use std::fmt;

use super::{attributes::Severity, logger::Logger};

/// Text of a single log statement, handed to its logger exactly once when
/// the value is dropped.
///
/// Dropping happens on every exit path of the enclosing scope, so a statement
/// is flushed even when the caller returns early or unwinds.
pub struct LogMessage<'a> {
    logger: &'a Logger,
    severity: Severity,
    file: &'a str,
    function: &'a str,
    line: u32,
    buffer: String,
}

impl<'a> LogMessage<'a> {
    pub fn new(
        logger: &'a Logger,
        severity: Severity,
        file: &'a str,
        function: &'a str,
        line: u32,
    ) -> Self {
        Self {
            logger,
            severity,
            file,
            function,
            line,
            buffer: String::new(),
        }
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn stream(&mut self) -> &mut String {
        &mut self.buffer
    }
}

impl fmt::Write for LogMessage<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buffer.push_str(s);
        Ok(())
    }
}

impl Drop for LogMessage<'_> {
    fn drop(&mut self) {
        self.logger.write(
            self.severity,
            self.file,
            self.function,
            self.line,
            &self.buffer,
        );
    }
}

#[cfg(test)]
mod tests {
    use std::{
        fmt::Write,
        panic::{self, AssertUnwindSafe},
        sync::{Arc, Mutex},
    };

    use super::*;
    use crate::logging::{
        attributes::{ConsoleStream, OutputMode, TimestampMode},
        logger::Builder,
    };

    fn logger(out: &Arc<Mutex<Vec<u8>>>) -> Logger {
        let mut builder = Builder::new()
            .with_min_severity(Severity::Trace)
            .with_timestamp_mode(TimestampMode::None)
            .with_output_mode(OutputMode::Console)
            .with_format("[%L] %P:%C %S");
        for severity in Severity::ALL {
            builder = builder.with_stream(severity, ConsoleStream::Writer(out.clone()));
        }
        builder.build().unwrap()
    }

    fn contents(out: &Arc<Mutex<Vec<u8>>>) -> String {
        String::from_utf8(out.lock().unwrap().clone()).unwrap()
    }

    #[test]
    fn flushes_once_on_drop() {
        let out = Arc::new(Mutex::new(Vec::new()));
        let logger = logger(&out);

        {
            let mut message = LogMessage::new(&logger, Severity::Debug, "m.rs", "scope", 7);
            write!(message, "a={}", 1).unwrap();
            message.stream().push_str(", b=2");
            assert_eq!(contents(&out), "");
        }

        assert_eq!(contents(&out), "[DEBUG] scope:7 a=1, b=2\n");
    }

    #[test]
    fn flushes_on_early_return() {
        fn parse(logger: &Logger, input: &str) -> Result<u32, std::num::ParseIntError> {
            let mut message = LogMessage::new(logger, Severity::Warn, "m.rs", "parse", 30);
            write!(message, "parsing {}", input).unwrap();
            let value = input.parse::<u32>()?;
            write!(message, " ok").unwrap();
            Ok(value)
        }

        let out = Arc::new(Mutex::new(Vec::new()));
        let logger = logger(&out);

        assert!(parse(&logger, "nope").is_err());
        assert_eq!(parse(&logger, "4"), Ok(4));

        assert_eq!(
            contents(&out),
            "[WARN] parse:30 parsing nope\n[WARN] parse:30 parsing 4 ok\n"
        );
    }

    #[test]
    fn flushes_while_unwinding() {
        let out = Arc::new(Mutex::new(Vec::new()));
        let logger = logger(&out);

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let mut message = LogMessage::new(&logger, Severity::Error, "m.rs", "boom", 0);
            write!(message, "before panic").unwrap();
            panic!("boom");
        }));

        assert!(result.is_err());
        assert_eq!(contents(&out), "[ERROR] boom:?? before panic\n");
    }

    #[test]
    fn filtered_message_is_dropped() {
        let out = Arc::new(Mutex::new(Vec::new()));
        let logger = logger(&out);
        logger.set_min_severity(Severity::Error);

        let mut message = LogMessage::new(&logger, Severity::Info, "m.rs", "quiet", 1);
        assert_eq!(message.severity(), Severity::Info);
        write!(message, "ignored").unwrap();
        drop(message);

        assert_eq!(contents(&out), "");
    }
}
