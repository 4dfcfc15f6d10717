use std::fmt::Write;

use clap::Args;
use eyre::Context;
use supernova_log::{Config, LogMessage, Logger, Severity};

#[derive(Args, Debug)]
pub struct Cmd {
    #[arg(value_enum)]
    pub severity: Severity,

    #[arg(required = true, num_args = 1.., help = "Message words, joined with spaces.")]
    pub message: Vec<String>,

    #[arg(long, default_value = "snlog", help = "Value for %F.")]
    pub source_file: String,

    #[arg(long, default_value = "main", help = "Value for %P.")]
    pub function: String,

    #[arg(long, default_value_t = 0, help = "Value for %C. Zero renders as ??.")]
    pub line: u32,
}

impl Cmd {
    pub fn run(&self, config: Config, append: bool) -> eyre::Result<()> {
        let logger = Logger::new(config.clone()).install()?;
        if config.output_mode.writes_file() {
            logger.init(&config.file_path, append);
        }

        let mut message = LogMessage::new(
            logger,
            self.severity,
            &self.source_file,
            &self.function,
            self.line,
        );
        write!(message, "{}", self.message.join(" ")).context("Failed formatting message")?;

        Ok(())
    }
}
