use std::path::PathBuf;

use clap::{Parser, Subcommand};
use supernova_log::{Config, OutputMode, Severity, TimestampMode};

mod emit;
mod info;

#[derive(Subcommand, Debug)]
pub enum SnlogCmd {
    Emit(emit::Cmd),

    Info(info::Cmd),
}

#[derive(Parser)]
#[command(version, long_version = "")]
#[command(about = "Write messages through the supernova logger.", long_about = None, disable_help_subcommand = true)]
pub struct Snlog {
    #[arg(
        global = true,
        long,
        value_enum,
        help = "Minimum severity to emit. Defaults to trace in debug builds and info otherwise.",
        display_order = 0
    )]
    pub level: Option<Severity>,

    #[arg(global = true, long, value_enum, help = "How %T is rendered.", display_order = 0)]
    pub timestamp: Option<TimestampMode>,

    #[arg(global = true, long, value_enum, help = "Which sinks receive messages.", display_order = 0)]
    pub output: Option<OutputMode>,

    #[arg(global = true, long, help = "Log file path.", display_order = 1)]
    pub file: Option<PathBuf>,

    #[arg(global = true, long, help = "Append to the log file instead of truncating it.", display_order = 1)]
    pub append: bool,

    #[arg(global = true, long, help = "Format template, e.g. \"[%T] [%F:%C %P] [%L] :: %S\".", display_order = 2)]
    pub format: Option<String>,

    #[arg(global = true, long, help = "Color console output by severity.", display_order = 2)]
    pub color: bool,

    #[command(subcommand)]
    pub cmd: SnlogCmd,
}

impl Snlog {
    fn config(&self) -> Config {
        let mut config = Config::new();

        if let Some(level) = self.level {
            config.min_severity = level;
        }
        if let Some(timestamp) = self.timestamp {
            config.timestamp_mode = timestamp;
        }
        if let Some(output) = self.output {
            config.output_mode = output;
        }
        if let Some(format) = &self.format {
            config.format = format.clone();
        }
        if let Some(file) = &self.file {
            config.file_path = file.clone();
        }
        config.use_ansi = self.color;

        config
    }

    pub fn run(self) -> eyre::Result<()> {
        let config = self.config();

        match &self.cmd {
            SnlogCmd::Emit(emit) => emit.run(config, self.append),
            SnlogCmd::Info(info) => info.run(config),
        }
    }
}
