use clap::{Args, CommandFactory};
use supernova_log::{Config, Logger, Severity};

use crate::commands::Snlog;

#[derive(Args, Debug)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cmd {}

impl Cmd {
    pub fn run(&self, config: Config) -> eyre::Result<()> {
        let logger = Logger::new(config.clone());

        println!(
            "Version:        {}",
            Snlog::command().get_version().unwrap_or("")
        );
        println!("Min severity:   {}", logger.min_severity());
        println!("Timestamp:      {:?}", logger.timestamp_mode());
        println!("Output:         {:?}", logger.output_mode());
        println!("Format:         {}", logger.format());
        println!("Log file:       {}", logger.file_path().display());
        println!("Color:          {}", logger.use_ansi());
        for severity in Severity::ALL {
            let stream = config
                .streams
                .get(&severity)
                .map(|stream| format!("{:?}", stream))
                .unwrap_or_else(|| "-".to_string());
            println!("  {:<14}{}", severity.name(), stream);
        }
        Ok(())
    }
}
