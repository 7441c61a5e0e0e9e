//! CLI command implementations
//!
//! This module contains implementations of the commands supported by the
//! CLI application using the Command pattern.

pub mod command_traits;
pub mod analyze_command;
pub mod extract_command;
pub mod lines_command;

pub use command_traits::{Command, CommandFactory};
pub use analyze_command::AnalyzeCommand;
pub use extract_command::ExtractCommand;
pub use lines_command::LinesCommand;

use clap::ArgMatches;
use crate::config::DecodeConfig;
use crate::utils::logger::Logger;
use crate::format::errors::FormatResult;

/// Factory for creating command instances based on CLI arguments
pub struct SciplaneCommandFactory {
    config: DecodeConfig,
}

impl SciplaneCommandFactory {
    /// Create a new factory instance
    pub fn new(config: DecodeConfig) -> Self {
        SciplaneCommandFactory { config }
    }
}

impl<'a> CommandFactory<'a> for SciplaneCommandFactory {
    fn create_command(&self, args: &ArgMatches, logger: &'a Logger) -> FormatResult<Box<dyn Command + 'a>> {
        if args.get_flag("extract") || args.get_flag("all-planes") {
            Ok(Box::new(ExtractCommand::new(args, self.config.clone(), logger)?))
        } else if args.get_one::<String>("lines").is_some() {
            Ok(Box::new(LinesCommand::new(args, self.config.clone(), logger)?))
        } else {
            // Default to analyze command
            Ok(Box::new(AnalyzeCommand::new(args, self.config.clone(), logger)?))
        }
    }
}
