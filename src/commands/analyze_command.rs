//! Analyze command: detect the format and report metadata

use clap::ArgMatches;
use log::info;

use crate::api::ImageOpener;
use crate::config::DecodeConfig;
use crate::format::errors::{FormatError, FormatResult};
use crate::utils::logger::Logger;

use super::command_traits::Command;

/// Prints what the decoder knows about a file
pub struct AnalyzeCommand<'a> {
    input: String,
    config: DecodeConfig,
    logger: &'a Logger,
}

impl<'a> AnalyzeCommand<'a> {
    pub fn new(args: &ArgMatches, config: DecodeConfig, logger: &'a Logger) -> FormatResult<Self> {
        let input = args
            .get_one::<String>("input")
            .ok_or_else(|| FormatError::GenericError("Missing input file".to_string()))?
            .clone();
        Ok(AnalyzeCommand { input, config, logger })
    }
}

impl<'a> Command for AnalyzeCommand<'a> {
    fn execute(&self) -> FormatResult<()> {
        info!("Analyzing {}", self.input);
        let opener = ImageOpener::new(self.config.clone());
        let image = opener.open(&self.input)?;

        let metadata = image.metadata();
        println!("Format: {}", image.format_name());
        println!("{}", metadata);
        println!("  Plane size: {} bytes", metadata.plane_bytes());

        self.logger.log_metadata(image.format_name(), metadata)?;
        image.close()
    }
}
