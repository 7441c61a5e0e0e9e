//! Lines command: print the first lines of a file through a data handle
//!
//! Handy for formats whose headers are text.

use clap::ArgMatches;

use crate::config::DecodeConfig;
use crate::format::errors::{FormatError, FormatResult};
use crate::io::handle::DataHandle;
use crate::utils::arg_utils;
use crate::utils::logger::Logger;

use super::command_traits::Command;

pub struct LinesCommand<'a> {
    input: String,
    count: u64,
    config: DecodeConfig,
    logger: &'a Logger,
}

impl<'a> LinesCommand<'a> {
    pub fn new(args: &ArgMatches, config: DecodeConfig, logger: &'a Logger) -> FormatResult<Self> {
        let input = args
            .get_one::<String>("input")
            .ok_or_else(|| FormatError::GenericError("Missing input file".to_string()))?
            .clone();
        let count = match args.get_one::<String>("lines") {
            Some(text) => arg_utils::parse_count(text, "line count")?,
            None => 10,
        };
        Ok(LinesCommand { input, count, config, logger })
    }
}

impl<'a> Command for LinesCommand<'a> {
    fn execute(&self) -> FormatResult<()> {
        let mut handle = DataHandle::open_file(&self.input, &self.config)?;
        for _ in 0..self.count {
            let offset = handle.offset();
            match handle.read_line()? {
                Some(line) => {
                    let entry = format!("{:>10}: {}", offset, line);
                    println!("{}", entry);
                    self.logger.log(&entry)?;
                }
                None => break,
            }
        }
        handle.close()
    }
}
