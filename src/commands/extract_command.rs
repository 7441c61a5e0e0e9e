//! Extract command: decode a region of one or all planes to disk

use clap::ArgMatches;
use log::info;
use std::path::Path;

use crate::api::{ImageOpener, OpenImage};
use crate::config::DecodeConfig;
use crate::extractor::Region;
use crate::format::errors::{FormatError, FormatResult};
use crate::utils::arg_utils;
use crate::utils::logger::Logger;
use crate::utils::output_utils;
use crate::utils::progress::ProgressTracker;

use super::command_traits::Command;

/// Decodes planes and writes them as raw bytes or PNG
pub struct ExtractCommand<'a> {
    input: String,
    output: String,
    plane: u64,
    region: Option<Region>,
    all_planes: bool,
    config: DecodeConfig,
    logger: &'a Logger,
}

impl<'a> ExtractCommand<'a> {
    pub fn new(args: &ArgMatches, config: DecodeConfig, logger: &'a Logger) -> FormatResult<Self> {
        let input = args
            .get_one::<String>("input")
            .ok_or_else(|| FormatError::GenericError("Missing input file".to_string()))?
            .clone();
        let output = args
            .get_one::<String>("output")
            .ok_or_else(|| FormatError::GenericError("Extraction needs --output".to_string()))?
            .clone();
        let plane = match args.get_one::<String>("plane") {
            Some(text) => arg_utils::parse_count(text, "plane index")?,
            None => 0,
        };
        let region = args
            .get_one::<String>("region")
            .map(|text| arg_utils::parse_region(text))
            .transpose()?;

        Ok(ExtractCommand {
            input,
            output,
            plane,
            region,
            all_planes: args.get_flag("all-planes"),
            config,
            logger,
        })
    }

    /// Output path for plane `index` when every plane is written
    fn plane_output(&self, index: u64) -> String {
        let path = Path::new(&self.output);
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("plane");
        let name = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{}_p{}.{}", stem, index, ext),
            None => format!("{}_p{}", stem, index),
        };
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.join(name).display().to_string(),
            _ => name,
        }
    }

    fn write_plane(&self, image: &mut OpenImage, index: u64, region: Region, path: &str) -> FormatResult<()> {
        let plane = image.open_plane(index, region)?;
        if output_utils::wants_png(path) {
            output_utils::write_png(&plane, image.metadata().byte_order(), path)?;
        } else {
            output_utils::write_raw(&plane, path)?;
        }
        self.logger.log(&format!(
            "Plane {} region ({}, {}) {}x{} -> {}",
            index, region.x, region.y, region.width, region.height, path
        ))?;
        Ok(())
    }
}

impl<'a> Command for ExtractCommand<'a> {
    fn execute(&self) -> FormatResult<()> {
        let opener = ImageOpener::new(self.config.clone());
        let mut image = opener.open(&self.input)?;
        let region = self
            .region
            .unwrap_or_else(|| Region::full(image.metadata().width(), image.metadata().height()));

        if self.all_planes {
            let count = image.metadata().plane_count();
            info!("Extracting {} planes from {}", count, self.input);
            let progress = if count > 1 {
                ProgressTracker::new(count, &self.input)
            } else {
                ProgressTracker::hidden()
            };
            for index in 0..count {
                let path = self.plane_output(index);
                self.write_plane(&mut image, index, region, &path)?;
                progress.increment(1);
            }
            progress.finish();
        } else {
            self.write_plane(&mut image, self.plane, region, &self.output)?;
        }

        image.close()
    }
}
