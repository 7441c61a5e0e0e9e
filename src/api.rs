//! Main entry point for opening images
//!
//! `ImageOpener` wires the pieces together: it opens a handle, runs
//! detection against its registry, parses the header and hands the handle
//! to the format's plane reader. Every failure path drops the handle, which
//! closes the backing resource.

use log::info;
use std::path::Path;

use crate::config::DecodeConfig;
use crate::extractor::{Plane, PlaneReader, Region};
use crate::format::detect;
use crate::format::errors::FormatResult;
use crate::format::metadata::ImageMetadata;
use crate::format::registry::FormatRegistry;
use crate::io::handle::DataHandle;

/// Opens image files through a format registry
pub struct ImageOpener {
    registry: FormatRegistry,
    config: DecodeConfig,
}

impl ImageOpener {
    /// Opener with the built-in formats
    pub fn new(config: DecodeConfig) -> Self {
        Self::with_registry(FormatRegistry::with_builtin_formats(), config)
    }

    /// Opener with a caller-assembled registry
    pub fn with_registry(registry: FormatRegistry, config: DecodeConfig) -> Self {
        ImageOpener { registry, config }
    }

    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Names the format of a file without parsing its header
    pub fn detect<P: AsRef<Path>>(&self, path: P) -> FormatResult<String> {
        let name = path.as_ref().display().to_string();
        if let Some(entry) = detect::detect_by_name(&self.registry, &name) {
            return Ok(entry.name().to_string());
        }
        let mut handle = DataHandle::open_file(path.as_ref(), &self.config)?;
        let entry = detect::detect_format(&self.registry, &name, &mut handle)?;
        Ok(entry.name().to_string())
    }

    /// Opens a local file
    pub fn open<P: AsRef<Path>>(&self, path: P) -> FormatResult<OpenImage> {
        let name = path.as_ref().display().to_string();
        info!("Opening image: {}", name);
        let handle = DataHandle::open_file(path.as_ref(), &self.config)?;
        self.open_handle(&name, handle)
    }

    /// Opens an already created handle; `name` drives suffix checks
    pub fn open_handle(&self, name: &str, mut handle: DataHandle) -> FormatResult<OpenImage> {
        let entry = detect::detect_format(&self.registry, name, &mut handle)?;
        let metadata = entry.parser().parse_header(&mut handle)?;
        info!("Parsed {} header: {}x{}", entry.name(), metadata.width(), metadata.height());

        Ok(OpenImage {
            format_name: entry.name().to_string(),
            reader: entry.create_reader(metadata, handle),
        })
    }
}

/// An opened image: its format and the reader that owns its handle
pub struct OpenImage {
    format_name: String,
    reader: Box<dyn PlaneReader>,
}

impl OpenImage {
    pub fn format_name(&self) -> &str {
        &self.format_name
    }

    pub fn metadata(&self) -> &ImageMetadata {
        self.reader.metadata()
    }

    /// Decodes a region into a caller-supplied buffer
    pub fn read_region(&mut self, plane_index: u64, region: Region, out: &mut [u8]) -> FormatResult<()> {
        self.reader.read_region(plane_index, region, out)
    }

    /// Decodes a region into a new plane
    pub fn open_plane(&mut self, plane_index: u64, region: Region) -> FormatResult<Plane> {
        self.reader.open_plane(plane_index, region)
    }

    /// The underlying reader
    pub fn reader_mut(&mut self) -> &mut dyn PlaneReader {
        self.reader.as_mut()
    }

    /// Releases the handle
    pub fn close(mut self) -> FormatResult<()> {
        self.reader.close()
    }
}
