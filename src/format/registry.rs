//! Explicit format registry
//!
//! Formats are registered by explicit calls at startup. Each entry carries
//! the pieces the pipeline consumes: the suffix list with its sufficiency
//! flags, the checker (which owns any signature), the parser and a reader
//! factory.

use log::info;

use crate::extractor::PlaneReader;
use crate::format::checker;
use crate::format::errors::{FormatError, FormatResult};
use crate::format::kontron;
use crate::format::metadata::ImageMetadata;
use crate::format::traits::{Checker, Parser, ReaderFactory};
use crate::io::handle::DataHandle;

/// Everything the pipeline needs to know about one format
pub struct FormatEntry {
    name: String,
    suffixes: Vec<String>,
    suffix_sufficient: bool,
    suffix_necessary: bool,
    checker: Box<dyn Checker>,
    parser: Box<dyn Parser>,
    reader_factory: ReaderFactory,
}

impl FormatEntry {
    /// Creates an entry; suffix flags default to neither sufficient nor necessary
    pub fn new(
        name: &str,
        checker: Box<dyn Checker>,
        parser: Box<dyn Parser>,
        reader_factory: ReaderFactory,
    ) -> Self {
        FormatEntry {
            name: name.to_string(),
            suffixes: Vec::new(),
            suffix_sufficient: false,
            suffix_necessary: false,
            checker,
            parser,
            reader_factory,
        }
    }

    pub fn with_suffixes(mut self, suffixes: &[&str]) -> Self {
        self.suffixes = suffixes.iter().map(|s| s.to_string()).collect();
        self
    }

    /// A matching suffix alone identifies the format
    pub fn suffix_sufficient(mut self, sufficient: bool) -> Self {
        self.suffix_sufficient = sufficient;
        self
    }

    /// Files without a matching suffix are never this format
    pub fn suffix_necessary(mut self, necessary: bool) -> Self {
        self.suffix_necessary = necessary;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Magic bytes of the format's checker, if it matches a plain signature
    pub fn signature(&self) -> Option<&[u8]> {
        self.checker.signature()
    }

    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    pub fn is_suffix_sufficient(&self) -> bool {
        self.suffix_sufficient
    }

    pub fn is_suffix_necessary(&self) -> bool {
        self.suffix_necessary
    }

    pub fn checker(&self) -> &dyn Checker {
        self.checker.as_ref()
    }

    pub fn parser(&self) -> &dyn Parser {
        self.parser.as_ref()
    }

    /// Whether `name` carries one of this format's suffixes
    pub fn matches_suffix(&self, name: &str) -> bool {
        checker::has_suffix(name, &self.suffixes)
    }

    /// Hands `handle` to a new reader for this format
    pub fn create_reader(&self, metadata: ImageMetadata, handle: DataHandle) -> Box<dyn PlaneReader> {
        (self.reader_factory)(metadata, handle)
    }
}

/// Ordered collection of formats; detection tries them in registration order
#[derive(Default)]
pub struct FormatRegistry {
    formats: Vec<FormatEntry>,
}

impl FormatRegistry {
    /// Empty registry
    pub fn new() -> Self {
        FormatRegistry { formats: Vec::new() }
    }

    /// Registry holding every format shipped with this crate
    pub fn with_builtin_formats() -> Self {
        let mut registry = FormatRegistry::new();
        register_builtin_formats(&mut registry);
        registry
    }

    /// Adds a format; names must be unique
    pub fn register(&mut self, entry: FormatEntry) -> FormatResult<()> {
        if self.get(entry.name()).is_some() {
            return Err(FormatError::GenericError(format!(
                "format '{}' is already registered",
                entry.name()
            )));
        }
        info!("Registered format: {}", entry.name());
        self.formats.push(entry);
        Ok(())
    }

    /// Looks a format up by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&FormatEntry> {
        self.formats.iter().find(|f| f.name.eq_ignore_ascii_case(name))
    }

    pub fn formats(&self) -> impl Iterator<Item = &FormatEntry> {
        self.formats.iter()
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

/// Registers the formats shipped with this crate
pub fn register_builtin_formats(registry: &mut FormatRegistry) {
    for entry in [kontron::format_entry()] {
        if let Err(e) = registry.register(entry) {
            log::warn!("Skipping built-in format: {}", e);
        }
    }
}
