//! Format detection
//!
//! Detection runs in two passes over the registry. The first pass answers
//! from file names alone, for formats whose suffix is declared sufficient.
//! The second pass pays for byte-level checks, skipping only formats whose
//! suffix is declared necessary and absent.

use log::{debug, info};

use crate::format::errors::{FormatError, FormatResult};
use crate::format::registry::{FormatEntry, FormatRegistry};
use crate::io::handle::DataHandle;

/// Finds a format from the file name alone
///
/// Only formats whose suffix is sufficient can answer without reading.
pub fn detect_by_name<'r>(registry: &'r FormatRegistry, name: &str) -> Option<&'r FormatEntry> {
    registry
        .formats()
        .find(|entry| entry.is_suffix_sufficient() && entry.matches_suffix(name))
}

/// Finds the format of the data behind `handle`
///
/// `name` is the file name used for suffix checks. A checker answering
/// "no" moves on to the next candidate; provider failures stop detection.
/// The handle is left at offset 0.
pub fn detect_format<'r>(
    registry: &'r FormatRegistry,
    name: &str,
    handle: &mut DataHandle,
) -> FormatResult<&'r FormatEntry> {
    if let Some(entry) = detect_by_name(registry, name) {
        info!("Detected {} from suffix of {}", entry.name(), name);
        return Ok(entry);
    }

    for entry in registry.formats() {
        let suffix_match = entry.matches_suffix(name);
        if entry.is_suffix_necessary() && !suffix_match {
            debug!("Skipping {}: required suffix missing on {}", entry.name(), name);
            continue;
        }

        handle.seek(0)?;
        let matched = entry.checker().is_format(handle)?;
        debug!("{} signature check on {}: {}", entry.name(), name, matched);
        if matched {
            handle.seek(0)?;
            info!("Detected {} from signature of {}", entry.name(), name);
            return Ok(entry);
        }
    }

    handle.seek(0)?;
    Err(FormatError::UnsupportedFormat(name.to_string()))
}
