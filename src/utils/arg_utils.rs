//! Command-line argument parsing helpers

use lazy_static::lazy_static;
use regex::Regex;

use crate::extractor::Region;
use crate::format::errors::{FormatError, FormatResult};

lazy_static! {
    static ref REGION_PATTERN: Regex =
        Regex::new(r"^\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)\s*$").expect("region pattern is valid");
}

/// Parses a region given as `x,y,width,height`
pub fn parse_region(text: &str) -> FormatResult<Region> {
    let captures = REGION_PATTERN
        .captures(text)
        .ok_or_else(|| FormatError::GenericError(format!("Region must be 'x,y,width,height', got '{}'", text)))?;

    let mut values = [0u64; 4];
    for (i, value) in values.iter_mut().enumerate() {
        *value = captures[i + 1]
            .parse()
            .map_err(|_| FormatError::GenericError(format!("Region value '{}' is too large", &captures[i + 1])))?;
    }

    Ok(Region::new(values[0], values[1], values[2], values[3]))
}

/// Parses a non-negative integer argument
pub fn parse_count(text: &str, what: &str) -> FormatResult<u64> {
    text.trim()
        .parse()
        .map_err(|_| FormatError::GenericError(format!("Invalid {}: '{}'", what, text)))
}
