//! Decoding configuration
//!
//! Settings are read from TOML. The bundled `config/defaults.toml` is parsed
//! once at startup; a user file only needs to name the keys it overrides.

use lazy_static::lazy_static;
use log::{debug, LevelFilter};
use std::fs;
use std::path::Path;

use crate::format::errors::{FormatError, FormatResult};

lazy_static! {
    static ref BUNDLED_DEFAULTS: DecodeConfig = {
        let content = include_str!("../config/defaults.toml");
        DecodeConfig::from_toml_over(content, &DecodeConfig::builtin()).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to parse bundled defaults: {}", e);
            DecodeConfig::builtin()
        })
    };
}

/// Tunables for data handles and logging
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeConfig {
    /// Read-ahead window size of each handle, in bytes
    pub buffer_size: usize,
    /// Longest accepted line for `read_line`
    pub max_line_length: usize,
    /// Log level used by the command-line tool
    pub log_level: LevelFilter,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        BUNDLED_DEFAULTS.clone()
    }
}

impl DecodeConfig {
    /// Hard-coded fallback used when the bundled file cannot be parsed
    fn builtin() -> Self {
        DecodeConfig {
            buffer_size: 64 * 1024,
            max_line_length: 1024 * 1024,
            log_level: LevelFilter::Info,
        }
    }

    /// Loads a TOML file on top of the bundled defaults
    pub fn load<P: AsRef<Path>>(path: P) -> FormatResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        debug!("Loading configuration from {}", path.as_ref().display());
        Self::from_toml_over(&content, &DecodeConfig::default())
    }

    /// Parses TOML text on top of the bundled defaults
    pub fn from_toml(content: &str) -> FormatResult<Self> {
        Self::from_toml_over(content, &DecodeConfig::default())
    }

    fn from_toml_over(content: &str, base: &DecodeConfig) -> FormatResult<Self> {
        let table: toml::Table = content
            .parse()
            .map_err(|e| FormatError::InvalidConfig(format!("{}", e)))?;

        let mut config = base.clone();

        if let Some(handle) = table.get("handle").and_then(|v| v.as_table()) {
            if let Some(size) = Self::read_positive(handle, "buffer_size")? {
                config.buffer_size = size;
            }
            if let Some(max) = Self::read_positive(handle, "max_line_length")? {
                config.max_line_length = max;
            }
        }

        if let Some(logging) = table.get("logging").and_then(|v| v.as_table()) {
            if let Some(level) = logging.get("level") {
                let name = level
                    .as_str()
                    .ok_or_else(|| FormatError::InvalidConfig("logging.level must be a string".to_string()))?;
                config.log_level = name
                    .parse()
                    .map_err(|_| FormatError::InvalidConfig(format!("unknown log level '{}'", name)))?;
            }
        }

        Ok(config)
    }

    fn read_positive(table: &toml::Table, key: &str) -> FormatResult<Option<usize>> {
        match table.get(key) {
            None => Ok(None),
            Some(value) => match value.as_integer() {
                Some(n) if n > 0 => Ok(Some(n as usize)),
                _ => Err(FormatError::InvalidConfig(format!("{} must be a positive integer", key))),
            },
        }
    }

    /// Returns a copy with a different read-ahead window
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }
}
