//! Custom error types for format detection and plane decoding

use std::fmt;
use std::io;

/// Errors raised while opening, detecting, parsing or decoding an image
#[derive(Debug)]
pub enum FormatError {
    /// Backing provider failure (permission, disk fault, network)
    IoError(io::Error),
    /// Neither signature nor suffix matched a registered format
    UnsupportedFormat(String),
    /// Fewer bytes available than a field or region requires
    TruncatedRead {
        /// Absolute offset where the read started
        offset: u64,
        /// Number of bytes requested
        requested: u64,
    },
    /// A header field is structurally impossible
    InvalidHeader(String),
    /// Plane index, region rectangle or seek target exceeds declared geometry
    OutOfBounds(String),
    /// Operation attempted after the handle was closed
    ClosedHandle,
    /// Configuration file could not be parsed or holds invalid values
    InvalidConfig(String),
    /// Generic error with message
    GenericError(String),
}

impl FormatError {
    /// Builds a truncated-read error for a request at `offset`
    pub fn truncated(offset: u64, requested: u64) -> Self {
        FormatError::TruncatedRead { offset, requested }
    }

    /// Builds an out-of-bounds error from anything displayable
    pub fn out_of_bounds(msg: impl Into<String>) -> Self {
        FormatError::OutOfBounds(msg.into())
    }

    /// Whether a caller might reasonably retry the failed operation
    ///
    /// Only backing-provider failures qualify; structural problems never do.
    pub fn is_transient(&self) -> bool {
        matches!(self, FormatError::IoError(_))
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::IoError(e) => write!(f, "I/O error: {}", e),
            FormatError::UnsupportedFormat(name) => write!(f, "Unsupported format: {}", name),
            FormatError::TruncatedRead { offset, requested } => write!(
                f,
                "Truncated read: {} bytes requested at offset {}",
                requested, offset
            ),
            FormatError::InvalidHeader(msg) => write!(f, "Invalid header: {}", msg),
            FormatError::OutOfBounds(msg) => write!(f, "Out of bounds: {}", msg),
            FormatError::ClosedHandle => write!(f, "Operation on a closed handle"),
            FormatError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            FormatError::GenericError(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FormatError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FormatError {
    fn from(error: io::Error) -> Self {
        // Handle errors travel through std::io::Read as wrapped FormatErrors
        if error.get_ref().map_or(false, |inner| inner.is::<FormatError>()) {
            if let Some(inner) = error.into_inner() {
                if let Ok(format_error) = inner.downcast::<FormatError>() {
                    return *format_error;
                }
            }
            return FormatError::GenericError("Unrecoverable wrapped handle error".to_string());
        }

        match error.kind() {
            io::ErrorKind::UnexpectedEof => FormatError::TruncatedRead { offset: 0, requested: 0 },
            _ => FormatError::IoError(error),
        }
    }
}

impl From<FormatError> for io::Error {
    fn from(error: FormatError) -> Self {
        match error {
            FormatError::IoError(e) => e,
            FormatError::TruncatedRead { .. } => io::Error::new(io::ErrorKind::UnexpectedEof, error),
            other => io::Error::new(io::ErrorKind::Other, other),
        }
    }
}

impl From<String> for FormatError {
    fn from(msg: String) -> Self {
        FormatError::GenericError(msg)
    }
}

/// Result type for format operations
pub type FormatResult<T> = Result<T, FormatError>;
