//! Capabilities a format plugs into the detection pipeline
//!
//! Formats implement these independently and are composed through the
//! registry rather than through a shared base type.

use crate::extractor::PlaneReader;
use crate::format::errors::FormatResult;
use crate::format::metadata::ImageMetadata;
use crate::io::handle::DataHandle;

/// Decides whether a handle holds data of one format
pub trait Checker: Send + Sync {
    /// Inspects the leading bytes of `handle`
    ///
    /// A mismatch or a file too short to hold the signature is `Ok(false)`;
    /// only provider failures are errors.
    fn is_format(&self, handle: &mut DataHandle) -> FormatResult<bool>;

    /// Magic bytes the check compares, when it is a plain signature match
    fn signature(&self) -> Option<&[u8]> {
        None
    }
}

/// Turns a recognized file's header into metadata
pub trait Parser: Send + Sync {
    /// Reads the header from `handle` and builds validated metadata
    ///
    /// Implementations must set the handle's byte order before reading
    /// multi-byte fields.
    fn parse_header(&self, handle: &mut DataHandle) -> FormatResult<ImageMetadata>;
}

/// Builds a plane reader that takes ownership of the handle
pub type ReaderFactory = fn(ImageMetadata, DataHandle) -> Box<dyn PlaneReader>;
