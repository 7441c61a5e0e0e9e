//! Format detection and header parsing
//!
//! This module provides the capabilities a format implements, the registry
//! that composes them, the detection engine and the canonical metadata.

pub mod errors;
pub mod metadata;
pub mod traits;
pub mod checker;
pub mod registry;
pub mod detect;
pub mod kontron;
#[cfg(test)]
mod tests;

pub use errors::{FormatError, FormatResult};
pub use metadata::{Axis, AxisType, ImageMetadata, MetadataBuilder, PixelType};
pub use traits::{Checker, Parser, ReaderFactory};
pub use checker::SignatureChecker;
pub use registry::{register_builtin_formats, FormatEntry, FormatRegistry};
pub use detect::{detect_by_name, detect_format};
