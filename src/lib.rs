pub mod io;
pub mod format;
pub mod extractor;
pub mod writer;
pub mod config;
pub mod utils;
pub mod commands;
pub mod api;

pub use crate::api::{ImageOpener, OpenImage};
pub use crate::config::DecodeConfig;

pub use io::{ByteOrder, DataHandle};
pub use format::{FormatError, FormatResult, ImageMetadata, FormatRegistry};
pub use extractor::{Plane, PlaneReader, Region};
