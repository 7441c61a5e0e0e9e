//! Seekable reader trait
//!
//! This module provides a unified trait for readers that support both
//! reading and seeking operations. `DataHandle` implements both, so the
//! byte order handlers and any `byteorder` helper work on a handle directly.

use std::io::{Read, Seek, SeekFrom};

/// Trait for readers that can both read and seek
pub trait SeekableReader: Read + Seek + Send + Sync {}

// Blanket implementation for any type that implements the required traits
impl<T: Read + Seek + Send + Sync> SeekableReader for T {}

/// Determines the length of a seekable source without moving its cursor
///
/// Returns `None` when the source cannot seek to its end.
pub fn stream_length(reader: &mut dyn SeekableReader) -> std::io::Result<Option<u64>> {
    let current = reader.stream_position()?;
    let length = reader.seek(SeekFrom::End(0)).ok();
    reader.seek(SeekFrom::Start(current))?;
    Ok(length)
}
