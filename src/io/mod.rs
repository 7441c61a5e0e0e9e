//! I/O layer: providers, byte order strategies and the data handle
//!
//! This module provides the seekable cursor every format reads through,
//! and the backing stores it can sit on.

pub mod seekable;
pub mod byte_order;
pub mod provider;
pub mod handle;
#[cfg(test)]
mod tests;

pub use byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};
pub use handle::{AccessMode, DataHandle};
pub use provider::{FileProvider, MemoryProvider, Provider, ReaderProvider, StreamProvider};
