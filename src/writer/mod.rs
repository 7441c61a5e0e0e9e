//! Plane writers
//!
//! The legacy adapter lives beside the writers it wraps and is not used by
//! the decoding path.

mod format_writer;
mod kontron_writer;
pub mod legacy;

pub use format_writer::FormatWriter;
pub use kontron_writer::KontronWriter;
pub use legacy::LegacyWriterAdapter;
