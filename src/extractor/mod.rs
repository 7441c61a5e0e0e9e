//! Plane region extraction
//!
//! This module provides the region type, the decoded plane container and
//! the readers that pull rectangles out of stored planes.

mod region;
mod plane;
mod plane_reader;

pub use region::Region;
pub use plane::{region_byte_len, region_row_bytes, Plane};
pub use plane_reader::{PlaneReader, RawPlaneReader};
