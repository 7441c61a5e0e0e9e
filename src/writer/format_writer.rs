//! Writer capability

use crate::extractor::Region;
use crate::format::errors::FormatResult;
use crate::format::metadata::ImageMetadata;

/// Writes planes of one image to a destination
pub trait FormatWriter {
    /// Opens `id` as the destination for an image described by `metadata`
    fn set_dest(&mut self, id: &str, metadata: ImageMetadata) -> FormatResult<()>;

    /// Metadata of the current destination, if one is open
    fn metadata(&self) -> Option<&ImageMetadata>;

    /// Number of series the destination holds
    fn image_count(&self) -> usize {
        1
    }

    /// Writes `bytes` (row-major, `region` sized) into a plane
    fn save_region(&mut self, series: usize, plane_index: u64, bytes: &[u8], region: Region) -> FormatResult<()>;

    /// Flushes and releases the destination
    fn close(&mut self) -> FormatResult<()>;
}
