//! Decoded plane regions
//!
//! A `Plane` is the caller-owned result of decoding one rectangle of one
//! plane. Its bytes are row-major with no padding between rows other than
//! the byte rounding of packed sub-byte samples.

use crate::format::errors::{FormatError, FormatResult};
use crate::format::metadata::{ImageMetadata, PixelType};

use super::region::Region;

/// Pixel bytes of a decoded region
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    bytes: Vec<u8>,
    plane_index: u64,
    region: Region,
    row_stride: usize,
    pixel_type: PixelType,
}

impl Plane {
    /// Wraps decoded bytes; `bytes` must hold `region.height` rows of `row_stride` bytes
    pub fn new(bytes: Vec<u8>, plane_index: u64, region: Region, row_stride: usize, pixel_type: PixelType) -> Self {
        Plane {
            bytes,
            plane_index,
            region,
            row_stride,
            pixel_type,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn plane_index(&self) -> u64 {
        self.plane_index
    }

    /// The requested rectangle within the full plane
    pub fn region(&self) -> Region {
        self.region
    }

    /// Bytes per row of this buffer
    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    pub fn pixel_type(&self) -> PixelType {
        self.pixel_type
    }

    /// One row of the decoded region
    pub fn row(&self, row: usize) -> Option<&[u8]> {
        let start = row.checked_mul(self.row_stride)?;
        self.bytes.get(start..start + self.row_stride)
    }
}

/// Bytes one row of `region` occupies in an output buffer
///
/// Packed samples must start on a byte boundary and either end on one or
/// run to the edge of the plane.
pub fn region_row_bytes(metadata: &ImageMetadata, region: &Region) -> FormatResult<usize> {
    let bits = metadata.bits_per_position();
    if bits % 8 != 0 {
        let starts_aligned = (region.x * bits) % 8 == 0;
        let ends_aligned = (region.width * bits) % 8 == 0 || region.end_x() == Some(metadata.width());
        if !starts_aligned || !ends_aligned {
            return Err(FormatError::out_of_bounds(format!(
                "region x={} width={} is not byte aligned for {}-bit samples",
                region.x, region.width, bits
            )));
        }
    }
    let row_bits = region
        .width
        .checked_mul(bits)
        .ok_or_else(|| FormatError::out_of_bounds("region row size overflows"))?;
    usize::try_from((row_bits + 7) / 8).map_err(|_| FormatError::out_of_bounds("region row size overflows"))
}

/// Minimum output buffer length for decoding `region`
pub fn region_byte_len(metadata: &ImageMetadata, region: &Region) -> FormatResult<usize> {
    let row = region_row_bytes(metadata, region)?;
    let height = usize::try_from(region.height).map_err(|_| FormatError::out_of_bounds("region height overflows"))?;
    row.checked_mul(height)
        .ok_or_else(|| FormatError::out_of_bounds("region size overflows"))
}
