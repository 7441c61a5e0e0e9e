//! Region-addressable plane decoding
//!
//! This module defines the `PlaneReader` capability and the reader for
//! uncompressed planar data stored contiguously after a fixed header.

use log::debug;

use crate::format::errors::{FormatError, FormatResult};
use crate::format::metadata::ImageMetadata;
use crate::io::handle::DataHandle;

use super::plane::{self, Plane};
use super::region::Region;

/// Decodes rectangles of stored planes on demand
///
/// A reader owns the handle it reads through; dropping the reader releases it.
pub trait PlaneReader: Send {
    /// Metadata the reader was built from
    fn metadata(&self) -> &ImageMetadata;

    /// Decodes `region` of plane `plane_index` into `out`, row-major
    ///
    /// `out` must hold at least `region_byte_len` bytes. Nothing is written
    /// when the request fails validation.
    fn read_region(&mut self, plane_index: u64, region: Region, out: &mut [u8]) -> FormatResult<()>;

    /// Decodes `region` into a freshly allocated `Plane`
    fn open_plane(&mut self, plane_index: u64, region: Region) -> FormatResult<Plane> {
        let metadata = self.metadata();
        let row_stride = plane::region_row_bytes(metadata, &region)?;
        let len = plane::region_byte_len(metadata, &region)?;
        let pixel_type = metadata.pixel_type();

        let mut bytes = vec![0u8; len];
        self.read_region(plane_index, region, &mut bytes)?;
        Ok(Plane::new(bytes, plane_index, region, row_stride, pixel_type))
    }

    /// Decodes a whole plane
    fn open_full_plane(&mut self, plane_index: u64) -> FormatResult<Plane> {
        let region = Region::full(self.metadata().width(), self.metadata().height());
        self.open_plane(plane_index, region)
    }

    /// Releases the underlying handle
    fn close(&mut self) -> FormatResult<()>;
}

/// Reader for uncompressed planes laid out back to back from `data_offset`
///
/// Plane `p` starts at `data_offset + p * plane_bytes`; within a plane rows
/// are `row_bytes` apart.
pub struct RawPlaneReader {
    metadata: ImageMetadata,
    handle: DataHandle,
    data_offset: u64,
}

impl RawPlaneReader {
    /// Creates a reader over `handle` for planes starting at `data_offset`
    pub fn new(metadata: ImageMetadata, handle: DataHandle, data_offset: u64) -> Self {
        RawPlaneReader {
            metadata,
            handle,
            data_offset,
        }
    }

    /// Offset of the first pixel data byte
    pub fn data_offset(&self) -> u64 {
        self.data_offset
    }

    /// Absolute offset of the first byte of a plane
    pub fn plane_offset(&self, plane_index: u64) -> FormatResult<u64> {
        plane_index
            .checked_mul(self.metadata.plane_bytes())
            .and_then(|o| o.checked_add(self.data_offset))
            .ok_or_else(|| FormatError::out_of_bounds(format!("plane {} offset overflows", plane_index)))
    }

    /// Seeks ahead of a `len`-byte read; a target past the end of the data
    /// means the file is shorter than its header declares
    fn seek_for(&mut self, offset: u64, len: usize) -> FormatResult<()> {
        match self.handle.seek(offset) {
            Err(FormatError::OutOfBounds(_)) => Err(FormatError::truncated(offset, len as u64)),
            other => other,
        }
    }

    /// Checks the request against the declared geometry and the buffer size
    fn validate(&self, plane_index: u64, region: &Region, out_len: usize) -> FormatResult<usize> {
        let plane_count = self.metadata.plane_count();
        if plane_index >= plane_count {
            return Err(FormatError::out_of_bounds(format!(
                "plane index {} outside 0..{}",
                plane_index, plane_count
            )));
        }

        let (width, height) = (self.metadata.width(), self.metadata.height());
        if !region.fits_within(width, height) {
            return Err(FormatError::out_of_bounds(format!(
                "region x={} y={} w={} h={} outside {}x{} plane",
                region.x, region.y, region.width, region.height, width, height
            )));
        }

        let needed = plane::region_byte_len(&self.metadata, region)?;
        if out_len < needed {
            return Err(FormatError::out_of_bounds(format!(
                "output buffer holds {} bytes, region needs {}",
                out_len, needed
            )));
        }
        Ok(needed)
    }
}

impl PlaneReader for RawPlaneReader {
    fn metadata(&self) -> &ImageMetadata {
        &self.metadata
    }

    fn read_region(&mut self, plane_index: u64, region: Region, out: &mut [u8]) -> FormatResult<()> {
        let needed = self.validate(plane_index, &region, out.len())?;
        if needed == 0 {
            return Ok(());
        }

        let plane_start = self.plane_offset(plane_index)?;
        let row_bytes = self.metadata.row_bytes();
        let column_offset = region.x * self.metadata.bits_per_position() / 8;
        let out_row = plane::region_row_bytes(&self.metadata, &region)?;

        debug!(
            "Reading plane {} region ({}, {}) {}x{} from offset {}",
            plane_index, region.x, region.y, region.width, region.height, plane_start
        );

        if region.x == 0 && region.width == self.metadata.width() {
            // Full-width rows are contiguous in the file
            self.seek_for(plane_start + region.y * row_bytes, needed)?;
            return self.handle.read_fully(&mut out[..needed]);
        }

        for (row, chunk) in out[..needed].chunks_exact_mut(out_row).enumerate() {
            let row_start = plane_start + (region.y + row as u64) * row_bytes + column_offset;
            self.seek_for(row_start, out_row)?;
            self.handle.read_fully(chunk)?;
        }

        Ok(())
    }

    fn close(&mut self) -> FormatResult<()> {
        self.handle.close()
    }
}
