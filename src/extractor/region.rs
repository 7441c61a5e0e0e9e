//! Region structure for defining a decode area
//!
//! This module defines the Region structure that specifies a rectangular
//! area of a plane. The coordinates are in pixels and follow the usual image
//! convention where (0,0) is the top-left corner of the plane.

/// Rectangular area of a plane (in pixel coordinates)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// X-coordinate of the top-left corner (pixels from left)
    pub x: u64,

    /// Y-coordinate of the top-left corner (pixels from top)
    pub y: u64,

    /// Width of the region in pixels
    pub width: u64,

    /// Height of the region in pixels
    pub height: u64,
}

impl Region {
    /// Create a new region
    ///
    /// # Arguments
    /// * `x` - X-coordinate of the top-left corner
    /// * `y` - Y-coordinate of the top-left corner
    /// * `width` - Width of the region in pixels
    /// * `height` - Height of the region in pixels
    pub fn new(x: u64, y: u64, width: u64, height: u64) -> Self {
        Region { x, y, width, height }
    }

    /// Region covering a whole plane of the given size
    pub fn full(width: u64, height: u64) -> Self {
        Region::new(0, 0, width, height)
    }

    /// Get the rightmost X coordinate (exclusive)
    ///
    /// Returns `None` if the sum overflows.
    pub fn end_x(&self) -> Option<u64> {
        self.x.checked_add(self.width)
    }

    /// Get the bottommost Y coordinate (exclusive)
    ///
    /// Returns `None` if the sum overflows.
    pub fn end_y(&self) -> Option<u64> {
        self.y.checked_add(self.height)
    }

    /// Whether the region lies inside a `width` x `height` plane
    pub fn fits_within(&self, width: u64, height: u64) -> bool {
        matches!(self.end_x(), Some(end) if end <= width)
            && matches!(self.end_y(), Some(end) if end <= height)
    }

    /// Number of pixels covered
    pub fn pixel_count(&self) -> u64 {
        self.width.saturating_mul(self.height)
    }

    /// Whether the region covers no pixels
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
