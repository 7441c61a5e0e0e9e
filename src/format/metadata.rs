//! Canonical image metadata
//!
//! `ImageMetadata` describes geometry and pixel encoding independently of
//! how a format lays its bytes out. Axis order convention:
//!
//! - `axes[0]` is X and `axes[1]` is Y; they fix one plane's columns and rows.
//! - Axes between the spatial pair and the plane-indexing axes are
//!   interleaved inside a plane (for example an interleaved channel axis).
//! - The trailing `planar_axis_count` axes index separate stored planes,
//!   outermost in storage order.

use std::fmt;

use crate::format::errors::{FormatError, FormatResult};
use crate::io::byte_order::ByteOrder;

/// Identity of an axis
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AxisType {
    X,
    Y,
    Z,
    Channel,
    Time,
    Lifetime,
    /// Format-specific axis
    Other(String),
}

impl AxisType {
    /// Short label used in summaries
    pub fn label(&self) -> &str {
        match self {
            AxisType::X => "X",
            AxisType::Y => "Y",
            AxisType::Z => "Z",
            AxisType::Channel => "Channel",
            AxisType::Time => "Time",
            AxisType::Lifetime => "Lifetime",
            AxisType::Other(name) => name,
        }
    }
}

/// A named dimension with its length
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Axis {
    pub axis_type: AxisType,
    pub length: u64,
}

impl Axis {
    pub fn new(axis_type: AxisType, length: u64) -> Self {
        Axis { axis_type, length }
    }
}

/// Pixel sample encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelType {
    /// 1-bit samples packed eight to a byte
    Bit,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Float,
    Double,
}

impl PixelType {
    /// Storage width in bits
    pub fn bits(&self) -> u32 {
        match self {
            PixelType::Bit => 1,
            PixelType::Int8 | PixelType::Uint8 => 8,
            PixelType::Int16 | PixelType::Uint16 => 16,
            PixelType::Int32 | PixelType::Uint32 | PixelType::Float => 32,
            PixelType::Double => 64,
        }
    }

    /// Whole bytes per sample; 0 for packed types
    pub fn bytes_per_pixel(&self) -> usize {
        (self.bits() / 8) as usize
    }

    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            PixelType::Int8 | PixelType::Int16 | PixelType::Int32 | PixelType::Float | PixelType::Double
        )
    }

    pub fn is_floating_point(&self) -> bool {
        matches!(self, PixelType::Float | PixelType::Double)
    }

    /// Whether samples are smaller than a byte
    pub fn is_packed(&self) -> bool {
        self.bits() % 8 != 0
    }

    pub fn name(&self) -> &'static str {
        match self {
            PixelType::Bit => "bit",
            PixelType::Int8 => "int8",
            PixelType::Uint8 => "uint8",
            PixelType::Int16 => "int16",
            PixelType::Uint16 => "uint16",
            PixelType::Int32 => "int32",
            PixelType::Uint32 => "uint32",
            PixelType::Float => "float",
            PixelType::Double => "double",
        }
    }
}

/// Geometry and encoding of one image
#[derive(Debug, Clone, PartialEq)]
pub struct ImageMetadata {
    name: String,
    pixel_type: PixelType,
    bits_per_pixel: u32,
    byte_order: ByteOrder,
    planar_axis_count: usize,
    axes: Vec<Axis>,
    order_certain: bool,
}

impl ImageMetadata {
    /// Starts building metadata for the named image
    pub fn builder(name: &str) -> MetadataBuilder {
        MetadataBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pixel_type(&self) -> PixelType {
        self.pixel_type
    }

    /// Significant bits per sample; at most the pixel type's width
    pub fn bits_per_pixel(&self) -> u32 {
        self.bits_per_pixel
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn is_little_endian(&self) -> bool {
        self.byte_order.is_little_endian()
    }

    /// Number of trailing axes that index stored planes
    pub fn planar_axis_count(&self) -> usize {
        self.planar_axis_count
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    /// Whether the file declared its axis order explicitly
    pub fn is_order_certain(&self) -> bool {
        self.order_certain
    }

    /// Length of the first axis of the given type
    pub fn axis_length(&self, axis_type: &AxisType) -> Option<u64> {
        self.axes.iter().find(|a| &a.axis_type == axis_type).map(|a| a.length)
    }

    // Geometry below was checked for overflow by `MetadataBuilder::build`

    /// Plane width (X extent)
    pub fn width(&self) -> u64 {
        self.axes[0].length
    }

    /// Plane height (Y extent)
    pub fn height(&self) -> u64 {
        self.axes[1].length
    }

    /// Axes interleaved inside each plane
    pub fn interleaved_axes(&self) -> &[Axis] {
        &self.axes[2..self.axes.len() - self.planar_axis_count]
    }

    /// Axes whose combinations select a stored plane
    pub fn plane_axes(&self) -> &[Axis] {
        &self.axes[self.axes.len() - self.planar_axis_count..]
    }

    /// Number of addressable planes
    pub fn plane_count(&self) -> u64 {
        self.plane_axes().iter().map(|a| a.length).product()
    }

    /// Samples stored per X/Y position
    pub fn samples_per_pixel(&self) -> u64 {
        self.interleaved_axes().iter().map(|a| a.length).product()
    }

    /// Storage bits of one X/Y position, all interleaved samples included
    ///
    /// Samples always occupy the full width of the pixel type, even when
    /// fewer bits per pixel are significant.
    pub fn bits_per_position(&self) -> u64 {
        self.pixel_type.bits() as u64 * self.samples_per_pixel()
    }

    /// Bytes of one stored row; packed rows are padded to a whole byte
    pub fn row_bytes(&self) -> u64 {
        (self.width() * self.bits_per_position() + 7) / 8
    }

    /// Bytes of one stored plane
    pub fn plane_bytes(&self) -> u64 {
        self.row_bytes() * self.height()
    }
}

impl fmt::Display for ImageMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Image: {}", self.name)?;
        let dims: Vec<String> = self
            .axes
            .iter()
            .map(|a| format!("{}={}", a.axis_type.label(), a.length))
            .collect();
        writeln!(f, "  Axes: {}", dims.join(", "))?;
        writeln!(f, "  Pixel type: {} ({} bits)", self.pixel_type.name(), self.bits_per_pixel)?;
        writeln!(f, "  Byte order: {}", self.byte_order.name())?;
        writeln!(f, "  Planes: {}", self.plane_count())?;
        write!(f, "  Order certain: {}", self.order_certain)
    }
}

/// Step-by-step construction of `ImageMetadata`
///
/// Fields are set in the order pixel type, bits per pixel, byte order, planar
/// axis count, axes; `build` checks every geometry invariant at once.
#[derive(Debug, Clone)]
pub struct MetadataBuilder {
    name: String,
    pixel_type: Option<PixelType>,
    bits_per_pixel: Option<u32>,
    byte_order: Option<ByteOrder>,
    planar_axis_count: usize,
    axes: Vec<Axis>,
    order_certain: bool,
}

impl MetadataBuilder {
    pub fn new(name: &str) -> Self {
        MetadataBuilder {
            name: name.to_string(),
            pixel_type: None,
            bits_per_pixel: None,
            byte_order: None,
            planar_axis_count: 0,
            axes: Vec::new(),
            order_certain: false,
        }
    }

    pub fn pixel_type(mut self, pixel_type: PixelType) -> Self {
        self.pixel_type = Some(pixel_type);
        self
    }

    /// Defaults to the pixel type's width when not set
    pub fn bits_per_pixel(mut self, bits: u32) -> Self {
        self.bits_per_pixel = Some(bits);
        self
    }

    pub fn little_endian(mut self, little: bool) -> Self {
        self.byte_order = Some(ByteOrder::from_little_endian(little));
        self
    }

    pub fn byte_order(mut self, order: ByteOrder) -> Self {
        self.byte_order = Some(order);
        self
    }

    pub fn planar_axis_count(mut self, count: usize) -> Self {
        self.planar_axis_count = count;
        self
    }

    pub fn axes(mut self, axes: Vec<Axis>) -> Self {
        self.axes = axes;
        self
    }

    pub fn order_certain(mut self, certain: bool) -> Self {
        self.order_certain = certain;
        self
    }

    /// Checks that row, plane and total storage sizes fit in 64 bits
    fn check_storage_size(pixel_type: PixelType, planar_axis_count: usize, axes: &[Axis]) -> FormatResult<()> {
        let overflow = |what: &str| FormatError::InvalidHeader(format!("{} size overflows", what));
        let product = |axes: &[Axis]| axes.iter().try_fold(1u64, |acc, a| acc.checked_mul(a.length));

        let interleaved = &axes[2..axes.len() - planar_axis_count];
        let bits_per_position = product(interleaved)
            .and_then(|samples| samples.checked_mul(pixel_type.bits() as u64))
            .ok_or_else(|| overflow("pixel"))?;
        let row_bytes = axes[0]
            .length
            .checked_mul(bits_per_position)
            .and_then(|bits| bits.checked_add(7))
            .map(|bits| bits / 8)
            .ok_or_else(|| overflow("row"))?;
        let plane_bytes = row_bytes.checked_mul(axes[1].length).ok_or_else(|| overflow("plane"))?;
        let plane_count = product(&axes[axes.len() - planar_axis_count..]).ok_or_else(|| overflow("plane count"))?;
        plane_bytes.checked_mul(plane_count).ok_or_else(|| overflow("image"))?;
        Ok(())
    }

    /// Validates and produces immutable metadata
    pub fn build(self) -> FormatResult<ImageMetadata> {
        let pixel_type = self
            .pixel_type
            .ok_or_else(|| FormatError::InvalidHeader("pixel type not set".to_string()))?;
        let bits_per_pixel = self.bits_per_pixel.unwrap_or_else(|| pixel_type.bits());

        if pixel_type.is_packed() {
            if bits_per_pixel != pixel_type.bits() {
                return Err(FormatError::InvalidHeader(format!(
                    "{} samples are {} bits, not {}",
                    pixel_type.name(),
                    pixel_type.bits(),
                    bits_per_pixel
                )));
            }
        } else if bits_per_pixel == 0 || bits_per_pixel > pixel_type.bits() {
            return Err(FormatError::InvalidHeader(format!(
                "{} valid bits do not fit a {} sample",
                bits_per_pixel,
                pixel_type.name()
            )));
        }

        if self.axes.len() < 2 {
            return Err(FormatError::InvalidHeader(format!(
                "need at least two spatial axes, got {}",
                self.axes.len()
            )));
        }
        if self.axes[0].axis_type != AxisType::X || self.axes[1].axis_type != AxisType::Y {
            return Err(FormatError::InvalidHeader(format!(
                "leading axes must be X and Y, got {} and {}",
                self.axes[0].axis_type.label(),
                self.axes[1].axis_type.label()
            )));
        }
        if let Some(empty) = self.axes.iter().find(|a| a.length == 0) {
            return Err(FormatError::InvalidHeader(format!(
                "axis {} has zero length",
                empty.axis_type.label()
            )));
        }
        if self.planar_axis_count > self.axes.len() - 2 {
            return Err(FormatError::InvalidHeader(format!(
                "planar axis count {} exceeds the {} non-spatial axes",
                self.planar_axis_count,
                self.axes.len() - 2
            )));
        }

        Self::check_storage_size(pixel_type, self.planar_axis_count, &self.axes)?;

        let byte_order = self.byte_order.unwrap_or_default();

        Ok(ImageMetadata {
            name: self.name,
            pixel_type,
            bits_per_pixel,
            byte_order,
            planar_axis_count: self.planar_axis_count,
            axes: self.axes,
            order_certain: self.order_certain,
        })
    }
}
