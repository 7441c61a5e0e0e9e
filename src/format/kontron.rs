//! Kontron IMG format
//!
//! Kontron IMG files come from a Kontron controller attached to a scanning
//! electron microscope. They hold one 8-bit greyscale plane after a 128-byte
//! header that starts with a six-byte identifier followed by the width and
//! height as little-endian unsigned shorts.

use log::{debug, warn};

use crate::extractor::{PlaneReader, RawPlaneReader};
use crate::format::checker::SignatureChecker;
use crate::format::errors::{FormatError, FormatResult};
use crate::format::metadata::{Axis, AxisType, ImageMetadata, PixelType};
use crate::format::registry::FormatEntry;
use crate::format::traits::Parser;
use crate::io::byte_order::ByteOrder;
use crate::io::handle::DataHandle;

/// Registered format name
pub const FORMAT_NAME: &str = "Kontron";

/// Kontron IMGs start with this sequence
pub const KONTRON_ID: [u8; 6] = [0x01, 0x00, 0x47, 0x12, 0x6D, 0xB0];

/// Length of the header; pixel data starts here
pub const HEADER_BYTES: u64 = 128;

/// File name suffixes
pub const SUFFIXES: &[&str] = &["img"];

/// Fields of the fixed header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KontronHeader {
    pub width: u64,
    pub height: u64,
}

impl KontronHeader {
    /// Reads width and height from a handle positioned after the identifier
    pub fn read(handle: &mut DataHandle) -> FormatResult<Self> {
        handle.set_order(ByteOrder::LittleEndian);
        // Dimensions are unsigned; a signed read would turn 32768+ negative
        let width = handle.read_u16()? as u64;
        let height = handle.read_u16()? as u64;

        if width == 0 || height == 0 {
            return Err(FormatError::InvalidHeader(format!(
                "Kontron dimensions {}x{} are empty",
                width, height
            )));
        }

        Ok(KontronHeader { width, height })
    }

    /// Bytes of pixel data the header declares
    pub fn pixel_bytes(&self) -> u64 {
        self.width * self.height
    }

    /// Canonical metadata for this header
    pub fn to_metadata(&self, name: &str) -> FormatResult<ImageMetadata> {
        ImageMetadata::builder(name)
            .pixel_type(PixelType::Uint8)
            .bits_per_pixel(8)
            .little_endian(true)
            .planar_axis_count(0)
            .axes(vec![Axis::new(AxisType::X, self.width), Axis::new(AxisType::Y, self.height)])
            .order_certain(true)
            .build()
    }
}

/// Header parser
pub struct KontronParser;

impl Parser for KontronParser {
    fn parse_header(&self, handle: &mut DataHandle) -> FormatResult<ImageMetadata> {
        handle.set_order(ByteOrder::LittleEndian);
        handle.seek(KONTRON_ID.len() as u64)?;
        let header = KontronHeader::read(handle)?;
        debug!("Kontron header: {}x{}", header.width, header.height);

        if let Some(length) = handle.length()? {
            let expected = HEADER_BYTES + header.pixel_bytes();
            if length < expected {
                warn!(
                    "{} holds {} bytes but its header declares {}",
                    handle.name(),
                    length,
                    expected
                );
            }
        }

        header.to_metadata(handle.name())
    }
}

/// Reader factory: the single plane sits right after the header
pub fn create_reader(metadata: ImageMetadata, handle: DataHandle) -> Box<dyn PlaneReader> {
    Box::new(RawPlaneReader::new(metadata, handle, HEADER_BYTES))
}

/// Registry entry for this format
pub fn format_entry() -> FormatEntry {
    FormatEntry::new(
        FORMAT_NAME,
        Box::new(SignatureChecker::new(&KONTRON_ID)),
        Box::new(KontronParser),
        create_reader,
    )
    .with_suffixes(SUFFIXES)
    .suffix_sufficient(false)
    .suffix_necessary(false)
}

/// Encodes a complete header for the given dimensions
pub fn encode_header(width: u16, height: u16) -> Vec<u8> {
    let mut header = vec![0u8; HEADER_BYTES as usize];
    header[..KONTRON_ID.len()].copy_from_slice(&KONTRON_ID);
    header[6..8].copy_from_slice(&width.to_le_bytes());
    header[8..10].copy_from_slice(&height.to_le_bytes());
    header
}
