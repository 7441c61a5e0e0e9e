//! Writing decoded planes to disk

use byteorder::{BigEndian, ByteOrder as EndianRead, LittleEndian};
use image::{ImageBuffer, Luma};
use log::info;
use std::fs;
use std::path::Path;

use crate::extractor::Plane;
use crate::format::errors::{FormatError, FormatResult};
use crate::format::metadata::PixelType;
use crate::io::byte_order::ByteOrder;

/// Whether `path` asks for PNG output
pub fn wants_png(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .map_or(false, |ext| ext.eq_ignore_ascii_case("png"))
}

/// Writes the plane's bytes unchanged
pub fn write_raw(plane: &Plane, path: &str) -> FormatResult<()> {
    fs::write(path, plane.bytes())?;
    info!("Wrote {} raw bytes to {}", plane.bytes().len(), path);
    Ok(())
}

/// Decodes 16-bit samples; a trailing odd byte is ignored
fn u16_samples(bytes: &[u8], order: ByteOrder) -> Vec<u16> {
    let even = &bytes[..bytes.len() - bytes.len() % 2];
    let mut samples = vec![0u16; even.len() / 2];
    match order {
        ByteOrder::LittleEndian => LittleEndian::read_u16_into(even, &mut samples),
        ByteOrder::BigEndian => BigEndian::read_u16_into(even, &mut samples),
    }
    samples
}

/// Writes a greyscale plane as PNG; 8- and 16-bit unsigned samples only
pub fn write_png(plane: &Plane, order: ByteOrder, path: &str) -> FormatResult<()> {
    let region = plane.region();
    let (width, height) = (
        u32::try_from(region.width).map_err(|_| FormatError::GenericError("region too wide for PNG".to_string()))?,
        u32::try_from(region.height).map_err(|_| FormatError::GenericError("region too tall for PNG".to_string()))?,
    );

    let result = match plane.pixel_type() {
        PixelType::Uint8 => ImageBuffer::<Luma<u8>, Vec<u8>>::from_raw(width, height, plane.bytes().to_vec())
            .ok_or_else(|| FormatError::GenericError("plane does not hold a greyscale image".to_string()))?
            .save(path),
        PixelType::Uint16 => {
            let samples = u16_samples(plane.bytes(), order);
            ImageBuffer::<Luma<u16>, Vec<u16>>::from_raw(width, height, samples)
                .ok_or_else(|| FormatError::GenericError("plane does not hold a greyscale image".to_string()))?
                .save(path)
        }
        other => {
            return Err(FormatError::GenericError(format!(
                "PNG output supports uint8 and uint16, not {}",
                other.name()
            )))
        }
    };

    result.map_err(|e| FormatError::GenericError(format!("Failed to write {}: {}", path, e)))?;
    info!("Wrote {}x{} PNG to {}", width, height, path);
    Ok(())
}
