//! Writer for Kontron IMG files

use log::{debug, info};

use crate::config::DecodeConfig;
use crate::extractor::{region_byte_len, region_row_bytes, Region};
use crate::format::errors::{FormatError, FormatResult};
use crate::format::kontron::{self, HEADER_BYTES};
use crate::format::metadata::{ImageMetadata, PixelType};
use crate::io::byte_order::ByteOrder;
use crate::io::handle::DataHandle;

use super::format_writer::FormatWriter;

/// Writes single-plane 8-bit Kontron files
pub struct KontronWriter {
    config: DecodeConfig,
    handle: Option<DataHandle>,
    metadata: Option<ImageMetadata>,
}

impl KontronWriter {
    pub fn new(config: DecodeConfig) -> Self {
        KontronWriter {
            config,
            handle: None,
            metadata: None,
        }
    }

    /// Starts writing to an already opened read-write handle
    pub fn start(&mut self, mut handle: DataHandle, metadata: ImageMetadata) -> FormatResult<()> {
        let (width, height) = Self::check_metadata(&metadata)?;
        handle.set_order(ByteOrder::LittleEndian);
        handle.seek(0)?;
        handle.write_bytes(&kontron::encode_header(width, height))?;
        // Reserve the plane so regions can arrive in any order
        handle.write_bytes(&vec![0u8; metadata.plane_bytes() as usize])?;
        debug!("Kontron header written for {}x{} image", width, height);

        self.handle = Some(handle);
        self.metadata = Some(metadata);
        Ok(())
    }

    fn check_metadata(metadata: &ImageMetadata) -> FormatResult<(u16, u16)> {
        if metadata.pixel_type() != PixelType::Uint8 {
            return Err(FormatError::InvalidHeader(format!(
                "Kontron stores uint8 pixels, not {}",
                metadata.pixel_type().name()
            )));
        }
        if metadata.axes().len() != 2 {
            return Err(FormatError::InvalidHeader(
                "Kontron stores a single X/Y plane".to_string(),
            ));
        }
        let width = u16::try_from(metadata.width())
            .map_err(|_| FormatError::InvalidHeader(format!("width {} exceeds 65535", metadata.width())))?;
        let height = u16::try_from(metadata.height())
            .map_err(|_| FormatError::InvalidHeader(format!("height {} exceeds 65535", metadata.height())))?;
        Ok((width, height))
    }
}

impl FormatWriter for KontronWriter {
    fn set_dest(&mut self, id: &str, metadata: ImageMetadata) -> FormatResult<()> {
        if self.handle.is_some() {
            self.close()?;
        }
        Self::check_metadata(&metadata)?;
        info!("Writing Kontron image to {}", id);
        let handle = DataHandle::create_file(id, &self.config)?;
        self.start(handle, metadata)
    }

    fn metadata(&self) -> Option<&ImageMetadata> {
        self.metadata.as_ref()
    }

    fn save_region(&mut self, series: usize, plane_index: u64, bytes: &[u8], region: Region) -> FormatResult<()> {
        let metadata = self
            .metadata
            .as_ref()
            .ok_or_else(|| FormatError::GenericError("no destination open".to_string()))?;
        let handle = self.handle.as_mut().ok_or(FormatError::ClosedHandle)?;

        if series != 0 {
            return Err(FormatError::out_of_bounds(format!("series {} outside 0..1", series)));
        }
        if plane_index >= metadata.plane_count() {
            return Err(FormatError::out_of_bounds(format!(
                "plane index {} outside 0..{}",
                plane_index,
                metadata.plane_count()
            )));
        }
        if !region.fits_within(metadata.width(), metadata.height()) {
            return Err(FormatError::out_of_bounds(format!(
                "region x={} y={} w={} h={} outside {}x{} plane",
                region.x,
                region.y,
                region.width,
                region.height,
                metadata.width(),
                metadata.height()
            )));
        }
        let needed = region_byte_len(metadata, &region)?;
        if bytes.len() < needed {
            return Err(FormatError::out_of_bounds(format!(
                "buffer holds {} bytes, region needs {}",
                bytes.len(),
                needed
            )));
        }
        if needed == 0 {
            return Ok(());
        }

        let row_bytes = metadata.row_bytes();
        let out_row = region_row_bytes(metadata, &region)?;
        for (row, chunk) in bytes[..needed].chunks_exact(out_row).enumerate() {
            let offset = HEADER_BYTES + (region.y + row as u64) * row_bytes + region.x;
            handle.seek(offset)?;
            handle.write_bytes(chunk)?;
        }
        Ok(())
    }

    fn close(&mut self) -> FormatResult<()> {
        self.metadata = None;
        match self.handle.take() {
            Some(mut handle) => handle.close(),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::metadata::{Axis, AxisType};
    use crate::io::provider::MemoryProvider;

    fn gray(width: u64, height: u64) -> ImageMetadata {
        ImageMetadata::builder("out")
            .pixel_type(PixelType::Uint8)
            .axes(vec![Axis::new(AxisType::X, width), Axis::new(AxisType::Y, height)])
            .build()
            .unwrap()
    }

    fn memory_handle() -> DataHandle {
        DataHandle::new(Box::new(MemoryProvider::writable(Vec::new())), &DecodeConfig::default())
    }

    #[test]
    fn test_rejects_unsupported_metadata() {
        let mut writer = KontronWriter::new(DecodeConfig::default());
        let wide = ImageMetadata::builder("wide")
            .pixel_type(PixelType::Uint16)
            .axes(vec![Axis::new(AxisType::X, 2), Axis::new(AxisType::Y, 2)])
            .build()
            .unwrap();
        assert!(writer.start(memory_handle(), wide).is_err());
        assert!(writer.start(memory_handle(), gray(70000, 1)).is_err());
        assert!(writer.metadata().is_none());
    }

    #[test]
    fn test_region_checks() {
        let mut writer = KontronWriter::new(DecodeConfig::default());
        writer.start(memory_handle(), gray(4, 2)).unwrap();

        assert!(writer.save_region(1, 0, &[0; 8], Region::full(4, 2)).is_err());
        assert!(writer.save_region(0, 1, &[0; 8], Region::full(4, 2)).is_err());
        assert!(writer.save_region(0, 0, &[0; 8], Region::new(2, 0, 3, 1)).is_err());
        assert!(writer.save_region(0, 0, &[0; 3], Region::full(4, 2)).is_err());
        writer.save_region(0, 0, &[7; 2], Region::new(1, 1, 2, 1)).unwrap();
        writer.close().unwrap();
    }
}
