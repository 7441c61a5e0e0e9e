//! Adapter from the older writer call style to `FormatWriter`
//!
//! The legacy interface addresses series, planes and rectangles with signed
//! integers and opens destinations by id. Each call is forwarded one to one;
//! argument problems are reported as this crate's errors. The metadata the
//! adapter was handed is never modified.

use log::debug;

use crate::extractor::Region;
use crate::format::errors::{FormatError, FormatResult};
use crate::format::metadata::ImageMetadata;

use super::format_writer::FormatWriter;

/// Forwards legacy writer calls to a modern writer
pub struct LegacyWriterAdapter<W: FormatWriter> {
    writer: W,
    metadata: ImageMetadata,
    current_id: Option<String>,
    series: usize,
}

fn to_index(value: i32, what: &str) -> FormatResult<u64> {
    u64::try_from(value).map_err(|_| FormatError::out_of_bounds(format!("{} must be >= 0, got {}", what, value)))
}

impl<W: FormatWriter> LegacyWriterAdapter<W> {
    pub fn new(writer: W, metadata: ImageMetadata) -> Self {
        LegacyWriterAdapter {
            writer,
            metadata,
            current_id: None,
            series: 0,
        }
    }

    /// Metadata every destination is opened with
    pub fn metadata(&self) -> &ImageMetadata {
        &self.metadata
    }

    /// Destination currently open, if any
    pub fn current_id(&self) -> Option<&str> {
        self.current_id.as_deref()
    }

    /// Opens `id` for writing; reopening the current id is a no-op
    pub fn open_for_write(&mut self, id: &str) -> FormatResult<()> {
        if self.current_id.as_deref() == Some(id) {
            return Ok(());
        }
        if self.current_id.take().is_some() {
            self.writer.close()?;
        }
        self.writer.set_dest(id, self.metadata.clone())?;
        debug!("Legacy adapter opened {}", id);
        self.current_id = Some(id.to_string());
        Ok(())
    }

    /// Selects the series used by `save_bytes`
    pub fn set_series(&mut self, series: i32) -> FormatResult<()> {
        let index = to_index(series, "series")? as usize;
        let count = self.writer.image_count();
        if index >= count {
            return Err(FormatError::out_of_bounds(format!(
                "series is {} but only {} series are defined",
                index, count
            )));
        }
        self.series = index;
        Ok(())
    }

    pub fn series(&self) -> usize {
        self.series
    }

    fn ensure_open(&self) -> FormatResult<()> {
        if self.current_id.is_none() {
            return Err(FormatError::GenericError(
                "no destination: call open_for_write first".to_string(),
            ));
        }
        Ok(())
    }

    /// Writes a whole plane of the current series
    pub fn save_bytes(&mut self, plane_index: i32, buffer: &[u8]) -> FormatResult<()> {
        self.ensure_open()?;
        let plane = to_index(plane_index, "plane index")?;
        let region = Region::full(self.metadata.width(), self.metadata.height());
        self.writer.save_region(self.series, plane, buffer, region)
    }

    /// Writes a rectangle of a plane
    #[allow(clippy::too_many_arguments)]
    pub fn write_plane_region(
        &mut self,
        series_index: i32,
        plane_index: i32,
        buffer: &[u8],
        x: i32,
        y: i32,
        w: i32,
        h: i32,
    ) -> FormatResult<()> {
        self.ensure_open()?;
        let series = to_index(series_index, "series")? as usize;
        let plane = to_index(plane_index, "plane index")?;
        let region = Region::new(
            to_index(x, "x")?,
            to_index(y, "y")?,
            to_index(w, "width")?,
            to_index(h, "height")?,
        );
        self.writer.save_region(series, plane, buffer, region)
    }

    /// Closes the current destination, if any
    pub fn close(&mut self) -> FormatResult<()> {
        if self.current_id.take().is_some() {
            self.writer.close()?;
        }
        Ok(())
    }

    /// Gives the wrapped writer back
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::metadata::{Axis, AxisType, PixelType};

    /// Writer that records every forwarded call
    #[derive(Default)]
    struct RecordingWriter {
        calls: Vec<String>,
        metadata: Option<ImageMetadata>,
    }

    impl FormatWriter for RecordingWriter {
        fn set_dest(&mut self, id: &str, metadata: ImageMetadata) -> FormatResult<()> {
            self.calls.push(format!("set_dest {}", id));
            self.metadata = Some(metadata);
            Ok(())
        }

        fn metadata(&self) -> Option<&ImageMetadata> {
            self.metadata.as_ref()
        }

        fn image_count(&self) -> usize {
            2
        }

        fn save_region(&mut self, series: usize, plane_index: u64, bytes: &[u8], region: Region) -> FormatResult<()> {
            self.calls.push(format!(
                "save {} {} {} {:?}",
                series,
                plane_index,
                bytes.len(),
                (region.x, region.y, region.width, region.height)
            ));
            Ok(())
        }

        fn close(&mut self) -> FormatResult<()> {
            self.calls.push("close".to_string());
            Ok(())
        }
    }

    fn metadata() -> ImageMetadata {
        ImageMetadata::builder("legacy")
            .pixel_type(PixelType::Uint8)
            .axes(vec![Axis::new(AxisType::X, 4), Axis::new(AxisType::Y, 2)])
            .build()
            .unwrap()
    }

    #[test]
    fn test_calls_forwarded_in_order() {
        let mut adapter = LegacyWriterAdapter::new(RecordingWriter::default(), metadata());
        adapter.open_for_write("a.img").unwrap();
        adapter.open_for_write("a.img").unwrap();
        adapter.set_series(1).unwrap();
        adapter.save_bytes(0, &[0u8; 8]).unwrap();
        adapter.write_plane_region(0, 0, &[0u8; 2], 1, 1, 2, 1).unwrap();
        adapter.open_for_write("b.img").unwrap();
        adapter.close().unwrap();
        adapter.close().unwrap();

        assert_eq!(adapter.current_id(), None);
        let writer = adapter.into_inner();
        assert_eq!(
            writer.calls,
            vec![
                "set_dest a.img",
                "save 1 0 8 (0, 0, 4, 2)",
                "save 0 0 2 (1, 1, 2, 1)",
                "close",
                "set_dest b.img",
                "close",
            ]
        );
        assert_eq!(writer.metadata, Some(metadata()));
    }

    #[test]
    fn test_series_bounds() {
        let mut adapter = LegacyWriterAdapter::new(RecordingWriter::default(), metadata());
        assert!(matches!(adapter.set_series(-1), Err(FormatError::OutOfBounds(_))));
        assert!(matches!(adapter.set_series(2), Err(FormatError::OutOfBounds(_))));
        assert_eq!(adapter.series(), 0);
    }

    #[test]
    fn test_negative_arguments_rejected() {
        let mut adapter = LegacyWriterAdapter::new(RecordingWriter::default(), metadata());
        adapter.open_for_write("a.img").unwrap();
        assert!(adapter.save_bytes(-1, &[0u8; 8]).is_err());
        assert!(adapter.write_plane_region(0, 0, &[0u8; 8], 0, -2, 1, 1).is_err());

        let writer = adapter.into_inner();
        assert_eq!(writer.calls, vec!["set_dest a.img"]);
    }

    #[test]
    fn test_write_without_destination() {
        let mut adapter = LegacyWriterAdapter::new(RecordingWriter::default(), metadata());
        assert!(matches!(adapter.save_bytes(0, &[0u8; 8]), Err(FormatError::GenericError(_))));
    }
}
