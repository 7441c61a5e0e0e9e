//! Seekable, byte-order-aware cursor over a backing provider
//!
//! `DataHandle` owns the cursor position and a read-ahead window. The window
//! is keyed by absolute offset, so a seek never invalidates anything: the
//! next read is served from the window only when the new position falls
//! inside it, and otherwise refills from the provider at the new position.

use log::{debug, warn};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use crate::config::DecodeConfig;
use crate::format::errors::{FormatError, FormatResult};
use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::provider::{FileProvider, MemoryProvider, Provider, StreamProvider};
use crate::io::seekable::SeekableReader;

/// Whether a handle may write to its provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Reads only; seeks past a known end are rejected
    Read,
    /// Reads and writes; seeking past the end is allowed and writes grow the data
    ReadWrite,
}

/// Cursor over a pluggable byte store
pub struct DataHandle {
    provider: Option<Box<dyn Provider>>,
    position: u64,
    order: ByteOrder,
    mode: AccessMode,
    buffer: Vec<u8>,
    buffer_start: u64,
    buffer_len: usize,
    max_line_length: usize,
    name: String,
}

impl DataHandle {
    /// Creates a handle over `provider` using the given configuration
    pub fn new(provider: Box<dyn Provider>, config: &DecodeConfig) -> Self {
        let mode = if provider.can_grow() { AccessMode::ReadWrite } else { AccessMode::Read };
        let name = provider.name().to_string();
        debug!("Opening handle on {} ({:?}, buffer {} bytes)", name, mode, config.buffer_size);

        DataHandle {
            provider: Some(provider),
            position: 0,
            order: ByteOrder::default(),
            mode,
            buffer: vec![0u8; config.buffer_size.max(1)],
            buffer_start: 0,
            buffer_len: 0,
            max_line_length: config.max_line_length,
            name,
        }
    }

    /// Read-only handle over an in-memory buffer
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self::new(Box::new(MemoryProvider::new(data)), &DecodeConfig::default())
    }

    /// Opens a local file for reading
    pub fn open_file<P: AsRef<Path>>(path: P, config: &DecodeConfig) -> FormatResult<Self> {
        let provider = FileProvider::open(path)?;
        Ok(Self::new(Box::new(provider), config))
    }

    /// Creates a local file for writing
    pub fn create_file<P: AsRef<Path>>(path: P, config: &DecodeConfig) -> FormatResult<Self> {
        let provider = FileProvider::create(path)?;
        Ok(Self::new(Box::new(provider), config))
    }

    /// Handle over a forward-only source of unknown length
    pub fn from_stream<R: Read + Send + Sync + 'static>(source: R, name: &str, config: &DecodeConfig) -> Self {
        Self::new(Box::new(StreamProvider::new(source, name)), config)
    }

    /// Name of the backing resource
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Access mode fixed at creation
    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    /// Current byte order for multi-byte reads
    pub fn order(&self) -> ByteOrder {
        self.order
    }

    /// Sets the byte order used by subsequent multi-byte reads and writes
    pub fn set_order(&mut self, order: ByteOrder) {
        self.order = order;
    }

    /// Whether the handle has been closed
    pub fn is_closed(&self) -> bool {
        self.provider.is_none()
    }

    /// Current cursor position
    pub fn offset(&self) -> u64 {
        self.position
    }

    fn provider(&mut self) -> FormatResult<&mut Box<dyn Provider>> {
        self.provider.as_mut().ok_or(FormatError::ClosedHandle)
    }

    /// Total length in bytes, or `None` while a streaming source has not ended
    pub fn length(&mut self) -> FormatResult<Option<u64>> {
        Ok(self.provider()?.length()?)
    }

    /// Bytes between the cursor and the end, if the length is known
    pub fn remaining(&mut self) -> FormatResult<Option<u64>> {
        let position = self.position;
        Ok(self.length()?.map(|len| len.saturating_sub(position)))
    }

    /// Moves the cursor to an absolute offset
    pub fn seek(&mut self, offset: u64) -> FormatResult<()> {
        let mode = self.mode;
        if let Some(length) = self.length()? {
            if mode == AccessMode::Read && offset > length {
                return Err(FormatError::out_of_bounds(format!(
                    "seek to {} beyond end of {} ({} bytes)",
                    offset, self.name, length
                )));
            }
        }
        self.position = offset;
        Ok(())
    }

    /// Advances the cursor by `count` bytes
    pub fn skip_bytes(&mut self, count: u64) -> FormatResult<()> {
        let target = self
            .position
            .checked_add(count)
            .ok_or_else(|| FormatError::out_of_bounds("skip overflows the offset range"))?;
        self.seek(target)
    }

    fn in_buffer(&self, offset: u64) -> bool {
        offset >= self.buffer_start && offset < self.buffer_start + self.buffer_len as u64
    }

    fn fill_buffer(&mut self, offset: u64) -> FormatResult<()> {
        let provider = self.provider.as_mut().ok_or(FormatError::ClosedHandle)?;
        let read = provider.read_at(offset, &mut self.buffer)?;
        self.buffer_start = offset;
        self.buffer_len = read;
        Ok(())
    }

    /// Reads as many bytes as are available, up to `out.len()`
    ///
    /// Returns the number of bytes read; fewer than requested only at end of data.
    pub fn read_available(&mut self, out: &mut [u8]) -> FormatResult<usize> {
        if self.is_closed() {
            return Err(FormatError::ClosedHandle);
        }

        let mut total = 0;
        while total < out.len() {
            if self.in_buffer(self.position) {
                let start = (self.position - self.buffer_start) as usize;
                let count = (self.buffer_len - start).min(out.len() - total);
                out[total..total + count].copy_from_slice(&self.buffer[start..start + count]);
                total += count;
                self.position += count as u64;
                continue;
            }

            let wanted = out.len() - total;
            if wanted >= self.buffer.len() {
                // Large requests bypass the window
                let provider = self.provider.as_mut().ok_or(FormatError::ClosedHandle)?;
                let read = provider.read_at(self.position, &mut out[total..])?;
                if read == 0 {
                    break;
                }
                total += read;
                self.position += read as u64;
            } else {
                self.fill_buffer(self.position)?;
                if self.buffer_len == 0 {
                    break;
                }
            }
        }

        Ok(total)
    }

    /// Fills `out` completely or fails with `TruncatedRead`
    ///
    /// On failure the cursor is left where the read started.
    pub fn read_fully(&mut self, out: &mut [u8]) -> FormatResult<()> {
        let start = self.position;
        let read = self.read_available(out)?;
        if read < out.len() {
            self.position = start;
            return Err(FormatError::truncated(start, out.len() as u64));
        }
        Ok(())
    }

    /// Reads exactly `count` bytes
    pub fn read_bytes(&mut self, count: usize) -> FormatResult<Vec<u8>> {
        let mut bytes = vec![0u8; count];
        self.read_fully(&mut bytes)?;
        Ok(bytes)
    }

    /// Reads one byte
    pub fn read_byte(&mut self) -> FormatResult<u8> {
        let mut byte = [0u8; 1];
        self.read_fully(&mut byte)?;
        Ok(byte[0])
    }

    fn read_ordered<T>(
        &mut self,
        width: u64,
        read: impl FnOnce(&dyn ByteOrderHandler, &mut dyn SeekableReader) -> io::Result<T>,
    ) -> FormatResult<T> {
        let start = self.position;
        let handler = self.order.handler();
        match read(handler, &mut *self) {
            Ok(value) => Ok(value),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                self.position = start;
                Err(FormatError::truncated(start, width))
            }
            Err(e) => Err(FormatError::from(e)),
        }
    }

    /// Reads a signed 16-bit value in the handle's byte order
    pub fn read_short(&mut self) -> FormatResult<i16> {
        self.read_ordered(2, |h, r| h.read_i16(r))
    }

    /// Reads an unsigned 16-bit value in the handle's byte order
    pub fn read_u16(&mut self) -> FormatResult<u16> {
        self.read_ordered(2, |h, r| h.read_u16(r))
    }

    /// Reads a signed 32-bit value in the handle's byte order
    pub fn read_int(&mut self) -> FormatResult<i32> {
        self.read_ordered(4, |h, r| h.read_i32(r))
    }

    /// Reads an unsigned 32-bit value in the handle's byte order
    pub fn read_u32(&mut self) -> FormatResult<u32> {
        self.read_ordered(4, |h, r| h.read_u32(r))
    }

    /// Reads a signed 64-bit value in the handle's byte order
    pub fn read_long(&mut self) -> FormatResult<i64> {
        self.read_ordered(8, |h, r| h.read_i64(r))
    }

    /// Reads a 32-bit float in the handle's byte order
    pub fn read_f32(&mut self) -> FormatResult<f32> {
        self.read_ordered(4, |h, r| h.read_f32(r))
    }

    /// Reads a 64-bit float in the handle's byte order
    pub fn read_f64(&mut self) -> FormatResult<f64> {
        self.read_ordered(8, |h, r| h.read_f64(r))
    }

    /// Reads `count` bytes as text, dropping trailing NULs
    pub fn read_string(&mut self, count: usize) -> FormatResult<String> {
        let mut bytes = self.read_bytes(count)?;
        while bytes.last() == Some(&0) {
            bytes.pop();
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Reads up to the next `\n`, leaving the cursor just past it
    ///
    /// The terminator (and a preceding `\r`) is not part of the result.
    /// Returns `None` when the cursor is already at the end of the data.
    pub fn read_line(&mut self) -> FormatResult<Option<String>> {
        if self.is_closed() {
            return Err(FormatError::ClosedHandle);
        }

        let start = self.position;
        let mut line = Vec::new();
        let mut terminated = false;

        loop {
            if !self.in_buffer(self.position) {
                self.fill_buffer(self.position)?;
                if self.buffer_len == 0 {
                    break;
                }
            }

            let from = (self.position - self.buffer_start) as usize;
            let window = &self.buffer[from..self.buffer_len];
            match window.iter().position(|&b| b == b'\n') {
                Some(index) => {
                    line.extend_from_slice(&window[..index]);
                    self.position += index as u64 + 1;
                    terminated = true;
                }
                None => {
                    line.extend_from_slice(window);
                    self.position += window.len() as u64;
                }
            }

            if line.len() > self.max_line_length {
                self.position = start;
                return Err(FormatError::InvalidHeader(format!(
                    "line at offset {} exceeds {} bytes",
                    start, self.max_line_length
                )));
            }
            if terminated {
                break;
            }
        }

        if !terminated && line.is_empty() {
            return Ok(None);
        }
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Ok(Some(String::from_utf8_lossy(&line).into_owned()))
    }

    /// Writes bytes at the cursor, growing the resource if needed
    pub fn write_bytes(&mut self, bytes: &[u8]) -> FormatResult<()> {
        if self.mode != AccessMode::ReadWrite {
            return Err(FormatError::IoError(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} is not open for writing", self.name),
            )));
        }
        let position = self.position;
        self.provider()?.write_at(position, bytes)?;
        // Written bytes may overlap the window
        self.buffer_len = 0;
        self.position += bytes.len() as u64;
        Ok(())
    }

    /// Writes a u16 in the handle's byte order
    pub fn write_u16(&mut self, value: u16) -> FormatResult<()> {
        let bytes = self.order.u16_bytes(value);
        self.write_bytes(&bytes)
    }

    /// Writes a u32 in the handle's byte order
    pub fn write_u32(&mut self, value: u32) -> FormatResult<()> {
        let bytes = self.order.u32_bytes(value);
        self.write_bytes(&bytes)
    }

    /// Releases the backing provider
    ///
    /// Every later operation, including a second close, fails with `ClosedHandle`.
    pub fn close(&mut self) -> FormatResult<()> {
        let mut provider = self.provider.take().ok_or(FormatError::ClosedHandle)?;
        self.buffer_len = 0;
        debug!("Closing handle on {}", self.name);
        provider.close()?;
        Ok(())
    }
}

impl Drop for DataHandle {
    fn drop(&mut self) {
        if !self.is_closed() {
            if let Err(e) = self.close() {
                warn!("Error closing {}: {}", self.name, e);
            }
        }
    }
}

impl Read for DataHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read_available(buf).map_err(io::Error::from)
    }
}

impl Seek for DataHandle {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::Current(delta) => self.position.checked_add_signed(delta),
            SeekFrom::End(delta) => {
                let length = self.length()?.ok_or_else(|| {
                    io::Error::new(io::ErrorKind::Unsupported, "length of a streaming source is not known yet")
                })?;
                length.checked_add_signed(delta)
            }
        };
        let target = target.ok_or_else(|| {
            io::Error::from(FormatError::out_of_bounds("seek before the start of the data"))
        })?;
        DataHandle::seek(self, target)?;
        Ok(target)
    }
}
