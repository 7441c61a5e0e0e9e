//! Backing providers for data handles
//!
//! A provider is a positionless byte store: the `DataHandle` owns the cursor
//! and asks the provider for bytes at absolute offsets. Providers differ in
//! what they can do. Every provider reads; some know their length up front;
//! some can grow when written past their end.

use log::debug;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::io::seekable::{self, SeekableReader};

/// Capability set of a backing byte store
pub trait Provider: Send + Sync {
    /// Reads up to `buf.len()` bytes starting at `offset`
    ///
    /// Returns the number of bytes read; 0 means `offset` is at or past the
    /// end of the data.
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize>;

    /// Total length in bytes, if known
    fn length(&mut self) -> io::Result<Option<u64>>;

    /// Writes `buf` at `offset`, growing the store if needed
    fn write_at(&mut self, _offset: u64, _buf: &[u8]) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("{} is read-only", self.name()),
        ))
    }

    /// Whether `write_at` is supported
    fn can_grow(&self) -> bool {
        false
    }

    /// Releases the underlying resource
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Identifier for logging
    fn name(&self) -> &str;
}

/// In-memory provider over a byte vector
pub struct MemoryProvider {
    data: Vec<u8>,
    writable: bool,
    name: String,
}

impl MemoryProvider {
    /// Read-only provider over `data`
    pub fn new(data: Vec<u8>) -> Self {
        MemoryProvider {
            data,
            writable: false,
            name: "memory".to_string(),
        }
    }

    /// Provider that accepts writes and grows on demand
    pub fn writable(data: Vec<u8>) -> Self {
        MemoryProvider {
            data,
            writable: true,
            name: "memory (rw)".to_string(),
        }
    }

    /// Consumes the provider and returns its bytes
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    /// Current contents
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }
}

impl Provider for MemoryProvider {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        let len = self.data.len() as u64;
        if offset >= len {
            return Ok(0);
        }
        let start = offset as usize;
        let count = buf.len().min(self.data.len() - start);
        buf[..count].copy_from_slice(&self.data[start..start + count]);
        Ok(count)
    }

    fn length(&mut self) -> io::Result<Option<u64>> {
        Ok(Some(self.data.len() as u64))
    }

    fn write_at(&mut self, offset: u64, buf: &[u8]) -> io::Result<()> {
        if !self.writable {
            return Err(io::Error::new(io::ErrorKind::Unsupported, "memory provider is read-only"));
        }
        let end = offset
            .checked_add(buf.len() as u64)
            .and_then(|end| usize::try_from(end).ok())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "write extends past the addressable range"))?;
        let start = offset as usize;
        if end > self.data.len() {
            self.data.resize(end, 0);
        }
        self.data[start..end].copy_from_slice(buf);
        Ok(())
    }

    fn can_grow(&self) -> bool {
        self.writable
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Local random-access file provider
pub struct FileProvider {
    file: Option<File>,
    writable: bool,
    path: String,
}

impl FileProvider {
    /// Opens an existing file for reading
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(FileProvider {
            file: Some(file),
            writable: false,
            path: path.as_ref().display().to_string(),
        })
    }

    /// Creates (or truncates) a file for reading and writing
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path.as_ref())?;
        Ok(FileProvider {
            file: Some(file),
            writable: true,
            path: path.as_ref().display().to_string(),
        })
    }

    fn file(&mut self) -> io::Result<&mut File> {
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "file already closed"))
    }
}

impl Provider for FileProvider {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        let file = self.file()?;
        file.seek(SeekFrom::Start(offset))?;
        let mut total = 0;
        while total < buf.len() {
            match file.read(&mut buf[total..]) {
                Ok(0) => break,
                Ok(n) => total += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(total)
    }

    fn length(&mut self) -> io::Result<Option<u64>> {
        let file = self.file()?;
        Ok(Some(file.metadata()?.len()))
    }

    fn write_at(&mut self, offset: u64, buf: &[u8]) -> io::Result<()> {
        if !self.writable {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} was opened read-only", self.path),
            ));
        }
        let file = self.file()?;
        file.seek(SeekFrom::Start(offset))?;
        file.write_all(buf)
    }

    fn can_grow(&self) -> bool {
        self.writable
    }

    fn close(&mut self) -> io::Result<()> {
        if let Some(mut file) = self.file.take() {
            if self.writable {
                file.flush()?;
            }
            debug!("Closed file provider for {}", self.path);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.path
    }
}

/// Read-only provider over any seekable reader (cursors, buffered readers)
pub struct ReaderProvider<R: SeekableReader> {
    reader: R,
    name: String,
}

impl<R: SeekableReader> ReaderProvider<R> {
    /// Wraps `reader`; `name` is used for logging only
    pub fn new(reader: R, name: &str) -> Self {
        ReaderProvider {
            reader,
            name: name.to_string(),
        }
    }
}

impl<R: SeekableReader> Provider for ReaderProvider<R> {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.seek(SeekFrom::Start(offset))?;
        let mut total = 0;
        while total < buf.len() {
            match self.reader.read(&mut buf[total..]) {
                Ok(0) => break,
                Ok(n) => total += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(total)
    }

    fn length(&mut self) -> io::Result<Option<u64>> {
        seekable::stream_length(&mut self.reader)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Forward-only source of unknown length, such as a partial network download
///
/// Bytes pulled from the source are retained so that backward seeks can be
/// served. The length becomes known once the source reports end of data.
pub struct StreamProvider<R: Read + Send + Sync> {
    source: Option<R>,
    fetched: Vec<u8>,
    exhausted: bool,
    chunk_size: usize,
    name: String,
}

impl<R: Read + Send + Sync> StreamProvider<R> {
    /// Wraps a forward-only source
    pub fn new(source: R, name: &str) -> Self {
        StreamProvider {
            source: Some(source),
            fetched: Vec::new(),
            exhausted: false,
            chunk_size: 8192,
            name: name.to_string(),
        }
    }

    /// Sets how many bytes are pulled from the source at a time
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Pulls from the source until at least `end` bytes are retained or the
    /// source is exhausted
    fn fill_to(&mut self, end: u64) -> io::Result<()> {
        let mut chunk = vec![0u8; self.chunk_size];
        while !self.exhausted && (self.fetched.len() as u64) < end {
            let source = match self.source.as_mut() {
                Some(source) => source,
                None => return Err(io::Error::new(io::ErrorKind::NotConnected, "stream already closed")),
            };
            match source.read(&mut chunk) {
                Ok(0) => {
                    self.exhausted = true;
                    debug!("Stream {} exhausted after {} bytes", self.name, self.fetched.len());
                }
                Ok(n) => self.fetched.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

impl<R: Read + Send + Sync> Provider for StreamProvider<R> {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        self.fill_to(offset.saturating_add(buf.len() as u64))?;
        let retained = self.fetched.len() as u64;
        if offset >= retained {
            return Ok(0);
        }
        let start = offset as usize;
        let count = buf.len().min(self.fetched.len() - start);
        buf[..count].copy_from_slice(&self.fetched[start..start + count]);
        Ok(count)
    }

    fn length(&mut self) -> io::Result<Option<u64>> {
        if self.exhausted {
            Ok(Some(self.fetched.len() as u64))
        } else {
            Ok(None)
        }
    }

    fn close(&mut self) -> io::Result<()> {
        self.source = None;
        self.fetched = Vec::new();
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
