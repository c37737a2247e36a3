//! Large object handles and chunked streaming.
//!
//! Large objects never materialize eagerly. The driver hands out an
//! offset-addressed [`DriverBlob`]; the bridge wraps it in a [`BlobHandle`]
//! whose lifetime is independent of the row cursor that produced it, and
//! [`BlobStream`] adapts any offset-addressed source into a sequential
//! [`std::io::Read`] pulling one chunk at a time.

use bytes::Bytes;
use tracing::trace;

use crate::driver::DriverBlob;
use crate::error::{Error, Result};

/// Default chunk size for streaming blob reads (64 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 65536;

/// An offset-addressed byte source, 0-based at this boundary.
///
/// Implemented by [`BlobHandle`] for driver-side blobs and by native-side
/// sources that feed blob parameters into a prepared statement.
pub trait BlobRead {
    /// Total length in bytes.
    fn blob_len(&mut self) -> Result<u64>;

    /// Read at most `len` bytes starting at `offset` (0-based).
    ///
    /// A shorter (possibly empty) result means the end of the data was
    /// reached.
    fn read_at(&mut self, offset: u64, len: usize) -> Result<Bytes>;
}

/// Owns a driver-side large-object reference.
///
/// The driver addresses blob bytes with 1-based positions; this boundary is
/// 0-based. The +1 correction is applied here, exactly once.
pub struct BlobHandle {
    blob: Box<dyn DriverBlob>,
}

impl BlobHandle {
    /// Wrap a driver blob reference.
    pub fn new(blob: Box<dyn DriverBlob>) -> Self {
        Self { blob }
    }

    /// Total length of the blob in bytes.
    pub fn length(&mut self) -> Result<u64> {
        self.blob.length()
    }

    /// Read at most `len` bytes starting at the 0-based `offset`.
    pub fn read(&mut self, offset: u64, len: usize) -> Result<Bytes> {
        self.blob.read(offset + 1, len)
    }

    /// Write `data` at the 0-based `offset`, returning the bytes written.
    ///
    /// A short write is a hard failure, not a "retry from new offset".
    pub fn write(&mut self, offset: u64, data: &[u8]) -> Result<usize> {
        let written = self.blob.write(offset + 1, data)?;
        if written != data.len() {
            return Err(Error::ShortBlobWrite {
                expected: data.len(),
                written,
            });
        }
        Ok(written)
    }
}

impl BlobRead for BlobHandle {
    fn blob_len(&mut self) -> Result<u64> {
        self.length()
    }

    fn read_at(&mut self, offset: u64, len: usize) -> Result<Bytes> {
        self.read(offset, len)
    }
}

impl std::fmt::Debug for BlobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobHandle").finish_non_exhaustive()
    }
}

impl<T: BlobRead + ?Sized> BlobRead for &mut T {
    fn blob_len(&mut self) -> Result<u64> {
        (**self).blob_len()
    }

    fn read_at(&mut self, offset: u64, len: usize) -> Result<Bytes> {
        (**self).read_at(offset, len)
    }
}

impl<T: BlobRead + ?Sized> BlobRead for Box<T> {
    fn blob_len(&mut self) -> Result<u64> {
        (**self).blob_len()
    }

    fn read_at(&mut self, offset: u64, len: usize) -> Result<Bytes> {
        (**self).read_at(offset, len)
    }
}

/// Pull-based chunked byte stream over a [`BlobRead`] source.
///
/// Buffers one chunk at a time and refills when the current chunk is
/// exhausted. The total length is tracked but never used to bound reads;
/// the consumer is trusted to stop at the advertised length, and refills
/// continue until the source reports a zero-length read.
pub struct BlobStream<S: BlobRead = Box<dyn BlobRead>> {
    source: S,
    /// Advertised total size in bytes.
    size: u64,
    chunk_size: usize,
    chunk: Bytes,
    chunk_pos: usize,
    current_pos: u64,
    done: bool,
}

impl<S: BlobRead> BlobStream<S> {
    /// Create a stream over `source` with the default 64 KiB chunk size.
    pub fn new(mut source: S) -> Result<Self> {
        let size = source.blob_len()?;
        Ok(Self {
            source,
            size,
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk: Bytes::new(),
            chunk_pos: 0,
            current_pos: 0,
            done: false,
        })
    }

    /// Create a stream with an explicit chunk size.
    pub fn with_chunk_size(source: S, chunk_size: usize) -> Result<Self> {
        let mut stream = Self::new(source)?;
        stream.chunk_size = chunk_size.max(1);
        Ok(stream)
    }

    /// Advertised total size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    fn refill(&mut self) -> Result<()> {
        let chunk = self.source.read_at(self.current_pos, self.chunk_size)?;
        trace!(
            offset = self.current_pos,
            len = chunk.len(),
            "blob chunk refill"
        );
        if chunk.is_empty() {
            self.done = true;
        }
        self.current_pos += chunk.len() as u64;
        self.chunk = chunk;
        self.chunk_pos = 0;
        Ok(())
    }
}

impl<S: BlobRead> std::io::Read for BlobStream<S> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.chunk_pos >= self.chunk.len() {
            if self.done {
                return Ok(0);
            }
            self.refill()
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
            if self.chunk.is_empty() {
                return Ok(0);
            }
        }
        let avail = self.chunk.len() - self.chunk_pos;
        let n = avail.min(buf.len());
        buf[..n].copy_from_slice(&self.chunk[self.chunk_pos..self.chunk_pos + n]);
        self.chunk_pos += n;
        Ok(n)
    }
}

impl<S: BlobRead> std::fmt::Debug for BlobStream<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobStream")
            .field("size", &self.size)
            .field("chunk_size", &self.chunk_size)
            .field("current_pos", &self.current_pos)
            .finish_non_exhaustive()
    }
}
