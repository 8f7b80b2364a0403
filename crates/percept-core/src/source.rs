//! Byte-source abstraction: where entity bytes come from.
//!
//! A [`ByteSource`] hands out readers over the underlying storage and
//! declares how often it may be opened. Format matching and analysis honor
//! the declared [`AccessMode`]: a single-use source is opened at most once
//! per attempt and the reader is dropped before control returns.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// How often and how concurrently a source may be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessMode {
    /// The stream can be consumed exactly once.
    SingleUse,
    /// The stream can be reopened after a previous reader is exhausted,
    /// but not read in parallel.
    Reentrant,
    /// The stream can be opened any number of times concurrently.
    Parallel,
}

/// A source of entity bytes with declared length and access mode.
pub trait ByteSource: Send + Sync {
    /// Open a fresh reader positioned at the start of the stream.
    ///
    /// # Errors
    /// Returns an error if the underlying storage cannot be opened, or if
    /// a [`AccessMode::SingleUse`] source was already consumed.
    fn open(&self) -> io::Result<Box<dyn Read + Send>>;

    /// Declared length in bytes, when known up front.
    fn len(&self) -> Option<u64>;

    /// Whether the declared length is zero.
    fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// The declared access mode.
    fn access_mode(&self) -> AccessMode;

    /// An optional human-oriented name (file name, archive entry path).
    fn name(&self) -> Option<&str> {
        None
    }
}

/// Shared immutable bytes that implement `AsRef<[u8]>` for cursor reads.
#[derive(Clone)]
struct SharedBytes(Arc<[u8]>);

impl AsRef<[u8]> for SharedBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// In-memory byte source; freely parallel.
#[derive(Clone)]
pub struct BytesSource {
    data: SharedBytes,
    name: Option<String>,
}

impl BytesSource {
    /// Wrap a byte buffer.
    #[must_use = "creates a source that should be read"]
    pub fn new(data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            data: SharedBytes(data.into()),
            name: None,
        }
    }

    /// Attach a human-oriented name.
    #[must_use = "returns the source with the name attached"]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The underlying bytes.
    #[inline]
    #[must_use = "returns the wrapped bytes"]
    pub fn bytes(&self) -> &[u8] {
        self.data.as_ref()
    }
}

impl ByteSource for BytesSource {
    fn open(&self) -> io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(Cursor::new(self.data.clone())))
    }

    fn len(&self) -> Option<u64> {
        Some(self.data.as_ref().len() as u64)
    }

    fn access_mode(&self) -> AccessMode {
        AccessMode::Parallel
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// File-system byte source; reentrant (a new handle per open).
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Wrap a file path. The file is opened lazily on [`ByteSource::open`].
    #[must_use = "creates a source that should be read"]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The wrapped path.
    #[inline]
    #[must_use = "returns the wrapped path"]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for FileSource {
    fn open(&self) -> io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(File::open(&self.path)?))
    }

    fn len(&self) -> Option<u64> {
        std::fs::metadata(&self.path).ok().map(|m| m.len())
    }

    fn access_mode(&self) -> AccessMode {
        AccessMode::Reentrant
    }

    fn name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }
}

/// Read at most `limit` bytes from the start of `source`.
///
/// Used by the format matcher to grab header bytes in one pass. A short
/// read (stream shorter than `limit`) is not an error; the returned buffer
/// is simply shorter.
///
/// # Errors
/// Returns an error if the source cannot be opened or reading fails.
pub fn read_prefix(source: &dyn ByteSource, limit: usize) -> io::Result<Vec<u8>> {
    let mut reader = source.open()?;
    let mut buf = vec![0u8; limit];
    let mut filled = 0;
    while filled < limit {
        match reader.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    buf.truncate(filled);
    Ok(buf)
}
