//! ReaderSource: entropy from any byte stream implementing [`Read`].
//!
//! Useful for device nodes such as `/dev/urandom` or `/dev/hwrng`, for
//! capture files recorded from a hardware generator, and for pipes fed by an
//! external TRNG. Bytes are passed through as-is; the stream is trusted to be
//! uniform.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::source::{EntropySource, SourceCategory, SourceInfo};

/// Entropy source that reads from a stream.
///
/// A stream that ends before a fill is satisfied yields
/// [`io::ErrorKind::UnexpectedEof`]; the partially read bytes are discarded.
/// When constructed with [`ReaderSource::open`] the file handle is owned and
/// closed when the source is dropped.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
    info: &'static SourceInfo,
}

static STREAM_INFO: SourceInfo = SourceInfo {
    name: "stream",
    description: "Bytes read from a caller-supplied stream",
    category: SourceCategory::Stream,
    cryptographic: false,
};

static DEVICE_INFO: SourceInfo = SourceInfo {
    name: "device",
    description: "Bytes read from a random device node",
    category: SourceCategory::Stream,
    cryptographic: true,
};

impl<R: Read + Send> ReaderSource<R> {
    /// Wrap an arbitrary stream. Reported as non-cryptographic.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            info: &STREAM_INFO,
        }
    }

    /// The underlying stream.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Unwrap the underlying stream.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl ReaderSource<File> {
    /// Open a random device or capture file.
    ///
    /// Paths under `/dev/` are reported as cryptographic devices.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let info = if path.starts_with("/dev") {
            &DEVICE_INFO
        } else {
            &STREAM_INFO
        };
        log::debug!("opened entropy stream {} ({})", path.display(), info.name);
        Ok(Self { reader: file, info })
    }
}

impl<R: Read + Send> EntropySource for ReaderSource<R> {
    fn info(&self) -> &SourceInfo {
        self.info
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) -> io::Result<()> {
        self.reader.read_exact(dest)
    }
}
