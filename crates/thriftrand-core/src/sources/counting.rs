//! CountingSource: wraps another source and counts the bytes it delivers.

use std::io;

use crate::source::{EntropySource, SourceInfo};

/// Pass-through wrapper that records how many bytes and fill calls the
/// wrapped source served. Used to measure exact entropy consumption.
#[derive(Debug)]
pub struct CountingSource<S> {
    inner: S,
    bytes: u64,
    calls: u64,
}

impl<S: EntropySource> CountingSource<S> {
    /// Wrap `inner` with all counters at zero.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            bytes: 0,
            calls: 0,
        }
    }

    /// Bytes delivered so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes
    }

    /// Bits delivered so far.
    pub fn bits_read(&self) -> u64 {
        self.bytes * 8
    }

    /// Successful fill calls so far.
    pub fn calls(&self) -> u64 {
        self.calls
    }

    /// Reset both counters to zero.
    pub fn reset(&mut self) {
        self.bytes = 0;
        self.calls = 0;
    }

    /// The wrapped source.
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    /// Unwrap, discarding the counters.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: EntropySource> EntropySource for CountingSource<S> {
    fn info(&self) -> &SourceInfo {
        self.inner.info()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) -> io::Result<()> {
        self.inner.fill_bytes(dest)?;
        self.bytes += dest.len() as u64;
        self.calls += 1;
        Ok(())
    }
}
