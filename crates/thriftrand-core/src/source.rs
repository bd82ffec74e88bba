//! Entropy source capability.
//!
//! The generator never produces randomness of its own. Every bit it hands out
//! comes from an [`EntropySource`], which only has to fill a byte slice with
//! independent, uniformly distributed bytes.

use std::io;

/// Where a source gets its bytes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceCategory {
    /// Operating system CSPRNG.
    System,
    /// An arbitrary byte stream (device node, capture file, pipe).
    Stream,
    /// A pseudo-random generator; reproducible, not for secrets.
    Deterministic,
}

impl std::fmt::Display for SourceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::Stream => write!(f, "stream"),
            Self::Deterministic => write!(f, "deterministic"),
        }
    }
}

/// Metadata about an entropy source.
#[derive(Debug, Clone)]
pub struct SourceInfo {
    /// Short identifier (e.g. `"os"`).
    pub name: &'static str,
    /// One-line human-readable description.
    pub description: &'static str,
    /// Source category for reporting.
    pub category: SourceCategory,
    /// Whether the bytes are suitable for cryptographic use.
    pub cryptographic: bool,
}

/// Trait that every entropy source must implement.
///
/// Implementations may block (waiting on an OS pool, a pipe) and may fail;
/// failures are returned unchanged to the caller of the generator.
pub trait EntropySource: Send {
    /// Source metadata.
    fn info(&self) -> &SourceInfo;

    /// Fill `dest` completely with fresh random bytes.
    fn fill_bytes(&mut self, dest: &mut [u8]) -> io::Result<()>;

    /// Convenience: name from info.
    fn name(&self) -> &'static str {
        self.info().name
    }
}

// A borrowed source stays with the caller; the generator never drops it.
impl<S: EntropySource + ?Sized> EntropySource for &mut S {
    fn info(&self) -> &SourceInfo {
        (**self).info()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) -> io::Result<()> {
        (**self).fill_bytes(dest)
    }
}

impl<S: EntropySource + ?Sized> EntropySource for Box<S> {
    fn info(&self) -> &SourceInfo {
        (**self).info()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) -> io::Result<()> {
        (**self).fill_bytes(dest)
    }
}
