//! OsSource: the operating system CSPRNG via the `getrandom` crate.

use std::io;

use crate::source::{EntropySource, SourceCategory, SourceInfo};

/// Entropy source backed by the OS random number generator
/// (`getrandom(2)`, `/dev/urandom`, `BCryptGenRandom`, ...).
///
/// Stateless; every instance reads from the same OS pool.
#[derive(Debug, Clone, Copy)]
pub struct OsSource;

static OS_INFO: SourceInfo = SourceInfo {
    name: "os",
    description: "Operating system CSPRNG via getrandom",
    category: SourceCategory::System,
    cryptographic: true,
};

impl OsSource {
    /// A handle on the operating system generator.
    pub fn new() -> Self {
        Self
    }
}

impl Default for OsSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EntropySource for OsSource {
    fn info(&self) -> &SourceInfo {
        &OS_INFO
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) -> io::Result<()> {
        getrandom::fill(dest).map_err(|e| io::Error::other(format!("OS CSPRNG failed: {e}")))
    }
}
