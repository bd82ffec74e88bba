//! Entropy-frugal random generator.
//!
//! A [`Generator`] pairs one [`EntropySource`] with one [`EntropyBuffer`].
//! Every draw is served from the buffer; the source is only read when the
//! buffer runs low, and then only for the whole bytes needed to top it up.
//!
//! # Source ownership
//!
//! `Generator<S>` owns `S`: dropping the generator drops (closes) the source.
//! To keep ownership with the caller, hand it a borrow instead:
//!
//! ```
//! use thriftrand_core::{Generator, UniformRandom};
//! use thriftrand_core::sources::{CountingSource, OsSource};
//!
//! let mut source = CountingSource::new(OsSource::new());
//! {
//!     let mut rng = Generator::new(&mut source);
//!     let die = rng.next_in_range(1, 7).unwrap();
//!     assert!((1..7).contains(&die));
//! }
//! assert_eq!(source.bytes_read(), 7);
//! ```
//!
//! # Thread safety
//!
//! A generator is plain mutable state with no internal locking. Share one
//! across threads only behind a mutex around the whole generator, or give
//! each thread its own.

use rand::TryRngCore;

use crate::buffer::EntropyBuffer;
use crate::error::Result;
use crate::random::UniformRandom;
use crate::source::EntropySource;
use crate::sources::OsSource;

/// Random generator drawing unbiased values from an entropy source while
/// spending as few source bytes as possible.
pub struct Generator<S> {
    source: S,
    buffer: EntropyBuffer,
    draws: u64,
    bits_delivered: f64,
    raw_bytes: u64,
}

impl<S: EntropySource> Generator<S> {
    /// Wrap `source` with an empty entropy buffer.
    pub fn new(source: S) -> Self {
        log::debug!("generator created over `{}` source", source.name());
        Self {
            source,
            buffer: EntropyBuffer::new(),
            draws: 0,
            bits_delivered: 0.0,
            raw_bytes: 0,
        }
    }

    /// The wrapped entropy source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the source. Reading from it directly does not
    /// disturb the buffered entropy.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Give the source back, discarding any buffered entropy.
    pub fn into_source(self) -> S {
        self.source
    }

    /// Bits of unspent entropy held in the buffer.
    pub fn buffered_bits(&self) -> f64 {
        self.buffer.bits()
    }

    /// Consumption counters since construction.
    pub fn stats(&self) -> GeneratorStats {
        GeneratorStats {
            draws: self.draws,
            bits_delivered: self.bits_delivered,
            entropy_bytes: self.buffer.bytes_read(),
            raw_bytes: self.raw_bytes,
            rejections: self.buffer.rejections(),
            buffered_bits: self.buffer.bits(),
        }
    }
}

impl Generator<OsSource> {
    /// Generator over the operating system CSPRNG.
    pub fn os() -> Self {
        Self::new(OsSource::new())
    }
}

impl<S: EntropySource> UniformRandom for Generator<S> {
    fn next_u64_below(&mut self, modulus: u64) -> Result<u64> {
        let n = self.buffer.reduce(modulus, &mut self.source)?;
        self.draws += 1;
        self.bits_delivered += (modulus as f64).log2();
        Ok(n)
    }

    fn fill_raw_bytes(&mut self, dest: &mut [u8]) -> Result<()> {
        self.source.fill_bytes(dest)?;
        self.raw_bytes += dest.len() as u64;
        Ok(())
    }
}

/// `rand` interop. Use [`TryRngCore::unwrap_err`] to get an infallible
/// `RngCore` for the `rand::Rng` helpers.
impl<S: EntropySource> TryRngCore for Generator<S> {
    type Error = crate::error::Error;

    fn try_next_u32(&mut self) -> Result<u32> {
        let n = self.next_u64_below(1 << 32)?;
        Ok(n as u32)
    }

    fn try_next_u64(&mut self) -> Result<u64> {
        let hi = self.try_next_u32()?;
        let lo = self.try_next_u32()?;
        Ok((u64::from(hi) << 32) | u64::from(lo))
    }

    fn try_fill_bytes(&mut self, dst: &mut [u8]) -> Result<()> {
        self.fill_raw_bytes(dst)
    }
}

/// Entropy consumption counters for a [`Generator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorStats {
    /// Successful buffered draws.
    pub draws: u64,
    /// Information handed out by those draws, `Σ log2(modulus)`.
    pub bits_delivered: f64,
    /// Bytes read from the source to refill the buffer.
    pub entropy_bytes: u64,
    /// Bytes passed straight through by raw-byte requests.
    pub raw_bytes: u64,
    /// Draws that landed in a split remainder and retried.
    pub rejections: u64,
    /// Entropy currently held in the buffer, in bits.
    pub buffered_bits: f64,
}

impl GeneratorStats {
    /// Bits delivered per bit read through the buffer. Tends to 1.0 over long
    /// runs; 0.0 before the first refill.
    pub fn efficiency(&self) -> f64 {
        if self.entropy_bytes == 0 {
            return 0.0;
        }
        self.bits_delivered / (self.entropy_bytes * 8) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::sources::{CountingSource, ReaderSource, RngSource};

    fn counting(seed: u64) -> Generator<CountingSource<RngSource<rand::rngs::StdRng>>> {
        Generator::new(CountingSource::new(RngSource::seeded(seed)))
    }

    // -----------------------------------------------------------------------
    // Construction and ownership
    // -----------------------------------------------------------------------

    #[test]
    fn test_new_generator_is_empty() {
        let g = counting(1);
        let stats = g.stats();
        assert_eq!(stats.draws, 0);
        assert_eq!(stats.entropy_bytes, 0);
        assert_eq!(stats.efficiency(), 0.0);
        assert_eq!(g.buffered_bits(), 0.0);
    }

    #[test]
    fn test_borrowed_source_survives_generator() {
        let mut src = CountingSource::new(RngSource::seeded(3));
        {
            let mut g = Generator::new(&mut src);
            g.next_int().unwrap();
        }
        assert_eq!(src.bytes_read(), 7);
        // Still usable by the caller.
        let mut again = Generator::new(&mut src);
        again.next_int().unwrap();
    }

    #[test]
    fn test_into_source_returns_owned_source() {
        let mut g = counting(4);
        g.next_below(10).unwrap();
        let src = g.into_source();
        assert_eq!(src.bytes_read(), 7);
    }

    #[test]
    fn test_boxed_dyn_source() {
        let source: Box<dyn EntropySource> = Box::new(RngSource::seeded(5));
        let mut g = Generator::new(source);
        assert!(g.next_f64().unwrap() < 1.0);
        assert_eq!(g.source().name(), "rng");
    }

    // -----------------------------------------------------------------------
    // Statistics
    // -----------------------------------------------------------------------

    #[test]
    fn test_stats_track_draws_and_bits() {
        let mut g = counting(6);
        for _ in 0..8 {
            g.next_u64_below(256).unwrap();
        }
        let stats = g.stats();
        assert_eq!(stats.draws, 8);
        assert!((stats.bits_delivered - 64.0).abs() < 1e-9);
        assert_eq!(stats.entropy_bytes, g.source().bytes_read());
        assert_eq!(stats.raw_bytes, 0);
    }

    #[test]
    fn test_stats_raw_bytes_counted_separately() {
        let mut g = counting(7);
        let mut buf = [0u8; 24];
        g.fill_raw_bytes(&mut buf).unwrap();
        let stats = g.stats();
        assert_eq!(stats.raw_bytes, 24);
        assert_eq!(stats.entropy_bytes, 0);
        assert_eq!(stats.draws, 0);
    }

    #[test]
    fn test_efficiency_approaches_one() {
        let mut g = counting(8);
        for _ in 0..10_000 {
            g.next_below(6).unwrap();
        }
        let eff = g.stats().efficiency();
        assert!(eff > 0.99 && eff <= 1.0, "efficiency {eff}");
    }

    // -----------------------------------------------------------------------
    // Errors
    // -----------------------------------------------------------------------

    #[test]
    fn test_invalid_range_consumes_nothing() {
        let mut g = counting(9);
        assert!(matches!(
            g.next_in_range(10, 10),
            Err(Error::InvalidRange { min: 10, max: 10 })
        ));
        assert_eq!(g.source().bytes_read(), 0);
        assert_eq!(g.stats().draws, 0);
    }

    #[test]
    fn test_source_failure_propagates() {
        let mut g = Generator::new(ReaderSource::new(&[1u8, 2, 3][..]));
        assert!(matches!(g.next_int(), Err(Error::Source(_))));
        assert_eq!(g.stats().draws, 0);
        let mut buf = [0u8; 8];
        assert!(matches!(g.fill_raw_bytes(&mut buf), Err(Error::Source(_))));
    }

    // -----------------------------------------------------------------------
    // rand interop
    // -----------------------------------------------------------------------

    #[test]
    fn test_try_rng_core_draws() {
        let mut g = counting(10);
        g.try_next_u32().unwrap();
        g.try_next_u64().unwrap();
        assert_eq!(g.stats().draws, 3);
        let mut buf = [0u8; 5];
        g.try_fill_bytes(&mut buf).unwrap();
        assert_eq!(g.stats().raw_bytes, 5);
    }

    #[test]
    fn test_unwrap_err_works_with_rand_rng() {
        use rand::Rng;
        let mut rng = counting(11).unwrap_err();
        for _ in 0..100 {
            let x: u32 = rng.random_range(0..10);
            assert!(x < 10);
        }
        let f: f64 = rng.random();
        assert!((0.0..1.0).contains(&f));
    }
}
