//! Entropy buffer and range reduction.
//!
//! The buffer holds a single integer `value` that is uniformly distributed
//! over `[0, size)`, i.e. `log2(size)` bits of unspent entropy. Two exact
//! operations let it serve any modulus without bias:
//!
//! - **split**: `[0, size)` is the disjoint union of `[0, size - r)` and
//!   `[size - r, size)` with `r = size % modulus`. Conditioned on which part
//!   `value` falls in, it stays uniform over that part.
//! - **factor**: when `size` is a multiple of `modulus`, `value % modulus`
//!   and `value / modulus` are independent and uniform over `[0, modulus)`
//!   and `[0, size / modulus)`.
//!
//! The first is handed to the caller, the second stays buffered. Source
//! bytes are only read when the buffer drops below [`REFILL_THRESHOLD`].
//!
//! ```text
//! source bytes → refill → split → factor → sample
//!                  ^          |
//!                  └──────────┘  (value landed in the remainder)
//! ```

use std::io;

use crate::error::{Error, Result};
use crate::source::EntropySource;

/// Refill target: `size` is grown until it is at least `2^56`.
///
/// Keeping one byte of headroom below `2^64` means a refill can always
/// shift in whole bytes without overflowing.
pub const REFILL_THRESHOLD: u64 = 1 << 56;

/// Largest modulus [`EntropyBuffer::reduce`] accepts.
///
/// A refilled buffer is only guaranteed to span `2^56` values, so larger
/// moduli could never be factored out of it.
pub const MAX_MODULUS: u64 = REFILL_THRESHOLD;

/// A uniformly random integer in `[0, size)`.
///
/// Not synchronized; callers sharing a buffer across threads must wrap
/// its owner in a mutex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntropyBuffer {
    value: u64,
    size: u64,
    bytes_read: u64,
    rejections: u64,
}

impl EntropyBuffer {
    /// An empty buffer: `value = 0`, `size = 1`, zero bits of entropy.
    pub fn new() -> Self {
        Self {
            value: 0,
            size: 1,
            bytes_read: 0,
            rejections: 0,
        }
    }

    /// Number of equally likely states the buffer currently spans.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Bits of entropy currently buffered (`log2(size)`).
    pub fn bits(&self) -> f64 {
        (self.size as f64).log2()
    }

    /// Total bytes this buffer has pulled from its source.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// How many times a reduction landed in the split remainder and had to
    /// retry on the smaller partition.
    pub fn rejections(&self) -> u64 {
        self.rejections
    }

    /// Grow `size` to at least [`REFILL_THRESHOLD`] using the fewest whole
    /// bytes from `source`. No-op when the buffer is already full enough.
    ///
    /// On error the buffer is left untouched.
    pub fn refill<S: EntropySource + ?Sized>(&mut self, source: &mut S) -> io::Result<()> {
        if self.size >= REFILL_THRESHOLD {
            return Ok(());
        }

        // At most 7 bytes: size >= 1 and each byte multiplies it by 256.
        let mut needed = 0usize;
        let mut grown = self.size;
        while grown < REFILL_THRESHOLD {
            grown <<= 8;
            needed += 1;
        }

        let mut bytes = [0u8; 8];
        if let Err(e) = source.fill_bytes(&mut bytes[..needed]) {
            log::warn!("entropy source `{}` failed during refill: {e}", source.name());
            return Err(e);
        }

        let incoming = bytes[..needed]
            .iter()
            .fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
        self.value = (self.value << (8 * needed)) | incoming;
        self.size = grown;
        self.bytes_read += needed as u64;

        log::trace!("refilled {needed} byte(s), buffer now spans 2^{:.2}", self.bits());
        Ok(())
    }

    /// Draw a uniform sample from `[0, modulus)`.
    ///
    /// Consumes `log2(modulus)` bits of buffered entropy on the fast path and
    /// keeps the rest for later calls. `modulus == 1` returns `0` without
    /// touching the source.
    ///
    /// Fails with [`Error::InvalidModulus`] for `0` or anything above
    /// [`MAX_MODULUS`], before any state changes.
    pub fn reduce<S: EntropySource + ?Sized>(
        &mut self,
        modulus: u64,
        source: &mut S,
    ) -> Result<u64> {
        if !(1..=MAX_MODULUS).contains(&modulus) {
            return Err(Error::InvalidModulus { modulus });
        }
        if modulus == 1 {
            return Ok(0);
        }

        loop {
            self.refill(source)?;

            // size >= 2^56 >= modulus here, so new_size >= modulus > 0.
            let remainder = self.size % modulus;
            let new_size = self.size - remainder;

            if self.value < new_size {
                let result = self.value % modulus;
                self.value /= modulus;
                self.size = new_size / modulus;
                return Ok(result);
            }

            self.value -= new_size;
            self.size = remainder;
            self.rejections += 1;
            log::debug!(
                "split rejection for modulus {modulus}: keeping remainder partition of {remainder}"
            );
        }
    }
}

impl Default for EntropyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{SourceCategory, SourceInfo};

    // -----------------------------------------------------------------------
    // Scripted source for testing
    // -----------------------------------------------------------------------

    /// Replays a fixed byte script, then fails with `UnexpectedEof`.
    struct ScriptSource {
        info: SourceInfo,
        bytes: Vec<u8>,
        pos: usize,
        calls: Vec<usize>,
    }

    impl ScriptSource {
        fn new(bytes: Vec<u8>) -> Self {
            Self {
                info: SourceInfo {
                    name: "script",
                    description: "scripted bytes",
                    category: SourceCategory::Deterministic,
                    cryptographic: false,
                },
                bytes,
                pos: 0,
                calls: Vec::new(),
            }
        }

        fn repeat(byte: u8, n: usize) -> Self {
            Self::new(vec![byte; n])
        }
    }

    impl EntropySource for ScriptSource {
        fn info(&self) -> &SourceInfo {
            &self.info
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) -> io::Result<()> {
            let end = self.pos + dest.len();
            if end > self.bytes.len() {
                return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"));
            }
            dest.copy_from_slice(&self.bytes[self.pos..end]);
            self.pos = end;
            self.calls.push(dest.len());
            Ok(())
        }
    }

    // -----------------------------------------------------------------------
    // Refill tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_new_buffer_is_empty() {
        let buf = EntropyBuffer::new();
        assert_eq!(buf.size(), 1);
        assert_eq!(buf.bits(), 0.0);
        assert_eq!(buf.bytes_read(), 0);
    }

    #[test]
    fn test_refill_from_empty_reads_seven_bytes() {
        let mut src = ScriptSource::new(vec![1, 2, 3, 4, 5, 6, 7]);
        let mut buf = EntropyBuffer::new();
        buf.refill(&mut src).unwrap();
        assert_eq!(buf.size(), REFILL_THRESHOLD);
        assert_eq!(buf.value, 0x01_02_03_04_05_06_07);
        assert_eq!(src.calls, vec![7]);
    }

    #[test]
    fn test_refill_is_noop_when_full() {
        let mut src = ScriptSource::repeat(0, 7);
        let mut buf = EntropyBuffer::new();
        buf.refill(&mut src).unwrap();
        buf.refill(&mut src).unwrap();
        assert_eq!(src.calls, vec![7]);
        assert_eq!(buf.bytes_read(), 7);
    }

    #[test]
    fn test_refill_reads_minimal_bytes() {
        // 2^55 needs one byte to reach 2^63.
        let mut src = ScriptSource::new(vec![0xAB]);
        let mut buf = EntropyBuffer {
            value: 5,
            size: 1 << 55,
            bytes_read: 0,
            rejections: 0,
        };
        buf.refill(&mut src).unwrap();
        assert_eq!(buf.size(), 1 << 63);
        assert_eq!(buf.value, (5 << 8) | 0xAB);
        assert_eq!(src.calls, vec![1]);
    }

    #[test]
    fn test_refill_non_power_of_two_size() {
        // 3 * 2^48 < 2^56 and 3 * 2^56 fits in 64 bits: one byte.
        let mut src = ScriptSource::repeat(0xFF, 1);
        let mut buf = EntropyBuffer {
            value: 2,
            size: 3 << 48,
            bytes_read: 0,
            rejections: 0,
        };
        buf.refill(&mut src).unwrap();
        assert_eq!(buf.size(), 3 << 56);
        assert!(buf.value < buf.size());
    }

    #[test]
    fn test_refill_error_leaves_buffer_untouched() {
        let mut src = ScriptSource::new(vec![1, 2]);
        let mut buf = EntropyBuffer::new();
        let err = buf.refill(&mut src).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert_eq!(buf, EntropyBuffer::new());
    }

    // -----------------------------------------------------------------------
    // Reduction tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_reduce_modulus_one_reads_nothing() {
        let mut src = ScriptSource::new(Vec::new());
        let mut buf = EntropyBuffer::new();
        for _ in 0..100 {
            assert_eq!(buf.reduce(1, &mut src).unwrap(), 0);
        }
        assert!(src.calls.is_empty());
        assert_eq!(buf.size(), 1);
    }

    #[test]
    fn test_reduce_factors_power_of_two() {
        let mut src = ScriptSource::new(vec![0, 0, 0, 0, 0, 0, 0x2D]);
        let mut buf = EntropyBuffer::new();
        // value = 0x2D = 45, 45 % 16 = 13, residue 2 over 2^52.
        assert_eq!(buf.reduce(16, &mut src).unwrap(), 13);
        assert_eq!(buf.size(), 1 << 52);
        assert_eq!(buf.value, 2);
    }

    #[test]
    fn test_reduce_keeps_residual_entropy() {
        let mut src = ScriptSource::repeat(0x5A, 9);
        let mut buf = EntropyBuffer::new();
        let first = buf.reduce(1000, &mut src).unwrap();
        assert!(first < 1000);
        // About 2^46 states survive, so two bytes top the buffer back up.
        assert!(buf.size() > 1 << 46);
        let second = buf.reduce(1000, &mut src).unwrap();
        assert!(second < 1000);
        assert_eq!(src.calls, vec![7, 2]);
    }

    #[test]
    fn test_reduce_rejection_path_uses_remainder() {
        // size = 2^56, modulus 3: remainder 1, new_size = 2^56 - 1.
        // All-ones value lands in the remainder partition.
        let mut src = ScriptSource::new(vec![0xFF; 7]);
        let mut buf = EntropyBuffer::new();
        src.bytes.extend_from_slice(&[0, 0, 0, 0, 0, 0, 7]);
        let out = buf.reduce(3, &mut src).unwrap();
        assert_eq!(buf.rejections(), 1);
        // Remainder partition had size 1 (value 0), refill shifts in 7 bytes.
        assert_eq!(out, 7 % 3);
        assert_eq!(src.calls, vec![7, 7]);
    }

    #[test]
    fn test_reduce_invariant_holds_across_moduli() {
        let bytes: Vec<u8> = (0..4096u32)
            .map(|i| (i.wrapping_mul(2_654_435_761) >> 24) as u8)
           .collect();
        let mut src = ScriptSource::new(bytes);
        let mut buf = EntropyBuffer::new();
        for m in [2u64, 3, 7, 10, 255, 256, 1_000_003, 1 << 40, MAX_MODULUS] {
            for _ in 0..5 {
                let r = buf.reduce(m, &mut src).unwrap();
                assert!(r < m, "sample {r} out of range for modulus {m}");
                assert!(buf.value < buf.size());
                assert!(buf.size() >= 1);
            }
        }
    }

    #[test]
    fn test_reduce_propagates_source_failure() {
        let mut src = ScriptSource::new(vec![1, 2, 3]);
        let mut buf = EntropyBuffer::new();
        match buf.reduce(6, &mut src) {
            Err(Error::Source(e)) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("expected source error, got {other:?}"),
        }
    }

    #[test]
    fn test_reduce_rejects_out_of_range_modulus() {
        let mut src = ScriptSource::repeat(0, 7);
        let mut buf = EntropyBuffer::new();
        for modulus in [0, MAX_MODULUS + 1, u64::MAX] {
            assert!(matches!(
                buf.reduce(modulus, &mut src),
                Err(Error::InvalidModulus { modulus: m }) if m == modulus
            ));
        }
        assert!(src.calls.is_empty());
        assert_eq!(buf, EntropyBuffer::new());
    }
}
