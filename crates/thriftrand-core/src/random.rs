//! The uniform random capability: ranges, fractions, shuffles, raw bytes.
//!
//! Everything here is arithmetic on top of two primitives: an exact uniform
//! draw from `[0, modulus)` and a raw byte pass-through. [`Generator`]
//! supplies both; the derived operations come for free.
//!
//! [`Generator`]: crate::Generator

use crate::buffer::MAX_MODULUS;
use crate::error::{Error, Result};

/// Fractional precision of `f64` (52 explicit mantissa bits).
const F64_SCALE: u64 = 1 << 52;

/// Unbiased random values of arbitrary range.
///
/// Implementors provide [`next_u64_below`](Self::next_u64_below) and
/// [`fill_raw_bytes`](Self::fill_raw_bytes). Argument errors are raised
/// before any entropy is consumed.
pub trait UniformRandom {
    /// Uniform integer in `[0, modulus)` for `1 <= modulus <= 2^56`.
    fn next_u64_below(&mut self, modulus: u64) -> Result<u64>;

    /// Fill `dest` straight from the entropy source, bypassing any buffered
    /// entropy.
    fn fill_raw_bytes(&mut self, dest: &mut [u8]) -> Result<()>;

    /// Non-negative integer in `[0, i32::MAX)`.
    fn next_int(&mut self) -> Result<i32> {
        let n = self.next_u64_below(i32::MAX as u64)?;
        Ok(n as i32)
    }

    /// Integer in `[0, max)`. Fails with [`Error::InvalidRange`] if `max <= 0`.
    fn next_below(&mut self, max: i32) -> Result<i32> {
        self.next_in_range(0, max)
    }

    /// Integer in `[min, max)`. Fails with [`Error::InvalidRange`] if
    /// `max <= min`.
    fn next_in_range(&mut self, min: i32, max: i32) -> Result<i32> {
        let n = self.next_i64_in_range(i64::from(min), i64::from(max))?;
        Ok(n as i32)
    }

    /// Integer in `[min, max)` over 64-bit bounds.
    ///
    /// The span `max - min` may not exceed `2^56`
    /// ([`Error::InvalidModulus`] otherwise).
    fn next_i64_in_range(&mut self, min: i64, max: i64) -> Result<i64> {
        if max <= min {
            return Err(Error::InvalidRange { min, max });
        }
        let span = max.abs_diff(min);
        if span > MAX_MODULUS {
            return Err(Error::InvalidModulus { modulus: span });
        }
        let offset = self.next_u64_below(span)?;
        Ok(min + offset as i64)
    }

    /// Fraction in `[0, 1)` with 52 bits of precision. Never returns `1.0`.
    fn next_f64(&mut self) -> Result<f64> {
        let n = self.next_u64_below(F64_SCALE)?;
        Ok(n as f64 / F64_SCALE as f64)
    }

    /// Permute `items` in place; every ordering is equally likely.
    fn shuffle<T>(&mut self, items: &mut [T]) -> Result<()>
    where
        Self: Sized,
    {
        let len = items.len();
        for i in 0..len.saturating_sub(1) {
            let j = i + self.next_u64_below((len - i) as u64)? as usize;
            items.swap(i, j);
        }
        Ok(())
    }
}
