//! # thriftrand-core
//!
//! **Unbiased random ranges from an entropy source, one byte at a time.**
//!
//! `thriftrand-core` turns a stream of uniformly random bytes (the OS CSPRNG,
//! a hardware device, a capture file) into unbiased integers of any range,
//! fractions in `[0, 1)` and shuffles, while reading the fewest source bytes
//! the information content allows.
//!
//! ## Quick Start
//!
//! ```no_run
//! use thriftrand_core::{Generator, UniformRandom};
//!
//! let mut rng = Generator::os();
//!
//! let die = rng.next_in_range(1, 7)?;
//! let coin = rng.next_below(2)?;
//! let x = rng.next_f64()?;
//!
//! let mut deck: Vec<u32> = (0..52).collect();
//! rng.shuffle(&mut deck)?;
//!
//! let stats = rng.stats();
//! println!("{} draws, {:.1}% of read entropy delivered", stats.draws, 100.0 * stats.efficiency());
//! # Ok::<(), thriftrand_core::Error>(())
//! ```
//!
//! ## Architecture
//!
//! Source → EntropyBuffer (refill) → reduce(modulus) → derived operations
//!
//! - [`EntropySource`]: anything that can fill a byte slice. See [`sources`].
//! - [`EntropyBuffer`]: a uniform value over `[0, size)` plus the exact
//!   split/factor reduction that serves any modulus without bias.
//! - [`UniformRandom`]: ranges, fractions, shuffles and raw bytes, all built
//!   on a single reduction primitive.
//! - [`Generator`]: a source and a buffer; implements [`UniformRandom`] and
//!   `rand::TryRngCore`.
//!
//! Generators are not internally synchronized. Wrap one in a mutex to share
//! it, or create one per thread.

pub mod buffer;
pub mod error;
pub mod generator;
pub mod random;
pub mod source;
pub mod sources;

pub use buffer::{EntropyBuffer, MAX_MODULUS, REFILL_THRESHOLD};
pub use error::{Error, Result};
pub use generator::{Generator, GeneratorStats};
pub use random::UniformRandom;
pub use source::{EntropySource, SourceCategory, SourceInfo};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
