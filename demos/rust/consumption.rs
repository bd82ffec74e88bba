//! Measure exactly how many source bytes each kind of draw costs.
//!
//! Wraps the OS source in a `CountingSource` and compares the bytes read
//! with `log2(modulus)` bits per draw.
//!
//! Run: `cargo run --example consumption`

use thriftrand_core::sources::{CountingSource, OsSource};
use thriftrand_core::{Generator, UniformRandom};

fn main() -> thriftrand_core::Result<()> {
    let mut source = CountingSource::new(OsSource::new());

    {
        let mut rng = Generator::new(&mut source);
        for _ in 0..100 {
            rng.next_below(2)?;
        }
    }
    println!("100 coin flips:        {:>5} bits (100 ideal)", source.bits_read());

    source.reset();
    {
        let mut rng = Generator::new(&mut source);
        for _ in 0..100 {
            rng.next_below(256 * 256 * 256)?;
        }
    }
    println!("100 three-byte draws:  {:>5} bits (2400 ideal)", source.bits_read());

    source.reset();
    {
        let mut rng = Generator::new(&mut source);
        for _ in 0..100 {
            rng.next_f64()?;
        }
    }
    println!("100 fractions:         {:>5} bits (5200 ideal)", source.bits_read());

    source.reset();
    {
        let mut rng = Generator::new(&mut source);
        let mut deck: Vec<u32> = (0..52).collect();
        rng.shuffle(&mut deck)?;
    }
    // log2(52!) ≈ 225.6
    println!("One 52-card shuffle:   {:>5} bits (226 ideal)", source.bits_read());

    Ok(())
}
