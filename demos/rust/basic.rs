//! Basic usage: dice, coins, fractions and a shuffled deck from the OS
//! entropy source.
//!
//! Run: `cargo run --example basic`

use thriftrand_core::{Generator, UniformRandom};

fn main() -> thriftrand_core::Result<()> {
    let mut rng = Generator::os();

    let dice: Vec<i32> = (0..10)
        .map(|_| rng.next_in_range(1, 7))
        .collect::<thriftrand_core::Result<_>>()?;
    println!("Ten dice: {dice:?}");

    let coin = if rng.next_below(2)? == 0 { "heads" } else { "tails" };
    println!("Coin: {coin}");

    println!("Fraction: {}", rng.next_f64()?);

    let mut deck: Vec<u32> = (0..52).collect();
    rng.shuffle(&mut deck)?;
    println!("Top five cards: {:?}", &deck[..5]);

    let mut key = [0u8; 16];
    rng.fill_raw_bytes(&mut key)?;
    print!("Raw bytes (hex): ");
    for b in &key {
        print!("{b:02x}");
    }
    println!();

    let stats = rng.stats();
    println!(
        "\n{} draws, {:.1} bits delivered from {} buffered bytes ({:.1}% efficient)",
        stats.draws,
        stats.bits_delivered,
        stats.entropy_bytes,
        100.0 * stats.efficiency()
    );
    Ok(())
}
