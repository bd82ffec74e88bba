use std::time::Instant;

use thriftrand_core::sources::CountingSource;
use thriftrand_core::{EntropySource, Generator, UniformRandom};

use super::SourceConfig;

/// Moduli benchmarked: powers of two, small dice, a large prime and the
/// fraction scale.
const MODULI: &[u64] = &[2, 3, 6, 10, 52, 100, 1000, 1 << 24, 1_000_000_007, 1 << 52];

struct BenchRow {
    modulus: u64,
    draws: usize,
    bytes_read: u64,
    ideal_bytes: f64,
    naive_bytes: u64,
    rejections: u64,
    elapsed: f64,
}

impl BenchRow {
    /// Information delivered per byte read, 1.0 being optimal.
    fn efficiency(&self) -> f64 {
        if self.bytes_read == 0 {
            0.0
        } else {
            self.ideal_bytes / self.bytes_read as f64
        }
    }
}

pub fn run(source: &SourceConfig<'_>, draws: usize, json: bool) {
    if !json {
        println!("Benchmarking {} moduli, {draws} draws each...\n", MODULI.len());
    }

    let mut rows = Vec::with_capacity(MODULI.len());
    for &modulus in MODULI {
        // Fresh source per modulus so each row starts from an empty buffer.
        let row = super::or_exit(measure(super::make_source(source), modulus, draws));
        rows.push(row);
    }

    if json {
        let out: Vec<serde_json::Value> = rows
            .iter()
            .map(|r| {
                serde_json::json!({
                    "modulus": r.modulus,
                    "draws": r.draws,
                    "bytes_read": r.bytes_read,
                    "ideal_bytes": r.ideal_bytes,
                    "naive_bytes": r.naive_bytes,
                    "rejections": r.rejections,
                    "efficiency": r.efficiency(),
                    "seconds": r.elapsed,
                })
            })
            .collect();
        println!("{:#}", serde_json::Value::Array(out));
        return;
    }

    println!("{}", "=".repeat(82));
    println!(
        "{:<14} {:>10} {:>12} {:>12} {:>12} {:>8} {:>8}",
        "Modulus", "Read(B)", "Ideal(B)", "Naive(B)", "Rejects", "Eff", "Time"
    );
    println!("{}", "-".repeat(82));
    for r in &rows {
        println!(
            "{:<14} {:>10} {:>12.1} {:>12} {:>12} {:>7.4} {:>7.2}s",
            r.modulus,
            r.bytes_read,
            r.ideal_bytes,
            r.naive_bytes,
            r.rejections,
            r.efficiency(),
            r.elapsed
        );
    }
    println!("\nIdeal = draws × log2(modulus) / 8, the information-theoretic minimum.");
    println!("Naive = whole bytes per draw for a byte-aligned sampler, before retries.");
}

/// Draw `draws` values below `modulus` from a fresh generator over `source`
/// and record how many source bytes that took.
fn measure<S: EntropySource>(
    source: S,
    modulus: u64,
    draws: usize,
) -> thriftrand_core::Result<BenchRow> {
    let mut generator = Generator::new(CountingSource::new(source));
    let t0 = Instant::now();
    for _ in 0..draws {
        generator.next_u64_below(modulus)?;
    }
    let elapsed = t0.elapsed().as_secs_f64();
    let stats = generator.stats();

    Ok(BenchRow {
        modulus,
        draws,
        bytes_read: generator.source().bytes_read(),
        ideal_bytes: stats.bits_delivered / 8.0,
        naive_bytes: naive_bytes_per_draw(modulus) * draws as u64,
        rejections: stats.rejections,
        elapsed,
    })
}

/// Whole bytes needed to hold one value below `modulus`.
fn naive_bytes_per_draw(modulus: u64) -> u64 {
    let bits = u64::from(64 - modulus.saturating_sub(1).leading_zeros());
    bits.div_ceil(8).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use thriftrand_core::sources::RngSource;

    #[test]
    fn test_naive_bytes_per_draw() {
        assert_eq!(naive_bytes_per_draw(2), 1);
        assert_eq!(naive_bytes_per_draw(256), 1);
        assert_eq!(naive_bytes_per_draw(257), 2);
        assert_eq!(naive_bytes_per_draw(1 << 24), 3);
        assert_eq!(naive_bytes_per_draw(1_000_000_007), 4);
        assert_eq!(naive_bytes_per_draw(1 << 52), 7);
    }

    #[test]
    fn test_measure_coin_flips() {
        let row = measure(RngSource::seeded(1), 2, 100).unwrap();
        assert_eq!(row.bytes_read, 20);
        assert_eq!(row.naive_bytes, 100);
        assert!((row.ideal_bytes - 12.5).abs() < 1e-9);
        assert_eq!(row.rejections, 0);
    }

    #[test]
    fn test_measure_three_byte_draws() {
        let row = measure(RngSource::seeded(2), 1 << 24, 100).unwrap();
        assert_eq!(row.bytes_read, 304);
        assert!((row.ideal_bytes - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_efficiency_near_one_for_dice() {
        let row = measure(RngSource::seeded(3), 6, 20_000).unwrap();
        assert!(row.efficiency() > 0.99, "efficiency {}", row.efficiency());
        assert!(row.bytes_read < row.naive_bytes / 2);
    }
}
