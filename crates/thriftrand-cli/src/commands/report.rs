use std::time::Instant;

use thriftrand_core::{EntropySource, UniformRandom};
use thriftrand_tests::{Samples, TestResult};

use super::SourceConfig;

/// Length of the shuffled sequences scored by the permutation test.
const PERMUTATION_LEN: usize = 4;

pub fn run(source: &SourceConfig<'_>, samples: usize, modulus: u64, json: bool) {
    let mut generator = super::make_generator(source);
    let source_name = generator.source().name();

    if !json {
        println!("Running test battery on `{source_name}` output, {samples} samples per family...\n");
    }

    let t0 = Instant::now();
    let collected = super::or_exit(collect_samples(&mut generator, samples, modulus));
    let results = thriftrand_tests::run_all_tests(&collected);
    let elapsed = t0.elapsed().as_secs_f64();
    let score = thriftrand_tests::calculate_quality_score(&results);
    super::log_stats(&generator);

    if results.is_empty() {
        eprintln!("No tests could run; increase --samples.");
        std::process::exit(1);
    }

    if json {
        let stats = generator.stats();
        let out = serde_json::json!({
            "source": source_name,
            "samples": samples,
            "modulus": modulus,
            "score": score,
            "efficiency": stats.efficiency(),
            "tests": results.iter().map(result_json).collect::<Vec<_>>(),
        });
        println!("{out:#}");
        return;
    }

    println!("{}", "=".repeat(72));
    println!(
        "{:<26} {:>6} {:>10} {:>6}  Details",
        "Test", "Grade", "p-value", "Pass"
    );
    println!("{}", "-".repeat(72));
    for r in &results {
        let p = r.p_value.map_or_else(|| "-".to_string(), |p| format!("{p:.4}"));
        println!(
            "{:<26} {:>6} {:>10} {:>6}  {}",
            r.name,
            r.grade,
            p,
            if r.passed { "✓" } else { "✗" },
            r.details
        );
    }
    let passed = results.iter().filter(|r| r.passed).count();
    println!(
        "\nScore: {score:.0}/100 ({passed}/{} passed) [{elapsed:.1}s]",
        results.len()
    );
}

fn result_json(r: &TestResult) -> serde_json::Value {
    serde_json::json!({
        "name": r.name,
        "passed": r.passed,
        "p_value": r.p_value,
        "statistic": r.statistic,
        "grade": r.grade.to_string(),
        "details": r.details,
    })
}

/// Draw every sample family the battery scores from one generator.
///
/// Raw bytes come from the source directly, so they score the source; the
/// other families score the reduction.
fn collect_samples(
    rng: &mut impl UniformRandom,
    n: usize,
    modulus: u64,
) -> thriftrand_core::Result<Samples> {
    let ints = (0..n)
        .map(|_| rng.next_u64_below(modulus))
        .collect::<thriftrand_core::Result<Vec<_>>>()?;
    let floats = (0..n)
        .map(|_| rng.next_f64())
        .collect::<thriftrand_core::Result<Vec<_>>>()?;
    let mut permutations = Vec::with_capacity(n);
    for _ in 0..n {
        let mut p: Vec<usize> = (0..PERMUTATION_LEN).collect();
        rng.shuffle(&mut p)?;
        permutations.push(p);
    }
    let mut bytes = vec![0u8; n];
    rng.fill_raw_bytes(&mut bytes)?;

    Ok(Samples {
        ints,
        modulus,
        floats,
        permutations,
        bytes,
    })
}
