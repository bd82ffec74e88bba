//! Statistical uniformity battery for generator output.
//!
//! Checks the four kinds of output a generator produces: bounded integers,
//! fractions in `[0, 1)`, permutations, and raw bytes. Each test returns a
//! [`TestResult`] with a p-value (where applicable), a pass/fail
//! determination, and a letter grade (A through F).
//!
//! The crate only sees plain sample vectors, so it can score any generator.

use statrs::distribution::{ChiSquared, ContinuousCDF, Normal};
use statrs::function::erf::erfc;

// ═══════════════════════════════════════════════════════════════════════════════
// Core types
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of a single randomness test.
#[derive(Debug, Clone)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub p_value: Option<f64>,
    pub statistic: f64,
    pub details: String,
    pub grade: char,
}

impl TestResult {
    /// Assign a letter grade based on p-value.
    ///
    /// - A: p >= 0.1
    /// - B: p >= 0.01
    /// - C: p >= 0.001
    /// - D: p >= 0.0001
    /// - F: otherwise or None
    pub fn grade_from_p(p: Option<f64>) -> char {
        match p {
            Some(p) if p >= 0.1 => 'A',
            Some(p) if p >= 0.01 => 'B',
            Some(p) if p >= 0.001 => 'C',
            Some(p) if p >= 0.0001 => 'D',
            _ => 'F',
        }
    }

    /// Determine pass/fail from p-value against a threshold (default 0.01).
    pub fn pass_from_p(p: Option<f64>, threshold: f64) -> bool {
        match p {
            Some(p) => p >= threshold,
            None => false,
        }
    }

    fn from_p(name: &str, p: f64, statistic: f64, details: String) -> Self {
        TestResult {
            name: name.to_string(),
            passed: TestResult::pass_from_p(Some(p), 0.01),
            p_value: Some(p),
            statistic,
            details,
            grade: TestResult::grade_from_p(Some(p)),
        }
    }
}

/// Everything the battery scores, collected from one generator.
#[derive(Debug, Clone, Default)]
pub struct Samples {
    /// Draws from `[0, modulus)`.
    pub ints: Vec<u64>,
    /// Modulus the integer draws were taken against.
    pub modulus: u64,
    /// Draws from `[0, 1)`.
    pub floats: Vec<f64>,
    /// Shuffles of `0..n`, all of the same length `n`.
    pub permutations: Vec<Vec<usize>>,
    /// Raw source bytes.
    pub bytes: Vec<u8>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════════════

/// Unpack a byte slice into individual bits (MSB first per byte).
fn to_bits(data: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(data.len() * 8);
    for &byte in data {
        for shift in (0..8).rev() {
            bits.push((byte >> shift) & 1);
        }
    }
    bits
}

/// Return a failing `TestResult` when data is too short.
fn insufficient(name: &str, needed: usize, got: usize) -> TestResult {
    TestResult {
        name: name.to_string(),
        passed: false,
        p_value: None,
        statistic: 0.0,
        details: format!("Insufficient data: need {needed}, got {got}"),
        grade: 'F',
    }
}

/// Upper-tail chi-squared probability, `None` for a degenerate df.
fn chi2_sf(statistic: f64, df: f64) -> Option<f64> {
    ChiSquared::new(df).ok().map(|d| d.sf(statistic))
}

/// Rank of a permutation of `0..n` in lexicographic order (Lehmer code).
///
/// Identity ranks 0, the reversed sequence ranks `n! - 1`.
pub fn permutation_index(perm: &[usize]) -> usize {
    let n = perm.len();
    let mut index = 0;
    for i in 0..n {
        let smaller_after = perm[i + 1..].iter().filter(|&&x| x < perm[i]).count();
        index = index * (n - i) + smaller_after;
    }
    index
}

fn factorial(n: usize) -> usize {
    (1..=n).product()
}

// ═══════════════════════════════════════════════════════════════════════════════
// 1. INTEGER TESTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Pearson chi-squared goodness of fit of `counts` against a flat distribution.
///
/// Requires at least two bins and an expected count of 5 per bin.
pub fn chi_squared_uniformity(counts: &[u64]) -> TestResult {
    let weights = vec![1u64; counts.len()];
    chi_squared_weighted("Chi-Squared Uniformity", counts, &weights)
}

/// Chi-squared fit where bin `i` expects a share `weights[i] / Σ weights`.
fn chi_squared_weighted(name: &str, counts: &[u64], weights: &[u64]) -> TestResult {
    let bins = counts.len();
    let total: u64 = counts.iter().sum();
    if bins < 2 || total < 5 * bins as u64 {
        return insufficient(name, 5 * bins.max(2), total as usize);
    }
    let weight_sum: f64 = weights.iter().map(|&w| w as f64).sum();
    let mut chi2 = 0.0;
    let mut min_expected = f64::INFINITY;
    for (&c, &w) in counts.iter().zip(weights) {
        let expected = total as f64 * w as f64 / weight_sum;
        min_expected = min_expected.min(expected);
        let diff = c as f64 - expected;
        chi2 += diff * diff / expected;
    }
    match chi2_sf(chi2, (bins - 1) as f64) {
        Some(p) => TestResult::from_p(
            name,
            p,
            chi2,
            format!("bins={bins}, n={total}, min_expected_per_bin={min_expected:.1}"),
        ),
        None => insufficient(name, 2, bins),
    }
}

/// Histogram `samples` over `[0, modulus)` and run a chi-squared fit.
///
/// Moduli above 4096 are folded into at most 4096 equal-width buckets. When
/// the width does not divide `modulus` the last bucket is narrower and its
/// expected count shrinks in proportion.
pub fn range_uniformity(samples: &[u64], modulus: u64) -> TestResult {
    let name = "Range Uniformity";
    if modulus < 2 {
        return insufficient(name, 2, modulus as usize);
    }
    let width = modulus.div_ceil(4096);
    let buckets = modulus.div_ceil(width);
    let mut counts = vec![0u64; buckets as usize];
    for &s in samples {
        if s >= modulus {
            return TestResult {
                name: name.to_string(),
                passed: false,
                p_value: Some(0.0),
                statistic: s as f64,
                details: format!("sample {s} outside [0, {modulus})"),
                grade: 'F',
            };
        }
        counts[(s / width) as usize] += 1;
    }
    let mut weights = vec![width; buckets as usize];
    if let Some(last) = weights.last_mut() {
        *last = modulus - (buckets - 1) * width;
    }
    let mut result = chi_squared_weighted(name, &counts, &weights);
    result.details = format!("modulus={modulus}, width={width}, {}", result.details);
    result
}

// ═══════════════════════════════════════════════════════════════════════════════
// 2. FRACTION TESTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Kolmogorov-Smirnov test of fractions against Uniform[0, 1).
pub fn ks_uniform(samples: &[f64]) -> TestResult {
    let name = "Kolmogorov-Smirnov";
    let n = samples.len();
    if n < 50 {
        return insufficient(name, 50, n);
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    // KS statistic: max |F_n(x) - F(x)|
    let mut d_max = 0.0f64;
    let nf = n as f64;
    for (i, &x) in sorted.iter().enumerate() {
        let f_x = x.clamp(0.0, 1.0);
        let d1 = ((i + 1) as f64 / nf - f_x).abs();
        let d2 = (i as f64 / nf - f_x).abs();
        d_max = d_max.max(d1).max(d2);
    }

    // Asymptotic Kolmogorov distribution
    let sqrt_n = nf.sqrt();
    let lambda = (sqrt_n + 0.12 + 0.11 / sqrt_n) * d_max;
    let mut p = 0.0;
    for k in 1..=100i32 {
        let sign = if k % 2 == 0 { -1.0 } else { 1.0 };
        p += sign * (-2.0 * (k as f64 * lambda).powi(2)).exp();
    }
    p = (2.0 * p).clamp(0.0, 1.0);

    TestResult::from_p(name, p, d_max, format!("D={d_max:.6}, n={n}"))
}

/// Mean (~0.5) and variance (~1/12) of fractions in `[0, 1)`.
pub fn mean_variance(samples: &[f64]) -> TestResult {
    let name = "Mean & Variance";
    let n = samples.len();
    if n < 50 {
        return insufficient(name, 50, n);
    }
    if let Some(bad) = samples.iter().find(|x| !(0.0..1.0).contains(*x)) {
        return TestResult {
            name: name.to_string(),
            passed: false,
            p_value: Some(0.0),
            statistic: *bad,
            details: format!("sample {bad} outside [0, 1)"),
            grade: 'F',
        };
    }
    let nf = n as f64;
    let mean: f64 = samples.iter().sum::<f64>() / nf;
    let var: f64 = samples.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / nf;

    let expected_mean = 0.5;
    let expected_var = 1.0 / 12.0;

    let z_mean = (mean - expected_mean).abs() / (expected_var / nf).sqrt();
    let norm = Normal::standard();
    let p_mean = 2.0 * (1.0 - norm.cdf(z_mean));

    // Var of the sample variance for U(0,1): (mu4 - sigma^4) / n, mu4 = 1/80.
    let var_of_var = (1.0 / 80.0 - expected_var * expected_var) / nf;
    let z_var = (var - expected_var).abs() / var_of_var.sqrt();
    let p_var = 2.0 * (1.0 - norm.cdf(z_var));

    let p = p_mean.min(p_var);
    TestResult::from_p(
        name,
        p,
        z_mean,
        format!("mean={mean:.4} (exp 0.5), var={var:.5} (exp {expected_var:.5})"),
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// 3. PERMUTATION TESTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Every ordering of a short sequence should appear equally often.
///
/// Sequences up to length 6 (720 orderings) are supported.
pub fn permutation_uniformity(perms: &[Vec<usize>]) -> TestResult {
    let name = "Permutation Uniformity";
    let Some(first) = perms.first() else {
        return insufficient(name, 1, 0);
    };
    let len = first.len();
    if !(2..=6).contains(&len) {
        return insufficient(name, 2, len);
    }
    let orderings = factorial(len);
    let mut counts = vec![0u64; orderings];
    for p in perms {
        let mut sorted = p.clone();
        sorted.sort_unstable();
        if p.len() != len || sorted.iter().enumerate().any(|(i, &x)| i != x) {
            return TestResult {
                name: name.to_string(),
                passed: false,
                p_value: Some(0.0),
                statistic: 0.0,
                details: format!("{p:?} is not a permutation of 0..{len}"),
                grade: 'F',
            };
        }
        counts[permutation_index(p)] += 1;
    }
    let mut result = chi_squared_uniformity(&counts);
    result.name = name.to_string();
    result.details = format!("len={len}, orderings={orderings}, {}", result.details);
    result
}

// ═══════════════════════════════════════════════════════════════════════════════
// 4. BYTE TESTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Monobit frequency -- proportion of 1s vs 0s should be ~50%.
pub fn monobit_frequency(data: &[u8]) -> TestResult {
    let name = "Monobit Frequency";
    let bits = to_bits(data);
    let n = bits.len();
    if n < 100 {
        return insufficient(name, 100, n);
    }
    let s: i64 = bits
        .iter()
        .map(|&b| if b == 1 { 1i64 } else { -1i64 })
        .sum();
    let s_obs = (s as f64).abs() / (n as f64).sqrt();
    let p = erfc(s_obs / 2.0_f64.sqrt());
    TestResult::from_p(name, p, s_obs, format!("S={s}, n={n}"))
}

/// Byte frequency -- chi-squared on byte value distribution (256 bins).
pub fn byte_frequency(data: &[u8]) -> TestResult {
    let name = "Byte Frequency";
    if data.len() < 256 * 5 {
        return insufficient(name, 256 * 5, data.len());
    }
    let mut hist = [0u64; 256];
    for &b in data {
        hist[b as usize] += 1;
    }
    let mut result = chi_squared_uniformity(&hist);
    result.name = name.to_string();
    result
}

/// Runs test -- number of uninterrupted runs of 0s or 1s.
pub fn runs_test(data: &[u8]) -> TestResult {
    let name = "Runs Test";
    let bits = to_bits(data);
    let n = bits.len();
    if n < 100 {
        return insufficient(name, 100, n);
    }
    let ones: usize = bits.iter().map(|&b| b as usize).sum();
    let prop = ones as f64 / n as f64;
    if (prop - 0.5).abs() >= 2.0 / (n as f64).sqrt() {
        return TestResult {
            name: name.to_string(),
            passed: false,
            p_value: Some(0.0),
            statistic: 0.0,
            details: format!("Pre-test failed: proportion={prop:.4}"),
            grade: 'F',
        };
    }
    let runs = 1 + bits.windows(2).filter(|w| w[0] != w[1]).count();
    let expected = 2.0 * n as f64 * prop * (1.0 - prop) + 1.0;
    let std = 2.0 * (2.0 * n as f64).sqrt() * prop * (1.0 - prop);
    let z = (runs as f64 - expected).abs() / std;
    let p = erfc(z / 2.0_f64.sqrt());
    TestResult::from_p(name, p, z, format!("runs={runs}, expected={expected:.0}"))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Test battery
// ═══════════════════════════════════════════════════════════════════════════════

/// Run every test that has data in `samples`.
pub fn run_all_tests(samples: &Samples) -> Vec<TestResult> {
    let mut results = Vec::new();
    if !samples.ints.is_empty() {
        results.push(range_uniformity(&samples.ints, samples.modulus));
    }
    if !samples.floats.is_empty() {
        results.push(ks_uniform(&samples.floats));
        results.push(mean_variance(&samples.floats));
    }
    if !samples.permutations.is_empty() {
        results.push(permutation_uniformity(&samples.permutations));
    }
    if !samples.bytes.is_empty() {
        results.push(monobit_frequency(&samples.bytes));
        results.push(byte_frequency(&samples.bytes));
        results.push(runs_test(&samples.bytes));
    }
    results
}

/// Calculate overall quality score (0-100) from test results.
///
/// Each grade maps to a score: A=100, B=75, C=50, D=25, F=0.
/// Returns the average across all tests.
pub fn calculate_quality_score(results: &[TestResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let total: f64 = results
        .iter()
        .map(|r| match r.grade {
            'A' => 100.0,
            'B' => 75.0,
            'C' => 50.0,
            'D' => 25.0,
            _ => 0.0,
        })
        .sum();
    total / results.len() as f64
}
