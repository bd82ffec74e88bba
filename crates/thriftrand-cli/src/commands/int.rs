use thriftrand_core::UniformRandom;

use super::SourceConfig;

pub fn run(source: &SourceConfig<'_>, min: i32, max: i32, count: usize, json: bool) {
    let mut generator = super::make_generator(source);
    let values = super::or_exit(draw(&mut generator, min, max, count));

    if json {
        let out = serde_json::json!({
            "type": "int",
            "min": min,
            "max": max,
            "data": values,
        });
        println!("{out:#}");
    } else {
        for v in &values {
            println!("{v}");
        }
    }
    super::log_stats(&generator);
}

/// `count` integers from `[min, max)`. An empty range fails before any
/// entropy is read.
fn draw(
    rng: &mut impl UniformRandom,
    min: i32,
    max: i32,
    count: usize,
) -> thriftrand_core::Result<Vec<i32>> {
    (0..count).map(|_| rng.next_in_range(min, max)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use thriftrand_core::Generator;
    use thriftrand_core::sources::{CountingSource, RngSource};

    #[test]
    fn test_draw_in_range() {
        let mut rng = Generator::new(RngSource::seeded(1));
        let values = draw(&mut rng, 1, 7, 600).unwrap();
        assert_eq!(values.len(), 600);
        assert!(values.iter().all(|v| (1..7).contains(v)));
        // A fair die shows every face in 600 rolls.
        for face in 1..7 {
            assert!(values.contains(&face));
        }
    }

    #[test]
    fn test_draw_empty_range_reads_nothing() {
        let mut rng = Generator::new(CountingSource::new(RngSource::seeded(2)));
        assert!(draw(&mut rng, 5, 5, 10).is_err());
        assert_eq!(rng.source().bytes_read(), 0);
    }

    #[test]
    fn test_draw_zero_count() {
        let mut rng = Generator::new(RngSource::seeded(3));
        assert!(draw(&mut rng, 0, 10, 0).unwrap().is_empty());
    }
}
