use thriftrand_core::UniformRandom;

use super::SourceConfig;

pub fn run(source: &SourceConfig<'_>, count: usize, json: bool) {
    let mut generator = super::make_generator(source);
    let values: Vec<f64> = super::or_exit((0..count).map(|_| generator.next_f64()).collect());

    if json {
        let out = serde_json::json!({
            "type": "float",
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
