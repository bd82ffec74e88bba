use thriftrand_core::UniformRandom;

use super::SourceConfig;

pub fn run(source: &SourceConfig<'_>, mut items: Vec<String>, json: bool) {
    let mut generator = super::make_generator(source);
    super::or_exit(generator.shuffle(&mut items));

    if json {
        let out = serde_json::json!({
            "type": "shuffle",
            "data": items,
        });
        println!("{out:#}");
    } else {
        println!("{}", items.join(" "));
    }
    super::log_stats(&generator);
}
