use std::io::Write;

use thriftrand_core::UniformRandom;

use super::SourceConfig;

pub fn run(source: &SourceConfig<'_>, length: usize, hex: bool, json: bool) {
    let mut generator = super::make_generator(source);
    let mut data = vec![0u8; length];
    super::or_exit(generator.fill_raw_bytes(&mut data));
    super::log_stats(&generator);

    if json {
        let out = serde_json::json!({
            "type": "hex",
            "length": length,
            "data": thriftrand_server::hex::encode(&data),
        });
        println!("{out:#}");
    } else if hex {
        println!("{}", thriftrand_server::hex::encode(&data));
    } else {
        let mut out = std::io::stdout().lock();
        if let Err(e) = out.write_all(&data).and_then(|()| out.flush()) {
            eprintln!("Error writing to stdout: {e}");
            std::process::exit(1);
        }
    }
}
