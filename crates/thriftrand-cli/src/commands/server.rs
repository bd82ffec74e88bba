use thriftrand_core::EntropySource;

use super::SourceConfig;

pub fn run(source: &SourceConfig<'_>, host: &str, port: u16) {
    let generator = super::make_generator(source);
    let info = generator.source().info();

    let base = format!("http://{host}:{port}");

    println!("thriftrand server v{}", thriftrand_core::VERSION);
    println!("   {base}");
    println!(
        "   source: {} ({}{})",
        info.name,
        info.category,
        if info.cryptographic { ", cryptographic" } else { "" }
    );
    println!();
    println!("   Endpoints:");
    println!("     GET /                 API index (try: curl {base})");
    println!("     GET /api/v1/int       Integers in [min, max)");
    println!("     GET /api/v1/float     Fractions in [0, 1)");
    println!("     GET /api/v1/shuffle   Random permutation of 0..n");
    println!("     GET /api/v1/bytes     Raw source bytes");
    println!("     GET /health           Generator statistics");
    println!();
    println!("   Examples:");
    println!("     curl '{base}/api/v1/int?min=1&max=7&count=10'");
    println!("     curl '{base}/api/v1/shuffle?n=52'");
    println!("     curl '{base}/api/v1/bytes?length=32&type=uint8'");
    println!();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error starting async runtime: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = rt.block_on(thriftrand_server::run_server(generator, host, port)) {
        eprintln!("Server error on {base}: {e}");
        std::process::exit(1);
    }
}
