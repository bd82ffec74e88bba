//! CLI for thriftrand: unbiased dice, fractions and shuffles from an entropy
//! source, reading as few source bytes as possible.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "thriftrand")]
#[command(about = "thriftrand: unbiased random ranges at minimal entropy cost")]
#[command(version = thriftrand_core::VERSION)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Read entropy from a device or file (e.g. /dev/urandom, a capture file)
    #[arg(long, global = true, value_name = "PATH")]
    device: Option<PathBuf>,

    /// Use a reproducible seeded PRNG instead of real entropy (testing only)
    #[arg(long, global = true, conflicts_with = "device")]
    seed: Option<u64>,

    /// Print machine-readable JSON instead of plain text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Uniform integers in [min, max)
    Int {
        /// Inclusive lower bound
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        min: i32,

        /// Exclusive upper bound
        #[arg(long, default_value = "100", allow_negative_numbers = true)]
        max: i32,

        /// Number of values to draw
        #[arg(long, default_value = "1")]
        count: usize,
    },

    /// Uniform fractions in [0, 1)
    Float {
        /// Number of values to draw
        #[arg(long, default_value = "1")]
        count: usize,
    },

    /// Print the given items in a uniformly random order
    Shuffle {
        /// Items to shuffle
        #[arg(required = true)]
        items: Vec<String>,
    },

    /// Raw bytes straight from the entropy source (bypasses the buffer)
    Bytes {
        /// Number of bytes
        #[arg(long, default_value = "32")]
        length: usize,

        /// Print as hex instead of writing binary to stdout
        #[arg(long)]
        hex: bool,
    },

    /// Compare source bytes consumed per modulus against the information minimum
    Bench {
        /// Draws per modulus
        #[arg(long, default_value = "100000")]
        draws: usize,
    },

    /// Run the statistical uniformity battery on generator output
    Report {
        /// Samples per test family
        #[arg(long, default_value = "10000")]
        samples: usize,

        /// Modulus for the integer uniformity test
        #[arg(long, default_value = "10")]
        modulus: u64,
    },

    /// Start the HTTP random-number server
    Server {
        /// Port to listen on
        #[arg(long, default_value = "8042")]
        port: u16,

        /// Bind address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let source = commands::SourceConfig {
        device: cli.device.as_deref(),
        seed: cli.seed,
    };
    let json = cli.json;

    match cli.command {
        Commands::Int { min, max, count } => commands::int::run(&source, min, max, count, json),
        Commands::Float { count } => commands::float::run(&source, count, json),
        Commands::Shuffle { items } => commands::shuffle::run(&source, items, json),
        Commands::Bytes { length, hex } => commands::bytes::run(&source, length, hex, json),
        Commands::Bench { draws } => commands::bench::run(&source, draws, json),
        Commands::Report { samples, modulus } => {
            commands::report::run(&source, samples, modulus, json)
        }
        Commands::Server { port, host } => commands::server::run(&source, &host, port),
    }
}
