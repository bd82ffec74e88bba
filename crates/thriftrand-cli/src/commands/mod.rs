pub mod bench;
pub mod bytes;
pub mod float;
pub mod int;
pub mod report;
pub mod server;
pub mod shuffle;

use std::io;
use std::path::Path;

use thriftrand_core::sources::{OsSource, ReaderSource, RngSource};
use thriftrand_core::{EntropySource, Generator};

/// Entropy source selected by the global `--device` / `--seed` flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceConfig<'a> {
    pub device: Option<&'a Path>,
    pub seed: Option<u64>,
}

/// Open the configured source. The OS CSPRNG is the default.
pub fn try_make_source(config: &SourceConfig<'_>) -> io::Result<Box<dyn EntropySource>> {
    if let Some(path) = config.device {
        return Ok(Box::new(ReaderSource::open(path)?));
    }
    if let Some(seed) = config.seed {
        log::warn!("using seeded PRNG (seed {seed}): output is reproducible, not secret");
        return Ok(Box::new(RngSource::seeded(seed)));
    }
    Ok(Box::new(OsSource::new()))
}

/// Open the configured source, exiting with a message if that fails.
pub fn make_source(config: &SourceConfig<'_>) -> Box<dyn EntropySource> {
    match try_make_source(config) {
        Ok(source) => source,
        Err(e) => {
            let path = config.device.map_or_else(String::new, |p| p.display().to_string());
            eprintln!("Error opening entropy source {path}: {e}");
            std::process::exit(1);
        }
    }
}

pub fn make_generator(config: &SourceConfig<'_>) -> Generator<Box<dyn EntropySource>> {
    Generator::new(make_source(config))
}

/// Unwrap a generator result or print the error and exit.
pub fn or_exit<T>(result: thriftrand_core::Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Log consumption counters once a command is done drawing.
pub fn log_stats<S: EntropySource>(generator: &Generator<S>) {
    let stats = generator.stats();
    log::info!(
        "{} draws, {:.1} bits delivered, {} entropy bytes + {} raw bytes read, {} rejections",
        stats.draws,
        stats.bits_delivered,
        stats.entropy_bytes,
        stats.raw_bytes,
        stats.rejections,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn read_some(source: &mut dyn EntropySource) -> [u8; 16] {
        let mut buf = [0u8; 16];
        source.fill_bytes(&mut buf).unwrap();
        buf
    }

    // -----------------------------------------------------------------------
    // Source selection
    // -----------------------------------------------------------------------

    #[test]
    fn test_default_source_is_os() {
        let source = try_make_source(&SourceConfig::default()).unwrap();
        assert_eq!(source.name(), "os");
        assert!(source.info().cryptographic);
    }

    #[test]
    fn test_seeded_source_is_reproducible() {
        let config = SourceConfig {
            device: None,
            seed: Some(42),
        };
        let mut a = try_make_source(&config).unwrap();
        let mut b = try_make_source(&config).unwrap();
        assert_eq!(read_some(a.as_mut()), read_some(b.as_mut()));
        assert!(!a.info().cryptographic);
    }

    #[test]
    fn test_device_source_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[7u8; 32]).unwrap();
        file.flush().unwrap();

        let config = SourceConfig {
            device: Some(file.path()),
            seed: None,
        };
        let mut source = try_make_source(&config).unwrap();
        assert_eq!(read_some(source.as_mut()), [7u8; 16]);
    }

    #[test]
    fn test_device_takes_precedence_over_seed() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = SourceConfig {
            device: Some(file.path()),
            seed: Some(1),
        };
        let source = try_make_source(&config).unwrap();
        assert_ne!(source.name(), "rng");
    }

    #[test]
    fn test_missing_device_is_error() {
        let config = SourceConfig {
            device: Some(Path::new("/nonexistent/thriftrand/entropy")),
            seed: None,
        };
        assert!(try_make_source(&config).is_err());
    }
}
