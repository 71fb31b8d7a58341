//! Runtime bootstrap and the line-streaming driver for Top Hits.

use tracing_subscriber::EnvFilter;

pub mod metrics;
pub mod scan;

pub use scan::{scan_file, scan_reader, ScanReport};

/// Install the global fmt subscriber, writing to stderr so stdout only carries
/// the report. `RUST_LOG` overrides the default `info` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
