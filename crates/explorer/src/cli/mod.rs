pub mod commands;
pub mod display;

use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Install the tracing subscriber for a binary
///
/// `RUST_LOG` wins over the built-in filters. Logs go to stderr so that
/// stdout stays machine readable.
pub fn init_logging(verbose: bool, default_filter: &str) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
    if verbose {
      EnvFilter::new("explorer=debug,assay=debug,tower_http=debug,info")
    } else {
      EnvFilter::new(default_filter)
    }
  });

  tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();
}
