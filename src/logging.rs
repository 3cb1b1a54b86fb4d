// Logging setup - all modules log through `tracing`

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "lcu_bravery=info";
const VERBOSE_FILTER: &str = "lcu_bravery=debug";

/// Install the global fmt subscriber. `RUST_LOG` wins over the verbose flag when set.
pub fn init_logging(verbose: bool) {
  let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

  // Ignore the error when a subscriber is already installed (tests, embedding apps)
  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(false)
    .try_init();
}
