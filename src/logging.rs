// Logging setup.
// Diagnostics go to stderr through tracing; stdout is reserved for the report.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "github_vanity=warn";
const DEBUG_FILTER: &str = "github_vanity=trace,reqwest=debug,hyper_util=debug";

/// Install the global subscriber. `--debug` wins over `RUST_LOG`.
pub fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new(DEBUG_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(debug)
        .init();
}
