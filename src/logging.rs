//! Diagnostic logging setup
//!
//! Logs go to stderr so command output stays pipeable. `STK_LOG` takes
//! precedence over the verbosity flags.

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber
pub fn init(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "stk=debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_env("STK_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be installed (e.g. when embedded in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
