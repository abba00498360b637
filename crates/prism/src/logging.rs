//! Tracing subscriber setup.
//!
//! Logs go to stderr so `prism refine` / `prism generate` can print JSON on
//! stdout. `RUST_LOG` takes precedence over both the config file and flags.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber with `level` as the default directive.
///
/// Exactly one of the two formatting layers is active.
pub fn init(level: &str, json_format: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let json_layer = json_format.then(|| fmt::layer().json().with_writer(std::io::stderr));
    let pretty_layer = (!json_format).then(|| {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(pretty_layer)
        .init();
}

/// Initialize from the `[logging]` section; `--verbose` forces debug and
/// `--json-logs` forces JSON output.
pub fn init_from_config(config: &prism_core::Config, verbose: bool, json_logs: bool) {
    let level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    init(level, json_logs || config.logging.format == "json");
}
