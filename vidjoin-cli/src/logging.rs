// ============================================================================
// vidjoin-cli/src/logging.rs
// ============================================================================
//
// LOGGING: env_logger setup and timestamp helpers
//
// The application logs through the `log` facade with env_logger as backend:
// - RUST_LOG=info (default): Normal operation logs
// - RUST_LOG=debug (or --verbose): Commands, probe results, timeline details
// - RUST_LOG=trace: Very verbose, includes raw ffmpeg log lines

use env_logger::{Builder, Env};

/// Initializes env_logger. `RUST_LOG` wins over the `verbose` default.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .format_target(verbose)
        .init();
}

/// Returns the current local timestamp formatted as "YYYY-MM-DD HH:MM:SS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
