//! Environment-driven configuration.

use clap::Args;

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}
