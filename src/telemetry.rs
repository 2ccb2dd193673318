//! Tracing initialization
//!
//! Log output format is selected by the `WEBSCOPE_LOG_FORMAT` environment
//! variable (`json` for machine-readable production logs, anything else for
//! pretty development output); verbosity comes from `RUST_LOG` with an
//! `info` default.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable selecting the log format
pub const LOG_FORMAT_ENV: &str = "WEBSCOPE_LOG_FORMAT";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Structured JSON lines
    Json,
    /// Human-readable output
    Pretty,
}

impl LogFormat {
    /// Resolve the format from the environment
    pub fn from_env() -> Self {
        match std::env::var(LOG_FORMAT_ENV).as_deref() {
            Ok("json") | Ok("JSON") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Initialize tracing with the format resolved from the environment
///
/// Safe to call once per process; a second call is ignored.
pub fn init_tracing() {
    init_tracing_with_format(LogFormat::from_env());
}

/// Initialize tracing with an explicit format
pub fn init_tracing_with_format(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let result = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_current_span(false))
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .try_init(),
    };

    // A second init in the same process keeps the first subscriber.
    let _ = result;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_defaults_to_pretty() {
        std::env::remove_var(LOG_FORMAT_ENV);
        assert_eq!(LogFormat::from_env(), LogFormat::Pretty);
    }

    #[test]
    fn test_double_init_does_not_panic() {
        init_tracing_with_format(LogFormat::Pretty);
        init_tracing_with_format(LogFormat::Json);
    }
}
