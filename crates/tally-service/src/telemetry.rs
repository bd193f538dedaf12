//! Tracing subscriber setup.

use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Installs the global fmt subscriber.
///
/// `RUST_LOG` takes precedence over `settings.filter`. Calling this again
/// after a subscriber is installed does nothing.
pub fn init_tracing(settings: &LoggingSettings) {
    let filter = build_filter(settings);

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(settings.ansi)
        .with_target(true)
        .try_init()
        .is_ok();

    if !installed {
        debug!("Tracing subscriber already installed");
    }
}

fn build_filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .unwrap_or_else(|_| EnvFilter::new(crate::config::DEFAULT_LOG_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        let settings = LoggingSettings::default();
        init_tracing(&settings);
        init_tracing(&settings);
    }

    #[test]
    fn test_invalid_filter_falls_back() {
        let settings = LoggingSettings {
            filter: "tally=[[[".to_string(),
            ansi: false,
        };
        // Must not panic on a malformed directive
        let _ = build_filter(&settings);
    }
}
