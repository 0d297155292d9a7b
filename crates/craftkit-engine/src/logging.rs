//! Tracing subscriber setup.

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;

/// Install the global subscriber.
///
/// `RUST_LOG` is honoured; the configured filter is added on top. Fails if a
/// subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(
        config
            .filter
            .parse()
            .with_context(|| format!("invalid log filter {:?}", config.filter))?,
    );

    let registry = tracing_subscriber::registry().with(filter);
    if config.json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer()).try_init()
    }
    .context("tracing subscriber already installed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_filter_rejected() {
        let config = LoggingConfig {
            filter: "craftkit=loud".to_string(),
            json: false,
        };
        let err = init_tracing(&config).unwrap_err();
        assert!(err.to_string().contains("invalid log filter"));
    }
}
