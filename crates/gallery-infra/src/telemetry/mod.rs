//! Tracing initialization
//!
//! Console logging through `tracing-subscriber`. Development gets the compact
//! human-readable format, production emits one JSON object per line.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_FILTER: &str = "gallery=debug,tower_http=debug";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    /// JSON in production, compact everywhere else.
    pub fn for_environment(environment: &str) -> Self {
        match environment.to_lowercase().as_str() {
            "production" | "prod" => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

/// Build the env filter, honouring `RUST_LOG` when set.
pub fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into())
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_telemetry(
    service_name: &str,
    environment: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let registry = tracing_subscriber::registry().with(env_filter(DEFAULT_FILTER));

    match LogFormat::for_environment(environment) {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init()?,
        LogFormat::Compact => registry
            .with(tracing_subscriber::fmt::layer().compact().with_target(true))
            .try_init()?,
    }

    tracing::info!(
        service = service_name,
        environment = environment,
        "Tracing initialized"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_for_environment() {
        assert_eq!(LogFormat::for_environment("production"), LogFormat::Json);
        assert_eq!(LogFormat::for_environment("PROD"), LogFormat::Json);
        assert_eq!(LogFormat::for_environment("development"), LogFormat::Compact);
    }
}
