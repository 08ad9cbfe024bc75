use crate::config::Environment;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing subscriber with pretty formatting for development
/// and JSON formatting for production.
///
/// Uses RUST_LOG environment variable for filtering (defaults to "info" if not set).
///
/// Also adds an OpenTelemetry layer that exports traces if the caller has
/// installed a global tracer provider.
///
/// Returns an error when a global subscriber is already set, so a host
/// application that configured its own subscriber keeps it.
pub fn setup_logging(environment: Environment) -> anyhow::Result<()> {
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    let otel_layer = tracing_opentelemetry::layer();

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(otel_layer);

    match environment {
        Environment::Production => registry
            .with(tracing_subscriber::fmt::layer().json().with_level(true))
            .try_init()?,
        Environment::Development => registry
            .with(tracing_subscriber::fmt::layer().pretty().with_ansi(true))
            .try_init()?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_setup_is_rejected() {
        let _ = setup_logging(Environment::Development);
        let second = setup_logging(Environment::Production);
        assert!(second.is_err(), "subscriber can only be installed once");
    }
}
