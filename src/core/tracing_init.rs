use crate::core::config::{Environment, LoggingConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Console,
    Json,
}

/// Console for local work, JSON in production, unless the config says otherwise
pub fn log_output(config: &LoggingConfig, environment: Environment) -> LogOutput {
    match config.format.as_deref() {
        _ if config.console => LogOutput::Console,
        Some("console") => LogOutput::Console,
        Some(_) => LogOutput::Json,
        None if environment.is_production() => LogOutput::Json,
        None => LogOutput::Console,
    }
}

/// Filter used when `RUST_LOG` is unset
///
/// Outside production the HTTP access spans are raised to debug.
pub fn default_directives(config: &LoggingConfig, environment: Environment) -> String {
    if environment.is_production() {
        config.level.clone()
    } else {
        format!("{},tower_http=debug", config.level)
    }
}

pub fn init_tracing(config: &LoggingConfig, environment: Environment) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(config, environment)));

    match log_output(config, environment) {
        LogOutput::Console => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(true)
                        .with_ansi(true)
                        .with_line_number(true),
                )
                .init();
        }
        LogOutput::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_current_span(true)
                        .with_span_list(false),
                )
                .init();
        }
    }
}
