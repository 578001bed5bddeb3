//! JSON tracing subscriber setup.

use crate::{Error, Result, config::LogsConfig};
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

/// `RUST_LOG` wins over `server.logs.level` when it is set and non-blank.
pub fn resolve_directive(env_override: Option<String>, logs: &LogsConfig) -> String {
    env_override
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| logs.level.clone())
}

/// Parses a filter directive.
///
/// A bare word must be a level; `EnvFilter` would otherwise accept a typo
/// such as `inof` as a target name and silently log nothing.
pub fn parse_filter(directive: &str) -> Result<EnvFilter> {
    let is_bare = !directive.contains('=') && !directive.contains(',');
    if is_bare && directive.parse::<LevelFilter>().is_err() {
        return Err(Error::config(format!(
            "Invalid log level: '{}'. Valid levels: error, warn, info, debug, trace",
            directive
        )));
    }

    EnvFilter::try_new(directive)
        .map_err(|e| Error::config(format!("Invalid log filter '{}': {}", directive, e)))
}

/// Installs the global subscriber and returns the directive in effect.
pub fn init(logs: &LogsConfig) -> Result<String> {
    let directive = resolve_directive(std::env::var("RUST_LOG").ok(), logs);
    let filter = parse_filter(&directive)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .try_init()
        .map_err(|e| Error::internal(format!("Failed to install tracing subscriber: {}", e)))?;

    Ok(directive)
}
