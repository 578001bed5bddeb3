mod types;

pub use types::*;

use crate::{Error, Result};
use std::{env, path::Path};
use tracing::debug;

pub const API_KEY_VAR: &str = "REPLICATE_API_KEY";

/// Loads `.env`, the optional YAML file at `CONFIG_PATH` and environment
/// overrides, then validates the result.
pub async fn load() -> Result<Config> {
    // A missing .env is fine; real deployments set the variables directly.
    let _ = dotenvy::dotenv();

    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());
    let mut config = load_file(&config_path).await?;

    config.apply_overrides(|key| env::var(key).ok())?;
    config.validate()?;

    Ok(config)
}

/// Reads a YAML config file, falling back to defaults when it does not exist.
pub async fn load_file(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();

    if !tokio::fs::try_exists(path).await? {
        debug!("No configuration file at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    debug!("Loading configuration from: {}", path.display());

    let config_str = tokio::fs::read_to_string(path).await?;
    Config::from_yaml(&config_str)
}

impl Config {
    pub fn from_yaml(s: &str) -> Result<Self> {
        // An empty file deserializes to unit, not to a struct.
        if s.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(s)?)
    }

    /// Applies environment-style overrides; `lookup` is `std::env::var` in
    /// production.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = lookup(API_KEY_VAR) {
            self.replicate.api_key = key;
        }
        if let Some(base_url) = lookup("REPLICATE_API_BASE") {
            self.replicate.base_url = base_url;
        }
        if let Some(model) = lookup("REPLICATE_MODEL") {
            self.replicate.model = model;
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| Error::config(format!("Invalid PORT value: '{}'", port)))?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.replicate.api_key.trim().is_empty() {
            return Err(Error::config(format!(
                "Missing Replicate API key (set {} or replicate.api_key)",
                API_KEY_VAR
            )));
        }
        if self.replicate.poll_interval_ms == 0 {
            return Err(Error::config("replicate.poll_interval_ms must be positive"));
        }
        if self.replicate.poll_timeout_secs == 0 {
            return Err(Error::config("replicate.poll_timeout_secs must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.body_limit_bytes, 15 * 1024 * 1024);
        assert_eq!(config.replicate.model, "black-forest-labs/flux-dev");
        assert_eq!(config.replicate.poll_interval_ms, 2000);
        assert!(config.replicate.api_key.is_empty());
    }

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config = Config::from_yaml("   \n").unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_env_overrides_win() {
        let mut config = Config::from_yaml("server:\n  port: 3000\n").unwrap();
        config
            .apply_overrides(lookup_from(&[
                ("REPLICATE_API_KEY", "r8_secret"),
                ("PORT", "5000"),
            ]))
            .unwrap();

        assert_eq!(config.server.port, 5000);
        assert_eq!(config.replicate.api_key, "r8_secret");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_override_is_ignored() {
        let mut config = Config::default();
        config.replicate.api_key = "from-file".to_string();
        config
            .apply_overrides(lookup_from(&[("REPLICATE_API_KEY", "  ")]))
            .unwrap();
        assert_eq!(config.replicate.api_key, "from-file");
    }

    #[test]
    fn test_invalid_port_is_config_error() {
        let mut config = Config::default();
        let err = config
            .apply_overrides(lookup_from(&[("PORT", "eighty")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_missing_api_key_fails_validation() {
        let err = Config::default().validate().unwrap_err();
        assert!(err.to_string().contains(API_KEY_VAR));
    }

    #[test]
    fn test_zero_poll_interval_fails_validation() {
        let mut config = Config::default();
        config.replicate.api_key = "key".to_string();
        config.replicate.poll_interval_ms = 0;
        assert!(config.validate().is_err());
    }
}
