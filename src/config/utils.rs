/// Configuration utilities - loading and access helpers
///
/// - Loading configuration from disk (defaults when the file is missing)
/// - Environment overrides for secrets and deployment settings
/// - Thread-safe access helpers
use super::schemas::Config;
use once_cell::sync::OnceCell;
use std::path::Path;
use std::sync::RwLock;

use crate::logger::{self, LogTag};

/// Global configuration instance
///
/// Components receive their own section by value at construction; this global
/// is the single source those sections are cloned from.
pub static CONFIG: OnceCell<RwLock<Config>> = OnceCell::new();

/// Default configuration file path
pub const CONFIG_FILE_PATH: &str = "config.toml";

/// Load configuration from a TOML file, apply environment overrides and
/// initialize the global CONFIG
///
/// A missing file is not an error: defaults from the schema definitions are
/// used instead.
pub fn load_config_from_path(path: &Path) -> Result<(), String> {
    let mut config = if path.exists() {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        toml::from_str::<Config>(&contents)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?
    } else {
        logger::warning(
            LogTag::Config,
            &format!(
                "Config file '{}' not found, using default values",
                path.display()
            ),
        );
        Config::default()
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    CONFIG
        .set(RwLock::new(config))
        .map_err(|_| "Config already initialized".to_string())?;

    Ok(())
}

/// Overlay environment variables onto a loaded configuration
///
/// Recognized keys: `CMC_API_KEY`, `CMC_API_URL`, `REDPILL_API_KEY`, `PORT`,
/// `APP_ENV` (falls back to `NODE_ENV`).
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(key) = non_empty("CMC_API_KEY") {
        config.market_data.api_key = key;
    }
    if let Some(url) = non_empty("CMC_API_URL") {
        config.market_data.base_url = url;
    }
    if let Some(key) = non_empty("REDPILL_API_KEY") {
        config.ai.api_key = key;
    }
    if let Some(port) = non_empty("PORT") {
        match port.trim().parse::<u16>() {
            Ok(port) => config.webserver.port = port,
            Err(_) => logger::warning(
                LogTag::Config,
                &format!("Ignoring invalid PORT value '{}'", port),
            ),
        }
    }
    if let Some(env) = non_empty("APP_ENV").or_else(|| non_empty("NODE_ENV")) {
        config.webserver.environment = env;
    }
}

/// Execute a function with read access to the configuration
///
/// Falls back to defaults when the configuration was never loaded.
pub fn with_config<F, R>(f: F) -> R
where
    F: FnOnce(&Config) -> R,
{
    match CONFIG.get().and_then(|lock| lock.read().ok()) {
        Some(config) => f(&config),
        None => f(&Config::default()),
    }
}

/// Get a clone of the entire configuration
pub fn get_config_clone() -> Config {
    with_config(|cfg| cfg.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [webserver]
            port = 8088

            [market_data]
            top_tokens_limit = 100
            "#,
        )
        .unwrap();

        assert_eq!(config.webserver.port, 8088);
        assert_eq!(config.webserver.host, "0.0.0.0");
        assert_eq!(config.market_data.top_tokens_limit, 100);
        assert_eq!(config.market_data.quotes_cache_secs, 60);
        assert_eq!(config.storage.max_records, 1000);
        assert_eq!(config.webhook.history_size, 50);
        assert!(!config.ai.is_configured());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("CMC_API_KEY", "cmc-key"),
            ("REDPILL_API_KEY", "rp-key"),
            ("PORT", "4000"),
            ("NODE_ENV", "production"),
            ("CMC_API_URL", "  "),
        ]);

        let mut config = Config::default();
        apply_env_overrides(&mut config, |k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.market_data.api_key, "cmc-key");
        assert_eq!(config.market_data.base_url, "https://pro-api.coinmarketcap.com/v1");
        assert!(config.ai.is_configured());
        assert_eq!(config.webserver.port, 4000);
        assert_eq!(config.webserver.environment, "production");
    }

    #[test]
    fn test_invalid_port_is_ignored() {
        let mut config = Config::default();
        apply_env_overrides(&mut config, |k| {
            (k == "PORT").then(|| "not-a-port".to_string())
        });
        assert_eq!(config.webserver.port, 3000);
    }
}
