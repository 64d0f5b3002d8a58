use serde::{Deserialize, Serialize};

use std::{env, fs, path::Path, time::Duration};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },

    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("failed to parse {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: usize,
    #[serde(default = "default_pool_timeout", with = "humantime_serde")]
    pub pool_timeout: Duration,
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8000
}

const fn default_pool_max_size() -> usize {
    8
}

const fn default_pool_timeout() -> Duration {
    Duration::from_secs(5)
}

const fn default_run_migrations() -> bool {
    true
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    parse: impl Fn(&str) -> Result<T, String>,
    default: T,
) -> Result<T, ConfigError> {
    lookup(name).map_or(Ok(default), |raw| {
        parse(raw.trim()).map_err(|reason| ConfigError::Invalid { name, reason })
    })
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("expected a boolean, got '{other}'")),
    }
}

/// Builds the config from variables served by `lookup`, applying defaults for
/// everything except the database DSN.
fn load_from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, ConfigError> {
    let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

    Ok(Config {
        database_url,
        host: lookup("HOST").unwrap_or_else(default_host),
        port: parse_var(
            &lookup,
            "PORT",
            |raw| raw.parse::<u16>().map_err(|e| format!("{e}")),
            default_port(),
        )?,
        pool_max_size: parse_var(
            &lookup,
            "DB_POOL_MAX_SIZE",
            |raw| raw.parse::<usize>().map_err(|e| format!("{e}")),
            default_pool_max_size(),
        )?,
        pool_timeout: parse_var(
            &lookup,
            "DB_POOL_TIMEOUT",
            |raw| humantime_serde::re::humantime::parse_duration(raw).map_err(|e| format!("{e}")),
            default_pool_timeout(),
        )?,
        run_migrations: parse_var(
            &lookup,
            "RUN_MIGRATIONS",
            parse_bool,
            default_run_migrations(),
        )?,
    })
}

fn load_from_file(path: &str) -> Result<Config, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_string(),
        source,
    })?;

    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_string(),
        source,
    })
}

pub fn load_config() -> Result<Config, ConfigError> {
    // Optional .env file
    if let Ok(path) = dotenvy::dotenv() {
        tracing::info!("Loaded environment overrides from {}", path.display());
    }

    let config_path = env::var("NOTES_API_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

    if Path::new(&config_path).exists() {
        tracing::info!("Loading configuration from '{}'", config_path);
        return load_from_file(&config_path);
    }

    tracing::info!(
        "Config file '{}' not found, loading configuration from environment variables",
        config_path
    );
    load_from_vars(|name| env::var(name).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn env_defaults_apply() {
        let cfg = load_from_vars(vars(&[("DATABASE_URL", "postgres://localhost/notes")])).unwrap();

        assert_eq!(cfg.database_url, "postgres://localhost/notes");
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 8000);
        assert_eq!(cfg.pool_max_size, 8);
        assert_eq!(cfg.pool_timeout, Duration::from_secs(5));
        assert!(cfg.run_migrations);
    }

    #[test]
    fn env_overrides_are_parsed() {
        let cfg = load_from_vars(vars(&[
            ("DATABASE_URL", "postgres://db/notes"),
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("DB_POOL_MAX_SIZE", "2"),
            ("DB_POOL_TIMEOUT", "1500ms"),
            ("RUN_MIGRATIONS", "off"),
        ]))
        .unwrap();

        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.pool_max_size, 2);
        assert_eq!(cfg.pool_timeout, Duration::from_millis(1500));
        assert!(!cfg.run_migrations);
    }

    #[test]
    fn missing_dsn_is_an_error() {
        let err = load_from_vars(vars(&[])).unwrap_err();

        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn bad_port_is_an_error() {
        let err = load_from_vars(vars(&[("DATABASE_URL", "x"), ("PORT", "eighty")])).unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));
    }

    #[test]
    fn yaml_uses_humantime_and_defaults() {
        let cfg: Config = serde_yaml::from_str(
            "database_url: postgres://db/notes\nport: 8080\npool_timeout: 2s\n",
        )
        .unwrap();

        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.pool_timeout, Duration::from_secs(2));
        assert_eq!(cfg.pool_max_size, 8);
        assert!(cfg.run_migrations);
    }
}
