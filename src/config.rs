//! Server configuration from the environment
//!
//! A `.env` file in the working directory is loaded first, if present.
//!
//! | Variable          | Default            |
//! |-------------------|--------------------|
//! | `HOST`            | `127.0.0.1`        |
//! | `PORT`            | `8080`             |
//! | `DATA_SOURCE`     | `files`            |
//! | `ODDS_DIR`        | `data/odds`        |
//! | `SIMULATIONS_DIR` | `data/simulations` |
//! | `SYNTHETIC_SEED`  | `7`                |

use std::path::PathBuf;
use thiserror::Error;

use crate::data::DataSource;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_SYNTHETIC_SEED: u64 = 7;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },

    #[error("unknown data source {0:?} (expected \"files\" or \"synthetic\")")]
    UnknownDataSource(String),

    #[error("data source {0:?} is not available in this build")]
    Unsupported(String),
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_source: DataSource,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_source: DataSource::default(),
        }
    }
}

impl ServerConfig {
    /// Load from `.env` and the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is normal
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_var(&lookup, "PORT", DEFAULT_PORT)?;
        let data_source = data_source(&lookup)?;

        Ok(Self {
            host,
            port,
            data_source,
        })
    }

    /// Socket address string for binding
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn data_source<F>(lookup: &F) -> Result<DataSource, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let kind = lookup("DATA_SOURCE").unwrap_or_else(|| "files".to_string());
    let normalized = kind.trim().to_ascii_lowercase();

    match normalized.as_str() {
        "files" => Ok(DataSource::Files {
            odds_dir: lookup("ODDS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/odds")),
            simulations_dir: lookup("SIMULATIONS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/simulations")),
        }),
        #[cfg(feature = "testkit")]
        "synthetic" => Ok(DataSource::Synthetic {
            seed: parse_var(lookup, "SYNTHETIC_SEED", DEFAULT_SYNTHETIC_SEED)?,
        }),
        #[cfg(not(feature = "testkit"))]
        "synthetic" => Err(ConfigError::Unsupported(kind)),
        _ => Err(ConfigError::UnknownDataSource(kind)),
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "9000"),
            ("ODDS_DIR", "/srv/odds"),
        ]))
        .unwrap();

        assert_eq!(config.addr(), "0.0.0.0:9000");
        assert_eq!(
            config.data_source,
            DataSource::Files {
                odds_dir: PathBuf::from("/srv/odds"),
                simulations_dir: PathBuf::from("data/simulations"),
            }
        );
    }

    #[test]
    fn test_invalid_port() {
        let err = ServerConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                var: "PORT",
                value: "eighty".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_data_source() {
        let err = ServerConfig::from_lookup(lookup(&[("DATA_SOURCE", "redis")])).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownDataSource(_)));
    }

    #[cfg(feature = "testkit")]
    #[test]
    fn test_synthetic_source() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("DATA_SOURCE", "synthetic"),
            ("SYNTHETIC_SEED", "42"),
        ]))
        .unwrap();
        assert_eq!(config.data_source, DataSource::Synthetic { seed: 42 });

        let err = ServerConfig::from_lookup(lookup(&[
            ("DATA_SOURCE", "synthetic"),
            ("SYNTHETIC_SEED", "-1"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: "SYNTHETIC_SEED", .. }));
    }
}
