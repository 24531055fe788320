use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(
    name = "storefront-rs",
    version,
    about = "Session-gated storefront API serving pricing plans and order history"
)]
pub struct Cli {
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<SocketAddr>,

    #[arg(long, value_name = "URL")]
    pub database_url: Option<String>,

    #[arg(long, value_name = "FILE")]
    pub users_file: Option<PathBuf>,

    #[arg(long, value_name = "HOURS")]
    pub session_ttl_hours: Option<u64>,

    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind: SocketAddr,
    pub database_url: String,
    pub users_file: Option<PathBuf>,
    pub session_ttl_hours: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config in {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("env var {key} is not valid unicode")]
    InvalidEnv { key: String },
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    bind: Option<SocketAddr>,
    database_url: Option<String>,
    users_file: Option<PathBuf>,
    session_ttl_hours: Option<u64>,
}

impl AppConfig {
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let from_file = read_file_config(cli.config.as_deref())?;
        let env_database_url = read_env_string("DATABASE_URL")?;
        Ok(Self::merge(cli, from_file, env_database_url))
    }

    /// CLI beats env beats file beats default.
    fn merge(cli: Cli, from_file: FileConfig, env_database_url: Option<String>) -> Self {
        let bind = cli
            .bind
            .or(from_file.bind)
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 8470)));
        let database_url = cli
            .database_url
            .or(env_database_url)
            .or(from_file.database_url)
            .unwrap_or_else(|| String::from("sqlite://storefront.db"));
        let users_file = cli.users_file.or(from_file.users_file);
        let session_ttl_hours = cli
            .session_ttl_hours
            .or(from_file.session_ttl_hours)
            .unwrap_or(24)
            .max(1);

        Self {
            bind,
            database_url,
            users_file,
            session_ttl_hours,
        }
    }
}

fn read_file_config(path: Option<&Path>) -> Result<FileConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(FileConfig::default());
    };

    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;

    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

fn read_env_string(key: &str) -> Result<Option<String>, ConfigError> {
    match std::env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(_)) => Err(ConfigError::InvalidEnv {
            key: String::from(key),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::net::SocketAddr;
    use std::path::PathBuf;

    use super::{AppConfig, Cli, FileConfig};

    fn empty_cli() -> Cli {
        Cli {
            bind: None,
            database_url: None,
            users_file: None,
            session_ttl_hours: None,
            config: None,
        }
    }

    #[test]
    fn merge_uses_defaults_when_nothing_is_set() {
        let config = AppConfig::merge(empty_cli(), FileConfig::default(), None);
        assert_eq!(config.bind, SocketAddr::from(([0, 0, 0, 0], 8470)));
        assert_eq!(config.database_url, "sqlite://storefront.db");
        assert!(config.users_file.is_none());
        assert_eq!(config.session_ttl_hours, 24);
    }

    #[test]
    fn merge_prefers_cli_over_env_and_file() {
        let cli = Cli {
            database_url: Some(String::from("sqlite://cli.db")),
            ..empty_cli()
        };
        let from_file = FileConfig {
            database_url: Some(String::from("sqlite://file.db")),
            ..FileConfig::default()
        };
        let config = AppConfig::merge(cli, from_file, Some(String::from("sqlite://env.db")));
        assert_eq!(config.database_url, "sqlite://cli.db");
    }

    #[test]
    fn merge_prefers_env_over_file() {
        let from_file = FileConfig {
            database_url: Some(String::from("sqlite://file.db")),
            ..FileConfig::default()
        };
        let config = AppConfig::merge(empty_cli(), from_file, Some(String::from("sqlite://env.db")));
        assert_eq!(config.database_url, "sqlite://env.db");
    }

    #[test]
    fn merge_takes_remaining_values_from_file() {
        let from_file = FileConfig {
            bind: Some(SocketAddr::from(([127, 0, 0, 1], 9000))),
            users_file: Some(PathBuf::from("/etc/storefront/users.toml")),
            session_ttl_hours: Some(48),
            ..FileConfig::default()
        };
        let config = AppConfig::merge(empty_cli(), from_file, None);
        assert_eq!(config.bind, SocketAddr::from(([127, 0, 0, 1], 9000)));
        assert_eq!(
            config.users_file,
            Some(PathBuf::from("/etc/storefront/users.toml"))
        );
        assert_eq!(config.session_ttl_hours, 48);
    }

    #[test]
    fn merge_clamps_session_ttl_to_at_least_one_hour() {
        let cli = Cli {
            session_ttl_hours: Some(0),
            ..empty_cli()
        };
        let config = AppConfig::merge(cli, FileConfig::default(), None);
        assert_eq!(config.session_ttl_hours, 1);
    }
}
