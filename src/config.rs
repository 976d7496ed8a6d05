//! Runtime configuration, read once at startup and handed to the server.

use std::env;
use std::path::PathBuf;

use crate::data::catalog::DEFAULT_CATALOG_PATH;
use crate::data::reservation::DEFAULT_RESERVATIONS_PATH;
use crate::observability::LogFormat;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

pub const BIND_ENV: &str = "BIBLIOTECA_BIND";
pub const CATALOG_ENV: &str = "BIBLIOTECA_CATALOG";
pub const RESERVATIONS_ENV: &str = "BIBLIOTECA_RESERVATIONS";
pub const LOG_FORMAT_ENV: &str = "BIBLIOTECA_LOG_FORMAT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: String,
    pub catalog_path: PathBuf,
    pub reservations_path: PathBuf,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            reservations_path: PathBuf::from(DEFAULT_RESERVATIONS_PATH),
            log_format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup; unset variables keep their defaults.
    /// Runs before logging is initialised, so problems go to stderr.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = AppConfig::default();
        let log_format = match lookup(LOG_FORMAT_ENV) {
            Some(raw) => LogFormat::parse(&raw).unwrap_or_else(|| {
                eprintln!("invalid {LOG_FORMAT_ENV} '{raw}', defaulting to pretty");
                LogFormat::Pretty
            }),
            None => defaults.log_format,
        };
        AppConfig {
            bind_addr: lookup(BIND_ENV).unwrap_or(defaults.bind_addr),
            catalog_path: lookup(CATALOG_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.catalog_path),
            reservations_path: lookup(RESERVATIONS_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.reservations_path),
            log_format,
        }
    }

    /// Config with explicit file locations and default everything else.
    pub fn with_paths(catalog_path: impl Into<PathBuf>, reservations_path: impl Into<PathBuf>) -> Self {
        AppConfig {
            catalog_path: catalog_path.into(),
            reservations_path: reservations_path.into(),
            ..AppConfig::default()
        }
    }
}
