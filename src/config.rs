//! Runtime configuration read from the environment.

use std::{path::PathBuf, str::FromStr, time::Duration};

use crate::{
    error::{PickemError, Result},
    provider::http::DEFAULT_BASE_URL,
    storage::PickDatabase,
    API_KEY_ENV_VAR,
};

pub const DB_PATH_ENV_VAR: &str = "PICKEM_DB_PATH";
pub const GATE_OFFSET_ENV_VAR: &str = "PICKEM_GATE_OFFSET_MINUTES";
pub const CACHE_TTL_ENV_VAR: &str = "PICKEM_CACHE_TTL_SECS";
pub const READ_TIMEOUT_ENV_VAR: &str = "PICKEM_READ_TIMEOUT_SECS";
pub const API_BASE_URL_ENV_VAR: &str = "PICKEM_API_BASE_URL";

pub const DEFAULT_GATE_OFFSET_MINUTES: i64 = 5;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickemConfig {
    pub db_path: PathBuf,
    /// How long before the earliest kickoff the gate closes.
    pub gate_offset: chrono::Duration,
    pub cache_ttl: Duration,
    pub read_timeout: Duration,
    pub api_base_url: String,
    pub api_key: Option<String>,
}

impl PickemConfig {
    /// Read every `PICKEM_*` variable, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let db_path = match get(DB_PATH_ENV_VAR) {
            Some(path) => PathBuf::from(path),
            None => PickDatabase::default_path()?,
        };

        let offset_minutes: i64 =
            parse_var(GATE_OFFSET_ENV_VAR, get(GATE_OFFSET_ENV_VAR), DEFAULT_GATE_OFFSET_MINUTES)?;
        if offset_minutes < 0 {
            return Err(PickemError::InvalidConfig {
                message: format!("{} must not be negative", GATE_OFFSET_ENV_VAR),
            });
        }

        let cache_ttl_secs: u64 =
            parse_var(CACHE_TTL_ENV_VAR, get(CACHE_TTL_ENV_VAR), DEFAULT_CACHE_TTL_SECS)?;
        let read_timeout_secs: u64 = parse_var(
            READ_TIMEOUT_ENV_VAR,
            get(READ_TIMEOUT_ENV_VAR),
            DEFAULT_READ_TIMEOUT_SECS,
        )?;

        Ok(Self {
            db_path,
            gate_offset: chrono::Duration::minutes(offset_minutes),
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            read_timeout: Duration::from_secs(read_timeout_secs),
            api_base_url: get(API_BASE_URL_ENV_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key: get(API_KEY_ENV_VAR),
        })
    }
}

fn parse_var<T: FromStr>(name: &str, raw: Option<String>, default: T) -> Result<T> {
    match raw {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| PickemError::InvalidConfig {
            message: format!("{} has an invalid value: {:?}", name, raw),
        }),
    }
}
