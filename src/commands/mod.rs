//! Command implementations for the pick'em CLI

pub mod award;
pub mod gate;
pub mod picks;
pub mod rankings;
pub mod set;

use std::path::Path;

use tracing::debug;

use crate::{
    cli::GlobalOpts,
    config::PickemConfig,
    core::api_key_header_map,
    engine::{AdmissionGate, PredictionCache},
    error::PickemError,
    provider::{HttpMatchProvider, MatchProvider, StaticMatchProvider},
    storage::PickDatabase,
    Result,
};


/// Resources shared by every command
pub struct CommandContext {
    pub config: PickemConfig,
    pub db: PickDatabase,
    provider: Option<Box<dyn MatchProvider>>,
}

impl CommandContext {
    /// Read configuration, apply CLI overrides and open the database.
    pub fn new(opts: &GlobalOpts) -> Result<Self> {
        let config = apply_overrides(PickemConfig::from_env()?, opts);
        debug!(db = %config.db_path.display(), "opening database");
        let db = PickDatabase::open(&config.db_path)?;

        let provider = opts.fixtures.as_deref().map(static_provider).transpose()?;

        Ok(Self {
            config,
            db,
            provider,
        })
    }

    /// Build a context around an existing database and provider.
    pub fn with_parts(
        config: PickemConfig,
        db: PickDatabase,
        provider: Box<dyn MatchProvider>,
    ) -> Self {
        Self {
            config,
            db,
            provider: Some(provider),
        }
    }

    /// The database alongside the match provider: the static one when
    /// `--fixtures` was given, else the HTTP one, built on first use.
    pub fn db_and_provider(&mut self) -> Result<(&mut PickDatabase, &dyn MatchProvider)> {
        if self.provider.is_none() {
            self.provider = Some(http_provider(&self.config)?);
        }
        match self.provider.as_deref() {
            Some(provider) => Ok((&mut self.db, provider)),
            None => Err(PickemError::InvalidConfig {
                message: "no match provider configured".to_string(),
            }),
        }
    }

    pub fn gate(&self) -> AdmissionGate {
        AdmissionGate::new(self.config.gate_offset)
    }

    pub fn cache(&self) -> PredictionCache {
        PredictionCache::from_config(&self.config)
    }
}

/// CLI flags win over environment values.
pub fn apply_overrides(mut config: PickemConfig, opts: &GlobalOpts) -> PickemConfig {
    if let Some(db) = &opts.db {
        config.db_path = db.clone();
    }
    if let Some(minutes) = opts.offset_minutes {
        config.gate_offset = chrono::Duration::minutes(i64::from(minutes));
    }
    config
}

fn http_provider(config: &PickemConfig) -> Result<Box<dyn MatchProvider>> {
    let api_key = config
        .api_key
        .as_deref()
        .ok_or_else(|| PickemError::InvalidConfig {
            message: format!(
                "set {} or pass --fixtures <FILE>",
                crate::API_KEY_ENV_VAR
            ),
        })?;
    let headers = api_key_header_map(api_key)?;
    Ok(Box::new(HttpMatchProvider::new(&config.api_base_url, headers)))
}

/// Load a fixtures file into a boxed provider.
pub fn static_provider(path: &Path) -> Result<Box<dyn MatchProvider>> {
    Ok(Box::new(StaticMatchProvider::load(path)?))
}
