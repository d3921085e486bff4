use cadence_core::materialization::MaterializationConfig;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where completion records are persisted.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LedgerBackend {
    #[default]
    Sqlite,
    Json,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// SQLite database holding the ledger (sqlite back end)
    pub database_path: String,
    /// JSON file holding the task templates
    pub templates_path: PathBuf,
    pub ledger_backend: LedgerBackend,
    /// JSON file holding the ledger (json back end)
    pub ledger_path: PathBuf,
    pub materialization: MaterializationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: "cadence.db".to_string(),
            templates_path: PathBuf::from("templates.json"),
            ledger_backend: LedgerBackend::default(),
            ledger_path: PathBuf::from("completions.json"),
            materialization: MaterializationConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    /// Defaults, then `cadence.toml`, then `CADENCE_*` environment variables.
    /// Nested keys use a double underscore, e.g. `CADENCE_MATERIALIZATION__LOOKBACK_DAYS`.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("cadence.toml"))
            .merge(Env::prefixed("CADENCE_").split("__"))
    }
}
