use anyhow::Result;
use cadence_core::db;
use cadence_core::ledger::CompletionLedger;
use cadence_core::materialization::MaterializationManager;
use cadence_core::repository::{JsonFileRepository, LedgerRepository, SqliteRepository};
use chrono::NaiveDate;

use crate::config::{Config, LedgerBackend};
use crate::parser;
use crate::templates::TemplateStore;

/// Everything a command needs: where templates and completions live, and how
/// instances are materialized.
pub struct App {
    pub templates: TemplateStore,
    pub ledger_repo: Box<dyn LedgerRepository>,
    pub manager: MaterializationManager,
    pub today: NaiveDate,
}

impl App {
    pub async fn open(config: Config) -> Result<Self> {
        let ledger_repo: Box<dyn LedgerRepository> = match config.ledger_backend {
            LedgerBackend::Sqlite => {
                let pool = db::establish_connection(&config.database_path).await?;
                Box::new(SqliteRepository::new(pool))
            }
            LedgerBackend::Json => Box::new(JsonFileRepository::new(&config.ledger_path)),
        };
        tracing::debug!(backend = ?config.ledger_backend, "ledger back end selected");

        Ok(Self {
            templates: TemplateStore::new(&config.templates_path),
            ledger_repo,
            manager: MaterializationManager::new(config.materialization),
            today: parser::today(),
        })
    }

    pub async fn load_ledger(&self) -> Result<CompletionLedger> {
        Ok(CompletionLedger::load(self.ledger_repo.as_ref()).await?)
    }

    pub async fn save_ledger(&self, ledger: &CompletionLedger) -> Result<()> {
        ledger.save(self.ledger_repo.as_ref()).await?;
        Ok(())
    }
}
