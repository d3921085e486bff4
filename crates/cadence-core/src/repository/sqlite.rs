use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::CompletionRecord;
use async_trait::async_trait;

/// SQLite-backed ledger storage.
pub struct SqliteRepository {
    pool: DbPool,
}

impl SqliteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl super::LedgerRepository for SqliteRepository {
    async fn load_records(&self) -> Result<Vec<CompletionRecord>, CoreError> {
        let records = sqlx::query_as(
            r#"SELECT task_id, date, is_completed, completed_at
            FROM completions
            ORDER BY task_id, date"#,
        )
        .fetch_all(self.pool())
        .await?;
        Ok(records)
    }

    async fn save_records(&self, records: &[CompletionRecord]) -> Result<(), CoreError> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("DELETE FROM completions")
            .execute(&mut *tx)
            .await?;

        for record in records {
            sqlx::query(
                r#"INSERT INTO completions (task_id, date, is_completed, completed_at)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (task_id, date) DO UPDATE SET
                    is_completed = excluded.is_completed,
                    completed_at = excluded.completed_at"#,
            )
            .bind(record.task_id)
            .bind(record.date)
            .bind(record.is_completed)
            .bind(record.completed_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::debug!(records = records.len(), "saved ledger to sqlite");
        Ok(())
    }
}
