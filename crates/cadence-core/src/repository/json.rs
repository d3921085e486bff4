use crate::error::CoreError;
use crate::models::CompletionRecord;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Ledger storage as a single JSON array of records.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Writes `data` to a sibling temp file, syncs it, then renames it over
/// `path`, so readers never see a partial file. Missing parent directories
/// are created.
pub async fn write_atomic(path: &Path, data: &[u8]) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let temp_path = path.with_extension("tmp");
    let mut file = tokio::fs::File::create(&temp_path).await?;
    file.write_all(data).await?;
    file.sync_all().await?;
    drop(file);

    tokio::fs::rename(&temp_path, path).await?;
    Ok(())
}

#[async_trait]
impl super::LedgerRepository for JsonFileRepository {
    async fn load_records(&self) -> Result<Vec<CompletionRecord>, CoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    async fn save_records(&self, records: &[CompletionRecord]) -> Result<(), CoreError> {
        let json = serde_json::to_string_pretty(records)?;
        write_atomic(&self.path, json.as_bytes()).await?;
        tracing::debug!(path = %self.path.display(), records = records.len(), "saved ledger to file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_atomic_creates_parents_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data.json");

        write_atomic(&path, b"[1]").await.unwrap();
        write_atomic(&path, b"[1,2]").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[1,2]");
        assert!(!path.with_extension("tmp").exists());
    }
}
