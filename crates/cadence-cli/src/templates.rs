use anyhow::{Context, Result};
use cadence_core::error::CoreError;
use cadence_core::models::TaskTemplate;
use cadence_core::repository::write_atomic;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Task templates kept in a JSON file, one array of templates.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    path: PathBuf,
}

impl TemplateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads and validates every template. A missing file is an empty list.
    pub async fn load(&self) -> Result<Vec<TaskTemplate>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", self.path.display()))
            }
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let templates: Vec<TaskTemplate> = serde_json::from_str(&content)
            .map_err(CoreError::from)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;

        for template in &templates {
            if let Some(pattern) = &template.recurrence {
                pattern.validate().map_err(|e| match e {
                    CoreError::InvalidRule(msg) => {
                        CoreError::InvalidRule(format!("task '{}': {}", template.name, msg))
                    }
                    other => other,
                })?;
            }
        }

        tracing::debug!(path = %self.path.display(), templates = templates.len(), "loaded templates");
        Ok(templates)
    }

    pub async fn save(&self, templates: &[TaskTemplate]) -> Result<()> {
        let json = serde_json::to_string_pretty(templates)?;
        write_atomic(&self.path, json.as_bytes())
            .await
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), templates = templates.len(), "saved templates");
        Ok(())
    }
}
