use anyhow::{anyhow, Result};
use cadence_core::error::CoreError;
use cadence_core::models::{InstanceKey, TaskTemplate};
use chrono::NaiveDate;

use crate::parser::parse_optional_date;

/// Finds the template whose ID starts with `short_id`.
pub fn resolve_task_id<'a>(templates: &'a [TaskTemplate], short_id: &str) -> Result<&'a TaskTemplate> {
    if short_id.len() < 2 {
        return Err(anyhow!(CoreError::InvalidInput(
            "Short ID must be at least 2 characters long.".to_string()
        )));
    }
    let prefix = short_id.to_lowercase();
    let matches: Vec<&TaskTemplate> = templates
        .iter()
        .filter(|t| t.id.to_string().starts_with(&prefix))
        .collect();

    match matches.as_slice() {
        [template] => Ok(*template),
        [] => Err(anyhow!(CoreError::NotFound(format!(
            "No task found with ID prefix '{}'",
            short_id
        )))),
        _ => {
            let task_info: Vec<(String, String)> = matches
                .iter()
                .map(|t| (t.id.to_string(), t.name.clone()))
                .collect();
            Err(anyhow!(CoreError::AmbiguousId(task_info)))
        }
    }
}

/// Resolves an occurrence from either an instance ID (`<task id>_<date>`) or
/// a task ID prefix plus an optional date (defaulting to `today`).
pub fn resolve_instance<'a>(
    templates: &'a [TaskTemplate],
    id: &str,
    date: Option<&str>,
    today: NaiveDate,
) -> Result<(&'a TaskTemplate, InstanceKey)> {
    if let Ok(key) = id.parse::<InstanceKey>() {
        if date.is_some() {
            return Err(anyhow!(CoreError::InvalidInput(
                "--date cannot be combined with an instance ID".to_string()
            )));
        }
        let template = templates
            .iter()
            .find(|t| t.id == key.task_id)
            .ok_or_else(|| CoreError::NotFound(format!("No task found with ID '{}'", key.task_id)))?;
        return Ok((template, key));
    }

    let template = resolve_task_id(templates, id)?;
    let date = parse_optional_date(date, today)?;
    Ok((template, InstanceKey::new(template.id, date)))
}
