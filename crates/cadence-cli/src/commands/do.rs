use anyhow::{anyhow, Result};
use cadence_core::error::CoreError;
use cadence_core::recurrence::{appears, next_occurrence};
use owo_colors::OwoColorize;

use crate::app::App;
use crate::cli::MarkCommand;
use crate::util::resolve_instance;

pub async fn do_task(app: &App, command: MarkCommand) -> Result<()> {
    let templates = app.templates.load().await?;
    let (template, key) = resolve_instance(&templates, &command.id, command.date.as_deref(), app.today)?;

    let Some(rule) = template.recurrence_rule() else {
        return Err(anyhow!(CoreError::InvalidInput(format!(
            "Task '{}' does not repeat",
            template.name
        ))));
    };
    if !appears(&rule, key.date) {
        return Err(anyhow!(CoreError::InvalidInput(format!(
            "'{}' does not occur on {}",
            template.name, key.date
        ))));
    }

    let mut ledger = app.load_ledger().await?;
    ledger.mark_complete(key)?;
    app.save_ledger(&ledger).await?;

    println!("Completed task: '{}' for {}", template.name, key.date);
    if let Some(next) = key.date.succ_opt().and_then(|day| next_occurrence(&rule, day)) {
        println!("Next occurrence: {}", next.to_string().cyan());
    }
    Ok(())
}

pub async fn undo_task(app: &App, command: MarkCommand) -> Result<()> {
    let templates = app.templates.load().await?;
    let (template, key) = resolve_instance(&templates, &command.id, command.date.as_deref(), app.today)?;

    let mut ledger = app.load_ledger().await?;
    if !ledger.is_complete(&key) {
        println!("'{}' was not completed for {}.", template.name, key.date);
        return Ok(());
    }
    ledger.mark_incomplete(key)?;
    app.save_ledger(&ledger).await?;

    println!("Reopened task: '{}' for {}", template.name, key.date);
    Ok(())
}
