use anyhow::{anyhow, Result};
use cadence_core::error::CoreError;
use cadence_core::recurrence::preview_occurrences;
use chrono::Duration;

use crate::app::App;
use crate::cli::{AgendaCommand, DayCommand, NextCommand};
use crate::parser::{parse_date, parse_optional_date};
use crate::util::resolve_task_id;
use crate::views::table::{display_agenda, display_instances, display_occurrences};

pub async fn show_day(app: &App, command: DayCommand) -> Result<()> {
    let date = parse_optional_date(command.date.as_deref(), app.today)?;
    let templates = app.templates.load().await?;
    let ledger = app.load_ledger().await?;

    let instances = app.manager.materialize_for_date(&templates, date, &ledger);
    display_instances(&instances, app.today);
    Ok(())
}

pub async fn show_agenda(app: &App, command: AgendaCommand) -> Result<()> {
    let from = parse_optional_date(command.from.as_deref(), app.today)?;
    let to = match command.to.as_deref() {
        Some(to) => parse_date(to, app.today)?,
        None => from + Duration::days(6),
    };
    if from > to {
        return Err(anyhow!(CoreError::InvalidInput(format!(
            "--from ({}) is after --to ({})",
            from, to
        ))));
    }

    let templates = app.templates.load().await?;
    let ledger = app.load_ledger().await?;

    let agenda = app.manager.materialize_for_range(&templates, from, to, &ledger);
    display_agenda(&agenda, app.today);
    Ok(())
}

pub async fn show_actionable(app: &App, command: DayCommand) -> Result<()> {
    let today = parse_optional_date(command.date.as_deref(), app.today)?;
    let templates = app.templates.load().await?;
    let ledger = app.load_ledger().await?;

    let instances = app.manager.actionable_instances(&templates, today, &ledger);
    display_instances(&instances, today);
    Ok(())
}

pub async fn show_next(app: &App, command: NextCommand) -> Result<()> {
    let templates = app.templates.load().await?;
    let template = resolve_task_id(&templates, &command.id)?;
    let Some(rule) = template.recurrence_rule() else {
        return Err(anyhow!(CoreError::InvalidInput(format!(
            "Task '{}' does not repeat",
            template.name
        ))));
    };

    let from = parse_optional_date(command.from.as_deref(), app.today)?;
    println!("{}: {}", template.name, rule);
    display_occurrences(template, &preview_occurrences(&rule, from, command.count), app.today);
    Ok(())
}
