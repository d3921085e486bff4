use anyhow::Result;
use dialoguer::Confirm;

use crate::app::App;
use crate::cli::{LedgerClearCommand, LedgerCommand};
use crate::util::resolve_task_id;
use crate::views::table::display_records;

pub async fn ledger_command(app: &App, command: LedgerCommand) -> Result<()> {
    match command {
        LedgerCommand::List => list_records(app).await,
        LedgerCommand::Clear(command) => clear_records(app, command).await,
    }
}

async fn list_records(app: &App) -> Result<()> {
    let templates = app.templates.load().await?;
    let ledger = app.load_ledger().await?;
    display_records(&ledger.list_all()?, &templates);
    Ok(())
}

async fn clear_records(app: &App, command: LedgerClearCommand) -> Result<()> {
    let templates = app.templates.load().await?;
    let task = command
        .task
        .as_deref()
        .map(|id| resolve_task_id(&templates, id))
        .transpose()?;

    if !command.force {
        let prompt = match task {
            Some(t) => format!("Clear the completion history of '{}'?", t.name),
            None => "Clear the completion history of every task?".to_string(),
        };
        let confirmation = Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false);

        if !confirmation {
            println!("Clear cancelled.");
            return Ok(());
        }
    }

    let mut ledger = app.load_ledger().await?;
    let cleared = match task {
        Some(t) => ledger.clear_for_task(t.id)?,
        None => ledger.clear_all()?,
    };
    app.save_ledger(&ledger).await?;

    println!("Cleared {} completion record{}.", cleared, if cleared == 1 { "" } else { "s" });
    Ok(())
}
