use anyhow::Result;
use dialoguer::Confirm;

use crate::app::App;
use crate::cli::RemoveCommand;
use crate::util::resolve_task_id;
use crate::views::table::display_templates;

pub async fn list_templates(app: &App) -> Result<()> {
    let templates = app.templates.load().await?;
    display_templates(&templates);
    Ok(())
}

pub async fn remove_template(app: &App, command: RemoveCommand) -> Result<()> {
    let mut templates = app.templates.load().await?;
    let template = resolve_task_id(&templates, &command.id)?.clone();

    if !command.force {
        let confirmation = Confirm::new()
            .with_prompt(format!(
                "Are you sure you want to remove task '{}' and its completion history?",
                template.name
            ))
            .default(false)
            .interact()
            .unwrap_or(false);

        if !confirmation {
            println!("Removal cancelled.");
            return Ok(());
        }
    }

    templates.retain(|t| t.id != template.id);
    app.templates.save(&templates).await?;

    let mut ledger = app.load_ledger().await?;
    let cleared = ledger.clear_for_task(template.id)?;
    app.save_ledger(&ledger).await?;

    println!(
        "Removed task '{}' ({} completion record{} cleared).",
        template.name,
        cleared,
        if cleared == 1 { "" } else { "s" }
    );
    Ok(())
}
