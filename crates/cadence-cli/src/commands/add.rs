use anyhow::Result;
use cadence_core::models::{EndCondition, RecurrencePattern, TaskTemplate};
use cadence_core::recurrence::next_occurrence;
use owo_colors::{OwoColorize, Style};
use std::num::NonZeroU32;

use crate::app::App;
use crate::cli::AddCommand;
use crate::parser::{parse_date, parse_weekdays};

fn build_pattern(command: &AddCommand, app: &App) -> Result<Option<RecurrencePattern>> {
    let Some(every) = command.every else {
        return Ok(None);
    };

    let mut pattern = RecurrencePattern::new(every);
    if let Some(interval) = command.interval.and_then(NonZeroU32::new) {
        pattern = pattern.every(interval);
    }
    if let Some(on) = &command.on {
        pattern = pattern.on_days(parse_weekdays(on)?);
    }
    if let Some(day) = command.day_of_month {
        pattern = pattern.on_day_of_month(day);
    }
    if command.exclude_weekends {
        pattern = pattern.excluding_weekends();
    }
    if let Some(until) = &command.until {
        pattern = pattern.ending(EndCondition::OnDate(parse_date(until, app.today)?));
    } else if let Some(count) = command.count {
        pattern = pattern.ending(EndCondition::AfterCount(count));
    }

    pattern.validate()?;
    Ok(Some(pattern))
}

pub async fn add_task(app: &App, command: AddCommand) -> Result<()> {
    let due_date = parse_date(&command.due, app.today)?;
    let start_date = command
        .start
        .as_deref()
        .map(|s| parse_date(s, app.today))
        .transpose()?;
    let pattern = build_pattern(&command, app)?;

    let mut template = TaskTemplate::new(command.name, due_date);
    template.description = command.description;
    template.priority = command.priority.unwrap_or_default();
    template.tags = command.tag;
    template.start_date = start_date;
    template.recurrence = pattern;

    let mut templates = app.templates.load().await?;
    templates.push(template.clone());
    app.templates.save(&templates).await?;

    let success_style = Style::new().green().bold();
    let id = template.id.to_string();
    match template.recurrence_rule() {
        Some(rule) => {
            println!(
                "{} Created recurring task '{}' ({})",
                "✓".style(success_style),
                template.name.bold(),
                (&id[..8]).yellow()
            );
            println!("  Repeats: {}", rule);
            match next_occurrence(&rule, app.today) {
                Some(next) => println!("  Next:    {}", next),
                None => println!("  Next:    {}", "no upcoming occurrence".dimmed()),
            }
        }
        None => {
            println!(
                "{} Created task '{}' ({}) due {}",
                "✓".style(success_style),
                template.name.bold(),
                (&id[..8]).yellow(),
                template.due_date
            );
        }
    }

    Ok(())
}
