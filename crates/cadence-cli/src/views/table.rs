use cadence_core::models::{CompletionRecord, TaskInstance, TaskPriority, TaskTemplate, DATE_FORMAT};
use chrono::NaiveDate;
use chrono_humanize::Humanize;
use comfy_table::{Attribute, Cell, Color, Row, Table};
use std::collections::BTreeMap;

fn short_id(id: &impl ToString) -> String {
    id.to_string().chars().take(8).collect()
}

fn relative_day(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "today".to_string()
    } else {
        (date - today).humanize()
    }
}

fn name_cell(name: &str, priority: TaskPriority, is_completed: bool) -> Cell {
    let cell = Cell::new(name);
    if is_completed {
        return cell.add_attribute(Attribute::CrossedOut).fg(Color::DarkGrey);
    }
    match priority {
        TaskPriority::High => cell.fg(Color::Red).add_attribute(Attribute::Bold),
        TaskPriority::Medium => cell.fg(Color::Yellow),
        TaskPriority::Low => cell.fg(Color::Green),
        TaskPriority::None => cell,
    }
}

fn tags_cell(tags: &[String]) -> Cell {
    Cell::new(if tags.is_empty() {
        "None".to_string()
    } else {
        tags.join(", ")
    })
}

fn instance_row(instance: &TaskInstance, today: NaiveDate) -> Row {
    let mut row = Row::new();
    row.add_cell(Cell::new(&instance.id));
    row.add_cell(name_cell(
        &instance.template.name,
        instance.template.priority,
        instance.is_completed,
    ));

    let date_text = format!(
        "{} ({})",
        instance.date.format(DATE_FORMAT),
        relative_day(instance.date, today)
    );
    let date_cell = if instance.is_overdue(today) {
        Cell::new(date_text).fg(Color::Red)
    } else if instance.date == today && !instance.is_completed {
        Cell::new(date_text).fg(Color::Yellow)
    } else {
        Cell::new(date_text)
    };
    row.add_cell(date_cell);

    let status_cell = match instance.completed_at {
        Some(at) if instance.is_completed => Cell::new(format!("Done {}", at.humanize())).fg(Color::Green),
        _ if instance.is_completed => Cell::new("Done").fg(Color::Green),
        _ if instance.is_overdue(today) => Cell::new("Overdue").fg(Color::Red),
        _ => Cell::new("Open"),
    };
    row.add_cell(status_cell);
    row.add_cell(tags_cell(&instance.template.tags));
    row
}

pub fn display_instances(instances: &[TaskInstance], today: NaiveDate) {
    if instances.is_empty() {
        println!("No tasks found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Date", "Status", "Tags"]);
    for instance in instances {
        table.add_row(instance_row(instance, today));
    }
    println!("{table}");
}

pub fn display_agenda(agenda: &BTreeMap<NaiveDate, Vec<TaskInstance>>, today: NaiveDate) {
    if agenda.is_empty() {
        println!("No tasks found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Date", "Status", "Tags"]);
    for instances in agenda.values() {
        for instance in instances {
            table.add_row(instance_row(instance, today));
        }
    }
    println!("{table}");
}

pub fn display_templates(templates: &[TaskTemplate]) {
    if templates.is_empty() {
        println!("No tasks found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Due", "Repeats", "Priority", "Tags"]);

    for template in templates {
        let mut row = Row::new();
        row.add_cell(Cell::new(short_id(&template.id)));

        let mut display_name = String::new();
        if template.is_recurring() {
            display_name.push('↻');
            display_name.push(' ');
        }
        display_name.push_str(&template.name);
        row.add_cell(name_cell(&display_name, template.priority, false));

        row.add_cell(Cell::new(template.due_date.format(DATE_FORMAT)));
        row.add_cell(match template.recurrence_rule() {
            Some(rule) => Cell::new(rule.to_string()),
            None => Cell::new("Once").fg(Color::DarkGrey),
        });
        row.add_cell(Cell::new(template.priority.to_string()));
        row.add_cell(tags_cell(&template.tags));
        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_records(records: &[CompletionRecord], templates: &[TaskTemplate]) {
    if records.is_empty() {
        println!("No completed occurrences.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Task", "Name", "Date", "Completed At"]);

    for record in records {
        let mut row = Row::new();
        row.add_cell(Cell::new(short_id(&record.task_id)));
        let name = templates
            .iter()
            .find(|t| t.id == record.task_id)
            .map(|t| Cell::new(&t.name))
            .unwrap_or_else(|| Cell::new("(removed)").fg(Color::DarkGrey));
        row.add_cell(name);
        row.add_cell(Cell::new(record.date.format(DATE_FORMAT)));
        row.add_cell(Cell::new(
            record
                .completed_at
                .map(|at| at.to_rfc3339())
                .unwrap_or_else(|| "Unknown".to_string()),
        ));
        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_occurrences(template: &TaskTemplate, dates: &[NaiveDate], today: NaiveDate) {
    if dates.is_empty() {
        println!("'{}' has no upcoming occurrences.", template.name);
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Date", "Weekday", "When"]);
    for (n, date) in dates.iter().enumerate() {
        let mut row = Row::new();
        row.add_cell(Cell::new(n + 1));
        row.add_cell(Cell::new(date.format(DATE_FORMAT)));
        row.add_cell(Cell::new(date.format("%A")));
        row.add_cell(Cell::new(relative_day(*date, today)));
        table.add_row(row);
    }
    println!("{table}");
}
