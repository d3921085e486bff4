use cadence_core::models::{Frequency, TaskPriority};
use clap::{Parser, Subcommand};

/// Recurring tasks, tracked one occurrence at a time
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Add a task template
    Add(AddCommand),
    /// List task templates
    Templates,
    /// Remove a task template and its completion history
    Remove(RemoveCommand),
    /// Show the occurrences due on one day
    Today(DayCommand),
    /// Show the occurrences due across a date range
    Agenda(AgendaCommand),
    /// Show one actionable occurrence per recurring task, overdue first
    Actionable(DayCommand),
    /// Preview the upcoming occurrences of a task
    Next(NextCommand),
    /// Mark an occurrence as completed
    Do(MarkCommand),
    /// Mark an occurrence as not completed
    Undo(MarkCommand),
    /// Inspect or clear the completion ledger
    #[command(subcommand)]
    Ledger(LedgerCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    /// The name of the task
    pub name: String,
    /// The due date of the task (also the recurrence anchor unless --start is given)
    #[clap(short, long)]
    pub due: String,
    /// Date the recurrence is counted from
    #[clap(long)]
    pub start: Option<String>,
    /// The description of the task
    #[clap(long)]
    pub description: Option<String>,
    /// Tags to add to the task
    #[clap(short, long, num_args = 1..)]
    pub tag: Vec<String>,
    /// The priority of the task (none, low, medium, high)
    #[clap(short, long)]
    pub priority: Option<TaskPriority>,
    /// Repeat frequency (daily, weekly, monthly, yearly)
    #[clap(long)]
    pub every: Option<Frequency>,
    /// Repeat every N units of the frequency
    #[clap(long, requires = "every", value_parser = clap::value_parser!(u32).range(1..))]
    pub interval: Option<u32>,
    /// Days of week for weekly recurrence
    #[clap(long, requires = "every", help = "Days of week (mon,tue,wed,thu,fri,sat,sun)")]
    pub on: Option<String>,
    /// Day of month for monthly recurrence
    #[clap(long, requires = "every")]
    pub day_of_month: Option<u32>,
    /// Never occur on Saturdays or Sundays
    #[clap(long, requires = "every")]
    pub exclude_weekends: bool,
    /// Last date the task may occur on
    #[clap(long, requires = "every", conflicts_with = "count")]
    pub until: Option<String>,
    /// Maximum number of occurrences
    #[clap(long, requires = "every")]
    pub count: Option<u32>,
}

#[derive(Parser, Debug, Clone)]
pub struct RemoveCommand {
    /// The ID (or ID prefix) of the task to remove
    pub id: String,
    /// Skip the confirmation prompt
    #[clap(short, long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct DayCommand {
    /// The day to look at (defaults to today)
    #[clap(long)]
    pub date: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct AgendaCommand {
    /// First day of the range (defaults to today)
    #[clap(long)]
    pub from: Option<String>,
    /// Last day of the range, inclusive (defaults to a week after --from)
    #[clap(long)]
    pub to: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct NextCommand {
    /// The ID (or ID prefix) of the task
    pub id: String,
    /// Search from this day (defaults to today)
    #[clap(long)]
    pub from: Option<String>,
    /// How many occurrences to show
    #[clap(short = 'n', long, default_value_t = 5)]
    pub count: usize,
}

#[derive(Parser, Debug, Clone)]
pub struct MarkCommand {
    /// An instance ID (`<task id>_<yyyy-mm-dd>`) or a task ID prefix
    pub id: String,
    /// The occurrence date, when the ID is a task ID (defaults to today)
    #[clap(long)]
    pub date: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum LedgerCommand {
    /// List every completed occurrence
    List,
    /// Delete completion records
    Clear(LedgerClearCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct LedgerClearCommand {
    /// Only clear records of this task (ID or ID prefix)
    #[clap(long)]
    pub task: Option<String>,
    /// Skip the confirmation prompt
    #[clap(short, long)]
    pub force: bool,
}
