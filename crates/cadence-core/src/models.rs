use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::error::CoreError;

/// Canonical on-the-wire date format (`yyyy-MM-dd`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    #[default]
    None,
    Low,
    Medium,
    High,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid task priority: {0}")]
pub struct ParseTaskPriorityError(String);

impl FromStr for TaskPriority {
    type Err = ParseTaskPriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(TaskPriority::None),
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            _ => Err(ParseTaskPriorityError(s.to_string())),
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskPriority::None => write!(f, "none"),
            TaskPriority::Low => write!(f, "low"),
            TaskPriority::Medium => write!(f, "medium"),
            TaskPriority::High => write!(f, "high"),
        }
    }
}

// ============================================================================
// Recurrence Rules
// ============================================================================

/// How often a pattern repeats, before `interval` is applied.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid frequency: {0}")]
pub struct ParseFrequencyError(String);

impl FromStr for Frequency {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" | "day" => Ok(Frequency::Daily),
            "weekly" | "week" => Ok(Frequency::Weekly),
            "monthly" | "month" => Ok(Frequency::Monthly),
            "yearly" | "year" | "annually" => Ok(Frequency::Yearly),
            _ => Err(ParseFrequencyError(s.to_string())),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Daily => write!(f, "daily"),
            Frequency::Weekly => write!(f, "weekly"),
            Frequency::Monthly => write!(f, "monthly"),
            Frequency::Yearly => write!(f, "yearly"),
        }
    }
}

impl Frequency {
    fn unit(&self) -> &'static str {
        match self {
            Frequency::Daily => "day",
            Frequency::Weekly => "week",
            Frequency::Monthly => "month",
            Frequency::Yearly => "year",
        }
    }
}

/// Termination policy of a recurrence.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum EndCondition {
    #[default]
    Never,
    /// Last date (inclusive) on which the rule may occur.
    OnDate(NaiveDate),
    /// Maximum number of occurrences, counted from the anchor.
    AfterCount(u32),
}

fn default_interval() -> NonZeroU32 {
    NonZeroU32::MIN
}

fn is_default_interval(interval: &NonZeroU32) -> bool {
    interval.get() == 1
}

/// A repeating pattern, independent of the date it is anchored to.
///
/// This is what a template stores; [`RecurrencePattern::anchored_at`] turns it
/// into the [`RecurrenceRule`] the engine evaluates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecurrencePattern {
    pub frequency: Frequency,
    #[serde(default = "default_interval", skip_serializing_if = "is_default_interval")]
    pub interval: NonZeroU32,
    /// Weekly only. Empty means "the anchor's weekday".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub days_of_week: Vec<Weekday>,
    /// Monthly only. `None` means "the anchor's day of month".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<u32>,
    #[serde(default)]
    pub exclude_weekends: bool,
    #[serde(default)]
    pub end: EndCondition,
}

impl RecurrencePattern {
    pub fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            interval: default_interval(),
            days_of_week: Vec::new(),
            day_of_month: None,
            exclude_weekends: false,
            end: EndCondition::Never,
        }
    }

    pub fn daily() -> Self {
        Self::new(Frequency::Daily)
    }

    pub fn weekly() -> Self {
        Self::new(Frequency::Weekly)
    }

    pub fn monthly() -> Self {
        Self::new(Frequency::Monthly)
    }

    pub fn yearly() -> Self {
        Self::new(Frequency::Yearly)
    }

    pub fn every(mut self, interval: NonZeroU32) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the weekdays of a weekly pattern, dropping duplicates and keeping
    /// Monday-first order.
    pub fn on_days(mut self, days: impl IntoIterator<Item = Weekday>) -> Self {
        let mut days: Vec<Weekday> = days.into_iter().collect();
        days.sort_by_key(|d| d.num_days_from_monday());
        days.dedup();
        self.days_of_week = days;
        self
    }

    pub fn on_day_of_month(mut self, day: u32) -> Self {
        self.day_of_month = Some(day);
        self
    }

    pub fn excluding_weekends(mut self) -> Self {
        self.exclude_weekends = true;
        self
    }

    pub fn ending(mut self, end: EndCondition) -> Self {
        self.end = end;
        self
    }

    pub fn anchored_at(self, anchor: NaiveDate) -> RecurrenceRule {
        RecurrenceRule {
            anchor,
            pattern: self,
        }
    }

    /// Checks the invariants the predicate relies on but does not guard.
    ///
    /// Call this wherever a pattern enters the system (template creation,
    /// edits, file loads).
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(day) = self.day_of_month {
            if !(1..=31).contains(&day) {
                return Err(CoreError::InvalidRule(format!(
                    "day of month must be between 1 and 31, got {}",
                    day
                )));
            }
            if self.frequency != Frequency::Monthly {
                return Err(CoreError::InvalidRule(format!(
                    "day of month only applies to monthly rules, not {}",
                    self.frequency
                )));
            }
        }
        if !self.days_of_week.is_empty() && self.frequency != Frequency::Weekly {
            return Err(CoreError::InvalidRule(format!(
                "days of week only apply to weekly rules, not {}",
                self.frequency
            )));
        }
        if let EndCondition::AfterCount(0) = self.end {
            return Err(CoreError::InvalidRule(
                "occurrence count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for RecurrencePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interval = self.interval.get();
        if interval == 1 {
            write!(f, "{}", self.frequency)?;
        } else {
            write!(f, "every {} {}s", interval, self.frequency.unit())?;
        }

        if !self.days_of_week.is_empty() {
            let days: Vec<String> = self.days_of_week.iter().map(|d| d.to_string()).collect();
            write!(f, " on {}", days.join(", "))?;
        }
        if let Some(day) = self.day_of_month {
            write!(f, " on day {}", day)?;
        }
        if self.exclude_weekends {
            write!(f, ", weekdays only")?;
        }
        match self.end {
            EndCondition::Never => Ok(()),
            EndCondition::OnDate(date) => write!(f, ", until {}", date.format(DATE_FORMAT)),
            EndCondition::AfterCount(1) => write!(f, ", once"),
            EndCondition::AfterCount(n) => write!(f, ", {} times", n),
        }
    }
}

/// A pattern anchored to the date its arithmetic is computed from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRule {
    pub anchor: NaiveDate,
    #[serde(flatten)]
    pub pattern: RecurrencePattern,
}

impl RecurrenceRule {
    #[inline]
    pub fn frequency(&self) -> Frequency {
        self.pattern.frequency
    }

    #[inline]
    pub fn interval(&self) -> u32 {
        self.pattern.interval.get()
    }

    #[inline]
    pub fn end(&self) -> EndCondition {
        self.pattern.end
    }

    /// Weekdays a weekly rule fires on, falling back to the anchor's weekday.
    pub fn includes_weekday(&self, weekday: Weekday) -> bool {
        if self.pattern.days_of_week.is_empty() {
            self.anchor.weekday() == weekday
        } else {
            self.pattern.days_of_week.contains(&weekday)
        }
    }

    /// Day of month a monthly rule fires on, falling back to the anchor's day.
    #[inline]
    pub fn day_of_month(&self) -> u32 {
        self.pattern.day_of_month.unwrap_or_else(|| self.anchor.day())
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} from {}", self.pattern, self.anchor.format(DATE_FORMAT))
    }
}

// ============================================================================
// Templates and Instances
// ============================================================================

/// A task as supplied by the task-storage collaborator.
///
/// Only `id`, `due_date`, `start_date` and `recurrence` are read by the
/// engine; the other fields are carried into every instance untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskTemplate {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub due_date: NaiveDate,
    /// Overrides `due_date` as the recurrence anchor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrencePattern>,
}

impl TaskTemplate {
    pub fn new(name: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            description: None,
            priority: TaskPriority::None,
            tags: Vec::new(),
            due_date,
            start_date: None,
            recurrence: None,
        }
    }

    pub fn with_recurrence(mut self, pattern: RecurrencePattern) -> Self {
        self.recurrence = Some(pattern);
        self
    }

    pub fn anchor_date(&self) -> NaiveDate {
        self.start_date.unwrap_or(self.due_date)
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }

    /// The anchored rule, or `None` for one-off tasks.
    pub fn recurrence_rule(&self) -> Option<RecurrenceRule> {
        self.recurrence
            .clone()
            .map(|pattern| pattern.anchored_at(self.anchor_date()))
    }
}

/// Identity of one occurrence: a task on a calendar day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub struct InstanceKey {
    pub task_id: Uuid,
    pub date: NaiveDate,
}

impl InstanceKey {
    pub fn new(task_id: Uuid, date: NaiveDate) -> Self {
        Self { task_id, date }
    }
}

impl fmt::Display for InstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.task_id, self.date.format(DATE_FORMAT))
    }
}

impl FromStr for InstanceKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidInstanceKey(s.to_string());
        let (task_id, date) = s.rsplit_once('_').ok_or_else(invalid)?;
        let task_id = task_id.parse::<Uuid>().map_err(|_| invalid())?;
        let date = NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|_| invalid())?;
        Ok(Self { task_id, date })
    }
}

/// Persisted completion state of one occurrence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRecord {
    pub task_id: Uuid,
    pub date: NaiveDate,
    pub is_completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl CompletionRecord {
    pub fn completed(key: InstanceKey, at: DateTime<Utc>) -> Self {
        Self {
            task_id: key.task_id,
            date: key.date,
            is_completed: true,
            completed_at: Some(at),
        }
    }

    pub fn key(&self) -> InstanceKey {
        InstanceKey::new(self.task_id, self.date)
    }
}

/// A template materialized on one date, with its completion resolved.
///
/// Instances are derived on every call and never stored.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskInstance {
    /// Display id, `"{task id}_{yyyy-mm-dd}"`.
    pub id: String,
    pub template: TaskTemplate,
    pub date: NaiveDate,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TaskInstance {
    pub fn key(&self) -> InstanceKey {
        InstanceKey::new(self.template.id, self.date)
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_completed && self.date < today
    }
}
