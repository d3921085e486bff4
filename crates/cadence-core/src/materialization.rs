use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ledger::{CompletionLedger, CompletionStore};
use crate::models::{InstanceKey, RecurrenceRule, TaskInstance, TaskTemplate};
use crate::recurrence::{appears, next_occurrence};

/// How far back the actionable view looks for an open, missed occurrence.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 60;

/// Longest date range a single range materialization will cover.
pub const DEFAULT_MAX_RANGE_DAYS: u32 = 366;

/// Configuration for materialization behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterializationConfig {
    /// Days searched backward from today (inclusive) for an overdue, still-open occurrence
    pub lookback_days: u32,
    /// Upper bound on the number of days in a range query
    pub max_range_days: u32,
}

impl Default for MaterializationConfig {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            max_range_days: DEFAULT_MAX_RANGE_DAYS,
        }
    }
}

/// MaterializationManager: turns templates into concrete, dated instances.
///
/// Responsibilities:
/// 1. Decide which recurring templates are due on a date or across a range
/// 2. Resolve each instance's completion from the ledger
/// 3. Pick one representative ("actionable") instance per recurring template
///
/// Templates without a recurrence rule are ignored. Nothing here writes to
/// the ledger, so repeated calls with the same inputs give the same output.
#[derive(Debug, Clone, Default)]
pub struct MaterializationManager {
    config: MaterializationConfig,
}

impl MaterializationManager {
    /// Creates a new MaterializationManager with the given configuration.
    pub fn new(config: MaterializationConfig) -> Self {
        Self { config }
    }

    /// Creates a MaterializationManager with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(MaterializationConfig::default())
    }

    /// Gets the current configuration.
    pub fn config(&self) -> &MaterializationConfig {
        &self.config
    }

    /// Updates the configuration for this materialization manager.
    pub fn update_config(&mut self, config: MaterializationConfig) {
        self.config = config;
    }

    /// Instances of every recurring template that occurs on `date`, in
    /// template order.
    pub fn materialize_for_date<S: CompletionStore>(
        &self,
        templates: &[TaskTemplate],
        date: NaiveDate,
        ledger: &CompletionLedger<S>,
    ) -> Vec<TaskInstance> {
        templates
            .iter()
            .filter_map(|template| {
                let rule = template.recurrence_rule()?;
                appears(&rule, date).then(|| build_instance(template, date, ledger))
            })
            .collect()
    }

    /// [`materialize_for_date`](Self::materialize_for_date) for each day in
    /// `[start, end]`. Days with no instances are omitted.
    ///
    /// Returns an empty map when `start > end`. Ranges longer than
    /// `max_range_days` are cut short.
    pub fn materialize_for_range<S: CompletionStore>(
        &self,
        templates: &[TaskTemplate],
        start: NaiveDate,
        end: NaiveDate,
        ledger: &CompletionLedger<S>,
    ) -> BTreeMap<NaiveDate, Vec<TaskInstance>> {
        let mut by_date = BTreeMap::new();
        if start > end {
            return by_date;
        }

        let max_days = self.config.max_range_days as usize;
        let requested_days = (end - start).num_days() as usize + 1;
        if requested_days > max_days {
            tracing::warn!(
                start = %start,
                end = %end,
                max_days,
                "date range too long, truncating"
            );
        }

        // Rules are anchored once per call rather than once per day.
        let rules: Vec<(&TaskTemplate, RecurrenceRule)> = templates
            .iter()
            .filter_map(|t| t.recurrence_rule().map(|rule| (t, rule)))
            .collect();

        for date in start.iter_days().take_while(|d| *d <= end).take(max_days) {
            let instances: Vec<TaskInstance> = rules
                .iter()
                .filter(|(_, rule)| appears(rule, date))
                .map(|(template, _)| build_instance(template, date, ledger))
                .collect();
            if !instances.is_empty() {
                by_date.insert(date, instances);
            }
        }

        by_date
    }

    /// One actionable instance per recurring template, in template order.
    pub fn actionable_instances<S: CompletionStore>(
        &self,
        templates: &[TaskTemplate],
        today: NaiveDate,
        ledger: &CompletionLedger<S>,
    ) -> Vec<TaskInstance> {
        templates
            .iter()
            .filter_map(|template| self.representative_instance(template, today, ledger))
            .collect()
    }

    /// The single instance a list view should show for `template`.
    ///
    /// Overdue first: the most recent occurrence in
    /// `[today - lookback_days, today]` that is still open wins. Otherwise the
    /// next occurrence on or after `today` is used, completed or not. Older
    /// missed occurrences are never surfaced once a later one is open.
    ///
    /// `None` for one-off templates and for rules with no occurrence in reach.
    pub fn representative_instance<S: CompletionStore>(
        &self,
        template: &TaskTemplate,
        today: NaiveDate,
        ledger: &CompletionLedger<S>,
    ) -> Option<TaskInstance> {
        let rule = template.recurrence_rule()?;

        let overdue = (0..=i64::from(self.config.lookback_days))
            .filter_map(|back| today.checked_sub_signed(Duration::days(back)))
            .take_while(|date| *date >= rule.anchor)
            .find(|date| {
                appears(&rule, *date) && !ledger.is_complete(&InstanceKey::new(template.id, *date))
            });

        let date = match overdue {
            Some(date) => date,
            None => next_occurrence(&rule, today)?,
        };
        Some(build_instance(template, date, ledger))
    }
}

fn build_instance<S: CompletionStore>(
    template: &TaskTemplate,
    date: NaiveDate,
    ledger: &CompletionLedger<S>,
) -> TaskInstance {
    let key = InstanceKey::new(template.id, date);
    let completion = ledger.completion(&key);
    TaskInstance {
        id: key.to_string(),
        template: template.clone(),
        date,
        is_completed: completion.is_some(),
        completed_at: completion.and_then(|r| r.completed_at),
    }
}
