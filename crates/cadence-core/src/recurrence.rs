//! Occurrence arithmetic: the appearance predicate and the forward finder.
//!
//! Everything here is pure and works at day granularity on [`NaiveDate`].
//! All loops are bounded by the named limits below, so every call terminates
//! regardless of the rule it is given.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::models::{EndCondition, Frequency, RecurrenceRule};

/// Furthest a count-limited rule is replayed from its anchor (in days).
/// Candidates beyond it never match.
pub const COUNT_REPLAY_LIMIT_DAYS: i64 = 10_000;

/// Maximum number of days [`next_occurrence`] steps before giving up.
pub const NEXT_OCCURRENCE_SEARCH_LIMIT: i64 = 1_000;

#[inline]
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Does `rule` occur on `date`?
///
/// Precondition: the rule's pattern passed [`RecurrencePattern::validate`].
/// A day of month outside 1–31 is not guarded here; it simply never matches.
///
/// [`RecurrencePattern::validate`]: crate::models::RecurrencePattern::validate
pub fn appears(rule: &RecurrenceRule, date: NaiveDate) -> bool {
    if !matches_base_pattern(rule, date) {
        return false;
    }
    match rule.end() {
        EndCondition::AfterCount(limit) => {
            occurrence_index(rule, date).is_some_and(|index| index <= limit)
        }
        _ => true,
    }
}

/// Steps 1–4 of the predicate: everything except the occurrence count.
fn matches_base_pattern(rule: &RecurrenceRule, date: NaiveDate) -> bool {
    if date < rule.anchor {
        return false;
    }
    if rule.pattern.exclude_weekends && is_weekend(date) {
        return false;
    }
    if let EndCondition::OnDate(last) = rule.end() {
        if date > last {
            return false;
        }
    }

    let anchor = rule.anchor;
    let interval = i64::from(rule.interval());
    let days_since_anchor = (date - anchor).num_days();

    match rule.frequency() {
        Frequency::Daily => days_since_anchor % interval == 0,
        Frequency::Weekly => {
            // Weeks are counted from the raw day offset, not calendar weeks.
            let weeks_since_anchor = days_since_anchor / 7;
            rule.includes_weekday(date.weekday()) && weeks_since_anchor % interval == 0
        }
        Frequency::Monthly => {
            let months_since_anchor = i64::from(date.year() - anchor.year()) * 12
                + i64::from(date.month()) - i64::from(anchor.month());
            date.day() == rule.day_of_month() && months_since_anchor % interval == 0
        }
        Frequency::Yearly => {
            let years_since_anchor = i64::from(date.year() - anchor.year());
            date.month() == anchor.month()
                && date.day() == anchor.day()
                && years_since_anchor % interval == 0
        }
    }
}

/// 1-based position of `date` among the rule's occurrences, ignoring the
/// count limit. `None` if `date` is not an occurrence or lies beyond
/// [`COUNT_REPLAY_LIMIT_DAYS`].
fn occurrence_index(rule: &RecurrenceRule, date: NaiveDate) -> Option<u32> {
    if !matches_base_pattern(rule, date) {
        return None;
    }
    if (date - rule.anchor).num_days() > COUNT_REPLAY_LIMIT_DAYS {
        return None;
    }
    Some(count_through(rule, date))
}

/// Number of base-pattern occurrences in `[anchor, through]`.
fn count_through(rule: &RecurrenceRule, through: NaiveDate) -> u32 {
    rule.anchor
        .iter_days()
        .take_while(|day| *day <= through)
        .take(COUNT_REPLAY_LIMIT_DAYS as usize + 1)
        .filter(|day| matches_base_pattern(rule, *day))
        .count() as u32
}

/// Earliest occurrence on or after `max(from, anchor)`.
///
/// Returns `None` when the end condition is exhausted or nothing matches
/// within [`NEXT_OCCURRENCE_SEARCH_LIMIT`] days.
pub fn next_occurrence(rule: &RecurrenceRule, from: NaiveDate) -> Option<NaiveDate> {
    if let EndCondition::OnDate(last) = rule.end() {
        if last < from {
            return None;
        }
    }

    let start = from.max(rule.anchor);

    // Occurrences already used up before the search window.
    let mut tally = match rule.end() {
        EndCondition::AfterCount(limit) => {
            let before_start = start.pred_opt()?;
            let used = if before_start < rule.anchor {
                0
            } else if (before_start - rule.anchor).num_days() > COUNT_REPLAY_LIMIT_DAYS {
                return None;
            } else {
                count_through(rule, before_start)
            };
            if used >= limit {
                return None;
            }
            Some((used, limit))
        }
        _ => None,
    };

    for step in 0..NEXT_OCCURRENCE_SEARCH_LIMIT {
        let day = start.checked_add_signed(Duration::days(step))?;
        if let EndCondition::OnDate(last) = rule.end() {
            if day > last {
                return None;
            }
        }
        if !matches_base_pattern(rule, day) {
            continue;
        }
        match tally.as_mut() {
            Some((used, limit)) => {
                *used += 1;
                if *used > *limit || (day - rule.anchor).num_days() > COUNT_REPLAY_LIMIT_DAYS {
                    return None;
                }
                return Some(day);
            }
            None => return Some(day),
        }
    }

    None
}

/// The next `count` occurrences on or after `from`.
pub fn preview_occurrences(rule: &RecurrenceRule, from: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut occurrences = Vec::with_capacity(count.min(64));
    let mut cursor = from;
    while occurrences.len() < count {
        let Some(next) = next_occurrence(rule, cursor) else {
            break;
        };
        occurrences.push(next);
        match next.succ_opt() {
            Some(day) => cursor = day,
            None => break,
        }
    }
    occurrences
}
