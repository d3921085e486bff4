/// CLI integration tests for cadence
///
/// These tests run the binary as a black box against temporary data files.
use predicates::prelude::*;

mod helpers;
use helpers::{assertions, CliTestHarness, TestFixtures};

#[test]
fn test_cli_help_and_version() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&["--help"])
        .stdout(predicate::str::contains("Recurring tasks"))
        .stdout(predicate::str::contains("actionable"));

    harness
        .run_success(&["--version"])
        .stdout(predicate::str::contains("cadence"));

    harness
        .run_failure(&["invalid-command"])
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_add_and_list_templates() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&["templates"])
        .stdout(assertions::empty_result());

    harness
        .run_success(&["add", "Pay rent", "--due", "2024-01-01", "--every", "monthly", "--day-of-month", "1"])
        .stdout(assertions::task_created_successfully())
        .stdout(predicate::str::contains("monthly on day 1"));

    harness
        .run_success(&["add", "File taxes", "--due", "2024-04-15", "--priority", "high"])
        .stdout(assertions::task_created_successfully());

    harness
        .run_success(&["templates"])
        .stdout(predicate::str::contains("Pay rent"))
        .stdout(predicate::str::contains("File taxes"))
        .stdout(predicate::str::contains("Once"));

    assert_eq!(harness.template_ids().len(), 2);
}

#[test]
fn test_add_rejects_invalid_input() {
    let harness = CliTestHarness::new();

    harness
        .run_failure(&["add", "Bad day", "--due", "2024-01-01", "--every", "monthly", "--day-of-month", "32"])
        .stderr(predicate::str::contains("Invalid recurrence"));

    harness
        .run_failure(&["add", "Bad days", "--due", "2024-01-01", "--every", "daily", "--on", "mon"])
        .stderr(predicate::str::contains("weekly"));

    harness
        .run_failure(&["add", "Bad weekday", "--due", "2024-01-01", "--every", "weekly", "--on", "funday"])
        .stderr(assertions::has_error());

    harness
        .run_failure(&["add", "Bad date", "--due", "definitely-not-a-date"])
        .stderr(assertions::has_error());

    harness
        .run_failure(&["add", "Zero", "--due", "2024-01-01", "--every", "daily", "--interval", "0"])
        .stderr(predicate::str::contains("error"));

    assert!(!harness.templates_path().exists());
}

#[test]
fn test_today_respects_weekends() {
    let harness = CliTestHarness::new();
    let id = harness.add_task(&TestFixtures::standup_args());

    harness
        .run_success(&["today", "--date", "2024-01-06"])
        .stdout(assertions::empty_result());

    harness
        .run_success(&["today", "--date", "2024-01-08"])
        .stdout(assertions::has_instance_table_headers())
        .stdout(predicate::str::contains("Standup"))
        .stdout(predicate::str::contains(format!("{}_2024-01-08", id)));
}

#[test]
fn test_do_and_undo_occurrence() {
    let harness = CliTestHarness::new();
    let id = harness.add_task(&TestFixtures::standup_args());
    let instance_id = format!("{}_2024-01-08", id);

    harness
        .run_success(&["do", &instance_id])
        .stdout(predicate::str::contains("Completed task: 'Standup' for 2024-01-08"))
        .stdout(predicate::str::contains("Next occurrence: "));

    harness
        .run_success(&["ledger", "list"])
        .stdout(predicate::str::contains("2024-01-08"))
        .stdout(predicate::str::contains("Standup"));

    // Completing one occurrence leaves the next day open.
    harness
        .run_success(&["today", "--date", "2024-01-09"])
        .stdout(predicate::str::contains(format!("{}_2024-01-09", id)))
        .stdout(predicate::str::contains("Done").not());

    harness
        .run_success(&["undo", &id[..8], "--date", "2024-01-08"])
        .stdout(predicate::str::contains("Reopened task"));

    harness
        .run_success(&["undo", &id[..8], "--date", "2024-01-08"])
        .stdout(predicate::str::contains("was not completed"));

    harness
        .run_success(&["ledger", "list"])
        .stdout(predicate::str::contains("No completed occurrences"));
}

#[test]
fn test_do_rejects_non_occurrence() {
    let harness = CliTestHarness::new();
    let id = harness.add_task(&TestFixtures::standup_args());

    harness
        .run_failure(&["do", &id[..8], "--date", "2024-01-06"])
        .stderr(predicate::str::contains("does not occur on 2024-01-06"));
}

#[test]
fn test_do_rejects_one_off_task() {
    let harness = CliTestHarness::new();
    let one_off = harness.add_task(&["Dentist", "--due", "2024-02-01"]);

    harness
        .run_failure(&["do", &one_off, "--date", "2024-02-01"])
        .stderr(predicate::str::contains("Task 'Dentist' does not repeat"));

    harness
        .run_success(&["ledger", "list"])
        .stdout(predicate::str::contains("No completed occurrences"));
}

#[test]
fn test_id_resolution_errors() {
    let harness = CliTestHarness::new();
    harness.write_templates(TestFixtures::ambiguous_templates_json());

    harness
        .run_failure(&["do", "0", "--date", "2024-01-02"])
        .stderr(predicate::str::contains("at least 2 characters"));

    harness
        .run_failure(&["do", "0190a1b2", "--date", "2024-01-02"])
        .stderr(predicate::str::contains("Ambiguous ID"))
        .stderr(predicate::str::contains("Water plants"))
        .stderr(predicate::str::contains("Feed cat"));

    harness
        .run_failure(&["do", "ffff", "--date", "2024-01-02"])
        .stderr(predicate::str::contains("No task found"));

    harness
        .run_success(&["do", "0190a1b2-0000-7000-8000-000000000002", "--date", "2024-01-02"])
        .stdout(predicate::str::contains("Feed cat"));
}

#[test]
fn test_actionable_prefers_latest_open_occurrence() {
    let harness = CliTestHarness::new();
    let id = harness.add_task(&TestFixtures::standup_args());

    for day in ["2024-01-08", "2024-01-09"] {
        harness.run_success(&["do", &id[..8], "--date", day]);
    }

    harness
        .run_success(&["actionable", "--date", "2024-01-10"])
        .stdout(predicate::str::contains(format!("{}_2024-01-10", id)));

    // Saturday: Friday was missed and is surfaced instead of Monday.
    harness
        .run_success(&["actionable", "--date", "2024-01-13"])
        .stdout(predicate::str::contains(format!("{}_2024-01-12", id)))
        .stdout(predicate::str::contains("Overdue"));
}

#[test]
fn test_agenda_over_range() {
    let harness = CliTestHarness::new();
    let id = harness.add_task(&["Gym", "--due", "2024-01-01", "--every", "weekly", "--on", "mon,wed"]);

    harness
        .run_success(&["agenda", "--from", "2024-01-08", "--to", "2024-01-14"])
        .stdout(predicate::str::contains(format!("{}_2024-01-08", id)))
        .stdout(predicate::str::contains(format!("{}_2024-01-10", id)))
        .stdout(predicate::str::contains("2024-01-09").not());

    harness
        .run_failure(&["agenda", "--from", "2024-01-14", "--to", "2024-01-08"])
        .stderr(predicate::str::contains("after"));
}

#[test]
fn test_next_respects_count_limit() {
    let harness = CliTestHarness::new();
    let id = harness.add_task(&["Course", "--due", "2024-01-01", "--every", "daily", "--count", "3"]);

    harness
        .run_success(&["next", &id[..8], "--from", "2024-01-01", "-n", "5"])
        .stdout(predicate::str::contains("2024-01-03"))
        .stdout(predicate::str::contains("2024-01-04").not());

    harness
        .run_success(&["next", &id[..8], "--from", "2024-01-04"])
        .stdout(predicate::str::contains("no upcoming occurrences"));

    let one_off = harness.add_task(&["Dentist", "--due", "2024-02-01"]);
    harness
        .run_failure(&["next", &one_off])
        .stderr(predicate::str::contains("does not repeat"));
}

#[test]
fn test_remove_clears_history() {
    let harness = CliTestHarness::new();
    let id = harness.add_task(&TestFixtures::standup_args());
    harness.run_success(&["do", &id[..8], "--date", "2024-01-08"]);

    harness
        .run_success(&["remove", &id[..8], "--force"])
        .stdout(predicate::str::contains("Removed task 'Standup' (1 completion record cleared)"));

    assert!(harness.template_ids().is_empty());
    harness
        .run_success(&["ledger", "list"])
        .stdout(predicate::str::contains("No completed occurrences"));
}

#[test]
fn test_remove_drops_template_before_touching_ledger() {
    let harness = CliTestHarness::with_backend("json");
    let id = harness.add_task(&TestFixtures::standup_args());
    std::fs::write(harness.ledger_path(), "not json").unwrap();

    // The unreadable ledger fails the command only after the template is gone.
    harness
        .run_failure(&["remove", &id[..8], "--force"])
        .stderr(assertions::has_error());

    assert!(harness.template_ids().is_empty());
    assert_eq!(std::fs::read_to_string(harness.ledger_path()).unwrap(), "not json");
}

#[test]
fn test_ledger_clear() {
    let harness = CliTestHarness::new();
    let standup = harness.add_task(&TestFixtures::standup_args());
    let gym = harness.add_task(&["Gym", "--due", "2024-01-01", "--every", "weekly"]);

    harness.run_success(&["do", &standup, "--date", "2024-01-08"]);
    harness.run_success(&["do", &standup, "--date", "2024-01-09"]);
    harness.run_success(&["do", &format!("{}_2024-01-08", gym)]);

    harness
        .run_success(&["ledger", "clear", "--task", &gym, "--force"])
        .stdout(predicate::str::contains("Cleared 1 completion record."));

    harness
        .run_success(&["ledger", "clear", "--force"])
        .stdout(predicate::str::contains("Cleared 2 completion records."));
}

#[test]
fn test_json_ledger_backend() {
    let harness = CliTestHarness::with_backend("json");
    let id = harness.add_task(&TestFixtures::standup_args());

    harness.run_success(&["do", &id[..8], "--date", "2024-01-08"]);
    assert!(harness.ledger_path().exists());
    assert!(!harness.dir().join("test.db").exists());

    let raw = std::fs::read_to_string(harness.ledger_path()).unwrap();
    assert!(raw.contains("2024-01-08"));

    harness
        .run_success(&["today", "--date", "2024-01-08"])
        .stdout(predicate::str::contains("Done"));
}

#[test]
fn test_invalid_backend_is_reported() {
    let harness = CliTestHarness::with_backend("postgres");

    harness
        .run_failure(&["templates"])
        .stderr(predicate::str::contains("Invalid configuration"));
}
