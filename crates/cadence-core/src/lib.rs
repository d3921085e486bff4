//! # Cadence Core Library
//!
//! The recurring-task engine behind Cadence: decide on which calendar days a
//! recurring task occurs, track completion of each occurrence separately, and
//! turn templates into concrete, dated instances.
//!
//! ## Features
//!
//! - **Day-Exact Recurrence**: daily, weekly, monthly and yearly patterns with
//!   intervals, weekday/day-of-month constraints and weekend exclusion
//! - **Three End Conditions**: never, on a date, or after a number of occurrences
//! - **Per-Occurrence Completion**: a ledger keyed by `(task, date)` so every
//!   occurrence is completed on its own
//! - **Overdue-First Views**: one actionable instance per recurring task
//! - **Bounded Searches**: every search has a named iteration cap
//! - **Pluggable Persistence**: SQLite or JSON-file storage for the ledger
//!
//! ## Core Modules
//!
//! - [`models`]: Rules, templates, instance keys, records and instances
//! - [`recurrence`]: The appearance predicate and next-occurrence finder
//! - [`ledger`]: The completion ledger and its storage port
//! - [`materialization`]: Template + date + ledger → instances
//! - [`repository`]: Durable ledger storage
//! - [`db`]: Database connection and migration management
//! - [`error`]: Error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use cadence_core::{
//!     db,
//!     ledger::CompletionLedger,
//!     materialization::MaterializationManager,
//!     models::{InstanceKey, RecurrencePattern, TaskTemplate},
//!     repository::SqliteRepository,
//! };
//! use chrono::NaiveDate;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = db::establish_connection("cadence.db").await?;
//!     let repo = SqliteRepository::new(pool);
//!     let mut ledger = CompletionLedger::load(&repo).await?;
//!
//!     let today = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
//!     let standup = TaskTemplate::new("Standup", today)
//!         .with_recurrence(RecurrencePattern::daily().excluding_weekends());
//!
//!     let manager = MaterializationManager::with_defaults();
//!     for instance in manager.materialize_for_date(&[standup.clone()], today, &ledger) {
//!         println!("{} due {}", instance.template.name, instance.date);
//!     }
//!
//!     ledger.mark_complete(InstanceKey::new(standup.id, today))?;
//!     ledger.save(&repo).await?;
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod error;
pub mod ledger;
pub mod materialization;
pub mod models;
pub mod recurrence;
pub mod repository;
