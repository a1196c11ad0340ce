//! Reconciles turnstile punch logs into the school attendance ledger.
//!
//! The [`reconciliation`] module holds the batch engine: it parses a raw
//! punch-log file, matches punches to enrolled people, infers which shifts
//! the log covers, synthesizes absences for uncovered people, and merges the
//! result into the attendance store without overwriting manually entered
//! records. The [`directory`] and [`ledger`] modules define the collaborator
//! seams the engine talks to.

pub mod config;
pub mod directory;
pub mod error;
pub mod ledger;
pub mod reconciliation;
pub mod telemetry;
