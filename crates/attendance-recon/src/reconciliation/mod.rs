//! Batch reconciliation of turnstile punch logs into the attendance ledger.
//!
//! Stages, each consuming the previous one's output: line parser, person
//! matcher, daily aggregator, absence synthesizer, ledger merger, run report.

mod absences;
mod aggregator;
mod engine;
mod matcher;
mod merger;
pub mod options;
mod parser;
mod report;

#[cfg(test)]
mod tests;

pub use engine::{ReconcileError, ReconciliationRun};
pub use matcher::RegistrationCollision;
pub use options::{DateScope, MinuteRange, OptionsError, RunOptions, ShiftWindows};
pub use parser::PunchEvent;
pub use report::RunReport;
