use crate::infra;
use attendance_recon::directory::InMemoryPersonDirectory;
use attendance_recon::error::AppError;
use attendance_recon::ledger::InMemoryAttendanceStore;
use attendance_recon::reconciliation::{
    DateScope, MinuteRange, ReconciliationRun, RunOptions, ShiftWindows,
};
use chrono::NaiveDate;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ReconcileArgs {
    /// Punch log file exported by the turnstile device
    #[arg(long)]
    pub(crate) log: PathBuf,
    /// Person directory snapshot (CSV: id,registration,shift)
    #[arg(long)]
    pub(crate) people: PathBuf,
    /// Pre-existing ledger rows (CSV: person_id,date,status,observation)
    #[arg(long)]
    pub(crate) ledger: Option<PathBuf>,
    /// Restrict the run to this date (YYYY-MM-DD); default reconciles every
    /// date found in the file
    #[arg(long, value_parser = infra::parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// Morning window override (HH:MM-HH:MM)
    #[arg(long, value_parser = infra::parse_range)]
    pub(crate) morning: Option<MinuteRange>,
    /// Afternoon window override (HH:MM-HH:MM)
    #[arg(long, value_parser = infra::parse_range)]
    pub(crate) afternoon: Option<MinuteRange>,
    /// Drop punches outside this range (HH:MM-HH:MM)
    #[arg(long, value_parser = infra::parse_range)]
    pub(crate) time_filter: Option<MinuteRange>,
}

/// One-off batch run against CSV snapshots; prints the run report as JSON.
/// The ledger lives in memory, so this is a dry run: useful for vetting a
/// device export before replaying it against the real service.
pub(crate) fn run_reconcile(args: ReconcileArgs) -> Result<(), AppError> {
    let directory =
        InMemoryPersonDirectory::with_people(infra::load_people(&args.people)?);

    let store = InMemoryAttendanceStore::default();
    if let Some(path) = &args.ledger {
        infra::load_ledger(path, &store)?;
    }

    let defaults = ShiftWindows::default();
    let windows = ShiftWindows::new(
        args.morning.unwrap_or(defaults.morning),
        args.afternoon.unwrap_or(defaults.afternoon),
    )?;
    let options = RunOptions {
        windows,
        time_filter: args.time_filter,
        date_scope: args.date.map(DateScope::Single).unwrap_or_default(),
    };

    let report = ReconciliationRun::from_path(&args.log, &directory, &store, &options)?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    println!("{}", report.summary());
    Ok(())
}
