use crate::offline::{run_reconcile, ReconcileArgs};
use crate::server;
use attendance_recon::error::AppError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Attendance Reconciliation Service",
    about = "Reconcile turnstile punch logs into the attendance ledger, as a service or one-off batch",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Reconcile a punch log against CSV snapshots and print the run report
    Reconcile(ReconcileArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Person directory snapshot to load at startup (CSV: id,registration,shift)
    #[arg(long)]
    pub(crate) people: Option<PathBuf>,
    /// Pre-existing ledger rows to load at startup (CSV: person_id,date,status,observation)
    #[arg(long)]
    pub(crate) ledger: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Reconcile(args) => run_reconcile(args),
    }
}
