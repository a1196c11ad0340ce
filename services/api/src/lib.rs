mod cli;
mod infra;
mod offline;
mod routes;
mod server;

use attendance_recon::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
