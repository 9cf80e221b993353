mod cli;
mod console;
mod infra;
mod routes;
mod server;

use estate_catalog::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
