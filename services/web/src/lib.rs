mod cli;
mod commands;
mod infra;
mod pages;
mod routes;
mod server;

use cheongyak::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
