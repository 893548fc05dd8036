//! Database migration command.
//!
//! Both binaries share one database, so there is a single migration set,
//! embedded at compile time from `crates/cli/migrations/`. Neither binary
//! runs migrations on startup; this command is the only migration path.

use super::CliError;

/// Run all pending migrations against `DATABASE_URL`.
pub async fn run() -> Result<(), CliError> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Migrations complete");

    Ok(())
}
