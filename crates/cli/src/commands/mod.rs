//! CLI command implementations.

pub mod brand;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use sqlx::PgPool;

use maison_admin::db;

/// Errors a CLI command can fail with.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("missing environment variable {0}")]
    MissingEnvVar(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("{0}")]
    Repository(#[from] db::RepositoryError),

    #[error("{0}")]
    App(#[from] maison_admin::error::AppError),
}

/// Connect to the database named by `DATABASE_URL`.
///
/// Loads a `.env` file if one is present, matching the two service
/// binaries.
pub async fn connect() -> Result<PgPool, CliError> {
    dotenvy::dotenv().ok();

    let database_url: SecretString = std::env::var("DATABASE_URL")
        .map_err(|_| CliError::MissingEnvVar("DATABASE_URL"))?
        .into();

    Ok(db::create_pool(&database_url).await?)
}
