//! # SQLite Persistence
//!
//! All functions take a `&SqlitePool` and operate on one table each. Rows
//! map to domain types through one `into_*` function per table; a row that
//! cannot be mapped is a decode error, never a silently defaulted value.
//!
//! The acceptance write in [`records::conditional_accept()`] is the only
//! statement with a concurrency contract: it is a single conditional
//! `UPDATE`, so at most one caller can consume a given accept key.

pub mod issuers;
pub mod recipients;
pub mod records;
pub mod templates;

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::config::CliConfig;

/// Open the connection pool and apply embedded migrations.
///
/// The database file is created if it does not exist.
pub async fn init_pool(config: &CliConfig) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await?;

    tracing::info!(url = %config.database_url, "connected to SQLite");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("database migrations applied");

    Ok(pool)
}

/// Wrap a mapping failure as a decode error.
pub(crate) fn decode_error(err: impl std::error::Error + Send + Sync + 'static) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(err))
}
