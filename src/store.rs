//! PostgreSQL connection pool built from the database section of the config.

use crate::config::DatabaseConfig;
use crate::error::AppError;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::time::Duration;

/// Connect options from the database section of the config.
pub fn connect_options(db: &DatabaseConfig) -> PgConnectOptions {
    let mut opts = PgConnectOptions::new()
        .host(&db.host)
        .port(db.port)
        .database(&db.dbname)
        .username(&db.user);
    if !db.password.is_empty() {
        opts = opts.password(&db.password);
    }
    opts
}

/// Open the pool once at startup. No automatic reconnect beyond what the pool itself does.
pub async fn connect(db: &DatabaseConfig) -> Result<PgPool, AppError> {
    tracing::info!(host = %db.host, port = db.port, dbname = %db.dbname, "connecting to database");
    let pool = PgPoolOptions::new()
        .max_connections(db.max_connections)
        .acquire_timeout(Duration::from_secs(db.acquire_timeout_secs))
        .connect_with(connect_options(db))
        .await?;
    Ok(pool)
}
