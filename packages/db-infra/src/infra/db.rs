use std::future::Future;
use std::time::{Duration, Instant};

use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::{info, warn};

use crate::config::db::{db_url, sanitize_db_url, DbKind};
use crate::error::DbInfraError;

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_INTERVAL_MS: u64 = 500;

async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    max_attempts: u32,
    interval_ms: u64,
) -> Result<T, DbInfraError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbInfraError>>,
{
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        match connect_fn().await {
            Ok(result) => {
                if attempt > 1 {
                    info!(attempts = attempt, interval_ms, "connection_retry=success");
                }
                return Ok(result);
            }
            Err(e) => {
                last_error = Some(e);
                if attempt < max_attempts {
                    warn!(attempt, max_attempts, interval_ms, "connection_retry=failed");
                    tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| {
        DbInfraError::config("no error recorded after max attempts")
    }))
}

fn connect_options(kind: DbKind, url: String) -> ConnectOptions {
    let mut opts = ConnectOptions::new(url);
    opts.sqlx_logging(false)
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(10));

    match kind {
        // Every pooled connection to `sqlite::memory:` is a separate database.
        DbKind::SqliteMemory => {
            opts.max_connections(1).min_connections(1);
        }
        DbKind::SqliteFile => {
            opts.max_connections(4);
        }
        DbKind::Postgres => {
            opts.max_connections(16).min_connections(1);
        }
    }
    opts
}

/// Open a pool for `kind`. Does not run migrations.
pub async fn connect_db(kind: DbKind) -> Result<DatabaseConnection, DbInfraError> {
    let url = db_url(kind)?;
    let safe_url = sanitize_db_url(&url);
    let started = Instant::now();

    // Only a remote server is worth retrying.
    let attempts = if kind == DbKind::Postgres {
        CONNECT_ATTEMPTS
    } else {
        1
    };

    let conn = retry_connection(
        || {
            let opts = connect_options(kind, url.clone());
            let safe_url = safe_url.clone();
            async move {
                Database::connect(opts)
                    .await
                    .map_err(|source| DbInfraError::Connect {
                        message: format!("could not connect to {safe_url}"),
                        source,
                    })
            }
        },
        attempts,
        CONNECT_INTERVAL_MS,
    )
    .await?;

    info!(
        db_kind = %kind,
        url = %safe_url,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "database connected"
    );
    Ok(conn)
}

/// Connect and bring the schema up to date. Single entrypoint for the app.
pub async fn bootstrap_db(kind: DbKind) -> Result<DatabaseConnection, DbInfraError> {
    let conn = connect_db(kind).await?;
    migrate(&conn, MigrationCommand::Up)
        .await
        .map_err(|source| DbInfraError::Migration { source })?;
    Ok(conn)
}

/// Connect and run an arbitrary migration command (used by the CLI).
pub async fn orchestrate_migration(
    kind: DbKind,
    command: MigrationCommand,
) -> Result<(), DbInfraError> {
    if kind == DbKind::SqliteMemory {
        return Err(DbInfraError::config(
            "in-memory SQLite is discarded when the process exits; migrate a file or postgres database instead",
        ));
    }
    let conn = connect_db(kind).await?;
    migrate(&conn, command)
        .await
        .map_err(|source| DbInfraError::Migration { source })
}
