//! PostgreSQL pool and query via sqlx.
//!
//! Uses sqlx `PgPool` with explicit limits and deadlines. Connection target,
//! credentials, database name and `sslmode` all come from the connection URL.

use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgConnection, PgPoolOptions};
use sqlx::PgPool;

use super::probe::{single_row, QueryError, VERSION_QUERY};
use crate::config::{DatabaseConfig, PoolSettings};

/// Parse a `postgres://` URL. A malformed URL is a startup error.
pub fn connect_options(
    url: &str,
    application_name: &str,
) -> Result<PgConnectOptions, sqlx::Error> {
    Ok(PgConnectOptions::from_str(url)?.application_name(application_name))
}

/// Create the process-wide PostgreSQL pool.
///
/// No connection is opened here. Connections are made on first use, so an
/// unreachable server surfaces as a probe failure rather than a startup error.
pub fn create_pool(
    database: &DatabaseConfig,
    settings: &PoolSettings,
) -> Result<PgPool, sqlx::Error> {
    let options = connect_options(&database.url, &database.application_name)?;

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_size)
        .min_connections(0)
        .acquire_timeout(settings.acquire_timeout())
        .idle_timeout(settings.idle_timeout())
        .test_before_acquire(settings.test_on_checkout)
        .connect_lazy_with(options);

    Ok(pool)
}

/// Run the version query on one connection.
pub async fn select_version(conn: &mut PgConnection) -> Result<String, QueryError> {
    // fetch_all so a multi-row answer is detected instead of truncated
    let rows: Vec<String> = sqlx::query_scalar(VERSION_QUERY).fetch_all(conn).await?;
    single_row(rows)
}

/// SQLSTATE classes meaning the backend is gone: connection exception (08)
/// and operator intervention such as `pg_terminate_backend` (57P).
fn is_disconnect_code(code: &str) -> bool {
    code.starts_with("08") || code.starts_with("57P")
}

impl From<sqlx::Error> for QueryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db) if db.code().is_some_and(|c| is_disconnect_code(&c)) => {
                QueryError::Broken(err.to_string())
            }
            sqlx::Error::Database(_)
            | sqlx::Error::RowNotFound
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_) => QueryError::Rejected(err.to_string()),
            other => QueryError::Broken(other.to_string()),
        }
    }
}
