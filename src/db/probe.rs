//! Database version probe.
//!
//! One probe is single-shot: acquire a pooled connection with a bounded wait,
//! run `SELECT version()` under a deadline, then either release the connection
//! or discard it. There is no retry loop; callers decide whether to retry.
//!
//! Discard rules:
//! - success or a server-side SQL error: connection is healthy, release it
//! - transport failure: connection is dead, discard it
//! - query timeout: an abandoned query leaves the wire state unknown, discard it
//! - cancelled caller: the checkout is dropped mid-query and closed

use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::http::StatusCode;
use sqlx::pool::PoolConnection;
use sqlx::{PgPool, Postgres};
use tokio::time::timeout;
use tracing::instrument;

use super::postgres::select_version;

/// The diagnostic query
pub const VERSION_QUERY: &str = "SELECT version()";

#[derive(Debug, Clone, thiserror::Error)]
pub enum QueryError {
    /// The server answered with an error; the connection is still usable
    #[error("query rejected: {0}")]
    Rejected(String),

    /// The connection failed underneath the query
    #[error("connection broken: {0}")]
    Broken(String),

    #[error("expected exactly one row, got {0}")]
    RowCount(usize),
}

impl QueryError {
    /// Whether the connection must be discarded after this error.
    pub fn is_broken(&self) -> bool {
        matches!(self, QueryError::Broken(_))
    }
}

/// Take the only element of a result set.
pub fn single_row(mut rows: Vec<String>) -> Result<String, QueryError> {
    match rows.len() {
        1 => Ok(rows.remove(0)),
        n => Err(QueryError::RowCount(n)),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// No connection became available in time (also returned while shutting down)
    #[error("connection pool exhausted after {waited:?}")]
    PoolExhausted { waited: Duration },

    #[error("database connection failed: {0}")]
    ConnectionFailed(String),

    #[error("query exceeded its {after:?} deadline")]
    QueryTimeout { after: Duration },

    #[error("query failed: {0}")]
    QueryFailed(#[from] QueryError),
}

impl ProbeError {
    /// Classify a failed `acquire`.
    ///
    /// sqlx retries refused connections until the acquire deadline, so an
    /// unreachable server usually lands here as `PoolTimedOut`.
    pub fn from_acquire(err: sqlx::Error, waited: Duration) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                ProbeError::PoolExhausted { waited }
            }
            other => ProbeError::ConnectionFailed(other.to_string()),
        }
    }

    /// Short machine-readable kind for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ProbeError::PoolExhausted { .. } => "pool_exhausted",
            ProbeError::ConnectionFailed(_) => "connection_failed",
            ProbeError::QueryTimeout { .. } => "query_timeout",
            ProbeError::QueryFailed(_) => "query_failed",
        }
    }

    /// HTTP status the front end answers with.
    pub fn status(&self) -> StatusCode {
        match self {
            ProbeError::PoolExhausted { .. } | ProbeError::ConnectionFailed(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ProbeError::QueryTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            ProbeError::QueryFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Object-safe probe interface held by the router.
#[async_trait]
pub trait VersionProbe: Send + Sync {
    /// Report the database server's version string.
    async fn probe(&self) -> Result<String, ProbeError>;
}

/// A checked-out connection that goes back to the pool only through
/// `release`. Dropping it any other way closes the connection.
struct Checkout {
    conn: PoolConnection<Postgres>,
    keep: bool,
}

impl Checkout {
    fn new(conn: PoolConnection<Postgres>) -> Self {
        Self { conn, keep: false }
    }

    fn release(mut self) {
        self.keep = true;
    }
}

impl Drop for Checkout {
    fn drop(&mut self) {
        if !self.keep {
            tracing::debug!("Discarding connection");
            self.conn.close_on_drop();
        }
    }
}

/// Version probe backed by the shared PostgreSQL pool.
pub struct DatabaseProbe {
    pool: PgPool,
    query_timeout: Duration,
}

impl DatabaseProbe {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn run(&self) -> Result<String, ProbeError> {
        tracing::debug!("Acquiring connection");
        let started = Instant::now();
        let conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| ProbeError::from_acquire(e, started.elapsed()))?;
        let mut checkout = Checkout::new(conn);

        tracing::debug!("Querying");
        match timeout(self.query_timeout, select_version(&mut checkout.conn)).await {
            Ok(Ok(version)) => {
                checkout.release();
                Ok(version)
            }
            Ok(Err(e)) => {
                if !e.is_broken() {
                    checkout.release();
                }
                Err(e.into())
            }
            Err(_) => Err(ProbeError::QueryTimeout {
                after: self.query_timeout,
            }),
        }
    }
}

#[async_trait]
impl VersionProbe for DatabaseProbe {
    #[instrument(name = "probe", skip(self))]
    async fn probe(&self) -> Result<String, ProbeError> {
        let started = Instant::now();
        let result = self.run().await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => tracing::debug!(elapsed_ms, "Probe succeeded"),
            Err(e) => tracing::warn!(
                kind = e.kind(),
                elapsed_ms,
                size = self.pool.size(),
                idle = self.pool.num_idle(),
                error = %e,
                "Probe failed"
            ),
        }

        result
    }
}
