//! Database layer: the PostgreSQL pool and the version probe.

pub mod postgres;
pub mod probe;

use std::sync::Arc;

use sqlx::PgPool;

pub use postgres::{connect_options, create_pool};
pub use probe::{DatabaseProbe, ProbeError, QueryError, VersionProbe};

use crate::config::AppConfig;

/// Build the process-wide PostgreSQL pool and the probe that uses it.
///
/// No connection is opened here; only the URL is parsed, so a malformed URL
/// fails at startup while an unreachable server does not.
pub fn create_probe(config: &AppConfig) -> Result<(PgPool, Arc<dyn VersionProbe>), sqlx::Error> {
    let pool = create_pool(&config.database, &config.pool)?;
    let probe: Arc<dyn VersionProbe> =
        Arc::new(DatabaseProbe::new(pool.clone(), config.pool.query_timeout()));
    Ok((pool, probe))
}
