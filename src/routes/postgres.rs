//! Database version probe handler.

use axum::extract::State;
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;

/// Answers with the database server's version string, byte-for-byte.
///
/// If the client disconnects, axum drops this future, which cancels the
/// in-flight query and closes its connection.
#[instrument(name = "postgres::version", skip(state))]
pub async fn version(State(state): State<AppState>) -> Result<String, AppError> {
    Ok(state.probe.probe().await?)
}
