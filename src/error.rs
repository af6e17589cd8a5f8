use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::db::ProbeError;

/// Generic bodies; driver errors and connection details stay in the logs.
pub const BODY_UNAVAILABLE: &str = "Database unavailable";
pub const BODY_TIMEOUT: &str = "Database timeout";
pub const BODY_INTERNAL: &str = "Internal server error";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database probe error: {0}")]
    Probe(#[from] ProbeError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Probe(e) => e.status(),
        }
    }
}

/// Generic client-facing message for an error status.
pub fn generic_body(status: StatusCode) -> &'static str {
    match status {
        StatusCode::SERVICE_UNAVAILABLE => BODY_UNAVAILABLE,
        StatusCode::GATEWAY_TIMEOUT => BODY_TIMEOUT,
        _ => BODY_INTERNAL,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Probe failures are already logged with timing by the probe
        let status = self.status();
        (status, generic_body(status)).into_response()
    }
}
