//! Health check endpoint for container orchestration.
//!
//! A liveness probe: returns 200 OK whenever the process can answer HTTP.
//! It deliberately does not touch the database; `/postgres` covers that.

pub const HEALTH_BODY: &str = "OK";

/// Health check handler.
pub async fn health() -> &'static str {
    HEALTH_BODY
}
