//! pgprobe - PostgreSQL reachability over HTTP
//!
//! A small HTTP service with a greeting, a liveness check and a database
//! version probe. The probe runs `SELECT version()` on a connection from a
//! bounded, process-wide pool with explicit acquire and query deadlines.

pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::*;
