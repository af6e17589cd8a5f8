//! HTTP server module.
//!
//! Plain HTTP only; TLS termination is left to the hosting environment
//! (load balancer, ingress or reverse proxy).
//!
//! The server includes:
//! - Graceful shutdown on SIGTERM/SIGINT with a bounded drain period

mod server;
mod shutdown;

pub use server::{serve, start_server, ServerError};
