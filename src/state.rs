//! Shared application state for request handlers.

use std::sync::Arc;

use crate::db::VersionProbe;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Holds the database probe behind a trait object so the router does not
/// depend on the concrete connection type.
#[derive(Clone)]
pub struct AppState {
    pub probe: Arc<dyn VersionProbe>,
}

impl AppState {
    pub fn new(probe: Arc<dyn VersionProbe>) -> Self {
        Self { probe }
    }
}
