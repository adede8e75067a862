use std::sync::Arc;

use crate::optimizer::pipeline::ResumeOptimizer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Built once at startup around the configured backend client.
    pub optimizer: Arc<ResumeOptimizer>,
}
