use crate::session::SessionPipeline;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The processing pipeline; owns all session mutation.
    pub pipeline: Arc<SessionPipeline>,
}

impl AppState {
    pub fn new(pipeline: Arc<SessionPipeline>) -> Self {
        Self { pipeline }
    }
}
