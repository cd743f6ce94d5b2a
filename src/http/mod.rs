//! HTTP API for uploads and session history (web/recording UI)
//!
//! Thin plumbing over the pipeline's public operations:
//! - POST /api/sessions - Upload a recording, process it synchronously
//! - GET /api/sessions - List/search history with pagination
//! - GET /api/sessions/:id - Fetch one session
//! - DELETE /api/sessions/:id - Delete a session and its audio
//! - POST /api/sessions/:id/resummarize - Recompute the note outputs
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
