pub mod audio;
pub mod config;
pub mod error;
pub mod http;
pub mod session;
pub mod summarize;
pub mod transcribe;

pub use audio::{AudioInfo, AudioInspector, SUPPORTED_FORMATS};
pub use config::{Config, PipelineConfig};
pub use error::PipelineError;
pub use http::{create_router, AppState};
pub use session::{
    MemorySessionStore, Session, SessionPage, SessionPipeline, SessionQuery, SessionStatus,
    SessionStore, SessionSummary,
};
pub use summarize::{
    extract_action_items, extract_summary, summarize_transcript, NoteExtraction,
};
pub use transcribe::{Transcriber, Transcription, MOCK_TRANSCRIPT};
