use super::model::{Session, SessionStatus};
use super::store::{SessionPage, SessionQuery, SessionStore};
use crate::audio::AudioInspector;
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::summarize::summarize_transcript;
use crate::transcribe::Transcriber;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, info, warn};

/// Orchestrates one session's journey from raw audio bytes to a persisted
/// structured note, and owns the session state machine.
///
/// Configuration is read once at construction. All mutation of a session
/// during processing goes through this pipeline; per-id locks serialize
/// process/resummarize/delete for the same session while reads stay free.
pub struct SessionPipeline {
    config: PipelineConfig,
    inspector: AudioInspector,
    transcriber: Transcriber,
    store: Arc<dyn SessionStore>,
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl SessionPipeline {
    pub fn new(config: PipelineConfig, store: Arc<dyn SessionStore>) -> Result<Self> {
        let inspector = AudioInspector::new(config.max_file_size_mb);
        let transcriber = Transcriber::from_config(&config)?;
        std::fs::create_dir_all(&config.upload_dir)?;

        Ok(Self {
            config,
            inspector,
            transcriber,
            store,
            locks: Mutex::new(HashMap::new()),
        })
    }

    /// Run the full pipeline against one uploaded recording.
    ///
    /// The returned session always reflects a terminal state: `completed`,
    /// or `error` with `error_message` set and every output from earlier
    /// successful stages preserved. Stage failures never escape as errors.
    pub async fn process(&self, bytes: &[u8], filename: &str) -> Session {
        let mut session = Session::new();
        info!("Processing session {} ({})", session.id, filename);

        let lock = self.id_lock(&session.id);
        let _guard = lock.lock().await;

        self.store.create(session.clone()).await;

        if let Err(e) = self.run_stages(&mut session, bytes, filename).await {
            error!("Processing failed for session {}: {}", session.id, e);
            session.status = SessionStatus::Error;
            session.error_message = Some(e.to_string());
            session.touch();
            self.store.update(session.clone()).await;
        }

        session
    }

    async fn run_stages(
        &self,
        session: &mut Session,
        bytes: &[u8],
        filename: &str,
    ) -> Result<()> {
        // uploading: validate and measure before any expensive work
        let info = self.inspector.inspect(bytes, filename)?;
        session.audio_duration = info.duration_seconds;

        let audio_filename = format!("{}.{}", session.id, info.format);
        tokio::fs::write(self.config.upload_dir.join(&audio_filename), bytes).await?;
        session.audio_filename = Some(audio_filename);

        session.status = SessionStatus::Transcribing;
        session.touch();
        self.store.update(session.clone()).await;

        // transcribing: non-interruptible once started, bounded by timeout
        let limit = Duration::from_secs(self.config.transcribe_timeout_secs);
        let hint = self.config.language_override.as_deref();
        let transcription = timeout(limit, self.transcriber.transcribe(bytes, &info, hint))
            .await
            .map_err(|_| PipelineError::Transcription {
                message: format!(
                    "Transcription timed out after {}s",
                    self.config.transcribe_timeout_secs
                ),
            })??;

        info!(
            "Transcribed session {}: {} chars, language={}",
            session.id,
            transcription.text.len(),
            transcription.language
        );

        session.transcript = Some(transcription.text.clone());
        session.language = Some(
            self.config
                .language_override
                .clone()
                .unwrap_or(transcription.language),
        );
        session.word_count = transcription.text.split_whitespace().count();
        session.status = SessionStatus::Summarizing;
        session.touch();
        self.store.update(session.clone()).await;

        // summarizing: total over any text; empty speech yields empty notes
        let notes = summarize_transcript(&transcription.text, self.config.summary_sentence_count);
        session.summary = Some(notes.summary);
        session.key_points = notes.key_points;
        session.action_items = notes.action_items;
        session.title = Session::derive_title(&transcription.text, session.created_at);
        session.status = SessionStatus::Completed;
        session.touch();
        self.store.update(session.clone()).await;

        info!("Session {} completed", session.id);
        Ok(())
    }

    /// Recompute summary, key points, and action items from the stored
    /// transcript. Transcript, language, audio duration, and creation time
    /// are never touched.
    pub async fn resummarize(&self, id: &str, sentence_count: Option<usize>) -> Result<Session> {
        let lock = self.id_lock(id);
        let _guard = lock.lock().await;

        let mut session = self
            .store
            .get(id)
            .await
            .ok_or_else(|| PipelineError::NotFound { id: id.to_string() })?;

        let transcript = session.transcript.clone().ok_or_else(|| {
            PipelineError::InvalidState {
                message: "No transcript available to summarize".to_string(),
            }
        })?;

        let count = sentence_count.unwrap_or(self.config.summary_sentence_count);
        let notes = summarize_transcript(&transcript, count);

        session.summary = Some(notes.summary);
        session.key_points = notes.key_points;
        session.action_items = notes.action_items;
        session.status = SessionStatus::Completed;
        session.error_message = None;
        session.touch();

        if !self.store.update(session.clone()).await {
            return Err(PipelineError::NotFound { id: id.to_string() });
        }

        info!("Resummarized session {} with {} sentences", id, count);
        Ok(session)
    }

    /// Remove a session and its retained audio file. Honored only after any
    /// in-flight run on the same id finishes.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let lock = self.id_lock(id);
        let _guard = lock.lock().await;

        let session = self
            .store
            .get(id)
            .await
            .ok_or_else(|| PipelineError::NotFound { id: id.to_string() })?;

        if let Some(name) = &session.audio_filename {
            let path = self.config.upload_dir.join(name);
            if let Err(e) = tokio::fs::remove_file(&path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("Could not remove audio file {}: {}", path.display(), e);
                }
            }
        }

        self.store.delete(id).await;
        info!("Deleted session {}", id);

        drop(_guard);
        self.locks
            .lock()
            .expect("lock registry poisoned")
            .remove(id);
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Option<Session> {
        self.store.get(id).await
    }

    pub async fn list(&self, query: &SessionQuery) -> SessionPage {
        self.store.list(query).await
    }

    fn id_lock(&self, id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().expect("lock registry poisoned");
        locks
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}
