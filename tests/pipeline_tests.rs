// End-to-end tests for the session pipeline (mock transcriber)
//
// These tests run the full upload → transcribe → summarize flow against an
// in-memory store and verify the state machine, error retention, the
// resummarize contract, and history queries.

use anyhow::Result;
use std::sync::Arc;
use tempfile::TempDir;
use voiceaid::{
    MemorySessionStore, PipelineConfig, PipelineError, SessionPipeline, SessionQuery,
    SessionStatus,
};

/// Synthesize an in-memory WAV file of the given length.
fn make_wav(duration_secs: f64, sample_rate: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = std::io::Cursor::new(Vec::new());
    let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
    let total = (duration_secs * sample_rate as f64).round() as usize;
    for _ in 0..total {
        writer.write_sample(0i16).unwrap();
    }
    writer.finalize().unwrap();
    cursor.into_inner()
}

/// Mock-mode pipeline writing uploads into a temp dir.
fn mock_pipeline(upload_dir: &TempDir) -> SessionPipeline {
    let config = PipelineConfig {
        mock_mode: true,
        upload_dir: upload_dir.path().to_path_buf(),
        ..PipelineConfig::default()
    };
    SessionPipeline::new(config, Arc::new(MemorySessionStore::new()))
        .expect("mock pipeline should construct")
}

#[tokio::test]
async fn test_end_to_end_demo_upload() -> Result<()> {
    let dir = TempDir::new()?;
    let pipeline = mock_pipeline(&dir);

    let wav = make_wav(45.2, 8000);
    let session = pipeline.process(&wav, "demo.wav").await;

    assert_eq!(session.status, SessionStatus::Completed);
    assert_eq!(session.word_count, 98);
    assert_eq!(session.language.as_deref(), Some("en"));
    assert!((session.audio_duration - 45.2).abs() < 0.001);

    let summary = session.summary.as_deref().expect("summary must be set");
    assert!(!summary.is_empty());
    assert!(!session.key_points.is_empty());
    assert!(!session.action_items.is_empty());
    assert!(session.error_message.is_none());

    // Title comes from the transcript prefix.
    assert!(session.title.starts_with("Welcome to the VoiceAid"));

    // The audio file is retained under the upload dir.
    let audio_name = session.audio_filename.expect("audio should be retained");
    assert!(dir.path().join(audio_name).exists());

    Ok(())
}

#[tokio::test]
async fn test_processed_session_is_persisted_and_fetchable() -> Result<()> {
    let dir = TempDir::new()?;
    let pipeline = mock_pipeline(&dir);

    let session = pipeline.process(&make_wav(1.0, 8000), "note.wav").await;
    let fetched = pipeline.get(&session.id).await.expect("session should exist");

    assert_eq!(fetched.status, SessionStatus::Completed);
    assert_eq!(fetched.transcript, session.transcript);
    assert_eq!(fetched.summary, session.summary);
    Ok(())
}

#[tokio::test]
async fn test_unsupported_format_fails_in_uploading() -> Result<()> {
    let dir = TempDir::new()?;
    let pipeline = mock_pipeline(&dir);

    let session = pipeline.process(b"plain text", "notes.txt").await;

    assert_eq!(session.status, SessionStatus::Error);
    let message = session.error_message.expect("error_message must be set");
    assert!(message.contains("Unsupported audio format"), "got: {}", message);
    // Nothing past the uploading stage ran.
    assert!(session.transcript.is_none());
    assert!(session.summary.is_none());
    assert_eq!(session.word_count, 0);

    // The failed session stays browsable in history.
    let page = pipeline
        .list(&SessionQuery {
            status: Some(SessionStatus::Error),
            ..SessionQuery::default()
        })
        .await;
    assert_eq!(page.total, 1);
    assert_eq!(page.sessions[0].id, session.id);
    Ok(())
}

#[tokio::test]
async fn test_oversized_upload_fails_in_uploading() -> Result<()> {
    let dir = TempDir::new()?;
    let config = PipelineConfig {
        mock_mode: true,
        max_file_size_mb: 1,
        upload_dir: dir.path().to_path_buf(),
        ..PipelineConfig::default()
    };
    let pipeline = SessionPipeline::new(config, Arc::new(MemorySessionStore::new()))?;

    let blob = vec![0u8; 2 * 1024 * 1024];
    let session = pipeline.process(&blob, "huge.mp3").await;

    assert_eq!(session.status, SessionStatus::Error);
    assert!(session
        .error_message
        .expect("error_message must be set")
        .contains("File too large"));
    assert!(session.transcript.is_none());
    Ok(())
}

#[tokio::test]
async fn test_corrupt_wav_still_completes_in_mock_mode() -> Result<()> {
    let dir = TempDir::new()?;
    let pipeline = mock_pipeline(&dir);

    // Unreadable header: duration degrades to 0.0 but the pipeline runs on.
    let session = pipeline.process(b"RIFF-but-not-really", "broken.wav").await;

    assert_eq!(session.status, SessionStatus::Completed);
    assert_eq!(session.audio_duration, 0.0);
    assert!(session.summary.is_some());
    Ok(())
}

#[tokio::test]
async fn test_resummarize_round_trip_preserves_immutable_fields() -> Result<()> {
    let dir = TempDir::new()?;
    let pipeline = mock_pipeline(&dir);

    let original = pipeline.process(&make_wav(45.2, 8000), "demo.wav").await;

    let narrow = pipeline.resummarize(&original.id, Some(3)).await?;
    let wide = pipeline.resummarize(&original.id, Some(5)).await?;

    for reworked in [&narrow, &wide] {
        assert_eq!(reworked.transcript, original.transcript);
        assert_eq!(reworked.language, original.language);
        assert_eq!(reworked.audio_duration, original.audio_duration);
        assert_eq!(reworked.created_at, original.created_at);
        assert_eq!(reworked.title, original.title);
        assert_eq!(reworked.status, SessionStatus::Completed);
    }

    // Only the note outputs change between widths.
    assert_ne!(narrow.summary, wide.summary);
    assert_eq!(wide.summary, original.summary);
    Ok(())
}

#[tokio::test]
async fn test_resummarize_missing_session_is_not_found() -> Result<()> {
    let dir = TempDir::new()?;
    let pipeline = mock_pipeline(&dir);

    let result = pipeline.resummarize("no-such-id", Some(3)).await;
    assert!(matches!(result, Err(PipelineError::NotFound { .. })));
    Ok(())
}

#[tokio::test]
async fn test_resummarize_without_transcript_is_invalid_state() -> Result<()> {
    let dir = TempDir::new()?;
    let pipeline = mock_pipeline(&dir);

    // Fails during uploading, so no transcript was ever produced.
    let failed = pipeline.process(b"data", "notes.txt").await;
    assert_eq!(failed.status, SessionStatus::Error);

    let result = pipeline.resummarize(&failed.id, None).await;
    assert!(matches!(result, Err(PipelineError::InvalidState { .. })));

    // The stored session was not mutated by the failed resummarize.
    let stored = pipeline.get(&failed.id).await.expect("still stored");
    assert_eq!(stored.status, SessionStatus::Error);
    Ok(())
}

#[tokio::test]
async fn test_delete_removes_session_and_audio() -> Result<()> {
    let dir = TempDir::new()?;
    let pipeline = mock_pipeline(&dir);

    let session = pipeline.process(&make_wav(1.0, 8000), "note.wav").await;
    let audio_path = dir
        .path()
        .join(session.audio_filename.clone().expect("audio retained"));
    assert!(audio_path.exists());

    pipeline.delete(&session.id).await?;

    assert!(pipeline.get(&session.id).await.is_none());
    assert!(!audio_path.exists(), "audio file should be removed");
    assert_eq!(pipeline.list(&SessionQuery::default()).await.total, 0);

    // Second delete reports not-found.
    let again = pipeline.delete(&session.id).await;
    assert!(matches!(again, Err(PipelineError::NotFound { .. })));
    Ok(())
}

#[tokio::test]
async fn test_search_matches_transcript_case_insensitively() -> Result<()> {
    let dir = TempDir::new()?;
    let pipeline = mock_pipeline(&dir);

    // One completed session (with the demo transcript) and one that failed
    // before transcription.
    let completed = pipeline.process(&make_wav(1.0, 8000), "note.wav").await;
    let _failed = pipeline.process(b"data", "notes.txt").await;

    let page = pipeline
        .list(&SessionQuery {
            search: Some("VOICEAID DEMO".to_string()),
            ..SessionQuery::default()
        })
        .await;

    assert_eq!(page.total, 1);
    assert_eq!(page.sessions[0].id, completed.id);
    Ok(())
}

#[tokio::test]
async fn test_concurrent_resummarize_calls_serialize() -> Result<()> {
    let dir = TempDir::new()?;
    let pipeline = Arc::new(mock_pipeline(&dir));

    let session = pipeline.process(&make_wav(1.0, 8000), "note.wav").await;

    let a = {
        let pipeline = Arc::clone(&pipeline);
        let id = session.id.clone();
        tokio::spawn(async move { pipeline.resummarize(&id, Some(3)).await })
    };
    let b = {
        let pipeline = Arc::clone(&pipeline);
        let id = session.id.clone();
        tokio::spawn(async move { pipeline.resummarize(&id, Some(5)).await })
    };

    let (a, b) = (a.await?, b.await?);
    assert!(a.is_ok() && b.is_ok(), "both serialized calls should succeed");

    // Whichever ran last, the stored session is internally consistent.
    let stored = pipeline.get(&session.id).await.expect("still stored");
    assert_eq!(stored.status, SessionStatus::Completed);
    assert_eq!(stored.transcript, session.transcript);
    assert!(stored.summary.is_some());
    Ok(())
}

#[tokio::test]
async fn test_sessions_list_newest_first() -> Result<()> {
    let dir = TempDir::new()?;
    let pipeline = mock_pipeline(&dir);

    let first = pipeline.process(&make_wav(1.0, 8000), "first.wav").await;
    let second = pipeline.process(&make_wav(1.0, 8000), "second.wav").await;

    let page = pipeline.list(&SessionQuery::default()).await;
    assert_eq!(page.total, 2);
    assert_eq!(page.sessions[0].id, second.id);
    assert_eq!(page.sessions[1].id, first.id);
    Ok(())
}
