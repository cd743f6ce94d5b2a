use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub bind: String,
    pub port: u16,
}

/// Settings consumed by the processing pipeline. Read once at pipeline
/// construction; changing them mid-run has no effect.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Skip the speech model and return the fixed demo transcript.
    pub mock_mode: bool,

    /// Whisper model size tier: tiny, base, small, medium, large.
    pub whisper_model: String,

    /// Directory holding ggml model files (`ggml-{tier}.bin`).
    pub model_dir: PathBuf,

    /// Force this language code instead of the model's detection.
    pub language_override: Option<String>,

    /// Default number of sentences in the extractive summary.
    pub summary_sentence_count: usize,

    /// Upload size ceiling in megabytes.
    pub max_file_size_mb: u64,

    /// Bound on a single transcription call; expiry becomes a transcription error.
    pub transcribe_timeout_secs: u64,

    /// Where uploaded audio files are retained.
    pub upload_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            mock_mode: false,
            whisper_model: "base".to_string(),
            model_dir: PathBuf::from("models"),
            language_override: None,
            summary_sentence_count: 5,
            max_file_size_mb: 100,
            transcribe_timeout_secs: 300,
            upload_dir: PathBuf::from("uploads"),
        }
    }
}

impl Config {
    /// Load configuration from an optional TOML file plus `VOICEAID_*`
    /// environment overrides (e.g. `VOICEAID_PIPELINE__MOCK_MODE=true`).
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("service.bind", "127.0.0.1")?
            .set_default("service.port", 8000)?
            .set_default("pipeline.mock_mode", false)?
            .set_default("pipeline.whisper_model", "base")?
            .set_default("pipeline.model_dir", "models")?
            .set_default("pipeline.summary_sentence_count", 5)?
            .set_default("pipeline.max_file_size_mb", 100)?
            .set_default("pipeline.transcribe_timeout_secs", 300)?
            .set_default("pipeline.upload_dir", "uploads")?
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("VOICEAID").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
