//! Local Whisper inference behind the `whisper` cargo feature.
//!
//! Building whisper-rs requires cmake; without the feature this module
//! compiles to a stub that validates configuration but refuses to run, so
//! mock mode and the rest of the crate stay buildable everywhere.

use crate::error::{PipelineError, Result};
use std::path::PathBuf;

#[cfg(feature = "whisper")]
use std::sync::Mutex;
#[cfg(feature = "whisper")]
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

/// Loaded Whisper model shared by all pipeline runs.
#[cfg(feature = "whisper")]
pub struct WhisperModel {
    context: Mutex<WhisperContext>,
    language: Option<String>,
}

#[cfg(not(feature = "whisper"))]
pub struct WhisperModel {
    #[allow(dead_code)]
    language: Option<String>,
}

impl WhisperModel {
    /// Load the model at `model_path`. `language` forces that code for every
    /// run; `None` lets the model detect per input.
    #[cfg(feature = "whisper")]
    pub fn new(model_path: PathBuf, language: Option<String>) -> Result<Self> {
        if !model_path.exists() {
            return Err(PipelineError::Transcription {
                message: format!("Whisper model not found at {}", model_path.display()),
            });
        }

        let path_str = model_path
            .to_str()
            .ok_or_else(|| PipelineError::Transcription {
                message: "Invalid UTF-8 in model path".to_string(),
            })?;

        let context = WhisperContext::new_with_params(path_str, WhisperContextParameters::default())
            .map_err(|e| PipelineError::Transcription {
                message: format!("Failed to load Whisper model: {}", e),
            })?;

        Ok(Self {
            context: Mutex::new(context),
            language,
        })
    }

    #[cfg(not(feature = "whisper"))]
    pub fn new(model_path: PathBuf, language: Option<String>) -> Result<Self> {
        if !model_path.exists() {
            return Err(PipelineError::Transcription {
                message: format!("Whisper model not found at {}", model_path.display()),
            });
        }
        Ok(Self { language })
    }

    /// Run inference over 16 kHz mono f32 samples. Returns the transcribed
    /// text and the detected (or forced) language code.
    #[cfg(feature = "whisper")]
    pub fn run(&self, samples: &[f32], language_hint: Option<&str>) -> Result<(String, String)> {
        let context = self
            .context
            .lock()
            .map_err(|e| PipelineError::Transcription {
                message: format!("Failed to acquire model lock: {}", e),
            })?;

        let mut state = context
            .create_state()
            .map_err(|e| PipelineError::Transcription {
                message: format!("Failed to create Whisper state: {}", e),
            })?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        let forced = language_hint.or(self.language.as_deref());
        params.set_language(forced);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        state
            .full(params, samples)
            .map_err(|e| PipelineError::Transcription {
                message: format!("Whisper inference failed: {}", e),
            })?;

        let language = match forced {
            Some(code) => code.to_string(),
            None => {
                let lang_id = state.full_lang_id_from_state();
                whisper_rs::get_lang_str(lang_id).unwrap_or("en").to_string()
            }
        };

        let mut text = String::new();
        for segment in state.as_iter() {
            text.push_str(&segment.to_string());
        }

        Ok((text.trim().to_string(), language))
    }

    #[cfg(not(feature = "whisper"))]
    pub fn run(&self, _samples: &[f32], _language_hint: Option<&str>) -> Result<(String, String)> {
        Err(PipelineError::Transcription {
            message: "Built without the `whisper` feature; enable it or set mock_mode"
                .to_string(),
        })
    }
}
