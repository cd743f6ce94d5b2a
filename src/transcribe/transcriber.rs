use super::whisper::WhisperModel;
use crate::audio::AudioInfo;
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use std::sync::Arc;
use tracing::info;

/// Fixed transcript returned in mock mode: 98 words, recognizable, and rich
/// enough in commitment language to exercise every downstream extractor.
pub const MOCK_TRANSCRIPT: &str = "Welcome to the VoiceAid demo session. \
Today we need to discuss the project timeline and assign tasks. \
First, we should finalize the design mockups by Friday. \
Sarah will handle the frontend implementation. \
We need to set up the CI/CD pipeline before next week. \
Action item: John should review the API documentation. \
Action item: Schedule a follow-up meeting for Monday. \
The budget needs to be approved by the finance team. \
Let's make sure we have unit tests for all critical paths. \
Please send the updated roadmap to the whole team by Thursday afternoon. \
Thanks everyone for joining today's meeting.";

/// Output of one transcription run.
#[derive(Debug, Clone)]
pub struct Transcription {
    pub text: String,
    /// Detected (or forced) language code, e.g. "en".
    pub language: String,
    /// Duration of the audio that was transcribed.
    pub duration_seconds: f64,
}

/// Speech-to-text capability, selected once at pipeline construction.
///
/// A tagged choice rather than a trait hierarchy: both variants honor the
/// same contract, and swapping them changes nothing downstream.
pub enum Transcriber {
    /// Deterministic stub for offline/no-model operation and tests.
    Mock,
    /// Local Whisper inference (requires the `whisper` cargo feature).
    Whisper(Arc<WhisperModel>),
}

impl Transcriber {
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        if config.mock_mode {
            info!("Transcriber running in mock mode");
            return Ok(Self::Mock);
        }

        let model_path = config
            .model_dir
            .join(format!("ggml-{}.bin", config.whisper_model));
        let model = WhisperModel::new(model_path, config.language_override.clone())?;
        info!("Transcriber using Whisper model '{}'", config.whisper_model);
        Ok(Self::Whisper(Arc::new(model)))
    }

    /// Turn audio bytes into text plus per-run metadata.
    ///
    /// The mock variant ignores the audio entirely; the Whisper variant
    /// decodes WAV input to 16 kHz mono and runs inference on the blocking
    /// thread pool.
    pub async fn transcribe(
        &self,
        audio: &[u8],
        info: &AudioInfo,
        language_hint: Option<&str>,
    ) -> Result<Transcription> {
        match self {
            Transcriber::Mock => Ok(Transcription {
                text: MOCK_TRANSCRIPT.to_string(),
                language: "en".to_string(),
                duration_seconds: info.duration_seconds,
            }),
            Transcriber::Whisper(model) => {
                if info.format != "wav" {
                    // TODO: decode non-WAV containers via symphonia before
                    // handing samples to the model.
                    return Err(PipelineError::Transcription {
                        message: format!(
                            "Whisper input must be WAV; got .{}",
                            info.format
                        ),
                    });
                }

                let samples = decode_wav_16k_mono(audio)?;
                let model = Arc::clone(model);
                let hint = language_hint.map(|s| s.to_string());
                let duration_seconds = info.duration_seconds;

                let (text, language) =
                    tokio::task::spawn_blocking(move || model.run(&samples, hint.as_deref()))
                        .await
                        .map_err(|e| PipelineError::Transcription {
                            message: format!("Transcription task panicked: {}", e),
                        })??;

                Ok(Transcription {
                    text,
                    language,
                    duration_seconds,
                })
            }
        }
    }
}

/// Decode WAV bytes to 16 kHz mono f32 samples in [-1.0, 1.0], the input
/// format Whisper expects. Stereo is averaged; other rates are resampled by
/// linear interpolation.
pub fn decode_wav_16k_mono(bytes: &[u8]) -> Result<Vec<f32>> {
    const TARGET_RATE: u32 = 16_000;

    let mut reader = hound::WavReader::new(std::io::Cursor::new(bytes)).map_err(|e| {
        PipelineError::Transcription {
            message: format!("Failed to parse WAV file: {}", e),
        }
    })?;

    let spec = reader.spec();
    let raw: Vec<i16> = reader
        .samples::<i16>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| PipelineError::Transcription {
            message: format!("Failed to read WAV samples: {}", e),
        })?;

    let mono: Vec<i16> = if spec.channels == 2 {
        raw.chunks_exact(2)
            .map(|pair| ((pair[0] as i32 + pair[1] as i32) / 2) as i16)
            .collect()
    } else {
        raw
    };

    let resampled = if spec.sample_rate != TARGET_RATE {
        resample(&mono, spec.sample_rate, TARGET_RATE)
    } else {
        mono
    };

    Ok(resampled.iter().map(|&s| s as f32 / 32768.0).collect())
}

/// Simple linear interpolation resampling.
fn resample(samples: &[i16], from_rate: u32, to_rate: u32) -> Vec<i16> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let source_pos = i as f64 * ratio;
            let source_idx = source_pos.floor() as usize;
            let fraction = source_pos - source_idx as f64;

            if source_idx + 1 >= samples.len() {
                samples[samples.len() - 1]
            } else {
                let left = samples[source_idx] as f64;
                let right = samples[source_idx + 1] as f64;
                (left + (right - left) * fraction) as i16
            }
        })
        .collect()
}
