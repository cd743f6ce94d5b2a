pub mod transcriber;
pub mod whisper;

pub use transcriber::{decode_wav_16k_mono, Transcriber, Transcription, MOCK_TRANSCRIPT};
pub use whisper::WhisperModel;
