use crate::error::{PipelineError, Result};
use std::io::Cursor;
use std::path::Path;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

/// Audio formats accepted for upload, by file extension.
pub const SUPPORTED_FORMATS: &[&str] = &[
    "mp3", "wav", "ogg", "webm", "m4a", "flac", "mp4", "mpeg", "wma",
];

/// What the inspector learned about an uploaded blob.
#[derive(Debug, Clone)]
pub struct AudioInfo {
    /// Best-effort duration; 0.0 when headers are missing or corrupt.
    pub duration_seconds: f64,
    /// Normalized (lowercased) extension, e.g. "wav".
    pub format: String,
    pub size_bytes: u64,
}

/// Validates and measures uploaded audio before any expensive work begins.
pub struct AudioInspector {
    max_file_size_mb: u64,
}

impl AudioInspector {
    pub fn new(max_file_size_mb: u64) -> Self {
        Self { max_file_size_mb }
    }

    /// Check format and size, then extract duration.
    ///
    /// Duration extraction is best-effort: a corrupt or headerless file
    /// yields 0.0 rather than an error, so it can still be transcribed.
    pub fn inspect(&self, bytes: &[u8], declared_filename: &str) -> Result<AudioInfo> {
        let extension = Path::new(declared_filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        if !SUPPORTED_FORMATS.contains(&extension.as_str()) {
            return Err(PipelineError::UnsupportedFormat { extension });
        }

        let size_bytes = bytes.len() as u64;
        let size_mb = size_bytes as f64 / (1024.0 * 1024.0);
        if size_mb > self.max_file_size_mb as f64 {
            return Err(PipelineError::FileTooLarge {
                size_mb,
                limit_mb: self.max_file_size_mb,
            });
        }

        let duration_seconds = measure_duration(bytes, &extension);

        debug!(
            "Inspected '{}': {} bytes, {:.1}s",
            declared_filename, size_bytes, duration_seconds
        );

        Ok(AudioInfo {
            duration_seconds,
            format: extension,
            size_bytes,
        })
    }
}

/// Duration from container headers: hound for the WAV fast path, symphonia
/// probing for everything else. Returns 0.0 when neither can read the blob.
fn measure_duration(bytes: &[u8], extension: &str) -> f64 {
    if extension == "wav" {
        match hound::WavReader::new(Cursor::new(bytes)) {
            Ok(reader) => {
                let spec = reader.spec();
                if spec.sample_rate > 0 {
                    return reader.duration() as f64 / spec.sample_rate as f64;
                }
            }
            Err(e) => debug!("hound could not read WAV header: {}", e),
        }
    }

    match probe_duration(bytes, extension) {
        Some(seconds) => seconds,
        None => {
            warn!(
                "Could not determine audio duration (.{}, {} bytes); falling back to 0.0",
                extension,
                bytes.len()
            );
            0.0
        }
    }
}

fn probe_duration(bytes: &[u8], extension: &str) -> Option<f64> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());

    let mut hint = Hint::new();
    hint.with_extension(extension);

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .ok()?;

    let track = probed.format.default_track()?;
    let params = &track.codec_params;
    let time_base = params.time_base?;
    let n_frames = params.n_frames?;

    let time = time_base.calc_time(n_frames);
    Some(time.seconds as f64 + time.frac)
}
