use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle of a processing session.
///
/// `completed` and `error` are terminal for a processing run; re-summarize
/// starts a new sub-run from `summarizing` without re-entering `uploading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Uploading,
    Transcribing,
    Summarizing,
    Completed,
    Error,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Error)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Uploading => "uploading",
            SessionStatus::Transcribing => "transcribing",
            SessionStatus::Summarizing => "summarizing",
            SessionStatus::Completed => "completed",
            SessionStatus::Error => "error",
        };
        f.write_str(s)
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uploading" => Ok(SessionStatus::Uploading),
            "transcribing" => Ok(SessionStatus::Transcribing),
            "summarizing" => Ok(SessionStatus::Summarizing),
            "completed" => Ok(SessionStatus::Completed),
            "error" => Ok(SessionStatus::Error),
            other => Err(format!("unknown session status: {}", other)),
        }
    }
}

/// A voice recording session: the unit of work and the persisted record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub title: String,
    pub audio_filename: Option<String>,
    /// Seconds, from the audio inspector; 0.0 when headers were unreadable.
    pub audio_duration: f64,
    pub status: SessionStatus,
    pub error_message: Option<String>,
    pub transcript: Option<String>,
    pub summary: Option<String>,
    pub key_points: Vec<String>,
    pub action_items: Vec<String>,
    pub language: Option<String>,
    pub word_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Fresh session at the start of a processing run.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: "Untitled Session".to_string(),
            audio_filename: None,
            audio_duration: 0.0,
            status: SessionStatus::Uploading,
            error_message: None,
            transcript: None,
            summary: None,
            key_points: Vec::new(),
            action_items: Vec::new(),
            language: None,
            word_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Title from the first words of the transcript, or a timestamp
    /// fallback when the audio produced no speech. Set once; never changed
    /// by later operations.
    pub fn derive_title(transcript: &str, created_at: DateTime<Utc>) -> String {
        let words: Vec<&str> = transcript.split_whitespace().collect();
        if words.is_empty() {
            return format!("Session {}", created_at.format("%Y-%m-%d %H:%M"));
        }

        let prefix = words.iter().take(8).copied().collect::<Vec<_>>().join(" ");
        if words.len() > 8 {
            format!("{}...", prefix)
        } else {
            prefix
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// List-item projection of a session, as returned by history queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    pub title: String,
    pub audio_duration: f64,
    pub status: SessionStatus,
    pub language: Option<String>,
    pub word_count: usize,
    pub created_at: DateTime<Utc>,
}

impl From<&Session> for SessionSummary {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id.clone(),
            title: session.title.clone(),
            audio_duration: session.audio_duration,
            status: session.status,
            language: session.language.clone(),
            word_count: session.word_count,
            created_at: session.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_strings() {
        for status in [
            SessionStatus::Uploading,
            SessionStatus::Transcribing,
            SessionStatus::Summarizing,
            SessionStatus::Completed,
            SessionStatus::Error,
        ] {
            let parsed: SessionStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("bogus".parse::<SessionStatus>().is_err());
    }

    #[test]
    fn test_only_completed_and_error_are_terminal() {
        assert!(SessionStatus::Completed.is_terminal());
        assert!(SessionStatus::Error.is_terminal());
        assert!(!SessionStatus::Uploading.is_terminal());
        assert!(!SessionStatus::Transcribing.is_terminal());
        assert!(!SessionStatus::Summarizing.is_terminal());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&SessionStatus::Transcribing).unwrap();
        assert_eq!(json, "\"transcribing\"");
    }

    #[test]
    fn test_new_sessions_get_unique_ids() {
        let a = Session::new();
        let b = Session::new();
        assert_ne!(a.id, b.id);
        assert_eq!(a.status, SessionStatus::Uploading);
    }

    #[test]
    fn test_title_truncates_long_transcripts() {
        let title = Session::derive_title(
            "one two three four five six seven eight nine ten",
            Utc::now(),
        );
        assert_eq!(title, "one two three four five six seven eight...");
    }

    #[test]
    fn test_title_keeps_short_transcripts_whole() {
        let title = Session::derive_title("just a short note", Utc::now());
        assert_eq!(title, "just a short note");
    }

    #[test]
    fn test_title_falls_back_to_timestamp() {
        let created = Utc::now();
        let title = Session::derive_title("", created);
        assert!(title.starts_with("Session "));
    }
}
