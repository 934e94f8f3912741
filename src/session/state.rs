use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::time::Instant;

use tracing::debug;

use crate::analysis::clamp_confidence;
use crate::error::{CaptureErrorKind, SessionError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Idle,
    Recording,
    Transcribing,
    Completed,
    Failed,
}

impl SessionStatus {
    /// Recording or transcribing: a capability session may still be live
    pub fn is_active(&self) -> bool {
        matches!(self, SessionStatus::Recording | SessionStatus::Transcribing)
    }

    /// Completed or failed
    pub fn is_finished(&self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Failed)
    }
}

/// Data for one recording attempt.
///
/// `final_text` is non-empty exactly when the status is `Completed`, and
/// `partial_text` is empty in every state except `Recording`.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub status: SessionStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub elapsed_seconds: u64,
    pub partial_text: String,
    pub final_text: String,
    pub confidence: f32,
    pub error: Option<SessionError>,
    pub audio_artifact: Option<PathBuf>,
    /// Monotonic start of the recording window
    running_anchor: Option<Instant>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_recording(&mut self, started_at: DateTime<Utc>, now: Instant) {
        *self = Self {
            status: SessionStatus::Recording,
            started_at: Some(started_at),
            running_anchor: Some(now),
            ..Self::default()
        };
    }

    /// Replace the interim transcript. Ignored outside `Recording`.
    pub fn update_partial(&mut self, text: String) -> bool {
        if self.status != SessionStatus::Recording {
            return false;
        }
        self.partial_text = text;
        true
    }

    /// Recompute elapsed whole seconds from the recording anchor
    pub fn sync_elapsed(&mut self, now: Instant) -> Result<u64> {
        if self.status != SessionStatus::Recording {
            return Err(anyhow!("session is not recording"));
        }

        let anchor = self
            .running_anchor
            .ok_or_else(|| anyhow!("recording without a start anchor"))?;
        let elapsed = now
            .checked_duration_since(anchor)
            .ok_or_else(|| anyhow!("tick observed time before the recording started"))?
            .as_secs();

        self.elapsed_seconds = self.elapsed_seconds.max(elapsed);
        Ok(self.elapsed_seconds)
    }

    /// Recording → Transcribing
    pub fn begin_transcribing(&mut self, now: Instant) -> bool {
        if self.status != SessionStatus::Recording {
            return false;
        }
        if let Err(e) = self.sync_elapsed(now) {
            debug!("Keeping last duration of {}s: {:#}", self.elapsed_seconds, e);
        }
        self.status = SessionStatus::Transcribing;
        self.partial_text.clear();
        self.running_anchor = None;
        true
    }

    /// Commit the best non-blank alternative.
    ///
    /// Accepted while recording or transcribing. With no usable text the
    /// session fails with `NoSpeech` instead, keeping `final_text` empty
    /// outside `Completed`.
    pub fn complete(&mut self, alternatives: &[String], confidence: f32, now: Instant) -> bool {
        if !self.status.is_active() {
            return false;
        }
        self.begin_transcribing(now);

        let best = alternatives
            .iter()
            .map(|alternative| alternative.trim())
            .find(|alternative| !alternative.is_empty());

        match best {
            Some(text) => {
                self.status = SessionStatus::Completed;
                self.final_text = text.to_string();
                self.confidence = clamp_confidence(confidence);
                self.partial_text.clear();
                self.error = None;
            }
            None => self.fail(SessionError::CaptureRuntime(CaptureErrorKind::NoSpeech)),
        }
        true
    }

    /// Move to `Failed` from any state
    pub fn fail(&mut self, error: SessionError) {
        self.status = SessionStatus::Failed;
        self.partial_text.clear();
        self.final_text.clear();
        self.confidence = 0.0;
        self.running_anchor = None;
        self.error = Some(error);
    }

    /// Discard everything and return to `Idle`
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let completed = self.status == SessionStatus::Completed;
        SessionSnapshot {
            status: self.status,
            is_recording: self.status == SessionStatus::Recording,
            is_transcribing: self.status == SessionStatus::Transcribing,
            transcript: self.final_text.clone(),
            partial_transcript: self.partial_text.clone(),
            duration: self.elapsed_seconds,
            error: self.error.as_ref().map(|e| e.to_string()),
            confidence: completed.then_some(self.confidence),
            started_at: self.started_at,
        }
    }

    pub fn committed(&self) -> Option<CommittedTranscript> {
        (self.status == SessionStatus::Completed).then(|| CommittedTranscript {
            text: self.final_text.clone(),
            confidence: self.confidence,
            duration_secs: self.elapsed_seconds,
        })
    }
}

/// Read-only view of the session for the UI layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub is_recording: bool,
    pub is_transcribing: bool,
    /// Committed transcript (empty until completed)
    pub transcript: String,
    pub partial_transcript: String,
    /// Seconds recorded
    pub duration: u64,
    /// Human-readable failure message
    pub error: Option<String>,
    /// Only present once completed
    pub confidence: Option<f32>,
    pub started_at: Option<DateTime<Utc>>,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        SessionState::default().snapshot()
    }
}

/// The outcome of a completed session, ready to be saved as a dream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommittedTranscript {
    pub text: String,
    pub confidence: f32,
    pub duration_secs: u64,
}
