use serde::{Deserialize, Serialize};

use crate::capture::SpeechEvent;
use crate::error::CaptureErrorKind;

/// Control action sent to the STT service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlAction {
    Permission,
    Start,
    Stop,
    Cancel,
}

impl ControlAction {
    pub fn subject(&self) -> &'static str {
        match self {
            ControlAction::Permission => "stt.control.permission",
            ControlAction::Start => "stt.control.start",
            ControlAction::Stop => "stt.control.stop",
            ControlAction::Cancel => "stt.control.cancel",
        }
    }
}

/// Control message published to the STT service
#[derive(Debug, Serialize, Deserialize)]
pub struct ControlMessage {
    pub session_id: String,
    pub action: ControlAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    pub timestamp: String, // RFC3339 timestamp
}

/// Reply to a permission request
#[derive(Debug, Serialize, Deserialize)]
pub struct PermissionReply {
    pub granted: bool,
}

/// Transcript message received from STT service
#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptMessage {
    pub session_id: String,
    pub text: String,
    pub partial: bool,
    pub timestamp: String,
    #[serde(default)]
    pub confidence: Option<f32>,
    /// Lower-ranked alternatives for a final result
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<String>,
}

/// Recognizer lifecycle event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusEvent {
    Start,
    End,
    Error,
}

/// Lifecycle message received from STT service
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusMessage {
    pub session_id: String,
    pub event: StatusEvent,
    #[serde(default)]
    pub code: Option<i32>,
    #[serde(default)]
    pub message: Option<String>,
}

impl TranscriptMessage {
    pub fn into_event(self) -> SpeechEvent {
        if self.partial {
            SpeechEvent::PartialResult(self.text)
        } else {
            let mut alternatives = Vec::with_capacity(self.alternatives.len() + 1);
            alternatives.push(self.text);
            alternatives.extend(self.alternatives);
            SpeechEvent::FinalResult {
                alternatives,
                confidence: self.confidence,
            }
        }
    }
}

impl StatusMessage {
    pub fn into_event(self) -> SpeechEvent {
        match self.event {
            StatusEvent::Start => SpeechEvent::Start,
            StatusEvent::End => SpeechEvent::End,
            StatusEvent::Error => SpeechEvent::Error(match (self.code, self.message) {
                (Some(code), _) => CaptureErrorKind::from_code(code),
                (None, Some(message)) => CaptureErrorKind::Other(message),
                (None, None) => CaptureErrorKind::Other("unknown error".to_string()),
            }),
        }
    }
}

/// Translate a bus message into a speech event for `session_id`.
///
/// Returns `Ok(None)` for other sessions' traffic and unrelated subjects.
pub fn decode_event(
    subject: &str,
    payload: &[u8],
    session_id: &str,
) -> Result<Option<SpeechEvent>, serde_json::Error> {
    if subject.starts_with("stt.text.") {
        let msg: TranscriptMessage = serde_json::from_slice(payload)?;
        Ok((msg.session_id == session_id).then(|| msg.into_event()))
    } else if subject.starts_with("stt.status.") {
        let msg: StatusMessage = serde_json::from_slice(payload)?;
        Ok((msg.session_id == session_id).then(|| msg.into_event()))
    } else {
        Ok(None)
    }
}
