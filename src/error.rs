use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Runtime failure reported by a speech-capture capability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureErrorKind {
    NoSpeech,
    Timeout,
    Busy,
    AudioProblem,
    Network,
    PermissionDenied,
    Other(String),
}

impl CaptureErrorKind {
    /// Map a platform recognizer error code
    pub fn from_code(code: i32) -> Self {
        match code {
            1 | 2 => CaptureErrorKind::Network,
            3 => CaptureErrorKind::AudioProblem,
            6 => CaptureErrorKind::Timeout,
            7 => CaptureErrorKind::NoSpeech,
            8 => CaptureErrorKind::Busy,
            9 => CaptureErrorKind::PermissionDenied,
            other => CaptureErrorKind::Other(format!("recognizer error code {}", other)),
        }
    }

    /// Whether the caller may simply retry with a new session
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, CaptureErrorKind::PermissionDenied)
    }
}

impl fmt::Display for CaptureErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureErrorKind::NoSpeech => f.write_str("No speech was detected. Please try again."),
            CaptureErrorKind::Timeout => f.write_str("Listening timed out. Please try again."),
            CaptureErrorKind::Busy => f.write_str("Speech recognizer is busy. Please try again."),
            CaptureErrorKind::AudioProblem => f.write_str("Audio recording problem"),
            CaptureErrorKind::Network => f.write_str("Speech service is unreachable"),
            CaptureErrorKind::PermissionDenied => {
                f.write_str("Microphone permission required for dream recording")
            }
            CaptureErrorKind::Other(detail) => write!(f, "Speech recognition failed: {}", detail),
        }
    }
}

/// Why a recording session failed or was rejected.
///
/// The `Display` text is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Microphone permission required for dream recording")]
    PermissionDenied,

    #[error("Failed to start recording: {0}")]
    CaptureStart(String),

    #[error("{0}")]
    CaptureRuntime(CaptureErrorKind),

    #[error("A recording session is already in progress")]
    SessionBusy,
}

impl SessionError {
    pub fn is_recoverable(&self) -> bool {
        match self {
            SessionError::PermissionDenied => false,
            SessionError::CaptureRuntime(kind) => kind.is_recoverable(),
            SessionError::CaptureStart(_) | SessionError::SessionBusy => true,
        }
    }
}

impl From<CaptureErrorKind> for SessionError {
    fn from(kind: CaptureErrorKind) -> Self {
        match kind {
            CaptureErrorKind::PermissionDenied => SessionError::PermissionDenied,
            other => SessionError::CaptureRuntime(other),
        }
    }
}

/// Errors raised by the dream journal store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Cannot save empty dream transcription")]
    EmptyTranscript,

    #[error("dream {0} not found")]
    NotFound(String),

    #[error("repository error: {0}")]
    Repository(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(CaptureErrorKind::from_code(7), CaptureErrorKind::NoSpeech);
        assert_eq!(CaptureErrorKind::from_code(6), CaptureErrorKind::Timeout);
        assert_eq!(CaptureErrorKind::from_code(8), CaptureErrorKind::Busy);
        assert_eq!(CaptureErrorKind::from_code(2), CaptureErrorKind::Network);
        assert_eq!(
            CaptureErrorKind::from_code(9),
            CaptureErrorKind::PermissionDenied
        );
        assert!(matches!(
            CaptureErrorKind::from_code(42),
            CaptureErrorKind::Other(_)
        ));
    }

    #[test]
    fn test_recoverable_kinds() {
        assert!(SessionError::from(CaptureErrorKind::NoSpeech).is_recoverable());
        assert!(SessionError::from(CaptureErrorKind::Timeout).is_recoverable());
        assert!(SessionError::from(CaptureErrorKind::Busy).is_recoverable());
        assert!(!SessionError::from(CaptureErrorKind::PermissionDenied).is_recoverable());
        assert!(!SessionError::PermissionDenied.is_recoverable());
    }

    #[test]
    fn test_messages_differ_by_kind() {
        let no_speech = SessionError::from(CaptureErrorKind::NoSpeech).to_string();
        let timeout = SessionError::from(CaptureErrorKind::Timeout).to_string();
        let denied = SessionError::PermissionDenied.to_string();

        assert_ne!(no_speech, timeout);
        assert_ne!(no_speech, denied);
        assert_eq!(denied, "Microphone permission required for dream recording");
    }
}
