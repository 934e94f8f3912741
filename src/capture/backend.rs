use anyhow::Result;
use std::path::PathBuf;
use tokio::sync::mpsc;

use crate::error::CaptureErrorKind;

/// Event emitted by a speech-capture capability while a session is active
#[derive(Debug, Clone, PartialEq)]
pub enum SpeechEvent {
    /// The recognizer started listening
    Start,
    /// Interim transcript; replaces any previous partial
    PartialResult(String),
    /// Final transcript alternatives, best first
    FinalResult {
        alternatives: Vec<String>,
        confidence: Option<f32>,
    },
    /// The recognizer failed
    Error(CaptureErrorKind),
    /// The speaker stopped talking
    End,
}

/// Speech-to-text capture capability
///
/// Implementations:
/// - `NatsSpeechCapture`: remote STT service over a NATS bus
/// - `ScriptedCapture`: emits events on demand (testing/demo)
#[async_trait::async_trait]
pub trait SpeechCapture: Send + Sync {
    /// Ask for microphone access; `Ok(false)` means the user refused
    async fn request_permission(&mut self) -> Result<bool>;

    /// Start listening
    ///
    /// Returns a channel receiver that will receive speech events
    async fn start(&mut self, locale: &str) -> Result<mpsc::Receiver<SpeechEvent>>;

    /// Stop listening and let the recognizer deliver its final result
    async fn stop(&mut self) -> Result<()>;

    /// Abort listening without a result
    async fn cancel(&mut self) -> Result<()>;

    /// Check if the capability is currently listening
    fn is_capturing(&self) -> bool;

    /// Get capability name for logging
    fn name(&self) -> &str;

    /// Audio file written locally for the current session, if any
    fn audio_artifact(&self) -> Option<PathBuf> {
        None
    }
}
