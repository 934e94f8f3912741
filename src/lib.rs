pub mod analysis;
pub mod capture;
pub mod config;
pub mod error;
pub mod http;
pub mod journal;
pub mod nats;
pub mod session;

pub use analysis::{analyze, Catalogue, DreamAnalysis, DreamAnalyzer, Emotion};
pub use capture::{NatsSpeechCapture, ScriptHandle, ScriptedCapture, SpeechCapture, SpeechEvent};
pub use config::Config;
pub use error::{CaptureErrorKind, SessionError, StoreError};
pub use http::{create_router, AppState};
pub use journal::{DreamEntry, DreamRepository, DreamStore, DreamUpdate, InMemoryRepository};
pub use nats::{NatsClient, TranscriptMessage};
pub use session::{SessionConfig, SessionController, SessionSnapshot, SessionStatus};
