use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a recording session controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Identifier used in logs (e.g., "recorder-4f1c...")
    pub session_id: String,

    /// Recognizer locale
    pub locale: String,

    /// How often the elapsed duration is recomputed while recording
    /// Default: 1 second
    pub tick_interval: Duration,

    /// Confidence assumed when the recognizer reports none
    pub default_confidence: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: format!("recorder-{}", uuid::Uuid::new_v4()),
            locale: "en-US".to_string(),
            tick_interval: Duration::from_secs(1),
            default_confidence: 0.95,
        }
    }
}
