use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::{DreamAnalysis, Emotion};

/// A saved dream with everything derived from its transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DreamEntry {
    /// Unique identifier (e.g., "dream-4f1c...")
    pub id: String,
    pub title: String,
    /// Committed transcript; every derived field is computed from it
    pub transcription: String,
    pub dream_signs: Vec<String>,
    pub reality_checks: Vec<String>,
    /// 1-10
    pub clarity: u8,
    /// 0-10, even
    pub lucidity: u8,
    pub emotions: Vec<Emotion>,
    /// Dream signs, quality tags and emotions
    pub tags: Vec<String>,
    /// Recognizer confidence for the transcript (0.0 to 1.0)
    pub confidence: f32,
    pub recorded_at: DateTime<Utc>,
    /// Seconds recorded
    pub duration: u64,
}

impl DreamEntry {
    pub fn new(
        id: String,
        transcription: String,
        analysis: DreamAnalysis,
        confidence: f32,
        duration: u64,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        let mut entry = Self {
            id,
            title: String::new(),
            transcription,
            dream_signs: Vec::new(),
            reality_checks: Vec::new(),
            clarity: 0,
            lucidity: 0,
            emotions: Vec::new(),
            tags: Vec::new(),
            confidence,
            recorded_at,
            duration,
        };
        entry.apply_analysis(analysis);
        entry
    }

    /// Replace every derived field in one step
    pub fn apply_analysis(&mut self, analysis: DreamAnalysis) {
        self.tags = analysis.tags();
        let DreamAnalysis {
            title,
            dream_signs,
            reality_checks,
            clarity,
            lucidity,
            emotions,
            quality_tags: _,
        } = analysis;

        self.title = title;
        self.dream_signs = dream_signs;
        self.reality_checks = reality_checks;
        self.clarity = clarity;
        self.lucidity = lucidity;
        self.emotions = emotions;
    }

    /// Whether the tag, sign or emotion is attached to this dream
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
            || self.dream_signs.iter().any(|s| s == tag)
            || self.emotions.iter().any(|e| e.as_str() == tag)
    }
}

/// Changes applied by `DreamStore::update_dream`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DreamUpdate {
    /// Title override, applied after any re-analysis
    #[serde(default)]
    pub title: Option<String>,
    /// Edited transcript; re-runs the full analysis
    #[serde(default)]
    pub transcription: Option<String>,
}
