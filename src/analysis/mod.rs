//! Dream transcript analysis
//!
//! Pure, synchronous keyword heuristics over a committed transcript:
//! - Dream-sign detection and reality-check suggestions
//! - Clarity (1-10) and lucidity (0-10, even) scores
//! - Emotion tagging
//! - Title generation and quality tags
//!
//! Nothing here fails: empty or short transcripts produce floor values and
//! documented fallbacks.

mod catalogue;
mod emotion;
mod quality;
mod scoring;
mod signs;
mod title;

pub use catalogue::{
    Catalogue, EmotionKeywords, RealityCheckRule, BUILTIN_CATALOGUE_VERSION,
};
pub use emotion::{detect_emotions, Emotion};
pub use quality::{clamp_confidence, clarity_tag, confidence_tag, quality_tags};
pub use scoring::{clarity_score, lucidity_score, MAX_CLARITY, MAX_LUCIDITY, MIN_CLARITY};
pub use signs::{detect_dream_signs, suggest_reality_checks, MAX_REALITY_CHECKS};
pub use title::{generate_title, UNTITLED};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

static DEFAULT_ANALYZER: Lazy<DreamAnalyzer> = Lazy::new(DreamAnalyzer::default);

/// Everything derived from one transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DreamAnalysis {
    pub title: String,
    pub dream_signs: Vec<String>,
    pub reality_checks: Vec<String>,
    pub clarity: u8,
    pub lucidity: u8,
    pub emotions: Vec<Emotion>,
    pub quality_tags: Vec<String>,
}

impl DreamAnalysis {
    /// Dream signs, then quality tags, then emotions, without duplicates
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        let candidates = self
            .dream_signs
            .iter()
            .cloned()
            .chain(self.quality_tags.iter().cloned())
            .chain(self.emotions.iter().map(|e| e.to_string()));

        for tag in candidates {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        tags
    }
}

/// Runs every analyzer against a shared keyword catalogue
#[derive(Debug, Clone)]
pub struct DreamAnalyzer {
    catalogue: Arc<Catalogue>,
}

impl DreamAnalyzer {
    pub fn new(catalogue: Catalogue) -> Self {
        Self {
            catalogue: Arc::new(catalogue),
        }
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// Analyze a transcript with no recognizer confidence (clarity tag only)
    pub fn analyze(&self, transcript: &str) -> DreamAnalysis {
        self.analyze_with_confidence(transcript, 0.0)
    }

    /// Analyze a transcript, tagging it with the recognizer's confidence
    pub fn analyze_with_confidence(&self, transcript: &str, confidence: f32) -> DreamAnalysis {
        let catalogue = self.catalogue.as_ref();

        let dream_signs = detect_dream_signs(catalogue, transcript);
        let reality_checks = suggest_reality_checks(catalogue, &dream_signs);
        let clarity = clarity_score(catalogue, transcript);
        let lucidity = lucidity_score(catalogue, transcript);
        let emotions = detect_emotions(catalogue, transcript);

        DreamAnalysis {
            title: generate_title(catalogue, transcript),
            dream_signs,
            reality_checks,
            clarity,
            lucidity,
            emotions,
            quality_tags: quality_tags(confidence, clarity),
        }
    }
}

impl Default for DreamAnalyzer {
    fn default() -> Self {
        Self::new(Catalogue::builtin().clone())
    }
}

/// Analyze with the built-in catalogue
pub fn analyze(transcript: &str) -> DreamAnalysis {
    DEFAULT_ANALYZER.analyze(transcript)
}
