use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::emotion::Emotion;

/// Version of the built-in keyword tables
pub const BUILTIN_CATALOGUE_VERSION: u32 = 1;

const DREAM_SIGNS: &[&str] = &[
    "flying",
    "falling",
    "dead person",
    "animals",
    "water",
    "fire",
    "being chased",
    "teeth falling",
    "naked",
    "late for exam",
    "lost",
    "can't run",
    "phone not working",
    "impossible architecture",
    "deceased relative",
    "childhood home",
    "school",
    "work",
    "floating",
    "infinite",
    "strange doors",
    "mirrors",
    "text changing",
];

const REALITY_CHECKS: &[(&str, &str)] = &[
    ("flying", "Try to fly by jumping up"),
    ("teeth", "Count your teeth in a mirror"),
    ("hands", "Look at your hands - count fingers"),
    ("text", "Read text twice - does it stay the same?"),
    ("mirrors", "Look in a mirror - does your reflection look normal?"),
    ("time", "Check a clock twice - does time make sense?"),
    ("lights", "Try turning lights on/off - do they work normally?"),
    ("doors", "Pay attention to doorways and passages"),
];

const DEFAULT_REALITY_CHECKS: &[&str] = &[
    "Look at your hands - count your fingers",
    "Read text twice - does it change?",
    "Check a digital clock twice",
];

const DETAIL_WORDS: &[&str] = &[
    "color", "texture", "sound", "feeling", "emotion", "detail", "vivid",
];

const LUCIDITY_INDICATORS: &[&str] = &[
    "realized",
    "aware",
    "lucid",
    "control",
    "knew i was dreaming",
    "conscious",
    "decided",
    "chose",
    "willed",
    "intentionally",
];

const EMOTION_KEYWORDS: &[(Emotion, &[&str])] = &[
    (
        Emotion::Happy,
        &["happy", "joy", "excited", "wonderful", "amazing", "beautiful", "love", "glad", "pleased"],
    ),
    (
        Emotion::Scared,
        &["scared", "afraid", "frightened", "terror", "nightmare", "fear", "terrified", "horror"],
    ),
    (
        Emotion::Confused,
        &["confused", "lost", "strange", "weird", "bizarre", "odd", "puzzled", "disoriented"],
    ),
    (
        Emotion::Peaceful,
        &["peaceful", "calm", "serene", "tranquil", "relaxed", "content", "zen"],
    ),
    (
        Emotion::Anxious,
        &["anxious", "worried", "nervous", "stressed", "panic", "uneasy", "tense"],
    ),
    (
        Emotion::Nostalgic,
        &["childhood", "past", "memory", "remember", "old", "nostalgia", "reminisce"],
    ),
    (
        Emotion::Mysterious,
        &["mysterious", "unknown", "secret", "hidden", "magic", "mystical", "enigmatic"],
    ),
    (
        Emotion::Sad,
        &["sad", "crying", "tears", "grief", "sorrow", "melancholy", "depressed"],
    ),
    (
        Emotion::Angry,
        &["angry", "mad", "furious", "rage", "frustrated", "annoyed", "irritated"],
    ),
    (
        Emotion::Surprised,
        &["surprised", "shocked", "amazed", "astonished", "startled", "unexpected"],
    ),
];

const TITLE_KEYWORDS: &[&str] = &[
    "flying",
    "water",
    "home",
    "school",
    "falling",
    "chase",
    "light",
    "family",
    "work",
    "car",
    "house",
    "ocean",
    "mountain",
    "forest",
    "city",
    "childhood",
    "friend",
    "animal",
    "fire",
    "bridge",
    "door",
    "mirror",
    "stairs",
    "phone",
    "computer",
];

static BUILTIN: Lazy<Catalogue> = Lazy::new(Catalogue::builtin_tables);

/// A mapping from a keyword to the reality check it suggests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealityCheckRule {
    pub keyword: String,
    pub suggestion: String,
}

/// Keyword list for one emotion category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionKeywords {
    pub emotion: Emotion,
    pub keywords: Vec<String>,
}

/// Every keyword table the analyzers read from.
///
/// All phrases are stored lower-cased and matched as literal substrings of the
/// lower-cased transcript. Table order is significant: detected dream signs,
/// suggestions, emotions and title keywords are reported in table order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalogue {
    pub version: u32,
    pub dream_signs: Vec<String>,
    pub reality_checks: Vec<RealityCheckRule>,
    pub default_reality_checks: Vec<String>,
    pub detail_words: Vec<String>,
    pub lucidity_indicators: Vec<String>,
    pub emotions: Vec<EmotionKeywords>,
    pub title_keywords: Vec<String>,
}

impl Catalogue {
    /// The built-in English catalogue, created once per process
    pub fn builtin() -> &'static Catalogue {
        &BUILTIN
    }

    /// Load a catalogue from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalogue {}", path.display()))?;
        Self::from_json(&raw)
    }

    /// Parse a catalogue from JSON, normalizing every phrase to lower case
    pub fn from_json(raw: &str) -> Result<Self> {
        let catalogue: Catalogue =
            serde_json::from_str(raw).context("Failed to parse keyword catalogue")?;
        Ok(catalogue.normalized())
    }

    fn builtin_tables() -> Self {
        Self {
            version: BUILTIN_CATALOGUE_VERSION,
            dream_signs: owned(DREAM_SIGNS),
            reality_checks: REALITY_CHECKS
                .iter()
                .map(|(keyword, suggestion)| RealityCheckRule {
                    keyword: keyword.to_string(),
                    suggestion: suggestion.to_string(),
                })
                .collect(),
            default_reality_checks: owned(DEFAULT_REALITY_CHECKS),
            detail_words: owned(DETAIL_WORDS),
            lucidity_indicators: owned(LUCIDITY_INDICATORS),
            emotions: EMOTION_KEYWORDS
                .iter()
                .map(|(emotion, keywords)| EmotionKeywords {
                    emotion: *emotion,
                    keywords: owned(keywords),
                })
                .collect(),
            title_keywords: owned(TITLE_KEYWORDS),
        }
    }

    fn normalized(mut self) -> Self {
        lowercase_all(&mut self.dream_signs);
        lowercase_all(&mut self.detail_words);
        lowercase_all(&mut self.lucidity_indicators);
        lowercase_all(&mut self.title_keywords);
        for rule in &mut self.reality_checks {
            rule.keyword = rule.keyword.to_lowercase();
        }
        for entry in &mut self.emotions {
            lowercase_all(&mut entry.keywords);
        }
        self
    }
}

impl Default for Catalogue {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

fn owned(phrases: &[&str]) -> Vec<String> {
    phrases.iter().map(|p| p.to_string()).collect()
}

fn lowercase_all(phrases: &mut [String]) {
    for phrase in phrases.iter_mut() {
        *phrase = phrase.to_lowercase();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_are_lowercase() {
        let catalogue = Catalogue::builtin();
        assert_eq!(catalogue.clone(), catalogue.clone().normalized());
    }

    #[test]
    fn test_builtin_table_sizes() {
        let catalogue = Catalogue::builtin();
        assert_eq!(catalogue.version, BUILTIN_CATALOGUE_VERSION);
        assert!(catalogue.dream_signs.len() >= 20);
        assert_eq!(catalogue.default_reality_checks.len(), 3);
        assert_eq!(catalogue.detail_words.len(), 7);
        assert_eq!(catalogue.emotions.len(), 10);
    }

    #[test]
    fn test_json_catalogue_is_normalized() {
        let mut custom = Catalogue::builtin().clone();
        custom.version = 2;
        custom.dream_signs = vec!["Purple Sky".to_string()];
        let json = serde_json::to_string(&custom).unwrap();

        let loaded = Catalogue::from_json(&json).unwrap();
        assert_eq!(loaded.version, 2);
        assert_eq!(loaded.dream_signs, vec!["purple sky".to_string()]);
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(Catalogue::from_json("{\"version\": 1}").is_err());
    }
}
