use serde::{Deserialize, Serialize};
use std::fmt;

use super::catalogue::Catalogue;

/// Emotion category detected from a dream narration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Scared,
    Confused,
    Peaceful,
    Anxious,
    Nostalgic,
    Mysterious,
    Sad,
    Angry,
    Surprised,
}

impl Emotion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Scared => "scared",
            Emotion::Confused => "confused",
            Emotion::Peaceful => "peaceful",
            Emotion::Anxious => "anxious",
            Emotion::Nostalgic => "nostalgic",
            Emotion::Mysterious => "mysterious",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Surprised => "surprised",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every emotion with at least one keyword contained in the transcript, in catalogue order
pub fn detect_emotions(catalogue: &Catalogue, transcript: &str) -> Vec<Emotion> {
    let lower = transcript.to_lowercase();

    catalogue
        .emotions
        .iter()
        .filter(|entry| entry.keywords.iter().any(|k| lower.contains(k.as_str())))
        .map(|entry| entry.emotion)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_emotions_in_empty_text() {
        assert!(detect_emotions(Catalogue::builtin(), "").is_empty());
    }

    #[test]
    fn test_presence_only() {
        let emotions = detect_emotions(
            Catalogue::builtin(),
            "I was SCARED, so scared, then calm and peaceful",
        );
        assert_eq!(emotions, vec![Emotion::Scared, Emotion::Peaceful]);
    }

    #[test]
    fn test_detected_emotions_all_have_a_matching_keyword() {
        let catalogue = Catalogue::builtin();
        let samples = [
            "A mysterious stranger told me a secret and I felt nervous",
            "My childhood friend was crying; it was weird and unexpected",
            "Pure joy, then rage",
            "Nothing notable happened",
        ];

        for sample in samples {
            let lower = sample.to_lowercase();
            let detected = detect_emotions(catalogue, sample);
            for entry in &catalogue.emotions {
                let matches = entry.keywords.iter().any(|k| lower.contains(k.as_str()));
                assert_eq!(
                    detected.contains(&entry.emotion),
                    matches,
                    "{} on {:?}",
                    entry.emotion,
                    sample
                );
            }
        }
    }

    #[test]
    fn test_emotion_serializes_lowercase() {
        let json = serde_json::to_string(&Emotion::Nostalgic).unwrap();
        assert_eq!(json, "\"nostalgic\"");
    }
}
