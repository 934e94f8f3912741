use super::catalogue::Catalogue;

pub const UNTITLED: &str = "Untitled Dream";

/// Longest title used verbatim
const MAX_TITLE_CHARS: usize = 50;

/// Characters kept before the ellipsis when truncating
const TRUNCATED_CHARS: usize = 47;

/// Words taken from the transcript when no sentence is usable
const FALLBACK_WORDS: usize = 8;

/// Derive a short title for a dream from its transcript.
///
/// Order of preference: a first sentence of at most 50 characters, then
/// "Dream about <keyword>" for the first catalogue keyword found, then the
/// first sentence truncated to 47 characters plus "...", then the first
/// eight words, then [`UNTITLED`]. Lengths are counted in characters.
pub fn generate_title(catalogue: &Catalogue, transcript: &str) -> String {
    let first_sentence = transcript
        .split(['.', '!', '?'])
        .next()
        .unwrap_or_default()
        .trim();
    let sentence_len = first_sentence.chars().count();

    if sentence_len > 0 && sentence_len <= MAX_TITLE_CHARS {
        return first_sentence.to_string();
    }

    let lower = transcript.to_lowercase();
    if let Some(keyword) = catalogue
        .title_keywords
        .iter()
        .find(|keyword| lower.contains(keyword.as_str()))
    {
        return format!("Dream about {}", keyword);
    }

    if sentence_len > MAX_TITLE_CHARS {
        return truncate_with_ellipsis(first_sentence);
    }

    let words = transcript
        .split_whitespace()
        .take(FALLBACK_WORDS)
        .collect::<Vec<_>>()
        .join(" ");

    if words.is_empty() {
        UNTITLED.to_string()
    } else if words.chars().count() > MAX_TITLE_CHARS {
        truncate_with_ellipsis(&words)
    } else {
        words
    }
}

fn truncate_with_ellipsis(text: &str) -> String {
    let mut truncated: String = text.chars().take(TRUNCATED_CHARS).collect();
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_transcript_is_untitled() {
        assert_eq!(generate_title(Catalogue::builtin(), ""), UNTITLED);
        assert_eq!(generate_title(Catalogue::builtin(), "  \n "), UNTITLED);
    }

    #[test]
    fn test_short_first_sentence_used_verbatim() {
        let title = generate_title(
            Catalogue::builtin(),
            "  I flew over the sea!  Then everything went dark.",
        );
        assert_eq!(title, "I flew over the sea");
    }

    #[test]
    fn test_long_sentence_uses_keyword() {
        let title = generate_title(
            Catalogue::builtin(),
            "Somewhere between waking and sleeping I wandered a vast forest of glass trees",
        );
        assert_eq!(title, "Dream about forest");
    }

    #[test]
    fn test_keyword_order_follows_catalogue() {
        let title = generate_title(
            Catalogue::builtin(),
            "There was a mirror by the door and a long corridor leading to the water's edge",
        );
        assert_eq!(title, "Dream about water");
    }

    #[test]
    fn test_long_sentence_without_keyword_is_truncated() {
        let sentence = "Everyone I met spoke backwards in a language of chimes and bells";
        let title = generate_title(Catalogue::builtin(), &format!("{}. Then I woke up.", sentence));

        let expected: String = sentence.chars().take(47).collect::<String>() + "...";
        assert_eq!(title, expected);
        assert_eq!(title.chars().count(), 50);
    }

    #[test]
    fn test_leading_punctuation_falls_back_to_words() {
        let title = generate_title(Catalogue::builtin(), "? a quiet night with nothing remarkable at all really");
        assert_eq!(title, "? a quiet night with nothing remarkable at");
    }

    #[test]
    fn test_truncation_counts_characters() {
        let sentence = "Über den Wolken schwebte eine gläserne Stadt aus Kristall ohne Ende";
        let title = generate_title(Catalogue::builtin(), sentence);
        assert!(title.ends_with("..."));
        assert_eq!(title.chars().count(), 50);
    }
}
