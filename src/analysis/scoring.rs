use super::catalogue::Catalogue;

pub const MIN_CLARITY: u8 = 1;
pub const MAX_CLARITY: u8 = 10;
pub const MAX_LUCIDITY: u8 = 10;

/// Words needed per clarity point
const WORDS_PER_POINT: usize = 20;

/// Points awarded per detail word or lucidity indicator
const POINTS_PER_HIT: usize = 2;

/// Clarity score in `[1, 10]`: `floor(words / 20 + detail_hits * 2)`
pub fn clarity_score(catalogue: &Catalogue, transcript: &str) -> u8 {
    let word_count = transcript.split_whitespace().count();
    let detail_hits = count_hits(&catalogue.detail_words, transcript);

    let raw = word_count / WORDS_PER_POINT + detail_hits * POINTS_PER_HIT;
    raw.clamp(MIN_CLARITY as usize, MAX_CLARITY as usize) as u8
}

/// Lucidity score, always even and in `[0, 10]`
pub fn lucidity_score(catalogue: &Catalogue, transcript: &str) -> u8 {
    let hits = count_hits(&catalogue.lucidity_indicators, transcript);
    (hits * POINTS_PER_HIT).min(MAX_LUCIDITY as usize) as u8
}

/// Number of phrases contained in the transcript; repeats count once
fn count_hits(phrases: &[String], transcript: &str) -> usize {
    let lower = transcript.to_lowercase();
    phrases
        .iter()
        .filter(|phrase| lower.contains(phrase.as_str()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clarity_floor() {
        assert_eq!(clarity_score(Catalogue::builtin(), ""), 1);
        assert_eq!(clarity_score(Catalogue::builtin(), "   "), 1);
        assert_eq!(clarity_score(Catalogue::builtin(), "short dream"), 1);
    }

    #[test]
    fn test_clarity_formula() {
        let text = "I was flying through a crystal cave. It was vivid and full of color.";
        assert_eq!(clarity_score(Catalogue::builtin(), text), 4);
    }

    #[test]
    fn test_clarity_counts_each_detail_word_once() {
        assert_eq!(clarity_score(Catalogue::builtin(), "vivid vivid vivid"), 2);
    }

    #[test]
    fn test_clarity_word_count_contribution() {
        let forty_words = vec!["word"; 40].join(" ");
        assert_eq!(clarity_score(Catalogue::builtin(), &forty_words), 2);

        let tabs_and_newlines = vec!["word"; 60].join("\n\t ");
        assert_eq!(clarity_score(Catalogue::builtin(), &tabs_and_newlines), 3);
    }

    #[test]
    fn test_clarity_ceiling() {
        let text = "color texture sound feeling emotion detail vivid";
        assert_eq!(clarity_score(Catalogue::builtin(), text), 10);
    }

    #[test]
    fn test_lucidity_scores() {
        let catalogue = Catalogue::builtin();
        assert_eq!(lucidity_score(catalogue, ""), 0);
        assert_eq!(lucidity_score(catalogue, "I REALIZED it, realized it again"), 2);
        assert_eq!(
            lucidity_score(catalogue, "I realized I was lucid and decided to fly"),
            6
        );
        assert_eq!(
            lucidity_score(
                catalogue,
                "realized aware lucid control conscious decided chose willed"
            ),
            10
        );
    }

    #[test]
    fn test_scores_stay_in_range() {
        let catalogue = Catalogue::builtin();
        let long = vec!["vivid lucid color realized"; 200].join(" ");
        for text in ["", "a", "knew i was dreaming", long.as_str()] {
            let clarity = clarity_score(catalogue, text);
            let lucidity = lucidity_score(catalogue, text);
            assert!((MIN_CLARITY..=MAX_CLARITY).contains(&clarity));
            assert!(lucidity <= MAX_LUCIDITY);
            assert_eq!(lucidity % 2, 0);
        }
    }
}
