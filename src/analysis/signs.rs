use super::catalogue::Catalogue;

/// Maximum number of reality checks suggested for one dream
pub const MAX_REALITY_CHECKS: usize = 3;

/// Catalogue dream signs contained in the transcript, in catalogue order.
///
/// Matching is plain substring containment against the lower-cased transcript.
pub fn detect_dream_signs(catalogue: &Catalogue, transcript: &str) -> Vec<String> {
    let lower = transcript.to_lowercase();

    catalogue
        .dream_signs
        .iter()
        .filter(|sign| lower.contains(sign.as_str()))
        .cloned()
        .collect()
}

/// Reality checks for the detected signs.
///
/// Each sign is matched against the rule keywords (the sign must contain the
/// keyword). Falls back to the default checks when nothing matched.
pub fn suggest_reality_checks(catalogue: &Catalogue, dream_signs: &[String]) -> Vec<String> {
    let mut suggestions: Vec<String> = Vec::new();

    for sign in dream_signs {
        let sign = sign.to_lowercase();
        for rule in &catalogue.reality_checks {
            if sign.contains(rule.keyword.as_str()) && !suggestions.contains(&rule.suggestion) {
                suggestions.push(rule.suggestion.clone());
            }
        }
    }

    if suggestions.is_empty() {
        suggestions = catalogue.default_reality_checks.clone();
    }

    suggestions.truncate(MAX_REALITY_CHECKS);
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signs(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_detect_in_catalogue_order() {
        let detected = detect_dream_signs(
            Catalogue::builtin(),
            "At SCHOOL I was falling, then Flying over water",
        );
        assert_eq!(detected, signs(&["flying", "falling", "water", "school"]));
    }

    #[test]
    fn test_detect_is_literal_substring() {
        // "fly" is not "flying" and "homework" contains "work"
        let detected = detect_dream_signs(Catalogue::builtin(), "I could fly. Homework");
        assert_eq!(detected, signs(&["work"]));
    }

    #[test]
    fn test_overlapping_signs_both_reported() {
        let detected = detect_dream_signs(Catalogue::builtin(), "my teeth falling out");
        assert_eq!(detected, signs(&["falling", "teeth falling"]));
    }

    #[test]
    fn test_suggestions_fall_back_to_defaults() {
        let suggestions = suggest_reality_checks(Catalogue::builtin(), &[]);
        assert_eq!(suggestions, Catalogue::builtin().default_reality_checks);

        let suggestions = suggest_reality_checks(Catalogue::builtin(), &signs(&["water"]));
        assert_eq!(suggestions.len(), 3);
        assert_eq!(suggestions[0], "Look at your hands - count your fingers");
    }

    #[test]
    fn test_suggestions_deduplicated_and_ordered() {
        let suggestions = suggest_reality_checks(
            Catalogue::builtin(),
            &signs(&["flying", "teeth falling", "flying"]),
        );
        assert_eq!(
            suggestions,
            signs(&["Try to fly by jumping up", "Count your teeth in a mirror"])
        );
    }

    #[test]
    fn test_suggestions_truncated_to_three() {
        let suggestions = suggest_reality_checks(
            Catalogue::builtin(),
            &signs(&["flying", "teeth falling", "strange doors", "mirrors", "text changing"]),
        );
        assert_eq!(
            suggestions,
            signs(&[
                "Try to fly by jumping up",
                "Count your teeth in a mirror",
                "Pay attention to doorways and passages",
            ])
        );
    }
}
