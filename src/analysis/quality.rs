/// Bring a recognizer confidence into [0, 1]; NaN counts as unknown (0)
pub fn clamp_confidence(confidence: f32) -> f32 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}

/// Tag for how confident the recognizer was in the transcript
pub fn confidence_tag(confidence: f32) -> Option<&'static str> {
    if confidence >= 0.9 {
        Some("high-confidence")
    } else if confidence >= 0.7 {
        Some("medium-confidence")
    } else if confidence > 0.0 {
        Some("low-confidence")
    } else {
        None
    }
}

/// Tag for how detailed the narration was
pub fn clarity_tag(clarity: u8) -> &'static str {
    match clarity {
        8.. => "very-vivid",
        6..=7 => "vivid",
        4..=5 => "moderate-detail",
        _ => "brief",
    }
}

/// At most one confidence tag followed by exactly one clarity tag
pub fn quality_tags(confidence: f32, clarity: u8) -> Vec<String> {
    confidence_tag(confidence)
        .into_iter()
        .chain(std::iter::once(clarity_tag(clarity)))
        .map(str::to_string)
        .collect()
}
