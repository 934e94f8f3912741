use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::entry::DreamEntry;

/// How many dream signs `most_common_dream_signs` reports
pub const TOP_DREAM_SIGNS: usize = 10;

/// Aggregate statistics over the whole journal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalInsights {
    pub total_dreams: usize,
    /// Rounded to one decimal, 0 for an empty journal
    pub average_lucidity: f64,
    /// Rounded to one decimal, 0 for an empty journal
    pub average_clarity: f64,
    pub most_common_dream_signs: Vec<String>,
}

impl JournalInsights {
    pub fn from_dreams(dreams: &[DreamEntry]) -> Self {
        Self {
            total_dreams: dreams.len(),
            average_lucidity: average(dreams, |d| d.lucidity),
            average_clarity: average(dreams, |d| d.clarity),
            most_common_dream_signs: most_common_dream_signs(dreams),
        }
    }
}

fn average(dreams: &[DreamEntry], score: impl Fn(&DreamEntry) -> u8) -> f64 {
    if dreams.is_empty() {
        return 0.0;
    }
    let total: u64 = dreams.iter().map(|d| score(d) as u64).sum();
    let mean = total as f64 / dreams.len() as f64;
    (mean * 10.0).round() / 10.0
}

/// Up to ten signs by frequency; ties keep the order they were first seen
pub fn most_common_dream_signs(dreams: &[DreamEntry]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();

    for sign in dreams.iter().flat_map(|d| d.dream_signs.iter()) {
        let count = counts.entry(sign.as_str()).or_insert(0);
        if *count == 0 {
            first_seen.push(sign.as_str());
        }
        *count += 1;
    }

    // Stable sort keeps first-seen order among equal counts
    first_seen.sort_by(|a, b| counts[b].cmp(&counts[a]));
    first_seen
        .into_iter()
        .take(TOP_DREAM_SIGNS)
        .map(str::to_string)
        .collect()
}
