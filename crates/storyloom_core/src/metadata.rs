//! Structured metadata extracted from journal-entry text.

use serde::{Deserialize, Serialize};

/// Metadata derived from a journal entry's free text.
///
/// Immutable once created for a given node; the node stores it as a
/// snapshot of what extraction saw at generation time.
///
/// # Examples
///
/// ```
/// use storyloom_core::StoryMetadata;
///
/// let metadata = StoryMetadata::new(
///     "positive",
///     vec!["learning".to_string()],
///     vec![],
///     vec!["fractions".to_string()],
/// );
/// assert_eq!(metadata.sentiment_score(), &1.0);
/// assert_eq!(metadata.themes(), &["learning".to_string()]);
/// ```
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters,
)]
pub struct StoryMetadata {
    /// Normalized sentiment in −1.0..1.0
    sentiment_score: f32,
    /// Raw sentiment label as returned by extraction
    sentiment_label: String,
    /// Theme strings, order as returned by extraction
    themes: Vec<String>,
    /// Entity strings
    entities: Vec<String>,
    /// Key-phrase strings
    key_phrases: Vec<String>,
}

impl StoryMetadata {
    /// Build metadata from a raw sentiment label plus extracted sets.
    pub fn new(
        sentiment_label: impl Into<String>,
        themes: Vec<String>,
        entities: Vec<String>,
        key_phrases: Vec<String>,
    ) -> Self {
        let sentiment_label = sentiment_label.into();
        Self {
            sentiment_score: score_from_label(&sentiment_label),
            sentiment_label,
            themes,
            entities,
            key_phrases,
        }
    }
}

/// Map a sentiment label onto the normalized −1.0..1.0 scale.
///
/// Labels are matched case-insensitively; numeric strings are parsed and
/// clamped; anything unrecognized is neutral.
fn score_from_label(label: &str) -> f32 {
    match label.trim().to_ascii_lowercase().as_str() {
        "positive" | "very positive" => 1.0,
        "negative" | "very negative" => -1.0,
        "neutral" | "mixed" | "" => 0.0,
        other => other.parse::<f32>().map_or(0.0, |v| v.clamp(-1.0, 1.0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_map_to_normalized_scores() {
        assert_eq!(score_from_label("positive"), 1.0);
        assert_eq!(score_from_label("Negative"), -1.0);
        assert_eq!(score_from_label("neutral"), 0.0);
        assert_eq!(score_from_label("gibberish"), 0.0);
    }

    #[test]
    fn numeric_labels_parse_and_clamp() {
        assert_eq!(score_from_label("0.5"), 0.5);
        assert_eq!(score_from_label("-3.0"), -1.0);
    }

    #[test]
    fn metadata_keeps_the_raw_label() {
        let m = StoryMetadata::new("positive", vec![], vec![], vec![]);
        assert_eq!(m.sentiment_label(), "positive");
        assert_eq!(m.sentiment_score(), &1.0);
    }
}
