//! Continuity projections of prior story nodes.

use crate::StoryNode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Hard cap on the continuity window passed to chapter generation.
///
/// More than a small bounded number risks unbounded prompt growth in the
/// remote model, so this is a documented constant rather than
/// configuration: behavior stays deterministic for tests.
pub const MAX_PREVIOUS_ARCS: usize = 3;

/// A read-only projection of a prior node, used only as generation-context
/// input. Never persisted separately; derived on read from existing nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct PreviousArc {
    /// Chapter the arc projects
    chapter_id: String,
    /// Themes carried forward for continuity
    themes: Vec<String>,
    /// Normalized sentiment of the source node
    sentiment_score: f32,
    /// Creation instant of the source node
    timestamp: DateTime<Utc>,
}

impl PreviousArc {
    /// Render the arc as a single prompt line for the wire
    /// `previousArcs: string[]` field.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyloom_core::{PreviousArc, StoryMetadata, StoryNode};
    /// use chrono::Utc;
    ///
    /// let node = StoryNode::new(
    ///     "entry-1",
    ///     "ch-1",
    ///     None,
    ///     StoryMetadata::new("positive", vec!["courage".into()], vec![], vec![]),
    ///     Utc::now(),
    /// );
    /// let arc = PreviousArc::from(&node);
    /// assert!(arc.prompt_line().contains("courage"));
    /// ```
    pub fn prompt_line(&self) -> String {
        format!(
            "Chapter {}: themes [{}], sentiment {:.2}",
            self.chapter_id,
            self.themes.join(", "),
            self.sentiment_score,
        )
    }
}

impl From<&StoryNode> for PreviousArc {
    fn from(node: &StoryNode) -> Self {
        Self {
            chapter_id: node.chapter_id().clone(),
            themes: node.metadata().themes().clone(),
            sentiment_score: *node.metadata().sentiment_score(),
            timestamp: *node.created_at(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoryMetadata;

    #[test]
    fn projection_copies_continuity_fields() {
        let metadata = StoryMetadata::new(
            "negative",
            vec!["loss".into(), "hope".into()],
            vec!["Ava".into()],
            vec![],
        );
        let node = StoryNode::new("entry-7", "ch-7", Some("ch-6".into()), metadata, Utc::now());
        let arc = PreviousArc::from(&node);
        assert_eq!(arc.chapter_id(), "ch-7");
        assert_eq!(arc.sentiment_score(), &-1.0);
        assert_eq!(arc.themes().len(), 2);
    }
}
