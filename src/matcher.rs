use crate::error::EngineError;
use crate::models::{MatchOutcome, RecommendationItem};

/// External semantic-matching collaborator: given recommendation texts and
/// the user's logged free text for the period, decide which were followed.
/// Implementations may be an LLM bridge or a rules engine; the engine only
/// sees the outcome.
pub trait RecommendationMatcher {
    fn match_recommendations(
        &self,
        recommendations: &[RecommendationItem],
        journal: &[String],
    ) -> Result<MatchOutcome, EngineError>;
}

/// Deterministic built-in matcher: a recommendation counts as followed when
/// its target value (or, failing that, its text) and a journal entry contain
/// one another case-insensitively.
#[derive(Debug, Default)]
pub struct KeywordMatcher;

impl KeywordMatcher {
    fn followed(needle: &str, journal: &[String]) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return false;
        }
        journal.iter().any(|entry| {
            let entry = entry.trim().to_lowercase();
            !entry.is_empty() && (entry.contains(&needle) || needle.contains(&entry))
        })
    }
}

impl RecommendationMatcher for KeywordMatcher {
    fn match_recommendations(
        &self,
        recommendations: &[RecommendationItem],
        journal: &[String],
    ) -> Result<MatchOutcome, EngineError> {
        let has_text = journal.iter().any(|entry| !entry.trim().is_empty());
        if !recommendations.is_empty() && !has_text {
            return Err(EngineError::MissingClassification {
                reason: "no logged meal or food text for this period".to_string(),
            });
        }

        let mut matched_items = Vec::new();
        let mut unmatched_items = Vec::new();

        for item in recommendations {
            let needle = item.target_value.as_deref().unwrap_or(&item.text);
            if Self::followed(needle, journal) {
                matched_items.push(item.text.clone());
            } else {
                unmatched_items.push(item.text.clone());
            }
        }

        let total_recommendations = recommendations.len();
        let recommendations_followed = matched_items.len();
        let analysis = if total_recommendations == 0 {
            "No tracked recommendations for this period.".to_string()
        } else {
            format!(
                "Keyword match: {recommendations_followed} of {total_recommendations} tracked \
                 recommendations found in {} journal entries.",
                journal.len()
            )
        };

        Ok(MatchOutcome {
            recommendations_followed,
            total_recommendations,
            analysis,
            matched_items,
            unmatched_items,
        })
    }
}
