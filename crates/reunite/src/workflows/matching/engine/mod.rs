mod config;
mod rules;

pub use config::{DirectionPolicy, MatchingConfig};

use serde::{Deserialize, Serialize};

use super::domain::{CandidateAttributes, CandidateId, CandidateSummary, MatchSource};

/// Stateless scorer applying the configured weights to one (source,
/// candidate) pair. Safe to call concurrently; it reads nothing but its
/// arguments and its immutable configuration.
pub struct ScoringEngine {
    config: MatchingConfig,
}

impl ScoringEngine {
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Score a candidate against the source. Explanations are ordered:
    /// proximity, state, municipality, then traits, then clothing — the
    /// total always equals the sum the explanation trail accounts for.
    pub fn score(
        &self,
        source: &MatchSource,
        candidate: &CandidateSummary,
        attributes: &CandidateAttributes,
    ) -> CandidateScore {
        let policy = self.config.direction_policy(source.direction);

        let (mut total, mut criteria) =
            rules::location_score(&self.config, &source.location, &candidate.location);

        let (points, explanations) =
            rules::trait_score(policy.trait_match_points, &source.traits, &attributes.traits);
        total += points;
        criteria.extend(explanations);

        let (points, explanations) = rules::clothing_score(
            policy.clothing_match_points,
            &source.clothing,
            &attributes.clothing,
        );
        total += points;
        criteria.extend(explanations);

        CandidateScore {
            candidate_id: candidate.id.clone(),
            total_score: total,
            matched_criteria: criteria,
        }
    }
}

/// Scored pairing of the run's source with one candidate, with the ordered
/// explanation trail backing the total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub candidate_id: CandidateId,
    pub total_score: i32,
    pub matched_criteria: Vec<String>,
}
