use serde::{Deserialize, Serialize};

use super::super::domain::MatchDirection;

/// Weights and floor applied to one matching direction. The two directions
/// are tuned independently; treat them as separate dials, not one value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionPolicy {
    pub trait_match_points: i32,
    pub clothing_match_points: i32,
    /// Minimum total a candidate must reach to count as a match.
    pub min_total_score: i32,
}

/// Scoring configuration for the matching engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingConfig {
    pub close_radius_km: f64,
    pub near_radius_km: f64,
    pub close_proximity_points: i32,
    pub near_proximity_points: i32,
    pub same_state_points: i32,
    pub same_municipality_points: i32,
    /// Ranked results are truncated to this many candidates.
    pub max_ranked_matches: usize,
    pub report_to_findings: DirectionPolicy,
    pub finding_to_reports: DirectionPolicy,
}

impl MatchingConfig {
    pub fn direction_policy(&self, direction: MatchDirection) -> &DirectionPolicy {
        match direction {
            MatchDirection::ReportToFindings => &self.report_to_findings,
            MatchDirection::FindingToReports => &self.finding_to_reports,
        }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            close_radius_km: 10.0,
            near_radius_km: 50.0,
            close_proximity_points: 200,
            near_proximity_points: 100,
            same_state_points: 50,
            same_municipality_points: 100,
            max_ranked_matches: 10,
            report_to_findings: DirectionPolicy {
                trait_match_points: 20,
                clothing_match_points: 15,
                min_total_score: 1,
            },
            finding_to_reports: DirectionPolicy {
                trait_match_points: 30,
                clothing_match_points: 20,
                min_total_score: 20,
            },
        }
    }
}
