use std::sync::Arc;

use tracing::warn;

use super::domain::{FindingId, MatchDirection, MatchSource, ReportId};
use super::engine::CandidateScore;
use super::repository::{MatchAuditRepository, NewPossibleMatch, PossibleMatch};

/// Persists every ranked match as a reviewable audit row. Writes are
/// independent: one failed insert is logged and skipped so the remaining
/// matches still land.
pub struct AuditRecorder<A> {
    repository: Arc<A>,
}

impl<A> AuditRecorder<A>
where
    A: MatchAuditRepository,
{
    pub fn new(repository: Arc<A>) -> Self {
        Self { repository }
    }

    pub fn record(&self, source: &MatchSource, ranked: &[CandidateScore]) -> Vec<PossibleMatch> {
        let mut recorded = Vec::with_capacity(ranked.len());
        for scored in ranked {
            match self.repository.insert(pairing(source, scored)) {
                Ok(row) => recorded.push(row),
                Err(err) => warn!(
                    source = %source.id.0,
                    candidate = %scored.candidate_id.0,
                    %err,
                    "failed to persist possible match, continuing with remaining matches"
                ),
            }
        }
        recorded
    }
}

/// Build the direction-agnostic (report, finding) pairing for one scored
/// candidate.
fn pairing(source: &MatchSource, scored: &CandidateScore) -> NewPossibleMatch {
    let (report_id, finding_id) = match source.direction {
        MatchDirection::ReportToFindings => (
            ReportId(source.id.0.clone()),
            FindingId(scored.candidate_id.0.clone()),
        ),
        MatchDirection::FindingToReports => (
            ReportId(scored.candidate_id.0.clone()),
            FindingId(source.id.0.clone()),
        ),
    };

    NewPossibleMatch {
        report_id,
        finding_id,
        score: scored.total_score,
        matched_criteria: scored.matched_criteria.clone(),
    }
}
