use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use super::audit::AuditRecorder;
use super::domain::{
    CandidateId, ClothingItem, FindingId, MatchDirection, MatchId, MatchSource, PhysicalTrait,
    ReportId, SourceValidationError, UserId,
};
use super::engine::{CandidateScore, MatchingConfig, ScoringEngine};
use super::notify::NotificationDispatcher;
use super::ranker;
use super::repository::{
    CandidateRepository, MatchAuditRepository, MatchPage, MatchQuery, NotificationGateway,
    PossibleMatch, RepositoryError,
};
use super::review::{self, ReviewAction, ReviewError};

/// Facade composing the candidate repository, scoring engine, ranker, audit
/// recorder, and notification dispatcher into one matching run per request.
pub struct MatchingService<R, A, N> {
    repository: Arc<R>,
    audit: Arc<A>,
    recorder: AuditRecorder<A>,
    dispatcher: NotificationDispatcher<N>,
    engine: ScoringEngine,
}

impl<R, A, N> MatchingService<R, A, N>
where
    R: CandidateRepository + 'static,
    A: MatchAuditRepository + 'static,
    N: NotificationGateway + 'static,
{
    pub fn new(
        repository: Arc<R>,
        audit: Arc<A>,
        notifications: Arc<N>,
        config: MatchingConfig,
    ) -> Self {
        Self {
            repository,
            recorder: AuditRecorder::new(audit.clone()),
            audit,
            dispatcher: NotificationDispatcher::new(notifications),
            engine: ScoringEngine::new(config),
        }
    }

    /// Run matching for a missing-person report against all active findings.
    pub fn run_for_report(&self, id: &ReportId) -> Result<MatchRun, MatchingError> {
        let report = self
            .repository
            .missing_report(id)?
            .ok_or(RepositoryError::NotFound)?;
        let source = MatchSource::from_report(&report)?;
        Ok(self.execute(source))
    }

    /// Run matching for a finding against all active missing-person reports.
    pub fn run_for_finding(&self, id: &FindingId) -> Result<MatchRun, MatchingError> {
        let finding = self
            .repository
            .finding(id)?
            .ok_or(RepositoryError::NotFound)?;
        let source = MatchSource::from_finding(&finding)?;
        Ok(self.execute(source))
    }

    /// Replace a report's trait and clothing lists wholesale, then re-run
    /// matching for the updated record.
    pub fn update_report_attributes(
        &self,
        id: &ReportId,
        traits: Vec<PhysicalTrait>,
        clothing: Vec<ClothingItem>,
    ) -> Result<MatchRun, MatchingError> {
        self.repository.replace_report_traits(id, traits)?;
        self.repository.replace_report_clothing(id, clothing)?;
        self.run_for_report(id)
    }

    /// Replace a finding's trait and clothing lists wholesale, then re-run
    /// matching for the updated record.
    pub fn update_finding_attributes(
        &self,
        id: &FindingId,
        traits: Vec<PhysicalTrait>,
        clothing: Vec<ClothingItem>,
    ) -> Result<MatchRun, MatchingError> {
        self.repository.replace_finding_traits(id, traits)?;
        self.repository.replace_finding_clothing(id, clothing)?;
        self.run_for_finding(id)
    }

    /// Apply an administrator disposition to a pending match.
    pub fn review_match(
        &self,
        id: &MatchId,
        action: &str,
        comment: Option<String>,
    ) -> Result<PossibleMatch, MatchingError> {
        let action = ReviewAction::parse(action)?;
        let current = self.audit.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        let next = review::transition(current.review_status, action)?;

        self.audit.update_review(id, next, comment.clone())?;

        let mut reviewed = current;
        reviewed.review_status = next;
        if comment.is_some() {
            reviewed.admin_comment = comment;
        }
        Ok(reviewed)
    }

    /// Paginated match listing for the admin dashboard.
    pub fn matches(&self, query: MatchQuery) -> Result<MatchPage, MatchingError> {
        Ok(self.audit.list(query)?)
    }

    fn execute(&self, source: MatchSource) -> MatchRun {
        let population = source.direction.candidate_population();

        let candidates = match self.repository.active_candidates(population) {
            Ok(candidates) => candidates,
            Err(err) => {
                // The primary record write already succeeded upstream;
                // matching is best-effort on top of it.
                error!(
                    source = %source.id.0,
                    direction = source.direction.label(),
                    %err,
                    "candidate snapshot unavailable, reporting zero matches"
                );
                return MatchRun::degraded(&source);
            }
        };

        let floor = self
            .engine
            .config()
            .direction_policy(source.direction)
            .min_total_score;

        let mut scored = Vec::new();
        for candidate in &candidates {
            let attributes = match self.repository.candidate_attributes(population, &candidate.id)
            {
                Ok(attributes) => attributes,
                Err(err) => {
                    warn!(
                        candidate = %candidate.id.0,
                        %err,
                        "skipping candidate with unreadable attributes"
                    );
                    continue;
                }
            };

            let score = self.engine.score(&source, candidate, &attributes);
            if score.total_score >= floor {
                scored.push(score);
            }
        }

        let ranked = ranker::rank(scored, self.engine.config().max_ranked_matches);

        let audited = self.recorder.record(&source, &ranked);

        let owners: HashMap<&CandidateId, &UserId> = candidates
            .iter()
            .map(|candidate| (&candidate.id, &candidate.owner))
            .collect();
        let recipients: Vec<UserId> = ranked
            .iter()
            .filter_map(|scored| owners.get(&scored.candidate_id).map(|user| (*user).clone()))
            .collect();
        let notified_owners = self
            .dispatcher
            .notify_owners(&source.display_name, &recipients);

        info!(
            source = %source.id.0,
            direction = source.direction.label(),
            candidates = candidates.len(),
            matches = ranked.len(),
            audited = audited.len(),
            notified_owners,
            "matching run complete"
        );

        MatchRun {
            source_id: source.id,
            direction: source.direction,
            degraded: false,
            matches: ranked.into_iter().map(MatchView::from).collect(),
            audited: audited.into_iter().map(|row| row.id).collect(),
            notified_owners,
        }
    }
}

/// Outcome of one matching run, returned synchronously to the triggering
/// collaborator for inclusion in its response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRun {
    pub source_id: CandidateId,
    pub direction: MatchDirection,
    /// True when the candidate snapshot could not be loaded and the run
    /// degraded to an empty result instead of failing the primary write.
    pub degraded: bool,
    pub matches: Vec<MatchView>,
    pub audited: Vec<MatchId>,
    pub notified_owners: usize,
}

impl MatchRun {
    fn degraded(source: &MatchSource) -> Self {
        Self {
            source_id: source.id.clone(),
            direction: source.direction,
            degraded: true,
            matches: Vec::new(),
            audited: Vec::new(),
            notified_owners: 0,
        }
    }
}

/// One ranked candidate as exposed to collaborators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchView {
    pub candidate_id: CandidateId,
    pub score: i32,
    pub matched_criteria: Vec<String>,
}

impl From<CandidateScore> for MatchView {
    fn from(scored: CandidateScore) -> Self {
        Self {
            candidate_id: scored.candidate_id,
            score: scored.total_score,
            matched_criteria: scored.matched_criteria,
        }
    }
}

/// Error raised by the matching service.
#[derive(Debug, thiserror::Error)]
pub enum MatchingError {
    #[error(transparent)]
    InvalidSource(#[from] SourceValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Review(#[from] ReviewError),
}
