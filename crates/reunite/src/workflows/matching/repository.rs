use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    CandidateAttributes, CandidateId, CandidatePopulation, CandidateSummary, ClothingItem, Finding,
    FindingId, MatchId, MissingReport, PhysicalTrait, ReportId, UserId,
};
use super::review::ReviewStatus;

/// Read side of the persistence layer used by a matching run. Candidate
/// attribute lists are fetched lazily per candidate so a run never loads the
/// whole population's traits and clothing eagerly; an implementation may
/// batch or cache, as long as only the named candidate's rows are returned.
///
/// Trait/clothing updates are replace-all by design: the full new list
/// supersedes whatever was stored, with no incremental diffing.
pub trait CandidateRepository: Send + Sync {
    fn active_candidates(
        &self,
        population: CandidatePopulation,
    ) -> Result<Vec<CandidateSummary>, RepositoryError>;

    fn candidate_attributes(
        &self,
        population: CandidatePopulation,
        id: &CandidateId,
    ) -> Result<CandidateAttributes, RepositoryError>;

    fn missing_report(&self, id: &ReportId) -> Result<Option<MissingReport>, RepositoryError>;

    fn finding(&self, id: &FindingId) -> Result<Option<Finding>, RepositoryError>;

    fn replace_report_traits(
        &self,
        id: &ReportId,
        traits: Vec<PhysicalTrait>,
    ) -> Result<(), RepositoryError>;

    fn replace_report_clothing(
        &self,
        id: &ReportId,
        clothing: Vec<ClothingItem>,
    ) -> Result<(), RepositoryError>;

    fn replace_finding_traits(
        &self,
        id: &FindingId,
        traits: Vec<PhysicalTrait>,
    ) -> Result<(), RepositoryError>;

    fn replace_finding_clothing(
        &self,
        id: &FindingId,
        clothing: Vec<ClothingItem>,
    ) -> Result<(), RepositoryError>;
}

/// Insert payload for one audited match. The store assigns the id, the
/// creation timestamp, and the initial `pending` review status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPossibleMatch {
    pub report_id: ReportId,
    pub finding_id: FindingId,
    pub score: i32,
    pub matched_criteria: Vec<String>,
}

/// Persisted audit row pairing one report with one finding. Retained
/// indefinitely; only `review_status` and `admin_comment` change after
/// creation, and only through the review transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PossibleMatch {
    pub id: MatchId,
    pub report_id: ReportId,
    pub finding_id: FindingId,
    pub score: i32,
    pub matched_criteria: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub review_status: ReviewStatus,
    pub admin_comment: Option<String>,
}

/// Filter and pagination for the admin dashboard's match listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchQuery {
    pub review_status: Option<ReviewStatus>,
    pub page: usize,
    pub per_page: usize,
}

impl Default for MatchQuery {
    fn default() -> Self {
        Self {
            review_status: None,
            page: 1,
            per_page: 20,
        }
    }
}

/// One page of persisted matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPage {
    pub matches: Vec<PossibleMatch>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
}

/// Write/read side for the persisted match audit trail. Each insert is its
/// own short transaction; a run never holds a transaction across the whole
/// ranking pass.
pub trait MatchAuditRepository: Send + Sync {
    fn insert(&self, pairing: NewPossibleMatch) -> Result<PossibleMatch, RepositoryError>;

    fn fetch(&self, id: &MatchId) -> Result<Option<PossibleMatch>, RepositoryError>;

    fn update_review(
        &self,
        id: &MatchId,
        status: ReviewStatus,
        comment: Option<String>,
    ) -> Result<(), RepositoryError>;

    fn list(&self, query: MatchQuery) -> Result<MatchPage, RepositoryError>;
}

/// Outbound notification hook (e-mail, WhatsApp, push — the transport is the
/// messaging collaborator's concern).
pub trait NotificationGateway: Send + Sync {
    fn send(&self, recipient: &UserId, subject: &str, message: &str) -> Result<(), NotifyError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Per-recipient notification failure.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
    #[error("recipient refused delivery: {0}")]
    Rejected(String),
}
