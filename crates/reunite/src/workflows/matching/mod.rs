//! Cross-entity matching between missing-person reports and findings.
//!
//! A newly created or edited record of one type is scored against the whole
//! active population of the opposite type. Scoring combines geographic
//! proximity, shared location fields, and categorical physical-trait and
//! clothing matches into a weighted total with a human-readable explanation
//! trail. Surviving candidates are ranked, persisted as reviewable
//! [`repository::PossibleMatch`] rows, and their owners notified once each
//! per run. Administrators later disposition the persisted matches through
//! the small state machine in [`review`].

pub mod audit;
pub mod domain;
pub(crate) mod engine;
pub mod geo;
pub mod notify;
pub mod ranker;
pub mod repository;
pub mod review;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    CandidateAttributes, CandidateId, CandidatePopulation, CandidateSummary, CatalogEntry,
    ClothingItem, Finding, FindingId, FindingStatus, Location, MatchDirection, MatchId,
    MatchSource, MissingReport, PaymentStatus, PersonName, PhysicalTrait, ReportId, ReportStatus,
    SourceValidationError, UserId,
};
pub use engine::{CandidateScore, DirectionPolicy, MatchingConfig, ScoringEngine};
pub use repository::{
    CandidateRepository, MatchAuditRepository, MatchPage, MatchQuery, NewPossibleMatch,
    NotificationGateway, NotifyError, PossibleMatch, RepositoryError,
};
pub use review::{ReviewAction, ReviewError, ReviewStatus, StandingError, UserStanding};
pub use router::matching_router;
pub use service::{MatchRun, MatchView, MatchingError, MatchingService};

pub use audit::AuditRecorder;
pub use notify::NotificationDispatcher;
