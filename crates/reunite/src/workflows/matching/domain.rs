use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for missing-person reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportId(pub String);

/// Identifier wrapper for unidentified-person findings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FindingId(pub String);

/// Identifier wrapper for the user owning or submitting a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Identifier wrapper for persisted possible-match rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchId(pub String);

/// Identifier for a record acting as one side of a scoring pass. Carries the
/// raw id of either a report or a finding depending on the run direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

/// Reference into one of the fixed categorical catalogs (body parts, garment
/// types, place types).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: u32,
    pub name: String,
}

/// Identity fields shared by both record types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    pub given_name: String,
    pub middle_name: Option<String>,
    pub paternal_surname: String,
    pub maternal_surname: Option<String>,
}

impl PersonName {
    pub fn full_name(&self) -> String {
        let mut parts = vec![self.given_name.as_str()];
        if let Some(middle) = self.middle_name.as_deref() {
            parts.push(middle);
        }
        parts.push(self.paternal_surname.as_str());
        if let Some(maternal) = self.maternal_surname.as_deref() {
            parts.push(maternal);
        }
        parts
            .into_iter()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Place where a person disappeared or was located. Owned 1:1 by its record
/// and resolved before scoring; coordinates are optional because submitters
/// frequently cannot pin the exact spot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub state: String,
    pub municipality: String,
    pub locality: String,
    pub street: Option<String>,
    pub reference_notes: Option<String>,
    pub postal_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Distinguishing physical feature (scar, tattoo, birthmark) tied to a body
/// part from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalTrait {
    pub body_part: CatalogEntry,
    pub trait_type: String,
    pub description: String,
}

/// Clothing worn when the person was last seen or found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClothingItem {
    pub garment: CatalogEntry,
    pub color: Option<String>,
    pub brand: Option<String>,
    pub special_feature: Option<String>,
}

/// Lifecycle of a missing-person report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Active,
    Found,
    Dismissed,
}

impl ReportStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ReportStatus::Active => "active",
            ReportStatus::Found => "found",
            ReportStatus::Dismissed => "dismissed",
        }
    }
}

/// Lifecycle of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingStatus {
    Active,
    Closed,
}

impl FindingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            FindingStatus::Active => "active",
            FindingStatus::Closed => "closed",
        }
    }
}

/// Billing state of a report submission, tracked by the billing collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl PaymentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
        }
    }
}

/// A family-submitted record describing a person reported missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingReport {
    pub id: ReportId,
    pub submitter: UserId,
    pub name: PersonName,
    pub disappearance_date: NaiveDate,
    pub place_type: CatalogEntry,
    pub status: ReportStatus,
    pub payment_status: PaymentStatus,
    pub location: Location,
    pub traits: Vec<PhysicalTrait>,
    pub clothing: Vec<ClothingItem>,
}

/// A third-party record describing an unidentified person who was located,
/// living or deceased.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub id: FindingId,
    pub reporter: UserId,
    pub name: PersonName,
    pub found_date: NaiveDate,
    pub place_type: CatalogEntry,
    pub status: FindingStatus,
    pub location: Location,
    pub traits: Vec<PhysicalTrait>,
    pub clothing: Vec<ClothingItem>,
}

/// Which population a matching run scores against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidatePopulation {
    Findings,
    MissingReports,
}

impl CandidatePopulation {
    pub const fn label(self) -> &'static str {
        match self {
            CandidatePopulation::Findings => "findings",
            CandidatePopulation::MissingReports => "missing_reports",
        }
    }
}

/// Direction of a matching run. The two directions carry independently
/// tunable weights and floors; they are deliberately not folded together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchDirection {
    ReportToFindings,
    FindingToReports,
}

impl MatchDirection {
    pub const fn label(self) -> &'static str {
        match self {
            MatchDirection::ReportToFindings => "report_to_findings",
            MatchDirection::FindingToReports => "finding_to_reports",
        }
    }

    pub const fn candidate_population(self) -> CandidatePopulation {
        match self {
            MatchDirection::ReportToFindings => CandidatePopulation::Findings,
            MatchDirection::FindingToReports => CandidatePopulation::MissingReports,
        }
    }
}

/// One member of the candidate snapshot: identity, owner, and resolved
/// location. Trait/clothing lists are loaded lazily per candidate through
/// [`super::repository::CandidateRepository::candidate_attributes`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSummary {
    pub id: CandidateId,
    pub name: PersonName,
    pub owner: UserId,
    pub location: Location,
}

impl CandidateSummary {
    pub fn from_report(report: &MissingReport) -> Self {
        Self {
            id: CandidateId(report.id.0.clone()),
            name: report.name.clone(),
            owner: report.submitter.clone(),
            location: report.location.clone(),
        }
    }

    pub fn from_finding(finding: &Finding) -> Self {
        Self {
            id: CandidateId(finding.id.0.clone()),
            name: finding.name.clone(),
            owner: finding.reporter.clone(),
            location: finding.location.clone(),
        }
    }
}

/// Lazily loaded attribute lists for one candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateAttributes {
    pub traits: Vec<PhysicalTrait>,
    pub clothing: Vec<ClothingItem>,
}

/// Validation errors raised before a matching run touches persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SourceValidationError {
    #[error("source record has no usable identity fields")]
    MissingIdentity,
    #[error("source record has no usable location")]
    MissingLocation,
}

/// A fully populated record acting as the source side of a matching run.
/// Construction validates the fields scoring depends on, so a malformed
/// record is rejected before anything is loaded or persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSource {
    pub id: CandidateId,
    pub direction: MatchDirection,
    pub display_name: String,
    pub location: Location,
    pub traits: Vec<PhysicalTrait>,
    pub clothing: Vec<ClothingItem>,
}

impl MatchSource {
    pub fn from_report(report: &MissingReport) -> Result<Self, SourceValidationError> {
        Self::build(
            CandidateId(report.id.0.clone()),
            MatchDirection::ReportToFindings,
            &report.name,
            &report.location,
            &report.traits,
            &report.clothing,
        )
    }

    pub fn from_finding(finding: &Finding) -> Result<Self, SourceValidationError> {
        Self::build(
            CandidateId(finding.id.0.clone()),
            MatchDirection::FindingToReports,
            &finding.name,
            &finding.location,
            &finding.traits,
            &finding.clothing,
        )
    }

    fn build(
        id: CandidateId,
        direction: MatchDirection,
        name: &PersonName,
        location: &Location,
        traits: &[PhysicalTrait],
        clothing: &[ClothingItem],
    ) -> Result<Self, SourceValidationError> {
        if name.given_name.trim().is_empty() && name.paternal_surname.trim().is_empty() {
            return Err(SourceValidationError::MissingIdentity);
        }
        if location.state.trim().is_empty() {
            return Err(SourceValidationError::MissingLocation);
        }

        Ok(Self {
            id,
            direction,
            display_name: name.full_name(),
            location: location.clone(),
            traits: traits.to_vec(),
            clothing: clothing.to_vec(),
        })
    }
}
