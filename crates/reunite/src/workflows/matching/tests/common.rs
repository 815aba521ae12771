use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, Utc};

use crate::workflows::matching::domain::{
    CandidateAttributes, CandidateId, CandidatePopulation, CandidateSummary, CatalogEntry,
    ClothingItem, Finding, FindingId, FindingStatus, Location, MatchId, MissingReport,
    PaymentStatus, PersonName, PhysicalTrait, ReportId, ReportStatus, UserId,
};
use crate::workflows::matching::repository::{
    CandidateRepository, MatchAuditRepository, MatchPage, MatchQuery, NewPossibleMatch,
    NotificationGateway, NotifyError, PossibleMatch, RepositoryError,
};
use crate::workflows::matching::review::ReviewStatus;
use crate::workflows::matching::{MatchingConfig, MatchingService};

pub(super) fn person(given: &str, paternal: &str) -> PersonName {
    PersonName {
        given_name: given.to_string(),
        middle_name: None,
        paternal_surname: paternal.to_string(),
        maternal_surname: None,
    }
}

pub(super) fn cdmx_location() -> Location {
    Location {
        state: "Ciudad de México".to_string(),
        municipality: "Cuauhtémoc".to_string(),
        locality: "Centro".to_string(),
        street: Some("Eje Central 12".to_string()),
        reference_notes: None,
        postal_code: Some("06000".to_string()),
        latitude: Some(19.4326),
        longitude: Some(-99.1332),
    }
}

pub(super) fn near_cdmx_location() -> Location {
    Location {
        locality: "Doctores".to_string(),
        street: None,
        postal_code: Some("06720".to_string()),
        latitude: Some(19.43),
        longitude: Some(-99.13),
        ..cdmx_location()
    }
}

pub(super) fn guadalajara_location() -> Location {
    Location {
        state: "Jalisco".to_string(),
        municipality: "Guadalajara".to_string(),
        locality: "Centro".to_string(),
        street: None,
        reference_notes: None,
        postal_code: Some("44100".to_string()),
        latitude: Some(20.6597),
        longitude: Some(-103.3496),
    }
}

pub(super) fn coordless(location: Location) -> Location {
    Location {
        latitude: None,
        longitude: None,
        ..location
    }
}

pub(super) fn trait_of(body_part_id: u32, body_part: &str, trait_type: &str) -> PhysicalTrait {
    PhysicalTrait {
        body_part: CatalogEntry {
            id: body_part_id,
            name: body_part.to_string(),
        },
        trait_type: trait_type.to_string(),
        description: format!("{trait_type} of roughly 2 cm"),
    }
}

pub(super) fn clothing_of(garment_id: u32, garment: &str, color: Option<&str>) -> ClothingItem {
    ClothingItem {
        garment: CatalogEntry {
            id: garment_id,
            name: garment.to_string(),
        },
        color: color.map(str::to_string),
        brand: None,
        special_feature: None,
    }
}

/// Report with one nose-scar trait and one red t-shirt, the canonical pair
/// for the sample findings below.
pub(super) fn report(id: &str, owner: &str, location: Location) -> MissingReport {
    MissingReport {
        id: ReportId(id.to_string()),
        submitter: UserId(owner.to_string()),
        name: person("Laura", "Mendoza"),
        disappearance_date: NaiveDate::from_ymd_opt(2025, 5, 20).expect("valid date"),
        place_type: CatalogEntry {
            id: 2,
            name: "Parque".to_string(),
        },
        status: ReportStatus::Active,
        payment_status: PaymentStatus::Paid,
        location,
        traits: vec![trait_of(3, "Nariz", "Cicatriz")],
        clothing: vec![clothing_of(7, "Playera", Some("Rojo"))],
    }
}

pub(super) fn finding(id: &str, owner: &str, location: Location) -> Finding {
    Finding {
        id: FindingId(id.to_string()),
        reporter: UserId(owner.to_string()),
        name: person("Persona", "Localizada"),
        found_date: NaiveDate::from_ymd_opt(2025, 6, 2).expect("valid date"),
        place_type: CatalogEntry {
            id: 5,
            name: "Hospital".to_string(),
        },
        status: FindingStatus::Active,
        location,
        traits: vec![trait_of(3, "Nariz", "Cicatriz")],
        clothing: vec![clothing_of(7, "Playera", Some("Rojo"))],
    }
}

pub(super) fn bare_finding(id: &str, owner: &str, location: Location) -> Finding {
    Finding {
        traits: Vec::new(),
        clothing: Vec::new(),
        ..finding(id, owner, location)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRecords {
    reports: Arc<Mutex<Vec<MissingReport>>>,
    findings: Arc<Mutex<Vec<Finding>>>,
    unreadable: Arc<Mutex<HashSet<String>>>,
    snapshot_offline: Arc<Mutex<bool>>,
}

impl MemoryRecords {
    pub(super) fn add_report(&self, report: MissingReport) {
        self.reports.lock().expect("records mutex poisoned").push(report);
    }

    pub(super) fn add_finding(&self, finding: Finding) {
        self.findings
            .lock()
            .expect("records mutex poisoned")
            .push(finding);
    }

    pub(super) fn poison_attributes(&self, id: &str) {
        self.unreadable
            .lock()
            .expect("records mutex poisoned")
            .insert(id.to_string());
    }

    pub(super) fn take_snapshots_offline(&self) {
        *self.snapshot_offline.lock().expect("records mutex poisoned") = true;
    }
}

impl CandidateRepository for MemoryRecords {
    fn active_candidates(
        &self,
        population: CandidatePopulation,
    ) -> Result<Vec<CandidateSummary>, RepositoryError> {
        if *self.snapshot_offline.lock().expect("records mutex poisoned") {
            return Err(RepositoryError::Unavailable(
                "candidate store offline".to_string(),
            ));
        }

        let candidates = match population {
            CandidatePopulation::Findings => self
                .findings
                .lock()
                .expect("records mutex poisoned")
                .iter()
                .filter(|finding| finding.status == FindingStatus::Active)
                .map(CandidateSummary::from_finding)
                .collect(),
            CandidatePopulation::MissingReports => self
                .reports
                .lock()
                .expect("records mutex poisoned")
                .iter()
                .filter(|report| report.status == ReportStatus::Active)
                .map(CandidateSummary::from_report)
                .collect(),
        };
        Ok(candidates)
    }

    fn candidate_attributes(
        &self,
        population: CandidatePopulation,
        id: &CandidateId,
    ) -> Result<CandidateAttributes, RepositoryError> {
        if self
            .unreadable
            .lock()
            .expect("records mutex poisoned")
            .contains(&id.0)
        {
            return Err(RepositoryError::Unavailable(
                "attribute rows unreadable".to_string(),
            ));
        }

        match population {
            CandidatePopulation::Findings => self
                .findings
                .lock()
                .expect("records mutex poisoned")
                .iter()
                .find(|finding| finding.id.0 == id.0)
                .map(|finding| CandidateAttributes {
                    traits: finding.traits.clone(),
                    clothing: finding.clothing.clone(),
                })
                .ok_or(RepositoryError::NotFound),
            CandidatePopulation::MissingReports => self
                .reports
                .lock()
                .expect("records mutex poisoned")
                .iter()
                .find(|report| report.id.0 == id.0)
                .map(|report| CandidateAttributes {
                    traits: report.traits.clone(),
                    clothing: report.clothing.clone(),
                })
                .ok_or(RepositoryError::NotFound),
        }
    }

    fn missing_report(&self, id: &ReportId) -> Result<Option<MissingReport>, RepositoryError> {
        Ok(self
            .reports
            .lock()
            .expect("records mutex poisoned")
            .iter()
            .find(|report| report.id == *id)
            .cloned())
    }

    fn finding(&self, id: &FindingId) -> Result<Option<Finding>, RepositoryError> {
        Ok(self
            .findings
            .lock()
            .expect("records mutex poisoned")
            .iter()
            .find(|finding| finding.id == *id)
            .cloned())
    }

    fn replace_report_traits(
        &self,
        id: &ReportId,
        traits: Vec<PhysicalTrait>,
    ) -> Result<(), RepositoryError> {
        let mut reports = self.reports.lock().expect("records mutex poisoned");
        let report = reports
            .iter_mut()
            .find(|report| report.id == *id)
            .ok_or(RepositoryError::NotFound)?;
        report.traits = traits;
        Ok(())
    }

    fn replace_report_clothing(
        &self,
        id: &ReportId,
        clothing: Vec<ClothingItem>,
    ) -> Result<(), RepositoryError> {
        let mut reports = self.reports.lock().expect("records mutex poisoned");
        let report = reports
            .iter_mut()
            .find(|report| report.id == *id)
            .ok_or(RepositoryError::NotFound)?;
        report.clothing = clothing;
        Ok(())
    }

    fn replace_finding_traits(
        &self,
        id: &FindingId,
        traits: Vec<PhysicalTrait>,
    ) -> Result<(), RepositoryError> {
        let mut findings = self.findings.lock().expect("records mutex poisoned");
        let finding = findings
            .iter_mut()
            .find(|finding| finding.id == *id)
            .ok_or(RepositoryError::NotFound)?;
        finding.traits = traits;
        Ok(())
    }

    fn replace_finding_clothing(
        &self,
        id: &FindingId,
        clothing: Vec<ClothingItem>,
    ) -> Result<(), RepositoryError> {
        let mut findings = self.findings.lock().expect("records mutex poisoned");
        let finding = findings
            .iter_mut()
            .find(|finding| finding.id == *id)
            .ok_or(RepositoryError::NotFound)?;
        finding.clothing = clothing;
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryAudit {
    rows: Arc<Mutex<Vec<PossibleMatch>>>,
    sequence: Arc<AtomicU64>,
    rejected_findings: Arc<Mutex<HashSet<String>>>,
}

impl MemoryAudit {
    pub(super) fn rows(&self) -> Vec<PossibleMatch> {
        self.rows.lock().expect("audit mutex poisoned").clone()
    }

    pub(super) fn reject_finding(&self, id: &str) {
        self.rejected_findings
            .lock()
            .expect("audit mutex poisoned")
            .insert(id.to_string());
    }
}

impl MatchAuditRepository for MemoryAudit {
    fn insert(&self, pairing: NewPossibleMatch) -> Result<PossibleMatch, RepositoryError> {
        if self
            .rejected_findings
            .lock()
            .expect("audit mutex poisoned")
            .contains(&pairing.finding_id.0)
        {
            return Err(RepositoryError::Unavailable(
                "audit store offline".to_string(),
            ));
        }

        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let row = PossibleMatch {
            id: MatchId(format!("match-{sequence:04}")),
            report_id: pairing.report_id,
            finding_id: pairing.finding_id,
            score: pairing.score,
            matched_criteria: pairing.matched_criteria,
            created_at: Utc::now(),
            review_status: ReviewStatus::Pending,
            admin_comment: None,
        };
        self.rows
            .lock()
            .expect("audit mutex poisoned")
            .push(row.clone());
        Ok(row)
    }

    fn fetch(&self, id: &MatchId) -> Result<Option<PossibleMatch>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .expect("audit mutex poisoned")
            .iter()
            .find(|row| row.id == *id)
            .cloned())
    }

    fn update_review(
        &self,
        id: &MatchId,
        status: ReviewStatus,
        comment: Option<String>,
    ) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().expect("audit mutex poisoned");
        let row = rows
            .iter_mut()
            .find(|row| row.id == *id)
            .ok_or(RepositoryError::NotFound)?;
        row.review_status = status;
        if comment.is_some() {
            row.admin_comment = comment;
        }
        Ok(())
    }

    fn list(&self, query: MatchQuery) -> Result<MatchPage, RepositoryError> {
        let rows = self.rows.lock().expect("audit mutex poisoned");
        let filtered: Vec<PossibleMatch> = rows
            .iter()
            .filter(|row| {
                query
                    .review_status
                    .map(|status| row.review_status == status)
                    .unwrap_or(true)
            })
            .cloned()
            .collect();

        let total = filtered.len();
        let start = (query.page.max(1) - 1) * query.per_page;
        let matches = filtered
            .into_iter()
            .skip(start)
            .take(query.per_page)
            .collect();

        Ok(MatchPage {
            matches,
            page: query.page,
            per_page: query.per_page,
            total,
        })
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    sent: Arc<Mutex<Vec<(UserId, String, String)>>>,
    failing: Arc<Mutex<HashSet<String>>>,
}

impl MemoryNotifier {
    pub(super) fn sent(&self) -> Vec<(UserId, String, String)> {
        self.sent.lock().expect("notifier mutex poisoned").clone()
    }

    pub(super) fn fail_for(&self, user: &str) {
        self.failing
            .lock()
            .expect("notifier mutex poisoned")
            .insert(user.to_string());
    }
}

impl NotificationGateway for MemoryNotifier {
    fn send(&self, recipient: &UserId, subject: &str, message: &str) -> Result<(), NotifyError> {
        if self
            .failing
            .lock()
            .expect("notifier mutex poisoned")
            .contains(&recipient.0)
        {
            return Err(NotifyError::Transport("gateway offline".to_string()));
        }
        self.sent.lock().expect("notifier mutex poisoned").push((
            recipient.clone(),
            subject.to_string(),
            message.to_string(),
        ));
        Ok(())
    }
}

pub(super) type TestService = MatchingService<MemoryRecords, MemoryAudit, MemoryNotifier>;

pub(super) fn build_service() -> (TestService, MemoryRecords, MemoryAudit, MemoryNotifier) {
    build_service_with_config(MatchingConfig::default())
}

pub(super) fn build_service_with_config(
    config: MatchingConfig,
) -> (TestService, MemoryRecords, MemoryAudit, MemoryNotifier) {
    let records = MemoryRecords::default();
    let audit = MemoryAudit::default();
    let notifier = MemoryNotifier::default();
    let service = MatchingService::new(
        Arc::new(records.clone()),
        Arc::new(audit.clone()),
        Arc::new(notifier.clone()),
        config,
    );
    (service, records, audit, notifier)
}
