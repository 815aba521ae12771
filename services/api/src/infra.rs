use chrono::{NaiveDate, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

use reunite::workflows::matching::{
    CandidateAttributes, CandidateId, CandidatePopulation, CandidateRepository, CandidateSummary,
    CatalogEntry, ClothingItem, Finding, FindingId, FindingStatus, Location, MatchAuditRepository,
    MatchId, MatchPage, MatchQuery, MissingReport, NewPossibleMatch, NotificationGateway,
    NotifyError, PaymentStatus, PersonName, PhysicalTrait, PossibleMatch, ReportId, ReportStatus,
    RepositoryError, ReviewStatus, UserId,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// In-memory stand-in for the record lifecycle collaborator's persistence.
#[derive(Default, Clone)]
pub(crate) struct InMemoryRecordStore {
    reports: Arc<Mutex<Vec<MissingReport>>>,
    findings: Arc<Mutex<Vec<Finding>>>,
}

impl InMemoryRecordStore {
    pub(crate) fn add_report(&self, report: MissingReport) {
        self.reports
            .lock()
            .expect("record store mutex poisoned")
            .push(report);
    }

    pub(crate) fn add_finding(&self, finding: Finding) {
        self.findings
            .lock()
            .expect("record store mutex poisoned")
            .push(finding);
    }
}

impl CandidateRepository for InMemoryRecordStore {
    fn active_candidates(
        &self,
        population: CandidatePopulation,
    ) -> Result<Vec<CandidateSummary>, RepositoryError> {
        let candidates = match population {
            CandidatePopulation::Findings => self
                .findings
                .lock()
                .expect("record store mutex poisoned")
                .iter()
                .filter(|finding| finding.status == FindingStatus::Active)
                .map(CandidateSummary::from_finding)
                .collect(),
            CandidatePopulation::MissingReports => self
                .reports
                .lock()
                .expect("record store mutex poisoned")
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
        match population {
            CandidatePopulation::Findings => self
                .findings
                .lock()
                .expect("record store mutex poisoned")
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
                .expect("record store mutex poisoned")
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
            .expect("record store mutex poisoned")
            .iter()
            .find(|report| report.id == *id)
            .cloned())
    }

    fn finding(&self, id: &FindingId) -> Result<Option<Finding>, RepositoryError> {
        Ok(self
            .findings
            .lock()
            .expect("record store mutex poisoned")
            .iter()
            .find(|finding| finding.id == *id)
            .cloned())
    }

    fn replace_report_traits(
        &self,
        id: &ReportId,
        traits: Vec<PhysicalTrait>,
    ) -> Result<(), RepositoryError> {
        let mut reports = self.reports.lock().expect("record store mutex poisoned");
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
        let mut reports = self.reports.lock().expect("record store mutex poisoned");
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
        let mut findings = self.findings.lock().expect("record store mutex poisoned");
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
        let mut findings = self.findings.lock().expect("record store mutex poisoned");
        let finding = findings
            .iter_mut()
            .find(|finding| finding.id == *id)
            .ok_or(RepositoryError::NotFound)?;
        finding.clothing = clothing;
        Ok(())
    }
}

/// In-memory audit trail for possible matches.
#[derive(Default, Clone)]
pub(crate) struct InMemoryMatchLedger {
    rows: Arc<Mutex<Vec<PossibleMatch>>>,
    sequence: Arc<AtomicU64>,
}

impl MatchAuditRepository for InMemoryMatchLedger {
    fn insert(&self, pairing: NewPossibleMatch) -> Result<PossibleMatch, RepositoryError> {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let row = PossibleMatch {
            id: MatchId(format!("match-{sequence:06}")),
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
            .expect("ledger mutex poisoned")
            .push(row.clone());
        Ok(row)
    }

    fn fetch(&self, id: &MatchId) -> Result<Option<PossibleMatch>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .expect("ledger mutex poisoned")
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
        let mut rows = self.rows.lock().expect("ledger mutex poisoned");
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
        let rows = self.rows.lock().expect("ledger mutex poisoned");
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

#[derive(Debug, Clone)]
pub(crate) struct SentNotification {
    pub(crate) recipient: UserId,
    pub(crate) subject: String,
    pub(crate) message: String,
}

/// Notification gateway that records deliveries and logs them, standing in
/// for the messaging collaborator.
#[derive(Default, Clone)]
pub(crate) struct InMemoryNotificationGateway {
    sent: Arc<Mutex<Vec<SentNotification>>>,
}

impl InMemoryNotificationGateway {
    pub(crate) fn events(&self) -> Vec<SentNotification> {
        self.sent.lock().expect("gateway mutex poisoned").clone()
    }
}

impl NotificationGateway for InMemoryNotificationGateway {
    fn send(&self, recipient: &UserId, subject: &str, message: &str) -> Result<(), NotifyError> {
        info!(recipient = %recipient.0, subject, "delivering notification");
        self.sent
            .lock()
            .expect("gateway mutex poisoned")
            .push(SentNotification {
                recipient: recipient.clone(),
                subject: subject.to_string(),
                message: message.to_string(),
            });
        Ok(())
    }
}

pub(crate) fn catalog(id: u32, name: &str) -> CatalogEntry {
    CatalogEntry {
        id,
        name: name.to_string(),
    }
}

pub(crate) fn scar(body_part_id: u32, body_part: &str) -> PhysicalTrait {
    PhysicalTrait {
        body_part: catalog(body_part_id, body_part),
        trait_type: "Cicatriz".to_string(),
        description: "Cicatriz visible de 2 cm".to_string(),
    }
}

pub(crate) fn garment(garment_id: u32, name: &str, color: Option<&str>) -> ClothingItem {
    ClothingItem {
        garment: catalog(garment_id, name),
        color: color.map(str::to_string),
        brand: None,
        special_feature: None,
    }
}

fn cdmx_centro() -> Location {
    Location {
        state: "Ciudad de México".to_string(),
        municipality: "Cuauhtémoc".to_string(),
        locality: "Centro".to_string(),
        street: Some("Eje Central 12".to_string()),
        reference_notes: Some("Frente al mercado".to_string()),
        postal_code: Some("06000".to_string()),
        latitude: Some(19.4326),
        longitude: Some(-99.1332),
    }
}

/// Seed dataset used by `demo` and `serve --seed-demo`: one report in CDMX
/// plus three findings with decreasing overlap.
pub(crate) fn seed_sample_records(store: &InMemoryRecordStore) {
    store.add_report(MissingReport {
        id: ReportId("report-cdmx-001".to_string()),
        submitter: UserId("family-01".to_string()),
        name: PersonName {
            given_name: "Laura".to_string(),
            middle_name: Some("Elena".to_string()),
            paternal_surname: "Mendoza".to_string(),
            maternal_surname: Some("Rivas".to_string()),
        },
        disappearance_date: NaiveDate::from_ymd_opt(2025, 5, 20).expect("valid date"),
        place_type: catalog(2, "Parque"),
        status: ReportStatus::Active,
        payment_status: PaymentStatus::Paid,
        location: cdmx_centro(),
        traits: vec![scar(3, "Nariz")],
        clothing: vec![garment(7, "Playera", Some("Rojo"))],
    });

    store.add_finding(Finding {
        id: FindingId("finding-hospital-014".to_string()),
        reporter: UserId("seeker-22".to_string()),
        name: PersonName {
            given_name: "Persona".to_string(),
            middle_name: None,
            paternal_surname: "Localizada".to_string(),
            maternal_surname: None,
        },
        found_date: NaiveDate::from_ymd_opt(2025, 6, 2).expect("valid date"),
        place_type: catalog(5, "Hospital"),
        status: FindingStatus::Active,
        location: Location {
            locality: "Doctores".to_string(),
            street: None,
            reference_notes: None,
            postal_code: Some("06720".to_string()),
            latitude: Some(19.43),
            longitude: Some(-99.13),
            ..cdmx_centro()
        },
        traits: vec![scar(3, "Nariz")],
        clothing: vec![garment(7, "Playera", Some("rojo"))],
    });

    store.add_finding(Finding {
        id: FindingId("finding-plaza-007".to_string()),
        reporter: UserId("seeker-22".to_string()),
        name: PersonName {
            given_name: "Persona".to_string(),
            middle_name: None,
            paternal_surname: "Sin Identificar".to_string(),
            maternal_surname: None,
        },
        found_date: NaiveDate::from_ymd_opt(2025, 6, 10).expect("valid date"),
        place_type: catalog(8, "Plaza"),
        status: FindingStatus::Active,
        location: Location {
            state: "Ciudad de México".to_string(),
            municipality: "Iztapalapa".to_string(),
            locality: "Centro".to_string(),
            street: None,
            reference_notes: None,
            postal_code: None,
            latitude: None,
            longitude: None,
        },
        traits: Vec::new(),
        clothing: vec![garment(7, "Playera", None)],
    });

    store.add_finding(Finding {
        id: FindingId("finding-norte-021".to_string()),
        reporter: UserId("seeker-31".to_string()),
        name: PersonName {
            given_name: "Persona".to_string(),
            middle_name: None,
            paternal_surname: "Sin Identificar".to_string(),
            maternal_surname: None,
        },
        found_date: NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date"),
        place_type: catalog(9, "Carretera"),
        status: FindingStatus::Active,
        location: Location {
            state: "Jalisco".to_string(),
            municipality: "Guadalajara".to_string(),
            locality: "Centro".to_string(),
            street: None,
            reference_notes: None,
            postal_code: Some("44100".to_string()),
            latitude: Some(20.6597),
            longitude: Some(-103.3496),
        },
        traits: Vec::new(),
        clothing: Vec::new(),
    });
}
