use crate::infra::{
    garment, scar, seed_sample_records, InMemoryMatchLedger, InMemoryNotificationGateway,
    InMemoryRecordStore,
};
use clap::Args;
use reunite::error::AppError;
use reunite::workflows::matching::{
    FindingId, MatchQuery, MatchRun, MatchingConfig, MatchingError, MatchingService, ReportId,
    ReviewStatus,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the administrator review walkthrough at the end of the demo
    #[arg(long)]
    pub(crate) skip_review: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let records = Arc::new(InMemoryRecordStore::default());
    seed_sample_records(&records);
    let ledger = Arc::new(InMemoryMatchLedger::default());
    let notifications = Arc::new(InMemoryNotificationGateway::default());
    let service = MatchingService::new(
        records,
        ledger,
        notifications.clone(),
        MatchingConfig::default(),
    );

    println!("Missing-person matching demo");

    let report_id = ReportId("report-cdmx-001".to_string());
    let run = service.run_for_report(&report_id)?;
    render_run("Report → findings", &run);

    let finding_id = FindingId("finding-hospital-014".to_string());
    let run = service.run_for_finding(&finding_id)?;
    render_run("Finding → reports", &run);

    println!("\nEditing the report's attribute lists (replace-all) re-triggers matching:");
    let rerun = service.update_report_attributes(
        &report_id,
        vec![scar(3, "Nariz"), scar(4, "Oreja")],
        vec![
            garment(7, "Playera", Some("Rojo")),
            garment(12, "Chamarra", Some("Negro")),
        ],
    )?;
    render_run("Report → findings (after edit)", &rerun);

    println!("\nNotifications delivered:");
    for event in notifications.events() {
        println!("  -> {}: {}", event.recipient.0, event.subject);
        println!("     {}", event.message);
    }

    if !args.skip_review {
        let pending = service.matches(MatchQuery {
            review_status: Some(ReviewStatus::Pending),
            ..MatchQuery::default()
        })?;
        println!("\nReview queue: {} pending row(s)", pending.total);

        if let Some(first) = pending.matches.first() {
            let reviewed = service.review_match(
                &first.id,
                "resolved",
                Some("Verified against hospital intake records".to_string()),
            )?;
            println!(
                "  {} (report {} / finding {}) -> {}",
                reviewed.id.0, reviewed.report_id.0, reviewed.finding_id.0, reviewed.review_status,
            );

            match service.review_match(&first.id, "dismissed", None) {
                Err(err @ MatchingError::Review(_)) => {
                    println!("  second disposition rejected: {err}");
                }
                other => println!("  unexpected outcome: {other:?}"),
            }
        }
    }

    Ok(())
}

fn render_run(title: &str, run: &MatchRun) {
    println!("\n{title} — source {}", run.source_id.0);
    if run.degraded {
        println!("  (degraded run: candidate snapshot unavailable)");
    }
    if run.matches.is_empty() {
        println!("  no candidates above the score floor");
    }
    for (position, entry) in run.matches.iter().enumerate() {
        println!(
            "  #{:<2} {}  score {}",
            position + 1,
            entry.candidate_id.0,
            entry.score,
        );
        for criterion in &entry.matched_criteria {
            println!("       - {criterion}");
        }
    }
    println!(
        "  audited {} row(s), notified {} owner(s)",
        run.audited.len(),
        run.notified_owners,
    );
}
