use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

use reunite::workflows::matching::{
    matching_router, CandidateRepository, MatchAuditRepository, MatchingService,
    NotificationGateway,
};

pub(crate) fn with_matching_routes<R, A, N>(
    service: Arc<MatchingService<R, A, N>>,
) -> axum::Router
where
    R: CandidateRepository + 'static,
    A: MatchAuditRepository + 'static,
    N: NotificationGateway + 'static,
{
    matching_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{
        seed_sample_records, InMemoryMatchLedger, InMemoryNotificationGateway, InMemoryRecordStore,
    };
    use reunite::workflows::matching::{MatchingConfig, ReportId};

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(payload) = healthcheck().await;
        assert_eq!(payload.get("status").and_then(|v| v.as_str()), Some("ok"));
    }

    #[tokio::test]
    async fn seeded_service_matches_the_demo_report() {
        let records = Arc::new(InMemoryRecordStore::default());
        seed_sample_records(&records);
        let service = MatchingService::new(
            records,
            Arc::new(InMemoryMatchLedger::default()),
            Arc::new(InMemoryNotificationGateway::default()),
            MatchingConfig::default(),
        );

        let run = service
            .run_for_report(&ReportId("report-cdmx-001".to_string()))
            .expect("run succeeds");

        assert_eq!(run.matches.len(), 2);
        assert_eq!(run.matches[0].candidate_id.0, "finding-hospital-014");
        assert_eq!(run.notified_owners, 1, "both matches share one owner");
    }
}
