use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ClothingItem, FindingId, MatchId, PhysicalTrait, ReportId};
use super::repository::{
    CandidateRepository, MatchAuditRepository, MatchQuery, NotificationGateway, RepositoryError,
};
use super::review::{ReviewError, ReviewStatus};
use super::service::{MatchingError, MatchingService};

/// Router builder exposing the engine's collaborator touchpoints: matching
/// triggers, replace-all attribute updates, and the admin review surface.
pub fn matching_router<R, A, N>(service: Arc<MatchingService<R, A, N>>) -> Router
where
    R: CandidateRepository + 'static,
    A: MatchAuditRepository + 'static,
    N: NotificationGateway + 'static,
{
    Router::new()
        .route(
            "/api/v1/reports/:report_id/matches",
            post(report_matches_handler::<R, A, N>),
        )
        .route(
            "/api/v1/findings/:finding_id/matches",
            post(finding_matches_handler::<R, A, N>),
        )
        .route(
            "/api/v1/reports/:report_id/attributes",
            put(report_attributes_handler::<R, A, N>),
        )
        .route(
            "/api/v1/findings/:finding_id/attributes",
            put(finding_attributes_handler::<R, A, N>),
        )
        .route("/api/v1/matches", get(list_matches_handler::<R, A, N>))
        .route(
            "/api/v1/matches/:match_id/review",
            post(review_handler::<R, A, N>),
        )
        .with_state(service)
}

/// Replace-all payload for trait/clothing updates.
#[derive(Debug, Deserialize)]
pub struct AttributeReplacement {
    #[serde(default)]
    pub traits: Vec<PhysicalTrait>,
    #[serde(default)]
    pub clothing: Vec<ClothingItem>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub action: String,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MatchListParams {
    #[serde(default)]
    pub review_status: Option<String>,
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub per_page: Option<usize>,
}

pub(crate) async fn report_matches_handler<R, A, N>(
    State(service): State<Arc<MatchingService<R, A, N>>>,
    Path(report_id): Path<String>,
) -> Response
where
    R: CandidateRepository + 'static,
    A: MatchAuditRepository + 'static,
    N: NotificationGateway + 'static,
{
    match service.run_for_report(&ReportId(report_id)) {
        Ok(run) => (StatusCode::OK, axum::Json(run)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn finding_matches_handler<R, A, N>(
    State(service): State<Arc<MatchingService<R, A, N>>>,
    Path(finding_id): Path<String>,
) -> Response
where
    R: CandidateRepository + 'static,
    A: MatchAuditRepository + 'static,
    N: NotificationGateway + 'static,
{
    match service.run_for_finding(&FindingId(finding_id)) {
        Ok(run) => (StatusCode::OK, axum::Json(run)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn report_attributes_handler<R, A, N>(
    State(service): State<Arc<MatchingService<R, A, N>>>,
    Path(report_id): Path<String>,
    axum::Json(replacement): axum::Json<AttributeReplacement>,
) -> Response
where
    R: CandidateRepository + 'static,
    A: MatchAuditRepository + 'static,
    N: NotificationGateway + 'static,
{
    match service.update_report_attributes(
        &ReportId(report_id),
        replacement.traits,
        replacement.clothing,
    ) {
        Ok(run) => (StatusCode::OK, axum::Json(run)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn finding_attributes_handler<R, A, N>(
    State(service): State<Arc<MatchingService<R, A, N>>>,
    Path(finding_id): Path<String>,
    axum::Json(replacement): axum::Json<AttributeReplacement>,
) -> Response
where
    R: CandidateRepository + 'static,
    A: MatchAuditRepository + 'static,
    N: NotificationGateway + 'static,
{
    match service.update_finding_attributes(
        &FindingId(finding_id),
        replacement.traits,
        replacement.clothing,
    ) {
        Ok(run) => (StatusCode::OK, axum::Json(run)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_matches_handler<R, A, N>(
    State(service): State<Arc<MatchingService<R, A, N>>>,
    Query(params): Query<MatchListParams>,
) -> Response
where
    R: CandidateRepository + 'static,
    A: MatchAuditRepository + 'static,
    N: NotificationGateway + 'static,
{
    let review_status = match params.review_status.as_deref() {
        None => None,
        Some(raw) => match ReviewStatus::from_label(raw) {
            Some(status) => Some(status),
            None => {
                let payload = json!({
                    "error": format!("'{raw}' is not a valid review status"),
                });
                return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
            }
        },
    };

    let defaults = MatchQuery::default();
    let query = MatchQuery {
        review_status,
        page: params.page.unwrap_or(defaults.page).max(1),
        per_page: params.per_page.unwrap_or(defaults.per_page).max(1),
    };

    match service.matches(query) {
        Ok(page) => (StatusCode::OK, axum::Json(page)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn review_handler<R, A, N>(
    State(service): State<Arc<MatchingService<R, A, N>>>,
    Path(match_id): Path<String>,
    axum::Json(request): axum::Json<ReviewRequest>,
) -> Response
where
    R: CandidateRepository + 'static,
    A: MatchAuditRepository + 'static,
    N: NotificationGateway + 'static,
{
    match service.review_match(&MatchId(match_id), &request.action, request.comment) {
        Ok(reviewed) => (StatusCode::OK, axum::Json(reviewed)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: MatchingError) -> Response {
    let status = match &error {
        MatchingError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        MatchingError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        MatchingError::InvalidSource(_) | MatchingError::Review(ReviewError::UnknownAction(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        MatchingError::Review(ReviewError::AlreadyReviewed { .. }) => StatusCode::CONFLICT,
        MatchingError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
