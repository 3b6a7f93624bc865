use crate::infra::AppState;
use adoption_match::error::AppError;
use adoption_match::matching::{
    match_router, rank_applicants_with, AdoptionMatchService, AlertPublisher,
    CandidacyRepository, CohortSummary, MatchScoreView, MatchScorer, Pet, RosterImporter,
    TieBreak,
};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// One-shot ranking of an inline CSV roster against a pet listing.
#[derive(Debug, Deserialize)]
pub(crate) struct RosterRankRequest {
    pub(crate) pet: Pet,
    pub(crate) roster_csv: String,
    #[serde(default)]
    pub(crate) now: Option<DateTime<Utc>>,
    #[serde(default)]
    pub(crate) tie_break: TieBreak,
}

#[derive(Debug, Serialize)]
pub(crate) struct RosterRankResponse {
    pub(crate) evaluated_at: DateTime<Utc>,
    pub(crate) summary: CohortSummary,
    pub(crate) candidates: Vec<MatchScoreView>,
}

pub(crate) fn with_match_routes<R, A>(service: Arc<AdoptionMatchService<R, A>>) -> axum::Router
where
    R: CandidacyRepository + 'static,
    A: AlertPublisher + 'static,
{
    let scorer = Arc::new(service.scorer().clone());
    match_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/roster/rank",
            axum::routing::post(roster_rank_endpoint),
        )
        .layer(Extension(scorer))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
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

pub(crate) async fn roster_rank_endpoint(
    Extension(scorer): Extension<Arc<MatchScorer>>,
    Json(payload): Json<RosterRankRequest>,
) -> Result<Json<RosterRankResponse>, AppError> {
    let RosterRankRequest {
        pet,
        roster_csv,
        now,
        tie_break,
    } = payload;

    let now = now.unwrap_or_else(Utc::now);
    let requests = RosterImporter::from_reader(Cursor::new(roster_csv.into_bytes()), &pet)?;
    let scores: Vec<_> = requests
        .iter()
        .map(|request| scorer.score(request, now))
        .collect();
    let ranked = rank_applicants_with(&scores, tie_break);

    Ok(Json(RosterRankResponse {
        evaluated_at: now,
        summary: CohortSummary::from_ranked(pet.id.clone(), &ranked),
        candidates: ranked.iter().map(MatchScoreView::from).collect(),
    }))
}
