use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use super::domain::{PetId, UserId};
use super::report::{CohortSummary, MatchScoreView};
use super::repository::{AlertPublisher, CandidacyRepository, RepositoryError};
use super::scoring::{rank_applicants_with, MatchRequest, MatchScore, TieBreak};
use super::service::{AdoptionMatchService, MatchServiceError};

/// Stateless scoring payload; `now` defaults to the server clock.
#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    #[serde(flatten)]
    pub request: MatchRequest,
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub scores: Vec<MatchScore>,
    #[serde(default)]
    pub tie_break: TieBreak,
}

#[derive(Debug, Serialize)]
pub struct RankResponse {
    pub candidates: Vec<MatchScore>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RankingQuery {
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct PetRankingResponse {
    pub pet_id: PetId,
    pub evaluated_at: DateTime<Utc>,
    pub summary: CohortSummary,
    pub candidates: Vec<MatchScoreView>,
}

/// Router builder exposing scoring, ranking, and shelter cohort endpoints.
pub fn match_router<R, A>(service: Arc<AdoptionMatchService<R, A>>) -> Router
where
    R: CandidacyRepository + 'static,
    A: AlertPublisher + 'static,
{
    Router::new()
        .route("/api/v1/matches/score", post(score_handler::<R, A>))
        .route("/api/v1/matches/rank", post(rank_handler))
        .route(
            "/api/v1/pets/:pet_id/candidates",
            post(register_handler::<R, A>),
        )
        .route(
            "/api/v1/pets/:pet_id/candidates/:user_id/reject",
            post(reject_handler::<R, A>),
        )
        .route(
            "/api/v1/pets/:pet_id/ranking",
            get(ranking_handler::<R, A>),
        )
        .with_state(service)
}

pub(crate) async fn score_handler<R, A>(
    State(service): State<Arc<AdoptionMatchService<R, A>>>,
    axum::Json(payload): axum::Json<ScoreRequest>,
) -> Response
where
    R: CandidacyRepository + 'static,
    A: AlertPublisher + 'static,
{
    let now = payload.now.unwrap_or_else(Utc::now);
    let score = service.scorer().score(&payload.request, now);
    (StatusCode::OK, axum::Json(score)).into_response()
}

pub(crate) async fn rank_handler(axum::Json(payload): axum::Json<RankRequest>) -> Response {
    let candidates = rank_applicants_with(&payload.scores, payload.tie_break);
    (StatusCode::OK, axum::Json(RankResponse { candidates })).into_response()
}

pub(crate) async fn register_handler<R, A>(
    State(service): State<Arc<AdoptionMatchService<R, A>>>,
    Path(pet_id): Path<String>,
    axum::Json(request): axum::Json<MatchRequest>,
) -> Response
where
    R: CandidacyRepository + 'static,
    A: AlertPublisher + 'static,
{
    match service.register(&PetId(pet_id), request, Utc::now()) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn reject_handler<R, A>(
    State(service): State<Arc<AdoptionMatchService<R, A>>>,
    Path((pet_id, user_id)): Path<(String, String)>,
) -> Response
where
    R: CandidacyRepository + 'static,
    A: AlertPublisher + 'static,
{
    match service.reject(&PetId(pet_id), &UserId(user_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn ranking_handler<R, A>(
    State(service): State<Arc<AdoptionMatchService<R, A>>>,
    Path(pet_id): Path<String>,
    Query(query): Query<RankingQuery>,
) -> Response
where
    R: CandidacyRepository + 'static,
    A: AlertPublisher + 'static,
{
    let now = query.now.unwrap_or_else(Utc::now);
    match service.rank(&PetId(pet_id), now) {
        Ok(ranking) => {
            let payload = PetRankingResponse {
                candidates: ranking.views(),
                pet_id: ranking.pet_id,
                evaluated_at: ranking.evaluated_at,
                summary: ranking.summary,
            };
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: MatchServiceError) -> Response {
    let status = match &error {
        MatchServiceError::PetMismatch { .. } | MatchServiceError::UserMismatch { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        MatchServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        MatchServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        MatchServiceError::Repository(RepositoryError::Unavailable(_))
        | MatchServiceError::Alert(_) => {
            warn!(%error, "match service failure");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
