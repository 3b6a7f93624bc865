use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::domain::{PetId, UserId};
use super::report::{CohortSummary, MatchScoreView};
use super::repository::{
    AlertError, AlertPublisher, CandidacyRecord, CandidacyRepository, RepositoryError,
    ShelterAlert,
};
use super::scoring::{
    rank_applicants_with, CandidateStatus, MatchRequest, MatchScore, MatchScorer, ScoringWeights,
    TieBreak,
};

/// Service composing the scorer, candidacy storage, and shelter alerts.
pub struct AdoptionMatchService<R, A> {
    repository: Arc<R>,
    alerts: Arc<A>,
    scorer: Arc<MatchScorer>,
    tie_break: TieBreak,
    sequence: AtomicU64,
}

/// Ranked cohort for one pet at a point in time.
#[derive(Debug, Clone, Serialize)]
pub struct PetRanking {
    pub pet_id: PetId,
    pub evaluated_at: DateTime<Utc>,
    pub summary: CohortSummary,
    pub candidates: Vec<MatchScore>,
}

impl PetRanking {
    pub fn views(&self) -> Vec<MatchScoreView> {
        self.candidates.iter().map(MatchScoreView::from).collect()
    }
}

impl<R, A> AdoptionMatchService<R, A>
where
    R: CandidacyRepository + 'static,
    A: AlertPublisher + 'static,
{
    pub fn new(repository: Arc<R>, alerts: Arc<A>, weights: ScoringWeights) -> Self {
        Self {
            repository,
            alerts,
            scorer: Arc::new(MatchScorer::new(weights)),
            tie_break: TieBreak::default(),
            sequence: AtomicU64::new(1),
        }
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn scorer(&self) -> &MatchScorer {
        &self.scorer
    }

    /// Record an adopter's interest in a pet so it joins the pet's cohort.
    pub fn register(
        &self,
        pet_id: &PetId,
        request: MatchRequest,
        now: DateTime<Utc>,
    ) -> Result<CandidacyRecord, MatchServiceError> {
        if &request.pet.id != pet_id {
            return Err(MatchServiceError::PetMismatch {
                expected: pet_id.clone(),
                found: request.pet.id,
            });
        }
        if &request.application.pet_id != pet_id {
            return Err(MatchServiceError::PetMismatch {
                expected: pet_id.clone(),
                found: request.application.pet_id,
            });
        }
        if request.application.user_id != request.user.id {
            return Err(MatchServiceError::UserMismatch {
                expected: request.user.id,
                found: request.application.user_id,
            });
        }

        let record = CandidacyRecord {
            sequence: self.sequence.fetch_add(1, Ordering::Relaxed),
            request,
            registered_at: now,
            rejected: false,
            last_status: None,
        };

        let stored = self.repository.insert(record)?;
        info!(pet = %stored.pet_id(), user = %stored.user_id(), "registered candidacy");
        Ok(stored)
    }

    /// Exclude an applicant from the ranked tiers of a pet's cohort.
    pub fn reject(
        &self,
        pet_id: &PetId,
        user_id: &UserId,
    ) -> Result<CandidacyRecord, MatchServiceError> {
        let mut record = self
            .repository
            .fetch(pet_id, user_id)?
            .ok_or(RepositoryError::NotFound)?;

        record.rejected = true;
        record.last_status = Some(CandidateStatus::Rejected);
        self.repository.update(record.clone())?;

        info!(pet = %pet_id, user = %user_id, "rejected candidacy");
        Ok(record)
    }

    pub fn get(
        &self,
        pet_id: &PetId,
        user_id: &UserId,
    ) -> Result<CandidacyRecord, MatchServiceError> {
        let record = self
            .repository
            .fetch(pet_id, user_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Score and rank every candidacy for a pet, alerting on new top candidates.
    pub fn rank(&self, pet_id: &PetId, now: DateTime<Utc>) -> Result<PetRanking, MatchServiceError> {
        let mut records = self.repository.for_pet(pet_id)?;
        records.sort_by_key(|record| record.sequence);

        let (rejected, active): (Vec<_>, Vec<_>) =
            records.into_iter().partition(|record| record.rejected);

        let scores: Vec<MatchScore> = active
            .iter()
            .map(|record| self.scorer.score(&record.request, now))
            .collect();
        let mut candidates = rank_applicants_with(&scores, self.tie_break);

        candidates.extend(rejected.iter().map(|record| MatchScore {
            ranking: 0,
            status: CandidateStatus::Rejected,
            ..self.scorer.score(&record.request, now)
        }));

        let mut by_user: HashMap<UserId, CandidacyRecord> = active
            .into_iter()
            .map(|record| (record.user_id().clone(), record))
            .collect();

        for score in candidates
            .iter()
            .filter(|score| score.status != CandidateStatus::Rejected)
        {
            let Some(mut record) = by_user.remove(&score.user_id) else {
                continue;
            };

            let promoted = score.status == CandidateStatus::TopCandidate
                && record.last_status != Some(CandidateStatus::TopCandidate);
            if promoted {
                self.alerts.publish(top_candidate_alert(score))?;
            }

            if record.last_status != Some(score.status) {
                debug!(pet = %pet_id, user = %score.user_id, status = score.status.label(), "candidate tier changed");
                record.last_status = Some(score.status);
                self.repository.update(record)?;
            }
        }

        let summary = CohortSummary::from_ranked(pet_id.clone(), &candidates);
        info!(
            pet = %pet_id,
            applicants = summary.applicants,
            top_candidates = summary.top_candidates,
            "ranked applicant cohort"
        );

        Ok(PetRanking {
            pet_id: pet_id.clone(),
            evaluated_at: now,
            summary,
            candidates,
        })
    }
}

fn top_candidate_alert(score: &MatchScore) -> ShelterAlert {
    let mut details = BTreeMap::new();
    details.insert("ranking".to_string(), score.ranking.to_string());
    details.insert("total_score".to_string(), format!("{:.2}", score.total_score));
    ShelterAlert {
        template: "top_candidate".to_string(),
        pet_id: score.pet_id.clone(),
        user_id: score.user_id.clone(),
        details,
    }
}

/// Error raised by the match service.
#[derive(Debug, thiserror::Error)]
pub enum MatchServiceError {
    #[error("candidacy is for pet {found}, expected {expected}")]
    PetMismatch { expected: PetId, found: PetId },
    #[error("application belongs to user {found}, expected {expected}")]
    UserMismatch { expected: UserId, found: UserId },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Alert(#[from] AlertError),
}
