mod ranking;
mod rules;
mod weights;

pub use ranking::{rank_applicants, rank_applicants_with, TieBreak};
pub use weights::{ScoringWeights, WeightsError};

use super::domain::{Application, Pet, PetId, UserId, UserProfile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Review tier assigned to an applicant once the cohort has been ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CandidateStatus {
    #[default]
    Pending,
    TopCandidate,
    Waitlist,
    Rejected,
}

impl CandidateStatus {
    pub const TOP_CANDIDATE_LIMIT: usize = 3;
    pub const WAITLIST_LIMIT: usize = 10;

    /// Tier for a 1-based rank: 1-3 top candidates, 4-10 waitlist, the rest pending.
    pub const fn for_rank(rank: usize) -> Self {
        if rank <= Self::TOP_CANDIDATE_LIMIT {
            Self::TopCandidate
        } else if rank <= Self::WAITLIST_LIMIT {
            Self::Waitlist
        } else {
            Self::Pending
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::TopCandidate => "Top Candidate",
            Self::Waitlist => "Waitlist",
            Self::Rejected => "Rejected",
        }
    }
}

/// Per-factor sub-scores behind a [`MatchScore`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub application_completeness: f64,
    pub pre_approval_status: f64,
    pub suitability_match: f64,
    pub geographic_proximity: f64,
    pub time_of_like: f64,
    pub engagement_level: f64,
    pub shelter_priority: f64,
}

impl ScoreBreakdown {
    /// Sub-scores in factor order, matching [`ScoringWeights::values`].
    pub const fn values(&self) -> [f64; 7] {
        [
            self.application_completeness,
            self.pre_approval_status,
            self.suitability_match,
            self.geographic_proximity,
            self.time_of_like,
            self.engagement_level,
            self.shelter_priority,
        ]
    }

    pub fn weighted_total(&self, weights: &ScoringWeights) -> f64 {
        self.values()
            .into_iter()
            .zip(weights.values())
            .fold(0.0, |total, (score, weight)| total + score * weight)
    }
}

/// Composite score for one adopter against one pet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    pub user_id: UserId,
    pub pet_id: PetId,
    pub total_score: f64,
    pub breakdown: ScoreBreakdown,
    /// 1-based position within the pet's cohort, 0 until ranked.
    #[serde(default)]
    pub ranking: usize,
    #[serde(default)]
    pub status: CandidateStatus,
    pub applied_at: DateTime<Utc>,
}

/// Everything needed to score one adopter's interest in one pet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRequest {
    pub user: UserProfile,
    pub pet: Pet,
    pub application: Application,
    pub liked_at: DateTime<Utc>,
    /// Shelter-supplied boost, expected in [0, 1] but passed through unclamped.
    #[serde(default)]
    pub shelter_priority_boost: f64,
}

/// Stateless scorer applying a weight table to match requests.
#[derive(Debug, Clone, Default)]
pub struct MatchScorer {
    weights: ScoringWeights,
}

impl MatchScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn score(&self, request: &MatchRequest, now: DateTime<Utc>) -> MatchScore {
        self.score_parts(
            &request.user,
            &request.pet,
            &request.application,
            request.liked_at,
            request.shelter_priority_boost,
            now,
        )
    }

    pub fn score_parts(
        &self,
        user: &UserProfile,
        pet: &Pet,
        application: &Application,
        liked_at: DateTime<Utc>,
        shelter_priority_boost: f64,
        now: DateTime<Utc>,
    ) -> MatchScore {
        let breakdown = ScoreBreakdown {
            application_completeness: rules::application_score(application),
            pre_approval_status: rules::pre_approval_score(user),
            suitability_match: rules::suitability_score(user, pet),
            geographic_proximity: rules::proximity_score(user, pet),
            time_of_like: rules::time_score(liked_at, now),
            engagement_level: rules::engagement_score(user),
            shelter_priority: shelter_priority_boost,
        };

        let total_score = rules::round_to_hundredths(breakdown.weighted_total(&self.weights));
        debug!(user = %user.id, pet = %pet.id, total_score, "scored match");

        MatchScore {
            user_id: user.id.clone(),
            pet_id: pet.id.clone(),
            total_score,
            breakdown,
            ranking: 0,
            status: CandidateStatus::Pending,
            applied_at: application.submitted_at.unwrap_or(now),
        }
    }
}

/// Score one adopter against one pet with the default weight table.
pub fn compute_match_score(
    user: &UserProfile,
    pet: &Pet,
    application: &Application,
    liked_at: DateTime<Utc>,
    shelter_priority_boost: f64,
    now: DateTime<Utc>,
) -> MatchScore {
    MatchScorer::default().score_parts(
        user,
        pet,
        application,
        liked_at,
        shelter_priority_boost,
        now,
    )
}
