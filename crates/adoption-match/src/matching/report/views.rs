use super::super::domain::{PetId, UserId};
use super::super::scoring::{CandidateStatus, MatchScore, ScoreBreakdown};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Breakdown factors as whole percentages for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BreakdownPercentages {
    pub application_completeness: i64,
    pub pre_approval_status: i64,
    pub suitability_match: i64,
    pub geographic_proximity: i64,
    pub time_of_like: i64,
    pub engagement_level: i64,
    pub shelter_priority: i64,
}

impl From<&ScoreBreakdown> for BreakdownPercentages {
    fn from(breakdown: &ScoreBreakdown) -> Self {
        let pct = |value: f64| (value * 100.0).round() as i64;
        Self {
            application_completeness: pct(breakdown.application_completeness),
            pre_approval_status: pct(breakdown.pre_approval_status),
            suitability_match: pct(breakdown.suitability_match),
            geographic_proximity: pct(breakdown.geographic_proximity),
            time_of_like: pct(breakdown.time_of_like),
            engagement_level: pct(breakdown.engagement_level),
            shelter_priority: pct(breakdown.shelter_priority),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchScoreView {
    pub user_id: UserId,
    pub pet_id: PetId,
    pub ranking: usize,
    pub status: CandidateStatus,
    pub status_label: &'static str,
    pub total_score: f64,
    pub breakdown: BreakdownPercentages,
    pub applied_at: DateTime<Utc>,
}

impl From<&MatchScore> for MatchScoreView {
    fn from(score: &MatchScore) -> Self {
        Self {
            user_id: score.user_id.clone(),
            pet_id: score.pet_id.clone(),
            ranking: score.ranking,
            status: score.status,
            status_label: score.status.label(),
            total_score: score.total_score,
            breakdown: BreakdownPercentages::from(&score.breakdown),
            applied_at: score.applied_at,
        }
    }
}
