use super::super::domain::PetId;
use super::super::scoring::{CandidateStatus, MatchScore};
use serde::Serialize;

/// Shelter dashboard roll-up for one pet's applicant cohort.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortSummary {
    pub pet_id: PetId,
    pub applicants: usize,
    pub top_candidates: usize,
    pub waitlisted: usize,
    pub pending: usize,
    pub rejected: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_score: Option<f64>,
}

impl CohortSummary {
    pub fn from_ranked(pet_id: PetId, scores: &[MatchScore]) -> Self {
        let count = |status: CandidateStatus| {
            scores
                .iter()
                .filter(|score| score.status == status)
                .count()
        };

        // Rejected applicants stay visible in the counts but not in the score statistics.
        let active: Vec<f64> = scores
            .iter()
            .filter(|score| score.status != CandidateStatus::Rejected)
            .map(|score| score.total_score)
            .filter(|total| !total.is_nan())
            .collect();

        let average_score = if active.is_empty() {
            None
        } else {
            let mean = active.iter().sum::<f64>() / active.len() as f64;
            Some((mean * 100.0).round() / 100.0)
        };
        let best_score = active.iter().copied().reduce(f64::max);

        Self {
            pet_id,
            applicants: scores.len(),
            top_candidates: count(CandidateStatus::TopCandidate),
            waitlisted: count(CandidateStatus::Waitlist),
            pending: count(CandidateStatus::Pending),
            rejected: count(CandidateStatus::Rejected),
            average_score,
            best_score,
        }
    }
}
