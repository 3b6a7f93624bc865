use serde::{Deserialize, Serialize};

use super::{CandidateStatus, MatchScore};

/// Secondary ordering applied between applicants with equal totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// Equal totals keep the order they were supplied in.
    #[default]
    InputOrder,
    /// Equal totals favour the earlier application, then input order.
    EarliestApplication,
}

/// Rank a pet's applicant cohort by descending total, keeping input order on ties.
pub fn rank_applicants(scores: &[MatchScore]) -> Vec<MatchScore> {
    rank_applicants_with(scores, TieBreak::InputOrder)
}

pub fn rank_applicants_with(scores: &[MatchScore], tie_break: TieBreak) -> Vec<MatchScore> {
    let mut ordered: Vec<&MatchScore> = scores.iter().collect();
    // `sort_by` is stable, so unresolved ties stay in input order.
    ordered.sort_by(|a, b| {
        let by_total = rank_key(b.total_score).total_cmp(&rank_key(a.total_score));
        match tie_break {
            TieBreak::InputOrder => by_total,
            TieBreak::EarliestApplication => {
                by_total.then_with(|| a.applied_at.cmp(&b.applied_at))
            }
        }
    });

    ordered
        .into_iter()
        .enumerate()
        .map(|(index, score)| {
            let ranking = index + 1;
            MatchScore {
                ranking,
                status: CandidateStatus::for_rank(ranking),
                ..score.clone()
            }
        })
        .collect()
}

/// NaN totals sort below every real score.
fn rank_key(total_score: f64) -> f64 {
    if total_score.is_nan() {
        f64::NEG_INFINITY
    } else {
        total_score
    }
}
