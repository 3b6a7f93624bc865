//! Applicant-to-pet match scoring, cohort ranking, and the shelter-facing
//! service built on top of them.

pub mod domain;
pub mod report;
pub mod repository;
pub mod roster;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AdopterPreferences, Application, ApplicationId, ApplicationStatus, BackgroundCheckStatus,
    Coordinates, EnergyLevel, Experience, HomeCheckStatus, Pet, PetId, UserId, UserProfile,
    YardSpace,
};
pub use report::{CohortSummary, MatchScoreView};
pub use repository::{
    AlertError, AlertPublisher, CandidacyRecord, CandidacyRepository, CandidacyView,
    RepositoryError, ShelterAlert,
};
pub use roster::{parse_timestamp, RosterImportError, RosterImporter};
pub use router::match_router;
pub use scoring::{
    compute_match_score, rank_applicants, rank_applicants_with, CandidateStatus, MatchRequest,
    MatchScore, MatchScorer, ScoreBreakdown, ScoringWeights, TieBreak, WeightsError,
};
pub use service::{AdoptionMatchService, MatchServiceError, PetRanking};
