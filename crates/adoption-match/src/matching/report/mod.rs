mod summary;
pub mod views;

pub use summary::CohortSummary;
pub use views::{BreakdownPercentages, MatchScoreView};
