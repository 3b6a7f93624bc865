use serde::{Deserialize, Serialize};
use std::fmt;

/// Tolerance applied when checking that a custom weight table sums to one.
const SUM_TOLERANCE: f64 = 1e-9;

/// Relative importance of each match factor. Shelters may supply their own table;
/// [`ScoringWeights::default`] carries the platform defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub application_completeness: f64,
    pub pre_approval_status: f64,
    pub suitability_match: f64,
    pub geographic_proximity: f64,
    pub time_of_like: f64,
    pub engagement_level: f64,
    pub shelter_priority: f64,
}

impl ScoringWeights {
    pub const DEFAULT: Self = Self {
        application_completeness: 0.25,
        pre_approval_status: 0.20,
        suitability_match: 0.20,
        geographic_proximity: 0.15,
        time_of_like: 0.05,
        engagement_level: 0.10,
        shelter_priority: 0.05,
    };

    /// Weights in factor order, matching [`super::ScoreBreakdown::values`].
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

    pub fn sum(&self) -> f64 {
        self.values().iter().sum()
    }

    pub fn validate(&self) -> Result<(), WeightsError> {
        if let Some(value) = self
            .values()
            .into_iter()
            .find(|value| !value.is_finite() || *value < 0.0)
        {
            return Err(WeightsError::InvalidWeight(value));
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(WeightsError::Unbalanced(sum));
        }

        Ok(())
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WeightsError {
    InvalidWeight(f64),
    Unbalanced(f64),
}

impl fmt::Display for WeightsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightsError::InvalidWeight(value) => {
                write!(f, "weight {value} must be a finite, non-negative number")
            }
            WeightsError::Unbalanced(sum) => write!(f, "weights sum to {sum}, expected 1.0"),
        }
    }
}

impl std::error::Error for WeightsError {}
