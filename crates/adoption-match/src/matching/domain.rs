use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier wrapper for prospective adopters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Identifier wrapper for adoptable pet listings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PetId(pub String);

/// Identifier wrapper for adoption applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for PetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Geographic position captured during onboarding. Not consumed by proximity scoring yet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Outcome of the external background check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundCheckStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// Progress of the shelter home visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HomeCheckStatus {
    #[default]
    Pending,
    Scheduled,
    Completed,
    Failed,
}

/// Outdoor space, used both for what an adopter has and what a pet needs.
///
/// Values arrive from free-typed form data, so anything outside the known
/// tiers is kept verbatim in [`YardSpace::Other`] and never matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum YardSpace {
    None,
    Small,
    Medium,
    Large,
    Other(String),
}

impl YardSpace {
    pub const fn ordered() -> [Self; 4] {
        [Self::None, Self::Small, Self::Medium, Self::Large]
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::None => "none",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Other(raw) => raw,
        }
    }

    /// Position in the nesting order; unknown values have no tier.
    pub(crate) const fn tier(&self) -> Option<u8> {
        match self {
            Self::None => Some(0),
            Self::Small => Some(1),
            Self::Medium => Some(2),
            Self::Large => Some(3),
            Self::Other(_) => None,
        }
    }

    /// Whether an adopter with this much space can house a pet requiring `requirement`.
    pub fn accommodates(&self, requirement: &YardSpace) -> bool {
        match (self.tier(), requirement.tier()) {
            (Some(available), Some(required)) => required <= available,
            _ => false,
        }
    }
}

impl From<&str> for YardSpace {
    fn from(value: &str) -> Self {
        match value {
            "none" => Self::None,
            "small" => Self::Small,
            "medium" => Self::Medium,
            "large" => Self::Large,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for YardSpace {
    fn from(value: String) -> Self {
        match Self::from(value.as_str()) {
            Self::Other(_) => Self::Other(value),
            known => known,
        }
    }
}

impl From<YardSpace> for String {
    fn from(value: YardSpace) -> Self {
        match value {
            YardSpace::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

const FIRST_TIME_ENERGY: &[EnergyLevel] = &[EnergyLevel::Low, EnergyLevel::Medium];
const SOME_ENERGY: &[EnergyLevel] = &[EnergyLevel::Low, EnergyLevel::Medium, EnergyLevel::High];
const EXPERIENCED_ENERGY: &[EnergyLevel] =
    &[EnergyLevel::Medium, EnergyLevel::High, EnergyLevel::VeryHigh];
const PROFESSIONAL_ENERGY: &[EnergyLevel] = &[EnergyLevel::High, EnergyLevel::VeryHigh];

/// Self-reported pet ownership experience.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Experience {
    FirstTime,
    Some,
    Experienced,
    Professional,
    Other(String),
}

impl Experience {
    pub fn as_str(&self) -> &str {
        match self {
            Self::FirstTime => "first-time",
            Self::Some => "some",
            Self::Experienced => "experienced",
            Self::Professional => "professional",
            Self::Other(raw) => raw,
        }
    }

    /// Energy levels an adopter with this experience is expected to handle.
    pub fn compatible_energy(&self) -> &'static [EnergyLevel] {
        match self {
            Self::FirstTime => FIRST_TIME_ENERGY,
            Self::Some => SOME_ENERGY,
            Self::Experienced => EXPERIENCED_ENERGY,
            Self::Professional => PROFESSIONAL_ENERGY,
            Self::Other(_) => &[],
        }
    }

    pub fn handles(&self, energy: &EnergyLevel) -> bool {
        self.compatible_energy().contains(energy)
    }
}

impl From<&str> for Experience {
    fn from(value: &str) -> Self {
        match value {
            "first-time" => Self::FirstTime,
            "some" => Self::Some,
            "experienced" => Self::Experienced,
            "professional" => Self::Professional,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for Experience {
    fn from(value: String) -> Self {
        match Self::from(value.as_str()) {
            Self::Other(_) => Self::Other(value),
            known => known,
        }
    }
}

impl From<Experience> for String {
    fn from(value: Experience) -> Self {
        match value {
            Experience::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// Activity level advertised on a pet listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EnergyLevel {
    Low,
    Medium,
    High,
    VeryHigh,
    Other(String),
}

impl EnergyLevel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::VeryHigh => "Very High",
            Self::Other(raw) => raw,
        }
    }
}

impl From<&str> for EnergyLevel {
    fn from(value: &str) -> Self {
        match value {
            "Low" => Self::Low,
            "Medium" => Self::Medium,
            "High" => Self::High,
            "Very High" => Self::VeryHigh,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for EnergyLevel {
    fn from(value: String) -> Self {
        match Self::from(value.as_str()) {
            Self::Other(_) => Self::Other(value),
            known => known,
        }
    }
}

impl From<EnergyLevel> for String {
    fn from(value: EnergyLevel) -> Self {
        match value {
            EnergyLevel::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// Living situation and experience declared during onboarding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdopterPreferences {
    pub yard_space: YardSpace,
    pub experience: Experience,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifestyle: Option<String>,
}

/// Prospective adopter as resolved by onboarding and external verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// Free text in the form "City, State".
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub is_pre_approved: bool,
    #[serde(default)]
    pub background_check_status: BackgroundCheckStatus,
    #[serde(default)]
    pub home_check_status: HomeCheckStatus,
    /// Platform activity, normalized by the caller to [0, 1].
    #[serde(default)]
    pub engagement_score: f64,
    pub preferences: AdopterPreferences,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub adoption_history: Vec<PetId>,
}

/// Adoptable animal listing entered by a shelter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub id: PetId,
    pub name: String,
    pub breed: String,
    pub age: String,
    pub size: String,
    pub energy: EnergyLevel,
    pub yard_requirement: YardSpace,
    /// Free text in the form "City, State".
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shelter: Option<String>,
}

/// Lifecycle of an adoption application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplicationStatus {
    #[default]
    Draft,
    Submitted,
    UnderReview,
    Approved,
    Rejected,
}

/// A single adopter's submission for a single pet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub user_id: UserId,
    pub pet_id: PetId,
    #[serde(default)]
    pub status: ApplicationStatus,
    /// Percentage of required fields filled, 0 to 100.
    pub completeness: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl Application {
    pub fn is_draft(&self) -> bool {
        self.submitted_at.is_none()
    }
}
