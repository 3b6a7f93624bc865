use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ApplicationId, PetId, UserId};
use super::scoring::{CandidateStatus, MatchRequest};

/// Stored interest of one adopter in one pet, with shelter review state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidacyRecord {
    /// Registration order; ties in the ranking fall back to it.
    pub sequence: u64,
    pub request: MatchRequest,
    pub registered_at: DateTime<Utc>,
    pub rejected: bool,
    /// Tier assigned by the most recent ranking pass, if any.
    pub last_status: Option<CandidateStatus>,
}

impl CandidacyRecord {
    pub fn pet_id(&self) -> &PetId {
        &self.request.pet.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.request.user.id
    }

    pub fn view(&self) -> CandidacyView {
        CandidacyView {
            pet_id: self.pet_id().clone(),
            user_id: self.user_id().clone(),
            application_id: self.request.application.id.clone(),
            registered_at: self.registered_at,
            rejected: self.rejected,
            last_status: self.last_status,
        }
    }
}

/// Storage abstraction so the service can be exercised without a database.
pub trait CandidacyRepository: Send + Sync {
    fn insert(&self, record: CandidacyRecord) -> Result<CandidacyRecord, RepositoryError>;
    fn update(&self, record: CandidacyRecord) -> Result<(), RepositoryError>;
    fn fetch(
        &self,
        pet_id: &PetId,
        user_id: &UserId,
    ) -> Result<Option<CandidacyRecord>, RepositoryError>;
    fn for_pet(&self, pet_id: &PetId) -> Result<Vec<CandidacyRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound notification hook for shelter staff (e-mail, dashboard push, ...).
pub trait AlertPublisher: Send + Sync {
    fn publish(&self, alert: ShelterAlert) -> Result<(), AlertError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShelterAlert {
    pub template: String,
    pub pet_id: PetId,
    pub user_id: UserId,
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("alert transport unavailable: {0}")]
    Transport(String),
}

/// Public representation of a stored candidacy.
#[derive(Debug, Clone, Serialize)]
pub struct CandidacyView {
    pub pet_id: PetId,
    pub user_id: UserId,
    pub application_id: ApplicationId,
    pub registered_at: DateTime<Utc>,
    pub rejected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_status: Option<CandidateStatus>,
}
