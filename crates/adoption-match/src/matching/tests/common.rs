use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::matching::domain::{
    AdopterPreferences, Application, ApplicationId, ApplicationStatus, BackgroundCheckStatus,
    EnergyLevel, Experience, HomeCheckStatus, Pet, PetId, UserId, UserProfile, YardSpace,
};
use crate::matching::repository::{
    AlertError, AlertPublisher, CandidacyRecord, CandidacyRepository, RepositoryError,
    ShelterAlert,
};
use crate::matching::scoring::{
    CandidateStatus, MatchRequest, MatchScore, ScoreBreakdown, ScoringWeights,
};
use crate::matching::{match_router, AdoptionMatchService};

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn hours_ago(hours: i64) -> DateTime<Utc> {
    now() - Duration::hours(hours)
}

/// Fully vetted adopter with a large yard in Old Bridge, NJ.
pub(super) fn adopter(id: &str) -> UserProfile {
    UserProfile {
        id: UserId(id.to_string()),
        name: format!("Adopter {id}"),
        email: format!("{id}@example.com"),
        location: "Old Bridge, NJ".to_string(),
        coordinates: None,
        is_pre_approved: true,
        background_check_status: BackgroundCheckStatus::Approved,
        home_check_status: HomeCheckStatus::Completed,
        engagement_score: 0.9,
        preferences: AdopterPreferences {
            yard_space: YardSpace::Large,
            experience: Experience::Experienced,
            lifestyle: Some("active".to_string()),
        },
        adoption_history: Vec::new(),
    }
}

pub(super) fn unvetted_adopter(id: &str) -> UserProfile {
    UserProfile {
        is_pre_approved: false,
        background_check_status: BackgroundCheckStatus::Pending,
        home_check_status: HomeCheckStatus::Pending,
        engagement_score: 0.2,
        ..adopter(id)
    }
}

pub(super) fn pet() -> Pet {
    Pet {
        id: PetId("pet-luna".to_string()),
        name: "Luna".to_string(),
        breed: "Border Collie".to_string(),
        age: "2 years".to_string(),
        size: "Medium".to_string(),
        energy: EnergyLevel::High,
        yard_requirement: YardSpace::Large,
        location: "Old Bridge, NJ".to_string(),
        shelter: Some("Happy Tails Rescue".to_string()),
    }
}

pub(super) fn application(user: &UserProfile, pet: &Pet, completeness: f64) -> Application {
    Application {
        id: ApplicationId(format!("{}-{}", pet.id, user.id)),
        user_id: user.id.clone(),
        pet_id: pet.id.clone(),
        status: ApplicationStatus::Submitted,
        completeness,
        submitted_at: Some(hours_ago(2)),
    }
}

pub(super) fn request(user: UserProfile, completeness: f64) -> MatchRequest {
    let pet = pet();
    let application = application(&user, &pet, completeness);
    MatchRequest {
        user,
        pet,
        application,
        liked_at: now(),
        shelter_priority_boost: 0.0,
    }
}

/// Bare score for ranking tests; only the total and identity matter there.
pub(super) fn score(user_id: &str, total_score: f64) -> MatchScore {
    MatchScore {
        user_id: UserId(user_id.to_string()),
        pet_id: PetId("pet-luna".to_string()),
        total_score,
        breakdown: ScoreBreakdown {
            application_completeness: 0.0,
            pre_approval_status: 0.0,
            suitability_match: 0.5,
            geographic_proximity: 0.3,
            time_of_like: 0.0,
            engagement_level: 0.0,
            shelter_priority: 0.0,
        },
        ranking: 0,
        status: CandidateStatus::Pending,
        applied_at: now(),
    }
}

pub(super) fn user_ids(scores: &[MatchScore]) -> Vec<&str> {
    scores.iter().map(|score| score.user_id.0.as_str()).collect()
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<HashMap<(PetId, UserId), CandidacyRecord>>>,
}

impl CandidacyRepository for MemoryRepository {
    fn insert(&self, record: CandidacyRecord) -> Result<CandidacyRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let key = (record.pet_id().clone(), record.user_id().clone());
        if guard.contains_key(&key) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(key, record.clone());
        Ok(record)
    }

    fn update(&self, record: CandidacyRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let key = (record.pet_id().clone(), record.user_id().clone());
        if guard.contains_key(&key) {
            guard.insert(key, record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(
        &self,
        pet_id: &PetId,
        user_id: &UserId,
    ) -> Result<Option<CandidacyRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&(pet_id.clone(), user_id.clone())).cloned())
    }

    fn for_pet(&self, pet_id: &PetId) -> Result<Vec<CandidacyRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.pet_id() == pet_id)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryAlerts {
    events: Arc<Mutex<Vec<ShelterAlert>>>,
}

impl MemoryAlerts {
    pub(super) fn events(&self) -> Vec<ShelterAlert> {
        self.events.lock().expect("alert mutex poisoned").clone()
    }
}

impl AlertPublisher for MemoryAlerts {
    fn publish(&self, alert: ShelterAlert) -> Result<(), AlertError> {
        self.events
            .lock()
            .expect("alert mutex poisoned")
            .push(alert);
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl CandidacyRepository for UnavailableRepository {
    fn insert(&self, _record: CandidacyRecord) -> Result<CandidacyRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: CandidacyRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(
        &self,
        _pet_id: &PetId,
        _user_id: &UserId,
    ) -> Result<Option<CandidacyRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn for_pet(&self, _pet_id: &PetId) -> Result<Vec<CandidacyRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service() -> (
    AdoptionMatchService<MemoryRepository, MemoryAlerts>,
    Arc<MemoryRepository>,
    Arc<MemoryAlerts>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let alerts = Arc::new(MemoryAlerts::default());
    let service = AdoptionMatchService::new(
        repository.clone(),
        alerts.clone(),
        ScoringWeights::default(),
    );
    (service, repository, alerts)
}

pub(super) fn router_with_service(
    service: AdoptionMatchService<MemoryRepository, MemoryAlerts>,
) -> axum::Router {
    match_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
