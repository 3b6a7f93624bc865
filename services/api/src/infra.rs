use adoption_match::matching::{
    AlertError, AlertPublisher, CandidacyRecord, CandidacyRepository, PetId, RepositoryError,
    ShelterAlert, UserId,
};
use adoption_match::matching::roster;
use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

type CandidacyKey = (PetId, UserId);

#[derive(Default, Clone)]
pub(crate) struct InMemoryCandidacyRepository {
    records: Arc<Mutex<HashMap<CandidacyKey, CandidacyRecord>>>,
}

impl InMemoryCandidacyRepository {
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<CandidacyKey, CandidacyRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

fn key_of(record: &CandidacyRecord) -> CandidacyKey {
    (record.pet_id().clone(), record.user_id().clone())
}

impl CandidacyRepository for InMemoryCandidacyRepository {
    fn insert(&self, record: CandidacyRecord) -> Result<CandidacyRecord, RepositoryError> {
        let mut guard = self.lock()?;
        let key = key_of(&record);
        if guard.contains_key(&key) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(key, record.clone());
        Ok(record)
    }

    fn update(&self, record: CandidacyRecord) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        let key = key_of(&record);
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
        let guard = self.lock()?;
        Ok(guard.get(&(pet_id.clone(), user_id.clone())).cloned())
    }

    fn for_pet(&self, pet_id: &PetId) -> Result<Vec<CandidacyRecord>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .values()
            .filter(|record| record.pet_id() == pet_id)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAlertPublisher {
    events: Arc<Mutex<Vec<ShelterAlert>>>,
}

impl AlertPublisher for InMemoryAlertPublisher {
    fn publish(&self, alert: ShelterAlert) -> Result<(), AlertError> {
        let mut guard = self
            .events
            .lock()
            .map_err(|_| AlertError::Transport("alert mutex poisoned".to_string()))?;
        guard.push(alert);
        Ok(())
    }
}

impl InMemoryAlertPublisher {
    pub(crate) fn events(&self) -> Result<Vec<ShelterAlert>, AlertError> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .map_err(|_| AlertError::Transport("alert mutex poisoned".to_string()))
    }
}

/// Clap value parser: RFC 3339 instant or a bare date at midnight UTC.
pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    roster::parse_timestamp(raw)
        .ok_or_else(|| format!("failed to parse '{raw}' as RFC 3339 or YYYY-MM-DD"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parse_timestamp_accepts_dates_and_instants() {
        assert_eq!(
            parse_timestamp("2025-10-01"),
            Ok(Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_timestamp("2025-10-01T08:00:00-04:00"),
            Ok(Utc.with_ymd_and_hms(2025, 10, 1, 12, 0, 0).unwrap())
        );
        assert!(parse_timestamp("soon").is_err());
    }

    #[test]
    fn poisoned_alert_log_reports_transport_error() {
        let publisher = InMemoryAlertPublisher::default();
        let shared = publisher.events.clone();
        let _ = std::thread::spawn(move || {
            let _guard = shared.lock().unwrap();
            panic!("alert writer crashed");
        })
        .join();

        assert!(matches!(publisher.events(), Err(AlertError::Transport(_))));
        assert!(matches!(
            publisher.publish(ShelterAlert {
                template: "top_candidate".to_string(),
                pet_id: PetId("pet-luna".to_string()),
                user_id: UserId("ava".to_string()),
                details: Default::default(),
            }),
            Err(AlertError::Transport(_))
        ));
    }

    #[test]
    fn recorded_alerts_are_returned_in_order() {
        let publisher = InMemoryAlertPublisher::default();
        for user in ["ava", "ben"] {
            publisher
                .publish(ShelterAlert {
                    template: "top_candidate".to_string(),
                    pet_id: PetId("pet-luna".to_string()),
                    user_id: UserId(user.to_string()),
                    details: Default::default(),
                })
                .expect("publish succeeds");
        }

        let events = publisher.events().expect("alert log readable");
        let users: Vec<&str> = events.iter().map(|alert| alert.user_id.0.as_str()).collect();
        assert_eq!(users, vec!["ava", "ben"]);
    }
}
