use super::common::*;
use std::sync::Arc;

use crate::matching::domain::{PetId, UserId};
use crate::matching::repository::{CandidacyRepository, RepositoryError};
use crate::matching::scoring::{CandidateStatus, ScoringWeights, TieBreak};
use crate::matching::{AdoptionMatchService, MatchServiceError};

fn luna() -> PetId {
    PetId("pet-luna".to_string())
}

#[test]
fn register_stores_candidacy() {
    let (service, repository, alerts) = build_service();

    let record = service
        .register(&luna(), request(adopter("ava"), 90.0), now())
        .expect("registration succeeds");

    assert!(!record.rejected);
    assert_eq!(record.last_status, None);
    assert_eq!(record.registered_at, now());
    let stored = repository
        .fetch(&luna(), &UserId("ava".to_string()))
        .expect("fetch succeeds")
        .expect("record stored");
    assert_eq!(stored.request.application.completeness, 90.0);
    assert!(alerts.events().is_empty());
}

#[test]
fn duplicate_registration_conflicts() {
    let (service, _, _) = build_service();
    service
        .register(&luna(), request(adopter("ava"), 90.0), now())
        .expect("first registration succeeds");

    let err = service
        .register(&luna(), request(adopter("ava"), 95.0), now())
        .expect_err("duplicate should fail");

    assert!(matches!(
        err,
        MatchServiceError::Repository(RepositoryError::Conflict)
    ));
}

#[test]
fn register_rejects_requests_for_another_pet() {
    let (service, _, _) = build_service();

    let err = service
        .register(
            &PetId("pet-milo".to_string()),
            request(adopter("ava"), 90.0),
            now(),
        )
        .expect_err("pet mismatch should fail");

    match err {
        MatchServiceError::PetMismatch { expected, found } => {
            assert_eq!(expected.0, "pet-milo");
            assert_eq!(found, luna());
        }
        other => panic!("expected pet mismatch, got {other:?}"),
    }
}

#[test]
fn register_rejects_applications_from_another_user() {
    let (service, _, _) = build_service();
    let mut request = request(adopter("ava"), 90.0);
    request.application.user_id = UserId("someone-else".to_string());

    let err = service
        .register(&luna(), request, now())
        .expect_err("user mismatch should fail");

    assert!(matches!(err, MatchServiceError::UserMismatch { .. }));
}

#[test]
fn rank_orders_cohort_and_alerts_new_top_candidates() {
    let (service, repository, alerts) = build_service();
    for (id, completeness) in [("low", 10.0), ("high", 100.0), ("mid", 60.0)] {
        service
            .register(&luna(), request(adopter(id), completeness), now())
            .expect("registration succeeds");
    }
    service
        .register(&luna(), request(unvetted_adopter("late"), 20.0), now())
        .expect("registration succeeds");

    let ranking = service.rank(&luna(), now()).expect("ranking succeeds");

    assert_eq!(user_ids(&ranking.candidates), vec!["high", "mid", "low", "late"]);
    assert_eq!(ranking.summary.applicants, 4);
    assert_eq!(ranking.summary.top_candidates, 3);
    assert_eq!(ranking.summary.waitlisted, 1);
    assert_eq!(ranking.evaluated_at, now());

    let events = alerts.events();
    assert_eq!(events.len(), 3);
    assert!(events.iter().all(|alert| alert.template == "top_candidate"));
    assert_eq!(events[0].user_id.0, "high");
    assert_eq!(events[0].details.get("ranking").map(String::as_str), Some("1"));

    let stored = repository
        .fetch(&luna(), &UserId("late".to_string()))
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.last_status, Some(CandidateStatus::Waitlist));

    service.rank(&luna(), now()).expect("re-ranking succeeds");
    assert_eq!(alerts.events().len(), 3, "unchanged tiers should not re-alert");
}

#[test]
fn rejected_candidates_trail_the_ranking() {
    let (service, _, alerts) = build_service();
    for (id, completeness) in [("ava", 100.0), ("ben", 80.0)] {
        service
            .register(&luna(), request(adopter(id), completeness), now())
            .expect("registration succeeds");
    }

    let rejected = service
        .reject(&luna(), &UserId("ava".to_string()))
        .expect("reject succeeds");
    assert!(rejected.rejected);

    let ranking = service.rank(&luna(), now()).expect("ranking succeeds");

    assert_eq!(user_ids(&ranking.candidates), vec!["ben", "ava"]);
    assert_eq!(ranking.candidates[0].ranking, 1);
    assert_eq!(ranking.candidates[1].ranking, 0);
    assert_eq!(ranking.candidates[1].status, CandidateStatus::Rejected);
    assert_eq!(ranking.summary.rejected, 1);
    assert_eq!(ranking.summary.top_candidates, 1);
    assert_eq!(alerts.events().len(), 1);
}

#[test]
fn reject_unknown_candidacy_is_not_found() {
    let (service, _, _) = build_service();

    let err = service
        .reject(&luna(), &UserId("ghost".to_string()))
        .expect_err("missing candidacy");

    assert!(matches!(
        err,
        MatchServiceError::Repository(RepositoryError::NotFound)
    ));
}

#[test]
fn get_reflects_rejection_and_tier_history() {
    let (service, _, _) = build_service();
    service
        .register(&luna(), request(adopter("ava"), 90.0), now())
        .expect("registration succeeds");
    service.rank(&luna(), now()).expect("ranking succeeds");

    let ranked = service
        .get(&luna(), &UserId("ava".to_string()))
        .expect("candidacy present");
    assert_eq!(ranked.last_status, Some(CandidateStatus::TopCandidate));

    service
        .reject(&luna(), &UserId("ava".to_string()))
        .expect("rejection succeeds");
    let rejected = service
        .get(&luna(), &UserId("ava".to_string()))
        .expect("candidacy present");
    assert!(rejected.rejected);
    assert_eq!(rejected.view().last_status, Some(CandidateStatus::Rejected));

    assert!(matches!(
        service.get(&luna(), &UserId("ghost".to_string())),
        Err(MatchServiceError::Repository(RepositoryError::NotFound))
    ));
}

#[test]
fn ties_fall_back_to_registration_order() {
    let (service, _, _) = build_service();
    for id in ["zoe", "amy", "kim"] {
        service
            .register(&luna(), request(adopter(id), 75.0), now())
            .expect("registration succeeds");
    }

    let ranking = service.rank(&luna(), now()).expect("ranking succeeds");

    assert_eq!(user_ids(&ranking.candidates), vec!["zoe", "amy", "kim"]);
}

#[test]
fn earliest_application_tie_break_is_opt_in() {
    let repository = Arc::new(MemoryRepository::default());
    let alerts = Arc::new(MemoryAlerts::default());
    let service = AdoptionMatchService::new(repository, alerts, ScoringWeights::default())
        .with_tie_break(TieBreak::EarliestApplication);

    let mut later = request(adopter("later"), 75.0);
    later.application.submitted_at = Some(hours_ago(1));
    let mut sooner = request(adopter("sooner"), 75.0);
    sooner.application.submitted_at = Some(hours_ago(30));

    service.register(&luna(), later, now()).expect("registers");
    service.register(&luna(), sooner, now()).expect("registers");

    let ranking = service.rank(&luna(), now()).expect("ranking succeeds");
    assert_eq!(user_ids(&ranking.candidates), vec!["sooner", "later"]);
}

#[test]
fn empty_cohort_ranks_cleanly() {
    let (service, _, alerts) = build_service();

    let ranking = service.rank(&luna(), now()).expect("ranking succeeds");

    assert!(ranking.candidates.is_empty());
    assert_eq!(ranking.summary.applicants, 0);
    assert_eq!(ranking.summary.average_score, None);
    assert!(alerts.events().is_empty());
}

#[test]
fn repository_failures_surface() {
    let service = AdoptionMatchService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryAlerts::default()),
        ScoringWeights::default(),
    );

    let err = service.rank(&luna(), now()).expect_err("repository offline");
    assert!(matches!(
        err,
        MatchServiceError::Repository(RepositoryError::Unavailable(_))
    ));
}
