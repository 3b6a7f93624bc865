use crate::infra::{parse_timestamp, InMemoryAlertPublisher, InMemoryCandidacyRepository};
use adoption_match::config::AppConfig;
use adoption_match::error::AppError;
use adoption_match::matching::{
    rank_applicants_with, AdopterPreferences, AdoptionMatchService, Application, ApplicationId,
    ApplicationStatus, BackgroundCheckStatus, CohortSummary, EnergyLevel, Experience,
    HomeCheckStatus, MatchRequest, MatchScoreView, MatchScorer, MatchServiceError, Pet, PetId,
    PetRanking, RosterImporter, ScoringWeights, ShelterAlert, TieBreak, UserId, UserProfile,
    YardSpace,
};
use chrono::{DateTime, Duration, Utc};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation instant (RFC 3339 or YYYY-MM-DD). Defaults to now.
    #[arg(long, value_parser = parse_timestamp)]
    pub(crate) now: Option<DateTime<Utc>>,
}

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// Pet listing as JSON
    #[arg(long)]
    pub(crate) pet: PathBuf,
    /// Applicant roster CSV for the pet
    #[arg(long)]
    pub(crate) roster: PathBuf,
    /// Evaluation instant (RFC 3339 or YYYY-MM-DD). Defaults to now.
    #[arg(long, value_parser = parse_timestamp)]
    pub(crate) now: Option<DateTime<Utc>>,
    /// How equal totals are ordered: input-order or earliest-application
    #[arg(long, default_value = "input-order", value_parser = parse_tie_break)]
    pub(crate) tie_break: TieBreak,
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let RankArgs {
        pet,
        roster,
        now,
        tie_break,
    } = args;

    let config = AppConfig::load()?;
    let now = now.unwrap_or_else(Utc::now);
    let pet: Pet = serde_json::from_slice(&std::fs::read(pet)?)?;
    let requests = RosterImporter::from_path(roster, &pet)?;

    let scorer = MatchScorer::new(config.matching.weights);
    let scores: Vec<_> = requests
        .iter()
        .map(|request| scorer.score(request, now))
        .collect();
    let ranked = rank_applicants_with(&scores, tie_break);
    let summary = CohortSummary::from_ranked(pet.id.clone(), &ranked);

    println!("Applicant ranking for {} ({})", pet.name, pet.id);
    println!("Evaluated at {}", now.to_rfc3339());
    let views: Vec<MatchScoreView> = ranked.iter().map(MatchScoreView::from).collect();
    render_ranking(&views);
    render_summary(&summary);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let now = args.now.unwrap_or_else(Utc::now);
    let (ranking, alerts) = demo_ranking(now)?;

    println!("Adoption match demo");
    println!(
        "Pet: Luna, Golden Retriever Mix (Old Bridge, NJ), evaluated {}",
        now.to_rfc3339()
    );
    render_ranking(&ranking.views());
    render_summary(&ranking.summary);

    if alerts.is_empty() {
        println!("\nShelter alerts: none dispatched");
    } else {
        println!("\nShelter alerts");
        for alert in &alerts {
            let total = alert
                .details
                .get("total_score")
                .map(String::as_str)
                .unwrap_or("-");
            println!("- {} for {}: score {}", alert.template, alert.user_id, total);
        }
    }

    Ok(())
}

fn parse_tie_break(raw: &str) -> Result<TieBreak, String> {
    match raw.trim() {
        "input-order" => Ok(TieBreak::InputOrder),
        "earliest-application" => Ok(TieBreak::EarliestApplication),
        other => Err(format!(
            "unknown tie-break '{other}' (expected input-order or earliest-application)"
        )),
    }
}

fn render_ranking(views: &[MatchScoreView]) {
    if views.is_empty() {
        println!("\nNo applicants to rank");
        return;
    }

    println!("\nRank | Applicant | Score | Status | App/Pre/Fit/Geo/Time/Eng/Priority %");
    for view in views {
        let b = &view.breakdown;
        let rank = if view.ranking == 0 {
            "-".to_string()
        } else {
            view.ranking.to_string()
        };
        println!(
            "{:>4} | {} | {:.2} | {} | {}/{}/{}/{}/{}/{}/{}",
            rank,
            view.user_id,
            view.total_score,
            view.status_label,
            b.application_completeness,
            b.pre_approval_status,
            b.suitability_match,
            b.geographic_proximity,
            b.time_of_like,
            b.engagement_level,
            b.shelter_priority
        );
    }
}

fn render_summary(summary: &CohortSummary) {
    println!(
        "\n{} applicants | {} top candidates | {} waitlisted | {} pending | {} rejected",
        summary.applicants,
        summary.top_candidates,
        summary.waitlisted,
        summary.pending,
        summary.rejected
    );
    if let (Some(average), Some(best)) = (summary.average_score, summary.best_score) {
        println!(
            "Avg match score {:.0}% | best {:.0}%",
            average * 100.0,
            best * 100.0
        );
    }
}

pub(crate) fn demo_ranking(
    now: DateTime<Utc>,
) -> Result<(PetRanking, Vec<ShelterAlert>), AppError> {
    let repository = Arc::new(InMemoryCandidacyRepository::default());
    let alerts = Arc::new(InMemoryAlertPublisher::default());
    let service =
        AdoptionMatchService::new(repository, alerts.clone(), ScoringWeights::default());

    let pet = demo_pet();
    for request in demo_cohort(&pet, now) {
        service.register(&pet.id, request, now)?;
    }

    let ranking = service.rank(&pet.id, now)?;
    let sent = alerts.events().map_err(MatchServiceError::from)?;
    Ok((ranking, sent))
}

fn demo_pet() -> Pet {
    Pet {
        id: PetId("pet-luna".to_string()),
        name: "Luna".to_string(),
        breed: "Golden Retriever Mix".to_string(),
        age: "2 years".to_string(),
        size: "Large".to_string(),
        energy: EnergyLevel::High,
        yard_requirement: YardSpace::Large,
        location: "Old Bridge, NJ".to_string(),
        shelter: Some("Happy Tails Rescue".to_string()),
    }
}

struct DemoApplicant {
    id: &'static str,
    name: &'static str,
    location: &'static str,
    checks: (bool, BackgroundCheckStatus, HomeCheckStatus),
    engagement: f64,
    yard_space: YardSpace,
    experience: Experience,
    completeness: f64,
    submitted_hours_ago: Option<i64>,
    liked_hours_ago: i64,
    boost: f64,
}

fn demo_cohort(pet: &Pet, now: DateTime<Utc>) -> Vec<MatchRequest> {
    let applicants = [
        DemoApplicant {
            id: "user-avery",
            name: "Avery Johnson",
            location: "Old Bridge, NJ",
            checks: (true, BackgroundCheckStatus::Approved, HomeCheckStatus::Completed),
            engagement: 0.9,
            yard_space: YardSpace::Large,
            experience: Experience::Experienced,
            completeness: 100.0,
            submitted_hours_ago: Some(20),
            liked_hours_ago: 1,
            boost: 0.0,
        },
        DemoApplicant {
            id: "user-blake",
            name: "Blake Rivera",
            location: "Sayreville, NJ",
            checks: (true, BackgroundCheckStatus::Approved, HomeCheckStatus::Scheduled),
            engagement: 0.6,
            yard_space: YardSpace::Medium,
            experience: Experience::Some,
            completeness: 85.0,
            submitted_hours_ago: Some(26),
            liked_hours_ago: 30,
            boost: 0.0,
        },
        DemoApplicant {
            id: "user-casey",
            name: "Casey Patel",
            location: "Edison, NJ",
            checks: (false, BackgroundCheckStatus::Pending, HomeCheckStatus::Pending),
            engagement: 0.4,
            yard_space: YardSpace::Small,
            experience: Experience::FirstTime,
            completeness: 60.0,
            submitted_hours_ago: None,
            liked_hours_ago: 3,
            boost: 0.0,
        },
        DemoApplicant {
            id: "user-devon",
            name: "Devon Brooks",
            location: "Brooklyn, NY",
            checks: (false, BackgroundCheckStatus::Approved, HomeCheckStatus::Pending),
            engagement: 0.7,
            yard_space: YardSpace::Large,
            experience: Experience::Professional,
            completeness: 90.0,
            submitted_hours_ago: Some(96),
            liked_hours_ago: 100,
            boost: 0.0,
        },
        DemoApplicant {
            id: "user-emery",
            name: "Emery Chen",
            location: "Old Bridge, NJ",
            checks: (true, BackgroundCheckStatus::Approved, HomeCheckStatus::Completed),
            engagement: 0.9,
            yard_space: YardSpace::Large,
            experience: Experience::Experienced,
            completeness: 95.0,
            submitted_hours_ago: Some(190),
            liked_hours_ago: 200,
            boost: 0.5,
        },
    ];

    applicants
        .into_iter()
        .map(|applicant| demo_request(applicant, pet, now))
        .collect()
}

fn demo_request(applicant: DemoApplicant, pet: &Pet, now: DateTime<Utc>) -> MatchRequest {
    let user_id = UserId(applicant.id.to_string());
    let (is_pre_approved, background_check_status, home_check_status) = applicant.checks;
    let submitted_at = applicant
        .submitted_hours_ago
        .map(|hours| now - Duration::hours(hours));

    MatchRequest {
        user: UserProfile {
            id: user_id.clone(),
            name: applicant.name.to_string(),
            email: format!("{}@example.com", applicant.id.trim_start_matches("user-")),
            location: applicant.location.to_string(),
            coordinates: None,
            is_pre_approved,
            background_check_status,
            home_check_status,
            engagement_score: applicant.engagement,
            preferences: AdopterPreferences {
                yard_space: applicant.yard_space,
                experience: applicant.experience,
                lifestyle: None,
            },
            adoption_history: Vec::new(),
        },
        pet: pet.clone(),
        application: Application {
            id: ApplicationId(format!("{}-{}", pet.id, user_id)),
            user_id,
            pet_id: pet.id.clone(),
            status: if submitted_at.is_some() {
                ApplicationStatus::Submitted
            } else {
                ApplicationStatus::Draft
            },
            completeness: applicant.completeness,
            submitted_at,
        },
        liked_at: now - Duration::hours(applicant.liked_hours_ago),
        shelter_priority_boost: applicant.boost,
    }
}
