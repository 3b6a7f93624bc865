use chrono::{DateTime, Utc};

use super::super::domain::{
    Application, BackgroundCheckStatus, HomeCheckStatus, Pet, UserProfile,
};

/// Interest decays linearly to zero over one week.
const LIKE_DECAY_HOURS: f64 = 24.0 * 7.0;
const MILLIS_PER_HOUR: f64 = 1000.0 * 60.0 * 60.0;

const SAME_CITY: f64 = 1.0;
const SAME_REGION: f64 = 0.7;
const DISTANT: f64 = 0.3;

pub(crate) fn application_score(application: &Application) -> f64 {
    clamp_unit(application.completeness / 100.0)
}

pub(crate) fn pre_approval_score(user: &UserProfile) -> f64 {
    let mut score = 0.0;
    if user.is_pre_approved {
        score += 0.5;
    }
    if user.background_check_status == BackgroundCheckStatus::Approved {
        score += 0.3;
    }
    if user.home_check_status == HomeCheckStatus::Completed {
        score += 0.2;
    }
    f64::min(score, 1.0)
}

pub(crate) fn suitability_score(user: &UserProfile, pet: &Pet) -> f64 {
    let mut score = 0.5;
    if user
        .preferences
        .yard_space
        .accommodates(&pet.yard_requirement)
    {
        score += 0.3;
    }
    if user.preferences.experience.handles(&pet.energy) {
        score += 0.2;
    }
    f64::min(score, 1.0)
}

/// Text-only proximity: "City, State" tokens compared after trimming, case-sensitive.
pub(crate) fn proximity_score(user: &UserProfile, pet: &Pet) -> f64 {
    let (user_city, user_region) = split_location(&user.location);
    let (pet_city, pet_region) = split_location(&pet.location);

    if user_city == pet_city {
        SAME_CITY
    } else if user_region == pet_region {
        SAME_REGION
    } else {
        DISTANT
    }
}

pub(crate) fn time_score(liked_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let hours_ago = (now - liked_at).num_milliseconds() as f64 / MILLIS_PER_HOUR;
    clamp_unit(1.0 - hours_ago / LIKE_DECAY_HOURS)
}

pub(crate) fn engagement_score(user: &UserProfile) -> f64 {
    clamp_unit(user.engagement_score)
}

/// Round half up at the second decimal place.
pub(crate) fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

fn split_location(location: &str) -> (&str, Option<&str>) {
    match location.split_once(',') {
        Some((city, rest)) => {
            let region = rest.split(',').next().unwrap_or(rest);
            (city.trim(), Some(region.trim()))
        }
        None => (location.trim(), None),
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
