use super::super::domain::{
    BackgroundCheckStatus, Experience, HomeCheckStatus, UserId, YardSpace,
};
use super::RosterImportError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug)]
pub(crate) struct RosterRecord {
    pub(crate) user_id: UserId,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) location: String,
    pub(crate) is_pre_approved: bool,
    pub(crate) background_check_status: BackgroundCheckStatus,
    pub(crate) home_check_status: HomeCheckStatus,
    pub(crate) engagement_score: f64,
    pub(crate) yard_space: YardSpace,
    pub(crate) experience: Experience,
    pub(crate) completeness: f64,
    pub(crate) submitted_at: Option<DateTime<Utc>>,
    pub(crate) liked_at: DateTime<Utc>,
    pub(crate) shelter_priority_boost: f64,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<RosterRecord>, RosterImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (index, record) in csv_reader.deserialize::<RosterRow>().enumerate() {
        let row = record?;
        records.push(row.into_record(index + 1)?);
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    user_id: String,
    name: String,
    #[serde(default)]
    email: String,
    location: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pre_approved: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    background_check: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    home_check: Option<String>,
    #[serde(default)]
    engagement: Option<f64>,
    yard_space: String,
    experience: String,
    #[serde(default)]
    completeness: Option<f64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    submitted_at: Option<String>,
    liked_at: String,
    #[serde(default)]
    shelter_priority: Option<f64>,
}

impl RosterRow {
    fn into_record(self, row: usize) -> Result<RosterRecord, RosterImportError> {
        let invalid = |column: &'static str, value: &str| RosterImportError::InvalidValue {
            row,
            column,
            value: value.to_string(),
        };

        let is_pre_approved = match self.pre_approved.as_deref() {
            None => false,
            Some(raw) => parse_flag(raw).ok_or_else(|| invalid("pre_approved", raw))?,
        };

        let background_check_status = match self.background_check.as_deref() {
            None => BackgroundCheckStatus::Pending,
            Some(raw) => {
                parse_background_check(raw).ok_or_else(|| invalid("background_check", raw))?
            }
        };

        let home_check_status = match self.home_check.as_deref() {
            None => HomeCheckStatus::Pending,
            Some(raw) => parse_home_check(raw).ok_or_else(|| invalid("home_check", raw))?,
        };

        let submitted_at = match self.submitted_at.as_deref() {
            None => None,
            Some(raw) => Some(parse_timestamp(raw).ok_or_else(|| invalid("submitted_at", raw))?),
        };

        let liked_at =
            parse_timestamp(&self.liked_at).ok_or_else(|| invalid("liked_at", &self.liked_at))?;

        let finite = |column: &'static str, value: Option<f64>| match value {
            None => Ok(0.0),
            Some(number) if number.is_finite() => Ok(number),
            Some(number) => Err(invalid(column, &number.to_string())),
        };
        let engagement_score = finite("engagement", self.engagement)?;
        let completeness = finite("completeness", self.completeness)?;
        let shelter_priority_boost = finite("shelter_priority", self.shelter_priority)?;

        Ok(RosterRecord {
            user_id: UserId(self.user_id),
            name: self.name,
            email: self.email,
            location: self.location,
            is_pre_approved,
            background_check_status,
            home_check_status,
            engagement_score,
            yard_space: YardSpace::from(self.yard_space),
            experience: Experience::from(self.experience),
            completeness,
            submitted_at,
            liked_at,
            shelter_priority_boost,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

fn parse_background_check(value: &str) -> Option<BackgroundCheckStatus> {
    match value.trim().to_ascii_lowercase().as_str() {
        "pending" => Some(BackgroundCheckStatus::Pending),
        "approved" => Some(BackgroundCheckStatus::Approved),
        "rejected" => Some(BackgroundCheckStatus::Rejected),
        _ => None,
    }
}

fn parse_home_check(value: &str) -> Option<HomeCheckStatus> {
    match value.trim().to_ascii_lowercase().as_str() {
        "pending" => Some(HomeCheckStatus::Pending),
        "scheduled" => Some(HomeCheckStatus::Scheduled),
        "completed" => Some(HomeCheckStatus::Completed),
        "failed" => Some(HomeCheckStatus::Failed),
        _ => None,
    }
}

/// Accepts RFC 3339 timestamps or bare dates (midnight UTC).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
