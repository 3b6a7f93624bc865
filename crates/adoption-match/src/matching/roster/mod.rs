mod parser;

use super::domain::{
    AdopterPreferences, Application, ApplicationId, ApplicationStatus, Pet, UserProfile,
};
use super::scoring::MatchRequest;
use std::io::Read;
use std::path::Path;
use tracing::info;

pub use parser::parse_timestamp;
use parser::RosterRecord;

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read applicant roster: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid applicant roster CSV: {}", err),
            RosterImportError::InvalidValue { row, column, value } => write!(
                f,
                "roster row {}: '{}' is not a valid {} value",
                row, value, column
            ),
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::InvalidValue { .. } => None,
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Builds match requests for one pet from a CSV applicant roster export.
pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        pet: &Pet,
    ) -> Result<Vec<MatchRequest>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, pet)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        pet: &Pet,
    ) -> Result<Vec<MatchRequest>, RosterImportError> {
        let records = parser::parse_records(reader)?;
        let requests: Vec<MatchRequest> = records
            .into_iter()
            .map(|record| build_request(record, pet))
            .collect();

        info!(pet = %pet.id, applicants = requests.len(), "imported applicant roster");
        Ok(requests)
    }
}

fn build_request(record: RosterRecord, pet: &Pet) -> MatchRequest {
    let RosterRecord {
        user_id,
        name,
        email,
        location,
        is_pre_approved,
        background_check_status,
        home_check_status,
        engagement_score,
        yard_space,
        experience,
        completeness,
        submitted_at,
        liked_at,
        shelter_priority_boost,
    } = record;

    let application = Application {
        id: ApplicationId(format!("{}-{}", pet.id, user_id)),
        user_id: user_id.clone(),
        pet_id: pet.id.clone(),
        status: if submitted_at.is_some() {
            ApplicationStatus::Submitted
        } else {
            ApplicationStatus::Draft
        },
        completeness,
        submitted_at,
    };

    let user = UserProfile {
        id: user_id,
        name,
        email,
        location,
        coordinates: None,
        is_pre_approved,
        background_check_status,
        home_check_status,
        engagement_score,
        preferences: AdopterPreferences {
            yard_space,
            experience,
            lifestyle: None,
        },
        adoption_history: Vec::new(),
    };

    MatchRequest {
        user,
        pet: pet.clone(),
        application,
        liked_at,
        shelter_priority_boost,
    }
}
