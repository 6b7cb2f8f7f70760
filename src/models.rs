use rand::Rng;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::errors::AppError;

/// Sentinel filter value meaning "no constraint; draw freely".
pub const RANDOM_SENTINEL: &str = "random";

/// Default age window applied when the caller supplies no range.
pub const DEFAULT_MIN_AGE: u32 = 18;
pub const DEFAULT_MAX_AGE: u32 = 70;

/// Seeds drawn on the caller's behalf stay in this range so they remain
/// short enough to share in a URL.
pub const SEED_RANGE: std::ops::Range<u64> = 1..1_000_000;

// ============ Generation Models ============

/// Sex category used to condition name, title, and gender fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Display form used for the `gender` field ("Male" / "Female").
    pub fn as_str(self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }
}

/// Validated inputs for one deterministic generation run.
///
/// Filters are normalized at construction: empty strings and the
/// "random" sentinel collapse to `None`, which tells the generator to
/// draw the value from the seeded stream instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub seed: u64,
    pub gender: Option<Sex>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub age_range: Option<(u32, u32)>,
}

impl GenerationRequest {
    /// Builds a validated request from raw query parameters.
    ///
    /// A missing or zero seed is replaced by a freshly drawn random one so
    /// the generator itself stays pure. Age bounds must be supplied
    /// together; both-zero means "use the default 18-70 window".
    pub fn from_params(params: &PersonaQueryParams) -> Result<Self, AppError> {
        let seed = match params.seed {
            Some(seed) if seed > 0 => seed,
            _ => rand::thread_rng().gen_range(SEED_RANGE),
        };

        let gender = match params.gender.as_deref().map(str::trim) {
            None | Some("") => None,
            Some("Male") => Some(Sex::Male),
            Some("Female") => Some(Sex::Female),
            Some(other) => {
                return Err(AppError::BadRequest(format!(
                    "gender must be 'Male' or 'Female', got '{}'",
                    other
                )))
            }
        };

        let age_range = match (params.min_age, params.max_age) {
            (None, None) | (Some(0), Some(0)) => None,
            (Some(min), Some(max)) => {
                if min == 0 || max == 0 {
                    return Err(AppError::BadRequest(
                        "minAge and maxAge must both be positive".to_string(),
                    ));
                }
                if min > max {
                    return Err(AppError::BadRequest(format!(
                        "minAge ({}) must not exceed maxAge ({})",
                        min, max
                    )));
                }
                Some((min, max))
            }
            _ => {
                return Err(AppError::BadRequest(
                    "minAge and maxAge must be supplied together".to_string(),
                ))
            }
        };

        Ok(Self {
            seed,
            gender,
            state: normalize_filter(params.state.as_deref()),
            city: normalize_filter(params.city.as_deref()),
            age_range,
        })
    }
}

/// Collapses empty and sentinel filter values to `None`.
pub fn normalize_filter(value: Option<&str>) -> Option<String> {
    match value.map(str::trim) {
        None | Some("") => None,
        Some(v) if v.eq_ignore_ascii_case(RANDOM_SENTINEL) => None,
        Some(v) => Some(v.to_string()),
    }
}

// ============ API Request/Response Models ============

/// Query parameters accepted by the persona endpoints.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PersonaQueryParams {
    /// Seed determining the generated record; drawn randomly when absent or zero.
    pub seed: Option<u64>,
    /// State filter ("TX"), or "random" to let the generator choose.
    pub state: Option<String>,
    /// City filter, or "random" to let the generator choose.
    pub city: Option<String>,
    /// Gender filter: "Male" or "Female".
    pub gender: Option<String>,
    /// Minimum age; must be supplied together with maxAge.
    pub min_age: Option<u32>,
    /// Maximum age; must be supplied together with minAge.
    pub max_age: Option<u32>,
    /// Comma-separated field selection for the export document.
    pub fields: Option<String>,
    /// High school jurisdiction override (state).
    pub high_state: Option<String>,
    /// High school jurisdiction override (city).
    pub high_city: Option<String>,
    /// University jurisdiction override (state).
    pub university_state: Option<String>,
    /// University jurisdiction override (city).
    pub university_city: Option<String>,
}

/// A complete synthetic person record.
///
/// Every field is derived from a single seeded stream in a fixed order, so
/// an identical `(seed, filters)` pair always reproduces the same record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonRecord {
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub birthday: String,
    pub title: String,
    pub hair_color: String,
    pub country: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub state_full_name: String,
    pub zip_code: String,
    pub phone: String,
    pub email: String,
    pub full_address: String,
    pub occupation: String,
    pub company: String,
    pub company_size: String,
    pub industry: String,
    pub status: String,
    pub salary: String,
    pub ssn: String,
    pub card_type: String,
    pub card_number: String,
    pub cvv: u16,
    pub expiry: String,
    pub username: String,
    pub password: String,
    pub height: String,
    pub weight: String,
    pub blood_type: String,
    pub os: String,
    pub guid: String,
    pub user_agent: String,
    pub education: String,
    pub website: String,
    pub security_question: String,
    pub security_answer: String,
}

/// A public high school record sourced verbatim from the catalog.
///
/// Missing values and the catalog's literal "NOT AVAILABLE" marker are
/// normalized to empty strings during mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SchoolRecord {
    pub name: String,
    pub ncesid: String,
    pub zip: String,
    pub website: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub telephone: String,
    pub st_grade: String,
    pub end_grade: String,
}

/// A university record sourced verbatim from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UniversityRecord {
    pub name: String,
    pub ipedsid: String,
    pub zip: String,
    pub website: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub telephone: String,
    /// Institution type code from the catalog ("1" = public).
    #[serde(rename = "type")]
    pub type_code: String,
}

/// The structured document returned by `GET /api/v1/persona`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PersonaResponse {
    /// Seed that produced `person`; echo it back to reproduce the record.
    pub seed: u64,
    pub person: PersonRecord,
    /// Resolved high school, if the lookup found one.
    pub school: Option<SchoolRecord>,
    /// Resolved university, if the lookup found one.
    pub university: Option<UniversityRecord>,
}
