//! Client for the public school/university catalog (OpenDataSoft Explore
//! v2.1 record endpoints).
//!
//! Lookups are seeded: the catalog's `random({seed})` ordering makes the
//! selected record stable for a fixed seed and filter set. Transport and
//! parse failures fold into "no record"; a missing school never blocks the
//! person record.

use regex::Regex;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::config::Config;
use crate::errors::AppError;
use crate::models::{SchoolRecord, UniversityRecord, RANDOM_SENTINEL};

/// Literal marker the catalog uses for missing values.
const NOT_AVAILABLE: &str = "NOT AVAILABLE";

/// The two record kinds the catalog serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    School,
    University,
}

impl RecordKind {
    fn dataset(self) -> &'static str {
        match self {
            RecordKind::School => "us-public-schools",
            RecordKind::University => "us-colleges-and-universities",
        }
    }

    fn select(self) -> &'static str {
        match self {
            RecordKind::School => {
                "name,ncesid,zip,website,address,city,state,telephone,st_grade,end_grade"
            }
            RecordKind::University => "name,ipedsid,zip,website,address,city,state,telephone,type",
        }
    }

    /// Kind-specific predicate: schools must run through grade 12,
    /// universities must be public institutions (type code "1").
    fn base_predicate(self, state: &str) -> String {
        match self {
            RecordKind::School => {
                format!(r#"state="{}" AND end_grade = "12""#, state)
            }
            RecordKind::University => format!(r#"state="{}" AND type="1""#, state),
        }
    }
}

/// Builds the conjunctive filter expression for one query.
pub fn build_where(kind: RecordKind, state: &str, city: Option<&str>) -> String {
    let mut clause = kind.base_predicate(&sanitize_filter_value(state));
    if let Some(city) = city {
        // The catalog stores city names uppercased.
        clause.push_str(&format!(
            r#" AND city="{}""#,
            sanitize_filter_value(&city.to_uppercase())
        ));
    }
    clause
}

/// Strips characters that could escape the double-quoted string literals in
/// the filter grammar.
pub fn sanitize_filter_value(value: &str) -> String {
    let allowed = Regex::new(r"[^A-Za-z0-9 .,'&()/-]").unwrap();
    allowed.replace_all(value, "").into_owned()
}

/// Envelope of the catalog's record responses.
#[derive(Debug, Deserialize)]
struct CatalogResults<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct RawSchool {
    name: Option<String>,
    ncesid: Option<String>,
    zip: Option<String>,
    website: Option<String>,
    address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    telephone: Option<String>,
    st_grade: Option<String>,
    end_grade: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawUniversity {
    name: Option<String>,
    ipedsid: Option<String>,
    zip: Option<String>,
    website: Option<String>,
    address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    telephone: Option<String>,
    #[serde(rename = "type")]
    type_code: Option<String>,
}

/// Normalizes a raw catalog value: missing, empty, and the literal
/// "NOT AVAILABLE" all collapse to an empty string.
fn field_value(value: Option<String>) -> String {
    match value {
        Some(v) if v != NOT_AVAILABLE => v,
        _ => String::new(),
    }
}

impl From<RawSchool> for SchoolRecord {
    fn from(raw: RawSchool) -> Self {
        SchoolRecord {
            name: field_value(raw.name),
            ncesid: field_value(raw.ncesid),
            zip: field_value(raw.zip),
            website: field_value(raw.website),
            address: field_value(raw.address),
            city: field_value(raw.city),
            state: field_value(raw.state),
            telephone: field_value(raw.telephone),
            st_grade: field_value(raw.st_grade),
            end_grade: field_value(raw.end_grade),
        }
    }
}

impl From<RawUniversity> for UniversityRecord {
    fn from(raw: RawUniversity) -> Self {
        UniversityRecord {
            name: field_value(raw.name),
            ipedsid: field_value(raw.ipedsid),
            zip: field_value(raw.zip),
            website: field_value(raw.website),
            address: field_value(raw.address),
            city: field_value(raw.city),
            state: field_value(raw.state),
            telephone: field_value(raw.telephone),
            type_code: field_value(raw.type_code),
        }
    }
}

/// HTTP client for the external catalog.
#[derive(Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    /// Creates a new `CatalogClient` from the application configuration.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.catalog_timeout_secs))
            .build()
            .map_err(|e| {
                AppError::ExternalApiError(format!("Failed to create catalog client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: config.catalog_base_url.clone(),
        })
    }

    /// Looks up one public high school for the jurisdiction.
    ///
    /// Returns `None` when the state is absent or the sentinel, when the
    /// catalog has no match, or when the request fails; failures are logged
    /// and never propagate.
    pub async fn lookup_school(
        &self,
        seed: u64,
        state: &str,
        city: Option<&str>,
    ) -> Option<SchoolRecord> {
        match self
            .lookup_raw::<RawSchool>(RecordKind::School, seed, state, city)
            .await
        {
            Ok(raw) => raw.map(SchoolRecord::from),
            Err(e) => {
                tracing::warn!("School lookup failed, treating as no record: {}", e);
                None
            }
        }
    }

    /// Looks up one public university for the jurisdiction. Same failure
    /// contract as [`lookup_school`](Self::lookup_school).
    pub async fn lookup_university(
        &self,
        seed: u64,
        state: &str,
        city: Option<&str>,
    ) -> Option<UniversityRecord> {
        match self
            .lookup_raw::<RawUniversity>(RecordKind::University, seed, state, city)
            .await
        {
            Ok(raw) => raw.map(UniversityRecord::from),
            Err(e) => {
                tracing::warn!("University lookup failed, treating as no record: {}", e);
                None
            }
        }
    }

    async fn lookup_raw<T: DeserializeOwned>(
        &self,
        kind: RecordKind,
        seed: u64,
        state: &str,
        city: Option<&str>,
    ) -> Result<Option<T>, AppError> {
        let state = state.trim();
        if state.is_empty() || state.eq_ignore_ascii_case(RANDOM_SENTINEL) {
            return Ok(None);
        }
        let city = city
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case(RANDOM_SENTINEL));

        let first = self
            .fetch_first(kind, &build_where(kind, state, city), seed)
            .await?;
        if first.is_some() || city.is_none() {
            return Ok(first);
        }

        // The catalog's city spellings often miss common variants; retry
        // once on the state-wide filter.
        tracing::debug!(
            "No {:?} match for city {:?} in {}, retrying state-wide",
            kind,
            city,
            state
        );
        self.fetch_first(kind, &build_where(kind, state, None), seed)
            .await
    }

    async fn fetch_first<T: DeserializeOwned>(
        &self,
        kind: RecordKind,
        where_clause: &str,
        seed: u64,
    ) -> Result<Option<T>, AppError> {
        let order_by = format!("random({})", seed);
        let url = Url::parse_with_params(
            &format!(
                "{}/api/explore/v2.1/catalog/datasets/{}/records",
                self.base_url,
                kind.dataset()
            ),
            &[
                ("select", kind.select()),
                ("where", where_clause),
                ("order_by", order_by.as_str()),
                ("limit", "1"),
            ],
        )
        .map_err(|e| AppError::ExternalApiError(format!("Failed to build catalog URL: {}", e)))?;

        tracing::debug!("Catalog query: {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            AppError::ExternalApiError(format!("Catalog request failed: {}", e))
        })?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApiError(format!(
                "Catalog returned status {}",
                response.status()
            )));
        }

        let mut body: CatalogResults<T> = response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to parse catalog response: {}", e))
        })?;

        if body.results.is_empty() {
            Ok(None)
        } else {
            Ok(Some(body.results.remove(0)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn where_clause_for_schools() {
        assert_eq!(
            build_where(RecordKind::School, "TX", None),
            r#"state="TX" AND end_grade = "12""#
        );
        assert_eq!(
            build_where(RecordKind::School, "TX", Some("Austin")),
            r#"state="TX" AND end_grade = "12" AND city="AUSTIN""#
        );
    }

    #[test]
    fn where_clause_for_universities() {
        assert_eq!(
            build_where(RecordKind::University, "CA", None),
            r#"state="CA" AND type="1""#
        );
    }

    #[test]
    fn filter_values_cannot_escape_quotes() {
        assert_eq!(
            sanitize_filter_value(r#"AUSTIN" OR state="CA"#),
            "AUSTIN OR stateCA"
        );
        assert_eq!(sanitize_filter_value(r"back\slash"), "backslash");
        // Legitimate punctuation in city names survives.
        assert_eq!(sanitize_filter_value("COEUR D'ALENE"), "COEUR D'ALENE");
        assert_eq!(sanitize_filter_value("WINSTON-SALEM"), "WINSTON-SALEM");
    }

    #[test]
    fn not_available_collapses_to_empty() {
        assert_eq!(field_value(Some("NOT AVAILABLE".to_string())), "");
        assert_eq!(field_value(None), "");
        assert_eq!(field_value(Some("example.edu".to_string())), "example.edu");
    }

    #[test]
    fn raw_school_maps_to_record() {
        let raw = RawSchool {
            name: Some("Central High School".to_string()),
            ncesid: Some("480001000000".to_string()),
            zip: Some("75001".to_string()),
            website: Some(NOT_AVAILABLE.to_string()),
            address: Some("100 Main St".to_string()),
            city: Some("DALLAS".to_string()),
            state: Some("TX".to_string()),
            telephone: Some("(214) 555-0100".to_string()),
            st_grade: Some("9".to_string()),
            end_grade: Some("12".to_string()),
        };
        let record = SchoolRecord::from(raw);
        assert_eq!(record.name, "Central High School");
        assert_eq!(record.website, "");
        assert_eq!(record.end_grade, "12");
    }
}
