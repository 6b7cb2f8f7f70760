//! Field selection for the export document.
//!
//! The caller's `fields` parameter is resolved once, at request
//! construction, into a list of typed [`FieldKey`]s. Person fields index
//! straight into the serialized record; school and university fields carry
//! their own resolution logic (composed addresses, grade spans, type
//! labels). Rendering never re-dispatches on string prefixes.

use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::models::{PersonaResponse, SchoolRecord, UniversityRecord};

/// Every serialized key of the person record, in record order.
pub const PERSON_FIELDS: &[&str] = &[
    "fullName",
    "firstName",
    "lastName",
    "gender",
    "birthday",
    "title",
    "hairColor",
    "country",
    "street",
    "city",
    "state",
    "stateFullName",
    "zipCode",
    "phone",
    "email",
    "fullAddress",
    "occupation",
    "company",
    "companySize",
    "industry",
    "status",
    "salary",
    "ssn",
    "cardType",
    "cardNumber",
    "cvv",
    "expiry",
    "username",
    "password",
    "height",
    "weight",
    "bloodType",
    "os",
    "guid",
    "userAgent",
    "education",
    "website",
    "securityQuestion",
    "securityAnswer",
];

/// The default export selection when the caller supplies no `fields`.
pub const DEFAULT_VISIBLE_FIELDS: &[&str] = &[
    "fullName",
    "firstName",
    "lastName",
    "gender",
    "birthday",
    "title",
    "hairColor",
    "street",
    "city",
    "state",
    "zipCode",
    "phone",
    "email",
    "fullAddress",
    "ssn",
    "cardType",
    "cardNumber",
    "cvv",
    "expiry",
    "schoolName",
    "schoolId",
    "schoolZip",
    "schoolWebsite",
    "schoolAddress",
    "schoolPhone",
    "schoolGrades",
    "universityName",
    "universityId",
    "universityZip",
    "universityWebsite",
    "universityAddress",
    "universityPhone",
    "universityType",
];

/// Field groups mirroring the export document's presentation categories.
pub const FIELD_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "basic",
        &[
            "fullName",
            "firstName",
            "lastName",
            "gender",
            "birthday",
            "title",
            "hairColor",
        ],
    ),
    (
        "contact",
        &[
            "street",
            "city",
            "state",
            "stateFullName",
            "zipCode",
            "phone",
            "email",
            "fullAddress",
        ],
    ),
    (
        "work",
        &[
            "occupation",
            "company",
            "companySize",
            "industry",
            "status",
            "salary",
        ],
    ),
    ("physical", &["height", "weight", "bloodType"]),
    (
        "financial",
        &["ssn", "cardType", "cardNumber", "cvv", "expiry"],
    ),
    (
        "account",
        &["username", "password", "securityQuestion", "securityAnswer"],
    ),
    ("tech", &["os", "userAgent", "guid"]),
    ("other", &["education", "website", "country"]),
    (
        "school",
        &[
            "schoolName",
            "schoolId",
            "schoolZip",
            "schoolWebsite",
            "schoolAddress",
            "schoolCity",
            "schoolState",
            "schoolPhone",
            "schoolGrades",
        ],
    ),
    (
        "university",
        &[
            "universityName",
            "universityId",
            "universityZip",
            "universityWebsite",
            "universityAddress",
            "universityCity",
            "universityState",
            "universityPhone",
            "universityType",
        ],
    ),
];

/// A school-derived export field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchoolField {
    Name,
    Id,
    Zip,
    Website,
    Address,
    City,
    State,
    Phone,
    Grades,
}

impl SchoolField {
    pub fn key(self) -> &'static str {
        match self {
            SchoolField::Name => "schoolName",
            SchoolField::Id => "schoolId",
            SchoolField::Zip => "schoolZip",
            SchoolField::Website => "schoolWebsite",
            SchoolField::Address => "schoolAddress",
            SchoolField::City => "schoolCity",
            SchoolField::State => "schoolState",
            SchoolField::Phone => "schoolPhone",
            SchoolField::Grades => "schoolGrades",
        }
    }

    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "schoolName" => SchoolField::Name,
            "schoolId" => SchoolField::Id,
            "schoolZip" => SchoolField::Zip,
            "schoolWebsite" => SchoolField::Website,
            "schoolAddress" => SchoolField::Address,
            "schoolCity" => SchoolField::City,
            "schoolState" => SchoolField::State,
            "schoolPhone" => SchoolField::Phone,
            "schoolGrades" => SchoolField::Grades,
            _ => return None,
        })
    }

    /// Resolves the field against a school record; empty values are absent.
    pub fn resolve(self, school: &SchoolRecord) -> Option<String> {
        let value = match self {
            SchoolField::Name => school.name.clone(),
            SchoolField::Id => school.ncesid.clone(),
            SchoolField::Zip => school.zip.clone(),
            SchoolField::Website => school.website.clone(),
            SchoolField::Address => composed_address(
                &school.address,
                &school.city,
                &school.state,
                &school.zip,
            ),
            SchoolField::City => school.city.clone(),
            SchoolField::State => school.state.clone(),
            SchoolField::Phone => school.telephone.clone(),
            SchoolField::Grades => grade_span(&school.st_grade, &school.end_grade),
        };
        (!value.is_empty()).then_some(value)
    }
}

/// A university-derived export field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniversityField {
    Name,
    Id,
    Zip,
    Website,
    Address,
    City,
    State,
    Phone,
    Type,
}

impl UniversityField {
    pub fn key(self) -> &'static str {
        match self {
            UniversityField::Name => "universityName",
            UniversityField::Id => "universityId",
            UniversityField::Zip => "universityZip",
            UniversityField::Website => "universityWebsite",
            UniversityField::Address => "universityAddress",
            UniversityField::City => "universityCity",
            UniversityField::State => "universityState",
            UniversityField::Phone => "universityPhone",
            UniversityField::Type => "universityType",
        }
    }

    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "universityName" => UniversityField::Name,
            "universityId" => UniversityField::Id,
            "universityZip" => UniversityField::Zip,
            "universityWebsite" => UniversityField::Website,
            "universityAddress" => UniversityField::Address,
            "universityCity" => UniversityField::City,
            "universityState" => UniversityField::State,
            "universityPhone" => UniversityField::Phone,
            "universityType" => UniversityField::Type,
            _ => return None,
        })
    }

    /// Resolves the field against a university record; empty values are
    /// absent.
    pub fn resolve(self, university: &UniversityRecord) -> Option<String> {
        let value = match self {
            UniversityField::Name => university.name.clone(),
            UniversityField::Id => university.ipedsid.clone(),
            UniversityField::Zip => university.zip.clone(),
            UniversityField::Website => university.website.clone(),
            UniversityField::Address => composed_address(
                &university.address,
                &university.city,
                &university.state,
                &university.zip,
            ),
            UniversityField::City => university.city.clone(),
            UniversityField::State => university.state.clone(),
            UniversityField::Phone => university.telephone.clone(),
            UniversityField::Type => university_type_label(&university.type_code),
        };
        (!value.is_empty()).then_some(value)
    }
}

/// A resolved export field: person fields index into the serialized record,
/// school and university fields carry their own resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKey {
    Person(&'static str),
    School(SchoolField),
    University(UniversityField),
}

impl FieldKey {
    /// Resolves a field name to its typed key; unknown names are rejected.
    pub fn parse(name: &str) -> Result<Self, AppError> {
        if let Some(interned) = PERSON_FIELDS.iter().copied().find(|f| *f == name) {
            return Ok(FieldKey::Person(interned));
        }
        if let Some(field) = SchoolField::parse(name) {
            return Ok(FieldKey::School(field));
        }
        if let Some(field) = UniversityField::parse(name) {
            return Ok(FieldKey::University(field));
        }
        Err(AppError::BadRequest(format!("Unknown field '{}'", name)))
    }
}

/// Parses the caller's comma-separated selection, falling back to the
/// default list. Empty entries are skipped; unknown names are a bad
/// request.
pub fn parse_fields(param: Option<&str>) -> Result<Vec<FieldKey>, AppError> {
    match param {
        None => DEFAULT_VISIBLE_FIELDS.iter().map(|f| FieldKey::parse(f)).collect(),
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(FieldKey::parse)
            .collect(),
    }
}

/// Builds the flat export document: one key per requested field, skipping
/// fields whose source record is absent or whose value is empty.
pub fn build_export(
    keys: &[FieldKey],
    response: &PersonaResponse,
) -> Result<Map<String, Value>, AppError> {
    let person = serde_json::to_value(&response.person)
        .map_err(|e| AppError::Generation(format!("Failed to serialize person record: {}", e)))?;
    let person = person
        .as_object()
        .ok_or_else(|| AppError::InternalError("Person record is not an object".to_string()))?;

    let mut out = Map::new();
    for key in keys {
        match key {
            FieldKey::Person(name) => {
                if let Some(value) = person.get(*name) {
                    out.insert((*name).to_string(), value.clone());
                }
            }
            FieldKey::School(field) => {
                if let Some(school) = &response.school {
                    if let Some(value) = field.resolve(school) {
                        out.insert(field.key().to_string(), Value::String(value));
                    }
                }
            }
            FieldKey::University(field) => {
                if let Some(university) = &response.university {
                    if let Some(value) = field.resolve(university) {
                        out.insert(field.key().to_string(), Value::String(value));
                    }
                }
            }
        }
    }
    Ok(out)
}

/// Maps the catalog's institution type code to its display label; unknown
/// codes pass through unchanged.
pub fn university_type_label(code: &str) -> String {
    match code {
        "1" => "Public".to_string(),
        "2" => "Private nonprofit".to_string(),
        "3" => "Private for-profit".to_string(),
        other => other.to_string(),
    }
}

fn composed_address(address: &str, city: &str, state: &str, zip: &str) -> String {
    if address.is_empty() {
        return String::new();
    }
    format!("{}, {}, {} {}", address, city, state, zip)
}

fn grade_span(start: &str, end: &str) -> String {
    if start.is_empty() && end.is_empty() {
        return String::new();
    }
    format!("{}-{}", start, end)
}
