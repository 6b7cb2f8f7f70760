//! Deterministic person generation.
//!
//! All fields are derived from one `StdRng` seeded with the request seed.
//! The stream is sequential, so the draw order below is part of the
//! contract: names, then birth date, then jurisdiction, then the remaining
//! fields in record order. Reordering draws changes every downstream value
//! for the same seed.

use chrono::{Datelike, Duration, NaiveDate};
use fake::faker::address::en::{BuildingNumber, CityName, StreetName};
use fake::faker::company::en::{CompanyName, Industry};
use fake::faker::creditcard::en::CreditCardNumber;
use fake::faker::internet::en::{Password, UserAgent};
use fake::faker::job::en::Title as JobTitle;
use fake::faker::lorem::en::Word;
use fake::faker::name::en::LastName;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{GenerationRequest, PersonRecord, Sex, DEFAULT_MAX_AGE, DEFAULT_MIN_AGE};
use crate::names;
use crate::states;

const HAIR_COLORS: &[&str] = &["Black", "Brown", "Blond", "Auburn", "Red", "Gray", "White"];
const EMPLOYMENT_STATUS: &[&str] = &["Full-time", "Part-time", "Freelance"];
const BLOOD_TYPES: &[&str] = &["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];
const OPERATING_SYSTEMS: &[&str] = &[
    "Windows 11",
    "Windows 10",
    "macOS",
    "Linux",
    "iOS",
    "Android",
];
const EDUCATION_LEVELS: &[&str] = &[
    "High School",
    "Associate Degree",
    "Bachelor's Degree",
    "Master's Degree",
    "PhD",
];
const CARD_TYPES: &[&str] = &[
    "Visa",
    "Mastercard",
    "American Express",
    "Discover",
    "JCB",
    "Diners Club",
];
const EMAIL_DOMAINS: &[&str] = &["gmail.com", "outlook.com", "yahoo.com", "hotmail.com"];
const WEBSITE_SUFFIXES: &[&str] = &["com", "net", "org", "info"];
const SECURITY_QUESTION: &str = "What is your mother's maiden name?";

/// Generates a complete person record from the request.
///
/// Pure given `(request, today)`: the only entropy source is an `StdRng`
/// seeded from `request.seed` and threaded through every draw, so repeated
/// calls with the same inputs yield byte-identical records. `today` anchors
/// age and expiry arithmetic and is injected by the caller.
pub fn generate(request: &GenerationRequest, today: NaiveDate) -> PersonRecord {
    let mut rng = StdRng::seed_from_u64(request.seed);

    // A gender filter replaces the sex draw entirely; the stream is only
    // consumed for values the filters leave open.
    let sex = match request.gender {
        Some(sex) => sex,
        None => {
            if rng.gen_range(0..2) == 0 {
                Sex::Male
            } else {
                Sex::Female
            }
        }
    };

    let first_name = names::first_name(&mut rng, sex).to_string();
    let last_name: String = LastName().fake_with_rng(&mut rng);
    let full_name = format!("{} {}", first_name, last_name);

    let (min_age, max_age) = request.age_range.unwrap_or((DEFAULT_MIN_AGE, DEFAULT_MAX_AGE));
    let age = rng.gen_range(min_age..=max_age);
    let birth_date = birthdate_with_age(today, age, &mut rng);

    let state = match &request.state {
        Some(state) => state.clone(),
        None => names::pick(&mut rng, &state_codes()).to_string(),
    };
    let state_full_name = states::state_display_name(&state).to_string();

    let city = match &request.city {
        Some(city) => city.clone(),
        None => CityName().fake_with_rng(&mut rng),
    };

    let zip_code = zip_for_state(&state, &mut rng);
    let street = format!(
        "{} {}",
        BuildingNumber().fake_with_rng::<String, _>(&mut rng),
        StreetName().fake_with_rng::<String, _>(&mut rng),
    );
    let full_address = format!("{}, {}, {} {}", street, city, state, zip_code);

    let title = names::title(&mut rng, sex).to_string();
    let hair_color = names::pick(&mut rng, HAIR_COLORS).to_string();
    let phone: String = PhoneNumber().fake_with_rng(&mut rng);

    let email = format!(
        "{}.{}{}@{}",
        slug(&first_name),
        slug(&last_name),
        rng.gen_range(1..9999u32),
        names::pick(&mut rng, EMAIL_DOMAINS),
    );

    let occupation: String = JobTitle().fake_with_rng(&mut rng);
    let company: String = CompanyName().fake_with_rng(&mut rng);
    let company_size = rng.gen_range(10..=50_000u32).to_string();
    let industry: String = Industry().fake_with_rng(&mut rng);
    let status = names::pick(&mut rng, EMPLOYMENT_STATUS).to_string();
    let salary = format_currency(rng.gen_range(30_000..=200_000u32));

    let ssn_digits = format!("{:09}", rng.gen_range(0..1_000_000_000u32));
    let ssn = format!(
        "{}-{}-{}",
        &ssn_digits[..3],
        &ssn_digits[3..5],
        &ssn_digits[5..]
    );

    let card_type = names::pick(&mut rng, CARD_TYPES).to_string();
    let card_number: String = CreditCardNumber().fake_with_rng(&mut rng);
    let cvv_digits = format!("{:03}", rng.gen_range(0..1000u16));
    let cvv: u16 = cvv_digits.parse().unwrap_or(0);
    let expiry = (today + Duration::days(rng.gen_range(30..=1460)))
        .format("%m/%y")
        .to_string();

    let username = format!(
        "{}_{}{}",
        slug(&first_name),
        slug(&last_name),
        rng.gen_range(1..=99u32),
    );
    let password: String = Password(10..16).fake_with_rng(&mut rng);

    let height = format!("{} cm", rng.gen_range(150..=200u32));
    let weight = format!("{} kg", rng.gen_range(45..=120u32));
    let blood_type = names::pick(&mut rng, BLOOD_TYPES).to_string();
    let os = names::pick(&mut rng, OPERATING_SYSTEMS).to_string();

    let guid_bytes: [u8; 16] = rng.gen();
    let guid = uuid::Builder::from_random_bytes(guid_bytes)
        .into_uuid()
        .to_string();
    let user_agent: String = UserAgent().fake_with_rng(&mut rng);

    let education = names::pick(&mut rng, EDUCATION_LEVELS).to_string();
    let website = format!(
        "https://{}.{}",
        Word().fake_with_rng::<String, _>(&mut rng),
        names::pick(&mut rng, WEBSITE_SUFFIXES),
    );
    let security_answer: String = LastName().fake_with_rng(&mut rng);

    PersonRecord {
        full_name,
        first_name,
        last_name,
        gender: sex.as_str().to_string(),
        birthday: birth_date.format("%m/%d/%Y").to_string(),
        title,
        hair_color,
        country: "United States".to_string(),
        street,
        city,
        state,
        state_full_name,
        zip_code,
        phone,
        email,
        full_address,
        occupation,
        company,
        company_size,
        industry,
        status,
        salary,
        ssn,
        card_type,
        card_number,
        cvv,
        expiry,
        username,
        password,
        height,
        weight,
        blood_type,
        os,
        guid,
        user_agent,
        education,
        website,
        security_question: SECURITY_QUESTION.to_string(),
        security_answer,
    }
}

/// Draws a birth date uniformly over the window of dates that make the
/// person exactly `age` years old as of `today`.
fn birthdate_with_age(today: NaiveDate, age: u32, rng: &mut StdRng) -> NaiveDate {
    let latest = shift_years(today, -(age as i32));
    let earliest = shift_years(today, -(age as i32) - 1) + Duration::days(1);
    let span = (latest - earliest).num_days();
    earliest + Duration::days(rng.gen_range(0..=span))
}

/// Shifts a date by whole years, clamping Feb 29 to Feb 28 when the target
/// year is not a leap year.
fn shift_years(date: NaiveDate, years: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year() + years, date.month(), date.day()).unwrap_or_else(|| {
        NaiveDate::from_ymd_opt(date.year() + years, 2, 28).expect("Feb 28 is always valid")
    })
}

/// Age in whole years as of `today`.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// Draws a zip code inside the resolved state's range; codes outside the
/// 50-state table get a generic 5-digit zip.
fn zip_for_state(state: &str, rng: &mut StdRng) -> String {
    let (min, max) = match states::find_state(state) {
        Some(info) => (info.zip_min, info.zip_max),
        None => (10_000, 99_999),
    };
    format!("{:05}", rng.gen_range(min..=max))
}

fn state_codes() -> Vec<&'static str> {
    states::US_STATES.iter().map(|s| s.code).collect()
}

/// Lowercases and strips everything but ASCII alphanumerics, for email and
/// username composition.
fn slug(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Formats an integer dollar amount with thousands separators.
fn format_currency(amount: u32) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    format!("${}", out)
}
