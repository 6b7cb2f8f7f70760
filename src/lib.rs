//! Persona API Library
//!
//! Deterministic synthetic-identity generation: a seeded person-record
//! generator plus lookups against a public school/university catalog,
//! served over HTTP.
//!
//! # Modules
//!
//! - `catalog`: External catalog client (schools, universities).
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `fields`: Export field selection and rendering.
//! - `generator`: Deterministic person generation.
//! - `handlers`: HTTP request handlers.
//! - `models`: Core data models.
//! - `names`: Sex-conditioned name tables.
//! - `states`: U.S. state table.

pub mod catalog;
pub mod config;
pub mod errors;
pub mod fields;
pub mod generator;
pub mod handlers;
pub mod models;
pub mod names;
pub mod states;
