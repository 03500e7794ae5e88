//! # HealthRecs Core
//!
//! Client-side business logic for the HealthRecs patient record system.
//!
//! This crate contains the patient data model and the workflows built on it:
//! - Triage classification and in-memory patient search
//! - Demo sign-in, role-gated navigation and the persisted theme
//! - Page workflows: dashboard, patient list, detail, registration, visits,
//!   image extraction and reports
//!
//! **No transport concerns**: the remote services are reached through the traits in
//! [`service`]; HTTP lives in `healthrecs-client` and rendering in `healthrecs-cli`.

pub mod auth;
pub mod condition;
pub mod config;
pub mod constants;
pub mod context;
pub mod dates;
pub mod directory;
pub mod error;
pub mod models;
pub mod notice;
pub mod pages;
pub mod service;
pub mod theme;

#[cfg(test)]
mod test_support;

pub use config::CoreConfig;
pub use error::{ApiAction, ApiError, ApiResult, RecordsError, RecordsResult};
pub use healthrecs_types::{NonEmptyText, RegNo, TextError};
